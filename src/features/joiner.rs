// Join dialog: one concat-demuxer job over an ordered input list.
use std::path::PathBuf;

use super::{JobPreparer, PreparedJobs};
use crate::engine::{generate_concat, GenerationError, Job};

pub const DEFAULT_JOIN_TEMPLATE: &str =
    "ffmpeg -y -f concat -safe 0 -i \"{concatfile_path}\" -c copy \"{output_folder}/joined_video.mp4\"";

pub struct ConcatJoin {
    pub template: String,
    pub inputs: Vec<PathBuf>,
    pub output_spec: String,
}

impl JobPreparer for ConcatJoin {
    fn feature_name(&self) -> &'static str {
        "Video Joiner"
    }

    fn prepare(&self) -> Result<PreparedJobs, GenerationError> {
        let concat = generate_concat(&self.template, &self.inputs, &self.output_spec)?;
        let job = Job::new("join", vec![concat.command]);
        Ok(PreparedJobs {
            jobs: vec![job],
            scratch: vec![concat.list_file],
        })
    }
}
