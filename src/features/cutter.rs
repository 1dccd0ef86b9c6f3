// Cut dialog: one job per segment, with filesystem-safe timestamp variants.
use std::path::{Path, PathBuf};

use super::{JobPreparer, PreparedJobs};
use crate::engine::{
    ensure_output_dir, generate_with_context, input_context, template, GenerationError, Job,
};
use crate::media::ms_to_time_str;

pub const DEFAULT_CUT_TEMPLATE: &str = concat!(
    "ffmpeg -y -loglevel warning ",
    "-i \"{inputfile_folder}/{inputfile_name}.{inputfile_ext}\" ",
    "-ss {start_time} -to {end_time} -c copy ",
    "\"{output_folder}/{inputfile_name}--{safe_start_time}--{safe_end_time}.{inputfile_ext}\""
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start_ms: u64,
    pub end_ms: u64,
}

pub struct SegmentCut {
    pub template: String,
    pub input: PathBuf,
    pub output_spec: String,
    pub segments: Vec<Segment>,
}

impl JobPreparer for SegmentCut {
    fn feature_name(&self) -> &'static str {
        "Video Cutter"
    }

    fn prepare(&self) -> Result<PreparedJobs, GenerationError> {
        if self.segments.is_empty() {
            return Err(GenerationError::NoInput);
        }
        let input_dir = self.input.parent().unwrap_or_else(|| Path::new(""));
        let output_dir = ensure_output_dir(&self.output_spec, input_dir)?;
        let stem = self
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();

        let mut jobs = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            let start = ms_to_time_str(segment.start_ms);
            let end = ms_to_time_str(segment.end_ms);
            let safe_start = start.replace(':', "-");
            let safe_end = end.replace(':', "-");

            let mut context = input_context(&self.input, &output_dir);
            context.insert(template::PLACEHOLDER_START_TIME, start);
            context.insert(template::PLACEHOLDER_END_TIME, end);
            context.insert(template::PLACEHOLDER_SAFE_START_TIME, safe_start.clone());
            context.insert(template::PLACEHOLDER_SAFE_END_TIME, safe_end.clone());

            let command = generate_with_context(&self.template, &context)?;
            jobs.push(Job::new(
                format!("{stem}--{safe_start}--{safe_end}"),
                vec![command],
            ));
        }
        Ok(PreparedJobs::from_jobs(jobs))
    }
}
