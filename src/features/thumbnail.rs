// Thumbnail dialog: extract a frame, then re-mux it as the attached picture.
use std::path::{Path, PathBuf};

use super::{JobPreparer, PreparedJobs};
use crate::engine::{
    ensure_output_dir, generate_with_context, input_context, template, GenerationError, Job,
};

pub const DEFAULT_EXTRACT_TEMPLATE: &str = concat!(
    "ffmpeg -y -loglevel warning -ss {timestamp} ",
    "-i \"{inputfile_folder}/{inputfile_name}.{inputfile_ext}\" ",
    "-frames:v 1 \"{thumb_path}\""
);

pub const DEFAULT_EMBED_TEMPLATE: &str = concat!(
    "ffmpeg -y -loglevel warning ",
    "-i \"{inputfile_folder}/{inputfile_name}.{inputfile_ext}\" -i \"{thumb_path}\" ",
    "-map 0 -map 1 -c copy -disposition:v:1 attached_pic ",
    "\"{output_folder}/{inputfile_name}.{inputfile_ext}\""
);

/// Sets a container thumbnail as one two-command job: grab the frame at
/// `timestamp` into a scratch jpg, then copy-remux with the jpg attached.
pub struct ThumbnailSet {
    pub extract_template: String,
    pub embed_template: String,
    pub input: PathBuf,
    pub output_spec: String,
    /// `HH:MM:SS.mmm` position of the frame to use.
    pub timestamp: String,
}

impl JobPreparer for ThumbnailSet {
    fn feature_name(&self) -> &'static str {
        "Thumbnail Setter"
    }

    fn prepare(&self) -> Result<PreparedJobs, GenerationError> {
        let input_dir = self.input.parent().unwrap_or_else(|| Path::new(""));
        let output_dir = ensure_output_dir(&self.output_spec, input_dir)?;
        let stem = self
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();

        let thumb = tempfile::Builder::new()
            .prefix(&format!("{stem}_thumb-"))
            .suffix(".jpg")
            .tempfile()?
            .into_temp_path();

        let mut context = input_context(&self.input, &output_dir);
        context.insert(template::PLACEHOLDER_TIMESTAMP, self.timestamp.clone());
        context.insert(
            template::PLACEHOLDER_THUMB_PATH,
            thumb.to_string_lossy().replace('\\', "/"),
        );

        let extract = generate_with_context(&self.extract_template, &context)?;
        let embed = generate_with_context(&self.embed_template, &context)?;

        let file_name = self
            .input
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_default();
        let job = Job::new(format!("thumbnail-{stem}"), vec![extract, embed])
            .with_output_path(output_dir.join(file_name));
        Ok(PreparedJobs {
            jobs: vec![job],
            scratch: vec![thumb],
        })
    }
}
