// Crop dialog: one job applying a pixel rect through the crop filter.
use std::path::{Path, PathBuf};

use super::{JobPreparer, PreparedJobs};
use crate::engine::{
    ensure_output_dir, generate_with_context, input_context, template, GenerationError, Job,
};

pub const DEFAULT_CROP_TEMPLATE: &str = concat!(
    "ffmpeg -y -loglevel warning ",
    "-i \"{inputfile_folder}/{inputfile_name}.{inputfile_ext}\" ",
    "-vf \"crop={crop_width}:{crop_height}:{crop_x}:{crop_y}\" ",
    "\"{output_folder}/{inputfile_name}_cropped.{inputfile_ext}\""
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

pub struct VideoCrop {
    pub template: String,
    pub input: PathBuf,
    pub output_spec: String,
    pub region: CropRegion,
}

impl JobPreparer for VideoCrop {
    fn feature_name(&self) -> &'static str {
        "Video Cropper"
    }

    fn prepare(&self) -> Result<PreparedJobs, GenerationError> {
        let input_dir = self.input.parent().unwrap_or_else(|| Path::new(""));
        let output_dir = ensure_output_dir(&self.output_spec, input_dir)?;

        let mut context = input_context(&self.input, &output_dir);
        context.insert(template::PLACEHOLDER_CROP_WIDTH, self.region.width.to_string());
        context.insert(
            template::PLACEHOLDER_CROP_HEIGHT,
            self.region.height.to_string(),
        );
        context.insert(template::PLACEHOLDER_CROP_X, self.region.x.to_string());
        context.insert(template::PLACEHOLDER_CROP_Y, self.region.y.to_string());

        let command = generate_with_context(&self.template, &context)?;
        let stem = self
            .input
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(PreparedJobs::from_jobs(vec![Job::new(
            format!("crop-{stem}"),
            vec![command],
        )]))
    }
}
