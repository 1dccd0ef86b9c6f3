// Main-window batch run: one job per selected file from one command template.
use std::path::PathBuf;

use super::{JobPreparer, PreparedJobs};
use crate::engine::{generate_single, GenerationError, Job};

pub struct BatchTemplate {
    pub template: String,
    pub inputs: Vec<PathBuf>,
    pub output_spec: String,
}

impl JobPreparer for BatchTemplate {
    fn feature_name(&self) -> &'static str {
        "Batch"
    }

    fn prepare(&self) -> Result<PreparedJobs, GenerationError> {
        if self.inputs.is_empty() {
            return Err(GenerationError::NoInput);
        }
        let mut jobs = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let command = generate_single(&self.template, input, &self.output_spec)?;
            jobs.push(Job::new(input.to_string_lossy(), vec![command]));
        }
        Ok(PreparedJobs::from_jobs(jobs))
    }
}
