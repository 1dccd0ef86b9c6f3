// Per-feature job preparation: each dialog maps user input to runnable jobs.
use tempfile::TempPath;

use crate::engine::{GenerationError, Job};

mod batch_template;
mod cropper;
mod cutter;
mod joiner;
mod thumbnail;

pub use batch_template::*;
pub use cropper::*;
pub use cutter::*;
pub use joiner::*;
pub use thumbnail::*;

/// Jobs ready for the orchestrator, plus any scratch files the commands
/// reference. Keep this alive until the batch run has finished; dropping it
/// deletes the scratch files.
#[derive(Debug)]
pub struct PreparedJobs {
    pub jobs: Vec<Job>,
    pub scratch: Vec<TempPath>,
}

impl PreparedJobs {
    fn from_jobs(jobs: Vec<Job>) -> Self {
        Self {
            jobs,
            scratch: Vec::new(),
        }
    }
}

/// A feature dialog's backend: turns its parameters into jobs without
/// touching the orchestrator.
pub trait JobPreparer {
    fn feature_name(&self) -> &'static str;
    fn prepare(&self) -> Result<PreparedJobs, GenerationError>;
}
