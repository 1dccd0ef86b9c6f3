// Batch orchestration: sequential and parallel job dispatch with cancellation.
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use thiserror::Error;

use super::runner::{ExitOutcome, ProcessRunner, RunnerHandle};
use super::status::{EventSink, Status};

/// One unit of work in a batch: an opaque id the UI keys its rows on, the
/// shell command lines to run in order, and an optional path to the primary
/// output artifact.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub commands: Vec<String>,
    pub output_path: Option<PathBuf>,
}

impl Job {
    pub fn new(id: impl Into<String>, commands: Vec<String>) -> Self {
        Self {
            id: id.into(),
            commands,
            output_path: None,
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("A batch is already running.")]
    AlreadyRunning,
    #[error("There are no jobs to run.")]
    NoJobs,
}

/// Dispatches jobs to worker threads and reports progress through an
/// [`EventSink`]. One batch at a time; `run` returns as soon as the batch is
/// accepted and the events tell the rest of the story.
pub struct BatchRunner {
    running: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
    live: Arc<Mutex<Vec<RunnerHandle>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchRunner {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            cancelled: Arc::new(AtomicBool::new(false)),
            live: Arc::new(Mutex::new(Vec::new())),
            workers: Mutex::new(Vec::new()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn reserve(&self, job_count: usize) -> Result<(), BatchError> {
        if job_count == 0 {
            return Err(BatchError::NoJobs);
        }
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::warn!("Batch start rejected: a batch is already running");
            return Err(BatchError::AlreadyRunning);
        }
        self.cancelled.store(false, Ordering::SeqCst);
        if let Ok(mut workers) = self.workers.lock() {
            workers.clear();
        }
        Ok(())
    }

    fn track_worker(&self, worker: JoinHandle<()>) {
        if let Ok(mut workers) = self.workers.lock() {
            workers.push(worker);
        }
    }

    /// Runs the jobs one after another on a single worker thread. Every job
    /// is announced as `Pending` before the worker starts; a failed job ends
    /// only that job, a stop request drains the remaining queue as `Stopped`.
    pub fn run(&self, jobs: Vec<Job>, sink: Arc<dyn EventSink>) -> Result<(), BatchError> {
        self.reserve(jobs.len())?;
        for job in &jobs {
            sink.status_changed(&job.id, Status::Pending);
        }
        log::info!("Starting batch of {} job(s)", jobs.len());

        let running = Arc::clone(&self.running);
        let cancelled = Arc::clone(&self.cancelled);
        let live = Arc::clone(&self.live);
        let worker = thread::spawn(move || {
            let mut queue: VecDeque<Job> = jobs.into();
            while let Some(job) = queue.pop_front() {
                if cancelled.load(Ordering::SeqCst) {
                    sink.status_changed(&job.id, Status::Stopped);
                    drain_queue(&queue, sink.as_ref());
                    break;
                }
                let status = run_job(&job, &cancelled, &live, sink.as_ref());
                sink.status_changed(&job.id, status);
                if status == Status::Stopped {
                    drain_queue(&queue, sink.as_ref());
                    break;
                }
            }
            if let Ok(mut guard) = live.lock() {
                guard.clear();
            }
            running.store(false, Ordering::SeqCst);
            sink.batch_finished();
        });
        self.track_worker(worker);
        Ok(())
    }

    /// Runs every job on its own worker thread. Job statuses arrive in
    /// whatever order the processes finish; the last worker to finish emits
    /// `batch_finished`.
    pub fn run_parallel(&self, jobs: Vec<Job>, sink: Arc<dyn EventSink>) -> Result<(), BatchError> {
        self.reserve(jobs.len())?;
        for job in &jobs {
            sink.status_changed(&job.id, Status::Pending);
        }
        log::info!("Starting parallel batch of {} job(s)", jobs.len());

        let remaining = Arc::new(AtomicUsize::new(jobs.len()));
        for job in jobs {
            let running = Arc::clone(&self.running);
            let cancelled = Arc::clone(&self.cancelled);
            let live = Arc::clone(&self.live);
            let remaining = Arc::clone(&remaining);
            let sink = Arc::clone(&sink);
            let worker = thread::spawn(move || {
                let status = if cancelled.load(Ordering::SeqCst) {
                    Status::Stopped
                } else {
                    run_job(&job, &cancelled, &live, sink.as_ref())
                };
                sink.status_changed(&job.id, status);
                if remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                    if let Ok(mut guard) = live.lock() {
                        guard.clear();
                    }
                    running.store(false, Ordering::SeqCst);
                    sink.batch_finished();
                }
            });
            self.track_worker(worker);
        }
        Ok(())
    }

    /// Cancels the batch in flight: sets the batch-wide flag and stops every
    /// live child process. Pending jobs drain as `Stopped`. A no-op when
    /// nothing is running.
    pub fn stop(&self) {
        if !self.is_running() {
            log::info!("Stop requested with no batch running; nothing to do");
            return;
        }
        log::info!("Stopping batch processing");
        self.cancelled.store(true, Ordering::SeqCst);
        if let Ok(live) = self.live.lock() {
            for handle in live.iter() {
                handle.stop();
            }
        }
    }

    /// Blocks until every worker of the current batch has finished.
    pub fn wait(&self) {
        let workers: Vec<JoinHandle<()>> = match self.workers.lock() {
            Ok(mut guard) => guard.drain(..).collect(),
            Err(_) => return,
        };
        for worker in workers {
            let _ = worker.join();
        }
    }
}

fn drain_queue(queue: &VecDeque<Job>, sink: &dyn EventSink) {
    for pending in queue {
        sink.status_changed(&pending.id, Status::Stopped);
    }
}

// Runs one job's commands in order. Emits the Processing event itself; the
// caller emits the terminal status this returns.
fn run_job(
    job: &Job,
    cancelled: &AtomicBool,
    live: &Mutex<Vec<RunnerHandle>>,
    sink: &dyn EventSink,
) -> Status {
    if job.commands.is_empty() {
        sink.log_line(&format!(
            "Failed to prepare job '{}': no commands were generated.",
            job.id
        ));
        return Status::Failed;
    }

    sink.status_changed(&job.id, Status::Processing);
    for command in &job.commands {
        if cancelled.load(Ordering::SeqCst) {
            return Status::Stopped;
        }
        let runner = ProcessRunner::new();
        let handle = runner.handle();
        if let Ok(mut guard) = live.lock() {
            guard.push(handle.clone());
        }
        // A batch-wide stop that landed between the flag check and the
        // registration above must reach this runner too.
        if cancelled.load(Ordering::SeqCst) {
            handle.stop();
        }

        sink.log_line(command);
        let outcome = runner.run(command, &mut |line| sink.log_line(line));
        if let Ok(mut guard) = live.lock() {
            guard.retain(|tracked| !tracked.same_runner(&handle));
        }

        match outcome {
            Ok(ExitOutcome::Success) => {}
            Ok(ExitOutcome::Failure(code)) => {
                sink.log_line(&format!("Process exited with code {code}."));
                return Status::Failed;
            }
            Ok(ExitOutcome::Killed) => return Status::Stopped,
            Err(error) => {
                sink.log_line(&error.to_string());
                return Status::Failed;
            }
        }
    }
    Status::Success
}
