// End-to-end orchestrator behavior against real shell child processes.
#![cfg(unix)]

use clipbatch::{BatchError, BatchRunner, EventSink, Job, Status};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Default)]
struct RecordingSink {
    statuses: Mutex<Vec<(String, Status)>>,
    lines: Mutex<Vec<String>>,
    finished: Mutex<usize>,
}

impl RecordingSink {
    fn statuses(&self) -> Vec<(String, Status)> {
        self.statuses.lock().unwrap().clone()
    }

    fn statuses_for(&self, job_id: &str) -> Vec<Status> {
        self.statuses()
            .into_iter()
            .filter(|(id, _)| id == job_id)
            .map(|(_, status)| status)
            .collect()
    }

    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    fn finished_count(&self) -> usize {
        *self.finished.lock().unwrap()
    }
}

impl EventSink for RecordingSink {
    fn log_line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }

    fn status_changed(&self, job_id: &str, status: Status) {
        self.statuses
            .lock()
            .unwrap()
            .push((job_id.to_string(), status));
    }

    fn batch_finished(&self) {
        *self.finished.lock().unwrap() += 1;
    }
}

fn wait_until(condition: impl Fn() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn sequential_batch_runs_jobs_in_order() {
    let runner = BatchRunner::new();
    let sink = Arc::new(RecordingSink::default());
    let jobs = vec![
        Job::new("j1", vec!["echo one".to_string()]),
        Job::new("j2", vec!["echo two".to_string()]),
        Job::new("j3", vec!["echo three".to_string()]),
    ];
    runner.run(jobs, sink.clone()).expect("start batch");
    runner.wait();

    for id in ["j1", "j2", "j3"] {
        assert_eq!(
            sink.statuses_for(id),
            vec![Status::Pending, Status::Processing, Status::Success]
        );
    }

    // Dispatch is strictly sequential: after the Pending prefix the events
    // come as Processing/terminal pairs, one job at a time.
    let events: Vec<(String, Status)> = sink
        .statuses()
        .into_iter()
        .filter(|(_, status)| *status != Status::Pending)
        .collect();
    let expected: Vec<(String, Status)> = [
        ("j1", Status::Processing),
        ("j1", Status::Success),
        ("j2", Status::Processing),
        ("j2", Status::Success),
        ("j3", Status::Processing),
        ("j3", Status::Success),
    ]
    .into_iter()
    .map(|(id, status)| (id.to_string(), status))
    .collect();
    assert_eq!(events, expected);

    let lines = sink.lines();
    let one = lines.iter().position(|line| line == "one").expect("one");
    let three = lines.iter().position(|line| line == "three").expect("three");
    assert!(one < three);

    assert_eq!(sink.finished_count(), 1);
    assert!(!runner.is_running());
}

#[test]
fn failed_job_does_not_stop_the_batch() {
    let runner = BatchRunner::new();
    let sink = Arc::new(RecordingSink::default());
    let jobs = vec![
        Job::new("bad", vec!["exit 3".to_string()]),
        Job::new("good", vec!["echo still-here".to_string()]),
    ];
    runner.run(jobs, sink.clone()).expect("start batch");
    runner.wait();

    assert_eq!(
        sink.statuses_for("bad"),
        vec![Status::Pending, Status::Processing, Status::Failed]
    );
    assert_eq!(
        sink.statuses_for("good"),
        vec![Status::Pending, Status::Processing, Status::Success]
    );
    assert!(sink
        .lines()
        .iter()
        .any(|line| line.contains("exited with code 3")));
    assert_eq!(sink.finished_count(), 1);
}

#[test]
fn failed_command_aborts_the_rest_of_its_job() {
    let runner = BatchRunner::new();
    let sink = Arc::new(RecordingSink::default());
    let jobs = vec![Job::new(
        "multi",
        vec!["exit 1".to_string(), "echo never-runs".to_string()],
    )];
    runner.run(jobs, sink.clone()).expect("start batch");
    runner.wait();

    assert_eq!(
        sink.statuses_for("multi"),
        vec![Status::Pending, Status::Processing, Status::Failed]
    );
    assert!(!sink.lines().iter().any(|line| line == "never-runs"));
}

#[test]
fn stop_kills_the_live_job_and_drains_the_queue() {
    let runner = BatchRunner::new();
    let sink = Arc::new(RecordingSink::default());
    let jobs = vec![
        Job::new("j1", vec!["echo quick".to_string()]),
        Job::new("j2", vec!["sleep 30".to_string()]),
        Job::new("j3", vec!["echo unreached".to_string()]),
    ];
    runner.run(jobs, sink.clone()).expect("start batch");

    let sink_for_wait = sink.clone();
    assert!(
        wait_until(
            move || sink_for_wait
                .statuses()
                .contains(&("j2".to_string(), Status::Processing)),
            Duration::from_secs(10),
        ),
        "second job never started"
    );
    runner.stop();
    runner.wait();

    assert_eq!(
        sink.statuses_for("j1"),
        vec![Status::Pending, Status::Processing, Status::Success]
    );
    assert_eq!(
        sink.statuses_for("j2"),
        vec![Status::Pending, Status::Processing, Status::Stopped]
    );
    assert_eq!(sink.statuses_for("j3"), vec![Status::Pending, Status::Stopped]);
    assert!(!sink.lines().iter().any(|line| line == "unreached"));
    assert_eq!(sink.finished_count(), 1);
    assert!(!runner.is_running());
}

#[test]
fn second_run_is_rejected_while_busy() {
    let runner = BatchRunner::new();
    let sink = Arc::new(RecordingSink::default());
    runner
        .run(vec![Job::new("busy", vec!["sleep 30".to_string()])], sink.clone())
        .expect("start batch");

    let rejected = runner.run(
        vec![Job::new("late", vec!["echo nope".to_string()])],
        sink.clone(),
    );
    assert!(matches!(rejected, Err(BatchError::AlreadyRunning)));
    assert!(sink.statuses_for("late").is_empty());

    runner.stop();
    runner.wait();
    assert!(!runner.is_running());

    // Once idle the runner accepts a fresh batch.
    runner
        .run(vec![Job::new("again", vec!["echo ok".to_string()])], sink.clone())
        .expect("restart");
    runner.wait();
    assert_eq!(
        sink.statuses_for("again"),
        vec![Status::Pending, Status::Processing, Status::Success]
    );
    assert_eq!(sink.finished_count(), 2);
}

#[test]
fn empty_job_list_is_rejected() {
    let runner = BatchRunner::new();
    let sink = Arc::new(RecordingSink::default());
    assert!(matches!(
        runner.run(Vec::new(), sink.clone()),
        Err(BatchError::NoJobs)
    ));
    assert!(!runner.is_running());
    assert_eq!(sink.finished_count(), 0);
}

#[test]
fn job_without_commands_fails_and_the_batch_continues() {
    let runner = BatchRunner::new();
    let sink = Arc::new(RecordingSink::default());
    let jobs = vec![
        Job::new("hollow", Vec::new()),
        Job::new("solid", vec!["echo fine".to_string()]),
    ];
    runner.run(jobs, sink.clone()).expect("start batch");
    runner.wait();

    assert_eq!(
        sink.statuses_for("hollow"),
        vec![Status::Pending, Status::Failed]
    );
    assert_eq!(
        sink.statuses_for("solid"),
        vec![Status::Pending, Status::Processing, Status::Success]
    );
    assert!(sink
        .lines()
        .iter()
        .any(|line| line.contains("no commands were generated")));
    assert_eq!(sink.finished_count(), 1);
}

#[test]
fn stop_while_idle_is_a_no_op() {
    let runner = BatchRunner::new();
    let sink = Arc::new(RecordingSink::default());
    runner.stop();
    runner.stop();

    runner
        .run(vec![Job::new("after", vec!["echo works".to_string()])], sink.clone())
        .expect("start batch");
    runner.wait();
    assert_eq!(
        sink.statuses_for("after"),
        vec![Status::Pending, Status::Processing, Status::Success]
    );
}

#[test]
fn parallel_batch_finishes_once_after_the_last_job() {
    let runner = BatchRunner::new();
    let sink = Arc::new(RecordingSink::default());
    let jobs = vec![
        Job::new("slow", vec!["sleep 0.3 && echo slow-done".to_string()]),
        Job::new("fast", vec!["echo fast-done".to_string()]),
    ];
    runner.run_parallel(jobs, sink.clone()).expect("start batch");
    runner.wait();

    assert_eq!(
        sink.statuses_for("slow"),
        vec![Status::Pending, Status::Processing, Status::Success]
    );
    assert_eq!(
        sink.statuses_for("fast"),
        vec![Status::Pending, Status::Processing, Status::Success]
    );
    assert_eq!(sink.finished_count(), 1);
    assert!(!runner.is_running());
}

#[test]
fn parallel_stop_kills_every_live_job() {
    let runner = BatchRunner::new();
    let sink = Arc::new(RecordingSink::default());
    let jobs = vec![
        Job::new("p1", vec!["echo started-p1; sleep 30".to_string()]),
        Job::new("p2", vec!["echo started-p2; sleep 30".to_string()]),
    ];
    runner.run_parallel(jobs, sink.clone()).expect("start batch");

    let sink_for_wait = sink.clone();
    assert!(
        wait_until(
            move || {
                let lines = sink_for_wait.lines();
                lines.iter().any(|line| line == "started-p1")
                    && lines.iter().any(|line| line == "started-p2")
            },
            Duration::from_secs(10),
        ),
        "jobs never reached their processes"
    );

    let started = Instant::now();
    runner.stop();
    runner.wait();
    assert!(started.elapsed() < Duration::from_secs(10));

    assert_eq!(
        sink.statuses_for("p1"),
        vec![Status::Pending, Status::Processing, Status::Stopped]
    );
    assert_eq!(
        sink.statuses_for("p2"),
        vec![Status::Pending, Status::Processing, Status::Stopped]
    );
    assert_eq!(sink.finished_count(), 1);
    assert!(!runner.is_running());
}
