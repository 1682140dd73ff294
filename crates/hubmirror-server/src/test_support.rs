//! In-memory fakes shared by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use hubmirror_client::{ClientError, WorkflowApi};
use hubmirror_core::{CorrelationId, Job, RunStatus, Step, StepStatus, WorkflowRun};

use crate::clock::Clock;
use crate::sink::{SinkError, StatusSink};

/// Step name the fake replaces with the most recently dispatched
/// correlation id, so scripts can match randomly generated ids.
pub const DISPATCHED_ID: &str = "<dispatched id>";

type Scripted<T> = VecDeque<Result<T, String>>;

/// Pops scripted answers in order and keeps repeating the last one.
fn next_answer<T: Clone>(queue: &mut Scripted<T>, url: &str) -> Result<T, ClientError> {
    let answer = if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    };
    let message = match answer {
        Some(Ok(value)) => return Ok(value),
        Some(Err(message)) => message,
        None => "nothing scripted".to_string(),
    };
    Err(ClientError::Decode {
        url: url.to_string(),
        message,
    })
}

/// Scripted stand-in for the GitHub Actions API.
#[derive(Default)]
pub struct FakeWorkflowApi {
    runs: Mutex<Scripted<Vec<WorkflowRun>>>,
    jobs: Mutex<HashMap<String, Scripted<Vec<Job>>>>,
    dispatched: Mutex<Vec<(String, String)>>,
    calls: Mutex<Vec<String>>,
    fail_dispatch: bool,
}

impl FakeWorkflowApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one answer of the run listing.
    pub fn with_runs(mut self, runs: Vec<WorkflowRun>) -> Self {
        self.runs.get_mut().unwrap().push_back(Ok(runs));
        self
    }

    /// Queue a failing run listing.
    pub fn with_runs_error(mut self) -> Self {
        self.runs
            .get_mut()
            .unwrap()
            .push_back(Err("runs unavailable".to_string()));
        self
    }

    /// Queue one answer of the job listing behind `jobs_url`.
    pub fn with_jobs(mut self, jobs_url: &str, jobs: Vec<Job>) -> Self {
        self.jobs
            .get_mut()
            .unwrap()
            .entry(jobs_url.to_string())
            .or_default()
            .push_back(Ok(jobs));
        self
    }

    /// Queue a failing job listing behind `jobs_url`.
    pub fn with_jobs_error(mut self, jobs_url: &str) -> Self {
        self.jobs
            .get_mut()
            .unwrap()
            .entry(jobs_url.to_string())
            .or_default()
            .push_back(Err("jobs unavailable".to_string()));
        self
    }

    /// Make every dispatch fail.
    pub fn failing_dispatch(mut self) -> Self {
        self.fail_dispatch = true;
        self
    }

    /// `(image_name, correlation_id)` of every dispatch.
    pub fn dispatched(&self) -> Vec<(String, String)> {
        self.dispatched.lock().unwrap().clone()
    }

    /// Every listing call in order: `runs` or the jobs URL.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkflowApi for FakeWorkflowApi {
    async fn dispatch_workflow(
        &self,
        image_name: &str,
        correlation_id: &CorrelationId,
    ) -> Result<(), ClientError> {
        if self.fail_dispatch {
            return Err(ClientError::Decode {
                url: "dispatch".to_string(),
                message: "dispatch refused".to_string(),
            });
        }
        self.dispatched
            .lock()
            .unwrap()
            .push((image_name.to_string(), correlation_id.to_string()));
        Ok(())
    }

    async fn list_recent_runs(
        &self,
        _created_after: DateTime<Utc>,
    ) -> Result<Vec<WorkflowRun>, ClientError> {
        self.calls.lock().unwrap().push("runs".to_string());
        let mut runs = self.runs.lock().unwrap();
        if runs.is_empty() {
            return Ok(Vec::new());
        }
        next_answer(&mut runs, "runs")
    }

    async fn list_jobs(&self, jobs_url: &str) -> Result<Vec<Job>, ClientError> {
        self.calls.lock().unwrap().push(jobs_url.to_string());
        let mut jobs = {
            let mut scripted = self.jobs.lock().unwrap();
            let queue = scripted.entry(jobs_url.to_string()).or_default();
            next_answer(queue, jobs_url)?
        };

        if let Some((_, id)) = self.dispatched.lock().unwrap().last() {
            for step in jobs.iter_mut().flat_map(|job| job.steps.iter_mut()) {
                if step.name == DISPATCHED_ID {
                    step.name = id.clone();
                }
            }
        }
        Ok(jobs)
    }

    fn run_html_url(&self, run_id: u64) -> String {
        format!("https://github.test/acme/mirrors/actions/runs/{}", run_id)
    }
}

/// Clock that never blocks and records every requested sleep.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap()),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn sleep_count(&self) -> usize {
        self.sleeps.lock().unwrap().len()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(duration).unwrap();
    }
}

/// Sink that keeps every line, optionally hanging up after a number of lines.
#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
    closed: AtomicBool,
    hang_up_after: Option<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumer disappears once `lines` lines have been delivered.
    pub fn hanging_up_after(lines: usize) -> Self {
        Self {
            hang_up_after: Some(lines),
            ..Self::default()
        }
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatusSink for RecordingSink {
    async fn write(&self, line: &str) -> Result<(), SinkError> {
        if self.is_closed() {
            return Err(SinkError::Closed);
        }
        let mut lines = self.lines.lock().unwrap();
        lines.push(line.to_string());
        if self.hang_up_after == Some(lines.len()) {
            self.close();
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Jobs URL the fakes use for run `id`.
pub fn jobs_url(id: u64) -> String {
    format!("https://api.github.test/runs/{}/jobs", id)
}

/// A run in progress.
pub fn run(id: u64) -> WorkflowRun {
    WorkflowRun {
        id,
        status: RunStatus::InProgress,
        jobs_url: jobs_url(id),
    }
}

/// A job with the given `(name, status)` steps. The job status follows its
/// steps: queued without any, completed once all of them are.
pub fn job(name: &str, run_id: u64, steps: &[(&str, StepStatus)]) -> Job {
    let status = if steps.is_empty() {
        RunStatus::Queued
    } else if steps.iter().all(|(_, status)| status.is_completed()) {
        RunStatus::Completed
    } else {
        RunStatus::InProgress
    };
    Job {
        id: run_id * 100 + steps.len() as u64,
        name: name.to_string(),
        run_id,
        status,
        steps: steps
            .iter()
            .map(|(name, status)| Step {
                name: name.to_string(),
                status: *status,
            })
            .collect(),
    }
}

/// A job skipped by its condition: completed, without steps.
pub fn skipped_job(name: &str, run_id: u64) -> Job {
    Job {
        status: RunStatus::Completed,
        ..job(name, run_id, &[])
    }
}
