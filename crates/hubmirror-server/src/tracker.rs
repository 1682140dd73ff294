//! Workflow run tracker.
//!
//! Finds the run a dispatch produced and follows its jobs until every step
//! has completed. The GitHub API does not return the id of a run created by
//! a dispatch, so the run is recognized by a job step named after the
//! correlation id.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use hubmirror_client::WorkflowApi;
use hubmirror_core::{CorrelationId, Job};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::TrackerError;
use crate::sink::StatusSink;

/// Job that only exists to expose the correlation id. Never reported.
pub const ID_PROVIDER_JOB: &str = "Workflow ID Provider";

/// Tracker timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Delay between two polls.
    pub poll_interval: Duration,
    /// How far back runs are listed while searching.
    pub run_lookback: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            run_lookback: Duration::from_secs(5 * 60),
        }
    }
}

/// Where a tracking session stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingState {
    /// Listing recent runs for the one carrying the correlation id.
    Searching,
    /// The run is identified but not yet announced.
    Found { run_id: u64, jobs_url: String },
    /// Following job steps.
    Polling { run_id: u64, jobs_url: String },
    /// Every qualifying step completed.
    Done { run_id: u64 },
}

/// Per-request tracking state.
#[derive(Debug)]
pub struct TrackingSession {
    correlation_id: CorrelationId,
    state: TrackingState,
    reported_steps: HashSet<String>,
}

impl TrackingSession {
    pub fn new(correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id,
            state: TrackingState::Searching,
            reported_steps: HashSet::new(),
        }
    }

    pub fn state(&self) -> &TrackingState {
        &self.state
    }

    /// Names of the steps already announced.
    pub fn reported_steps(&self) -> &HashSet<String> {
        &self.reported_steps
    }
}

/// Outcome of a single [`WorkflowTracker::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Advance again right away.
    Continue,
    /// Sleep one poll interval before advancing again.
    Wait,
    /// The run finished.
    Finished { run_id: u64 },
}

/// Follows dispatched workflow runs.
pub struct WorkflowTracker {
    api: Arc<dyn WorkflowApi>,
    clock: Arc<dyn Clock>,
    config: TrackerConfig,
}

impl WorkflowTracker {
    pub fn new(api: Arc<dyn WorkflowApi>, clock: Arc<dyn Clock>, config: TrackerConfig) -> Self {
        Self { api, clock, config }
    }

    /// Follow the run tagged with `correlation_id` to completion and return
    /// its id.
    ///
    /// Remote failures are not retried. The loop ends early once the sink
    /// reports that its consumer is gone.
    pub async fn follow(
        &self,
        sink: &dyn StatusSink,
        correlation_id: &CorrelationId,
    ) -> Result<u64, TrackerError> {
        let mut session = TrackingSession::new(correlation_id.clone());

        loop {
            if sink.is_closed() {
                warn!(
                    correlation_id = %correlation_id,
                    state = ?session.state,
                    "Status consumer gone, abandoning run"
                );
                return Err(TrackerError::SinkClosed);
            }

            match self.advance(&mut session, sink).await? {
                Progress::Continue => {}
                Progress::Wait => self.clock.sleep(self.config.poll_interval).await,
                Progress::Finished { run_id } => return Ok(run_id),
            }
        }
    }

    /// Perform one transition of `session`.
    pub async fn advance(
        &self,
        session: &mut TrackingSession,
        sink: &dyn StatusSink,
    ) -> Result<Progress, TrackerError> {
        match session.state.clone() {
            TrackingState::Searching => self.search(session, sink).await,
            TrackingState::Found { run_id, jobs_url } => {
                let link = self.api.run_html_url(run_id);
                info!(
                    correlation_id = %session.correlation_id,
                    run_id,
                    "Workflow run found"
                );
                sink.write(&format!("✨ Workflow run found – {}", link))
                    .await?;
                session.state = TrackingState::Polling { run_id, jobs_url };
                Ok(Progress::Continue)
            }
            TrackingState::Polling { run_id, jobs_url } => {
                self.poll(session, sink, run_id, &jobs_url).await
            }
            TrackingState::Done { run_id } => Ok(Progress::Finished { run_id }),
        }
    }

    async fn search(
        &self,
        session: &mut TrackingSession,
        sink: &dyn StatusSink,
    ) -> Result<Progress, TrackerError> {
        let lookback = chrono::Duration::from_std(self.config.run_lookback)
            .unwrap_or_else(|_| chrono::Duration::minutes(5));
        let runs = self.api.list_recent_runs(self.clock.now() - lookback).await?;

        if runs.is_empty() {
            sink.write("⏳ No workflow runs found yet").await?;
            return Ok(Progress::Wait);
        }

        let marker = session.correlation_id.as_str();
        for run in runs {
            debug!(run_id = run.id, status = ?run.status, "Scanning run for correlation id");
            let jobs = self.api.list_jobs(&run.jobs_url).await?;
            if let Some(job) = jobs.iter().find(|job| job.has_step_named(marker)) {
                session.state = TrackingState::Found {
                    run_id: job.run_id,
                    jobs_url: run.jobs_url,
                };
                return Ok(Progress::Continue);
            }
        }

        debug!(correlation_id = %marker, "No recent run carries the correlation id");
        Ok(Progress::Wait)
    }

    async fn poll(
        &self,
        session: &mut TrackingSession,
        sink: &dyn StatusSink,
        run_id: u64,
        jobs_url: &str,
    ) -> Result<Progress, TrackerError> {
        let jobs = self.api.list_jobs(jobs_url).await?;

        let mut qualifying = 0;
        let mut finished = true;
        for job in jobs.iter().filter(|job| job.name != ID_PROVIDER_JOB) {
            qualifying += 1;
            if !report_completed_steps(session, sink, job).await? {
                finished = false;
            }
        }

        if qualifying == 0 || !finished {
            debug!(run_id, qualifying, "Workflow run still in progress");
            return Ok(Progress::Wait);
        }

        sink.write("🎉 All workflow steps completed").await?;
        info!(
            correlation_id = %session.correlation_id,
            run_id,
            "Workflow run completed"
        );
        session.state = TrackingState::Done { run_id };
        Ok(Progress::Finished { run_id })
    }
}

/// Announce newly completed steps of `job`. Returns true if all of its
/// steps are complete. A job without steps is complete only once the job
/// itself has completed, which is how skipped jobs are reported.
async fn report_completed_steps(
    session: &mut TrackingSession,
    sink: &dyn StatusSink,
    job: &Job,
) -> Result<bool, TrackerError> {
    let total = job.steps.len();
    let mut complete = total > 0 || job.status.is_terminal();

    for (index, step) in job.steps.iter().enumerate() {
        if !step.status.is_completed() {
            complete = false;
            continue;
        }
        if session.reported_steps.insert(step.name.clone()) {
            debug!(job = %job.name, step = %step.name, "Step completed");
            sink.write(&format!(
                "🔄 Completed step {}/{}: {}",
                index + 1,
                total,
                step.name
            ))
            .await?;
        }
    }

    Ok(complete)
}
