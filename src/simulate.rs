//! Load driver that hammers an admission gate from concurrent callers.
//!
//! Each worker issues a burst of admission checks, pauses, and repeats until
//! the run time is used up. Every worker completes at least one round.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::LoadSettings;
use crate::ratelimit::AdmissionControl;

/// Shape of a load run.
#[derive(Debug, Clone)]
pub struct LoadPlan {
    /// Number of concurrent callers
    pub workers: usize,
    /// Admission checks per caller per round
    pub burst: usize,
    /// Pause between rounds
    pub pause: Duration,
    /// Total run time
    pub duration: Duration,
}

impl From<&LoadSettings> for LoadPlan {
    fn from(settings: &LoadSettings) -> Self {
        Self {
            workers: settings.workers,
            burst: settings.burst,
            pause: Duration::from_millis(settings.pause_ms),
            duration: Duration::from_millis(settings.duration_ms),
        }
    }
}

/// Outcome of a load run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub attempts: u64,
    pub admitted: u64,
    pub rejected: u64,
    pub rounds: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Default)]
struct WorkerStats {
    attempts: u64,
    admitted: u64,
    rounds: u64,
}

/// Run `plan` against `admission` and collect the totals.
pub async fn run_load<A>(admission: Arc<A>, plan: LoadPlan) -> LoadReport
where
    A: AdmissionControl + ?Sized + 'static,
{
    let start = Instant::now();
    let deadline = start + plan.duration;

    let handles: Vec<_> = (0..plan.workers)
        .map(|worker| {
            let admission = Arc::clone(&admission);
            let plan = plan.clone();
            tokio::spawn(async move {
                let stats = run_worker(admission.as_ref(), &plan, deadline).await;
                debug!(
                    worker = worker,
                    attempts = stats.attempts,
                    admitted = stats.admitted,
                    rounds = stats.rounds,
                    "Load worker finished"
                );
                stats
            })
        })
        .collect();

    let mut report = LoadReport::default();
    for result in join_all(handles).await {
        match result {
            Ok(stats) => {
                report.attempts += stats.attempts;
                report.admitted += stats.admitted;
                report.rounds += stats.rounds;
            }
            Err(e) => warn!(error = %e, "Load worker failed"),
        }
    }
    report.rejected = report.attempts - report.admitted;
    report.elapsed = start.elapsed();

    info!(
        attempts = report.attempts,
        admitted = report.admitted,
        rejected = report.rejected,
        rounds = report.rounds,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Load run complete"
    );

    report
}

async fn run_worker<A>(admission: &A, plan: &LoadPlan, deadline: Instant) -> WorkerStats
where
    A: AdmissionControl + ?Sized,
{
    let mut stats = WorkerStats::default();

    loop {
        for _ in 0..plan.burst {
            stats.attempts += 1;
            if admission.try_admit() {
                stats.admitted += 1;
            }
        }
        stats.rounds += 1;

        if Instant::now() + plan.pause > deadline {
            break;
        }
        tokio::time::sleep(plan.pause).await;
    }

    stats
}
