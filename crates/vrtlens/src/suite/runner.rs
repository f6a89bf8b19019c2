use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, mpsc};
use tracing::{Instrument, debug, info_span, warn};

use super::plan::PairJob;
use super::{PairOutcome, PairStatus, run_pair};
use crate::engine::VisualAnalysisEngine;

/// Analyse every job on a pool of workers sharing one queue.
///
/// Each pair runs on the blocking thread pool; a failing pair is reported as
/// an `Error` outcome rather than aborting the run.
///
/// Returns a `Receiver` immediately; outcomes stream in as pairs complete,
/// each with the time its analysis took.
pub fn analyze_all(
    engine: Arc<VisualAnalysisEngine>,
    jobs: Vec<PairJob>,
    parallel: usize,
    output_dir: Option<PathBuf>,
) -> mpsc::Receiver<(PairOutcome, Duration)> {
    let job_count = jobs.len();
    let worker_count = job_count.min(parallel.max(1));
    debug!(jobs = job_count, workers = worker_count, "starting suite run");

    let queue = Arc::new(Mutex::new(jobs));
    let (tx, rx) = mpsc::channel(parallel.max(1) * 2);

    for idx in 0..worker_count {
        let queue = queue.clone();
        let tx = tx.clone();
        let engine = engine.clone();
        let output_dir = output_dir.clone();
        let span = info_span!("worker", id = idx);
        tokio::spawn(
            async move {
                loop {
                    let job = {
                        let mut q = queue.lock().await;
                        match q.pop() {
                            Some(j) => j,
                            None => {
                                debug!("queue empty, exiting");
                                break;
                            }
                        }
                    };
                    debug!(pair = %job.id, "picked job");

                    let id = job.id.clone();
                    let engine = engine.clone();
                    let output_dir = output_dir.clone();
                    let started = Instant::now();
                    let outcome = tokio::task::spawn_blocking(move || {
                        run_pair(&engine, &job, output_dir.as_deref())
                    })
                    .await
                    .unwrap_or_else(|e| {
                        warn!(pair = %id, "analysis task panicked: {e}");
                        PairOutcome {
                            id,
                            status: PairStatus::Error,
                            report: None,
                            error: Some(format!("analysis task panicked: {e}")),
                        }
                    });

                    if tx.send((outcome, started.elapsed())).await.is_err() {
                        debug!("receiver dropped, stopping");
                        break;
                    }
                }
            }
            .instrument(span),
        );
    }

    rx
}
