// Background sampling worker. Collection, gauge updates, and threshold
// evaluation run here; delivery runs in the dedicated mail sender task (channel).

use crate::config::Thresholds;
use crate::dispatcher::AlertDispatcher;
use crate::evaluator;
use crate::registry::MetricsRegistry;
use crate::sysinfo_repo::SysinfoRepo;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Instant;
use tokio::time::{Duration, interval};
use tracing::Instrument;

/// Repos, dispatcher, and shutdown for the worker.
pub struct WorkerDeps {
    pub sysinfo_repo: Arc<SysinfoRepo>,
    pub registry: Arc<MetricsRegistry>,
    pub dispatcher: AlertDispatcher,
    pub ticks_total: Arc<AtomicU64>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing and logging config.
/// Stats logging uses a real-time interval, independent of sample_interval_ms.
pub struct WorkerConfig {
    pub sample_interval_ms: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
    pub thresholds: Thresholds,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        sysinfo_repo,
        registry,
        mut dispatcher,
        ticks_total,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        sample_interval_ms,
        stats_log_interval_secs,
        thresholds,
    } = config;

    let stats_log_interval = Duration::from_secs(stats_log_interval_secs);
    let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", sample_interval_ms);

    tokio::spawn(
        async move {
            let mut tick = interval(Duration::from_millis(sample_interval_ms));
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut stats_log_tick = interval(stats_log_interval);
            stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            let mut sampling_failures_total: u64 = 0;
            let mut alerts_sent_total: u64 = 0;
            let mut alerts_suppressed_total: u64 = 0;

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        ticks_total.fetch_add(1, std::sync::atomic::Ordering::Relaxed);

                        let snapshot = match sysinfo_repo.sample().await {
                            Ok(s) => s,
                            Err(e) => {
                                sampling_failures_total += 1;
                                tracing::warn!(
                                    error = %e,
                                    operation = "sample",
                                    "metric sampling failed"
                                );
                                continue;
                            }
                        };

                        if let Err(e) = registry.update(&snapshot) {
                            tracing::warn!(
                                error = %e,
                                operation = "update_registry",
                                "gauge update failed"
                            );
                            continue;
                        }

                        let conditions = evaluator::evaluate(&snapshot, &thresholds);
                        let summary = dispatcher.dispatch(&conditions, Instant::now());
                        alerts_sent_total += summary.sent;
                        alerts_suppressed_total += summary.suppressed;
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Worker shutting down");
                        break;
                    }
                    _ = stats_log_tick.tick() => {
                        tracing::info!(
                            ticks_total = ticks_total.load(std::sync::atomic::Ordering::Relaxed),
                            sampling_failures_total,
                            alerts_sent_total,
                            alerts_suppressed_total,
                            "app stats"
                        );
                    }
                }
            }
        }
        .instrument(worker_span),
    )
}
