use anyhow::Result;
use hostmon::*;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let registry = Arc::new(registry::MetricsRegistry::new()?);
    let sysinfo_repo = Arc::new(sysinfo_repo::SysinfoRepo::new(&app_config.monitoring));

    let (from, to) = mailer::mailboxes(&app_config.email)?;
    let transport = mailer::smtp_transport(&app_config.email)?;
    let (mail_tx, mail_rx) = mpsc::channel(app_config.alerting.mail_queue_capacity);
    let mail_handle = mailer::spawn_mail_sender(mail_rx, transport, from, to);
    let dispatcher = dispatcher::AlertDispatcher::new(&app_config.alerting, mail_tx);

    let ticks_total = Arc::new(AtomicU64::new(0));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            sysinfo_repo,
            registry: registry.clone(),
            dispatcher,
            ticks_total,
            shutdown_rx,
        },
        worker::WorkerConfig {
            sample_interval_ms: app_config.monitoring.sample_interval_ms,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
            thresholds: app_config.thresholds,
        },
    );

    let app = routes::app(registry);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                tokio::signal::ctrl_c().await
            }
        } => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = worker_handle.await;
            // The worker owns the dispatcher, so joining it closes the mail
            // queue; the sender then drains within a bounded grace.
            let grace = std::time::Duration::from_secs(app_config.alerting.shutdown_grace_secs);
            if tokio::time::timeout(grace, mail_handle).await.is_err() {
                tracing::warn!(
                    grace_secs = app_config.alerting.shutdown_grace_secs,
                    "mail queue not drained before grace expired"
                );
            }
        }
    }

    Ok(())
}
