use anyhow::Result;
use crowsnest_history::{DateWindow, HistoryStore};
use crowsnest_monitor::config::MonitorConfig;
use crowsnest_monitor::scheduler::MonitorScheduler;
use crowsnest_monitor::view;
use crowsnest_telemetry::local::LocalSource;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tokio::time::{interval, Duration};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("crowsnest_monitor=info".parse()?)
                .add_directive("crowsnest_telemetry=info".parse()?)
                .add_directive("crowsnest_history=info".parse()?),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => MonitorConfig::load(&path)?,
        None => MonitorConfig::default(),
    };

    tracing::info!(
        session_id = %config.session_id,
        interval_secs = config.interval_secs,
        history_path = %config.history_path,
        "crowsnest-monitor starting"
    );

    let history = Arc::new(HistoryStore::open(Path::new(&config.history_path)));
    let scheduler = Arc::new(MonitorScheduler::new(&config, history.clone()));
    scheduler.add_session(&config.session_id, Arc::new(LocalSource::new()));

    let mut tick = interval(Duration::from_secs(config.interval_secs));
    loop {
        tokio::select! {
            _ = tick.tick() => {
                scheduler.run_once().await;
                let panel = view::build_panel(&scheduler, &config.session_id, None, DateWindow::All);
                tracing::info!(
                    session_id = %config.session_id,
                    active = panel.current.len(),
                    recorded = history.len(),
                    "Evaluation cycle complete"
                );
            }
            _ = signal::ctrl_c() => {
                tracing::info!("Shutting down gracefully");
                break;
            }
        }
    }

    Ok(())
}
