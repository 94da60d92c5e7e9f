use anyhow::Result;
use live_telemetry_sim::{config, store, telemetry, SettingsStore, TelemetryGenerator};
use config::Config;
use std::sync::Arc;
use store::FileStore;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;

    let store = Arc::new(FileStore::open(&cfg.store.path).await?);
    info!(path = %store.path().display(), "settings store opened");

    let settings = Arc::new(SettingsStore::load(store).await);
    let generator = TelemetryGenerator::new(settings.clone(), &cfg.simulation);

    if !generator.start() {
        warn!("simulation disabled in persisted settings; enable it to see live snapshots");
    }

    let mut snapshots = generator.subscribe();
    let shutdown = telemetry::shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                telemetry::log_snapshot(&snapshot);
            }
        }
    }

    generator.stop();
    settings.shutdown().await;

    warn!("shutdown complete");
    Ok(())
}
