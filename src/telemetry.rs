use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::{Resolution, Snapshot};

/// JSON logs filtered by `RUST_LOG`, defaulting to info
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,live_telemetry_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// Resolves on Ctrl+C or SIGTERM and names the signal that arrived. A
/// handler that cannot be installed is logged and never fires.
pub async fn shutdown_signal() -> &'static str {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let received = tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    };
    info!(signal = received, "shutdown signal received, stopping simulation");
    received
}

/// Emit one structured log line for a published snapshot
pub fn log_snapshot(snapshot: &Snapshot) {
    let breakdown = match serde_json::to_string(&snapshot.devices) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "device breakdown not serializable");
            String::new()
        }
    };
    let latest_hour = snapshot
        .series(Resolution::Day)
        .and_then(|s| s.latest())
        .unwrap_or_default();

    info!(
        sequence = snapshot.sequence,
        generated_at = %snapshot.generated_at,
        current_usage_kw = snapshot.current_usage,
        current_usage_change = snapshot.current_usage_change,
        daily_usage_kwh = snapshot.daily_usage,
        daily_usage_change = snapshot.daily_usage_change,
        potential_savings = snapshot.potential_savings,
        potential_savings_amount = snapshot.potential_savings_amount,
        neighborhood_kwh = snapshot.neighborhood_value,
        efficient_kwh = snapshot.efficient_value,
        latest_hour_kw = latest_hour,
        breakdown = %breakdown,
        "snapshot published"
    );
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_sigterm_resolves_shutdown_signal() {
        let signal = shutdown_signal();
        tokio::pin!(signal);

        // first poll installs the handlers
        assert!(timeout(Duration::from_millis(20), &mut signal).await.is_err());

        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        let received = timeout(Duration::from_secs(5), &mut signal).await.unwrap();
        assert_eq!(received, "SIGTERM");
    }
}
