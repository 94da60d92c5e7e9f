//! Timer-driven generator behaviour under a paused tokio clock.

use live_telemetry_sim::config::SimulationConfig;
use live_telemetry_sim::store::MemoryStore;
use live_telemetry_sim::{SettingsStore, Snapshot, TelemetryGenerator};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

fn seeded() -> SimulationConfig {
    SimulationConfig {
        random_seed: Some(7),
        ..Default::default()
    }
}

async fn generator() -> TelemetryGenerator {
    let settings = Arc::new(SettingsStore::in_memory().await);
    TelemetryGenerator::new(settings, &seeded())
}

#[tokio::test(start_paused = true)]
async fn test_three_firings_replace_snapshot_three_times() {
    let generator = generator().await;
    assert_eq!(generator.settings().update_interval_ms(), 3000);

    let mut previous = generator.snapshot();
    assert!(generator.start());

    // nothing fires before the first full interval
    sleep(Duration::from_millis(100)).await;
    assert!(Arc::ptr_eq(&previous, &generator.snapshot()));

    for expected in 1..=3u64 {
        sleep(Duration::from_millis(3000)).await;
        let current = generator.snapshot();
        assert!(!Arc::ptr_eq(&previous, &current));
        assert_eq!(current.sequence, expected);
        assert_eq!(current.percentage_total(), 100);
        previous = current;
    }
}

#[tokio::test(start_paused = true)]
async fn test_stop_prevents_further_ticks() {
    let generator = generator().await;
    generator.start();

    sleep(Duration::from_millis(3100)).await;
    assert_eq!(generator.snapshot().sequence, 1);

    generator.stop();
    assert!(!generator.is_running());

    sleep(Duration::from_secs(60)).await;
    assert_eq!(generator.snapshot().sequence, 1);
}

#[tokio::test(start_paused = true)]
async fn test_double_toggle_from_disabled_leaves_nothing_scheduled() {
    let settings = Arc::new(SettingsStore::in_memory().await);
    settings.set_enabled(false);
    let generator = TelemetryGenerator::new(settings, &seeded());
    assert!(!generator.start());

    assert!(generator.toggle());
    assert!(generator.is_running());
    assert!(!generator.toggle());
    assert!(!generator.is_running());
    assert!(!generator.is_simulation_enabled());

    sleep(Duration::from_secs(30)).await;
    assert_eq!(generator.snapshot().sequence, 0);
}

#[tokio::test(start_paused = true)]
async fn test_double_toggle_from_running_resumes() {
    let generator = generator().await;
    generator.start();

    assert!(!generator.toggle());
    assert!(!generator.is_running());
    assert!(generator.toggle());
    assert!(generator.is_running());
    assert!(generator.is_simulation_enabled());

    sleep(Duration::from_millis(3100)).await;
    assert_eq!(generator.snapshot().sequence, 1);
}

#[tokio::test(start_paused = true)]
async fn test_interval_change_reschedules_without_reset() {
    let generator = generator().await;
    generator.start();

    sleep(Duration::from_millis(3100)).await;
    let before = generator.snapshot();
    assert_eq!(before.sequence, 1);

    assert_eq!(generator.set_update_interval(500), 1000);
    assert!(generator.is_running());
    assert!(Arc::ptr_eq(&before, &generator.snapshot()));

    // new task fires at +1000 and +2000
    sleep(Duration::from_millis(2050)).await;
    assert_eq!(generator.snapshot().sequence, 3);
}

#[tokio::test(start_paused = true)]
async fn test_manual_and_scheduled_ticks_share_one_sequence() {
    let generator = generator().await;
    generator.start();

    generator.manual_refresh();
    generator.manual_refresh();
    assert_eq!(generator.snapshot().sequence, 2);

    sleep(Duration::from_millis(3100)).await;
    assert_eq!(generator.snapshot().sequence, 3);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_generator_cancels_ticker() {
    let generator = generator().await;
    let rx = generator.subscribe();
    generator.start();
    drop(generator);

    sleep(Duration::from_secs(30)).await;
    assert_eq!(rx.borrow().sequence, 0);
}

#[tokio::test]
async fn test_zero_daily_usage_tick_keeps_breakdown_at_100() {
    let settings = Arc::new(SettingsStore::in_memory().await);
    let crafted = Snapshot {
        daily_usage: 0.0,
        ..Snapshot::seed()
    };
    let generator = TelemetryGenerator::with_snapshot(settings, &seeded(), crafted);

    let next = generator.tick();
    assert_eq!(next.percentage_total(), 100);
    assert_eq!(next.daily_usage_change, 0.0);
}

#[tokio::test]
async fn test_toggle_and_interval_are_persisted() {
    let store = Arc::new(MemoryStore::new());
    let settings = Arc::new(SettingsStore::load(store.clone()).await);
    let generator = TelemetryGenerator::new(settings.clone(), &seeded());
    generator.start();

    generator.set_update_interval(99_999);
    generator.toggle();
    settings.flush().await;

    let reloaded = SettingsStore::load(store).await;
    assert!(!reloaded.is_enabled());
    assert_eq!(reloaded.update_interval_ms(), 10_000);
    assert!(!generator.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_disabling_through_settings_stops_generator() {
    let generator = generator().await;
    let settings = generator.settings().clone();
    assert!(generator.start());

    settings.set_enabled(false);
    sleep(Duration::from_millis(9100)).await;

    assert!(!generator.is_running());
    assert_eq!(generator.snapshot().sequence, 0);
}

#[tokio::test(start_paused = true)]
async fn test_interval_change_through_settings_reschedules() {
    let generator = generator().await;
    let settings = generator.settings().clone();
    assert!(generator.start());

    assert_eq!(settings.set_update_interval(1000), 1000);
    sleep(Duration::from_millis(2500)).await;

    assert!(generator.is_running());
    assert_eq!(generator.snapshot().sequence, 2);
}

#[tokio::test(start_paused = true)]
async fn test_enabling_through_settings_starts_generator() {
    let settings = Arc::new(SettingsStore::in_memory().await);
    settings.set_enabled(false);
    let generator = TelemetryGenerator::new(settings.clone(), &seeded());
    assert!(!generator.start());

    settings.set_enabled(true);
    sleep(Duration::from_millis(3100)).await;

    assert!(generator.is_running());
    assert_eq!(generator.snapshot().sequence, 1);
}

#[tokio::test(start_paused = true)]
async fn test_settings_changes_after_stop_are_ignored() {
    let generator = generator().await;
    let settings = generator.settings().clone();
    generator.start();
    generator.stop();

    settings.set_update_interval(1000);
    settings.toggle();
    settings.toggle();
    sleep(Duration::from_secs(10)).await;

    assert!(!generator.is_running());
    assert_eq!(generator.snapshot().sequence, 0);
}
