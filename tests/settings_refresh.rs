//! Integration tests for periodic settings refresh.

#![cfg(feature = "async")]

use crash_dispatch::infrastructure::mocks::MockPresenter;
use crash_dispatch::infrastructure::settings::{KEY_ONLY_MAIN, KEY_VERBOSE_LOG};
use crash_dispatch::{
    CachedSettings, CrashDescriptor, CrashHook, DispatchOutcome, PolicyAbort, PreferenceStore,
    RefresherConfig, SettingsProvider, SettingsRefresher, UiMode,
};
use std::sync::Arc;
use std::time::Duration;

fn secondary_process(pid: i32) -> CrashDescriptor {
    CrashDescriptor::builder(pid, "com.example:remote")
        .package_name("com.example")
        .build()
}

#[tokio::test]
async fn test_refreshed_settings_apply_to_next_dispatch() {
    let cache = Arc::new(CachedSettings::new(PreferenceStore::new()));
    let hook = CrashHook::builder()
        .with_self_package("io.crashdispatch")
        .with_settings(cache.clone())
        .with_presenter(Arc::new(MockPresenter::new()))
        .build()
        .unwrap();

    assert_eq!(
        hook.dispatch(&secondary_process(1)),
        Some(DispatchOutcome::ModeSelected(UiMode::Dialog))
    );

    let reload = Arc::clone(&cache);
    let handle = SettingsRefresher::new(RefresherConfig::new(Duration::from_millis(20)).unwrap())
        .start(move || reload.refresh());

    cache.source().set(KEY_ONLY_MAIN, "true");
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(
        hook.dispatch(&secondary_process(2)),
        Some(DispatchOutcome::AbortPolicy(PolicyAbort::MainOnly))
    );

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unavailable_storage_keeps_last_snapshot() {
    let store = PreferenceStore::new();
    store.set(KEY_VERBOSE_LOG, "true");
    let cache = Arc::new(CachedSettings::new(store));
    assert!(cache.snapshot().verbose_dispatch_log);

    cache.source().set_ready(false);
    cache.source().set(KEY_VERBOSE_LOG, "false");

    let reload = Arc::clone(&cache);
    let handle = SettingsRefresher::new(RefresherConfig::new(Duration::from_millis(20)).unwrap())
        .start(move || reload.refresh());

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(cache.snapshot().verbose_dispatch_log);
    assert!(cache.failed_refreshes() >= 1);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_stops_reloading() {
    let cache = Arc::new(CachedSettings::new(PreferenceStore::new()));
    let reload = Arc::clone(&cache);
    let handle = SettingsRefresher::new(RefresherConfig::new(Duration::from_millis(10)).unwrap())
        .start(move || reload.refresh());

    handle.shutdown().await.unwrap();

    cache.source().set(KEY_ONLY_MAIN, "true");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!cache.snapshot().only_show_errors_in_main);
}
