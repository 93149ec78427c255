//! # crash-dispatch
//!
//! Deduplicated, policy-driven crash presentation for process hosts.
//!
//! A host that supervises many application processes learns about a single
//! crash through several independent interception points. This crate turns
//! those raw callbacks into one decision per crash: whether to show anything,
//! and if so how (a dialog, a notification or a toast). Every crash that gets
//! past deduplication and muting is also recorded for later inspection.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crash_dispatch::{CrashHook, RawCrashCallback, StaticSettings, DispatchSettings};
//! use std::sync::Arc;
//!
//! let settings = Arc::new(StaticSettings::new(
//!     DispatchSettings::new().with_only_main(true),
//! ));
//!
//! let hook = CrashHook::builder()
//!     .with_self_package("io.crashdispatch")
//!     .with_settings(settings)
//!     .build()
//!     .unwrap();
//!
//! // From each interception point, with whatever host objects it has:
//! # let record: Arc<dyn crash_dispatch::HostHandle> = unimplemented!();
//! let callback = RawCrashCallback::new().with_process_record(record);
//! let outcome = hook.on_crash_callback(&callback);
//! ```
//!
//! ## Pipeline
//!
//! Each callback goes through, in order:
//!
//! 1. **Extraction**: host objects are read through ordered accessor
//!    strategies, so different host versions resolve to the same
//!    [`CrashDescriptor`]. Nothing here can fail; missing fields take
//!    defaults.
//! 2. **Deduplication**: callbacks sharing `pid|user|process` within
//!    2500 ms collapse into one.
//! 3. **Muting**: packages muted until unlock or until restart are dropped.
//! 4. **Recording**: the crash is handed to the [`CrashRecorder`].
//! 5. **Self check**: a crash of the hosting component's own package gets a
//!    toast and an error log instead of normal UI.
//! 6. **Visibility filters**: "only in front" and "only main process".
//! 7. **Mode resolution**: dialog by default; with per-app configuration
//!    enabled, a global override beats the per-app mode.
//! 8. **Rendering** through the [`Presenter`], with a notification fallback
//!    when the dialog cannot be launched.
//!
//! ## Muting
//!
//! ```rust,no_run
//! # use crash_dispatch::{CrashHook, MuteKind, HostTrigger};
//! # let hook = CrashHook::builder().with_self_package("x").build().unwrap();
//! hook.mute("com.noisy.app", MuteKind::UntilUnlock);
//! hook.mute("com.other.app", MuteKind::UntilRestart);
//!
//! // When the device is unlocked:
//! hook.on_trigger(HostTrigger::DeviceUnlocked);
//! assert!(!hook.is_muted("com.noisy.app"));
//! assert!(hook.is_muted("com.other.app"));
//! ```
//!
//! Mutes live only in memory; a restarted host starts with none.
//!
//! ## Settings
//!
//! Settings are read on every dispatch through a [`SettingsProvider`].
//! [`StaticSettings`] holds a snapshot the embedder swaps;
//! [`CachedSettings`] reloads from a [`SettingsSource`] such as
//! [`PreferenceStore`] and keeps the last good snapshot when storage is not
//! ready. With the `async` feature, [`SettingsRefresher`] reloads on an
//! interval:
//!
//! ```rust,no_run
//! # #[cfg(feature = "async")]
//! # async fn example() {
//! use crash_dispatch::{CachedSettings, PreferenceStore, RefresherConfig, SettingsRefresher};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let cache = Arc::new(CachedSettings::new(PreferenceStore::new()));
//! let reload = Arc::clone(&cache);
//!
//! let handle = SettingsRefresher::new(RefresherConfig::new(Duration::from_secs(30)).unwrap())
//!     .start(move || reload.refresh());
//!
//! // On teardown:
//! handle.shutdown().await.unwrap();
//! # }
//! ```
//!
//! ## Fail-Safe Operation
//!
//! The hook runs inside the host's own crash handling, so nothing may escape
//! it. Every [`CrashHook`] entry point runs under `catch_unwind`; a panic is
//! logged at error level, counted in [`DispatchMetrics::internal_failures`]
//! and dropped.
//!
//! ## Observability
//!
//! ```rust,no_run
//! # use crash_dispatch::CrashHook;
//! # let hook = CrashHook::builder().with_self_package("x").build().unwrap();
//! let snapshot = hook.metrics().snapshot();
//! println!("Presented: {}", snapshot.crashes_presented);
//! println!("Duplicate rate: {:.2}%", snapshot.duplicate_rate() * 100.0);
//! ```
//!
//! The crate logs through `tracing` and never installs a subscriber.

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    descriptor::{CrashDescriptor, CrashDescriptorBuilder},
    message::CrashWording,
    mode::{DispatchOutcome, PolicyAbort, UiMode},
    mute::MuteKind,
    policy::DispatchSettings,
    record::{CrashInfo, CrashRecord},
    token::DedupToken,
};

pub use application::{
    deduplicator::{EventDeduplicator, DEFAULT_DEDUP_WINDOW},
    dispatcher::{CrashDispatcher, DispatchPorts},
    icon_cache::NotificationIconCache,
    metrics::{DispatchMetrics, DispatchMetricsSnapshot},
    mute_registry::MuteRegistry,
    ports::{
        AppCatalog, Clock, CrashRecorder, DialogRequest, HostHandle, HostValue, LaunchError,
        NotificationIcon, NotificationRequest, Presenter, SettingsError, SettingsProvider,
        SettingsSource,
    },
    refresher::{RefresherConfig, RefresherConfigError, SettingsRefresher, ShutdownError},
    triggers::HostTrigger,
};

#[cfg(feature = "async")]
pub use application::refresher::RefresherHandle;

pub use infrastructure::{
    catalog::StaticCatalog,
    clock::SystemClock,
    extraction::{CrashContextExtractor, HostLayout, RawCrashCallback},
    hook::{BuildError, CrashHook, CrashHookBuilder},
    memory_store::InMemoryCrashStore,
    presenter::LoggingPresenter,
    settings::{CachedSettings, PreferenceStore, StaticSettings},
};
