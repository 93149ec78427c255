//! Entry point wired into the host's crash callbacks.
//!
//! `CrashHook` owns the extractor and the dispatcher and makes sure nothing
//! raised inside them reaches the host: every entry point runs under
//! `catch_unwind`, and a caught panic is logged, counted and dropped.

use crate::application::{
    deduplicator::{EventDeduplicator, DEFAULT_DEDUP_WINDOW},
    dispatcher::{CrashDispatcher, DispatchPorts},
    metrics::DispatchMetrics,
    mute_registry::MuteRegistry,
    ports::{AppCatalog, Clock, CrashRecorder, Presenter, SettingsProvider},
    triggers::HostTrigger,
};
use crate::domain::{descriptor::CrashDescriptor, mode::DispatchOutcome, mute::MuteKind};
use crate::infrastructure::{
    catalog::StaticCatalog,
    clock::SystemClock,
    extraction::{CrashContextExtractor, HostLayout, RawCrashCallback},
    memory_store::{InMemoryCrashStore, DEFAULT_MAX_RECORDS},
    presenter::LoggingPresenter,
    settings::StaticSettings,
};
use std::any::Any;
use std::panic;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Error returned when building a `CrashHook` fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The hosting component's package name must be set and non-empty
    EmptySelfPackage,
    /// Dedup window duration must be greater than zero
    ZeroDedupWindow,
    /// The default record store must be allowed at least one record
    ZeroMaxRecords,
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::EmptySelfPackage => write!(f, "self package must not be empty"),
            BuildError::ZeroDedupWindow => write!(f, "dedup window must be greater than 0"),
            BuildError::ZeroMaxRecords => write!(f, "max records must be greater than 0"),
        }
    }
}

impl std::error::Error for BuildError {}

/// Builder for constructing a `CrashHook`.
#[derive(Debug)]
pub struct CrashHookBuilder {
    self_package: Option<String>,
    dedup_window: Duration,
    clock: Option<Arc<dyn Clock>>,
    settings: Option<Arc<dyn SettingsProvider>>,
    recorder: Option<Arc<dyn CrashRecorder>>,
    max_records: usize,
    presenter: Option<Arc<dyn Presenter>>,
    catalog: Option<Arc<dyn AppCatalog>>,
    mutes: Option<Arc<MuteRegistry>>,
    layout: HostLayout,
}

impl CrashHookBuilder {
    /// Set the package of the component hosting the hook.
    ///
    /// Crashes of this package get a toast and an error log instead of the
    /// normal pipeline.
    pub fn with_self_package(mut self, package: impl Into<String>) -> Self {
        self.self_package = Some(package.into());
        self
    }

    /// Set the window within which callbacks for one crash are collapsed.
    ///
    /// Defaults to 2500 ms.
    pub fn with_dedup_window(mut self, window: Duration) -> Self {
        self.dedup_window = window;
        self
    }

    /// Set a custom clock (mainly for tests).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the settings provider. Defaults to `StaticSettings` with every flag off.
    pub fn with_settings(mut self, settings: Arc<dyn SettingsProvider>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Set the crash record store. Defaults to `InMemoryCrashStore`.
    pub fn with_recorder(mut self, recorder: Arc<dyn CrashRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Cap the default in-memory store; the oldest records are dropped first.
    ///
    /// Defaults to 1024. Ignored when a recorder is supplied.
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    /// Set the UI presenter. Defaults to `LoggingPresenter`.
    pub fn with_presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    /// Set the app catalog. Defaults to a permissive `StaticCatalog`.
    pub fn with_catalog(mut self, catalog: Arc<dyn AppCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Share an existing mute registry.
    pub fn with_mute_registry(mut self, mutes: Arc<MuteRegistry>) -> Self {
        self.mutes = Some(mutes);
        self
    }

    /// Use custom accessor tables for extraction.
    pub fn with_layout(mut self, layout: HostLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Build the hook.
    ///
    /// # Errors
    /// Returns `BuildError` if the self package is missing, or if the dedup
    /// window or record cap is zero.
    pub fn build(self) -> Result<CrashHook, BuildError> {
        let self_package = match self.self_package {
            Some(package) if !package.trim().is_empty() => package,
            _ => return Err(BuildError::EmptySelfPackage),
        };
        if self.dedup_window.is_zero() {
            return Err(BuildError::ZeroDedupWindow);
        }
        if self.max_records == 0 {
            return Err(BuildError::ZeroMaxRecords);
        }

        let max_records = self.max_records;
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        let ports = DispatchPorts {
            clock: Arc::clone(&clock),
            settings: self
                .settings
                .unwrap_or_else(|| Arc::new(StaticSettings::default())),
            recorder: self
                .recorder
                .unwrap_or_else(|| Arc::new(InMemoryCrashStore::with_max_records(max_records))),
            presenter: self
                .presenter
                .unwrap_or_else(|| Arc::new(LoggingPresenter::new())),
            catalog: self
                .catalog
                .unwrap_or_else(|| Arc::new(StaticCatalog::permissive())),
        };
        let dedup = EventDeduplicator::with_window(clock, self.dedup_window);
        let mutes = self.mutes.unwrap_or_default();

        debug!(
            self_package = %self_package,
            dedup_window_ms = self.dedup_window.as_millis() as u64,
            "crash hook built"
        );

        Ok(CrashHook {
            dispatcher: Arc::new(CrashDispatcher::new(dedup, mutes, ports, self_package)),
            extractor: CrashContextExtractor::with_layout(self.layout),
        })
    }
}

/// Fail-safe entry point for crash callbacks and management calls.
///
/// Cloning is cheap and clones share all state.
#[derive(Debug, Clone)]
pub struct CrashHook {
    dispatcher: Arc<CrashDispatcher>,
    extractor: CrashContextExtractor,
}

impl CrashHook {
    /// Create a builder.
    pub fn builder() -> CrashHookBuilder {
        CrashHookBuilder {
            self_package: None,
            dedup_window: DEFAULT_DEDUP_WINDOW,
            clock: None,
            settings: None,
            recorder: None,
            max_records: DEFAULT_MAX_RECORDS,
            presenter: None,
            catalog: None,
            mutes: None,
            layout: HostLayout::default(),
        }
    }

    /// Handle a raw crash callback.
    ///
    /// Returns `None` if extraction or dispatch panicked; the panic is
    /// logged and never propagates to the caller.
    pub fn on_crash_callback(&self, raw: &RawCrashCallback) -> Option<DispatchOutcome> {
        self.guarded("crash callback", || {
            let descriptor = self.extractor.extract(raw);
            self.dispatcher.dispatch(&descriptor)
        })
    }

    /// Dispatch an already built descriptor under the same guard.
    pub fn dispatch(&self, descriptor: &CrashDescriptor) -> Option<DispatchOutcome> {
        self.guarded("dispatch", || self.dispatcher.dispatch(descriptor))
    }

    /// React to a host trigger.
    pub fn on_trigger(&self, trigger: HostTrigger) {
        self.guarded("host trigger", || self.dispatcher.on_trigger(trigger));
    }

    /// React to a host broadcast action. Returns `false` for unknown actions.
    pub fn on_broadcast(&self, action: &str) -> bool {
        match HostTrigger::from_action(action) {
            Some(trigger) => {
                self.on_trigger(trigger);
                true
            }
            None => false,
        }
    }

    /// Mute crash UI for a package.
    pub fn mute(&self, package: &str, kind: MuteKind) {
        self.dispatcher.mutes().mute(package, kind);
    }

    /// Unmute a package for one kind.
    pub fn unmute(&self, package: &str, kind: MuteKind) {
        self.dispatcher.mutes().unmute(package, kind);
    }

    /// Clear every mute.
    pub fn unmute_all(&self) {
        self.dispatcher.mutes().unmute_all();
    }

    /// Check whether a package is muted under either kind.
    pub fn is_muted(&self, package: &str) -> bool {
        self.dispatcher.mutes().is_muted(package)
    }

    /// List every mute as `(kind, package)`.
    pub fn list_muted(&self) -> Vec<(MuteKind, String)> {
        self.dispatcher.mutes().list_muted()
    }

    /// Get the dispatch metrics.
    pub fn metrics(&self) -> &DispatchMetrics {
        self.dispatcher.metrics()
    }

    /// Get the crash record store.
    pub fn recorder(&self) -> &Arc<dyn CrashRecorder> {
        &self.dispatcher.ports().recorder
    }

    /// Get the underlying dispatcher.
    pub fn dispatcher(&self) -> &CrashDispatcher {
        &self.dispatcher
    }

    /// Get the extractor.
    pub fn extractor(&self) -> &CrashContextExtractor {
        &self.extractor
    }

    fn guarded<R>(&self, entry: &'static str, f: impl FnOnce() -> R) -> Option<R> {
        match panic::catch_unwind(panic::AssertUnwindSafe(f)) {
            Ok(value) => Some(value),
            Err(payload) => {
                self.dispatcher.metrics().record_internal_failure();
                error!(
                    entry,
                    panic = panic_message(payload.as_ref()),
                    "crash dispatch failed internally, ignoring"
                );
                None
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        DialogRequest, HostValue, LaunchError, NotificationIcon, NotificationRequest,
    };
    use crate::domain::mode::UiMode;
    use crate::infrastructure::mocks::{MockCaptureLayer, MockClock, MockHandle, MockPresenter};
    use std::time::Instant;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Debug)]
    struct PanickingPresenter;

    impl Presenter for PanickingPresenter {
        fn show_dialog(&self, _request: &DialogRequest) -> Result<(), LaunchError> {
            panic!("renderer exploded");
        }

        fn post_notification(&self, _request: &NotificationRequest) {}

        fn show_toast(&self, _text: &str) {}

        fn build_notification_icon(&self) -> NotificationIcon {
            NotificationIcon {
                size: 1,
                bytes: Arc::from(vec![0u8]),
            }
        }
    }

    fn raw(pid: i64) -> RawCrashCallback {
        let info = MockHandle::new()
            .with_field("packageName", HostValue::Str("com.example".into()))
            .into_handle();
        let record = MockHandle::new()
            .with_field("pid", HostValue::Int(pid))
            .with_field("processName", HostValue::Str("com.example".into()))
            .with_field("info", HostValue::Handle(info))
            .into_handle();
        RawCrashCallback::new().with_process_record(record)
    }

    #[test]
    fn test_build_requires_self_package() {
        assert_eq!(
            CrashHook::builder().build().unwrap_err(),
            BuildError::EmptySelfPackage
        );
        assert_eq!(
            CrashHook::builder()
                .with_self_package("  ")
                .build()
                .unwrap_err(),
            BuildError::EmptySelfPackage
        );
    }

    #[test]
    fn test_build_rejects_zero_window() {
        let result = CrashHook::builder()
            .with_self_package("io.crashdispatch")
            .with_dedup_window(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(BuildError::ZeroDedupWindow)));
    }

    #[test]
    fn test_build_rejects_zero_max_records() {
        let result = CrashHook::builder()
            .with_self_package("io.crashdispatch")
            .with_max_records(0)
            .build();
        assert!(matches!(result, Err(BuildError::ZeroMaxRecords)));
    }

    #[test]
    fn test_default_store_is_capped() {
        let hook = CrashHook::builder()
            .with_self_package("io.crashdispatch")
            .with_presenter(Arc::new(MockPresenter::new()))
            .with_max_records(2)
            .build()
            .unwrap();

        for pid in 1..=4 {
            hook.on_crash_callback(&raw(pid));
        }

        let pids: Vec<i32> = hook.recorder().list().iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![3, 4]);
    }

    #[test]
    fn test_build_error_display() {
        assert_eq!(
            BuildError::ZeroDedupWindow.to_string(),
            "dedup window must be greater than 0"
        );
    }

    #[test]
    fn test_callback_dispatches_through_extractor() {
        let presenter = Arc::new(MockPresenter::new());
        let hook = CrashHook::builder()
            .with_self_package("io.crashdispatch")
            .with_presenter(presenter.clone())
            .build()
            .unwrap();

        let outcome = hook.on_crash_callback(&raw(100));

        assert_eq!(outcome, Some(DispatchOutcome::ModeSelected(UiMode::Dialog)));
        assert_eq!(presenter.dialogs()[0].pid, 100);
        assert_eq!(hook.recorder().records_for_pid(100).len(), 1);
    }

    #[test]
    fn test_custom_window_is_used() {
        let clock = Arc::new(MockClock::new(Instant::now()));
        let hook = CrashHook::builder()
            .with_self_package("io.crashdispatch")
            .with_clock(clock.clone())
            .with_presenter(Arc::new(MockPresenter::new()))
            .with_dedup_window(Duration::from_millis(100))
            .build()
            .unwrap();

        hook.on_crash_callback(&raw(1));
        clock.advance(Duration::from_millis(150));

        assert_eq!(
            hook.on_crash_callback(&raw(1)),
            Some(DispatchOutcome::ModeSelected(UiMode::Dialog))
        );
    }

    #[test]
    fn test_panic_is_contained_and_logged() {
        let capture = MockCaptureLayer::new();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let hook = CrashHook::builder()
            .with_self_package("io.crashdispatch")
            .with_presenter(Arc::new(PanickingPresenter))
            .build()
            .unwrap();

        let outcome =
            tracing::subscriber::with_default(subscriber, || hook.on_crash_callback(&raw(5)));

        assert_eq!(outcome, None);
        assert_eq!(hook.metrics().internal_failures(), 1);
        let errors = capture
            .get_captured()
            .into_iter()
            .filter(|event| event.level == Level::ERROR)
            .collect::<Vec<_>>();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field("panic"), Some("renderer exploded"));
    }

    #[test]
    fn test_mute_management_and_broadcasts() {
        let hook = CrashHook::builder()
            .with_self_package("io.crashdispatch")
            .with_presenter(Arc::new(MockPresenter::new()))
            .build()
            .unwrap();

        hook.mute("com.example", MuteKind::UntilUnlock);
        assert_eq!(
            hook.on_crash_callback(&raw(7)),
            Some(DispatchOutcome::AbortMuted)
        );

        assert!(hook.on_broadcast(crate::application::triggers::ACTION_USER_PRESENT));
        assert!(!hook.is_muted("com.example"));
        assert!(!hook.on_broadcast("android.intent.action.SCREEN_OFF"));

        hook.mute("com.a", MuteKind::UntilRestart);
        hook.mute("com.b", MuteKind::UntilUnlock);
        assert_eq!(hook.list_muted().len(), 2);
        hook.unmute("com.a", MuteKind::UntilRestart);
        hook.unmute_all();
        assert!(hook.list_muted().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let hook = CrashHook::builder()
            .with_self_package("io.crashdispatch")
            .with_presenter(Arc::new(MockPresenter::new()))
            .build()
            .unwrap();
        let clone = hook.clone();

        hook.on_crash_callback(&raw(9));
        assert_eq!(
            clone.on_crash_callback(&raw(9)),
            Some(DispatchOutcome::AbortDuplicate)
        );
        assert_eq!(clone.metrics().crashes_presented(), 1);
    }
}
