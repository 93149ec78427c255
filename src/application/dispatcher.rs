//! Crash dispatch policy engine.
//!
//! Takes a normalized descriptor through deduplication, muting, the record
//! write, the self-crash check, visibility filters and mode resolution, then
//! renders the chosen UI and logs the outcome.

use crate::application::deduplicator::EventDeduplicator;
use crate::application::icon_cache::NotificationIconCache;
use crate::application::metrics::DispatchMetrics;
use crate::application::mute_registry::MuteRegistry;
use crate::application::ports::{
    AppCatalog, Clock, CrashRecorder, DialogRequest, NotificationRequest, Presenter,
    SettingsProvider,
};
use crate::application::triggers::HostTrigger;
use crate::domain::{
    descriptor::CrashDescriptor,
    message::CrashWording,
    mode::{DispatchOutcome, UiMode},
    policy::DispatchSettings,
    record::CrashRecord,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Collaborators the dispatcher talks to.
#[derive(Debug, Clone)]
pub struct DispatchPorts {
    /// Time source for dedup windows and record timestamps
    pub clock: Arc<dyn Clock>,
    /// Settings read on every dispatch
    pub settings: Arc<dyn SettingsProvider>,
    /// Crash record store
    pub recorder: Arc<dyn CrashRecorder>,
    /// UI rendering
    pub presenter: Arc<dyn Presenter>,
    /// Installed-app lookups
    pub catalog: Arc<dyn AppCatalog>,
}

/// Decides how each crash is surfaced.
///
/// Only the deduplicator and the mute registry carry state between calls;
/// everything else is recomputed per dispatch.
#[derive(Debug)]
pub struct CrashDispatcher {
    dedup: EventDeduplicator,
    mutes: Arc<MuteRegistry>,
    ports: DispatchPorts,
    icon_cache: NotificationIconCache,
    metrics: DispatchMetrics,
    self_package: String,
}

impl CrashDispatcher {
    /// Create a dispatcher.
    ///
    /// # Arguments
    /// * `dedup` - Deduplicator shared by every interception point
    /// * `mutes` - Mute registry, also exposed to the management surface
    /// * `ports` - External collaborators
    /// * `self_package` - Package of the component hosting this dispatcher
    pub fn new(
        dedup: EventDeduplicator,
        mutes: Arc<MuteRegistry>,
        ports: DispatchPorts,
        self_package: impl Into<String>,
    ) -> Self {
        Self {
            dedup,
            mutes,
            ports,
            icon_cache: NotificationIconCache::new(),
            metrics: DispatchMetrics::new(),
            self_package: self_package.into(),
        }
    }

    /// Dispatch one crash and return how the attempt ended.
    ///
    /// Every crash that passes deduplication and muting is recorded exactly
    /// once, before the self-crash check and the visibility filters run.
    pub fn dispatch(&self, descriptor: &CrashDescriptor) -> DispatchOutcome {
        let outcome = self.run(descriptor);
        self.metrics.record_outcome(outcome);
        outcome
    }

    fn run(&self, descriptor: &CrashDescriptor) -> DispatchOutcome {
        let token = descriptor.dedup_token();
        if !self.dedup.should_dispatch(&token) {
            debug!(token = %token, "duplicate crash callback dropped");
            return DispatchOutcome::AbortDuplicate;
        }

        let settings = self.ports.settings.snapshot();
        let package = descriptor.package_name();

        if self.mutes.is_muted(package) {
            log_abort(&settings, descriptor, "muted");
            return DispatchOutcome::AbortMuted;
        }

        self.ports.recorder.record(CrashRecord::new(
            descriptor.pid(),
            descriptor.user_id(),
            package,
            descriptor.crash_info().clone(),
            self.ports.clock.wall_now(),
        ));

        if package == self.self_package {
            self.report_self_crash(descriptor);
            return DispatchOutcome::ModeSelected(UiMode::None);
        }

        let can_reopen = self.can_reopen(descriptor);
        if let Some(abort) = settings.visibility_check(descriptor, can_reopen) {
            log_abort(&settings, descriptor, abort.as_str());
            return DispatchOutcome::AbortPolicy(abort);
        }

        let label = self.ports.catalog.label(package);
        let wording = CrashWording::new(descriptor, label.as_deref());
        let mode = settings.resolve_mode(package);

        let rendered = self.render(
            mode,
            descriptor,
            &wording,
            settings.offers_reopen(descriptor, can_reopen),
        );

        info!(
            package,
            process = descriptor.process_name(),
            pid = descriptor.pid(),
            user_id = descriptor.user_id(),
            mode = rendered.as_str(),
            fallback = rendered != mode,
            repeating = descriptor.is_repeating_crash(),
            actual_app = descriptor.is_actual_app(),
            "{}",
            wording.log_line()
        );

        DispatchOutcome::ModeSelected(mode)
    }

    fn can_reopen(&self, descriptor: &CrashDescriptor) -> bool {
        descriptor.is_actual_app()
            && self
                .ports
                .catalog
                .has_launcher(descriptor.package_name(), descriptor.user_id())
    }

    /// Render the crash and return the mode that was actually shown.
    fn render(
        &self,
        mode: UiMode,
        descriptor: &CrashDescriptor,
        wording: &CrashWording,
        show_reopen: bool,
    ) -> UiMode {
        match mode {
            UiMode::Dialog => {
                let request = DialogRequest {
                    pid: descriptor.pid(),
                    user_id: descriptor.user_id(),
                    package: descriptor.package_name().to_string(),
                    title: wording.title().to_string(),
                    show_reopen,
                    repeating: descriptor.is_repeating_crash(),
                };
                if let Err(e) = self.ports.presenter.show_dialog(&request) {
                    warn!(
                        package = descriptor.package_name(),
                        error = %e,
                        "crash dialog unavailable, falling back to notification"
                    );
                    self.metrics.record_dialog_fallback();
                    self.notify(descriptor, wording);
                    return UiMode::Notify;
                }
            }
            UiMode::Notify => self.notify(descriptor, wording),
            UiMode::Toast => self.ports.presenter.show_toast(wording.title()),
            UiMode::None => {}
        }
        mode
    }

    fn notify(&self, descriptor: &CrashDescriptor, wording: &CrashWording) {
        let presenter = &self.ports.presenter;
        let icon = self
            .icon_cache
            .get_or_build(|| presenter.build_notification_icon());

        presenter.post_notification(&NotificationRequest {
            pid: descriptor.pid(),
            user_id: descriptor.user_id(),
            package: descriptor.package_name().to_string(),
            title: wording.title().to_string(),
            text: descriptor.crash_info().summary(),
            icon,
        });
    }

    fn report_self_crash(&self, descriptor: &CrashDescriptor) {
        self.metrics.record_self_crash();
        let summary = descriptor.crash_info().summary();

        error!(
            package = descriptor.package_name(),
            process = descriptor.process_name(),
            pid = descriptor.pid(),
            "crash dispatcher's own package crashed: {}",
            summary
        );
        self.ports
            .presenter
            .show_toast(&format!("{} crashed: {}", self.self_package, summary));
    }

    /// React to a host trigger.
    pub fn on_trigger(&self, trigger: HostTrigger) {
        match trigger {
            HostTrigger::DeviceUnlocked => self.mutes.on_unlock_event(),
            HostTrigger::LocaleChanged => self.ports.presenter.invalidate_resources(),
        }
        debug!(trigger = %trigger, "host trigger handled");
    }

    /// Get a reference to the mute registry.
    pub fn mutes(&self) -> &Arc<MuteRegistry> {
        &self.mutes
    }

    /// Get a reference to the deduplicator.
    pub fn deduplicator(&self) -> &EventDeduplicator {
        &self.dedup
    }

    /// Get a reference to the metrics.
    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Get a reference to the collaborators.
    pub fn ports(&self) -> &DispatchPorts {
        &self.ports
    }

    /// Package treated as this dispatcher's own.
    pub fn self_package(&self) -> &str {
        &self.self_package
    }

    /// Check whether the notification icon has been built.
    pub fn icon_built(&self) -> bool {
        self.icon_cache.is_built()
    }
}

fn log_abort(settings: &DispatchSettings, descriptor: &CrashDescriptor, reason: &str) {
    if settings.verbose_dispatch_log {
        info!(
            package = descriptor.package_name(),
            pid = descriptor.pid(),
            reason,
            "crash not shown"
        );
    } else {
        debug!(
            package = descriptor.package_name(),
            pid = descriptor.pid(),
            reason,
            "crash not shown"
        );
    }
}
