//! Dispatch settings and the layered mode policy.
//!
//! Settings are a plain snapshot read once per dispatch. The policy functions
//! here are pure: visibility filters decide whether a crash is shown at all,
//! and mode resolution picks the presentation channel.

use crate::domain::descriptor::CrashDescriptor;
use crate::domain::mode::{PolicyAbort, UiMode};
use std::collections::BTreeMap;

/// Snapshot of user-configurable dispatch flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatchSettings {
    /// Use the global/per-app mode tables instead of always showing a dialog
    pub enable_app_config_template: bool,
    /// Drop crashes from background profiles and apps that cannot be reopened
    pub only_show_errors_in_front: bool,
    /// Drop crashes from secondary processes
    pub only_show_errors_in_main: bool,
    /// Offer "reopen" even when the crashed process is not the main one
    pub always_show_reopen_option: bool,
    /// Log aborted dispatches at info instead of debug
    pub verbose_dispatch_log: bool,
    /// Mode applied to every app. `None` or `Some(UiMode::None)` means unset.
    pub global_mode: Option<UiMode>,
    /// Per-package modes
    pub app_modes: BTreeMap<String, UiMode>,
}

impl DispatchSettings {
    /// Create settings with every flag off and no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the mode tables.
    pub fn with_app_config_template(mut self, enabled: bool) -> Self {
        self.enable_app_config_template = enabled;
        self
    }

    /// Only surface crashes of foreground, reopenable apps.
    pub fn with_only_front(mut self, enabled: bool) -> Self {
        self.only_show_errors_in_front = enabled;
        self
    }

    /// Only surface crashes of main processes.
    pub fn with_only_main(mut self, enabled: bool) -> Self {
        self.only_show_errors_in_main = enabled;
        self
    }

    /// Always offer the reopen action.
    pub fn with_always_show_reopen(mut self, enabled: bool) -> Self {
        self.always_show_reopen_option = enabled;
        self
    }

    /// Raise abort logging to info.
    pub fn with_verbose_log(mut self, enabled: bool) -> Self {
        self.verbose_dispatch_log = enabled;
        self
    }

    /// Set the global override.
    pub fn with_global_mode(mut self, mode: Option<UiMode>) -> Self {
        self.global_mode = mode;
        self
    }

    /// Set the mode for one package.
    pub fn with_app_mode(mut self, package: impl Into<String>, mode: UiMode) -> Self {
        self.app_modes.insert(package.into(), mode);
        self
    }

    /// Apply the visibility filters.
    ///
    /// Returns the filter that rejected the crash, front-only first.
    pub fn visibility_check(
        &self,
        descriptor: &CrashDescriptor,
        can_reopen: bool,
    ) -> Option<PolicyAbort> {
        if self.only_show_errors_in_front && (descriptor.is_background_process() || !can_reopen)
        {
            return Some(PolicyAbort::FrontOnly);
        }
        if self.only_show_errors_in_main && !descriptor.is_main_process() {
            return Some(PolicyAbort::MainOnly);
        }
        None
    }

    /// Resolve the presentation mode for a package.
    ///
    /// Without the template tables every crash gets a dialog. With them, a
    /// concrete global override wins, then a concrete per-app mode, and
    /// anything else renders nothing.
    pub fn resolve_mode(&self, package: &str) -> UiMode {
        if !self.enable_app_config_template {
            return UiMode::Dialog;
        }
        if let Some(mode) = self.global_mode.filter(UiMode::is_concrete) {
            return mode;
        }
        self.app_modes
            .get(package)
            .copied()
            .filter(UiMode::is_concrete)
            .unwrap_or(UiMode::None)
    }

    /// Whether the dialog should offer to reopen the app.
    pub fn offers_reopen(&self, descriptor: &CrashDescriptor, can_reopen: bool) -> bool {
        can_reopen && (descriptor.is_main_process() || self.always_show_reopen_option)
    }
}
