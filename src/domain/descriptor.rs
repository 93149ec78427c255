//! Normalized view of one crash occurrence.
//!
//! A `CrashDescriptor` is built once per raw crash callback, never mutated,
//! and dropped when dispatch returns. All classification flags are computed
//! eagerly at construction so a descriptor can be shared freely.

use crate::domain::record::CrashInfo;
use crate::domain::token::DedupToken;

/// Normalized crash descriptor.
///
/// Hosts that already know every attribute use [`CrashDescriptor::builder`];
/// hosts that only have opaque bookkeeping handles go through
/// `CrashContextExtractor`, which degrades missing attributes to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrashDescriptor {
    pid: i32,
    user_id: i32,
    process_name: String,
    package_name: String,
    is_actual_app: bool,
    is_main_process: bool,
    is_background_process: bool,
    is_repeating_crash: bool,
    crash_info: CrashInfo,
}

impl CrashDescriptor {
    /// Start building a descriptor for a process.
    pub fn builder(pid: i32, process_name: impl Into<String>) -> CrashDescriptorBuilder {
        CrashDescriptorBuilder {
            pid,
            user_id: 0,
            process_name: process_name.into(),
            package_name: None,
            package_count: None,
            has_app_info: None,
            is_background_process: false,
            is_repeating_crash: false,
            crash_info: CrashInfo::default(),
        }
    }

    /// Process id of the crashed process.
    pub fn pid(&self) -> i32 {
        self.pid
    }

    /// User (profile) id the process ran under.
    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    /// Name of the crashed process.
    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    /// Package owning the process. Falls back to the process name.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// True when exactly one package runs in the process and application info was present.
    pub fn is_actual_app(&self) -> bool {
        self.is_actual_app
    }

    /// True when the process is the package's default process.
    pub fn is_main_process(&self) -> bool {
        self.is_main_process
    }

    /// True when the user id is not one of the active foreground profiles.
    pub fn is_background_process(&self) -> bool {
        self.is_background_process
    }

    /// True when the host flagged this as a quick recurrence of an earlier crash.
    pub fn is_repeating_crash(&self) -> bool {
        self.is_repeating_crash
    }

    /// Exception details reported with the crash.
    pub fn crash_info(&self) -> &CrashInfo {
        &self.crash_info
    }

    /// Key identifying this logical crash across redundant callback paths.
    pub fn dedup_token(&self) -> DedupToken {
        DedupToken::new(self.pid, self.user_id, &self.process_name)
    }
}

/// Builder for [`CrashDescriptor`].
///
/// Derived flags follow the same rules as extraction:
/// - `package_name` defaults to the process name
/// - `is_actual_app` needs app info and exactly one package
/// - `is_main_process` compares package and process names
#[derive(Debug, Clone)]
pub struct CrashDescriptorBuilder {
    pid: i32,
    user_id: i32,
    process_name: String,
    package_name: Option<String>,
    package_count: Option<usize>,
    has_app_info: Option<bool>,
    is_background_process: bool,
    is_repeating_crash: bool,
    crash_info: CrashInfo,
}

impl CrashDescriptorBuilder {
    /// Set the user id.
    pub fn user_id(mut self, user_id: i32) -> Self {
        self.user_id = user_id;
        self
    }

    /// Set the package taken from the application-info attachment.
    ///
    /// Setting a package implies application info is present unless
    /// [`has_app_info`](Self::has_app_info) says otherwise.
    pub fn package_name(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = Some(package_name.into());
        self
    }

    /// Number of packages loaded into the process.
    pub fn package_count(mut self, count: usize) -> Self {
        self.package_count = Some(count);
        self
    }

    /// Whether the host attached application info to the process record.
    pub fn has_app_info(mut self, present: bool) -> Self {
        self.has_app_info = Some(present);
        self
    }

    /// Mark the process as running outside the foreground profiles.
    pub fn background(mut self, background: bool) -> Self {
        self.is_background_process = background;
        self
    }

    /// Mark the crash as a repeat.
    pub fn repeating(mut self, repeating: bool) -> Self {
        self.is_repeating_crash = repeating;
        self
    }

    /// Attach exception details.
    pub fn crash_info(mut self, crash_info: CrashInfo) -> Self {
        self.crash_info = crash_info;
        self
    }

    /// Finish the descriptor, computing derived flags.
    pub fn build(self) -> CrashDescriptor {
        let has_app_info = self
            .has_app_info
            .unwrap_or_else(|| self.package_name.is_some());
        let package_name = match self.package_name {
            Some(name) if !name.is_empty() => name,
            _ => self.process_name.clone(),
        };
        let package_count = self.package_count.unwrap_or(usize::from(has_app_info));

        CrashDescriptor {
            pid: self.pid,
            user_id: self.user_id,
            is_actual_app: has_app_info && package_count == 1,
            is_main_process: package_name == self.process_name,
            process_name: self.process_name,
            package_name,
            is_background_process: self.is_background_process,
            is_repeating_crash: self.is_repeating_crash,
            crash_info: self.crash_info,
        }
    }
}
