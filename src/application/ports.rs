//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. The host process and its UI toolkit implement these ports;
//! this crate ships in-memory and logging adapters in `infrastructure`.

use crate::domain::policy::DispatchSettings;
use crate::domain::record::CrashRecord;
use std::fmt::{self, Debug};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

/// Port for obtaining current time.
///
/// `now` drives the dedup window; `wall_now` stamps crash records.
/// Infrastructure provides `SystemClock` and, for tests, `MockClock`.
pub trait Clock: Send + Sync + Debug {
    /// Get the current monotonic instant.
    fn now(&self) -> Instant;

    /// Get the current wall-clock time.
    fn wall_now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A value read out of a host bookkeeping object.
#[derive(Debug, Clone)]
pub enum HostValue {
    /// Integer value (ids, counts)
    Int(i64),
    /// Boolean flag
    Bool(bool),
    /// String value
    Str(String),
    /// List of integers (profile ids)
    IntList(Vec<i64>),
    /// List of strings (package lists)
    StrList(Vec<String>),
    /// Nested host object
    Handle(Arc<dyn HostHandle>),
}

/// Port for reading host-internal crash bookkeeping objects.
///
/// Different host versions expose the same datum under different method or
/// field names, so every read is by name and may come back empty. A `None`
/// means "not available on this host", never an error.
pub trait HostHandle: Send + Sync + Debug {
    /// Invoke a zero-argument method by name.
    fn call(&self, method: &str) -> Option<HostValue>;

    /// Read a field by name.
    fn field(&self, name: &str) -> Option<HostValue>;
}

/// Error returned when settings cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// Preference storage is not ready yet
    Unavailable(String),
    /// A stored value could not be interpreted
    Invalid {
        /// Settings key
        key: String,
        /// Raw stored value
        value: String,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Unavailable(reason) => {
                write!(f, "settings storage unavailable: {}", reason)
            }
            SettingsError::Invalid { key, value } => {
                write!(f, "invalid value {:?} for setting {}", value, key)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

/// Port for loading settings from the configuration collaborator.
pub trait SettingsSource: Send + Sync + Debug {
    /// Load a fresh settings snapshot.
    fn load(&self) -> Result<DispatchSettings, SettingsError>;
}

/// Port consulted on every dispatch for the current settings.
pub trait SettingsProvider: Send + Sync + Debug {
    /// Get the current snapshot.
    fn snapshot(&self) -> Arc<DispatchSettings>;
}

/// Port for the crash-record store.
///
/// The dispatcher only calls `record`. The read and remove operations serve
/// external management surfaces.
pub trait CrashRecorder: Send + Sync + Debug {
    /// Persist one crash.
    fn record(&self, record: CrashRecord);

    /// All records for a process id, oldest first.
    fn records_for_pid(&self, pid: i32) -> Vec<CrashRecord>;

    /// All records, oldest first.
    fn list(&self) -> Vec<CrashRecord>;

    /// Remove every record for a process id. Returns how many were removed.
    fn remove(&self, pid: i32) -> usize;

    /// Remove all records.
    fn clear(&self);
}

/// Port for installed-application lookups.
pub trait AppCatalog: Send + Sync + Debug {
    /// Whether the package has a launcher entry for the user.
    fn has_launcher(&self, package: &str, user_id: i32) -> bool;

    /// Display label of the package.
    fn label(&self, package: &str) -> Option<String>;
}

/// Error returned when the rich dialog surface cannot be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchError {
    reason: String,
}

impl LaunchError {
    /// Create a launch error with a reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Why the launch failed.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to launch crash dialog: {}", self.reason)
    }
}

impl std::error::Error for LaunchError {}

/// Content of a crash dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    /// Process id
    pub pid: i32,
    /// User id
    pub user_id: i32,
    /// Owning package
    pub package: String,
    /// Dialog title
    pub title: String,
    /// Whether the dialog offers to reopen the app
    pub show_reopen: bool,
    /// Whether the title uses the repeated-crash wording
    pub repeating: bool,
}

/// Rendered notification icon. Built once and shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationIcon {
    /// Edge length in pixels
    pub size: u32,
    /// Encoded image bytes
    pub bytes: Arc<[u8]>,
}

/// Content of a crash notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Process id
    pub pid: i32,
    /// User id
    pub user_id: i32,
    /// Owning package
    pub package: String,
    /// Notification title
    pub title: String,
    /// Notification body
    pub text: String,
    /// Shared icon
    pub icon: Arc<NotificationIcon>,
}

/// Port for the UI rendering collaborator.
///
/// Calls are fire-and-forget from the dispatcher's point of view, except
/// that a failed dialog launch is reported so it can fall back.
pub trait Presenter: Send + Sync + Debug {
    /// Launch the rich crash dialog.
    fn show_dialog(&self, request: &DialogRequest) -> Result<(), LaunchError>;

    /// Post a crash notification.
    fn post_notification(&self, request: &NotificationRequest);

    /// Show a transient message.
    fn show_toast(&self, text: &str);

    /// Render the notification icon. Called at most once per process.
    fn build_notification_icon(&self) -> NotificationIcon;

    /// Drop cached localized resources after a locale change.
    fn invalidate_resources(&self) {}
}
