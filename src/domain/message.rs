//! Human-readable wording for crash titles and outcome log lines.
//!
//! Actual apps and internal service processes use different templates, and a
//! repeating crash switches "has stopped" to "keeps stopping".

use crate::domain::descriptor::CrashDescriptor;

const FIRST_TIME: &str = "has stopped";
const REPEATING: &str = "keeps stopping";

/// Wording derived from one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrashWording {
    title: String,
    log_line: String,
}

impl CrashWording {
    /// Build wording for a descriptor.
    ///
    /// `label` is the display name of the app when the catalog knows it;
    /// otherwise the package name is used.
    pub fn new(descriptor: &CrashDescriptor, label: Option<&str>) -> Self {
        let verb = Self::verb(descriptor);
        let package = descriptor.package_name();
        let process = descriptor.process_name();

        let mut details = format!("pid {}", descriptor.pid());
        if descriptor.user_id() != 0 {
            details.push_str(&format!(", user {}", descriptor.user_id()));
        }

        let (title, log_line) = if descriptor.is_actual_app() {
            let name = label.filter(|l| !l.is_empty()).unwrap_or(package);
            (
                format!("{} {}", name, verb),
                format!("{} {} (process {}, {})", package, verb, process, details),
            )
        } else {
            (
                format!("{} process {}", process, verb),
                format!(
                    "process {} {} (package {}, {})",
                    process, verb, package, details
                ),
            )
        };

        Self { title, log_line }
    }

    /// "has stopped" or "keeps stopping".
    pub fn verb(descriptor: &CrashDescriptor) -> &'static str {
        if descriptor.is_repeating_crash() {
            REPEATING
        } else {
            FIRST_TIME
        }
    }

    /// Title shown on the dialog, notification or toast.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Outcome log message.
    pub fn log_line(&self) -> &str {
        &self.log_line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actual_app(repeating: bool) -> CrashDescriptor {
        CrashDescriptor::builder(100, "com.example")
            .package_name("com.example")
            .repeating(repeating)
            .build()
    }

    #[test]
    fn test_first_time_app_wording() {
        let wording = CrashWording::new(&actual_app(false), Some("Example"));

        assert_eq!(wording.title(), "Example has stopped");
        assert_eq!(
            wording.log_line(),
            "com.example has stopped (process com.example, pid 100)"
        );
    }

    #[test]
    fn test_repeating_app_wording() {
        let wording = CrashWording::new(&actual_app(true), None);

        assert_eq!(wording.title(), "com.example keeps stopping");
        assert!(wording.log_line().contains("keeps stopping"));
    }

    #[test]
    fn test_service_process_wording() {
        let descriptor = CrashDescriptor::builder(55, "com.android.phone")
            .package_name("com.android.phone")
            .package_count(4)
            .user_id(10)
            .build();
        let wording = CrashWording::new(&descriptor, Some("Phone"));

        assert_eq!(wording.title(), "com.android.phone process has stopped");
        assert_eq!(
            wording.log_line(),
            "process com.android.phone has stopped (package com.android.phone, pid 55, user 10)"
        );
    }

    #[test]
    fn test_empty_label_uses_package() {
        let wording = CrashWording::new(&actual_app(false), Some(""));
        assert_eq!(wording.title(), "com.example has stopped");
    }
}
