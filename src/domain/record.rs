//! Crash records handed to the persistence collaborator.

use std::time::SystemTime;

/// Exception details reported with a crash. Every field defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CrashInfo {
    /// Fully qualified exception type
    pub exception_class: String,
    /// Exception message
    pub exception_message: String,
    /// Source file of the throw site
    pub throw_file: String,
    /// Line of the throw site, 0 when unknown
    pub throw_line: i32,
    /// Rendered stack trace
    pub stack_trace: String,
}

impl CrashInfo {
    /// Create crash info from an exception type and message.
    pub fn new(exception_class: impl Into<String>, exception_message: impl Into<String>) -> Self {
        Self {
            exception_class: exception_class.into(),
            exception_message: exception_message.into(),
            ..Self::default()
        }
    }

    /// Attach a stack trace.
    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = stack_trace.into();
        self
    }

    /// Check whether anything was reported at all.
    pub fn is_empty(&self) -> bool {
        self.exception_class.is_empty()
            && self.exception_message.is_empty()
            && self.stack_trace.is_empty()
    }

    /// One-line summary like `java.lang.IllegalStateException: boom`.
    pub fn summary(&self) -> String {
        match (
            self.exception_class.is_empty(),
            self.exception_message.is_empty(),
        ) {
            (true, true) => String::from("unknown crash"),
            (false, true) => self.exception_class.clone(),
            (true, false) => self.exception_message.clone(),
            (false, false) => format!("{}: {}", self.exception_class, self.exception_message),
        }
    }
}

/// One persisted crash.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrashRecord {
    /// Process id
    pub pid: i32,
    /// User id
    pub user_id: i32,
    /// Owning package
    pub package: String,
    /// Exception details
    pub crash_info: CrashInfo,
    /// Wall-clock time the record was written
    pub recorded_at: SystemTime,
}

impl CrashRecord {
    /// Create a record stamped with the given time.
    pub fn new(
        pid: i32,
        user_id: i32,
        package: impl Into<String>,
        crash_info: CrashInfo,
        recorded_at: SystemTime,
    ) -> Self {
        Self {
            pid,
            user_id,
            package: package.into(),
            crash_info,
            recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_variants() {
        assert_eq!(CrashInfo::default().summary(), "unknown crash");
        assert_eq!(
            CrashInfo::new("java.lang.NullPointerException", "").summary(),
            "java.lang.NullPointerException"
        );
        assert_eq!(CrashInfo::new("", "boom").summary(), "boom");
        assert_eq!(
            CrashInfo::new("java.lang.IllegalStateException", "boom").summary(),
            "java.lang.IllegalStateException: boom"
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(CrashInfo::default().is_empty());
        assert!(!CrashInfo::default().with_stack_trace("at main").is_empty());
    }
}
