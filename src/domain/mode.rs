//! Presentation modes and dispatch outcomes.

use std::fmt;

/// UI channel used to surface a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UiMode {
    /// Rich crash dialog
    Dialog,
    /// System notification
    Notify,
    /// Transient toast message
    Toast,
    /// Nothing is rendered
    None,
}

impl UiMode {
    /// Lowercase name used in log fields and settings.
    pub fn as_str(&self) -> &'static str {
        match self {
            UiMode::Dialog => "dialog",
            UiMode::Notify => "notify",
            UiMode::Toast => "toast",
            UiMode::None => "none",
        }
    }

    /// Whether this mode renders something.
    ///
    /// `None` counts as "unset" when it appears in a configured override.
    pub fn is_concrete(&self) -> bool {
        !matches!(self, UiMode::None)
    }

    /// Parse a settings value. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<UiMode> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dialog" => Some(UiMode::Dialog),
            "notify" | "notification" => Some(UiMode::Notify),
            "toast" => Some(UiMode::Toast),
            "none" => Some(UiMode::None),
            _ => None,
        }
    }
}

impl fmt::Display for UiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which visibility filter rejected a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAbort {
    /// "Only show errors in front" rejected a background or non-reopenable app
    FrontOnly,
    /// "Only show errors in main process" rejected a secondary process
    MainOnly,
}

impl PolicyAbort {
    /// Short name used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyAbort::FrontOnly => "front-only",
            PolicyAbort::MainOnly => "main-only",
        }
    }
}

/// Terminal state of one dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Another callback for the same crash already dispatched within the window
    AbortDuplicate,
    /// The package is muted
    AbortMuted,
    /// A visibility filter rejected the crash
    AbortPolicy(PolicyAbort),
    /// A presentation mode was chosen and rendered
    ModeSelected(UiMode),
}

impl DispatchOutcome {
    /// The selected mode, if dispatch got that far.
    pub fn mode(&self) -> Option<UiMode> {
        match self {
            DispatchOutcome::ModeSelected(mode) => Some(*mode),
            _ => None,
        }
    }

    /// Check if dispatch stopped before choosing a mode.
    pub fn is_abort(&self) -> bool {
        !matches!(self, DispatchOutcome::ModeSelected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!(UiMode::parse("dialog"), Some(UiMode::Dialog));
        assert_eq!(UiMode::parse(" Notify "), Some(UiMode::Notify));
        assert_eq!(UiMode::parse("notification"), Some(UiMode::Notify));
        assert_eq!(UiMode::parse("TOAST"), Some(UiMode::Toast));
        assert_eq!(UiMode::parse("none"), Some(UiMode::None));
        assert_eq!(UiMode::parse("popup"), None);
    }

    #[test]
    fn test_concrete_modes() {
        assert!(UiMode::Dialog.is_concrete());
        assert!(UiMode::Notify.is_concrete());
        assert!(UiMode::Toast.is_concrete());
        assert!(!UiMode::None.is_concrete());
    }

    #[test]
    fn test_outcome_mode() {
        assert_eq!(
            DispatchOutcome::ModeSelected(UiMode::Toast).mode(),
            Some(UiMode::Toast)
        );
        assert_eq!(DispatchOutcome::AbortMuted.mode(), None);
        assert!(DispatchOutcome::AbortDuplicate.is_abort());
        assert!(DispatchOutcome::AbortPolicy(PolicyAbort::MainOnly).is_abort());
        assert!(!DispatchOutcome::ModeSelected(UiMode::None).is_abort());
    }
}
