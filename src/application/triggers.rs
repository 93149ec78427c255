//! System events that reset process-lifetime state.

use std::fmt;

/// Broadcast action sent when the user unlocks the device.
pub const ACTION_USER_PRESENT: &str = "android.intent.action.USER_PRESENT";

/// Broadcast action sent when the system locale changes.
pub const ACTION_LOCALE_CHANGED: &str = "android.intent.action.LOCALE_CHANGED";

/// Host trigger consumed by the dispatcher.
///
/// Host restart needs no variant: all state here lives only in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostTrigger {
    /// Device unlocked; until-unlock mutes are cleared
    DeviceUnlocked,
    /// Locale changed; cached localized resources are dropped
    LocaleChanged,
}

impl HostTrigger {
    /// Map a broadcast action to a trigger.
    pub fn from_action(action: &str) -> Option<HostTrigger> {
        match action {
            ACTION_USER_PRESENT => Some(HostTrigger::DeviceUnlocked),
            ACTION_LOCALE_CHANGED => Some(HostTrigger::LocaleChanged),
            _ => None,
        }
    }
}

impl fmt::Display for HostTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostTrigger::DeviceUnlocked => f.write_str("device-unlocked"),
            HostTrigger::LocaleChanged => f.write_str("locale-changed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_action() {
        assert_eq!(
            HostTrigger::from_action(ACTION_USER_PRESENT),
            Some(HostTrigger::DeviceUnlocked)
        );
        assert_eq!(
            HostTrigger::from_action(ACTION_LOCALE_CHANGED),
            Some(HostTrigger::LocaleChanged)
        );
        assert_eq!(
            HostTrigger::from_action("android.intent.action.SCREEN_OFF"),
            None
        );
    }
}
