//! Mute kinds.

use std::fmt;

/// How long a user-initiated mute lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MuteKind {
    /// Cleared the next time the device is unlocked
    UntilUnlock,
    /// Cleared only when the host process restarts
    UntilRestart,
}

impl MuteKind {
    /// Both kinds, in listing order.
    pub const ALL: [MuteKind; 2] = [MuteKind::UntilUnlock, MuteKind::UntilRestart];

    /// Short name used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            MuteKind::UntilUnlock => "until_unlock",
            MuteKind::UntilRestart => "until_restart",
        }
    }
}

impl fmt::Display for MuteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
