//! Process-lifetime mute state.
//!
//! Users can silence crash UI for an app until the next unlock or until the
//! host restarts. The two kinds live in separate sets because they are
//! cleared by different triggers and a package may sit in both. Nothing is
//! persisted: a restarted host starts with both sets empty.

use crate::domain::mute::MuteKind;
use ahash::AHashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct MuteSets {
    until_unlock: AHashSet<String>,
    until_restart: AHashSet<String>,
}

impl MuteSets {
    fn set(&self, kind: MuteKind) -> &AHashSet<String> {
        match kind {
            MuteKind::UntilUnlock => &self.until_unlock,
            MuteKind::UntilRestart => &self.until_restart,
        }
    }

    fn set_mut(&mut self, kind: MuteKind) -> &mut AHashSet<String> {
        match kind {
            MuteKind::UntilUnlock => &mut self.until_unlock,
            MuteKind::UntilRestart => &mut self.until_restart,
        }
    }
}

/// Registry of muted packages.
///
/// One reader-writer lock guards both sets, so `unmute_all` can never
/// interleave with an `is_muted` read and leave it reporting a stale mute.
#[derive(Debug, Default)]
pub struct MuteRegistry {
    sets: RwLock<MuteSets>,
}

impl MuteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute a package. Muting twice is a no-op.
    pub fn mute(&self, package: &str, kind: MuteKind) {
        let inserted = self.write().set_mut(kind).insert(package.to_string());
        if inserted {
            debug!(package, kind = kind.as_str(), "crash reporting muted");
        }
    }

    /// Unmute a package for one kind. Unmuting an absent package is a no-op.
    pub fn unmute(&self, package: &str, kind: MuteKind) {
        let removed = self.write().set_mut(kind).remove(package);
        if removed {
            debug!(package, kind = kind.as_str(), "crash reporting unmuted");
        }
    }

    /// Clear both sets.
    pub fn unmute_all(&self) {
        let mut sets = self.write();
        sets.until_unlock.clear();
        sets.until_restart.clear();
        debug!("all crash mutes cleared");
    }

    /// Check whether a package is muted under either kind.
    pub fn is_muted(&self, package: &str) -> bool {
        let sets = self.read();
        sets.until_unlock.contains(package) || sets.until_restart.contains(package)
    }

    /// Check whether a package is muted under a specific kind.
    pub fn is_muted_as(&self, package: &str, kind: MuteKind) -> bool {
        self.read().set(kind).contains(package)
    }

    /// Device unlocked: clear the until-unlock set only.
    pub fn on_unlock_event(&self) {
        let mut sets = self.write();
        let cleared = sets.until_unlock.len();
        sets.until_unlock.clear();
        debug!(cleared, "until-unlock mutes cleared");
    }

    /// List every mute as `(kind, package)`, sorted by kind then package.
    pub fn list_muted(&self) -> Vec<(MuteKind, String)> {
        let sets = self.read();
        let mut entries: Vec<(MuteKind, String)> = MuteKind::ALL
            .iter()
            .flat_map(|&kind| sets.set(kind).iter().map(move |p| (kind, p.clone())))
            .collect();
        entries.sort();
        entries
    }

    /// Packages muted under one kind, sorted.
    pub fn muted_for(&self, kind: MuteKind) -> Vec<String> {
        let mut packages: Vec<String> = self.read().set(kind).iter().cloned().collect();
        packages.sort();
        packages
    }

    /// Total number of mute entries across both kinds.
    pub fn len(&self) -> usize {
        let sets = self.read();
        sets.until_unlock.len() + sets.until_restart.len()
    }

    /// Check if nothing is muted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, MuteSets> {
        self.sets.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MuteSets> {
        self.sets.write().unwrap_or_else(PoisonError::into_inner)
    }
}
