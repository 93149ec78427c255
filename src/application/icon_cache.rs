//! Lazily built notification icon shared by every notification dispatch.

use crate::application::ports::NotificationIcon;
use std::sync::{Arc, OnceLock};

/// Holds at most one rendered icon for the lifetime of the process.
#[derive(Debug, Default)]
pub struct NotificationIconCache {
    icon: OnceLock<Arc<NotificationIcon>>,
}

impl NotificationIconCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached icon, building it on first use.
    ///
    /// Concurrent first callers race on `build`, but only one result is kept
    /// and every caller receives that one.
    pub fn get_or_build<F>(&self, build: F) -> Arc<NotificationIcon>
    where
        F: FnOnce() -> NotificationIcon,
    {
        Arc::clone(self.icon.get_or_init(|| Arc::new(build())))
    }

    /// Check whether the icon has been built.
    pub fn is_built(&self) -> bool {
        self.icon.get().is_some()
    }
}
