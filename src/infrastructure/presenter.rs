//! Presenter that renders crashes as log events.
//!
//! Useful for headless hosts and as a default before a real UI is wired in.

use crate::application::ports::{
    DialogRequest, LaunchError, NotificationIcon, NotificationRequest, Presenter,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Edge length of the placeholder notification icon.
const ICON_SIZE: u32 = 24;

/// Presenter that writes every surface to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingPresenter;

impl LoggingPresenter {
    /// Create a logging presenter.
    pub fn new() -> Self {
        Self
    }
}

impl Presenter for LoggingPresenter {
    fn show_dialog(&self, request: &DialogRequest) -> Result<(), LaunchError> {
        warn!(
            target: "crash_dispatch::ui",
            package = %request.package,
            pid = request.pid,
            user_id = request.user_id,
            reopen = request.show_reopen,
            "[dialog] {}",
            request.title
        );
        Ok(())
    }

    fn post_notification(&self, request: &NotificationRequest) {
        warn!(
            target: "crash_dispatch::ui",
            package = %request.package,
            pid = request.pid,
            "[notification] {}: {}",
            request.title,
            request.text
        );
    }

    fn show_toast(&self, text: &str) {
        info!(target: "crash_dispatch::ui", "[toast] {}", text);
    }

    fn build_notification_icon(&self) -> NotificationIcon {
        let edge = ICON_SIZE as usize;
        NotificationIcon {
            size: ICON_SIZE,
            bytes: Arc::from(vec![0xffu8; edge * edge]),
        }
    }
}
