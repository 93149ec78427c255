//! Mock presenter for testing.

use crate::application::ports::{
    DialogRequest, LaunchError, NotificationIcon, NotificationRequest, Presenter,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Rendered {
    dialogs: Vec<DialogRequest>,
    notifications: Vec<NotificationRequest>,
    toasts: Vec<String>,
}

/// Presenter that records every request instead of drawing anything.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct MockPresenter {
    rendered: Arc<Mutex<Rendered>>,
    fail_dialogs: Arc<AtomicBool>,
    icon_builds: Arc<AtomicUsize>,
    invalidations: Arc<AtomicUsize>,
}

impl MockPresenter {
    /// Create a presenter with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent dialog launch fail.
    pub fn fail_dialogs(&self, fail: bool) {
        self.fail_dialogs.store(fail, Ordering::SeqCst);
    }

    /// Dialogs shown so far.
    pub fn dialogs(&self) -> Vec<DialogRequest> {
        self.lock().dialogs.clone()
    }

    /// Notifications posted so far.
    pub fn notifications(&self) -> Vec<NotificationRequest> {
        self.lock().notifications.clone()
    }

    /// Toast texts shown so far.
    pub fn toasts(&self) -> Vec<String> {
        self.lock().toasts.clone()
    }

    /// How many times the notification icon was rendered.
    pub fn icon_builds(&self) -> usize {
        self.icon_builds.load(Ordering::SeqCst)
    }

    /// How many times resources were invalidated.
    pub fn invalidations(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }

    /// Total number of rendered surfaces of any kind.
    pub fn rendered_count(&self) -> usize {
        let rendered = self.lock();
        rendered.dialogs.len() + rendered.notifications.len() + rendered.toasts.len()
    }

    fn lock(&self) -> MutexGuard<'_, Rendered> {
        self.rendered.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Presenter for MockPresenter {
    fn show_dialog(&self, request: &DialogRequest) -> Result<(), LaunchError> {
        if self.fail_dialogs.load(Ordering::SeqCst) {
            return Err(LaunchError::new("dialog surface unavailable"));
        }
        self.lock().dialogs.push(request.clone());
        Ok(())
    }

    fn post_notification(&self, request: &NotificationRequest) {
        self.lock().notifications.push(request.clone());
    }

    fn show_toast(&self, text: &str) {
        self.lock().toasts.push(text.to_string());
    }

    fn build_notification_icon(&self) -> NotificationIcon {
        self.icon_builds.fetch_add(1, Ordering::SeqCst);
        NotificationIcon {
            size: 48,
            bytes: Arc::from(vec![0u8; 16]),
        }
    }

    fn invalidate_resources(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DialogRequest {
        DialogRequest {
            pid: 1,
            user_id: 0,
            package: "com.example".to_string(),
            title: "Example has stopped".to_string(),
            show_reopen: true,
            repeating: false,
        }
    }

    #[test]
    fn test_records_dialogs() {
        let presenter = MockPresenter::new();
        assert!(presenter.show_dialog(&request()).is_ok());
        assert_eq!(presenter.dialogs(), vec![request()]);
    }

    #[test]
    fn test_failing_dialogs() {
        let presenter = MockPresenter::new();
        presenter.fail_dialogs(true);

        assert!(presenter.show_dialog(&request()).is_err());
        assert_eq!(presenter.rendered_count(), 0);
    }
}
