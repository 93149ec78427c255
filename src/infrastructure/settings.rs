//! Settings adapters.
//!
//! `StaticSettings` holds a snapshot set by the embedder. `CachedSettings`
//! reloads from a `SettingsSource` on demand and keeps serving the last good
//! snapshot when a reload fails. `PreferenceStore` is a string key-value
//! source with the same keys the settings screen writes.

use crate::application::ports::{SettingsError, SettingsProvider, SettingsSource};
use crate::domain::mode::UiMode;
use crate::domain::policy::DispatchSettings;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Preference key enabling the per-app mode tables.
pub const KEY_APP_CONFIG_TEMPLATE: &str = "enable_app_config_template";
/// Preference key for the front-only filter.
pub const KEY_ONLY_FRONT: &str = "only_show_errors_in_front";
/// Preference key for the main-process-only filter.
pub const KEY_ONLY_MAIN: &str = "only_show_errors_in_main";
/// Preference key forcing the reopen action.
pub const KEY_ALWAYS_SHOW_REOPEN: &str = "always_show_reopen_option";
/// Preference key for verbose abort logging.
pub const KEY_VERBOSE_LOG: &str = "verbose_dispatch_log";
/// Preference key of the global mode override.
pub const KEY_GLOBAL_MODE: &str = "global_mode";
/// Prefix of per-app mode keys, followed by the package name.
pub const APP_MODE_PREFIX: &str = "app_mode.";

/// Provider serving a snapshot the embedder sets directly.
#[derive(Debug, Default)]
pub struct StaticSettings {
    current: RwLock<Arc<DispatchSettings>>,
}

impl StaticSettings {
    /// Create a provider serving `settings`.
    pub fn new(settings: DispatchSettings) -> Self {
        Self {
            current: RwLock::new(Arc::new(settings)),
        }
    }

    /// Swap in a new snapshot. Dispatches already running keep the old one.
    pub fn replace(&self, settings: DispatchSettings) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(settings);
    }
}

impl SettingsProvider for StaticSettings {
    fn snapshot(&self) -> Arc<DispatchSettings> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Provider that caches the last snapshot loaded from a source.
#[derive(Debug)]
pub struct CachedSettings<S> {
    source: S,
    current: RwLock<Arc<DispatchSettings>>,
    failed_refreshes: AtomicU64,
}

impl<S: SettingsSource> CachedSettings<S> {
    /// Create a cache and attempt an initial load.
    ///
    /// If the source is not ready, defaults are served until the first
    /// successful refresh.
    pub fn new(source: S) -> Self {
        let cache = Self {
            source,
            current: RwLock::new(Arc::new(DispatchSettings::default())),
            failed_refreshes: AtomicU64::new(0),
        };
        let _ = cache.refresh();
        cache
    }

    /// Reload from the source.
    ///
    /// On failure the error is logged and returned, and the previous
    /// snapshot stays in place.
    pub fn refresh(&self) -> Result<(), SettingsError> {
        match self.source.load() {
            Ok(settings) => {
                *self.current.write().unwrap_or_else(PoisonError::into_inner) =
                    Arc::new(settings);
                debug!("dispatch settings refreshed");
                Ok(())
            }
            Err(e) => {
                self.failed_refreshes.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "settings refresh failed, keeping previous values");
                Err(e)
            }
        }
    }

    /// Number of refresh attempts that failed.
    pub fn failed_refreshes(&self) -> u64 {
        self.failed_refreshes.load(Ordering::Relaxed)
    }

    /// Get a reference to the source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: SettingsSource> SettingsProvider for CachedSettings<S> {
    fn snapshot(&self) -> Arc<DispatchSettings> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }
}

/// String key-value preference storage.
///
/// Booleans are stored as `"true"`/`"false"`, modes by name. Missing keys
/// take their default. The store starts ready; hosts that load preferences
/// asynchronously can flip readiness with `set_ready`.
#[derive(Debug)]
pub struct PreferenceStore {
    values: DashMap<String, String>,
    ready: AtomicBool,
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore {
    /// Create an empty, ready store.
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
            ready: AtomicBool::new(true),
        }
    }

    /// Write a raw value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Write a per-app mode.
    pub fn set_app_mode(&self, package: &str, mode: UiMode) {
        self.set(format!("{}{}", APP_MODE_PREFIX, package), mode.as_str());
    }

    /// Delete a key.
    pub fn remove(&self, key: &str) {
        self.values.remove(key);
    }

    /// Mark the storage as loaded or not.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    fn flag(&self, key: &str) -> Result<bool, SettingsError> {
        match self.values.get(key) {
            None => Ok(false),
            Some(raw) => match raw.value().trim() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                other => Err(SettingsError::Invalid {
                    key: key.to_string(),
                    value: other.to_string(),
                }),
            },
        }
    }

    fn mode(key: &str, raw: &str) -> Result<UiMode, SettingsError> {
        UiMode::parse(raw).ok_or_else(|| SettingsError::Invalid {
            key: key.to_string(),
            value: raw.to_string(),
        })
    }
}

impl SettingsSource for PreferenceStore {
    fn load(&self) -> Result<DispatchSettings, SettingsError> {
        if !self.ready.load(Ordering::SeqCst) {
            return Err(SettingsError::Unavailable(
                "preferences not loaded yet".to_string(),
            ));
        }

        let mut settings = DispatchSettings::new()
            .with_app_config_template(self.flag(KEY_APP_CONFIG_TEMPLATE)?)
            .with_only_front(self.flag(KEY_ONLY_FRONT)?)
            .with_only_main(self.flag(KEY_ONLY_MAIN)?)
            .with_always_show_reopen(self.flag(KEY_ALWAYS_SHOW_REOPEN)?)
            .with_verbose_log(self.flag(KEY_VERBOSE_LOG)?);

        if let Some(raw) = self.values.get(KEY_GLOBAL_MODE) {
            match Self::mode(KEY_GLOBAL_MODE, raw.value()) {
                Ok(mode) => settings = settings.with_global_mode(Some(mode)),
                Err(e) => warn!(error = %e, "ignoring global mode override"),
            }
        }

        // A bad per-app entry only loses that app's mode.
        for entry in self.values.iter() {
            if let Some(package) = entry.key().strip_prefix(APP_MODE_PREFIX) {
                if package.is_empty() {
                    continue;
                }
                match Self::mode(entry.key(), entry.value()) {
                    Ok(mode) => settings = settings.with_app_mode(package, mode),
                    Err(e) => warn!(package, error = %e, "ignoring per-app mode"),
                }
            }
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_settings_replace() {
        let provider = StaticSettings::default();
        let before = provider.snapshot();

        provider.replace(DispatchSettings::new().with_only_main(true));

        assert!(!before.only_show_errors_in_main);
        assert!(provider.snapshot().only_show_errors_in_main);
    }

    #[test]
    fn test_preference_store_parses_keys() {
        let store = PreferenceStore::new();
        store.set(KEY_APP_CONFIG_TEMPLATE, "true");
        store.set(KEY_ONLY_FRONT, "1");
        store.set(KEY_GLOBAL_MODE, "toast");
        store.set_app_mode("com.example", UiMode::Notify);

        let settings = store.load().unwrap();

        assert!(settings.enable_app_config_template);
        assert!(settings.only_show_errors_in_front);
        assert!(!settings.only_show_errors_in_main);
        assert_eq!(settings.global_mode, Some(UiMode::Toast));
        assert_eq!(settings.app_modes.get("com.example"), Some(&UiMode::Notify));
    }

    #[test]
    fn test_preference_store_rejects_garbage() {
        let store = PreferenceStore::new();
        store.set(KEY_ONLY_MAIN, "maybe");

        assert_eq!(
            store.load(),
            Err(SettingsError::Invalid {
                key: KEY_ONLY_MAIN.to_string(),
                value: "maybe".to_string(),
            })
        );
    }

    #[test]
    fn test_bad_app_mode_does_not_block_other_keys() {
        let store = PreferenceStore::new();
        store.set(KEY_APP_CONFIG_TEMPLATE, "true");
        store.set_app_mode("com.example", UiMode::Toast);
        store.set(format!("{}com.junk", APP_MODE_PREFIX), "popup");
        store.set(KEY_GLOBAL_MODE, "sideways");
        let cache = CachedSettings::new(store);

        cache.source().set(KEY_ONLY_FRONT, "true");
        assert!(cache.refresh().is_ok());

        let settings = cache.snapshot();
        assert!(settings.only_show_errors_in_front);
        assert_eq!(settings.global_mode, None);
        assert_eq!(settings.app_modes.get("com.example"), Some(&UiMode::Toast));
        assert!(!settings.app_modes.contains_key("com.junk"));
        assert_eq!(cache.failed_refreshes(), 0);
    }

    #[test]
    fn test_not_ready_store_is_unavailable() {
        let store = PreferenceStore::new();
        store.set_ready(false);
        assert!(matches!(store.load(), Err(SettingsError::Unavailable(_))));
    }

    #[test]
    fn test_cached_settings_keep_stale_values() {
        let store = PreferenceStore::new();
        store.set(KEY_ONLY_MAIN, "true");
        let cache = CachedSettings::new(store);
        assert!(cache.snapshot().only_show_errors_in_main);

        cache.source().set(KEY_ONLY_MAIN, "false");
        cache.source().set_ready(false);
        assert!(cache.refresh().is_err());
        assert!(cache.snapshot().only_show_errors_in_main);
        assert_eq!(cache.failed_refreshes(), 1);

        cache.source().set_ready(true);
        assert!(cache.refresh().is_ok());
        assert!(!cache.snapshot().only_show_errors_in_main);
    }

    #[test]
    fn test_cached_settings_start_with_defaults_when_unavailable() {
        let store = PreferenceStore::new();
        store.set_ready(false);
        store.set(KEY_VERBOSE_LOG, "true");

        let cache = CachedSettings::new(store);
        assert_eq!(*cache.snapshot(), DispatchSettings::default());
    }
}
