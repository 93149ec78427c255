//! Installed-application catalog adapters.

use crate::application::ports::AppCatalog;
use dashmap::{DashMap, DashSet};

/// Catalog populated by the embedder.
///
/// Packages inserted with a label are launchable for every user. Packages
/// added through `insert_hidden` have a label but no launcher entry.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    labels: DashMap<String, String>,
    hidden: DashSet<String>,
    permissive: bool,
}

impl StaticCatalog {
    /// Create an empty catalog. Unknown packages have no launcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog that reports every package as launchable.
    pub fn permissive() -> Self {
        Self {
            permissive: true,
            ..Self::default()
        }
    }

    /// Register a launchable package with its display label.
    pub fn insert(&self, package: impl Into<String>, label: impl Into<String>) {
        let package = package.into();
        self.hidden.remove(&package);
        self.labels.insert(package, label.into());
    }

    /// Register a package that has a label but no launcher entry.
    pub fn insert_hidden(&self, package: impl Into<String>, label: impl Into<String>) {
        let package = package.into();
        self.hidden.insert(package.clone());
        self.labels.insert(package, label.into());
    }

    /// Forget a package.
    pub fn remove(&self, package: &str) {
        self.labels.remove(package);
        self.hidden.remove(package);
    }
}

impl AppCatalog for StaticCatalog {
    fn has_launcher(&self, package: &str, _user_id: i32) -> bool {
        if self.hidden.contains(package) {
            return false;
        }
        self.permissive || self.labels.contains_key(package)
    }

    fn label(&self, package: &str) -> Option<String> {
        self.labels.get(package).map(|label| label.value().clone())
    }
}
