//! Mock host object for testing context extraction.

use crate::application::ports::{HostHandle, HostValue};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A host object built from name-to-value maps.
///
/// Each probe is logged so tests can assert which accessor names were tried.
#[derive(Debug, Default)]
pub struct MockHandle {
    methods: HashMap<String, HostValue>,
    fields: HashMap<String, HostValue>,
    probes: Mutex<Vec<String>>,
}

impl MockHandle {
    /// Create an object that answers nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer a zero-argument method.
    pub fn with_method(mut self, name: &str, value: HostValue) -> Self {
        self.methods.insert(name.to_string(), value);
        self
    }

    /// Answer a field read.
    pub fn with_field(mut self, name: &str, value: HostValue) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Finish into a shared handle.
    pub fn into_handle(self) -> Arc<dyn HostHandle> {
        Arc::new(self)
    }

    /// Names probed so far, as `name()` for methods and `name` for fields.
    pub fn probes(&self) -> Vec<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.probes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HostHandle for MockHandle {
    fn call(&self, method: &str) -> Option<HostValue> {
        self.lock().push(format!("{}()", method));
        self.methods.get(method).cloned()
    }

    fn field(&self, name: &str) -> Option<HostValue> {
        self.lock().push(name.to_string());
        self.fields.get(name).cloned()
    }
}
