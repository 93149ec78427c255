//! Infrastructure layer - external adapters and integrations.
//!
//! This layer provides adapters for:
//! - Clock abstraction (system time vs mock)
//! - Crash context extraction from host objects
//! - In-memory crash records, settings and app catalog
//! - A logging presenter
//! - The fail-safe `CrashHook` entry point

pub mod catalog;
pub mod clock;
pub mod extraction;
pub mod hook;
pub mod memory_store;
pub mod presenter;
pub mod settings;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is enabled,
/// or during test builds.
///
/// To use these mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// crash-dispatch = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
