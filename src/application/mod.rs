//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain logic and holds the runtime state:
//! - Event deduplicator (short-window token memory)
//! - Mute registry (process-lifetime mute sets)
//! - Crash dispatcher (the dispatch pipeline)
//! - Settings refresher (periodic reload)
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that the host and the
//! infrastructure adapters implement. This keeps the pipeline independent
//! from the host's UI toolkit and storage.

pub mod deduplicator;
pub mod dispatcher;
pub mod icon_cache;
pub mod metrics;
pub mod mute_registry;
pub mod ports;
pub mod refresher;
pub mod triggers;
