//! Domain layer - pure crash classification and policy logic.
//!
//! This layer contains the core concepts of the dispatch system:
//! - Normalized crash descriptors and their dedup tokens
//! - Presentation modes and dispatch outcomes
//! - Mute kinds
//! - Mode resolution policy over dispatch settings
//! - Crash records and outcome wording
//!
//! Nothing here touches locks, clocks or host handles.

pub mod descriptor;
pub mod message;
pub mod mode;
pub mod mute;
pub mod policy;
pub mod record;
pub mod token;
