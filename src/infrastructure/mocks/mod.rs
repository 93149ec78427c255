//! Mock implementations for testing.
//!
//! Test doubles for the ports the dispatcher talks to, plus a tracing layer
//! that captures emitted events.

pub mod clock;
pub mod handle;
pub mod layer;
pub mod presenter;

pub use clock::MockClock;
pub use handle::MockHandle;
pub use layer::{CapturedEvent, MockCaptureLayer};
pub use presenter::MockPresenter;
