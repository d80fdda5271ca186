//! Instrumentation for exercising the tree without a real backend.

/// Screen plus renderer, driven like a window system would.
pub mod harness;
/// Leaf widget that logs every hook it receives.
pub mod probe;
/// Renderer that records paint operations.
pub mod render;

pub use harness::Harness;
pub use probe::{EventLog, Probe};
pub use render::RecordingRenderer;
