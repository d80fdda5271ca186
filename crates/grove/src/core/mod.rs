#![allow(clippy::new_without_default)]
//! Core types and traits for the widget tree.

// Core modules - public
/// Core error types.
pub mod error;
/// Input event types.
pub mod event;
/// Node data stored in the arena.
pub mod node;
/// Rendering interfaces.
pub mod render;
/// Testing utilities.
pub mod testing;
/// Theme metrics, colours, and fonts.
pub mod theme;

// Core modules - internal
/// Per-call widget context.
pub mod context;
/// Focus management.
pub mod focus;
/// Node ID types.
pub mod id;
/// The reference root surface and input pump.
pub mod screen;
/// Window and popup state plus surface operations.
pub mod windows;
/// Arena, tree structure, and default dispatch.
pub mod world;

// Public exports from internal modules
pub use context::Context;
pub use focus::FocusManager;
pub use id::{IdSource, NodeId, SequentialIds};
pub use screen::Screen;
pub use windows::{PopupState, WindowManager, WindowState};
pub use world::Core;
