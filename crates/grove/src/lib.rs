//! Grove: the structural core of a retained-mode widget toolkit.
//!
//! Nodes live in an arena owned by [`Core`]. Each node owns an ordered list of
//! children (paint order, topmost last) and keeps a non-owning back-reference to
//! its parent. Input is routed by hit-testing down the tree, drawing recurses
//! top to bottom, and layout is negotiated lazily through pluggable [`Layout`]
//! strategies.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Screen`] - The root surface: z-order, focus, and the input pump
//! - [`Core`] - The node arena and the default dispatch algorithms
//! - [`Widget`] - The trait implemented by all widget behaviour
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (Point, Expanse, Rect)
//! - [`widgets`] - Windows, popups, and the controls they need

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

// Public modules
pub mod layout;
pub mod widget;
pub mod widgets;

pub use geom;

pub use core::{
    Context, Core, FocusManager, IdSource, NodeId, PopupState, Screen, SequentialIds,
    WindowManager, WindowState,
};
pub use core::{error, event, node, render, testing, theme};

pub use layout::Layout;
pub use widget::{EventOutcome, Widget};
