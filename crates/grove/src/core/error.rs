use std::result::Result as StdResult;

use thiserror::Error;

use crate::core::id::NodeId;

/// Result type for grove operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The node does not exist in the arena (never created, or already freed).
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Walking the parent chain reached a root that is not a surface.
    #[error("no root surface above {0:?}")]
    NoSurface(NodeId),

    /// No ancestor of the node (including itself) is a window.
    #[error("no enclosing window for {0:?}")]
    NoEnclosingWindow(NodeId),

    /// A window operation was applied to a node without the window capability.
    #[error("not a window: {0:?}")]
    NotAWindow(NodeId),

    /// A popup operation was applied to a node without the popup capability.
    #[error("not a popup: {0:?}")]
    NotAPopup(NodeId),

    /// A popup's owner window no longer resolves.
    #[error("owner window of popup {0:?} no longer exists")]
    OwnerMissing(NodeId),

    /// The node has already completed its finishing step.
    #[error("node {0:?} is already associated")]
    AlreadyAssociated(NodeId),

    /// The node is already present in a child sequence.
    #[error("node {0:?} is already attached to a parent")]
    AlreadyAttached(NodeId),

    /// Attaching would make a node its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Prospective parent.
        parent: NodeId,
        /// Prospective child.
        child: NodeId,
    },

    /// A widget hook was re-entered on the same node.
    #[error("widget for {0:?} is already in use")]
    ReentrantWidgetBorrow(NodeId),

    /// The operation is not valid in the current state.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A resource (font, image) failed to load.
    #[error("resource: {0}")]
    Resource(String),

    /// Configuration could not be parsed.
    #[error("config: {0}")]
    Config(String),

    /// A user-supplied callback failed.
    #[error("callback: {0}")]
    Callback(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
