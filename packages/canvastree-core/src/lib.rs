#![forbid(unsafe_code)]
//! Core engine for a drag-and-drop UI builder: an id-addressed document of
//! component nodes, pure drop-position geometry, a drag-session facade, and
//! a data-driven registry of component kinds. The crate stays independent
//! of any concrete renderer or storage backend; hosts satisfy the traits
//! defined here to supply persistence, id generation, and action dispatch.

pub mod document;
pub mod error;
pub mod ids;
pub mod kinds;
pub mod node;
pub mod placement;
pub mod session;
pub mod traits;

pub use document::{Document, DocumentIter, NodeRef};
pub use error::{Error, Result};
pub use ids::{Kind, NodeId};
pub use kinds::{KindRegistry, KindSpec, PaletteGroup};
pub use node::ComponentNode;
pub use placement::{
    resolve_drop, DropDecision, DropIndicator, DropPosition, DropTarget, HoverInfo, HoverRect,
};
pub use session::{Builder, DragGesture, DropOutcome, PanelResize, ACTION_ATTRIBUTE};
pub use traits::{
    ActionDispatcher, DocumentStore, IdProvider, MemoryStore, NoopDispatcher, SequentialIds,
    UuidIds,
};
