//! Editing layer on top of the [`Document`](crate::document::Document).
//!
//! - **History**: bounded snapshot undo/redo with redo-branch pruning
//! - **Navigation**: entering containers, breadcrumbs, adaptive canvas sizing
//! - **Buffer**: moving or copying elements out and putting them back
//! - **Session**: the context object that owns all of the above and records
//!   history after undoable operations

pub mod buffer;
pub mod history;
pub mod navigation;
pub mod session;

pub use buffer::{Buffer, BufferAction, BufferItem, SourceInfo};
pub use history::{History, HistoryEntry, HistoryItem, Restorable};
pub use navigation::{
    AdaptiveCanvas, Breadcrumb, EntryKind, Location, NavigationContext, PathEntry, category_icon,
};
pub use session::EditorSession;
