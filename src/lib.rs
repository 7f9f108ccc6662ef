//! State and history for hierarchical floor layout editors.
//!
//! Elements (shelves, tables, cabinets, containers) live on named floors and
//! can nest inside each other. This crate keeps that document, undo/redo
//! history over it, navigation into nested containers, a move/copy buffer
//! and a versioned JSON format for import and export.
//!
//! Start from [`EditorSession`]; the binary `floorstack` validates and
//! summarizes exported files.

pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod ids;
pub mod model;
pub mod serialization;
pub mod source;

pub use config::EditorConfig;
pub use document::{Document, DocumentSnapshot};
pub use editor::EditorSession;
pub use error::{EditorError, EditorResult};
pub use serialization::{DocumentKind, ValidationReport, validate};
