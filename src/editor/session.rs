//! Editor session.
//!
//! [`EditorSession`] owns the live [`Document`], its [`History`] and the
//! element [`Buffer`]. It is the only place where history gets recorded:
//! undoable operations call the document mutator and then [`record`].
//! Selection, zoom, pan and navigation go straight to the document and are
//! never recorded.
//!
//! [`record`]: EditorSession::record

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use tracing::{debug, warn};

use super::buffer::{Buffer, BufferAction};
use super::history::{History, HistoryItem};
use crate::config::EditorConfig;
use crate::document::{Document, DocumentSnapshot};
use crate::error::EditorResult;
use crate::ids::{element_prefix, unique_id};
use crate::model::{Element, ElementPatch, Floor, FloorPatch, FloorSpec, Metadata, ViewPlane};
use crate::source::{
    Clipboard, TextSink, TextSource, default_export_name, default_floors_export_name,
    ensure_json_extension,
};

const INITIAL_DESCRIPTION: &str = "Initial canvas state";

#[derive(Debug, Clone)]
pub struct EditorSession {
    pub document: Document,
    pub history: History<DocumentSnapshot>,
    pub buffer: Buffer,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    /// A session with the default config and the three standard floors.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self::from_document(Document::with_default_floors(config))
    }

    /// Wrap an existing document; its current state becomes the baseline.
    pub fn from_document(document: Document) -> Self {
        let mut history = History::new(document.config().history_limit);
        history.initialize(&document, INITIAL_DESCRIPTION);
        Self {
            document,
            history,
            buffer: Buffer::new(),
        }
    }

    /// Record the current document state. Suppressed during a restore.
    pub fn record(&mut self, description: impl Into<String>) -> bool {
        self.history.push(&self.document, description)
    }

    fn element_label(&self, id: &str) -> String {
        self.document
            .element(id)
            .map(|e| e.display_name().to_string())
            .unwrap_or_else(|| id.to_string())
    }

    // ── Elements ───────────────────────────────────────────────────────────

    pub fn add_element(&mut self, element: Element) -> String {
        let id = self.document.add_element(element);
        let label = self.element_label(&id);
        self.record(format!("Added {}", label));
        id
    }

    pub fn remove_element(&mut self, id: &str) -> Option<Element> {
        let removed = self.document.remove_element(id);
        match &removed {
            Some(element) => {
                self.record(format!("Removed {}", element.display_name()));
            }
            None => warn!(id, "cannot remove unknown element"),
        }
        removed
    }

    pub fn remove_element_cascade(&mut self, id: &str) -> Option<Element> {
        let removed = self.document.remove_element_cascade(id);
        match &removed {
            Some(element) => {
                self.record(format!("Removed {} and detached its children", element.display_name()));
            }
            None => warn!(id, "cannot remove unknown element"),
        }
        removed
    }

    pub fn toggle_visibility(&mut self, id: &str) -> Option<bool> {
        let visible = self.document.toggle_visibility(id)?;
        let label = self.element_label(id);
        let verb = if visible { "Showed" } else { "Hid" };
        self.record(format!("{} {}", verb, label));
        Some(visible)
    }

    /// Merge a patch without recording, e.g. while a property is being typed.
    pub fn update_element(&mut self, id: &str, patch: &ElementPatch) -> bool {
        self.document.update_element(id, patch).is_some()
    }

    /// Merge a patch and record it. Without a description, the entry lists
    /// the fields that were written.
    pub fn update_element_recorded(
        &mut self,
        id: &str,
        patch: &ElementPatch,
        description: Option<&str>,
    ) -> bool {
        let Some(fields) = self.document.update_element(id, patch) else {
            warn!(id, "cannot update unknown element");
            return false;
        };
        let description = match description {
            Some(text) => text.to_string(),
            None => format!("Updated {}: {}", self.element_label(id), fields.join(", ")),
        };
        self.record(description);
        true
    }

    pub fn set_position(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.document.set_position(id, x, y)
    }

    /// Move an element; records only when a description is given, so a
    /// drag can update continuously and record once at the end.
    pub fn set_position_recorded(&mut self, id: &str, x: f64, y: f64, description: Option<&str>) -> bool {
        if !self.document.set_position(id, x, y) {
            return false;
        }
        if let Some(description) = description {
            self.record(description);
        }
        true
    }

    // ── Floors and view ────────────────────────────────────────────────────

    pub fn select_floor(&mut self, floor_id: &str) -> bool {
        self.document.select_floor(floor_id)
    }

    /// Records only when the active floor actually changes.
    pub fn select_floor_recorded(&mut self, floor_id: &str) -> bool {
        let changed = self.document.active_floor.as_deref() != Some(floor_id);
        if !self.document.select_floor(floor_id) {
            warn!(floor_id, "cannot select unknown floor");
            return false;
        }
        if changed {
            let name = self
                .document
                .floor(floor_id)
                .map(|f| f.name.clone())
                .unwrap_or_default();
            self.record(format!("Switched to floor {}", name));
        }
        true
    }

    pub fn add_floor(&mut self, spec: &FloorSpec) -> String {
        let id = self.document.add_floor(spec);
        let name = self
            .document
            .floor(&id)
            .map(|f| f.name.clone())
            .unwrap_or_default();
        self.record(format!("Added floor {}", name));
        id
    }

    pub fn edit_floor(&mut self, id: &str, patch: &FloorPatch) -> bool {
        let Some(fields) = self.document.edit_floor(id, patch) else {
            warn!(id, "cannot edit unknown floor");
            return false;
        };
        self.record(format!("Edited floor {}: {}", id, fields.join(", ")));
        true
    }

    /// Remove an empty floor. Nothing is recorded when the floor is missing
    /// or still holds elements.
    pub fn remove_floor(&mut self, id: &str) -> EditorResult<Option<Floor>> {
        let removed = self.document.remove_floor(id).inspect_err(|err| {
            warn!(%err, "floor removal refused");
        })?;
        if let Some(floor) = &removed {
            self.record(format!("Removed floor {}", floor.name));
        }
        Ok(removed)
    }

    /// Records only when the view actually changes.
    pub fn change_view(&mut self, view: ViewPlane) -> bool {
        if !self.document.set_view(view) {
            return false;
        }
        self.record(format!("Changed view to {}", view));
        true
    }

    pub fn select_element(&mut self, id: Option<&str>) {
        self.document.select_element(id);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.document.set_zoom(zoom);
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.document.set_pan(x, y);
    }

    // ── Navigation ─────────────────────────────────────────────────────────

    pub fn enter_element(&mut self, id: &str) -> bool {
        self.document.enter_element(id)
    }

    pub fn exit_to_parent(&mut self) -> bool {
        self.document.exit_to_parent()
    }

    pub fn go_to_floor(&mut self, floor_id: &str) -> bool {
        self.document.go_to_floor(floor_id)
    }

    // ── History ────────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        let restored = self.history.undo(&mut self.document);
        if restored {
            self.document.ensure_navigation();
        }
        restored
    }

    pub fn redo(&mut self) -> bool {
        let restored = self.history.redo(&mut self.document);
        if restored {
            self.document.ensure_navigation();
        }
        restored
    }

    pub fn jump_to(&mut self, index: usize) -> bool {
        let restored = self.history.jump_to(index, &mut self.document);
        if restored {
            self.document.ensure_navigation();
        }
        restored
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_entries(&self) -> Vec<HistoryItem> {
        self.history.entries()
    }

    // ── Buffer ─────────────────────────────────────────────────────────────

    /// Buffer an element and take it out of the document.
    pub fn move_to_buffer(&mut self, id: &str) -> Option<String> {
        let Some(element) = self.document.element(id) else {
            warn!(id, "cannot move unknown element to buffer");
            return None;
        };
        let buffer_id = self.buffer.add(element, BufferAction::Moved, "Moved to buffer");
        self.remove_element(id);
        Some(buffer_id)
    }

    /// Buffer a duplicate; the document is not touched.
    pub fn copy_to_buffer(&mut self, id: &str) -> Option<String> {
        let Some(element) = self.document.element(id) else {
            warn!(id, "cannot copy unknown element to buffer");
            return None;
        };
        Some(self.buffer.add(element, BufferAction::Copied, "Copied to buffer"))
    }

    /// Put a buffered element back where it came from and drop the entry.
    ///
    /// If the original element still exists it is moved back to its origin
    /// floor and position. Otherwise the buffered copy is re-inserted under
    /// its original id.
    pub fn restore_from_buffer(&mut self, buffer_id: &str) -> bool {
        let Some(item) = self.buffer.take(buffer_id) else {
            warn!(buffer_id, "unknown buffer entry");
            return false;
        };
        let label = item.element.display_name().to_string();
        let origin = item.source;
        if let Some(existing) = self.document.element_mut(&item.original_id) {
            existing.floor_id = origin.floor_id;
            existing.position = origin.position;
            existing.touch();
        } else {
            let mut element = item.element;
            element.id = item.original_id.clone();
            element.floor_id = origin.floor_id;
            element.position = origin.position;
            let parent_exists = element
                .parent
                .as_deref()
                .is_some_and(|parent| self.document.element(parent).is_some());
            if !parent_exists {
                element.parent = None;
            }
            let parent_id = element.parent.clone();
            let id = self.document.insert_element(element);
            if let Some(parent_id) = parent_id {
                if let Some(parent) = self.document.element_mut(&parent_id) {
                    if !parent.children.contains(&id) {
                        parent.children.push(id);
                    }
                }
            }
        }
        debug!(buffer_id, original = %item.original_id, "buffer entry restored");
        self.record(format!("Restored {} from buffer", label));
        true
    }

    /// Paste a buffered element as a new root element of the active floor.
    ///
    /// Without a position the configured paste position is used. A "moved"
    /// entry is consumed; a "copied" one can be pasted again.
    pub fn paste_from_buffer(&mut self, buffer_id: &str, position: Option<(f64, f64)>) -> Option<String> {
        let Some(item) = self.buffer.get(buffer_id) else {
            warn!(buffer_id, "unknown buffer entry");
            return None;
        };
        let consume = item.source.action == BufferAction::Moved;
        let mut element = item.element.clone();
        let (x, y) = position.unwrap_or(self.document.config().default_paste_position);

        let prefix = element_prefix(&element.element_type);
        element.id = unique_id(&prefix, |candidate| self.document.element(candidate).is_some());
        if let Some(active) = &self.document.active_floor {
            element.floor_id = active.clone();
        }
        element.parent = None;
        element.children.clear();
        element.position.x = x;
        element.position.y = y;
        element.metadata = Metadata::now();
        let label = element.display_name().to_string();

        let id = self.document.insert_element(element);
        if consume {
            self.buffer.remove(buffer_id);
        }
        self.record(format!("Pasted {}", label));
        Some(id)
    }

    pub fn remove_from_buffer(&mut self, buffer_id: &str) -> bool {
        self.buffer.remove(buffer_id)
    }

    pub fn clear_buffer(&mut self) -> usize {
        self.buffer.clear()
    }

    // ── Serialization ──────────────────────────────────────────────────────

    pub fn serialize(&self) -> EditorResult<String> {
        self.document.to_json()
    }

    pub fn serialize_floors(&self) -> EditorResult<String> {
        self.document.floors_to_json()
    }

    /// Replace the document with `text`. Records on success only; on error
    /// the document is untouched.
    pub fn deserialize(&mut self, text: &str) -> EditorResult<()> {
        if let Err(err) = self.document.load_json(text) {
            warn!(%err, "import rejected");
            return Err(err);
        }
        self.record("Imported document");
        Ok(())
    }

    /// Import a `.json` file and show the active floor.
    pub fn import_from(&mut self, source: &mut impl TextSource, path: &Utf8Path) -> Result<()> {
        ensure_json_extension(path)?;
        let text = source.read_to_string(path)?;
        self.deserialize(&text)
            .with_context(|| format!("Failed to import {}", path))?;
        if let Some(active) = self.document.active_floor.clone() {
            self.document.go_to_floor(&active);
        }
        Ok(())
    }

    pub fn export_to(&self, sink: &mut impl TextSink, filename: Option<&str>) -> Result<Utf8PathBuf> {
        let payload = self.serialize()?;
        let filename = filename
            .map(str::to_string)
            .unwrap_or_else(|| default_export_name(Utc::now()));
        sink.save(&filename, &payload)
    }

    pub fn export_floors_to(&self, sink: &mut impl TextSink, filename: Option<&str>) -> Result<Utf8PathBuf> {
        let payload = self.serialize_floors()?;
        let filename = filename
            .map(str::to_string)
            .unwrap_or_else(|| default_floors_export_name(Utc::now()));
        sink.save(&filename, &payload)
    }

    pub fn copy_to_clipboard(&self, clipboard: &mut impl Clipboard) -> Result<()> {
        let payload = self.serialize()?;
        clipboard.write_text(&payload)
    }

    pub fn paste_from_clipboard(&mut self, clipboard: &mut impl Clipboard) -> Result<()> {
        let text = clipboard.read_text()?;
        self.deserialize(&text).context("Clipboard does not hold a document")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use crate::source::{MemoryClipboard, MemorySink};

    fn session() -> EditorSession {
        let mut s = EditorSession::new();
        s.add_element(Element::new("mesa_1", "mesa").with_name("Mesa").at(10.0, 20.0));
        s
    }

    #[test]
    fn test_new_session_has_baseline() {
        let s = EditorSession::new();
        assert_eq!(s.history.len(), 1);
        assert_eq!(s.history_entries()[0].description, INITIAL_DESCRIPTION);
        assert!(!s.can_undo());
    }

    #[test]
    fn test_add_then_undo() {
        let mut s = session();
        assert_eq!(s.history.len(), 2);
        assert!(s.undo());
        assert!(s.document.elements.is_empty());
        assert!(s.redo());
        assert!(s.document.element("mesa_1").is_some());
    }

    #[test]
    fn test_unrecorded_operations() {
        let mut s = session();
        s.set_position("mesa_1", 1.0, 1.0);
        s.select_element(Some("mesa_1"));
        s.set_zoom(2.0);
        s.set_pan(3.0, 3.0);
        s.update_element(
            "mesa_1",
            &ElementPatch {
                name: Some("x".into()),
                ..Default::default()
            },
        );
        assert_eq!(s.history.len(), 2);
    }

    #[test]
    fn test_recorded_wrappers() {
        let mut s = session();
        assert!(s.set_position_recorded("mesa_1", 5.0, 5.0, None));
        assert_eq!(s.history.len(), 2);
        assert!(s.set_position_recorded("mesa_1", 6.0, 6.0, Some("Dragged mesa")));
        assert_eq!(s.history.len(), 3);

        let patch = ElementPatch {
            color: Some("#000".into()),
            ..Default::default()
        };
        assert!(s.update_element_recorded("mesa_1", &patch, None));
        let last = s.history_entries().pop().unwrap();
        assert!(last.description.contains("color"));
        assert!(!s.update_element_recorded("ghost", &patch, None));
        assert_eq!(s.history.len(), 4);
    }

    #[test]
    fn test_select_floor_and_view_record_only_on_change() {
        let mut s = session();
        let before = s.history.len();
        assert!(s.select_floor_recorded("planta_1"));
        assert_eq!(s.history.len(), before);
        assert!(s.select_floor_recorded("planta_2"));
        assert_eq!(s.history.len(), before + 1);
        assert!(!s.select_floor_recorded("nope"));

        assert!(!s.change_view(ViewPlane::Xy));
        assert!(s.change_view(ViewPlane::Zx));
        assert_eq!(s.history.len(), before + 2);
    }

    #[test]
    fn test_remove_floor_failure_not_recorded() {
        let mut s = session();
        let before = s.history.len();
        let err = s.remove_floor("planta_1").unwrap_err();
        assert!(matches!(err, EditorError::FloorNotEmpty { .. }));
        assert_eq!(s.history.len(), before);
        assert!(s.remove_floor("missing").unwrap().is_none());
        assert_eq!(s.history.len(), before);
        assert!(s.remove_floor("planta_3").unwrap().is_some());
        assert_eq!(s.history.len(), before + 1);
    }

    #[test]
    fn test_move_then_restore() {
        let mut s = session();
        let buffer_id = s.move_to_buffer("mesa_1").unwrap();
        assert!(s.document.element("mesa_1").is_none());
        assert!(s.restore_from_buffer(&buffer_id));
        let e = s.document.element("mesa_1").unwrap();
        assert_eq!(e.floor_id, "planta_1");
        assert_eq!((e.position.x, e.position.y), (10.0, 20.0));
        assert!(s.buffer.is_empty());
        assert!(!s.restore_from_buffer(&buffer_id));
    }

    #[test]
    fn test_restore_existing_moves_back() {
        let mut s = session();
        let buffer_id = s.copy_to_buffer("mesa_1").unwrap();
        s.set_position("mesa_1", 300.0, 300.0);
        assert!(s.restore_from_buffer(&buffer_id));
        assert_eq!(s.document.elements.len(), 1);
        assert_eq!(s.document.element("mesa_1").unwrap().position.x, 10.0);
    }

    #[test]
    fn test_restore_child_reattaches_to_parent() {
        let mut s = EditorSession::new();
        s.add_element(Element::new("box", "contenedor"));
        s.enter_element("box");
        s.add_element(Element::new("item", "caja"));
        s.go_to_floor("planta_1");
        let buffer_id = s.move_to_buffer("item").unwrap();
        assert!(s.restore_from_buffer(&buffer_id));
        let item = s.document.element("item").unwrap();
        assert_eq!(item.parent.as_deref(), Some("box"));
        assert_eq!(s.document.element("box").unwrap().children, vec!["item".to_string()]);
    }

    #[test]
    fn test_copy_paste() {
        let mut s = session();
        let buffer_id = s.copy_to_buffer("mesa_1").unwrap();
        let pasted = s.paste_from_buffer(&buffer_id, Some((5.0, 5.0))).unwrap();
        assert_ne!(pasted, "mesa_1");
        let p = s.document.element(&pasted).unwrap();
        assert_eq!((p.position.x, p.position.y), (5.0, 5.0));
        assert_eq!(p.name, "Mesa");
        assert_eq!(s.document.element("mesa_1").unwrap().position.x, 10.0);
        assert!(s.buffer.get(&buffer_id).is_some());
    }

    #[test]
    fn test_paste_moved_consumes_entry() {
        let mut s = session();
        s.select_floor("planta_2");
        let buffer_id = s.move_to_buffer("mesa_1").unwrap();
        let pasted = s.paste_from_buffer(&buffer_id, None).unwrap();
        let p = s.document.element(&pasted).unwrap();
        assert_eq!(p.floor_id, "planta_2");
        assert_eq!((p.position.x, p.position.y), (100.0, 100.0));
        assert!(s.buffer.is_empty());
        assert!(s.paste_from_buffer(&buffer_id, None).is_none());
    }

    #[test]
    fn test_deserialize_failure_not_recorded() {
        let mut s = session();
        let before = s.history.len();
        assert!(s.deserialize("{}").is_err());
        assert_eq!(s.history.len(), before);
        assert_eq!(s.document.elements.len(), 1);
    }

    #[test]
    fn test_export_and_clipboard() {
        let s = session();
        let mut sink = MemorySink::default();
        let path = s.export_to(&mut sink, None).unwrap();
        assert!(path.as_str().starts_with("canvas-export-"));
        let path = s.export_floors_to(&mut sink, Some("f.json")).unwrap();
        assert_eq!(path.as_str(), "f.json");
        assert_eq!(sink.files.len(), 2);

        let mut clip = MemoryClipboard::default();
        s.copy_to_clipboard(&mut clip).unwrap();
        let mut other = EditorSession::new();
        other.paste_from_clipboard(&mut clip).unwrap();
        assert!(other.document.element("mesa_1").is_some());
        assert_eq!(other.history.len(), 2);
    }

    #[test]
    fn test_import_rejects_non_json() {
        struct NoRead;
        impl TextSource for NoRead {
            fn read_to_string(&mut self, _: &Utf8Path) -> Result<String> {
                unreachable!("extension is checked first")
            }
        }
        let mut s = session();
        let err = s.import_from(&mut NoRead, Utf8Path::new("layout.txt")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EditorError>(),
            Some(EditorError::UnsupportedExtension(_))
        ));
    }
}
