//! Element buffer (clipboard).
//!
//! Holds detached or duplicated copies of elements together with where they
//! came from, so they can be put back or pasted as new elements. The buffer
//! owns its copies; they do not change when the document does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ids::unique_id;
use crate::model::{Element, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferAction {
    /// The element was removed from the document.
    Moved,
    /// The element stays in the document; the entry is a duplicate.
    Copied,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub floor_id: String,
    pub position: Position,
    pub action: BufferAction,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferItem {
    pub id: String,
    pub original_id: String,
    pub element: Element,
    pub source: SourceInfo,
    pub added_at: DateTime<Utc>,
}

/// Buffer contents, at most one entry per original element.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    items: Vec<BufferItem>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a copy of `element`. An existing entry for the same element is
    /// replaced in place. Returns the new entry's id.
    pub fn add(
        &mut self,
        element: &Element,
        action: BufferAction,
        description: impl Into<String>,
    ) -> String {
        let now = Utc::now();
        let id = unique_id("buffer", |candidate| self.get(candidate).is_some());
        let item = BufferItem {
            id: id.clone(),
            original_id: element.id.clone(),
            element: element.clone(),
            source: SourceInfo {
                floor_id: element.floor_id.clone(),
                position: element.position,
                action,
                description: description.into(),
                timestamp: now,
            },
            added_at: now,
        };
        match self
            .items
            .iter_mut()
            .find(|existing| existing.original_id == element.id)
        {
            Some(existing) => {
                debug!(original = %element.id, "buffer entry replaced");
                *existing = item;
            }
            None => {
                debug!(original = %element.id, "buffer entry added");
                self.items.push(item);
            }
        }
        id
    }

    pub fn get(&self, id: &str) -> Option<&BufferItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[BufferItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True if an entry was made from the element with this id.
    pub fn contains_original(&self, element_id: &str) -> bool {
        self.items.iter().any(|item| item.original_id == element_id)
    }

    /// Remove and return an entry.
    pub fn take(&mut self, id: &str) -> Option<BufferItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.take(id).is_some()
    }

    /// Empty the buffer, returning how many entries were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.items.len();
        self.items.clear();
        count
    }
}
