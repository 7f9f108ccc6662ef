//! Snapshot-based undo/redo history.
//!
//! [`History`] keeps a bounded, linear list of snapshots and a cursor into
//! it. Pushing from anywhere but the tip drops the redo branch; pushing past
//! the size limit evicts the oldest snapshot. The history never looks at the
//! document directly: it only goes through the [`Restorable`] contract.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut history = History::new(50);
//! history.initialize(&document, "Initial state");
//! document.set_position("a", 10.0, 10.0);
//! history.push(&document, "Moved a");
//! history.undo(&mut document); // back to the initial state
//! history.redo(&mut document); // moved again
//! ```

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Capture/restore contract between the history and the state it tracks.
pub trait Restorable {
    type State: Clone;

    /// Deep copy of the current state.
    fn capture(&self) -> Self::State;
    /// Overwrite the current state with a copy of `state`.
    fn restore(&mut self, state: &Self::State);
}

#[derive(Debug, Clone)]
pub struct HistoryEntry<S> {
    pub state: S,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// Listing row for history UIs.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryItem {
    pub index: usize,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub is_current: bool,
}

#[derive(Debug, Clone)]
pub struct History<S> {
    entries: Vec<HistoryEntry<S>>,
    /// Index of the current entry; `None` while empty.
    cursor: Option<usize>,
    max_size: usize,
    restoring: bool,
}

/// Holds the restore flag for the duration of a restore and releases it on
/// drop, including during unwinding.
struct RestoreGuard<'a> {
    flag: &'a mut bool,
}

impl<'a> RestoreGuard<'a> {
    fn new(flag: &'a mut bool) -> Self {
        *flag = true;
        Self { flag }
    }
}

impl Drop for RestoreGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
    }
}

impl<S: Clone> History<S> {
    /// Create an empty history keeping at most `max_size` snapshots.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            max_size: max_size.max(1),
            restoring: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// 1-based position of the cursor, 0 when empty.
    pub fn current_position(&self) -> usize {
        self.cursor.map_or(0, |c| c + 1)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// True while a snapshot is being written back into the target.
    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    pub fn entry(&self, index: usize) -> Option<&HistoryEntry<S>> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> Vec<HistoryItem> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| HistoryItem {
                index,
                description: entry.description.clone(),
                timestamp: entry.timestamp,
                is_current: self.cursor == Some(index),
            })
            .collect()
    }

    /// Record the current state of `target`.
    ///
    /// Ignored while a restore is in progress. Returns true if a snapshot
    /// was stored.
    pub fn push<T>(&mut self, target: &T, description: impl Into<String>) -> bool
    where
        T: Restorable<State = S>,
    {
        if self.restoring {
            return false;
        }
        let description = description.into();
        if let Some(cursor) = self.cursor {
            self.entries.truncate(cursor + 1);
        }
        self.entries.push(HistoryEntry {
            state: target.capture(),
            description,
            timestamp: Utc::now(),
        });
        let mut cursor = self.entries.len() - 1;
        if self.entries.len() > self.max_size {
            self.entries.remove(0);
            cursor = cursor.saturating_sub(1);
        }
        self.cursor = Some(cursor);
        debug!(
            description = %self.entries[cursor].description,
            position = cursor + 1,
            total = self.entries.len(),
            "history snapshot stored"
        );
        true
    }

    /// Step back one snapshot, returning true if an undo was performed.
    pub fn undo<T>(&mut self, target: &mut T) -> bool
    where
        T: Restorable<State = S>,
    {
        if !self.can_undo() {
            warn!("nothing to undo");
            return false;
        }
        let index = self.cursor.map_or(0, |c| c - 1);
        self.restore_at(index, target);
        true
    }

    /// Step forward one snapshot, returning true if a redo was performed.
    pub fn redo<T>(&mut self, target: &mut T) -> bool
    where
        T: Restorable<State = S>,
    {
        if !self.can_redo() {
            warn!("nothing to redo");
            return false;
        }
        let index = self.cursor.map_or(0, |c| c + 1);
        self.restore_at(index, target);
        true
    }

    /// Move the cursor to `index` and restore that snapshot.
    pub fn jump_to<T>(&mut self, index: usize, target: &mut T) -> bool
    where
        T: Restorable<State = S>,
    {
        if index >= self.entries.len() {
            warn!(index, len = self.entries.len(), "history index out of range");
            return false;
        }
        self.restore_at(index, target);
        true
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// Reset the history to a single baseline snapshot of `target`.
    pub fn initialize<T>(&mut self, target: &T, description: impl Into<String>)
    where
        T: Restorable<State = S>,
    {
        self.clear();
        self.push(target, description);
    }

    fn restore_at<T>(&mut self, index: usize, target: &mut T)
    where
        T: Restorable<State = S>,
    {
        self.cursor = Some(index);
        let Self {
            entries, restoring, ..
        } = self;
        let entry = &entries[index];
        debug!(
            description = %entry.description,
            position = index + 1,
            "restoring history snapshot"
        );
        let _guard = RestoreGuard::new(restoring);
        target.restore(&entry.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal restorable target: a counter.
    #[derive(Default)]
    struct Counter {
        value: i32,
    }

    impl Restorable for Counter {
        type State = i32;
        fn capture(&self) -> i32 {
            self.value
        }
        fn restore(&mut self, state: &i32) {
            self.value = *state;
        }
    }

    fn history_with(values: &[i32], counter: &mut Counter) -> History<i32> {
        let mut h = History::new(50);
        h.initialize(&*counter, "start");
        for v in values {
            counter.value = *v;
            h.push(&*counter, format!("set {}", v));
        }
        h
    }

    #[test]
    fn test_empty_history() {
        let h: History<i32> = History::new(10);
        assert!(h.is_empty());
        assert_eq!(h.cursor(), None);
        assert_eq!(h.current_position(), 0);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn test_initialize_creates_baseline() {
        let mut c = Counter { value: 3 };
        let mut h = History::new(10);
        h.initialize(&c, "baseline");
        assert_eq!(h.len(), 1);
        assert_eq!(h.cursor(), Some(0));
        assert!(!h.undo(&mut c));
        assert_eq!(c.value, 3);
    }

    #[test]
    fn test_undo_redo() {
        let mut c = Counter::default();
        let mut h = history_with(&[1, 2, 3], &mut c);
        assert!(h.undo(&mut c));
        assert_eq!(c.value, 2);
        assert!(h.undo(&mut c));
        assert_eq!(c.value, 1);
        assert!(h.redo(&mut c));
        assert_eq!(c.value, 2);
        assert!(h.redo(&mut c));
        assert!(!h.redo(&mut c));
        assert_eq!(c.value, 3);
    }

    #[test]
    fn test_push_prunes_redo_branch() {
        let mut c = Counter::default();
        let mut h = history_with(&[1, 2, 3], &mut c);
        h.undo(&mut c);
        h.undo(&mut c);
        c.value = 10;
        h.push(&c, "branch");
        // baseline, 1, 10
        assert_eq!(h.len(), 3);
        assert!(!h.can_redo());
        h.undo(&mut c);
        assert_eq!(c.value, 1);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut c = Counter::default();
        let mut h = History::new(3);
        for v in 0..5 {
            c.value = v;
            h.push(&c, format!("set {}", v));
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.cursor(), Some(2));
        assert_eq!(h.entry(0).map(|e| e.state), Some(2));
        assert_eq!(h.entry(0).map(|e| e.description.as_str()), Some("set 2"));
    }

    #[test]
    fn test_jump_to() {
        let mut c = Counter::default();
        let mut h = history_with(&[1, 2, 3], &mut c);
        assert!(h.jump_to(1, &mut c));
        assert_eq!(c.value, 1);
        assert_eq!(h.current_position(), 2);
        assert!(!h.jump_to(4, &mut c));
        assert_eq!(c.value, 1);
    }

    #[test]
    fn test_entries_marks_current() {
        let mut c = Counter::default();
        let mut h = history_with(&[1, 2], &mut c);
        h.undo(&mut c);
        let items = h.entries();
        assert_eq!(items.len(), 3);
        assert!(items[1].is_current);
        assert!(!items[2].is_current);
        assert_eq!(items[2].description, "set 2");
    }

    #[test]
    fn test_guard_released_after_restore() {
        let mut c = Counter::default();
        let mut h = history_with(&[1], &mut c);
        h.undo(&mut c);
        assert!(!h.is_restoring());
        c.value = 5;
        assert!(h.push(&c, "after undo"));
    }

    #[test]
    fn test_guard_released_on_panic() {
        struct Exploding;
        impl Restorable for Exploding {
            type State = ();
            fn capture(&self) {}
            fn restore(&mut self, _: &()) {
                panic!("restore failed");
            }
        }
        let mut h = History::new(5);
        h.push(&Exploding, "a");
        h.push(&Exploding, "b");
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            h.undo(&mut Exploding);
        }));
        assert!(result.is_err());
        assert!(!h.is_restoring());
        assert!(h.push(&Exploding, "c"));
    }
}
