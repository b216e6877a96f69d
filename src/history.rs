use std::collections::VecDeque;

use crate::models::{normalize_category, EditHistoryEntry};

pub const DEFAULT_UNDO_LIMIT: usize = 10;

/// Most recent category edits, newest last. Once full, pushing drops the oldest.
#[derive(Debug, Clone)]
pub struct EditHistory {
    entries: VecDeque<EditHistoryEntry>,
    capacity: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}

impl EditHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a change of `row` from `previous` to `current`. Returns false when
    /// nothing changed and no entry was recorded.
    pub fn push(&mut self, row: usize, previous: &str, current: &str) -> bool {
        let previous_category = normalize_category(previous);
        let current_category = normalize_category(current);
        if previous_category == current_category {
            return false;
        }
        self.entries.push_back(EditHistoryEntry {
            row,
            previous_category,
            current_category,
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        true
    }

    pub fn pop(&mut self) -> Option<EditHistoryEntry> {
        self.entries.pop_back()
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Drop every entry; called when a new source file is opened.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PLACEHOLDER_CATEGORY as PLACEHOLDER;

    fn entry(row: usize, prev: Option<&str>, cur: Option<&str>) -> EditHistoryEntry {
        EditHistoryEntry {
            row,
            previous_category: prev.map(str::to_string),
            current_category: cur.map(str::to_string),
        }
    }

    #[test]
    fn test_pop_order() {
        let mut history = EditHistory::default();
        history.push(0, "", "Food");
        history.push(1, "", "Transport");

        assert_eq!(history.pop(), Some(entry(1, None, Some("Transport"))));
        assert!(history.can_undo());
        assert_eq!(history.pop(), Some(entry(0, None, Some("Food"))));
        assert_eq!(history.pop(), None);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_capacity_keeps_most_recent() {
        let mut history = EditHistory::new(10);
        for i in 0..15 {
            history.push(i, "", &format!("Cat {i}"));
        }
        assert_eq!(history.len(), 10);
        assert_eq!(history.pop().unwrap().row, 14);
        let mut rows = Vec::new();
        while let Some(e) = history.pop() {
            rows.push(e.row);
        }
        assert_eq!(rows, vec![13, 12, 11, 10, 9, 8, 7, 6, 5]);
    }

    #[test]
    fn test_unchanged_edit_is_ignored() {
        let mut history = EditHistory::default();
        assert!(!history.push(0, "Food", "Food"));
        assert!(!history.push(0, PLACEHOLDER, ""));
        assert!(history.is_empty());
    }

    #[test]
    fn test_clearing_a_category_is_recorded() {
        let mut history = EditHistory::default();
        assert!(history.push(2, "Food", PLACEHOLDER));
        assert_eq!(history.pop(), Some(entry(2, Some("Food"), None)));
    }

    #[test]
    fn test_clear_resets() {
        let mut history = EditHistory::default();
        history.push(0, "", "Food");
        history.clear();
        assert!(!history.can_undo());
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut history = EditHistory::new(0);
        history.push(0, "", "A");
        history.push(1, "", "B");
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.pop().unwrap().row, 1);
    }
}
