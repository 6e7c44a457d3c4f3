//! Selection Tracker
//!
//! Selected row keys survive page navigation. Bulk toggles only touch the
//! rows on the visible page.

use hashlink::LinkedHashSet;

use crate::domain::RowKey;

/// Checkbox state of the header "select all" box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSummary {
    None,
    Some,
    All,
}

/// Selected row keys in selection order
#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    selected: LinkedHashSet<RowKey>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one row; returns whether it is now selected
    pub fn toggle_row(&mut self, key: RowKey) -> bool {
        if self.selected.remove(&key) {
            false
        } else {
            self.selected.insert(key);
            true
        }
    }

    /// Header checkbox: clear the visible rows if all are selected, else select them
    ///
    /// Returns false when there is nothing visible to toggle.
    pub fn toggle_all(&mut self, visible: &[RowKey]) -> bool {
        if visible.is_empty() {
            return false;
        }
        if visible.iter().all(|k| self.selected.contains(k)) {
            for key in visible {
                self.selected.remove(key);
            }
        } else {
            for key in visible {
                if !self.selected.contains(key) {
                    self.selected.insert(key.clone());
                }
            }
        }
        true
    }

    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selected.contains(key)
    }

    /// State of the header checkbox for the visible rows
    pub fn summary(&self, visible: &[RowKey]) -> SelectionSummary {
        let hits = visible.iter().filter(|k| self.selected.contains(*k)).count();
        match hits {
            0 => SelectionSummary::None,
            n if n == visible.len() => SelectionSummary::All,
            _ => SelectionSummary::Some,
        }
    }

    /// Selected keys that are not among `visible`
    pub fn hidden_count(&self, visible: &[RowKey]) -> usize {
        self.selected.iter().filter(|k| !visible.contains(k)).count()
    }

    /// Full selection, in the order rows were selected
    pub fn selected(&self) -> Vec<RowKey> {
        self.selected.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(range: std::ops::Range<usize>) -> Vec<RowKey> {
        range.map(|i| RowKey::Id(format!("r{i}"))).collect()
    }

    #[test]
    fn test_toggle_row() {
        let mut tracker = SelectionTracker::new();
        let key = RowKey::Id("a".into());
        assert!(tracker.toggle_row(key.clone()));
        assert!(tracker.is_selected(&key));
        assert!(!tracker.toggle_row(key.clone()));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_select_all_is_scoped_to_visible_page() {
        let page1 = keys(0..10);
        let page2 = keys(10..17);
        let mut tracker = SelectionTracker::new();

        tracker.toggle_all(&page1);
        tracker.toggle_all(&page2);
        assert_eq!(tracker.len(), page1.len() + page2.len());

        // Toggling page 1 again only drops page 1
        tracker.toggle_all(&page1);
        assert_eq!(tracker.len(), page2.len());
        assert!(page2.iter().all(|k| tracker.is_selected(k)));
        assert_eq!(tracker.summary(&page1), SelectionSummary::None);
        assert_eq!(tracker.summary(&page2), SelectionSummary::All);
    }

    #[test]
    fn test_partial_page_selects_the_rest() {
        let page = keys(0..4);
        let mut tracker = SelectionTracker::new();
        tracker.toggle_row(page[1].clone());
        assert_eq!(tracker.summary(&page), SelectionSummary::Some);

        tracker.toggle_all(&page);
        assert_eq!(tracker.summary(&page), SelectionSummary::All);
        // Earlier selection keeps its position
        assert_eq!(tracker.selected()[0], page[1]);
    }

    #[test]
    fn test_empty_page() {
        let mut tracker = SelectionTracker::new();
        assert!(!tracker.toggle_all(&[]));
        assert_eq!(tracker.summary(&[]), SelectionSummary::None);
    }

    #[test]
    fn test_hidden_count() {
        let mut tracker = SelectionTracker::new();
        tracker.toggle_all(&keys(0..5));
        assert_eq!(tracker.hidden_count(&keys(3..8)), 3);
    }
}
