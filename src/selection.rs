use std::collections::HashSet;
use slint::{Model, SharedString, VecModel};

/// The current multi-selection of node ids.
#[derive(Debug, Default, Clone)]
pub struct SelectionManager {
    selected: HashSet<String>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a click on a node based on interaction modifiers
    pub fn handle_interaction(&mut self, id: &str, shift_held: bool) {
        if shift_held {
            if !self.selected.remove(id) {
                self.selected.insert(id.to_string());
            }
        } else {
            if self.selected.len() == 1 && self.selected.contains(id) {
                return;
            }
            self.selected.clear();
            self.selected.insert(id.to_string());
        }
    }

    /// Clear the current selection
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Replace the current selection with a new set of IDs
    ///
    /// Used when a box selection ends
    pub fn replace_selection<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected.clear();
        self.selected.extend(ids.into_iter().map(Into::into));
    }

    /// Check if an ID is selected
    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Whether more than one node is selected, so drags move the group
    pub fn is_multi(&self) -> bool {
        self.selected.len() > 1
    }

    /// Get an iterator over the selected IDs
    pub fn iter(&self) -> std::collections::hash_set::Iter<'_, String> {
        self.selected.iter()
    }

    /// Selected IDs in a stable (sorted) order
    pub fn sorted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Sync the selection into a Slint VecModel (sorted)
    pub fn sync_to_model(&self, model: &VecModel<SharedString>) {
        // Clear and repopulate to ensure exact match
        while model.row_count() > 0 {
            model.remove(0);
        }
        for id in self.sorted_ids() {
            model.push(SharedString::from(id.as_str()));
        }
    }

    /// Sync the selection from any Slint Model
    pub fn sync_from_model(&mut self, model: &dyn Model<Data = SharedString>) {
        self.selected.clear();
        for i in 0..model.row_count() {
            if let Some(id) = model.row_data(i) {
                self.selected.insert(id.to_string());
            }
        }
    }

    /// Get the number of selected items
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if the selection is empty
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // handle_interaction()
    // ========================================================================

    #[test]
    fn test_new_selection_is_empty() {
        let selection = SelectionManager::new();
        assert!(selection.is_empty());
        assert!(!selection.is_multi());
    }

    #[test]
    fn test_click_selects_single() {
        let mut selection = SelectionManager::new();
        selection.handle_interaction("a", false);
        selection.handle_interaction("b", false);
        assert!(!selection.contains("a"));
        assert!(selection.contains("b"));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_shift_click_toggles() {
        let mut selection = SelectionManager::new();
        selection.handle_interaction("a", false);
        selection.handle_interaction("b", true);
        assert!(selection.is_multi());
        selection.handle_interaction("a", true);
        assert!(!selection.contains("a"));
        assert!(!selection.is_multi());
    }

    #[test]
    fn test_click_on_sole_selected_is_noop() {
        let mut selection = SelectionManager::new();
        selection.handle_interaction("a", false);
        selection.handle_interaction("a", false);
        assert_eq!(selection.sorted_ids(), vec!["a".to_string()]);
    }

    // ========================================================================
    // replace_selection() / sorted_ids()
    // ========================================================================

    #[test]
    fn test_replace_selection() {
        let mut selection = SelectionManager::new();
        selection.handle_interaction("x", false);
        selection.replace_selection(["c", "a", "b"]);
        assert!(!selection.contains("x"));
        assert_eq!(selection.sorted_ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_replace_with_empty_clears() {
        let mut selection = SelectionManager::new();
        selection.replace_selection(["a", "b"]);
        selection.replace_selection(Vec::<String>::new());
        assert!(selection.is_empty());
    }

    // ========================================================================
    // Model sync
    // ========================================================================

    #[test]
    fn test_sync_to_model() {
        let mut selection = SelectionManager::new();
        selection.replace_selection(["b", "a"]);
        let model = VecModel::from(vec![SharedString::from("stale")]);
        selection.sync_to_model(&model);
        assert_eq!(model.row_count(), 2);
        assert_eq!(model.row_data(0).unwrap().as_str(), "a");
        assert_eq!(model.row_data(1).unwrap().as_str(), "b");
    }

    #[test]
    fn test_sync_from_model() {
        let model = VecModel::from(vec![SharedString::from("n1"), SharedString::from("n2")]);
        let mut selection = SelectionManager::new();
        selection.handle_interaction("old", false);
        selection.sync_from_model(&model);
        assert_eq!(selection.sorted_ids(), vec!["n1", "n2"]);
    }
}
