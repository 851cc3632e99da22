use indexmap::IndexSet;

/// Conversation ids checked in the current view session.
///
/// Ids that fall out of the visible list after a filter change stay
/// selected; bulk actions operate on whatever is in the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: IndexSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the id if absent, remove it if present.
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.shift_remove(id) {
            self.ids.insert(id.to_owned());
        }
    }

    /// Clear when the selection already covers the visible list, otherwise
    /// replace the selection with exactly the visible ids.
    pub fn toggle_all<'a, I>(&mut self, visible: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let visible: IndexSet<&str> = visible.into_iter().collect();
        if self.ids.len() == visible.len() {
            self.ids.clear();
        } else {
            self.ids = visible.into_iter().map(str::to_owned).collect();
        }
    }

    /// Header checkbox state: non-empty and same size as the visible list.
    pub fn all_selected(&self, visible_len: usize) -> bool {
        visible_len > 0 && self.ids.len() == visible_len
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Selected ids in the order they were checked.
    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VISIBLE: [&str; 3] = ["a", "b", "c"];

    #[test]
    fn toggle_one_adds_then_removes() {
        let mut sel = SelectionSet::new();
        sel.toggle("a");
        assert!(sel.contains("a"));
        sel.toggle("a");
        assert!(sel.is_empty());
    }

    #[test]
    fn toggle_all_twice_clears() {
        let mut sel = SelectionSet::new();
        sel.toggle_all(VISIBLE);
        assert_eq!(sel.len(), 3);
        assert!(sel.all_selected(VISIBLE.len()));
        sel.toggle_all(VISIBLE);
        assert!(sel.is_empty());
    }

    #[test]
    fn toggle_all_from_partial_selects_exactly_visible() {
        let mut sel = SelectionSet::new();
        sel.toggle("b");
        sel.toggle("zzz");
        sel.toggle("yyy");
        sel.toggle("xxx");
        // 4 selected vs 3 visible: replaced, not cleared.
        sel.toggle_all(VISIBLE);
        assert_eq!(sel.ids(), vec!["a", "b", "c"]);
        assert!(!sel.contains("zzz"));
    }

    #[test]
    fn hidden_ids_survive_a_filter_change() {
        let mut sel = SelectionSet::new();
        sel.toggle("a");
        sel.toggle("c");
        // The filter now only shows "b"; nothing is pruned.
        assert!(!sel.all_selected(1));
        assert_eq!(sel.ids(), vec!["a", "c"]);
    }

    #[test]
    fn empty_visible_list_is_never_all_selected() {
        let sel = SelectionSet::new();
        assert!(!sel.all_selected(0));
    }
}
