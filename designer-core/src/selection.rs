//! Selection set with at most one active element.

use crate::element::ElementId;

/// Selected element ids, in selection order, plus the active one.
///
/// The active element, when present, is always a member of the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
    active: Option<ElementId>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a single active element.
    ///
    /// Returns `true` if anything changed.
    pub fn select_only(&mut self, id: ElementId) -> bool {
        if self.ids == [id] && self.active == Some(id) {
            return false;
        }
        self.ids = vec![id];
        self.active = Some(id);
        true
    }

    /// Replace the selection; `active` must be one of `ids` or it is dropped.
    pub fn set(&mut self, ids: Vec<ElementId>, active: Option<ElementId>) -> bool {
        let active = active.filter(|a| ids.contains(a));
        if self.ids == ids && self.active == active {
            return false;
        }
        self.ids = ids;
        self.active = active;
        true
    }

    /// Add or remove an id. Adding makes it active; removing the active id
    /// promotes the most recently selected remaining id.
    pub fn toggle(&mut self, id: ElementId) {
        if let Some(pos) = self.ids.iter().position(|s| *s == id) {
            self.ids.remove(pos);
            if self.active == Some(id) {
                self.active = self.ids.last().copied();
            }
        } else {
            self.ids.push(id);
            self.active = Some(id);
        }
    }

    /// Drop one id, if selected.
    pub fn remove(&mut self, id: ElementId) -> bool {
        let before = self.ids.len();
        self.retain(|s| s != id);
        before != self.ids.len()
    }

    /// Keep only ids for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(ElementId) -> bool) {
        self.ids.retain(|id| keep(*id));
        if let Some(active) = self.active {
            if !self.ids.contains(&active) {
                self.active = self.ids.last().copied();
            }
        }
    }

    /// Clear everything. Returns `true` if the selection was non-empty.
    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        self.active = None;
        changed
    }

    /// Whether an id is selected.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// The active element.
    #[must_use]
    pub fn active(&self) -> Option<ElementId> {
        self.active
    }

    /// All selected ids.
    #[must_use]
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_only_replaces() {
        let mut selection = Selection::new();
        let a = ElementId::new();
        let b = ElementId::new();
        assert!(selection.select_only(a));
        assert!(!selection.select_only(a));
        assert!(selection.select_only(b));
        assert_eq!(selection.ids(), &[b]);
        assert_eq!(selection.active(), Some(b));
    }

    #[test]
    fn test_set_drops_foreign_active() {
        let mut selection = Selection::new();
        let a = ElementId::new();
        selection.set(vec![a], Some(ElementId::new()));
        assert_eq!(selection.active(), None);
        assert!(selection.contains(a));
    }

    #[test]
    fn test_toggle_promotes_remaining() {
        let mut selection = Selection::new();
        let a = ElementId::new();
        let b = ElementId::new();
        selection.toggle(a);
        selection.toggle(b);
        assert_eq!(selection.active(), Some(b));
        selection.toggle(b);
        assert_eq!(selection.active(), Some(a));
        selection.toggle(a);
        assert!(selection.is_empty());
        assert_eq!(selection.active(), None);
    }

    #[test]
    fn test_remove_active_keeps_invariant() {
        let mut selection = Selection::new();
        let a = ElementId::new();
        let b = ElementId::new();
        selection.set(vec![a, b], Some(b));
        assert!(selection.remove(b));
        assert!(!selection.remove(b));
        assert_eq!(selection.active(), Some(a));
    }

    #[test]
    fn test_clear_reports_change() {
        let mut selection = Selection::new();
        assert!(!selection.clear());
        selection.select_only(ElementId::new());
        assert!(selection.clear());
        assert_eq!(selection.active(), None);
    }
}
