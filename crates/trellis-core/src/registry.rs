//! Component registry backing the panel UI
//!
//! One registry lives at a time; loading a new model replaces the whole
//! set. Read-side filters are pure; mutations report whether anything
//! actually changed so callers can skip redundant side effects.

use serde::{Deserialize, Serialize};

use crate::component::{ComponentKind, ComponentRecord, ComponentSet};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentRegistry {
    /// Model id of the currently loaded set, if any.
    pub model_id: Option<i64>,
    /// Records in load order; ids are unique within a set.
    pub components: Vec<ComponentRecord>,
}

impl ComponentRegistry {
    pub fn from_set(set: ComponentSet) -> Self {
        Self {
            model_id: Some(set.model_id),
            components: set.components,
        }
    }

    /// Replace the whole registry with a freshly loaded set.
    pub fn replace(&mut self, set: ComponentSet) {
        tracing::info!(
            model_id = set.model_id,
            components = set.components.len(),
            "replacing component registry"
        );
        self.model_id = Some(set.model_id);
        self.components = set.components;
    }

    pub fn clear(&mut self) {
        self.model_id = None;
        self.components.clear();
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ComponentRecord> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ComponentRecord> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    /// Set a record's visibility. Returns true when the value changed;
    /// an absent id is a no-op.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> bool {
        match self.get_mut(id) {
            Some(record) if record.visible != visible => {
                record.visible = visible;
                true
            }
            _ => false,
        }
    }

    /// Apply `set_visible` to each id, skipping records already at the
    /// requested value. Returns the ids that actually changed.
    pub fn bulk_set_visible<'a, I>(&mut self, ids: I, visible: bool) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut changed = Vec::new();
        for id in ids {
            if self.set_visible(id, visible) {
                changed.push(id.to_string());
            }
        }
        changed
    }

    /// Records matching a search term and an optional kind filter, in
    /// load order. Pure read; does not mutate.
    pub fn filter(&self, term: &str, kind: Option<ComponentKind>) -> Vec<&ComponentRecord> {
        self.components
            .iter()
            .filter(|c| c.matches_search(term))
            .filter(|c| kind.map(|k| c.kind == k).unwrap_or(true))
            .collect()
    }

    pub fn search(&self, term: &str) -> Vec<&ComponentRecord> {
        self.filter(term, None)
    }

    pub fn filter_kind(&self, kind: ComponentKind) -> Vec<&ComponentRecord> {
        self.filter("", Some(kind))
    }

    /// Sorted distinct kinds present in the registry, for the filter
    /// dropdown.
    pub fn kinds(&self) -> Vec<ComponentKind> {
        let mut kinds: Vec<ComponentKind> = self.components.iter().map(|c| c.kind).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{MockIfcLoader, ModelSource};

    fn loaded_registry() -> ComponentRegistry {
        let set = MockIfcLoader::new().parse(b"ignored").unwrap();
        ComponentRegistry::from_set(set)
    }

    #[test]
    fn test_set_visible_reports_change() {
        let mut registry = loaded_registry();
        assert!(registry.set_visible("wall_001", false));
        // Already hidden: no change.
        assert!(!registry.set_visible("wall_001", false));
        assert!(registry.set_visible("wall_001", true));
    }

    #[test]
    fn test_set_visible_absent_id_is_noop() {
        let mut registry = loaded_registry();
        assert!(!registry.set_visible("door_001", false));
        assert!(registry.components.iter().all(|c| c.visible));
    }

    #[test]
    fn test_bulk_set_visible_skips_already_hidden() {
        let mut registry = loaded_registry();
        registry.set_visible("wall_002", false);

        let ids = ["wall_001", "wall_002", "column_001"];
        let changed = registry.bulk_set_visible(ids.iter().copied(), false);
        assert_eq!(changed, vec!["wall_001".to_string(), "column_001".to_string()]);

        // Untouched records keep their state.
        assert!(registry.get("beam_001").unwrap().visible);
        assert!(registry.get("slab_001").unwrap().visible);
    }

    #[test]
    fn test_filter_combines_search_and_kind() {
        let registry = loaded_registry();
        assert_eq!(registry.search("wall").len(), 2);
        assert_eq!(registry.filter_kind(ComponentKind::Beam).len(), 1);
        assert_eq!(registry.filter("001", Some(ComponentKind::Wall)).len(), 1);
        assert_eq!(registry.filter("nothing", None).len(), 0);
    }

    #[test]
    fn test_kinds_sorted_distinct() {
        let registry = loaded_registry();
        assert_eq!(
            registry.kinds(),
            vec![
                ComponentKind::Wall,
                ComponentKind::Column,
                ComponentKind::Beam,
                ComponentKind::Slab,
            ]
        );
    }

    #[test]
    fn test_replace_swaps_whole_set() {
        let mut registry = loaded_registry();
        registry.set_visible("wall_001", false);

        let fresh = MockIfcLoader::new().parse(b"other").unwrap();
        registry.replace(fresh);
        assert_eq!(registry.len(), 5);
        assert!(registry.components.iter().all(|c| c.visible));
    }
}
