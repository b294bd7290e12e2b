//! Building component records and the per-load component set

use serde::{Deserialize, Serialize};

/// Category of a building component.
///
/// These mirror the IFC element classes the loader emits; the kind decides
/// the display label, the base material color, and the box geometry used
/// for the generated mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Wall,
    Column,
    Beam,
    Slab,
}

impl ComponentKind {
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::Wall => "Wall",
            ComponentKind::Column => "Column",
            ComponentKind::Beam => "Beam",
            ComponentKind::Slab => "Slab",
        }
    }

    /// Base material color as sRGB components in 0.0..=1.0.
    pub fn base_color(&self) -> [f32; 3] {
        match self {
            // Brown
            ComponentKind::Wall => [0.545, 0.271, 0.075],
            // Gray
            ComponentKind::Column => [0.412, 0.412, 0.412],
            // Steel blue
            ComponentKind::Beam => [0.275, 0.510, 0.706],
            // Crimson
            ComponentKind::Slab => [0.863, 0.078, 0.235],
        }
    }

    /// Box dimensions (width, height, depth) in meters for the generated mesh.
    pub fn dimensions(&self) -> [f32; 3] {
        match self {
            ComponentKind::Wall => [8.0, 3.0, 0.5],
            ComponentKind::Column => [0.5, 3.0, 0.5],
            ComponentKind::Beam => [8.0, 0.3, 0.5],
            ComponentKind::Slab => [8.0, 0.2, 8.0],
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Metadata and placement for one building element.
///
/// `visible` is the only field mutated after creation at the data layer;
/// material state for highlighting lives on the spawned entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub id: String,
    pub name: String,
    pub kind: ComponentKind,
    /// Center position (x, y, z), Y-up.
    pub position: [f32; 3],
    pub visible: bool,
}

impl ComponentRecord {
    pub fn new(id: &str, name: &str, kind: ComponentKind, position: [f32; 3]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            position,
            visible: true,
        }
    }

    /// Case-insensitive match against id, name, or kind label.
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.id.to_lowercase().contains(&term)
            || self.kind.label().to_lowercase().contains(&term)
    }
}

/// One parsed model: the components of a single load, in load order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentSet {
    /// Unique per load, derived from the load timestamp (epoch millis).
    pub model_id: i64,
    pub components: Vec<ComponentRecord>,
}

impl ComponentSet {
    /// Largest axis-aligned extent of the set's bounding box, in meters.
    /// Used to fit the camera radius after a load. Zero for an empty set.
    pub fn bounding_extent(&self) -> f32 {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for component in &self.components {
            let dims = component.kind.dimensions();
            for axis in 0..3 {
                min[axis] = min[axis].min(component.position[axis] - dims[axis] / 2.0);
                max[axis] = max[axis].max(component.position[axis] + dims[axis] / 2.0);
            }
        }
        (0..3)
            .map(|axis| max[axis] - min[axis])
            .filter(|extent| extent.is_finite())
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_matches_id_name_and_kind() {
        let record = ComponentRecord::new("wall_001", "Wall 001", ComponentKind::Wall, [0.0; 3]);
        assert!(record.matches_search("wall"));
        assert!(record.matches_search("WALL_001"));
        assert!(record.matches_search("001"));
        assert!(record.matches_search(""));
        assert!(!record.matches_search("beam"));
    }

    #[test]
    fn test_bounding_extent_spans_components() {
        let set = ComponentSet {
            model_id: 1,
            components: vec![
                ComponentRecord::new("wall_001", "Wall 001", ComponentKind::Wall, [0.0, 1.5, 4.0]),
                ComponentRecord::new("wall_002", "Wall 002", ComponentKind::Wall, [0.0, 1.5, -4.0]),
            ],
        };
        // Two walls 0.5m deep centered at z = +-4.0 span 8.5m in z.
        assert!((set.bounding_extent() - 8.5).abs() < 1e-5);
    }

    #[test]
    fn test_bounding_extent_empty_set() {
        assert_eq!(ComponentSet::default().bounding_extent(), 0.0);
    }

    #[test]
    fn test_component_set_json_round_trip() {
        let set = ComponentSet {
            model_id: 42,
            components: vec![ComponentRecord::new(
                "slab_001",
                "Slab 001",
                ComponentKind::Slab,
                [0.0, 0.1, 0.0],
            )],
        };
        let json = serde_json::to_string(&set).unwrap();
        let back: ComponentSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.model_id, 42);
        assert_eq!(back.components.len(), 1);
        assert_eq!(back.components[0].kind, ComponentKind::Slab);
    }
}
