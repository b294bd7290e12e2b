//! Model sources and the mock IFC loader
//!
//! `ModelSource` is the capability seam between the viewer and a format
//! decoder: the viewer only ever sees `parse(bytes) -> ComponentSet`.
//! The shipped implementation is a mock that ignores byte content and
//! emits a fixed five-component building, standing in for a real IFC
//! geometry pipeline.

use thiserror::Error;

use crate::component::{ComponentKind, ComponentRecord, ComponentSet};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("not an IFC file: {0} (.ifc extension required)")]
    InvalidExtension(String),
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse model: {0}")]
    Parse(String),
    #[error("metadata extraction failed: {0}")]
    Metadata(String),
}

/// Reject anything that is not a `.ifc` file before touching any state.
pub fn validate_filename(name: &str) -> Result<(), LoadError> {
    if name.to_lowercase().ends_with(".ifc") {
        Ok(())
    } else {
        Err(LoadError::InvalidExtension(name.to_string()))
    }
}

/// Summary metadata extracted from a parsed set, the secondary enrichment
/// step. A failure here is reported but never blocks publishing the
/// component list itself.
#[derive(Debug, Clone)]
pub struct ModelMetadata {
    pub model_id: i64,
    pub component_count: usize,
    pub kinds: Vec<ComponentKind>,
}

/// A parser producing renderable component sets from raw file bytes.
pub trait ModelSource {
    fn parse(&self, bytes: &[u8]) -> Result<ComponentSet, LoadError>;

    fn metadata(&self, set: &ComponentSet) -> Result<ModelMetadata, LoadError> {
        let mut kinds: Vec<ComponentKind> = set.components.iter().map(|c| c.kind).collect();
        kinds.sort();
        kinds.dedup();
        Ok(ModelMetadata {
            model_id: set.model_id,
            component_count: set.components.len(),
            kinds,
        })
    }
}

/// Mock loader: every parse yields the same five positioned boxes
/// (two walls, one column, one beam, one slab) regardless of input.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockIfcLoader;

impl MockIfcLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ModelSource for MockIfcLoader {
    fn parse(&self, bytes: &[u8]) -> Result<ComponentSet, LoadError> {
        tracing::debug!(len = bytes.len(), "mock-parsing IFC bytes");

        let components = vec![
            ComponentRecord::new("wall_001", "Wall 001", ComponentKind::Wall, [0.0, 1.5, 4.0]),
            ComponentRecord::new("wall_002", "Wall 002", ComponentKind::Wall, [0.0, 1.5, -4.0]),
            ComponentRecord::new(
                "column_001",
                "Column 001",
                ComponentKind::Column,
                [-3.5, 1.5, 0.0],
            ),
            ComponentRecord::new("beam_001", "Beam 001", ComponentKind::Beam, [0.0, 3.0, 0.0]),
            ComponentRecord::new("slab_001", "Slab 001", ComponentKind::Slab, [0.0, 0.1, 0.0]),
        ];

        Ok(ComponentSet {
            model_id: chrono::Utc::now().timestamp_millis(),
            components,
        })
    }
}
