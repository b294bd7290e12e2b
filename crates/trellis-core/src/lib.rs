//! Trellis Core - Component records, registry, and model loading
//!
//! This crate provides the data layer for the Trellis viewer:
//! - Building component records (walls, columns, beams, slabs)
//! - The component registry backing the panel UI
//! - The `ModelSource` capability trait and the mock IFC loader
//! - The highlight blink sequence driven by a polled clock

pub mod component;
pub mod highlight;
pub mod loader;
pub mod registry;

pub use component::{ComponentKind, ComponentRecord, ComponentSet};
pub use highlight::{BlinkPhase, BlinkSequence, BLINK_INTERVAL, BLINK_STEPS};
pub use loader::{validate_filename, LoadError, MockIfcLoader, ModelMetadata, ModelSource};
pub use registry::ComponentRegistry;
