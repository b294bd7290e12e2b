//! IFC file loading via the native file dialog
//!
//! The dialog runs on a background thread (it blocks), and results land
//! in shared slots that a polling system drains each frame. Parsing and
//! registry replacement happen on the main schedule so the camera fit
//! and entity rebuild stay in lockstep.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use trellis_core::{validate_filename, ComponentSet, LoadError, MockIfcLoader, ModelSource};
use trellis_scene::OrbitRig;

use crate::app::{LoadState, Registry, SelectedComponent};

/// Plugin for IFC file loading
pub struct LoaderPlugin {
    /// Model passed on the command line, loaded at startup.
    pub initial_model: Option<PathBuf>,
}

impl Plugin for LoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingLoad>()
            .insert_resource(InitialModel(self.initial_model.clone()))
            .add_systems(Startup, queue_initial_model)
            .add_systems(Update, process_pending_loads);
    }
}

#[derive(Resource)]
struct InitialModel(Option<PathBuf>);

/// Pending file load operations
#[derive(Resource, Default, Clone)]
pub struct PendingLoad {
    /// Filename plus raw bytes of a picked file.
    pub data: Arc<Mutex<Option<(String, Vec<u8>)>>>,
    pub error: Arc<Mutex<Option<String>>>,
}

/// Open the native file dialog on a background thread and post the
/// selected file into the pending slots.
pub fn trigger_file_dialog(pending: &PendingLoad, load_state: &mut LoadState) {
    load_state.loading = true;
    load_state.error = None;

    let data = pending.data.clone();
    let error = pending.error.clone();
    std::thread::spawn(move || {
        let picked = rfd::FileDialog::new()
            .add_filter("IFC files", &["ifc", "IFC"])
            .pick_file();

        let Some(path) = picked else {
            // User cancelled: release the loading state via an empty error.
            if let Ok(mut slot) = error.lock() {
                *slot = Some(String::new());
            }
            return;
        };

        match read_model_file(&path) {
            Ok(result) => {
                if let Ok(mut slot) = data.lock() {
                    *slot = Some(result);
                }
            }
            Err(e) => {
                if let Ok(mut slot) = error.lock() {
                    *slot = Some(e.to_string());
                }
            }
        }
    });
}

fn read_model_file(path: &Path) -> Result<(String, Vec<u8>), LoadError> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    validate_filename(&filename)?;
    let bytes = std::fs::read(path)?;
    tracing::info!(file = %filename, bytes = bytes.len(), "read model file");
    Ok((filename, bytes))
}

fn queue_initial_model(
    initial: Res<InitialModel>,
    pending: Res<PendingLoad>,
    mut load_state: ResMut<LoadState>,
) {
    let Some(path) = initial.0.as_ref() else {
        return;
    };
    load_state.loading = true;
    match read_model_file(path) {
        Ok(result) => {
            if let Ok(mut slot) = pending.data.lock() {
                *slot = Some(result);
            }
        }
        Err(e) => {
            load_state.loading = false;
            load_state.error = Some(e.to_string());
        }
    }
}

/// Drain completed loads into the registry and refit the camera.
fn process_pending_loads(
    pending: Res<PendingLoad>,
    mut registry: ResMut<Registry>,
    mut rig: ResMut<OrbitRig>,
    mut selected: ResMut<SelectedComponent>,
    mut load_state: ResMut<LoadState>,
) {
    if let Ok(mut slot) = pending.data.try_lock() {
        if let Some((filename, bytes)) = slot.take() {
            match parse_model(&filename, &bytes) {
                Ok(set) => {
                    let extent = set.bounding_extent();
                    registry.0.replace(set);
                    rig.0.fit_to_extent(extent);
                    selected.0 = None;
                    load_state.loading = false;
                    load_state.source = Some(filename);
                    load_state.error = None;
                }
                Err(e) => {
                    tracing::error!(file = %filename, error = %e, "model load failed");
                    load_state.loading = false;
                    load_state.error = Some(e.to_string());
                }
            }
        }
    }

    if let Ok(mut slot) = pending.error.try_lock() {
        if let Some(e) = slot.take() {
            load_state.loading = false;
            if !e.is_empty() {
                load_state.error = Some(e);
            }
        }
    }
}

fn parse_model(filename: &str, bytes: &[u8]) -> Result<ComponentSet, LoadError> {
    validate_filename(filename)?;
    let loader = MockIfcLoader::new();
    let set = loader.parse(bytes)?;

    // Metadata is enrichment only; a failure is logged and the set still
    // publishes.
    match loader.metadata(&set) {
        Ok(meta) => tracing::info!(
            model_id = meta.model_id,
            components = meta.component_count,
            kinds = ?meta.kinds,
            "model metadata"
        ),
        Err(e) => tracing::warn!(error = %e, "metadata extraction failed"),
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model_rejects_bad_extension() {
        let result = parse_model("building.step", b"data");
        assert!(matches!(result, Err(LoadError::InvalidExtension(_))));
    }

    #[test]
    fn test_parse_model_accepts_ifc() {
        let set = parse_model("building.ifc", b"data").unwrap();
        assert_eq!(set.components.len(), 5);
    }

    #[test]
    fn test_read_model_file_missing_path() {
        let result = read_model_file(Path::new("/nonexistent/building.ifc"));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
