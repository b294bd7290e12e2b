//! UI overlays using bevy_egui

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};

use trellis_core::{BlinkSequence, ComponentKind};

use crate::app::{LoadState, Registry, SelectedComponent, UiLayout};
use crate::loader::{trigger_file_dialog, PendingLoad};
use crate::model::ActiveBlink;

/// Search and kind filter state for the components panel
#[derive(Resource, Default)]
pub struct PanelFilter {
    pub search: String,
    pub kind: Option<ComponentKind>,
}

/// Grouped system parameters for the main UI system to work around
/// Bevy's 16-param limit
#[derive(SystemParam)]
pub struct UiParams<'w, 's> {
    pub contexts: EguiContexts<'w, 's>,
    pub registry: ResMut<'w, Registry>,
    pub selected: ResMut<'w, SelectedComponent>,
    pub load_state: ResMut<'w, LoadState>,
    pub ui_layout: ResMut<'w, UiLayout>,
    pub filter: ResMut<'w, PanelFilter>,
    pub blink: ResMut<'w, ActiveBlink>,
    pub pending: Res<'w, PendingLoad>,
    pub time: Res<'w, Time>,
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PanelFilter>()
            .add_systems(Update, update_ui_layout)
            // Main UI system runs in EguiPrimaryContextPass for proper
            // input handling (bevy_egui 0.38+)
            .add_systems(EguiPrimaryContextPass, ui_system);
    }
}

fn update_ui_layout(windows: Query<&Window>, mut ui_layout: ResMut<UiLayout>, time: Res<Time>) {
    let now = time.elapsed();
    if let Ok(window) = windows.single() {
        let width = window.width();
        let height = window.height();

        // Only update if dimensions changed significantly
        if (ui_layout.screen_width - width).abs() > 1.0
            || (ui_layout.screen_height - height).abs() > 1.0
        {
            ui_layout.update_for_screen(width, height, now);
        }
    }
    ui_layout.tick_hint(now);
}

fn ui_system(mut params: UiParams) {
    let is_mobile = params.ui_layout.is_mobile;
    let panel_width = params.ui_layout.panel_width();
    let now = params.time.elapsed();

    // Get the egui context - early return if not available
    let Ok(ctx) = params.contexts.ctx_mut() else {
        return;
    };
    let ctx = ctx.clone();

    if is_mobile {
        let mut style = (*ctx.style()).clone();
        style.spacing.button_padding = egui::vec2(6.0, 4.0);
        style.spacing.item_spacing = egui::vec2(4.0, 3.0);
        ctx.set_style(style);
    }

    top_bar(&ctx, &mut params, is_mobile);

    // Mobile: toggle button at the bottom so the scene keeps the screen.
    if is_mobile {
        egui::TopBottomPanel::bottom("mobile_toolbar").show(&ctx, |ui| {
            ui.horizontal(|ui| {
                let label = if params.ui_layout.show_panel {
                    "☰ Components ✕"
                } else {
                    "☰ Components"
                };
                if ui.button(egui::RichText::new(label).size(16.0)).clicked() {
                    params.ui_layout.show_panel = !params.ui_layout.show_panel;
                }
                if params.load_state.loading {
                    ui.spinner();
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{} components", params.registry.0.len()));
                });
            });
        });
    }

    if !is_mobile || params.ui_layout.show_panel {
        components_panel(&ctx, &mut params, panel_width, is_mobile, now);
    }

    if params.ui_layout.show_hint {
        controls_hint(&ctx, &mut params, is_mobile);
    }
}

/// File controls and the error banner across the top.
fn top_bar(ctx: &egui::Context, params: &mut UiParams, is_mobile: bool) {
    egui::TopBottomPanel::top("file_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let title = if is_mobile {
                "IFC Viewer"
            } else {
                "IFC Building Model Viewer"
            };
            ui.heading(title);
            ui.separator();

            if params.load_state.loading {
                ui.spinner();
                ui.label("Loading...");
            } else if ui.button("Load IFC File").clicked() {
                trigger_file_dialog(&params.pending, &mut params.load_state);
            }

            if let Some(source) = &params.load_state.source {
                ui.label(egui::RichText::new(source).color(egui::Color32::GRAY));
            }
        });

        let dismissed = if let Some(error) = &params.load_state.error {
            let mut dismissed = false;
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::from_rgb(220, 60, 60), format!("⚠ {error}"));
                if ui.small_button("✕").clicked() {
                    dismissed = true;
                }
            });
            dismissed
        } else {
            false
        };
        if dismissed {
            params.load_state.error = None;
        }
    });
}

/// Component list with search, kind filter, and visibility controls.
fn components_panel(
    ctx: &egui::Context,
    params: &mut UiParams,
    panel_width: f32,
    is_mobile: bool,
    now: std::time::Duration,
) {
    egui::SidePanel::right("components_panel")
        .default_width(panel_width)
        .resizable(!is_mobile)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Components");
                if is_mobile {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("✕").clicked() {
                            params.ui_layout.show_panel = false;
                        }
                    });
                }
            });
            ui.separator();

            if params.registry.0.is_empty() {
                ui.label("No model loaded.");
                ui.label(
                    egui::RichText::new("Load an .ifc file to list its components.")
                        .color(egui::Color32::GRAY),
                );
                return;
            }

            // Search field
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut params.filter.search)
                        .hint_text("Search components...")
                        .desired_width(panel_width - 100.0),
                );
                if !params.filter.search.is_empty() && ui.small_button("✕").clicked() {
                    params.filter.search.clear();
                }
            });

            // Kind filter dropdown
            let kinds = params.registry.0.kinds();
            egui::ComboBox::from_id_salt("kind_filter")
                .selected_text(
                    params
                        .filter
                        .kind
                        .map(|k| k.label())
                        .unwrap_or("All types"),
                )
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut params.filter.kind, None, "All types");
                    for kind in kinds {
                        ui.selectable_value(&mut params.filter.kind, Some(kind), kind.label());
                    }
                });

            ui.separator();

            let filtered_ids: Vec<String> = params
                .registry
                .0
                .filter(&params.filter.search, params.filter.kind)
                .iter()
                .map(|c| c.id.clone())
                .collect();

            // Bulk visibility acts on the filtered subset only.
            ui.horizontal(|ui| {
                if ui.button("Show All").clicked() {
                    let changed = params
                        .registry
                        .0
                        .bulk_set_visible(filtered_ids.iter().map(|s| s.as_str()), true);
                    tracing::debug!(count = changed.len(), "bulk show");
                }
                if ui.button("Hide All").clicked() {
                    let changed = params
                        .registry
                        .0
                        .bulk_set_visible(filtered_ids.iter().map(|s| s.as_str()), false);
                    tracing::debug!(count = changed.len(), "bulk hide");
                }
            });

            ui.horizontal(|ui| {
                ui.label(format!(
                    "{} of {} components",
                    filtered_ids.len(),
                    params.registry.0.len()
                ));
                let filters_active =
                    !params.filter.search.is_empty() || params.filter.kind.is_some();
                if filters_active && ui.small_button("Clear filters").clicked() {
                    params.filter.search.clear();
                    params.filter.kind = None;
                }
            });
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                for id in &filtered_ids {
                    component_card(ui, params, id, now);
                }
            });
        });
}

/// One row in the component list: visibility toggle, labels, highlight.
fn component_card(ui: &mut egui::Ui, params: &mut UiParams, id: &str, now: std::time::Duration) {
    let Some(record) = params.registry.0.get(id) else {
        return;
    };
    let name = record.name.clone();
    let kind = record.kind;
    let mut visible = record.visible;
    let is_selected = params.selected.0.as_deref() == Some(id);

    let frame = egui::Frame::group(ui.style()).fill(if is_selected {
        ui.style().visuals.selection.bg_fill.gamma_multiply(0.3)
    } else {
        ui.style().visuals.faint_bg_color
    });

    frame.show(ui, |ui| {
        ui.horizontal(|ui| {
            if ui.checkbox(&mut visible, "").on_hover_text("Visible").changed() {
                params.registry.0.set_visible(id, visible);
            }

            ui.vertical(|ui| {
                let label = egui::RichText::new(&name).strong();
                if ui.selectable_label(is_selected, label).clicked() {
                    params.selected.0 = if is_selected {
                        None
                    } else {
                        Some(id.to_string())
                    };
                }
                ui.label(
                    egui::RichText::new(format!("{} · {}", kind.label(), id))
                        .size(11.0)
                        .color(egui::Color32::GRAY),
                );
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let blinking = params
                    .blink
                    .0
                    .as_ref()
                    .map(|seq| seq.id() == id)
                    .unwrap_or(false);
                if blinking {
                    ui.spinner();
                } else if ui.button("Highlight").clicked() {
                    params.blink.0 = Some(BlinkSequence::new(id, now));
                    params.selected.0 = Some(id.to_string());
                }
            });
        });
    });
}

/// Short orbit/zoom/reset legend in the corner of the viewport.
fn controls_hint(ctx: &egui::Context, params: &mut UiParams, is_mobile: bool) {
    // Mobile and tablet get a dismiss button; desktop keeps the legend.
    let dismissible = params.ui_layout.screen_width <= 991.0;

    egui::Area::new(egui::Id::new("controls_hint"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        if is_mobile {
                            ui.label("Drag to orbit · pinch to zoom");
                            ui.label("Double-tap to reset the view");
                        } else {
                            ui.label("Drag to orbit · scroll to zoom");
                            ui.label("Click a component to select it");
                        }
                    });
                    if dismissible && ui.small_button("✕").clicked() {
                        params.ui_layout.show_hint = false;
                    }
                });
            });
        });
}
