//! Parameters panel for the active model
//!
//! Edits numbers and formulas, adds, removes and renames parameters.
//! Every change re-lays out the model; a failed layout keeps the last good one.

use egui::{TextEdit, Ui};
use shared::{Parameter, ParameterError, ParameterValue};

use crate::i18n::t;
use crate::state::AppState;

/// Pending edit collected while drawing, applied after the loop
enum Edit {
    Number(String, f64),
    Formula(String, String),
    Rename(String, String),
    Remove(String),
}

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.heading(t("params.title"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button("➕").on_hover_text(t("params.add_parameter")).clicked() {
                add_new_parameter(state);
            }
        });
    });
    ui.separator();

    if let Some(error) = state.model.error() {
        ui.colored_label(egui::Color32::from_rgb(200, 60, 40), format!("{}: {error}", t("params.layout_error")));
        ui.separator();
    }

    if state.model.parameters().is_empty() {
        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            ui.weak(t("params.no_parameters"));
        });
        return;
    }

    let parameters: Vec<Parameter> = state.model.parameters().iter().cloned().collect();
    let evaluated = state.model.parameters().evaluate_all();
    let mut edits: Vec<Edit> = Vec::new();

    egui::ScrollArea::vertical()
        .id_salt("parameters_scroll")
        .show(ui, |ui| {
            for (param, (_, value)) in parameters.iter().zip(&evaluated) {
                ui.push_id(&param.name, |ui| {
                    ui.group(|ui| {
                        show_parameter(ui, param, value, &mut edits);
                    });
                });
                ui.add_space(4.0);
            }
        });

    if !edits.is_empty() {
        apply_edits(state, edits);
    }
}

fn show_parameter(
    ui: &mut Ui,
    param: &Parameter,
    value: &Result<f64, ParameterError>,
    edits: &mut Vec<Edit>,
) {
    ui.horizontal(|ui| {
        let id = field_id("name", &param.name);
        if let Some(new_name) = buffered_text_edit(ui, id, &param.name, 120.0) {
            edits.push(Edit::Rename(param.name.clone(), new_name));
        }

        if let Some(unit) = &param.unit {
            ui.weak(unit);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button("🗑").on_hover_text(t("params.remove")).clicked() {
                edits.push(Edit::Remove(param.name.clone()));
            }
        });
    });

    ui.horizontal(|ui| {
        ui.label(t("params.value"));
        match (&param.value, value) {
            (ParameterValue::Number { value }, _) => {
                let mut new_value = *value;
                let mut drag = egui::DragValue::new(&mut new_value).speed(0.25);
                // Unitless parameters are board counts
                if param.unit.is_none() {
                    drag = drag.speed(0.05).max_decimals(0);
                }
                let response = ui.add(drag);
                if response.changed() {
                    edits.push(Edit::Number(param.name.clone(), new_value));
                }
            }
            (ParameterValue::Formula { .. }, Ok(evaluated)) => {
                ui.strong(format!("{evaluated:.3}"));
            }
            (ParameterValue::Formula { .. }, Err(e)) => {
                ui.colored_label(egui::Color32::RED, e.to_string());
            }
        }
    });

    ui.horizontal(|ui| {
        let mut use_formula = param.is_formula();
        if ui.checkbox(&mut use_formula, t("params.formula")).changed() {
            match &param.value {
                ParameterValue::Number { value } => {
                    edits.push(Edit::Formula(param.name.clone(), format!("{value}")));
                }
                ParameterValue::Formula { .. } => {
                    let current = value.as_ref().copied().unwrap_or(0.0);
                    edits.push(Edit::Number(param.name.clone(), current));
                }
            }
        }

        if let ParameterValue::Formula { expression } = &param.value {
            let id = field_id("formula", &param.name);
            if let Some(expr) = buffered_text_edit(ui, id, expression, 150.0) {
                edits.push(Edit::Formula(param.name.clone(), expr));
            }
        }
    });

    if let Some(description) = &param.description {
        ui.weak(description);
    }
}

/// Id of a parameter's text field, stable across frames and panel layout
fn field_id(field: &str, name: &str) -> egui::Id {
    egui::Id::new(("parameters", field, name))
}

/// Single-line field whose text lives in egui temp memory while focused.
/// Returns the new text once committed (Enter or focus leaving) if it differs.
fn buffered_text_edit(ui: &mut Ui, id: egui::Id, stored: &str, width: f32) -> Option<String> {
    let buffer_id = id.with("buffer");
    let mut text = ui
        .data_mut(|d| d.get_temp::<String>(buffer_id))
        .unwrap_or_else(|| stored.to_string());

    let response = ui.add(TextEdit::singleline(&mut text).id(id).desired_width(width));

    if response.lost_focus() {
        ui.data_mut(|d| d.remove::<String>(buffer_id));
        return (text != stored).then_some(text);
    }
    if response.has_focus() {
        ui.data_mut(|d| d.insert_temp(buffer_id, text));
    } else {
        ui.data_mut(|d| d.remove::<String>(buffer_id));
    }
    None
}

fn apply_edits(state: &mut AppState, edits: Vec<Edit>) {
    for edit in edits {
        let result = match edit {
            Edit::Number(name, value) => state.model.set_number(&name, value),
            Edit::Formula(name, formula) => state.model.set_formula(&name, &formula),
            Edit::Rename(old, new) => state.model.rename_parameter(&old, &new),
            Edit::Remove(name) => state.model.remove_parameter(&name),
        };
        if let Err(e) = result {
            tracing::warn!("Parameter edit rejected: {e}");
        }
    }
    state.hover.clamp_to(state.model.model().boards.len());
}

fn add_new_parameter(state: &mut AppState) {
    let mut counter = 1;
    let name = loop {
        let candidate = format!("param{counter}");
        if !state.model.parameters().contains(&candidate) {
            break candidate;
        }
        counter += 1;
    };

    let param = Parameter::number(&name, 0.0).with_unit("in");
    if let Err(e) = state.model.insert_parameter(param) {
        tracing::warn!("Could not add parameter: {e}");
    }
}
