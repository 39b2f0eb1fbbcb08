//! Application menu bar and settings window

use eframe::egui;
use shared::ModelKind;

use crate::i18n::t;
use crate::state::{AppSettings, AppState, Language};
use crate::viewport::ViewportPanel;

/// Show the model menu
pub fn model_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.model"), |ui| {
        for kind in ModelKind::all() {
            let selected = state.model.kind() == *kind;
            if ui.selectable_label(selected, t(model_key(*kind))).clicked() {
                if !selected {
                    tracing::info!("Switching model to {}", kind.slug());
                    state.select_model(*kind);
                }
                ui.close_menu();
            }
        }
        ui.separator();
        if ui.button(t("menu.reset_parameters")).clicked() {
            state.model.reset_parameters();
            state.hover.clamp_to(state.model.model().boards.len());
            ui.close_menu();
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

/// i18n key for a model kind's name
pub fn model_key(kind: ModelKind) -> &'static str {
    match kind {
        ModelKind::Platform => "model.platform",
        ModelKind::Bench => "model.bench",
        ModelKind::SlottedBar => "model.slotted_bar",
    }
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState, viewport: &mut ViewportPanel) {
    ui.menu_button(t("menu.view"), |ui| {
        ui.checkbox(&mut state.panels.board_list, t("menu.board_list"));
        ui.checkbox(&mut state.panels.parameters, t("menu.parameters"));
        ui.checkbox(&mut state.panels.tweaks, t("menu.tweaks"));
        ui.separator();
        ui.checkbox(&mut state.view.wireframe, t("menu.wireframe"));
        if ui.button(t("menu.reset_camera")).clicked() {
            viewport.reset_camera();
            ui.close_menu();
        }
        ui.separator();
        ui.menu_button(t("menu.language"), |ui| {
            for language in Language::all() {
                if ui
                    .selectable_label(state.settings.ui.language == *language, language.display_name())
                    .clicked()
                {
                    state.settings.ui.language = *language;
                    ui.close_menu();
                }
            }
        });
    });
}

/// Show the settings menu
pub fn settings_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.settings"), |ui| {
        if ui.button(t("menu.preferences")).clicked() {
            state.show_settings_window = true;
            ui.close_menu();
        }
    });
}

/// Show the settings window
pub fn settings_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.show_settings_window;
    egui::Window::new(t("settings.title"))
        .open(&mut open)
        .resizable(true)
        .default_width(360.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                show_viewport_settings(ui, state);
                show_label_settings(ui, state);
                show_camera_settings(ui, state);
                show_ui_settings(ui, state);
                show_settings_buttons(ui, state);
            });
        });
    state.show_settings_window = open && state.show_settings_window;
}

fn show_viewport_settings(ui: &mut egui::Ui, state: &mut AppState) {
    let viewport = &mut state.settings.viewport;
    ui.heading(t("settings.viewport"));
    ui.horizontal(|ui| {
        ui.label(t("settings.bg_color"));
        let [r, g, b] = viewport.background_color;
        let mut color = egui::Color32::from_rgb(r, g, b);
        if ui.color_edit_button_srgba(&mut color).changed() {
            viewport.background_color = [color.r(), color.g(), color.b()];
        }
    });
    ui.checkbox(&mut viewport.show_ground, t("settings.show_ground"));
    ui.checkbox(&mut viewport.shadows, t("settings.shadows"));
    ui.horizontal(|ui| {
        ui.label(t("settings.edge_width"));
        ui.add(egui::DragValue::new(&mut viewport.edge_width).speed(0.1).range(0.5..=5.0));
    });
    ui.add_space(10.0);
}

fn show_label_settings(ui: &mut egui::Ui, state: &mut AppState) {
    let labels = &mut state.settings.labels;
    ui.heading(t("settings.labels"));
    ui.checkbox(&mut labels.visible, t("settings.labels_visible"));
    ui.horizontal(|ui| {
        ui.label(t("settings.label_min"));
        ui.add(
            egui::DragValue::new(&mut labels.min_font_size)
                .speed(0.5)
                .range(6.0..=32.0)
                .suffix(" pt"),
        );
    });
    ui.horizontal(|ui| {
        ui.label(t("settings.label_max"));
        ui.add(
            egui::DragValue::new(&mut labels.max_font_size)
                .speed(0.5)
                .range(8.0..=96.0)
                .suffix(" pt"),
        );
    });
    ui.add_space(10.0);
}

fn show_camera_settings(ui: &mut egui::Ui, state: &mut AppState) {
    let camera = &mut state.settings.camera;
    ui.heading(t("settings.camera"));
    ui.horizontal(|ui| {
        ui.label(t("settings.rotate_speed"));
        ui.add(egui::Slider::new(&mut camera.rotate_speed, 0.1..=2.0));
    });
    ui.horizontal(|ui| {
        ui.label(t("settings.zoom_speed"));
        ui.add(egui::Slider::new(&mut camera.zoom_speed, 0.0005..=0.01).logarithmic(true));
    });
    ui.horizontal(|ui| {
        ui.label(t("settings.pan_speed"));
        ui.add(egui::Slider::new(&mut camera.pan_speed, 0.0005..=0.01).logarithmic(true));
    });
    ui.add_space(10.0);
}

fn show_ui_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.ui"));
    ui.horizontal(|ui| {
        ui.label(t("settings.font_size"));
        ui.add(
            egui::DragValue::new(&mut state.settings.ui.font_size)
                .speed(0.5)
                .range(8.0..=24.0)
                .suffix(" pt"),
        );
    });
    ui.horizontal(|ui| {
        ui.label(t("menu.language"));
        egui::ComboBox::from_id_salt("language_combo")
            .selected_text(state.settings.ui.language.display_name())
            .show_ui(ui, |ui| {
                for language in Language::all() {
                    ui.selectable_value(&mut state.settings.ui.language, *language, language.display_name());
                }
            });
    });
    ui.add_space(10.0);
}

fn show_settings_buttons(ui: &mut egui::Ui, state: &mut AppState) {
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button(t("settings.apply")).clicked() {
            state.settings.save();
            tracing::info!("Settings saved");
        }
        if ui.button(t("settings.reset")).clicked() {
            state.settings = AppSettings::default();
        }
        if ui.button(t("settings.close")).clicked() {
            state.show_settings_window = false;
        }
    });
}
