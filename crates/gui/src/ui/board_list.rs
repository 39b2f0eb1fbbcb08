//! Board list panel: boards grouped by stock, hover-linked with the viewport

use std::collections::BTreeMap;

use egui::Ui;
use shared::Stock;

use crate::i18n::t;
use crate::state::{AppState, HoverSource};

pub fn show(ui: &mut Ui, state: &mut AppState) {
    let boards = &state.model.model().boards;

    ui.horizontal(|ui| {
        ui.heading(t("boards.title"));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("({})", boards.len()));
        });
    });
    ui.separator();

    if boards.is_empty() {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.weak(t("boards.empty"));
        });
        if state.hover.source() == Some(HoverSource::BoardList) {
            state.hover.clear();
        }
        return;
    }

    // Collect rows up front so hover can be updated while drawing
    let mut groups: BTreeMap<Stock, Vec<(usize, String, String)>> = BTreeMap::new();
    for (index, board) in boards.iter().enumerate() {
        groups
            .entry(board.stock)
            .or_default()
            .push((index, board.name.clone(), board.dimension_label()));
    }

    let hovered = state.hover.board();
    let mut row_hovered: Option<usize> = None;

    egui::ScrollArea::vertical()
        .id_salt("board_list_scroll")
        .show(ui, |ui| {
            for (stock, rows) in &groups {
                let header = format!("{} ({})", stock.display_name(), rows.len());
                egui::CollapsingHeader::new(header)
                    .id_salt(stock.display_name())
                    .default_open(true)
                    .show(ui, |ui| {
                        for (index, name, label) in rows {
                            let response = ui
                                .selectable_label(hovered == Some(*index), name)
                                .on_hover_text(label);
                            if response.hovered() {
                                row_hovered = Some(*index);
                            }
                        }
                    });
            }
        });

    match row_hovered {
        Some(index) => state.hover.set(Some(index), HoverSource::BoardList),
        None => {
            if state.hover.source() == Some(HoverSource::BoardList) {
                state.hover.clear();
            }
        }
    }
}
