use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::metrics::MAXIMA_COLUMNS;
use crate::pipeline::RunOutcome;
use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Left side panel – legend, maxima, skipped files
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &ViewerState) {
    let outcome = match &state.outcome {
        Some(outcome) => outcome,
        None => {
            ui.label("No experiment loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Groups");
            ui.separator();
            legend(ui, state);

            ui.add_space(8.0);
            ui.heading("Maxima");
            ui.separator();
            maxima_table(ui, outcome);

            if !outcome.summary.skipped.is_empty() {
                ui.add_space(8.0);
                ui.heading("Skipped files");
                ui.separator();
                for skipped in &outcome.summary.skipped {
                    let name = skipped
                        .path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    ui.label(RichText::new(name).strong());
                    ui.label(RichText::new(&skipped.reason).color(Color32::RED));
                }
            }
        });
}

fn legend(ui: &mut Ui, state: &ViewerState) {
    let Some(figure) = state.figure() else {
        return;
    };
    if figure.legend().is_empty() {
        ui.label("No sample matched a group tag.");
        return;
    }
    for entry in figure.legend() {
        ui.label(RichText::new(format!("■ {}", entry.label)).color(entry.color));
    }
}

fn maxima_table(ui: &mut Ui, outcome: &RunOutcome) {
    TableBuilder::new(ui)
        .id_salt("maxima_table")
        .striped(true)
        .column(Column::auto().at_least(120.0).resizable(true))
        .columns(Column::auto().at_least(60.0), MAXIMA_COLUMNS.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("sample");
            });
            for name in MAXIMA_COLUMNS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|mut body| {
            for maxima in &outcome.results.maxima {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&maxima.name);
                    });
                    for value in maxima.values() {
                        row.col(|ui| {
                            ui.label(format!("{value:.4}"));
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open experiment…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(outcome) = &state.outcome {
            ui.label(format!(
                "{}: {} samples, {} rows",
                outcome.experiment,
                outcome.summary.processed.len(),
                outcome.summary.total_rows()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut ViewerState) {
    let mut dialog = rfd::FileDialog::new().set_title("Open PAM experiment folder");
    if let Some(current) = state.experiment_dir.as_ref().and_then(|d| d.parent()) {
        dialog = dialog.set_directory(current);
    }
    if let Some(dir) = dialog.pick_folder() {
        state.open_experiment(&dir);
    }
}
