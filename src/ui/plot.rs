use eframe::egui::{self, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::figure::Panel;
use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Figure grid (central panel)
// ---------------------------------------------------------------------------

/// Render every panel of the figure, one grid cell per (x, y) axis pair.
pub fn figure_grid(ui: &mut Ui, state: &ViewerState) {
    let figure = match state.figure() {
        Some(fig) => fig,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open an experiment folder  (File → Open experiment…)");
            });
            return;
        }
    };

    let (rows, cols) = (figure.n_rows(), figure.n_cols());
    if rows == 0 || cols == 0 {
        ui.label("No axes selected.");
        return;
    }

    let spacing = ui.spacing().item_spacing;
    let available = ui.available_size();
    let width = (available.x - spacing.x * (cols as f32 - 1.0)) / cols as f32;
    let height = (available.y - spacing.y * (rows as f32 - 1.0)) / rows as f32;

    egui::Grid::new("figure_grid")
        .spacing(spacing)
        .show(ui, |ui: &mut Ui| {
            for row in 0..rows {
                for col in 0..cols {
                    if let Some(panel) = figure.panel(row, col) {
                        panel_plot(ui, panel, (row, col), width, height);
                    }
                }
                ui.end_row();
            }
        });
}

fn panel_plot(ui: &mut Ui, panel: &Panel, (row, col): (usize, usize), width: f32, height: f32) {
    Plot::new(("panel", row, col))
        .legend(Legend::default())
        .width(width.max(120.0))
        .height(height.max(120.0))
        .x_axis_label(panel.x_label.as_str())
        .y_axis_label(panel.y_label.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &panel.series {
                // Lines sharing a name share one legend entry.
                let points: PlotPoints = series.points.iter().copied().collect();
                let line = Line::new(points)
                    .name(&series.label)
                    .color(series.color)
                    .width(1.5);
                plot_ui.line(line);
            }
        });
}
