//! Figure model for the plotting collaborator.
//!
//! A figure is a `rows × cols` grid of panels: one row per x-axis column and
//! one column per y-axis column. Panels are always addressed by `(row, col)`,
//! including the degenerate 1×1, 1×n and n×1 shapes. The renderer in
//! [`crate::ui::plot`] only reads this model.

use eframe::egui::Color32;

use crate::color::TagColors;
use crate::config::PlotSettings;
use crate::data::filter::matching_tags;
use crate::data::model::{DerivedTable, SampleIdentity};
use crate::error::Result;

/// One line in a panel.
#[derive(Debug, Clone)]
pub struct Series {
    /// Group label (the tag that matched).
    pub label: String,
    /// Joined sample name the data came from.
    pub sample: String,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Default)]
pub struct Panel {
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color32,
}

#[derive(Debug, Clone)]
pub struct Figure {
    settings: PlotSettings,
    colors: TagColors,
    panels: Vec<Panel>,
    legend: Vec<LegendEntry>,
}

impl Figure {
    pub fn new(settings: PlotSettings) -> Self {
        let mut panels = Vec::with_capacity(settings.x_axis_columns.len() * settings.y_axis_columns.len());
        for x in &settings.x_axis_columns {
            for y in &settings.y_axis_columns {
                panels.push(Panel {
                    x_label: x.clone(),
                    y_label: y.clone(),
                    series: Vec::new(),
                });
            }
        }
        Figure {
            colors: TagColors::new(settings.sample_tags.len()),
            settings,
            panels,
            legend: Vec::new(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.settings.x_axis_columns.len()
    }

    pub fn n_cols(&self) -> usize {
        self.settings.y_axis_columns.len()
    }

    pub fn panel(&self, row: usize, col: usize) -> Option<&Panel> {
        self.index(row, col).map(|i| &self.panels[i])
    }

    fn panel_mut(&mut self, row: usize, col: usize) -> Option<&mut Panel> {
        self.index(row, col).map(move |i| &mut self.panels[i])
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.n_rows() && col < self.n_cols()).then(|| row * self.n_cols() + col)
    }

    /// Legend accumulated over every added sample, one entry per label.
    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    pub fn settings(&self) -> &PlotSettings {
        &self.settings
    }

    /// Draw one file into every panel. Returns the number of series added.
    ///
    /// All requested axis columns are read before anything is drawn, so a
    /// file missing one of them leaves the figure untouched.
    pub fn add_sample(&mut self, table: &DerivedTable, identity: &SampleIdentity) -> Result<usize> {
        let xs = self
            .settings
            .x_axis_columns
            .iter()
            .map(|name| table.numeric_column(name))
            .collect::<Result<Vec<_>>>()?;
        let ys = self
            .settings
            .y_axis_columns
            .iter()
            .map(|name| table.numeric_column(name))
            .collect::<Result<Vec<_>>>()?;

        let matches = matching_tags(identity, &self.settings.wildtype_tag, &self.settings.sample_tags);
        if matches.is_empty() {
            log::debug!("{identity}: no tag matched, nothing drawn");
            return Ok(0);
        }

        let sample = identity.joined();
        let colors = self.colors.clone();
        let mut added = 0;
        for (row, x) in xs.iter().enumerate() {
            for (col, y) in ys.iter().enumerate() {
                let points: Vec<[f64; 2]> = x.iter().zip(y).map(|(&xi, &yi)| [xi, yi]).collect();
                let Some(panel) = self.panel_mut(row, col) else {
                    continue;
                };
                for m in &matches {
                    panel.series.push(Series {
                        label: m.tag.clone(),
                        sample: sample.clone(),
                        color: colors.color_for(m.kind),
                        points: points.clone(),
                    });
                    added += 1;
                }
            }
        }

        for m in &matches {
            if !self.legend.iter().any(|e| e.label == m.tag) {
                self.legend.push(LegendEntry {
                    label: m.tag.clone(),
                    color: self.colors.color_for(m.kind),
                });
            }
        }
        Ok(added)
    }
}
