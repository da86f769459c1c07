use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::filter::TagKind;

/// Fixed colours for the first sample tags, in tag-list order.
const BASE_TAG_COLORS: [Color32; 5] = [
    Color32::BLUE,
    Color32::RED,
    Color32::GREEN,
    Color32::from_rgb(255, 0, 255),
    Color32::YELLOW,
];

/// Colour of the wildtype group.
pub const WILDTYPE_COLOR: Color32 = Color32::from_rgb(0, 255, 255);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0 + 15.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tag colours: group → Color32
// ---------------------------------------------------------------------------

/// Colour assignment for the wildtype group and each sample tag.
///
/// Tags are coloured by their position in the tag list, so a tag keeps its
/// colour regardless of which files matched it.
#[derive(Debug, Clone)]
pub struct TagColors {
    wildtype: Color32,
    samples: Vec<Color32>,
}

impl TagColors {
    pub fn new(n_sample_tags: usize) -> Self {
        let mut samples: Vec<Color32> = BASE_TAG_COLORS.iter().copied().take(n_sample_tags).collect();
        if n_sample_tags > BASE_TAG_COLORS.len() {
            samples.extend(generate_palette(n_sample_tags - BASE_TAG_COLORS.len()));
        }
        TagColors {
            wildtype: WILDTYPE_COLOR,
            samples,
        }
    }

    /// Look up the colour for a matched tag.
    pub fn color_for(&self, kind: TagKind) -> Color32 {
        match kind {
            TagKind::Wildtype => self.wildtype,
            TagKind::Sample(idx) => self.samples.get(idx).copied().unwrap_or(Color32::GRAY),
        }
    }
}
