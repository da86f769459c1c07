use serde::{Deserialize, Serialize};

/// Cell texts treated as missing values, on top of blank cells.
pub const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// ExportLayout – where things live in a raw instrument export
// ---------------------------------------------------------------------------

/// Line layout of a raw PAM export. Line numbers are 0-indexed.
///
/// The default describes the instrument's CSV export:
///
/// ```text
///  0   WT1,LHCX1g1              sample labels (comma separated)
///  1   t;ML;Temp.;PAR;F;...      column header
///  2-5 ...                       instrument metadata
///  6.. 0;1;20.1;0;...            one row per time point
///  n-1 ...                       footer / summary row
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportLayout {
    /// Line holding the column names.
    #[serde(default = "default_header_line")]
    pub header_line: usize,

    /// Lines that never carry data (identity line and instrument metadata).
    #[serde(default = "default_skip_lines")]
    pub skip_lines: Vec<usize>,

    /// Number of trailing lines to discard.
    #[serde(default = "default_footer_lines")]
    pub footer_lines: usize,

    /// Field delimiter of the header and data lines.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Separator between labels on the identity line.
    #[serde(default = "default_identity_separator")]
    pub identity_separator: char,
}

fn default_header_line() -> usize {
    1
}

fn default_skip_lines() -> Vec<usize> {
    vec![0, 2, 3, 4, 5]
}

fn default_footer_lines() -> usize {
    1
}

fn default_delimiter() -> char {
    ';'
}

fn default_identity_separator() -> char {
    ','
}

impl Default for ExportLayout {
    fn default() -> Self {
        Self {
            header_line: default_header_line(),
            skip_lines: default_skip_lines(),
            footer_lines: default_footer_lines(),
            delimiter: default_delimiter(),
            identity_separator: default_identity_separator(),
        }
    }
}

impl ExportLayout {
    /// Whether line `idx` of a file with `total` lines is a data line.
    pub fn is_data_line(&self, idx: usize, total: usize) -> bool {
        idx != self.header_line
            && !self.skip_lines.contains(&idx)
            && idx + self.footer_lines < total
    }

    /// The delimiter as the single byte the CSV reader wants.
    pub fn delimiter_byte(&self) -> Option<u8> {
        u8::try_from(self.delimiter).ok().filter(u8::is_ascii)
    }
}

/// Whether a raw cell text encodes a missing value.
pub fn is_na_marker(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || NA_MARKERS.contains(&trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_data_lines() {
        let layout = ExportLayout::default();
        let total = 10;
        let data: Vec<usize> = (0..total).filter(|&i| layout.is_data_line(i, total)).collect();
        assert_eq!(data, vec![6, 7, 8]);
    }

    #[test]
    fn test_layout_from_partial_json() {
        let layout: ExportLayout = serde_json::from_str(r#"{ "footer_lines": 0 }"#).unwrap();
        assert_eq!(layout.footer_lines, 0);
        assert_eq!(layout.skip_lines, vec![0, 2, 3, 4, 5]);
        assert_eq!(layout.delimiter_byte(), Some(b';'));
    }

    #[test]
    fn test_na_markers() {
        assert!(is_na_marker(""));
        assert!(is_na_marker("  "));
        assert!(is_na_marker("NaN"));
        assert!(!is_na_marker("0"));
        assert!(!is_na_marker("on"));
    }
}
