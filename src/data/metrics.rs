//! Derived photophysiological metrics.
//!
//! All maxima are file-local: every export is normalised against its own
//! `max(Fm')` and `max(~Fo')`.

use serde::Serialize;

use super::model::{Column, DerivedTable, MeasurementTable, SampleIdentity};
use crate::error::Result;

pub const FM_PRIME: &str = "Fm'";
pub const FO_PRIME: &str = "~Fo'";
pub const PAR: &str = "PAR";

pub const NPQ_OWN: &str = "NPQown";
pub const PSII_PRIME: &str = "PSII'";
pub const QP: &str = "qP";
pub const RETR: &str = "rETR";

/// Column names of [`SampleMaxima`] in output order.
pub const MAXIMA_COLUMNS: [&str; 4] = ["max_Fm", "max_NPQ", "max_Fo", "max_PSII"];

/// Per-file maxima, named by the joined sample identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleMaxima {
    pub name: String,
    pub max_fm: f64,
    pub max_npq: f64,
    pub max_fo: f64,
    pub max_psii: f64,
}

impl SampleMaxima {
    /// Values in [`MAXIMA_COLUMNS`] order.
    pub fn values(&self) -> [f64; 4] {
        [self.max_fm, self.max_npq, self.max_fo, self.max_psii]
    }
}

/// Append `NPQown`, `PSII'`, `qP` and `rETR` to a cleaned table and compute
/// the file's maxima.
///
/// ```text
/// NPQown = max_Fm / Fm' - 1
/// PSII'  = (Fm' - max_Fo) / Fm'
/// qP     = (Fm' - max_Fm) / (Fm' - max_Fo)
/// rETR   = PSII' * PAR
/// ```
///
/// `qP` is written exactly as above even though it differs from the textbook
/// photochemical quenching coefficient. A `qP` column exported by the
/// instrument is overwritten in place.
pub fn compute_derived(
    mut table: MeasurementTable,
    identity: &SampleIdentity,
) -> Result<(DerivedTable, SampleMaxima)> {
    let fm = table.numeric_column(FM_PRIME)?;
    let fo = table.numeric_column(FO_PRIME)?;
    let par = table.numeric_column(PAR)?;

    let max_fm = nan_max(&fm);
    let npq_own: Vec<f64> = fm.iter().map(|&f| max_fm / f - 1.0).collect();
    let max_npq = nan_max(&npq_own);
    let max_fo = nan_max(&fo);
    let max_psii = (max_fm - max_fo) / max_fm;

    let psii: Vec<f64> = fm.iter().map(|&f| (f - max_fo) / f).collect();
    let qp: Vec<f64> = fm
        .iter()
        .map(|&f| (f - max_fm) / (f - max_fo))
        .collect();
    let retr: Vec<f64> = psii.iter().zip(&par).map(|(&p, &light)| p * light).collect();

    table.set_column(Column::numeric(NPQ_OWN, &npq_own));
    table.set_column(Column::numeric(PSII_PRIME, &psii));
    table.set_column(Column::numeric(QP, &qp));
    table.set_column(Column::numeric(RETR, &retr));

    let maxima = SampleMaxima {
        name: identity.joined(),
        max_fm,
        max_npq,
        max_fo,
        max_psii,
    };
    Ok((table, maxima))
}

/// Maximum ignoring NaN; NaN when there is nothing to compare.
fn nan_max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
        .unwrap_or(f64::NAN)
}
