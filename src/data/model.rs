use std::fmt;

use crate::error::{PamError, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a measurement table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell. Instrument exports are mostly numeric, but some
/// columns (time stamps, flags) arrive as text.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    /// Interpret the value as an `f64`, if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Missing cells and NaN numbers both count as missing, matching how the
    /// exports encode gaps.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Number(v) => v.is_nan(),
            CellValue::Text(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) if v.is_nan() => Ok(()),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Missing => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

/// One named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    pub fn numeric(name: impl Into<String>, values: &[f64]) -> Self {
        Column::new(name, values.iter().copied().map(CellValue::Number).collect())
    }

    pub fn has_missing(&self) -> bool {
        self.values.iter().any(CellValue::is_missing)
    }
}

/// Column-oriented table. Rows are addressed positionally, so the row index
/// is always the contiguous range `0..n_rows()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

/// A cleaned instrument export.
pub type MeasurementTable = Table;

/// A measurement table carrying the derived metric columns.
pub type DerivedTable = Table;

impl Table {
    /// Build a table from columns. All columns must share the same length.
    pub fn from_columns(columns: Vec<Column>) -> Self {
        let n_rows = columns.first().map_or(0, |c| c.values.len());
        debug_assert!(columns.iter().all(|c| c.values.len() == n_rows));
        Table { columns, n_rows }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Read a column as numbers, failing if it is absent or holds anything
    /// that is not a number.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let column = self
            .column(name)
            .ok_or_else(|| PamError::missing_column(name))?;
        column
            .values
            .iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                CellValue::Number(v) => Ok(*v),
                other => Err(PamError::NonNumericColumn {
                    column: name.to_string(),
                    row,
                    value: other.to_string(),
                }),
            })
            .collect()
    }

    /// Insert a column, replacing an existing column of the same name in place.
    pub fn set_column(&mut self, column: Column) {
        debug_assert_eq!(column.values.len(), self.n_rows);
        match self.position(&column.name) {
            Some(idx) => self.columns[idx] = column,
            None => self.columns.push(column),
        }
    }

    /// Drop every column that has at least one missing cell.
    pub fn drop_incomplete_columns(&mut self) -> Vec<String> {
        let (kept, dropped): (Vec<Column>, Vec<Column>) =
            std::mem::take(&mut self.columns)
                .into_iter()
                .partition(|c| !c.has_missing());
        self.columns = kept;
        dropped.into_iter().map(|c| c.name).collect()
    }

    /// Move the named column to position 0. Returns false if it is absent.
    pub fn move_to_front(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(idx) => {
                let column = self.columns.remove(idx);
                self.columns.insert(0, column);
                true
            }
            None => false,
        }
    }

    /// Append `other` below `self`. Columns are the union of both tables in
    /// first-seen order; cells a table lacks are filled with `Missing`.
    pub fn concat(&mut self, other: Table) {
        let old_rows = self.n_rows;
        let added = other.n_rows;

        for column in &mut self.columns {
            column.values.resize(old_rows + added, CellValue::Missing);
        }
        for column in other.columns {
            match self.position(&column.name) {
                Some(idx) => {
                    let target = &mut self.columns[idx].values;
                    target.truncate(old_rows);
                    target.extend(column.values);
                }
                None => {
                    let mut values = vec![CellValue::Missing; old_rows];
                    values.extend(column.values);
                    self.columns.push(Column::new(column.name, values));
                }
            }
        }
        self.n_rows = old_rows + added;
    }
}

// ---------------------------------------------------------------------------
// SampleIdentity – the label set on the first line of an export
// ---------------------------------------------------------------------------

/// Ordered sample labels of one measurement file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleIdentity {
    labels: Vec<String>,
}

impl SampleIdentity {
    pub fn new(labels: Vec<String>) -> Self {
        SampleIdentity { labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The labels joined with `", "`; used as the sample name everywhere.
    pub fn joined(&self) -> String {
        self.labels.join(", ")
    }

    /// True when any label contains `tag` as a substring.
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.labels.iter().any(|label| label.contains(tag))
    }
}

impl fmt::Display for SampleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_drop_incomplete_columns() {
        let mut table = Table::from_columns(vec![
            Column::numeric("a", &[1.0, 2.0]),
            Column::new("b", vec![CellValue::Number(1.0), CellValue::Missing]),
            Column::numeric("c", &[f64::NAN, 3.0]),
            Column::new("d", vec![text("x"), text("y")]),
        ]);
        let dropped = table.drop_incomplete_columns();
        assert_eq!(dropped, vec!["b", "c"]);
        assert_eq!(table.column_names(), vec!["a", "d"]);
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn test_set_column_replaces_in_place() {
        let mut table = Table::from_columns(vec![
            Column::numeric("qP", &[0.1]),
            Column::numeric("PAR", &[5.0]),
        ]);
        table.set_column(Column::numeric("qP", &[0.9]));
        table.set_column(Column::numeric("rETR", &[1.0]));
        assert_eq!(table.column_names(), vec!["qP", "PAR", "rETR"]);
        assert_eq!(table.numeric_column("qP").unwrap(), vec![0.9]);
    }

    #[test]
    fn test_numeric_column_errors() {
        let table = Table::from_columns(vec![Column::new("t", vec![text("12:00")])]);
        assert!(matches!(
            table.numeric_column("F"),
            Err(PamError::MissingColumn { ref column }) if column == "F"
        ));
        assert!(matches!(
            table.numeric_column("t"),
            Err(PamError::NonNumericColumn { row: 0, .. })
        ));
    }

    #[test]
    fn test_concat_unions_columns() {
        let mut a = Table::from_columns(vec![
            Column::numeric("x", &[1.0]),
            Column::numeric("y", &[2.0]),
        ]);
        let b = Table::from_columns(vec![
            Column::numeric("y", &[3.0, 4.0]),
            Column::numeric("z", &[5.0, 6.0]),
        ]);
        a.concat(b);

        assert_eq!(a.n_rows(), 3);
        assert_eq!(a.column_names(), vec!["x", "y", "z"]);
        assert_eq!(a.numeric_column("y").unwrap(), vec![2.0, 3.0, 4.0]);
        let x = &a.column("x").unwrap().values;
        assert_eq!(x[0], CellValue::Number(1.0));
        assert!(x[1].is_missing() && x[2].is_missing());
        let z = &a.column("z").unwrap().values;
        assert!(z[0].is_missing());
    }

    #[test]
    fn test_concat_onto_empty_table() {
        let mut a = Table::default();
        a.concat(Table::from_columns(vec![Column::numeric("x", &[1.0, 2.0])]));
        assert_eq!(a.n_rows(), 2);
        assert_eq!(a.column_names(), vec!["x"]);
    }

    #[test]
    fn test_move_to_front() {
        let mut table = Table::from_columns(vec![
            Column::numeric("a", &[1.0]),
            Column::numeric("b", &[2.0]),
        ]);
        assert!(table.move_to_front("b"));
        assert!(!table.move_to_front("nope"));
        assert_eq!(table.column_names(), vec!["b", "a"]);
    }

    #[test]
    fn test_identity_joined_and_tags() {
        let id = SampleIdentity::new(vec!["WT1".into(), "LHCX1g1".into()]);
        assert_eq!(id.joined(), "WT1, LHCX1g1");
        assert!(id.contains_tag("WT"));
        assert!(id.contains_tag("LHCX1"));
        assert!(!id.contains_tag("LHCX1g2"));
    }
}
