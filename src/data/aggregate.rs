use super::metrics::SampleMaxima;
use super::model::{CellValue, Column, DerivedTable, SampleIdentity, Table};

/// Name of the sample column added to the merged dataset.
pub const SAMPLE_NAME: &str = "sampleName";

// ---------------------------------------------------------------------------
// Aggregator – explicit fold over processed files
// ---------------------------------------------------------------------------

/// Owns the two growing datasets of a run. Append-only; rows keep the order
/// in which files were appended.
#[derive(Debug, Default)]
pub struct Aggregator {
    main: Table,
    maxima: Vec<SampleMaxima>,
    per_file_rows: Vec<usize>,
}

/// The merged outputs of a run.
#[derive(Debug, Clone)]
pub struct AggregatedResults {
    /// Every file's derived table, `sampleName` first, rows 0..N-1.
    pub main: Table,
    /// One maxima row per appended file, labelled by sample name.
    pub maxima: Vec<SampleMaxima>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a derived table with its sample name and fold it in.
    pub fn append(&mut self, mut table: DerivedTable, maxima: SampleMaxima, identity: &SampleIdentity) {
        let name = identity.joined();
        let n_rows = table.n_rows();
        table.set_column(Column::new(
            SAMPLE_NAME,
            vec![CellValue::Text(name); n_rows],
        ));

        self.main.concat(table);
        self.maxima.push(maxima);
        self.per_file_rows.push(n_rows);
    }

    /// Number of files appended so far.
    pub fn len(&self) -> usize {
        self.maxima.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maxima.is_empty()
    }

    /// Row counts of the appended tables, in append order.
    pub fn per_file_rows(&self) -> &[usize] {
        &self.per_file_rows
    }

    /// Close the fold: `sampleName` becomes the first column.
    pub fn finalize(self) -> AggregatedResults {
        let mut main = self.main;
        if !main.move_to_front(SAMPLE_NAME) {
            main = Table::from_columns(vec![Column::new(SAMPLE_NAME, Vec::new())]);
        }
        AggregatedResults {
            main,
            maxima: self.maxima,
        }
    }
}

impl AggregatedResults {
    /// Distinct sample names of the merged dataset, first-seen order.
    pub fn sample_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for maxima in &self.maxima {
            if !names.contains(&maxima.name) {
                names.push(maxima.name.clone());
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::metrics::compute_derived;

    fn sample(labels: &[&str], fm: &[f64]) -> (DerivedTable, SampleMaxima, SampleIdentity) {
        let n = fm.len();
        let table = Table::from_columns(vec![
            Column::numeric("t", &(0..n).map(|i| i as f64 * 20.0).collect::<Vec<_>>()),
            Column::numeric("PAR", &vec![100.0; n]),
            Column::numeric("Fm'", fm),
            Column::numeric("~Fo'", &vec![100.0; n]),
        ]);
        let id = SampleIdentity::new(labels.iter().map(|s| s.to_string()).collect());
        let (derived, maxima) = compute_derived(table, &id).unwrap();
        (derived, maxima, id)
    }

    #[test]
    fn test_two_files_merge() {
        let mut agg = Aggregator::new();
        let (t1, m1, id1) = sample(&["WT1"], &[500.0, 480.0, 450.0]);
        let (t2, m2, id2) = sample(&["LHCX1g1", "rep2"], &[400.0, 390.0]);
        agg.append(t1, m1, &id1);
        agg.append(t2, m2, &id2);
        assert_eq!(agg.per_file_rows(), &[3, 2]);

        let results = agg.finalize();
        assert_eq!(results.main.n_rows(), 5);
        assert_eq!(results.main.column_names()[0], SAMPLE_NAME);
        assert_eq!(results.maxima.len(), 2);
        assert_eq!(results.sample_names(), vec!["WT1", "LHCX1g1, rep2"]);

        let names = &results.main.column(SAMPLE_NAME).unwrap().values;
        assert_eq!(names[0], CellValue::Text("WT1".into()));
        assert_eq!(names[4], CellValue::Text("LHCX1g1, rep2".into()));
    }

    #[test]
    fn test_duplicate_identities_are_kept() {
        let mut agg = Aggregator::new();
        for _ in 0..2 {
            let (t, m, id) = sample(&["WT1"], &[500.0]);
            agg.append(t, m, &id);
        }
        let results = agg.finalize();
        assert_eq!(results.maxima.len(), 2);
        assert_eq!(results.main.n_rows(), 2);
        assert_eq!(results.sample_names().len(), 1);
    }

    #[test]
    fn test_finalize_empty() {
        let results = Aggregator::new().finalize();
        assert_eq!(results.main.n_rows(), 0);
        assert_eq!(results.main.column_names(), vec![SAMPLE_NAME]);
        assert!(results.maxima.is_empty());
    }
}
