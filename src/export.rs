//! Output sinks for the merged tables: workbook, CSV and Parquet.
//!
//! Every sink writes a [`Sheet`]: a leading index column followed by the data
//! columns. The main dataset is indexed by row number, the maxima by sample
//! name.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::Workbook;

use crate::config::OutputSettings;
use crate::data::aggregate::{AggregatedResults, SAMPLE_NAME};
use crate::data::metrics::{SampleMaxima, MAXIMA_COLUMNS};
use crate::data::model::{CellValue, Column, Table};
use crate::error::{PamError, Result};

pub const MAIN_SHEET: &str = "mainData";
pub const MAXIMA_SHEET: &str = "maxValues";

// ---------------------------------------------------------------------------
// Sheet – what every sink writes
// ---------------------------------------------------------------------------

/// An indexed table ready to be written.
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Field name of the index in formats that require one (Parquet). CSV
    /// and workbook outputs leave the index header blank.
    pub index_name: String,
    pub index: Vec<CellValue>,
    pub columns: Vec<Column>,
}

impl Sheet {
    /// Index a table by its row positions.
    pub fn from_table(table: &Table) -> Self {
        Sheet {
            index_name: "index".to_string(),
            index: (0..table.n_rows()).map(|i| CellValue::Number(i as f64)).collect(),
            columns: table.columns().to_vec(),
        }
    }

    /// One row per sample, indexed by sample name.
    pub fn from_maxima(maxima: &[SampleMaxima]) -> Self {
        let columns = MAXIMA_COLUMNS
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Column::new(
                    *name,
                    maxima.iter().map(|m| CellValue::Number(m.values()[i])).collect(),
                )
            })
            .collect();
        Sheet {
            index_name: SAMPLE_NAME.to_string(),
            index: maxima.iter().map(|m| CellValue::Text(m.name.clone())).collect(),
            columns,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    fn header(&self) -> Vec<&str> {
        std::iter::once("")
            .chain(self.columns.iter().map(|c| c.name.as_str()))
            .collect()
    }

    fn cells(&self, row: usize) -> impl Iterator<Item = &CellValue> {
        std::iter::once(&self.index[row]).chain(self.columns.iter().map(move |c| &c.values[row]))
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Write a sheet as a comma-separated file. Missing cells are empty fields.
pub fn write_csv(path: &Path, sheet: &Sheet) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(sheet.header())?;
    for row in 0..sheet.n_rows() {
        writer.write_record(sheet.cells(row).map(|c| c.to_string()))?;
    }
    writer.flush().map_err(|e| PamError::io(path, e))?;
    Ok(())
}

/// Write one worksheet per sheet into a single `.xlsx` workbook.
///
/// `sheet_names` must name every sheet; on a count mismatch nothing is
/// written and [`PamError::NameCountMismatch`] is returned.
pub fn write_workbook(path: &Path, sheets: &[Sheet], sheet_names: &[&str]) -> Result<()> {
    if sheets.len() != sheet_names.len() {
        return Err(PamError::NameCountMismatch {
            tables: sheets.len(),
            names: sheet_names.len(),
        });
    }

    let mut workbook = Workbook::new();
    for (sheet, name) in sheets.iter().zip(sheet_names) {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;

        for (col, title) in sheet.header().into_iter().enumerate() {
            worksheet.write_string(0, xlsx_col(col), title)?;
        }
        for row in 0..sheet.n_rows() {
            let xl_row = xlsx_row(row + 1);
            for (col, cell) in sheet.cells(row).enumerate() {
                let xl_col = xlsx_col(col);
                match cell {
                    CellValue::Number(v) if v.is_finite() => {
                        worksheet.write_number(xl_row, xl_col, *v)?;
                    }
                    CellValue::Number(v) if v.is_infinite() => {
                        worksheet.write_string(xl_row, xl_col, v.to_string())?;
                    }
                    CellValue::Text(s) => {
                        worksheet.write_string(xl_row, xl_col, s.as_str())?;
                    }
                    _ => {}
                }
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}

// Out-of-range positions saturate so the workbook writer reports the limit.
fn xlsx_row(row: usize) -> u32 {
    u32::try_from(row).unwrap_or(u32::MAX)
}

fn xlsx_col(col: usize) -> u16 {
    u16::try_from(col).unwrap_or(u16::MAX)
}

/// Write a sheet as a Parquet file. Fully numeric columns become `Float64`,
/// everything else `Utf8`; missing cells are null.
pub fn write_parquet(path: &Path, sheet: &Sheet) -> Result<()> {
    let mut fields = Vec::with_capacity(sheet.columns.len() + 1);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(sheet.columns.len() + 1);

    let index = Column::new(sheet.index_name.clone(), sheet.index.clone());
    for column in std::iter::once(&index).chain(&sheet.columns) {
        let (field, array) = column_to_arrow(column);
        fields.push(field);
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;
    let file = File::create(path).map_err(|e| PamError::io(path, e))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn column_to_arrow(column: &Column) -> (Field, ArrayRef) {
    let numeric = column
        .values
        .iter()
        .all(|c| matches!(c, CellValue::Number(_) | CellValue::Missing));

    if numeric {
        let values: Vec<Option<f64>> = column.values.iter().map(CellValue::as_f64).collect();
        (
            Field::new(&column.name, DataType::Float64, true),
            Arc::new(Float64Array::from(values)),
        )
    } else {
        let values: Vec<Option<String>> = column
            .values
            .iter()
            .map(|c| (!c.is_missing()).then(|| c.to_string()))
            .collect();
        (
            Field::new(&column.name, DataType::Utf8, true),
            Arc::new(StringArray::from(values)),
        )
    }
}

// ---------------------------------------------------------------------------
// Output naming
// ---------------------------------------------------------------------------

/// Resolved file paths of every artifact a run may write.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub workbook: PathBuf,
    pub main_csv: PathBuf,
    pub max_csv: PathBuf,
    pub main_parquet: PathBuf,
    pub max_parquet: PathBuf,
}

impl OutputPaths {
    /// Apply custom names or the experiment-derived defaults.
    pub fn resolve(settings: &OutputSettings, experiment: &str) -> Self {
        let dir = &settings.results_dir;
        let workbook = settings
            .workbook_name
            .as_deref()
            .map(|n| with_suffix(n, ".xlsx"))
            .unwrap_or_else(|| format!("{experiment}.xlsx"));
        let main_csv = settings
            .csv_names
            .main
            .as_deref()
            .map(|n| with_suffix(n, ".CSV"))
            .unwrap_or_else(|| format!("{experiment}_mainData.CSV"));
        let max_csv = settings
            .csv_names
            .max
            .as_deref()
            .map(|n| with_suffix(n, ".CSV"))
            .unwrap_or_else(|| format!("{experiment}_maxData.CSV"));

        OutputPaths {
            workbook: dir.join(workbook),
            main_csv: dir.join(main_csv),
            max_csv: dir.join(max_csv),
            main_parquet: dir.join(format!("{experiment}_mainData.parquet")),
            max_parquet: dir.join(format!("{experiment}_maxData.parquet")),
        }
    }
}

/// Append `suffix` unless the name already ends with it.
pub fn with_suffix(name: &str, suffix: &str) -> String {
    if name.ends_with(suffix) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}

/// Write every artifact requested in `settings`. Returns the written paths.
///
/// A sheet/name count mismatch is reported as a warning and that artifact is
/// skipped; other write errors are returned.
pub fn export_results(
    results: &AggregatedResults,
    settings: &OutputSettings,
    experiment: &str,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if !settings.any() {
        return Ok(written);
    }

    fs::create_dir_all(&settings.results_dir).map_err(|e| PamError::io(&settings.results_dir, e))?;
    let paths = OutputPaths::resolve(settings, experiment);
    let main = Sheet::from_table(&results.main);
    let maxima = Sheet::from_maxima(&results.maxima);

    if settings.save_workbook {
        match write_workbook(&paths.workbook, &[main.clone(), maxima.clone()], &[MAIN_SHEET, MAXIMA_SHEET]) {
            Ok(()) => written.push(paths.workbook.clone()),
            Err(e @ PamError::NameCountMismatch { .. }) => {
                log::warn!("Workbook not written: {e}");
            }
            Err(e) => return Err(e),
        }
    }

    if settings.save_csv {
        write_csv(&paths.main_csv, &main)?;
        write_csv(&paths.max_csv, &maxima)?;
        written.push(paths.main_csv.clone());
        written.push(paths.max_csv.clone());
    }

    if settings.save_parquet {
        write_parquet(&paths.main_parquet, &main)?;
        write_parquet(&paths.max_parquet, &maxima)?;
        written.push(paths.main_parquet.clone());
        written.push(paths.max_parquet.clone());
    }

    for path in &written {
        log::info!("Wrote {}", path.display());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::tempdir;

    fn maxima() -> Vec<SampleMaxima> {
        vec![SampleMaxima {
            name: "WT1, LHCX1g1".into(),
            max_fm: 500.0,
            max_npq: 0.5,
            max_fo: 100.0,
            max_psii: 0.8,
        }]
    }

    fn main_table() -> Table {
        Table::from_columns(vec![
            Column::new(SAMPLE_NAME, vec![CellValue::Text("A".into()), CellValue::Text("B".into())]),
            Column::new("F", vec![CellValue::Number(1.5), CellValue::Missing]),
        ])
    }

    #[test]
    fn test_write_csv_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("main.CSV");
        write_csv(&path, &Sheet::from_table(&main_table())).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, ",sampleName,F\n0,A,1.5\n1,B,\n");
    }

    #[test]
    fn test_write_maxima_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("max.CSV");
        write_csv(&path, &Sheet::from_maxima(&maxima())).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            ",max_Fm,max_NPQ,max_Fo,max_PSII\n\"WT1, LHCX1g1\",500,0.5,100,0.8\n"
        );
    }

    #[test]
    fn test_workbook_name_mismatch_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let sheets = [Sheet::from_table(&main_table()), Sheet::from_maxima(&maxima())];
        let err = write_workbook(&path, &sheets, &[MAIN_SHEET]).unwrap_err();
        assert!(matches!(err, PamError::NameCountMismatch { tables: 2, names: 1 }));
        assert!(!path.exists());
    }

    #[test]
    fn test_workbook_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let sheets = [Sheet::from_table(&main_table()), Sheet::from_maxima(&maxima())];
        write_workbook(&path, &sheets, &[MAIN_SHEET, MAXIMA_SHEET]).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_parquet_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("main.parquet");
        write_parquet(&path, &Sheet::from_table(&main_table())).unwrap();

        let file = File::open(&path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file).unwrap().build().unwrap();
        let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();
        let schema = batches[0].schema();
        assert_eq!(schema.field(0).name(), "index");
        assert_eq!(schema.field(1).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(2).data_type(), &DataType::Float64);
        assert_eq!(batches[0].column(2).null_count(), 1);
    }

    #[test]
    fn test_output_names() {
        let mut settings = OutputSettings::default();
        let paths = OutputPaths::resolve(&settings, "20230314");
        assert_eq!(paths.workbook, PathBuf::from("myPAMresults/20230314.xlsx"));
        assert_eq!(paths.main_csv, PathBuf::from("myPAMresults/20230314_mainData.CSV"));
        assert_eq!(paths.max_csv, PathBuf::from("myPAMresults/20230314_maxData.CSV"));

        settings.workbook_name = Some("merged".into());
        settings.csv_names.max = Some("peaks.CSV".into());
        let paths = OutputPaths::resolve(&settings, "20230314");
        assert_eq!(paths.workbook, PathBuf::from("myPAMresults/merged.xlsx"));
        assert_eq!(paths.max_csv, PathBuf::from("myPAMresults/peaks.CSV"));
        assert_eq!(paths.main_csv, PathBuf::from("myPAMresults/20230314_mainData.CSV"));
    }
}
