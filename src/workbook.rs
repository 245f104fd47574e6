/// Workbook access and sheet-to-rows conversion
///
/// Opening is synchronous; callers that live on an async runtime should use
/// `spawn_blocking`. Rows are addressed in absolute sheet coordinates (row 0 is
/// spreadsheet row 1, column 0 is column A) no matter where the first used cell is, so the
/// skip counts the loaders use stay tied to the file layout.
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use crate::dataset::Dataset;
use crate::load_error::LoadError;
use crate::table::{Table, Value};
use crate::utils::excel_serial_to_date;

pub type Workbook = Sheets<BufReader<File>>;

pub fn open(dataset: Dataset, path: &Path) -> Result<Workbook, LoadError> {
    debug!(%dataset, path = %path.display(), "Opening workbook");
    open_workbook_auto(path).map_err(|e| LoadError::WorkbookOpen {
        dataset,
        path: path.display().to_string(),
        msg: e.to_string(),
    })
}

pub fn worksheet(
    workbook: &mut Workbook,
    dataset: Dataset,
    sheet: &str,
) -> Result<Range<Data>, LoadError> {
    if !workbook.sheet_names().iter().any(|s| s == sheet) {
        return Err(LoadError::SheetNotFound {
            dataset,
            sheet: sheet.to_string(),
        });
    }
    workbook
        .worksheet_range(sheet)
        .map_err(|e| LoadError::layout(dataset, format!("cannot read sheet {sheet}: {e}")))
}

/// The sheet a spreadsheet reader picks when none is named
pub fn first_worksheet(workbook: &mut Workbook, dataset: Dataset) -> Result<Range<Data>, LoadError> {
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(LoadError::NoSheets { dataset })?;
    worksheet(workbook, dataset, &first)
}

impl From<&Data> for Value {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => Value::Empty,
            Data::Bool(b) => Value::Bool(*b),
            Data::Int(i) => Value::Int(*i),
            Data::Float(f) => Value::Float(*f),
            Data::String(s) if s.trim().is_empty() => Value::Empty,
            Data::String(s) => Value::Text(s.clone()),
            Data::DateTime(dt) if dt.is_datetime() => match dt.as_datetime() {
                Some(chrono_dt) => Value::Date(chrono_dt.date()),
                None => excel_serial_to_date(dt.as_f64())
                    .map(Value::Date)
                    .unwrap_or(Value::Float(dt.as_f64())),
            },
            Data::DateTime(dt) => Value::Float(dt.as_f64()),
            Data::DateTimeIso(s) => chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .map(|dt| Value::Date(dt.date()))
                .or_else(|_| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Value::Date))
                .unwrap_or_else(|_| Value::Text(s.clone())),
            Data::DurationIso(s) => Value::Text(s.clone()),
        }
    }
}

/// All rows of a sheet after skipping `skip_rows` raw rows, with blank rows dropped
///
/// Every returned row spans column A through the last used column.
pub fn sheet_rows(range: &Range<Data>, skip_rows: usize) -> Vec<Vec<Value>> {
    let Some((end_row, end_col)) = range.end() else {
        return Vec::new();
    };
    let width = end_col as usize + 1;

    (skip_rows..=end_row as usize)
        .map(|row| {
            (0..width)
                .map(|col| {
                    range
                        .get_value((row as u32, col as u32))
                        .map(Value::from)
                        .unwrap_or_default()
                })
                .collect::<Vec<Value>>()
        })
        .filter(|row| row.iter().any(|v| !v.is_empty()))
        .collect()
}

/// Read a sheet whose first row after `skip_rows` is a header
///
/// Blank header cells become `Unnamed: {col}` and repeats get `.1`, `.2`, ... suffixes, so
/// the resulting column names are always unique. A sheet with nothing left after the skip
/// yields a table with no columns.
pub fn headered_table(range: &Range<Data>, skip_rows: usize) -> Table {
    let mut rows = sheet_rows(range, skip_rows).into_iter();
    let Some(header) = rows.next() else {
        return Table::default();
    };

    let columns = unique_header_names(&header);
    let data: Vec<Vec<Value>> = rows.collect();
    debug!(
        columns = columns.len(),
        rows = data.len(),
        "Read headered sheet"
    );

    // Header and data rows come from the same grid, so widths always agree.
    Table::from_rows(columns, data).unwrap_or_default()
}

fn header_name(col: usize, cell: &Value) -> String {
    match cell {
        Value::Empty => format!("Unnamed: {col}"),
        Value::Float(f) if f.fract() == 0.0 => format!("{f:.0}"),
        other => other.to_string(),
    }
}

fn unique_header_names(header: &[Value]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut names: Vec<String> = Vec::with_capacity(header.len());

    for (col, cell) in header.iter().enumerate() {
        let base = header_name(col, cell);
        let mut name = base.clone();
        while names.contains(&name) {
            let n = counts.entry(base.clone()).or_insert(0);
            *n += 1;
            name = format!("{base}.{n}");
        }
        names.push(name);
    }
    names
}


#[cfg(test)]
mod tests {
    use super::fixtures::{grid, s};
    use super::*;

    #[test]
    fn test_sheet_rows_skips_then_drops_blank_rows() {
        let range = grid(vec![
            vec![s("title"), Data::Empty],
            vec![Data::Empty, Data::Empty],
            vec![s("a"), Data::Float(1.0)],
            vec![Data::Empty, Data::Empty],
            vec![s("b"), Data::Float(2.0)],
        ]);
        let rows = sheet_rows(&range, 1);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec![Value::text("a"), Value::Float(1.0)]);
        assert_eq!(rows[1], vec![Value::text("b"), Value::Float(2.0)]);
    }

    #[test]
    fn test_sheet_rows_uses_absolute_coordinates() {
        // Used area starts at C3: columns A and B and rows 1-2 are still counted
        let mut range = Range::new((2, 2), (3, 2));
        range.set_value((2, 2), s("header"));
        range.set_value((3, 2), Data::Int(7));

        let rows = sheet_rows(&range, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec![Value::Empty, Value::Empty, Value::text("header")]);
        assert_eq!(rows[1][2], Value::Int(7));
    }

    #[test]
    fn test_sheet_rows_empty_range() {
        let range: Range<Data> = Range::empty();
        assert!(sheet_rows(&range, 0).is_empty());
    }

    #[test]
    fn test_headered_table_names() {
        let range = grid(vec![
            vec![s("Year"), Data::Empty, s("NOK/kg"), s("NOK/kg"), Data::Float(2020.0)],
            vec![Data::Int(2020), Data::Int(1), Data::Float(60.5), Data::Float(61.0), Data::Empty],
        ]);
        let table = headered_table(&range, 0);
        assert_eq!(
            table.columns(),
            vec!["Year", "Unnamed: 1", "NOK/kg", "NOK/kg.1", "2020"]
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_headered_table_nothing_after_skip() {
        let range = grid(vec![vec![s("only a title")]]);
        let table = headered_table(&range, 1);
        assert_eq!(table.width(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(Value::from(&Data::Empty), Value::Empty);
        assert_eq!(Value::from(&s("  ")), Value::Empty);
        assert_eq!(Value::from(&Data::Int(4)), Value::Int(4));
        assert_eq!(
            Value::from(&Data::DateTimeIso("2024-01-08T00:00:00".to_string())),
            Value::Date(chrono::NaiveDate::from_ymd_opt(2024, 1, 8).unwrap())
        );
    }

    #[test]
    fn test_open_missing_file() {
        let result = open(Dataset::FishPool, Path::new("/nonexistent/Fish_Pool_Data.xls"));
        assert!(matches!(
            result,
            Err(LoadError::WorkbookOpen {
                dataset: Dataset::FishPool,
                ..
            })
        ));
    }
}
