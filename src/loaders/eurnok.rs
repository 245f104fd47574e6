/// Norges Bank EURNOK daily spot rate
///
/// The export is wide: after 21 rows of series metadata there is one row of dates and
/// one row of rates, with one column per business day.
use calamine::{Data, Range};
use tracing::warn;

use crate::dataset::Dataset;
use crate::load_error::LoadError;
use crate::table::{Table, Value};
use crate::utils::parse_date_with_format;
use crate::workbook::sheet_rows;

/// Metadata rows above the date row
pub const EURNOK_SKIP_ROWS: usize = 21;

pub const EURNOK_DATE_FORMAT: &str = "%Y-%m-%d";

pub const EURNOK_COLUMNS: [&str; 2] = ["Date", "EURNOK_Daily"];

const DATASET: Dataset = Dataset::EurNok;

pub fn reshape_eurnok(range: &Range<Data>) -> Result<Table, LoadError> {
    let rows = sheet_rows(range, EURNOK_SKIP_ROWS);
    let [dates, rates] = rows.as_slice() else {
        return Err(LoadError::layout(
            DATASET,
            format!(
                "expected a date row and a rate row after {EURNOK_SKIP_ROWS} header rows, found {} rows",
                rows.len()
            ),
        ));
    };

    let mut table =
        Table::new(EURNOK_COLUMNS).map_err(|e| LoadError::from_table(DATASET, e))?;
    let mut dropped = 0;

    for (col, (date_cell, rate)) in dates.iter().zip(rates).enumerate() {
        if date_cell.is_empty() && rate.is_empty() {
            dropped += 1;
            continue;
        }
        let date = parse_date_with_format(date_cell, EURNOK_DATE_FORMAT)
            .map_err(|value| LoadError::InvalidDate {
                dataset: DATASET,
                row: col,
                value,
            })?
            .map(Value::Date)
            .unwrap_or_default();

        table
            .push_row(vec![date, rate.clone()])
            .map_err(|e| LoadError::from_table(DATASET, e))?;
    }

    if dropped > 0 {
        warn!(dropped, "Skipped empty EURNOK columns");
    }

    // Undated records sort last
    table.sort_rows_by_key(|row| (row[0].is_empty(), row[0].as_date()));
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_error::Stage;
    use crate::workbook::fixtures::{grid, s};
    use chrono::NaiveDate;

    fn eurnok_sheet(dates: &[&str], rates: &[f64]) -> Range<Data> {
        let mut rows: Vec<Vec<Data>> = (0..EURNOK_SKIP_ROWS)
            .map(|i| vec![s(&format!("meta {i}"))])
            .collect();
        rows.push(dates.iter().map(|d| s(d)).collect());
        rows.push(rates.iter().map(|r| Data::Float(*r)).collect());
        grid(rows)
    }

    #[test]
    fn test_transposes_wide_block() {
        let range = eurnok_sheet(&["2000-01-24", "2000-01-25", "2000-01-26"], &[8.1, 8.2, 8.15]);
        let table = reshape_eurnok(&range).unwrap();

        assert_eq!(table.columns(), &["Date", "EURNOK_Daily"]);
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.rows()[1],
            vec![
                Value::Date(NaiveDate::from_ymd_opt(2000, 1, 25).unwrap()),
                Value::Float(8.2)
            ]
        );
    }

    #[test]
    fn test_dates_non_decreasing() {
        let range = eurnok_sheet(&["2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"], &[11.2, 11.3, 11.25, 11.4]);
        let table = reshape_eurnok(&range).unwrap();
        let dates: Vec<NaiveDate> = table.column("Date").unwrap().filter_map(Value::as_date).collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_wrong_offset_is_layout_error() {
        // One extra metadata row pushes a third row into the block
        let mut rows: Vec<Vec<Data>> = (0..EURNOK_SKIP_ROWS - 1)
            .map(|i| vec![s(&format!("meta {i}"))])
            .collect();
        rows.push(vec![s("Series"), s("EUR")]);
        rows.push(vec![s("Unit"), s("NOK")]);
        rows.push(vec![s("2000-01-24"), s("2000-01-25")]);
        rows.push(vec![Data::Float(8.1), Data::Float(8.2)]);
        let err = reshape_eurnok(&grid(rows)).unwrap_err();
        assert_eq!(err.stage(), Stage::Layout);
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        let range = eurnok_sheet(&["2000-01-24", "24.01.2000"], &[8.1, 8.2]);
        let err = reshape_eurnok(&range).unwrap_err();
        match err {
            LoadError::InvalidDate { dataset, value, .. } => {
                assert_eq!(dataset, Dataset::EurNok);
                assert_eq!(value, "24.01.2000");
            }
            other => panic!("Expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn test_undated_record_sorts_last() {
        let mut rows: Vec<Vec<Data>> = (0..EURNOK_SKIP_ROWS)
            .map(|i| vec![s(&format!("meta {i}"))])
            .collect();
        rows.push(vec![s("2024-01-02"), Data::Empty, s("2024-01-03")]);
        rows.push(vec![Data::Int(1), Data::Int(2), Data::Int(3)]);
        let table = reshape_eurnok(&grid(rows)).unwrap();

        assert_eq!(table.len(), 3);
        let rates: Vec<i64> = table.column("EURNOK_Daily").unwrap().filter_map(Value::as_i64).collect();
        assert_eq!(rates, vec![1, 3, 2]);
        assert_eq!(table.value(2, "Date"), Some(&Value::Empty));
    }
}
