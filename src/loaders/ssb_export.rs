/// SSB weekly salmon export volume and price
///
/// Header-less sheet: three title rows, then one row per week with the period code in
/// column B (`YYYY?WW`, e.g. `2000U01`), exported tons in C and NOK/kg in D. Footnotes may
/// follow in column A only.
use calamine::{Data, Range};
use chrono::Datelike;
use tracing::debug;

use crate::dataset::Dataset;
use crate::load_error::LoadError;
use crate::table::{Table, Value};
use crate::utils::monday_of_week;
use crate::workbook::sheet_rows;

/// First data row among the sheet's non-blank rows
pub const SSB_FIRST_DATA_ROW: usize = 3;

/// First data column (column B)
pub const SSB_FIRST_DATA_COLUMN: usize = 1;

pub const SSB_RAW_COLUMNS: [&str; 3] = ["Date", "Exported_Tons", "NOK_kg"];

pub const SSB_EXPORT_COLUMNS: [&str; 5] = ["Year", "Week", "Month", "Exported_Tons", "NOK_kg"];

const DATASET: Dataset = Dataset::SsbExport;

pub fn reshape_ssb_export(range: &Range<Data>) -> Result<Table, LoadError> {
    let block: Vec<Vec<Value>> = sheet_rows(range, 0)
        .into_iter()
        .skip(SSB_FIRST_DATA_ROW)
        .map(|row| row.into_iter().skip(SSB_FIRST_DATA_COLUMN).collect())
        .collect();

    // Trailing rows with nothing from column B onward are footnotes
    let last = block
        .iter()
        .rposition(|row: &Vec<Value>| row.iter().any(|v| !v.is_empty()));
    let block = match last {
        Some(idx) => &block[..=idx],
        None => &block[..0],
    };
    debug!(rows = block.len(), "Sliced SSB export block");

    let mut table =
        Table::new(SSB_EXPORT_COLUMNS).map_err(|e| LoadError::from_table(DATASET, e))?;

    for (row_idx, row) in block.iter().enumerate() {
        let [period, tons, price] = row.as_slice() else {
            return Err(LoadError::layout(
                DATASET,
                format!(
                    "expected {} columns from column B, found {}",
                    SSB_RAW_COLUMNS.len(),
                    row.len()
                ),
            ));
        };
        let (year, week, month) = split_period(row_idx, period)?;
        table
            .push_row(vec![
                Value::Int(i64::from(year)),
                Value::Int(i64::from(week)),
                Value::Int(i64::from(month)),
                tons.clone(),
                price.clone(),
            ])
            .map_err(|e| LoadError::from_table(DATASET, e))?;
    }

    table.sort_rows_by_key(|row| (row[0].as_i64(), row[1].as_i64()));
    Ok(table)
}

/// Split a `YYYY?WW` period code into year, week and the month of that week's Monday
///
/// Year is the first four characters and week everything from the sixth character on;
/// the separator character is not checked.
pub fn split_period(row: usize, period: &Value) -> Result<(i32, u32, u32), LoadError> {
    let text = period.to_string();
    let invalid = |msg: String| LoadError::InvalidData {
        dataset: DATASET,
        row,
        column: SSB_RAW_COLUMNS[0].to_string(),
        msg,
    };

    let year = text
        .get(..4)
        .and_then(|s| s.parse::<i32>().ok())
        .ok_or_else(|| invalid(format!("cannot read a year from '{text}'")))?;
    let week = text
        .get(5..)
        .and_then(|s| s.trim().parse::<u32>().ok())
        .ok_or_else(|| invalid(format!("cannot read a week from '{text}'")))?;
    let monday = monday_of_week(year, week).ok_or_else(|| LoadError::InvalidDate {
        dataset: DATASET,
        row,
        value: text.clone(),
    })?;

    Ok((year, week, monday.month()))
}
