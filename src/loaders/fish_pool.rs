/// Fish Pool Index weekly salmon price
///
/// The workbook holds one sheet per period, newest first. Each sheet has a title row,
/// then a header row with at least `Year`, `Week`, `Month` (full English month name),
/// `NOK/kg` and `EUR/kg`.
use calamine::{Data, Range};
use tracing::debug;

use crate::dataset::Dataset;
use crate::load_error::LoadError;
use crate::table::{Table, Value};
use crate::utils::month_from_name;
use crate::workbook::headered_table;

/// Rows above the header on every sheet
pub const FISH_POOL_SKIP_ROWS: usize = 1;

pub const FISH_POOL_MONTH_COLUMN: &str = "Month";

pub const FISH_POOL_COLUMNS: [(&str, &str); 2] = [("NOK/kg", "NOK_kg"), ("EUR/kg", "EUR_kg")];

const DATASET: Dataset = Dataset::FishPool;

/// Combine the per-sheet ranges, given in workbook order, into one price table
///
/// Sheets are stacked in reverse workbook order, each keeping its own row order.
pub fn reshape_fish_pool(sheets: Vec<(String, Range<Data>)>) -> Result<Table, LoadError> {
    if sheets.is_empty() {
        return Err(LoadError::NoSheets { dataset: DATASET });
    }

    let parts = sheets
        .iter()
        .rev()
        .map(|(name, range)| {
            let part = headered_table(range, FISH_POOL_SKIP_ROWS);
            debug!(sheet = %name, rows = part.len(), "Read Fish Pool sheet");
            // Every sheet needs its own Month column; concat would pad a missing one
            if part.column_index(FISH_POOL_MONTH_COLUMN).is_err() {
                return Err(LoadError::SheetMissingColumn {
                    dataset: DATASET,
                    sheet: name.clone(),
                    column: FISH_POOL_MONTH_COLUMN.to_string(),
                });
            }
            Ok(part)
        })
        .collect::<Result<Vec<Table>, LoadError>>()?;

    let mut table = Table::concat(parts);

    let month_idx = table
        .column_index(FISH_POOL_MONTH_COLUMN)
        .map_err(|e| LoadError::from_table(DATASET, e))?;
    table.map_column(month_idx, month_number)?;

    table
        .rename(&FISH_POOL_COLUMNS)
        .map_err(|e| LoadError::from_table(DATASET, e))?;

    Ok(table)
}

fn month_number(row: usize, cell: &Value) -> Result<Value, LoadError> {
    match cell {
        Value::Empty => Ok(Value::Empty),
        Value::Text(name) => month_from_name(name)
            .map(|m| Value::Int(i64::from(m)))
            .ok_or_else(|| LoadError::InvalidData {
                dataset: DATASET,
                row,
                column: FISH_POOL_MONTH_COLUMN.to_string(),
                msg: format!("unrecognized month name '{name}'"),
            }),
        other => Err(LoadError::InvalidData {
            dataset: DATASET,
            row,
            column: FISH_POOL_MONTH_COLUMN.to_string(),
            msg: format!("expected a month name, got '{other}'"),
        }),
    }
}
