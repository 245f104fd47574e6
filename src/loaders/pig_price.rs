/// German pig price
use calamine::{Data, Range};

use crate::dataset::Dataset;
use crate::load_error::LoadError;
use crate::table::{Table, Value};
use crate::utils::parse_date_generic;
use crate::workbook::headered_table;

/// Title row above the header
pub const PIG_PRICE_SKIP_ROWS: usize = 1;

pub const PIG_PRICE_COLUMNS: [&str; 2] = ["Date", "Price"];

const DATASET: Dataset = Dataset::PigPrice;

pub fn reshape_pig_price(range: &Range<Data>) -> Result<Table, LoadError> {
    let mut table = headered_table(range, PIG_PRICE_SKIP_ROWS);
    table
        .set_columns(&PIG_PRICE_COLUMNS)
        .map_err(|e| LoadError::from_table(DATASET, e))?;

    table.map_column(0, |row, cell| {
        parse_date_generic(cell)
            .map(|d| d.map(Value::Date).unwrap_or_default())
            .map_err(|value| LoadError::InvalidDate {
                dataset: DATASET,
                row,
                value,
            })
    })?;

    table.sort_rows_by_key(|row| (row[0].is_empty(), row[0].as_date()));
    Ok(table)
}
