/// Directorate of Fisheries reported escape incidents
use calamine::{Data, Range};
use tracing::debug;

use crate::dataset::Dataset;
use crate::load_error::LoadError;
use crate::table::{Table, Value};
use crate::utils::parse_date_with_format;
use crate::workbook::headered_table;

/// Source header to output column, in output order
pub const ESCAPES_COLUMNS: [(&str, &str); 10] = [
    ("Dato", "Date"),
    ("Lokalitets- navn", "Site_Name"),
    ("Lokalitets- nummer", "Site_Number"),
    ("Fylke", "County"),
    ("Selskap", "Company"),
    ("Art", "Species"),
    ("Rømmings- estimat", "Est_Num_Escaped"),
    ("Rapportert rømt", "Rep_Escaped"),
    ("Snittvekt (gram)", "Avg_Wt_Grams"),
    ("Gjenfangst", "Recapture"),
];

pub const ESCAPES_DATE_FORMAT: &str = "%m/%d/%Y";

/// Atlantic salmon
pub const ESCAPES_SPECIES: &str = "Laks";

const DATASET: Dataset = Dataset::Escapes;

pub fn reshape_escapes(range: &Range<Data>) -> Result<Table, LoadError> {
    let to_load_error = |e| LoadError::from_table(DATASET, e);

    let source: Vec<&str> = ESCAPES_COLUMNS.iter().map(|(from, _)| *from).collect();
    let mut table = headered_table(range, 0)
        .select(&source)
        .map_err(to_load_error)?;

    table.map_column(0, |row, cell| {
        parse_date_with_format(cell, ESCAPES_DATE_FORMAT)
            .map(|d| d.map(Value::Date).unwrap_or_default())
            .map_err(|value| LoadError::InvalidDate {
                dataset: DATASET,
                row,
                value,
            })
    })?;

    // Undated incidents sort last
    table.sort_rows_by_key(|row| (row[0].is_empty(), row[0].as_date()));

    let target: Vec<&str> = ESCAPES_COLUMNS.iter().map(|(_, to)| *to).collect();
    table.set_columns(&target).map_err(to_load_error)?;

    let total = table.len();
    let table = table
        .filter_eq("Species", &Value::text(ESCAPES_SPECIES))
        .map_err(to_load_error)?;
    debug!(total, salmon = table.len(), "Filtered escapes to salmon");

    Ok(table)
}
