/// Directorate of Fisheries monthly biomass per production area
///
/// Headers in the source sheet carry a leading space (except `ÅR`); they are matched
/// exactly as written.
use calamine::{Data, Range};
use tracing::debug;

use crate::dataset::Dataset;
use crate::load_error::LoadError;
use crate::table::{Table, Value};
use crate::workbook::headered_table;

pub const BIOMASS_SHEET: &str = "Biomasse-prod-omr";

/// Title rows above the header
pub const BIOMASS_SKIP_ROWS: usize = 5;

/// Source header to output column, in output order
pub const BIOMASS_COLUMNS: [(&str, &str); 15] = [
    ("ÅR", "Year"),
    (" MÅNED_KODE", "Month"),
    (" PO_KODE", "Prod_Area_Code"),
    (" PO_NAVN", "Prod_Area_Name"),
    (" ARTSID", "Species"),
    (" BEHFISK_STK", "Fish_Stock"),
    (" BIOMASSE_KG", "Biomass_Kg"),
    (" UTSETT_SMOLT_STK", "Smolt_Stock"),
    (" FORFORBRUK_KG", "Feed_Kg"),
    (" UTTAK_KG", "Harvest_Kg"),
    (" UTTAK_STK", "Harvest_N"),
    (" DØDFISK_STK", "Mortality_N"),
    (" UTKAST_STK", "Discard_N"),
    (" RØMMING_STK", "Escape_N"),
    (" ANDRE_STK", "Other_Loss_N"),
];

pub const BIOMASS_SPECIES: &str = "LAKS";

const DATASET: Dataset = Dataset::Biomass;

pub fn reshape_biomass(range: &Range<Data>) -> Result<Table, LoadError> {
    let to_load_error = |e| LoadError::from_table(DATASET, e);

    let source: Vec<&str> = BIOMASS_COLUMNS.iter().map(|(from, _)| *from).collect();
    let mut table = headered_table(range, BIOMASS_SKIP_ROWS)
        .select(&source)
        .map_err(to_load_error)?;

    let target: Vec<&str> = BIOMASS_COLUMNS.iter().map(|(_, to)| *to).collect();
    table.set_columns(&target).map_err(to_load_error)?;

    let total = table.len();
    let table = table
        .filter_eq("Species", &Value::text(BIOMASS_SPECIES))
        .map_err(to_load_error)?;
    debug!(total, salmon = table.len(), "Filtered biomass to salmon");

    Ok(table)
}
