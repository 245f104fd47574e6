use calamine::Reader;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument};

use crate::config::DataPaths;
use crate::dataset::Dataset;
use crate::load_error::LoadError;
use crate::loaders::biomass::{reshape_biomass, BIOMASS_SHEET};
use crate::loaders::cpi::{reshape_cpi, CpiFrequency};
use crate::loaders::escapes::reshape_escapes;
use crate::loaders::eurnok::reshape_eurnok;
use crate::loaders::fish_pool::reshape_fish_pool;
use crate::loaders::pig_price::reshape_pig_price;
use crate::loaders::ssb_export::reshape_ssb_export;
use crate::table::Table;
use crate::workbook;

/// Loads each source workbook and returns its cleaned table
///
/// Every call reads the file again; nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    paths: DataPaths,
}

impl DataLoader {
    pub fn new(paths: DataPaths) -> Self {
        Self { paths }
    }

    pub fn from_env() -> Self {
        Self::new(DataPaths::from_env())
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    /// Load any logical dataset
    pub fn load(&self, dataset: Dataset) -> Result<Table, LoadError> {
        match dataset {
            Dataset::FishPool => self.load_fish_pool_data(),
            Dataset::CpiAnnual => self.load_cpi_data(CpiFrequency::Annual),
            Dataset::CpiMonthly => self.load_cpi_data(CpiFrequency::Monthly),
            Dataset::EurNok => self.load_eurnok_data(),
            Dataset::SsbExport => self.load_ssb_price_data(),
            Dataset::Escapes => self.load_escapes_data(),
            Dataset::Biomass => self.load_biomass_data(),
            Dataset::PigPrice => self.load_pig_price_data(),
        }
    }

    /// Weekly salmon price per kg in NOK and EUR, all sheets combined
    #[instrument(skip(self))]
    pub fn load_fish_pool_data(&self) -> Result<Table, LoadError> {
        let dataset = Dataset::FishPool;
        let start = Instant::now();
        let mut wb = workbook::open(dataset, self.path(dataset))?;

        let sheet_names = wb.sheet_names();
        debug!("Found {} sheets", sheet_names.len());

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let range = workbook::worksheet(&mut wb, dataset, &name)?;
            sheets.push((name, range));
        }

        finish(dataset, start, reshape_fish_pool(sheets))
    }

    /// Monthly or annual CPI
    #[instrument(skip(self))]
    pub fn load_cpi_data(&self, frequency: CpiFrequency) -> Result<Table, LoadError> {
        let dataset = frequency.dataset();
        let start = Instant::now();
        let mut wb = workbook::open(dataset, self.path(dataset))?;
        let range = workbook::first_worksheet(&mut wb, dataset)?;
        finish(dataset, start, reshape_cpi(&range, frequency))
    }

    /// Daily EURNOK spot rate
    #[instrument(skip(self))]
    pub fn load_eurnok_data(&self) -> Result<Table, LoadError> {
        let dataset = Dataset::EurNok;
        let start = Instant::now();
        let mut wb = workbook::open(dataset, self.path(dataset))?;
        let range = workbook::first_worksheet(&mut wb, dataset)?;
        finish(dataset, start, reshape_eurnok(&range))
    }

    /// Weekly exported salmon tons and NOK/kg
    #[instrument(skip(self))]
    pub fn load_ssb_price_data(&self) -> Result<Table, LoadError> {
        let dataset = Dataset::SsbExport;
        let start = Instant::now();
        let mut wb = workbook::open(dataset, self.path(dataset))?;
        let range = workbook::first_worksheet(&mut wb, dataset)?;
        finish(dataset, start, reshape_ssb_export(&range))
    }

    /// Reported salmon escape incidents, oldest first
    #[instrument(skip(self))]
    pub fn load_escapes_data(&self) -> Result<Table, LoadError> {
        let dataset = Dataset::Escapes;
        let start = Instant::now();
        let mut wb = workbook::open(dataset, self.path(dataset))?;
        let range = workbook::first_worksheet(&mut wb, dataset)?;
        finish(dataset, start, reshape_escapes(&range))
    }

    /// Monthly salmon stock, biomass, feed, harvest and losses per production area
    #[instrument(skip(self))]
    pub fn load_biomass_data(&self) -> Result<Table, LoadError> {
        let dataset = Dataset::Biomass;
        let start = Instant::now();
        let mut wb = workbook::open(dataset, self.path(dataset))?;
        let range = workbook::worksheet(&mut wb, dataset, BIOMASS_SHEET)?;
        finish(dataset, start, reshape_biomass(&range))
    }

    /// Weekly German pig price, oldest first
    #[instrument(skip(self))]
    pub fn load_pig_price_data(&self) -> Result<Table, LoadError> {
        let dataset = Dataset::PigPrice;
        let start = Instant::now();
        let mut wb = workbook::open(dataset, self.path(dataset))?;
        let range = workbook::first_worksheet(&mut wb, dataset)?;
        finish(dataset, start, reshape_pig_price(&range))
    }

    fn path(&self, dataset: Dataset) -> &Path {
        self.paths.path_for(dataset)
    }
}

fn finish(
    dataset: Dataset,
    start: Instant,
    result: Result<Table, LoadError>,
) -> Result<Table, LoadError> {
    let table = result?;
    info!(
        %dataset,
        rows = table.len(),
        columns = table.width(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Loaded dataset"
    );
    Ok(table)
}
