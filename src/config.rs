use std::env;
use std::path::{Path, PathBuf};

use crate::dataset::Dataset;

pub const DEFAULT_DATA_DIR: &str = "Data";

pub const FISH_POOL_FILE_NAME: &str = "Fish_Pool_Data.xls";
pub const CPI_FILE_NAME: &str = "Consumer_Price_Index_Data.xlsx";
pub const EURNOK_FILE_NAME: &str = "EURNOK_Data.xlsx";
pub const SSB_PRICE_FILE_NAME: &str = "SSB_Price_Data.xlsx";
pub const ESCAPES_FILE_NAME: &str = "Escapes_Data.xlsx";
pub const BIOMASS_FILE_NAME: &str = "Biomass_Data.xlsx";
pub const PIG_PRICE_FILE_NAME: &str = "German_Pig_Price_Data.xlsx";

/// Where each source workbook lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub fish_pool: PathBuf,
    pub cpi: PathBuf,
    pub eurnok: PathBuf,
    pub ssb_price: PathBuf,
    pub escapes: PathBuf,
    pub biomass: PathBuf,
    pub pig_price: PathBuf,
}

impl DataPaths {
    /// The standard file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            fish_pool: dir.join(FISH_POOL_FILE_NAME),
            cpi: dir.join(CPI_FILE_NAME),
            eurnok: dir.join(EURNOK_FILE_NAME),
            ssb_price: dir.join(SSB_PRICE_FILE_NAME),
            escapes: dir.join(ESCAPES_FILE_NAME),
            biomass: dir.join(BIOMASS_FILE_NAME),
            pig_price: dir.join(PIG_PRICE_FILE_NAME),
        }
    }

    /// Read `DATA_DIR` plus optional per-file overrides from the environment
    pub fn from_env() -> Self {
        let dir = env::var("DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        let defaults = Self::in_dir(&dir);

        let path_or = |var: &str, default: PathBuf| -> PathBuf {
            env::var(var).map(PathBuf::from).unwrap_or(default)
        };

        Self {
            fish_pool: path_or("FISH_POOL_FILE", defaults.fish_pool),
            cpi: path_or("CPI_FILE", defaults.cpi),
            eurnok: path_or("EURNOK_FILE", defaults.eurnok),
            ssb_price: path_or("SSB_PRICE_FILE", defaults.ssb_price),
            escapes: path_or("ESCAPES_FILE", defaults.escapes),
            biomass: path_or("BIOMASS_FILE", defaults.biomass),
            pig_price: path_or("PIG_PRICE_FILE", defaults.pig_price),
        }
    }

    pub fn path_for(&self, dataset: Dataset) -> &Path {
        match dataset {
            Dataset::FishPool => &self.fish_pool,
            Dataset::CpiAnnual | Dataset::CpiMonthly => &self.cpi,
            Dataset::EurNok => &self.eurnok,
            Dataset::SsbExport => &self.ssb_price,
            Dataset::Escapes => &self.escapes,
            Dataset::Biomass => &self.biomass,
            Dataset::PigPrice => &self.pig_price,
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}
