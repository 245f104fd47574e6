// Dataset loaders
//
// Each submodule owns one source file layout: its constant schema descriptors and a pure
// `reshape_*` function over already-read sheets. `DataLoader` does the file reads.

pub mod biomass;
pub mod cpi;
pub mod data_loader;
pub mod escapes;
pub mod eurnok;
pub mod fish_pool;
pub mod pig_price;
pub mod ssb_export;

// Re-export commonly used items
pub use cpi::CpiFrequency;
pub use data_loader::DataLoader;

use crate::dataset::Dataset;

/// Every source-to-output column rename, per dataset
pub fn rename_maps() -> Vec<(Dataset, &'static [(&'static str, &'static str)])> {
    vec![
        (Dataset::FishPool, &fish_pool::FISH_POOL_COLUMNS),
        (Dataset::Escapes, &escapes::ESCAPES_COLUMNS),
        (Dataset::Biomass, &biomass::BIOMASS_COLUMNS),
    ]
}
