pub mod batch;
pub mod config;
pub mod dataset;
pub mod load_error;
pub mod loaders;
pub mod table;
pub mod utils;
pub mod workbook;
