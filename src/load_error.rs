use crate::dataset::Dataset;
use crate::table::TableError;

/// Which step of a load failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Workbook missing or unreadable
    Read,
    /// Expected sheet, column or offset not found
    Layout,
    /// A cell did not match its expected format
    Parse,
    /// The caller passed an unrecognized selector
    Argument,
    /// A background load task died
    Task,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{dataset}: failed to open workbook {path}: {msg}")]
    WorkbookOpen {
        dataset: Dataset,
        path: String,
        msg: String,
    },

    #[error("{dataset}: sheet not found: {sheet}")]
    SheetNotFound { dataset: Dataset, sheet: String },

    #[error("{dataset}: workbook has no sheets")]
    NoSheets { dataset: Dataset },

    #[error("{dataset}: missing column: {column}")]
    MissingColumn { dataset: Dataset, column: String },

    #[error("{dataset}: sheet {sheet} is missing column: {column}")]
    SheetMissingColumn {
        dataset: Dataset,
        sheet: String,
        column: String,
    },

    #[error("{dataset}: layout mismatch: {msg}")]
    Layout { dataset: Dataset, msg: String },

    #[error("{dataset}: invalid data at row {row}, column {column}: {msg}")]
    InvalidData {
        dataset: Dataset,
        row: usize,
        column: String,
        msg: String,
    },

    #[error("{dataset}: invalid date at row {row}: {value}")]
    InvalidDate {
        dataset: Dataset,
        row: usize,
        value: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{dataset}: load task failed: {msg}")]
    Task { dataset: Dataset, msg: String },
}

impl LoadError {
    /// Attach a dataset to a table-level failure
    pub fn from_table(dataset: Dataset, err: TableError) -> Self {
        match err {
            TableError::MissingColumn(column) => LoadError::MissingColumn { dataset, column },
            other => LoadError::Layout {
                dataset,
                msg: other.to_string(),
            },
        }
    }

    pub fn layout(dataset: Dataset, msg: impl Into<String>) -> Self {
        LoadError::Layout {
            dataset,
            msg: msg.into(),
        }
    }

    pub fn dataset(&self) -> Option<Dataset> {
        match self {
            LoadError::WorkbookOpen { dataset, .. }
            | LoadError::SheetNotFound { dataset, .. }
            | LoadError::NoSheets { dataset }
            | LoadError::MissingColumn { dataset, .. }
            | LoadError::SheetMissingColumn { dataset, .. }
            | LoadError::Layout { dataset, .. }
            | LoadError::InvalidData { dataset, .. }
            | LoadError::InvalidDate { dataset, .. }
            | LoadError::Task { dataset, .. } => Some(*dataset),
            LoadError::InvalidArgument(_) => None,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            LoadError::WorkbookOpen { .. } => Stage::Read,
            LoadError::SheetNotFound { .. }
            | LoadError::NoSheets { .. }
            | LoadError::MissingColumn { .. }
            | LoadError::SheetMissingColumn { .. }
            | LoadError::Layout { .. } => Stage::Layout,
            LoadError::InvalidData { .. } | LoadError::InvalidDate { .. } => Stage::Parse,
            LoadError::InvalidArgument(_) => Stage::Argument,
            LoadError::Task { .. } => Stage::Task,
        }
    }
}
