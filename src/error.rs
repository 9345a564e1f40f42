use crate::schema::ViewMode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PivotError {
    #[error("No months selected for {view} view: at least one month is required")]
    EmptySelection { view: ViewMode },

    #[error("Unknown view mode '{0}': expected one of single, quarterly, mty-all, comparison")]
    UnknownViewMode(String),

    #[error("Unknown month '{0}': expected a three-letter fiscal month such as Apr or Jan")]
    UnknownMonth(String),

    #[error("Invalid month range {start}..{end}: fiscal year has 12 months")]
    InvalidMonthRange { start: usize, end: usize },

    #[error("Label key '{0}' collides with a value column key")]
    ReservedLabelKey(String),

    #[error("Invalid record #{index}: {details}")]
    InvalidRecord { index: usize, details: String },

    #[error("Invalid fiscal year: {0}")]
    InvalidFiscalYear(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export error: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, PivotError>;
