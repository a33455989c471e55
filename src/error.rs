use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinanceAdvisorError {
    #[error("Insufficient data: need at least {required} month(s), got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid window size {0}: must be at least 1")]
    InvalidWindow(usize),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Series length mismatch: {left} expense month(s) vs {right} investment month(s)")]
    SeriesLengthMismatch { left: usize, right: usize },

    #[error("Missing column '{column}' in {table} table")]
    MissingColumn { table: String, column: String },

    #[error("Invalid value '{value}' in row {row}, column '{column}'")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Months out of chronological order: '{previous}' is followed by '{next}'")]
    OutOfOrder { previous: String, next: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "llm")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "llm")]
    #[error("Advice generation failed: {0}")]
    AdviceGeneration(String),

    #[cfg(feature = "llm")]
    #[error("Missing API key: set {0}")]
    MissingApiKey(String),
}

pub type Result<T> = std::result::Result<T, FinanceAdvisorError>;
