use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Station '{station}' not found in dataset")]
    StationNotFound { station: String },

    #[error("Unknown weather variable '{0}' (expected TEMP, PRES, DEWP or WSPM)")]
    UnknownVariable(String),

    #[error("Dataset is empty: {0}")]
    EmptyDataset(String),

    #[error("Prompt error: {0}")]
    Prompt(#[from] inquire::InquireError),
}
