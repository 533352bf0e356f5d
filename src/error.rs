use thiserror::Error;

use crate::domain::SeatStatus;

#[derive(Error, Debug)]
pub enum SeatLayoutError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Seat source returned HTTP {status} for {url}")]
    Upstream { status: u16, url: String },

    #[error("Seat source is temporarily unavailable")]
    CircuitOpen,

    #[error("Invalid seat number: {0}")]
    InvalidSeatNumber(String),

    #[error("Seat {seat} is not available (currently {status})")]
    SeatNotAvailable { seat: u32, status: SeatStatus },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, SeatLayoutError>;
