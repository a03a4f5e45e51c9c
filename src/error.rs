use std::path::PathBuf;
use thiserror::Error;

use crate::scraper::EventField;

#[derive(Debug, Error)]
pub enum EventsError {
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid selector `{selector}` for {field:?}: {message}")]
    InvalidSelector {
        field: Option<EventField>,
        selector: String,
        message: String,
    },

    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, EventsError>;
