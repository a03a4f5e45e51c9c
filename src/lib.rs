pub mod calendar;
pub mod cli;
pub mod csv_store;
pub mod error;
pub mod jobs;
pub mod logging;
pub mod merger;
pub mod models;
pub mod scraper;
pub mod similarity;

pub use error::{EventsError, Result};
pub use models::{Config, CsvEventRow, EventRecord};
