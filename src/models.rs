use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::calendar::{expand_month, month_number, row_sort_key, SortKey};
use crate::csv_store::default_banner;
use crate::error::{EventsError, Result};
use crate::scraper::ExtractionRules;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub html_source: PathBuf,
    pub intermediate_csv: PathBuf,
    pub published_csv: PathBuf,
    pub attribution_marker: String,
    pub default_city: String,
    pub banner: Vec<String>,
    pub extraction: ExtractionRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            html_source: PathBuf::from("fullloadssrscrape.html"),
            intermediate_csv: PathBuf::from("scripts/tech_week_events.csv"),
            published_csv: PathBuf::from("public/events.csv"),
            attribution_marker: "[Tech Week]".to_string(),
            default_city: "San Francisco, CA".to_string(),
            banner: default_banner(),
            extraction: ExtractionRules::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(file_path).map_err(|source| EventsError::Read {
            path: file_path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| EventsError::Config {
            path: file_path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn save_to_file(&self, file_path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| EventsError::Config {
            path: file_path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(file_path, content).map_err(|source| EventsError::Write {
            path: file_path.to_path_buf(),
            source,
        })
    }

    /// Load `file_path` if it exists, otherwise fall back to the built-in defaults.
    pub fn load_or_default(file_path: &Path) -> Result<Self> {
        if file_path.exists() {
            Self::load_from_file(file_path)
        } else {
            tracing::debug!(path = %file_path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}

/// One event as scraped from a listing card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    pub hosts: String,
    /// Month token as found on the page, usually an abbreviation like `"Mar"`.
    pub month: Option<String>,
    pub day: Option<u32>,
    pub time: String,
    pub location: String,
    pub url: String,
    pub sponsored: bool,
}

impl EventRecord {
    pub fn new(default_location: &str) -> Self {
        Self {
            name: String::new(),
            hosts: String::new(),
            month: None,
            day: None,
            time: String::new(),
            location: default_location.to_string(),
            url: String::new(),
            sponsored: false,
        }
    }

    pub fn full_month(&self) -> String {
        self.month
            .as_deref()
            .map(|m| expand_month(m).to_string())
            .unwrap_or_default()
    }

    /// Display date such as `"March 14"`, empty unless both month and day are known.
    pub fn date(&self) -> String {
        match (&self.month, self.day) {
            (Some(month), Some(day)) => format!("{} {}", expand_month(month), day),
            _ => String::new(),
        }
    }

    pub fn sort_key(&self) -> SortKey {
        (
            self.month.as_deref().and_then(month_number).unwrap_or(1),
            self.day.unwrap_or(1),
        )
    }
}

/// A row of the published calendar and of the intermediate file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvEventRow {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Event")]
    pub event: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Time (PST)")]
    pub time: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Link")]
    pub link: String,
}

impl CsvEventRow {
    pub const HEADERS: [&'static str; 6] =
        ["Month", "Event", "Date", "Time (PST)", "Location", "Link"];

    pub fn sort_key(&self) -> SortKey {
        row_sort_key(&self.month, &self.date)
    }

    pub fn to_record(&self, display_month: &str) -> [String; 6] {
        [
            display_month.to_string(),
            self.event.clone(),
            self.date.clone(),
            self.time.clone(),
            self.location.clone(),
            self.link.clone(),
        ]
    }
}

/// Stable sort of published rows by `(month, day)`.
pub fn sort_rows(rows: &mut [CsvEventRow]) {
    rows.sort_by_key(CsvEventRow::sort_key);
}
