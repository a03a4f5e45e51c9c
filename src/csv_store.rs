//! Reading and writing the two CSV shapes used by the calendar.
//!
//! The published file starts with a banner of link/branding lines, then the
//! column header, then one row per event. The intermediate file produced by
//! the extractor has neither banner nor header. In both, the Month column is
//! only filled on the first row of each month.

use crate::calendar::{MonthRunDecoder, MonthRunEncoder};
use crate::error::{EventsError, Result};
use crate::models::{sort_rows, CsvEventRow};
use csv::{ReaderBuilder, StringRecord, Writer, WriterBuilder};
use std::fs;
use std::path::Path;

/// Lines before the header row in a published file.
pub const PUBLISHED_PREAMBLE_LINES: usize = 5;

/// Banner placeholder that appears in the Event column of the preamble.
const PLACEHOLDER_EVENT: &str = "Cerebral Valley";
const SUBMIT_PREFIX: &str = "Submit an event";

const BANNER: [&str; 6] = [
    "u,,,,,",
    ",Submit an event! ,Cerebral Valley,,,",
    ",,Join our Slack Community,,,",
    ",📧 Subscribe to the Events Newsletter,New York,London,Seattle,",
    ",📧 DM Cerebral Valley on Twitter,Click to see 2025 Hackathons!,,Boston,",
    ",🐛 Submit issue: github.com/mikezucc/calendar-valley,,,,",
];

pub fn default_banner() -> Vec<String> {
    BANNER.iter().map(|line| line.to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvDialect {
    /// Banner lines, then a header row, then events.
    Published { preamble_lines: usize },
    /// Six positional columns, no header.
    Intermediate,
}

impl CsvDialect {
    pub const PUBLISHED: CsvDialect = CsvDialect::Published {
        preamble_lines: PUBLISHED_PREAMBLE_LINES,
    };
}

/// Column index of each named field within a record.
struct ColumnMap([Option<usize>; 6]);

impl ColumnMap {
    fn positional() -> Self {
        Self([Some(0), Some(1), Some(2), Some(3), Some(4), Some(5)])
    }

    fn from_header(header: &StringRecord) -> Self {
        let mut columns = [None; 6];
        for (slot, name) in columns.iter_mut().zip(CsvEventRow::HEADERS) {
            *slot = header.iter().position(|h| h.trim() == name);
        }
        Self(columns)
    }

    fn row(&self, record: &StringRecord) -> CsvEventRow {
        let get = |i: usize| {
            self.0[i]
                .and_then(|idx| record.get(idx))
                .unwrap_or_default()
                .to_string()
        };
        CsvEventRow {
            month: get(0),
            event: get(1),
            date: get(2),
            time: get(3),
            location: get(4),
            link: get(5),
        }
    }
}

/// A header names both the Month and Event columns, in any position.
fn is_header_record(record: &StringRecord) -> bool {
    let has = |name: &str| record.iter().any(|cell| cell.trim() == name);
    has("Month") && has("Event")
}

/// Banner and footer artefacts that show up in the Event column.
fn is_non_event(event: &str) -> bool {
    let trimmed = event.trim();
    trimmed.is_empty() || trimmed == PLACEHOLDER_EVENT || event.starts_with(SUBMIT_PREFIX)
}

fn skip_lines(content: &str, count: usize) -> &str {
    let mut rest = content;
    for _ in 0..count {
        match rest.find('\n') {
            Some(i) => rest = &rest[i + 1..],
            None => return "",
        }
    }
    rest
}

/// Reads events from `path`. A missing file is logged and yields no events.
pub fn read_events(path: &Path, dialect: CsvDialect) -> Result<Vec<CsvEventRow>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "events file not found");
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path).map_err(|source| EventsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_events(&content, dialect)
}

pub fn parse_events(content: &str, dialect: CsvDialect) -> Result<Vec<CsvEventRow>> {
    let body = match dialect {
        CsvDialect::Published { preamble_lines } => skip_lines(content, preamble_lines),
        CsvDialect::Intermediate => content,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());
    let records = reader
        .records()
        .collect::<std::result::Result<Vec<StringRecord>, csv::Error>>()?;

    // Published files may carry more banner lines than the fixed preamble;
    // everything up to the header row is skipped.
    let (columns, data) = match dialect {
        CsvDialect::Published { .. } => match records.iter().position(is_header_record) {
            Some(idx) => (ColumnMap::from_header(&records[idx]), &records[idx + 1..]),
            None => (ColumnMap::positional(), &records[..]),
        },
        CsvDialect::Intermediate => (ColumnMap::positional(), &records[..]),
    };

    let mut months = MonthRunDecoder::new();
    let mut events = Vec::with_capacity(data.len());
    for record in data {
        let mut row = columns.row(record);
        row.month = months.resolve(&row.month);
        if is_non_event(&row.event) {
            tracing::debug!(event = %row.event, "skipping non-event row");
            continue;
        }
        events.push(row);
    }

    Ok(events)
}

fn write_rows<W: std::io::Write>(writer: &mut Writer<W>, rows: &[CsvEventRow]) -> Result<()> {
    let mut months = MonthRunEncoder::new();
    for row in rows {
        let display_month = months.display(&row.month);
        writer.write_record(row.to_record(&display_month))?;
    }
    Ok(())
}

fn finish(writer: Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| EventsError::Csv(e.into_error().into()))
}

/// Banner, header, then `rows` sorted by date with months shown once per run.
pub fn render_published(banner: &[String], rows: &[CsvEventRow]) -> Result<Vec<u8>> {
    let mut sorted = rows.to_vec();
    sort_rows(&mut sorted);

    let mut out = Vec::new();
    for line in banner {
        out.extend_from_slice(line.as_bytes());
        out.push(b'\n');
    }

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(CsvEventRow::HEADERS)?;
    write_rows(&mut writer, &sorted)?;
    finish(writer)
}

/// Rows exactly as given, without header or banner.
pub fn render_intermediate(rows: &[CsvEventRow]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    for row in rows {
        writer.write_record(row.to_record(&row.month))?;
    }
    finish(writer)
}

pub fn write_published(path: &Path, banner: &[String], rows: &[CsvEventRow]) -> Result<()> {
    write_file(path, &render_published(banner, rows)?)
}

pub fn write_intermediate(path: &Path, rows: &[CsvEventRow]) -> Result<()> {
    write_file(path, &render_intermediate(rows)?)
}

/// Creates an empty published file (banner and header only) if none exists.
/// Returns whether a file was created.
pub fn ensure_published(path: &Path, banner: &[String]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    write_published(path, banner, &[])?;
    Ok(true)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let to_write_error = |source: std::io::Error| EventsError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_write_error)?;
    }
    fs::write(path, contents).map_err(to_write_error)
}
