use crate::calendar::{is_short_month, MonthRunEncoder};
use crate::error::{EventsError, Result};
use crate::models::{CsvEventRow, EventRecord};
use html_escape::decode_html_entities;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Class the site builder puts on template elements that are not rendered.
pub const INVISIBLE_CLASS: &str = "w-condition-invisible";

/// Date wrapper fragments that never carry date or time information.
const SKIPPED_FRAGMENTS: [&str; 2] = ["·", "Sponsored"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventField {
    Name,
    Hosts,
    Sponsored,
    Schedule,
    Url,
    Neighborhood,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostProcess {
    /// Trimmed text of the first match with leftover HTML entities decoded.
    UnescapedText,
    /// Trimmed text of the first match.
    Text,
    /// `href` attribute of the first match.
    Href,
    /// True when at least one match is not hidden. Hidden template copies
    /// of an element are skipped rather than treated as the answer.
    Visible,
    /// Text of every visible match, in document order.
    Fragments,
}

/// One entry of the extraction ruleset: where a field lives inside an event card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRule {
    pub field: EventField,
    pub selector: String,
    pub post: PostProcess,
}

impl FieldRule {
    fn new(field: EventField, selector: &str, post: PostProcess) -> Self {
        Self {
            field,
            selector: selector.to_string(),
            post,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRules {
    pub container: String,
    pub rules: Vec<FieldRule>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        use EventField::*;
        use PostProcess::*;

        Self {
            container: "div.calendar-events-item".to_string(),
            rules: vec![
                FieldRule::new(Name, r#"[fs-list-field="name"]"#, UnescapedText),
                FieldRule::new(Hosts, r#"[fs-list-field="hosts"]"#, UnescapedText),
                FieldRule::new(Sponsored, "div.calendar-invite-group.sponsored", Visible),
                FieldRule::new(Schedule, "div.date-wrapper div.text-size-12", Fragments),
                FieldRule::new(Url, "a.event-link", Href),
                FieldRule::new(Neighborhood, r#"[fs-list-field="neighborhood"]"#, Text),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldValue {
    Text(String),
    Flag(bool),
    Fragments(Vec<String>),
}

impl FieldValue {
    fn into_text(self) -> String {
        match self {
            FieldValue::Text(text) => text,
            FieldValue::Flag(_) => String::new(),
            FieldValue::Fragments(parts) => parts.join(" "),
        }
    }

    fn as_flag(&self) -> bool {
        match self {
            FieldValue::Text(text) => !text.is_empty(),
            FieldValue::Flag(flag) => *flag,
            FieldValue::Fragments(parts) => !parts.is_empty(),
        }
    }

    fn into_fragments(self) -> Vec<String> {
        match self {
            FieldValue::Text(text) if !text.is_empty() => vec![text],
            FieldValue::Fragments(parts) => parts,
            _ => Vec::new(),
        }
    }
}

struct CompiledRule {
    field: EventField,
    selector: Selector,
    post: PostProcess,
}

/// Month, day and time pulled out of a card's date wrapper.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub month: Option<String>,
    pub day: Option<u32>,
    pub time: Option<String>,
}

pub struct EventScraper {
    container: Selector,
    rules: Vec<CompiledRule>,
    default_city: String,
}

impl EventScraper {
    pub fn new(rules: &ExtractionRules, default_city: &str) -> Result<Self> {
        let container = compile(None, &rules.container)?;
        let rules = rules
            .rules
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    field: rule.field,
                    selector: compile(Some(rule.field), &rule.selector)?,
                    post: rule.post,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            container,
            rules,
            default_city: default_city.to_string(),
        })
    }

    pub fn scrape_file(&self, file_path: &Path) -> Result<Vec<EventRecord>> {
        if !file_path.exists() {
            return Err(EventsError::MissingInput(file_path.to_path_buf()));
        }
        let content = fs::read_to_string(file_path).map_err(|source| EventsError::Read {
            path: file_path.to_path_buf(),
            source,
        })?;

        Ok(self.parse_html_content(&content))
    }

    /// Every event card in `content` that has a name.
    pub fn parse_html_content(&self, content: &str) -> Vec<EventRecord> {
        let document = Html::parse_document(content);
        let items: Vec<_> = document.select(&self.container).collect();
        println!("🔎 Found {} event items in HTML", items.len());

        items
            .into_iter()
            .map(|item| self.parse_event_item(item))
            .filter(|event| !event.name.is_empty())
            .collect()
    }

    fn parse_event_item(&self, item: ElementRef) -> EventRecord {
        let mut event = EventRecord::new(&self.default_city);

        for rule in &self.rules {
            let matches: Vec<ElementRef> = item.select(&rule.selector).collect();
            if matches.is_empty() {
                tracing::debug!(field = ?rule.field, "no element matched");
                continue;
            }
            let value = extract(&matches, rule.post);
            self.apply(&mut event, rule.field, value);
        }

        event
    }

    fn apply(&self, event: &mut EventRecord, field: EventField, value: FieldValue) {
        match field {
            EventField::Name => event.name = value.into_text(),
            EventField::Hosts => event.hosts = value.into_text(),
            EventField::Sponsored => event.sponsored = value.as_flag(),
            EventField::Schedule => {
                let schedule = parse_schedule(&value.into_fragments());
                event.month = schedule.month;
                event.day = schedule.day;
                event.time = schedule.time.unwrap_or_default();
            }
            EventField::Url => event.url = value.into_text(),
            EventField::Neighborhood => {
                let neighborhood = value.into_text();
                if !neighborhood.is_empty() {
                    event.location = format!("{}, {}", neighborhood, self.default_city);
                }
            }
        }
    }
}

fn compile(field: Option<EventField>, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| EventsError::InvalidSelector {
        field,
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

fn extract(matches: &[ElementRef], post: PostProcess) -> FieldValue {
    let first = matches[0];
    match post {
        PostProcess::UnescapedText => {
            FieldValue::Text(decode_html_entities(&stripped_text(first)).trim().to_string())
        }
        PostProcess::Text => FieldValue::Text(stripped_text(first)),
        PostProcess::Href => {
            FieldValue::Text(first.value().attr("href").unwrap_or_default().to_string())
        }
        PostProcess::Visible => FieldValue::Flag(matches.iter().any(|el| !is_invisible(el))),
        PostProcess::Fragments => FieldValue::Fragments(
            matches
                .iter()
                .filter(|el| !is_invisible(el))
                .map(|el| stripped_text(*el))
                .filter(|text| !text.is_empty() && !SKIPPED_FRAGMENTS.contains(&text.as_str()))
                .collect(),
        ),
    }
}

fn is_invisible(element: &ElementRef) -> bool {
    element.value().classes().any(|class| class == INVISIBLE_CLASS)
}

/// Text nodes trimmed individually and joined without separators.
fn stripped_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Reads month, day and time out of date wrapper fragments such as
/// `["Thu", "Mar", "6", "6:00 pm"]`.
///
/// Fewer than three fragments means the wrapper holds no usable date.
/// A time is only kept when a month was found.
pub fn parse_schedule(fragments: &[String]) -> Schedule {
    if fragments.len() < 3 {
        return Schedule::default();
    }

    let mut month = None;
    let mut day = None;
    let mut time = None;

    for (i, text) in fragments.iter().enumerate() {
        if is_short_month(text) {
            month = Some(text.clone());
            if let Some(next) = fragments.get(i + 1) {
                match next.parse::<u32>() {
                    Ok(n) => day = Some(n),
                    Err(_) => tracing::debug!(fragment = %next, "day fragment is not a number"),
                }
            }
        }
        let lower = text.to_lowercase();
        if lower.contains("am") || lower.contains("pm") {
            time = Some(text.replace(' ', ""));
        }
    }

    match month {
        Some(month) => Schedule {
            month: Some(month),
            day: day.filter(|d| *d > 0),
            time,
        },
        None => Schedule::default(),
    }
}

/// Appends the attribution marker unless the title already carries it.
pub fn with_marker(title: &str, marker: &str) -> String {
    if marker.is_empty() || title.contains(marker) {
        title.to_string()
    } else {
        format!("{} {}", title, marker)
    }
}

/// Stable sort by `(month, day)`; unknown months sort as January.
pub fn sort_records(events: &mut [EventRecord]) {
    events.sort_by_key(EventRecord::sort_key);
}

/// Converts scraped records into calendar rows, showing each month only on its first row.
pub fn format_for_csv(events: &[EventRecord], marker: &str) -> Vec<CsvEventRow> {
    let mut months = MonthRunEncoder::new();

    events
        .iter()
        .filter(|event| !event.name.is_empty())
        .map(|event| CsvEventRow {
            month: months.display(&event.full_month()),
            event: with_marker(&event.name, marker),
            date: event.date(),
            time: event.time.clone(),
            location: event.location.clone(),
            link: event.url.clone(),
        })
        .collect()
}
