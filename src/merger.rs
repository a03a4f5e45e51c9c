use crate::models::CsvEventRow;
use crate::similarity::similarity;

/// Titles at least this similar are treated as the same event.
pub const DUPLICATE_THRESHOLD: f64 = 0.8;

/// Title with the attribution marker removed and surrounding whitespace trimmed.
pub fn clean_title(title: &str, marker: &str) -> String {
    if marker.is_empty() {
        return title.trim().to_string();
    }
    title.replace(marker, "").trim().to_string()
}

/// Two events are duplicates when their cleaned titles are equal ignoring case,
/// or similar enough. Dates and locations are not compared.
pub fn is_duplicate(a: &CsvEventRow, b: &CsvEventRow, marker: &str, threshold: f64) -> bool {
    let a = clean_title(&a.event, marker);
    let b = clean_title(&b.event, marker);

    if a.to_lowercase() == b.to_lowercase() {
        return true;
    }
    similarity(&a, &b) >= threshold
}

#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Existing rows first, in their original order, then accepted candidates.
    pub events: Vec<CsvEventRow>,
    pub added: usize,
    pub skipped: usize,
}

pub struct EventMerger {
    marker: String,
    threshold: f64,
}

impl EventMerger {
    pub fn new(marker: &str) -> Self {
        Self {
            marker: marker.to_string(),
            threshold: DUPLICATE_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Keeps every existing row and appends each candidate that duplicates none of them.
    /// Candidates are only checked against existing rows, not against each other.
    pub fn merge(&self, existing: Vec<CsvEventRow>, candidates: Vec<CsvEventRow>) -> MergeOutcome {
        let existing_len = existing.len();
        let mut outcome = MergeOutcome {
            events: existing,
            ..Default::default()
        };

        for candidate in candidates {
            let title = clean_title(&candidate.event, &self.marker);
            let duplicate_of = outcome.events[..existing_len]
                .iter()
                .find(|known| is_duplicate(&candidate, known, &self.marker, self.threshold))
                .map(|known| known.event.clone());

            match duplicate_of {
                Some(known) => {
                    println!("⏭️  Skipping duplicate: {} (matches \"{}\")", title, known);
                    outcome.skipped += 1;
                }
                None => {
                    println!("➕ Adding new event: {}", title);
                    outcome.events.push(candidate);
                    outcome.added += 1;
                }
            }
        }

        outcome
    }
}
