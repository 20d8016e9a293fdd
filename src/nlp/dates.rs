//! Date-phrase parser seam
//!
//! Extraction only needs "one timestamp per recognized phrase, in document
//! order"; anything smarter belongs in the backend.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use thiserror::Error;

/// Errors surfaced by a date-parser backend
#[derive(Debug, Error)]
pub enum DateParseError {
    #[error("Date parser backend failed: {0}")]
    Backend(String),
}

/// Trait for natural-language date parsing backends
#[async_trait]
pub trait DateParser: Send + Sync {
    /// Resolve every recognized date phrase to a timestamp, in document order
    async fn parse_dates(&self, text: &str) -> Result<Vec<DateTime<Utc>>, DateParseError>;
}

/// Built-in parser for relative and explicit date phrases
///
/// Recognizes "today", "yesterday", "tomorrow", "tonight", "last night",
/// weekday phrases ("last Monday", "on Friday"), ISO dates (2026-08-25) and
/// "month day" phrases ("June 5th"). Resolution is against a reference
/// instant, injectable for tests.
#[derive(Debug, Clone, Default)]
pub struct RelativeDateParser {
    reference: Option<DateTime<Utc>>,
}

impl RelativeDateParser {
    pub fn new() -> Self {
        Self { reference: None }
    }

    /// Fix the reference instant instead of using the current time
    pub fn with_reference(reference: DateTime<Utc>) -> Self {
        Self {
            reference: Some(reference),
        }
    }

    fn reference(&self) -> DateTime<Utc> {
        self.reference.unwrap_or_else(Utc::now)
    }

    fn midnight(date: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("valid midnight"))
    }

    fn weekday_of(word: &str) -> Option<Weekday> {
        match word {
            "monday" => Some(Weekday::Mon),
            "tuesday" => Some(Weekday::Tue),
            "wednesday" => Some(Weekday::Wed),
            "thursday" => Some(Weekday::Thu),
            "friday" => Some(Weekday::Fri),
            "saturday" => Some(Weekday::Sat),
            "sunday" => Some(Weekday::Sun),
            _ => None,
        }
    }

    fn month_of(word: &str) -> Option<u32> {
        match word {
            "january" => Some(1),
            "february" => Some(2),
            "march" => Some(3),
            "april" => Some(4),
            "may" => Some(5),
            "june" => Some(6),
            "july" => Some(7),
            "august" => Some(8),
            "september" => Some(9),
            "october" => Some(10),
            "november" => Some(11),
            "december" => Some(12),
            _ => None,
        }
    }

    /// Most recent occurrence of `weekday` at or before `from`
    fn previous_weekday(from: NaiveDate, weekday: Weekday, strictly_before: bool) -> NaiveDate {
        let start = if strictly_before { 1 } else { 0 };
        for back in start..=7 {
            let candidate = from - Duration::days(back);
            if candidate.weekday() == weekday {
                return candidate;
            }
        }
        from
    }

    fn next_weekday(from: NaiveDate, weekday: Weekday) -> NaiveDate {
        for ahead in 1..=7 {
            let candidate = from + Duration::days(ahead);
            if candidate.weekday() == weekday {
                return candidate;
            }
        }
        from
    }

    /// Parse a day-of-month token like "5", "5th", "22nd"
    fn day_of(word: &str) -> Option<u32> {
        let digits = word.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        if digits.is_empty() {
            return None;
        }
        digits.parse::<u32>().ok().filter(|d| (1..=31).contains(d))
    }
}

#[async_trait]
impl DateParser for RelativeDateParser {
    async fn parse_dates(&self, text: &str) -> Result<Vec<DateTime<Utc>>, DateParseError> {
        let today = self.reference().date_naive();
        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric() && c != '-')
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect();

        let mut dates = Vec::new();
        let mut i = 0;
        while i < words.len() {
            let word = words[i].as_str();
            let next = words.get(i + 1).map(|w| w.as_str());

            match word {
                "today" | "tonight" => {
                    dates.push(Self::midnight(today));
                    i += 1;
                    continue;
                }
                "yesterday" => {
                    dates.push(Self::midnight(today - Duration::days(1)));
                    i += 1;
                    continue;
                }
                "tomorrow" => {
                    dates.push(Self::midnight(today + Duration::days(1)));
                    i += 1;
                    continue;
                }
                "last" => {
                    if next == Some("night") {
                        dates.push(Self::midnight(today - Duration::days(1)));
                        i += 2;
                        continue;
                    }
                    if let Some(weekday) = next.and_then(Self::weekday_of) {
                        dates.push(Self::midnight(Self::previous_weekday(today, weekday, true)));
                        i += 2;
                        continue;
                    }
                }
                "next" => {
                    if let Some(weekday) = next.and_then(Self::weekday_of) {
                        dates.push(Self::midnight(Self::next_weekday(today, weekday)));
                        i += 2;
                        continue;
                    }
                }
                _ => {}
            }

            if let Some(weekday) = Self::weekday_of(word) {
                dates.push(Self::midnight(Self::previous_weekday(today, weekday, false)));
                i += 1;
                continue;
            }
            if let Ok(date) = NaiveDate::parse_from_str(word, "%Y-%m-%d") {
                dates.push(Self::midnight(date));
                i += 1;
                continue;
            }
            if let Some(month) = Self::month_of(word) {
                if let Some(day) = next.and_then(Self::day_of) {
                    if let Some(date) = NaiveDate::from_ymd_opt(today.year(), month, day) {
                        dates.push(Self::midnight(date));
                        i += 2;
                        continue;
                    }
                }
            }

            i += 1;
        }

        Ok(dates)
    }
}
