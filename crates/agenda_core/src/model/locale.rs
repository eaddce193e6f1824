//! Locale rules for week alignment and weekday headers.
//!
//! # Responsibility
//! - Parse locale tags (`en-US`, `fr_FR`, `de`) into language/region parts.
//! - Resolve the first day of week from region data.
//!
//! # Invariants
//! - A week always starts on `first_day_of_week`; a date equal to that weekday
//!   opens a new week and is never shared with the previous one.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Locale tag used when the host does not provide one.
pub const DEFAULT_LOCALE_TAG: &str = "en-US";

static LOCALE_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<lang>[A-Za-z]{2,3})(?:[-_](?P<region>[A-Za-z]{2}|[0-9]{3}))?$")
        .expect("valid locale tag regex")
});

/// Regions whose calendars start the week on Sunday.
const SUNDAY_FIRST_REGIONS: &[&str] = &[
    "AG", "AS", "BD", "BR", "BS", "BT", "BW", "BZ", "CA", "CN", "CO", "DM", "DO", "ET", "GT",
    "GU", "HK", "HN", "ID", "IL", "IN", "JM", "JP", "KE", "KH", "KR", "LA", "MH", "MM", "MO",
    "MT", "MX", "MZ", "NI", "NP", "PA", "PE", "PH", "PK", "PR", "PT", "PY", "SA", "SG", "SV",
    "TH", "TT", "TW", "UM", "US", "VE", "VI", "WS", "YE", "ZA", "ZW",
];

/// Regions whose calendars start the week on Saturday.
const SATURDAY_FIRST_REGIONS: &[&str] = &[
    "AE", "AF", "BH", "DJ", "DZ", "EG", "IQ", "IR", "JO", "KW", "LY", "OM", "QA", "SD", "SY",
];

/// Locale parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("locale tag must not be empty")]
    EmptyTag,
    #[error("locale tag is malformed: {0}")]
    MalformedTag(String),
    #[error("unknown weekday name: {0}")]
    UnknownWeekday(String),
}

/// Calendar locale: language, optional region and week start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    language: String,
    region: Option<String>,
    first_day_of_week: Weekday,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            region: Some("US".to_string()),
            first_day_of_week: Weekday::Sun,
        }
    }
}

impl Locale {
    /// Parses a locale tag and derives its first day of week.
    ///
    /// Language-only tags fall back to the language's most common region, and
    /// finally to ISO-8601 Monday weeks.
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(LocaleError::EmptyTag);
        }
        let captures = LOCALE_TAG_RE
            .captures(trimmed)
            .ok_or_else(|| LocaleError::MalformedTag(trimmed.to_string()))?;

        let language = captures["lang"].to_ascii_lowercase();
        let region = captures
            .name("region")
            .map(|value| value.as_str().to_ascii_uppercase());
        let first_day_of_week = region
            .as_deref()
            .or_else(|| default_region(&language))
            .map_or(Weekday::Mon, first_day_for_region);

        Ok(Self {
            language,
            region,
            first_day_of_week,
        })
    }

    /// Overrides the region-derived week start.
    pub fn with_first_day_of_week(mut self, first_day_of_week: Weekday) -> Self {
        self.first_day_of_week = first_day_of_week;
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    /// Canonical `lang-REGION` tag.
    pub fn tag(&self) -> String {
        match &self.region {
            Some(region) => format!("{}-{region}", self.language),
            None => self.language.clone(),
        }
    }

    /// Returns the first date of the week containing `date`.
    ///
    /// Returns `None` only when the week start would precede the minimum
    /// representable date.
    pub fn week_start(&self, date: NaiveDate) -> Option<NaiveDate> {
        let offset = days_after(date.weekday(), self.first_day_of_week);
        date.checked_sub_days(Days::new(u64::from(offset)))
    }

    /// Weekdays in display order, starting with the locale's week start.
    pub fn weekdays(&self) -> [Weekday; 7] {
        let mut day = self.first_day_of_week;
        std::array::from_fn(|_| {
            let current = day;
            day = day.succ();
            current
        })
    }

    /// Short weekday labels for the grid header.
    ///
    /// English labels are upper-cased (`SUN`, `MON`, ...).
    pub fn weekday_labels(&self) -> [String; 7] {
        let uppercase = self.language == "en";
        self.weekdays().map(|day| {
            let label = day.to_string();
            if uppercase {
                label.to_uppercase()
            } else {
                label
            }
        })
    }
}

/// Parses a weekday name (`monday`, `Mon`, ...).
pub fn parse_weekday(value: &str) -> Result<Weekday, LocaleError> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| LocaleError::UnknownWeekday(value.trim().to_string()))
}

fn days_after(day: Weekday, start: Weekday) -> u32 {
    (7 + day.num_days_from_monday() - start.num_days_from_monday()) % 7
}

fn first_day_for_region(region: &str) -> Weekday {
    if SUNDAY_FIRST_REGIONS.contains(&region) {
        Weekday::Sun
    } else if SATURDAY_FIRST_REGIONS.contains(&region) {
        Weekday::Sat
    } else if region == "MV" {
        Weekday::Fri
    } else {
        Weekday::Mon
    }
}

fn default_region(language: &str) -> Option<&'static str> {
    match language {
        "en" => Some("US"),
        "pt" => Some("BR"),
        "ja" => Some("JP"),
        "ko" => Some("KR"),
        "zh" => Some("CN"),
        "he" => Some("IL"),
        "hi" => Some("IN"),
        "th" => Some("TH"),
        "ar" => Some("EG"),
        "fa" => Some("IR"),
        _ => None,
    }
}
