//! Widget configuration supplied by the host.
//!
//! # Responsibility
//! - Deserialize the date range, locale and feature switches from JSON.
//! - Validate them before any model is built.

use crate::model::calendar::ModelError;
use crate::model::event::DEFAULT_PLACEHOLDER_TITLE;
use crate::model::locale::{parse_weekday, Locale, LocaleError, DEFAULT_LOCALE_TAG};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid locale: {0}")]
    Locale(#[from] LocaleError),
    #[error(transparent)]
    Range(#[from] ModelError),
}

/// Host configuration of one agenda calendar widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaCalendarConfig {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    #[serde(default = "default_locale_tag")]
    pub locale: String,
    /// Weekday name overriding the locale's week start.
    #[serde(default)]
    pub first_day_of_week: Option<String>,
    /// Fixed "today"; the local clock is used when unset.
    #[serde(default)]
    pub today: Option<NaiveDate>,
    #[serde(default = "default_placeholder_title")]
    pub placeholder_title: String,
    #[serde(default = "default_true")]
    pub calendar_view_enabled: bool,
    #[serde(default = "default_true")]
    pub floating_indicator_enabled: bool,
}

impl AgendaCalendarConfig {
    /// Config for `[min_date, max_date]` with every other field defaulted.
    pub fn new(min_date: NaiveDate, max_date: NaiveDate) -> Self {
        Self {
            min_date,
            max_date,
            locale: default_locale_tag(),
            first_day_of_week: None,
            today: None,
            placeholder_title: default_placeholder_title(),
            calendar_view_enabled: true,
            floating_indicator_enabled: true,
        }
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(value: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the range order and the locale fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_date > self.max_date {
            return Err(ModelError::InvalidRange {
                min: self.min_date,
                max: self.max_date,
            }
            .into());
        }
        self.resolve_locale()?;
        Ok(())
    }

    /// Locale with the optional week-start override applied.
    pub fn resolve_locale(&self) -> Result<Locale, ConfigError> {
        let locale = Locale::parse(&self.locale)?;
        match self.first_day_of_week.as_deref() {
            Some(name) => Ok(locale.with_first_day_of_week(parse_weekday(name)?)),
            None => Ok(locale),
        }
    }

    /// Configured today, or the local date.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

fn default_locale_tag() -> String {
    DEFAULT_LOCALE_TAG.to_string()
}

fn default_placeholder_title() -> String {
    DEFAULT_PLACEHOLDER_TITLE.to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::{AgendaCalendarConfig, ConfigError};
    use crate::model::calendar::ModelError;
    use chrono::{NaiveDate, Weekday};

    #[test]
    fn minimal_json_uses_defaults() {
        let config = AgendaCalendarConfig::from_json_str(
            r#"{ "min_date": "2026-10-01", "max_date": "2026-10-31" }"#,
        )
        .expect("minimal config");

        assert_eq!(config.locale, "en-US");
        assert_eq!(config.placeholder_title, "No events");
        assert!(config.calendar_view_enabled);
        assert!(config.floating_indicator_enabled);
        assert_eq!(
            config.resolve_locale().expect("locale").first_day_of_week(),
            Weekday::Sun
        );
    }

    #[test]
    fn week_start_override_applies() {
        let config = AgendaCalendarConfig::from_json_str(
            r#"{
                "min_date": "2026-10-01",
                "max_date": "2026-10-31",
                "locale": "en_US",
                "first_day_of_week": "Monday",
                "today": "2026-10-16"
            }"#,
        )
        .expect("config with override");

        assert_eq!(
            config.resolve_locale().expect("locale").first_day_of_week(),
            Weekday::Mon
        );
        assert_eq!(
            config.today(),
            NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date")
        );
    }

    #[test]
    fn rejects_reversed_range_and_bad_locale() {
        let err = AgendaCalendarConfig::from_json_str(
            r#"{ "min_date": "2026-11-01", "max_date": "2026-10-31" }"#,
        )
        .expect_err("reversed range must fail");
        assert!(matches!(
            err,
            ConfigError::Range(ModelError::InvalidRange { .. })
        ));

        let err = AgendaCalendarConfig::from_json_str(
            r#"{ "min_date": "2026-10-01", "max_date": "2026-10-31", "locale": "??" }"#,
        )
        .expect_err("bad locale must fail");
        assert!(matches!(err, ConfigError::Locale(_)));

        let err = AgendaCalendarConfig::from_json_str("{").expect_err("bad json must fail");
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
