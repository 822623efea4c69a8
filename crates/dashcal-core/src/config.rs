use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::Weekday;
use chrono_tz::Tz;
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  info,
  warn
};

use crate::locale::{
  Language,
  LocaleFormatter
};

const DEFAULT_ENDPOINT: &str =
  "/calendar/events";
const DEFAULT_TIMEZONE: &str =
  "Europe/Rome";

fn default_version() -> u32 {
  1
}

fn default_endpoint() -> String {
  DEFAULT_ENDPOINT.to_string()
}

fn default_language() -> String {
  Language::default().as_key().to_string()
}

fn default_timezone() -> String {
  DEFAULT_TIMEZONE.to_string()
}

fn default_week_start() -> String {
  "monday".to_string()
}

fn calendar_true() -> bool {
  true
}

/// Element ids the host page is expected to
/// provide. Only `calendar` is required.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct MountIds {
  pub calendar:     String,
  pub month_label:  String,
  pub detail_date:  String,
  pub detail_list:  String,
  pub month_list:   String,
  pub prev_button:  String,
  pub next_button:  String,
  pub today_button: String
}

impl Default for MountIds {
  fn default() -> Self {
    Self {
      calendar:     "dashboard-calendar"
        .to_string(),
      month_label:  "calendar-month-label"
        .to_string(),
      detail_date:  "calendar-detail-date"
        .to_string(),
      detail_list:  "calendar-detail-list"
        .to_string(),
      month_list:   "calendar-month-list"
        .to_string(),
      prev_button:  "calendar-prev"
        .to_string(),
      next_button:  "calendar-next"
        .to_string(),
      today_button: "calendar-today"
        .to_string()
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct CalendarConfig {
  #[serde(default = "default_version")]
  pub version:                 u32,
  #[serde(default = "default_endpoint")]
  pub endpoint:                String,
  #[serde(default = "default_language")]
  pub language:                String,
  #[serde(default = "default_timezone")]
  pub timezone:                String,
  #[serde(
    default = "default_week_start"
  )]
  pub week_start:              String,
  #[serde(default = "calendar_true")]
  pub discard_stale_responses: bool,
  #[serde(default)]
  pub mounts:                  MountIds
}

impl Default for CalendarConfig {
  fn default() -> Self {
    Self {
      version:                 default_version(),
      endpoint:                default_endpoint(),
      language:                default_language(),
      timezone:                default_timezone(),
      week_start:              default_week_start(),
      discard_stale_responses: true,
      mounts:                  MountIds::default()
    }
  }
}

impl CalendarConfig {
  /// Parses and sanitizes a TOML document.
  pub fn from_toml_str(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut config =
      toml::from_str::<CalendarConfig>(raw)
        .context(
          "failed to parse calendar \
           config"
        )?;
    config.sanitize();
    Ok(config)
  }

  /// Like `from_toml_str`, but logs and
  /// falls back to defaults.
  pub fn load_or_default(
    raw: &str,
    source: &str
  ) -> Self {
    match Self::from_toml_str(raw) {
      | Ok(config) => {
        info!(
          source,
          version = config.version,
          language = %config.language,
          timezone = %config.timezone,
          week_start = %config.week_start,
          "loaded calendar config"
        );
        config
      }
      | Err(error) => {
        tracing::error!(
          source,
          error = %format!("{error:#}"),
          "failed parsing calendar config; \
           using defaults"
        );
        Self::default()
      }
    }
  }

  pub fn load_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let raw = fs::read_to_string(path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    Self::from_toml_str(&raw).with_context(
      || {
        format!(
          "invalid calendar config {}",
          path.display()
        )
      }
    )
  }

  pub fn language(&self) -> Language {
    Language::from_key(&self.language)
      .unwrap_or_default()
  }

  pub fn timezone(&self) -> Tz {
    parse_timezone(&self.timezone)
      .unwrap_or(chrono_tz::Europe::Rome)
  }

  pub fn week_start(&self) -> Weekday {
    if self
      .week_start
      .trim()
      .eq_ignore_ascii_case("sunday")
    {
      Weekday::Sun
    } else {
      Weekday::Mon
    }
  }

  pub fn formatter(&self) -> LocaleFormatter {
    LocaleFormatter::new(
      self.language(),
      self.timezone()
    )
  }

  fn sanitize(&mut self) {
    if self.endpoint.trim().is_empty() {
      warn!(
        "calendar endpoint was blank; \
         using default"
      );
      self.endpoint = default_endpoint();
    }

    if Language::from_key(&self.language)
      .is_none()
    {
      warn!(
        language = %self.language,
        "unsupported calendar language; \
         using default"
      );
      self.language = default_language();
    }

    if parse_timezone(&self.timezone)
      .is_none()
    {
      self.timezone = default_timezone();
    }

    let week_start =
      self.week_start.trim().to_ascii_lowercase();
    if week_start != "monday"
      && week_start != "sunday"
    {
      warn!(
        week_start = %self.week_start,
        "unknown week start; using monday"
      );
      self.week_start = default_week_start();
    } else {
      self.week_start = week_start;
    }

    if self.mounts.calendar.trim().is_empty()
    {
      self.mounts.calendar =
        MountIds::default().calendar;
    }
  }
}

fn parse_timezone(raw: &str) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    warn!("calendar timezone was empty");
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => Some(tz),
    | Err(error) => {
      warn!(
        timezone = %trimmed,
        error = %error,
        "invalid timezone id"
      );
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_uses_defaults() {
    let config =
      CalendarConfig::from_toml_str("")
        .expect("parse empty config");
    assert_eq!(config, CalendarConfig::default());
    assert_eq!(config.week_start(), Weekday::Mon);
    assert_eq!(
      config.timezone(),
      chrono_tz::Europe::Rome
    );
  }

  #[test]
  fn invalid_values_are_sanitized() {
    let config = CalendarConfig::from_toml_str(
      r#"
        endpoint = "  "
        language = "fr"
        timezone = "Mars/Olympus"
        week_start = "Sunday"
        discard_stale_responses = false

        [mounts]
        calendar = ""
        month_list = "summary"
      "#
    )
    .expect("parse config");

    assert_eq!(config.endpoint, "/calendar/events");
    assert_eq!(config.language(), Language::Italian);
    assert_eq!(config.timezone, "Europe/Rome");
    assert_eq!(config.week_start(), Weekday::Sun);
    assert!(!config.discard_stale_responses);
    assert_eq!(
      config.mounts.calendar,
      "dashboard-calendar"
    );
    assert_eq!(config.mounts.month_list, "summary");
    assert_eq!(
      config.mounts.detail_list,
      "calendar-detail-list"
    );
  }

  #[test]
  fn broken_toml_falls_back_to_defaults() {
    assert!(
      CalendarConfig::from_toml_str(
        "endpoint = ["
      )
      .is_err()
    );
    assert_eq!(
      CalendarConfig::load_or_default(
        "endpoint = [",
        "test"
      ),
      CalendarConfig::default()
    );
  }

  #[test]
  fn english_config_builds_english_formatter()
  {
    let config = CalendarConfig::from_toml_str(
      "language = \"en-GB\"\ntimezone = \"UTC\"",
    )
    .expect("parse config");
    let formatter = config.formatter();
    assert_eq!(
      formatter.language(),
      Language::English
    );
    assert_eq!(formatter.timezone(), chrono_tz::UTC);
  }
}
