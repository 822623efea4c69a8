use chrono::{
  DateTime,
  NaiveDate,
  NaiveDateTime,
  NaiveTime,
  TimeZone,
  Utc
};
use chrono_tz::Tz;

const LOCAL_DATETIME_FORMATS: [&str; 4] = [
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S",
  "%Y-%m-%d %H:%M"
];

/// Anything a caller may hand over as a
/// date: host values, widget wrappers,
/// server strings, or nothing at all.
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput {
  Missing,
  Date(DateTime<Utc>),
  Day(NaiveDate),
  /// Milliseconds since the Unix epoch, as
  /// exposed by date-like wrappers.
  Millis(f64),
  Text(String)
}

impl From<&str> for DateInput {
  fn from(raw: &str) -> Self {
    DateInput::Text(raw.to_string())
  }
}

impl From<String> for DateInput {
  fn from(raw: String) -> Self {
    DateInput::Text(raw)
  }
}

impl From<NaiveDate> for DateInput {
  fn from(day: NaiveDate) -> Self {
    DateInput::Day(day)
  }
}

impl From<DateTime<Utc>> for DateInput {
  fn from(at: DateTime<Utc>) -> Self {
    DateInput::Date(at)
  }
}

impl<T> From<Option<T>> for DateInput
where
  T: Into<DateInput>
{
  fn from(value: Option<T>) -> Self {
    value
      .map(Into::into)
      .unwrap_or(DateInput::Missing)
  }
}

/// Coerces `input` into a date in
/// `timezone`, falling back to the current
/// moment on anything unusable.
pub fn normalize_date(
  input: &DateInput,
  timezone: Tz
) -> DateTime<Tz> {
  normalize_date_at(
    input,
    timezone,
    Utc::now()
  )
}

pub fn normalize_date_at(
  input: &DateInput,
  timezone: Tz,
  now: DateTime<Utc>
) -> DateTime<Tz> {
  let fallback =
    || now.with_timezone(&timezone);

  match input {
    | DateInput::Missing => fallback(),
    | DateInput::Date(at) => {
      at.with_timezone(&timezone)
    }
    | DateInput::Day(day) => {
      local_midnight(*day, timezone)
        .unwrap_or_else(fallback)
    }
    | DateInput::Millis(millis) => {
      from_millis(*millis)
        .map(|at| {
          at.with_timezone(&timezone)
        })
        .unwrap_or_else(|| {
          tracing::debug!(
            millis,
            "date millis out of range; \
             using now"
          );
          fallback()
        })
    }
    | DateInput::Text(raw) => {
      parse_date_text(raw, timezone)
        .unwrap_or_else(|| {
          tracing::debug!(
            raw = %raw,
            "unparseable date text; \
             using now"
          );
          fallback()
        })
    }
  }
}

/// `YYYY-MM-DD` of `at` in its own zone.
pub fn iso_day<T>(
  at: &DateTime<T>
) -> String
where
  T: TimeZone,
  T::Offset: std::fmt::Display
{
  at.format("%Y-%m-%d").to_string()
}

pub fn parse_iso_day(
  raw: &str
) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(
    raw.trim(),
    "%Y-%m-%d"
  )
  .ok()
}

fn from_millis(
  millis: f64
) -> Option<DateTime<Utc>> {
  if !millis.is_finite() {
    return None;
  }
  Utc
    .timestamp_millis_opt(millis as i64)
    .single()
}

fn parse_date_text(
  raw: &str,
  timezone: Tz
) -> Option<DateTime<Tz>> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  if let Ok(at) =
    DateTime::parse_from_rfc3339(trimmed)
  {
    return Some(
      at.with_timezone(&timezone)
    );
  }

  for format in LOCAL_DATETIME_FORMATS {
    if let Ok(naive) =
      NaiveDateTime::parse_from_str(
        trimmed, format
      )
    {
      return timezone
        .from_local_datetime(&naive)
        .earliest();
    }
  }

  parse_iso_day(trimmed).and_then(|day| {
    local_midnight(day, timezone)
  })
}

fn local_midnight(
  day: NaiveDate,
  timezone: Tz
) -> Option<DateTime<Tz>> {
  timezone
    .from_local_datetime(
      &day.and_time(NaiveTime::MIN)
    )
    .earliest()
    .or_else(|| {
      // Zones that skip midnight on a DST
      // change still have a noon.
      let noon =
        day.and_hms_opt(12, 0, 0)?;
      timezone
        .from_local_datetime(&noon)
        .earliest()
    })
}

#[cfg(test)]
mod tests {
  use chrono::{
    Datelike,
    Duration
  };

  use super::*;

  fn rome() -> Tz {
    chrono_tz::Europe::Rome
  }

  #[test]
  fn iso_day_strings_keep_their_day() {
    for raw in [
      "2024-05-03",
      "2024-01-01",
      "2024-02-29",
      "2024-03-31",
      "2024-10-27",
      "2023-12-31"
    ] {
      let normalized = normalize_date(
        &DateInput::from(raw),
        rome()
      );
      assert_eq!(
        iso_day(&normalized),
        raw
      );
    }
  }

  #[test]
  fn invalid_inputs_fall_back_to_now() {
    let before = Utc::now();
    for input in [
      DateInput::Missing,
      DateInput::from("not a date"),
      DateInput::from(""),
      DateInput::from("2024-13-45"),
      DateInput::Millis(f64::NAN),
      DateInput::Millis(f64::INFINITY)
    ] {
      let normalized =
        normalize_date(&input, rome());
      let drift = normalized
        .with_timezone(&Utc)
        .signed_duration_since(before);
      assert!(
        drift >= Duration::zero()
          && drift < Duration::seconds(5),
        "{input:?} drifted {drift:?}"
      );
    }
  }

  #[test]
  fn millis_are_read_as_epoch_instants() {
    let normalized = normalize_date(
      &DateInput::Millis(
        1_714_694_400_000.0
      ),
      chrono_tz::UTC
    );
    assert_eq!(
      iso_day(&normalized),
      "2024-05-03"
    );
  }

  #[test]
  fn rfc3339_is_shifted_into_the_zone() {
    let normalized = normalize_date(
      &DateInput::from(
        "2024-05-02T23:30:00Z"
      ),
      rome()
    );
    assert_eq!(
      iso_day(&normalized),
      "2024-05-03"
    );
  }

  #[test]
  fn dates_are_copied_not_shared() {
    let now = Utc::now();
    let input = DateInput::Date(now);
    let normalized =
      normalize_date(&input, rome());
    assert_eq!(
      normalized.with_timezone(&Utc),
      now
    );
    assert_eq!(input, DateInput::Date(now));
  }

  #[test]
  fn local_timestamps_use_the_zone() {
    let normalized = normalize_date(
      &DateInput::from("2024-05-03T08:15"),
      rome()
    );
    assert_eq!(normalized.day(), 3);
    assert_eq!(
      normalized
        .format("%H:%M")
        .to_string(),
      "08:15"
    );
  }
}
