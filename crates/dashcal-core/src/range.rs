use std::fmt;

use chrono::{
  Datelike,
  Duration,
  NaiveDate
};

/// (year, month) of a displayed month.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
)]
pub struct MonthKey {
  pub year:  i32,
  pub month: u32
}

impl MonthKey {
  pub fn of(day: NaiveDate) -> Self {
    Self {
      year:  day.year(),
      month: day.month()
    }
  }

  /// Parses `YYYY-MM`.
  pub fn parse(
    raw: &str
  ) -> Option<Self> {
    let (year, month) =
      raw.trim().split_once('-')?;
    let year = year.parse::<i32>().ok()?;
    let month =
      month.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(
      year, month, 1
    )
    .map(Self::of)
  }
}

impl fmt::Display for MonthKey {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "{:04}-{:02}",
      self.year, self.month
    )
  }
}

/// First and last day of one month,
/// inclusive.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct MonthRange {
  pub start: NaiveDate,
  pub end:   NaiveDate
}

impl MonthRange {
  pub fn containing(
    day: NaiveDate
  ) -> Self {
    Self {
      start: first_day_of_month(
        day.year(),
        day.month()
      ),
      end:   last_day_of_month(
        day.year(),
        day.month()
      )
    }
  }

  pub fn for_key(key: MonthKey) -> Self {
    Self::containing(first_day_of_month(
      key.year, key.month
    ))
  }

  pub fn key(&self) -> MonthKey {
    MonthKey::of(self.start)
  }

  pub fn start_iso(&self) -> String {
    self
      .start
      .format("%Y-%m-%d")
      .to_string()
  }

  pub fn end_iso(&self) -> String {
    self.end.format("%Y-%m-%d").to_string()
  }

  /// `endpoint` with `start`/`end` query
  /// parameters appended.
  pub fn request_url(
    &self,
    endpoint: &str
  ) -> String {
    let separator =
      if endpoint.contains('?') {
        '&'
      } else {
        '?'
      };
    format!(
      "{endpoint}{separator}start={}&end={}",
      self.start_iso(),
      self.end_iso()
    )
  }
}

pub fn first_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(
    year, month, 1
  )
  .unwrap_or(NaiveDate::MIN)
}

pub fn last_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  let (next_year, next_month) =
    if month >= 12 {
      (year.saturating_add(1), 1_u32)
    } else {
      (year, month + 1)
    };
  let next = first_day_of_month(
    next_year, next_month
  );
  next
    .checked_sub_signed(Duration::days(1))
    .unwrap_or(next)
}
