use chrono::{
  DateTime,
  Locale
};
use chrono_tz::Tz;

use crate::date::{
  DateInput,
  normalize_date
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum Language {
  #[default]
  Italian,
  English
}

impl Language {
  pub fn from_key(
    raw: &str
  ) -> Option<Self> {
    let lowered =
      raw.trim().to_ascii_lowercase();
    let primary = lowered
      .split(['-', '_'])
      .next()
      .unwrap_or_default();
    match primary {
      | "it" => Some(Language::Italian),
      | "en" => Some(Language::English),
      | _ => None
    }
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Language::Italian => "it",
      | Language::English => "en"
    }
  }

  fn chrono_locale(self) -> Locale {
    match self {
      | Language::Italian => Locale::it_IT,
      | Language::English => Locale::en_US
    }
  }

  fn month_pattern(self) -> &'static str {
    "%B %Y"
  }

  fn day_pattern(self) -> &'static str {
    match self {
      | Language::Italian => "%A %d %B",
      | Language::English => "%A, %d %B"
    }
  }

  /// Short weekday names, Sunday first.
  pub fn short_day_names(
    self
  ) -> [&'static str; 7] {
    match self {
      | Language::Italian => {
        [
          "Dom", "Lun", "Mar", "Mer",
          "Gio", "Ven", "Sab"
        ]
      }
      | Language::English => {
        [
          "Sun", "Mon", "Tue", "Wed",
          "Thu", "Fri", "Sat"
        ]
      }
    }
  }

  pub fn messages(
    self
  ) -> &'static Messages {
    match self {
      | Language::Italian => &ITALIAN,
      | Language::English => &ENGLISH
    }
  }
}

/// Fixed user-facing strings.
#[derive(Debug, PartialEq, Eq)]
pub struct Messages {
  pub day_empty:   &'static str,
  pub month_empty: &'static str,
  pub unavailable: &'static str
}

const ITALIAN: Messages = Messages {
  day_empty:   "Nessun evento per questa \
                data.",
  month_empty: "Nessun evento nel mese \
                selezionato.",
  unavailable: "Calendario non caricato."
};

const ENGLISH: Messages = Messages {
  day_empty:   "No events on this day.",
  month_empty: "No events in the \
                selected month.",
  unavailable: "Calendar not loaded."
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocaleFormatter {
  language: Language,
  timezone: Tz
}

impl LocaleFormatter {
  pub fn new(
    language: Language,
    timezone: Tz
  ) -> Self {
    Self {
      language,
      timezone
    }
  }

  pub fn language(&self) -> Language {
    self.language
  }

  pub fn timezone(&self) -> Tz {
    self.timezone
  }

  pub fn messages(
    &self
  ) -> &'static Messages {
    self.language.messages()
  }

  pub fn normalize(
    &self,
    input: &DateInput
  ) -> DateTime<Tz> {
    normalize_date(input, self.timezone)
  }

  /// e.g. `maggio 2024`.
  pub fn month_label(
    &self,
    at: &DateTime<Tz>
  ) -> String {
    at.with_timezone(&self.timezone)
      .format_localized(
        self.language.month_pattern(),
        self.language.chrono_locale()
      )
      .to_string()
  }

  /// e.g. `venerdì 03 maggio`.
  pub fn day_label(
    &self,
    at: &DateTime<Tz>
  ) -> String {
    at.with_timezone(&self.timezone)
      .format_localized(
        self.language.day_pattern(),
        self.language.chrono_locale()
      )
      .to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn formatter(
    language: Language
  ) -> LocaleFormatter {
    LocaleFormatter::new(
      language,
      chrono_tz::Europe::Rome
    )
  }

  #[test]
  fn italian_labels() {
    let fmt =
      formatter(Language::Italian);
    let day = fmt.normalize(
      &DateInput::from("2024-05-03")
    );
    assert_eq!(
      fmt.month_label(&day),
      "maggio 2024"
    );
    assert_eq!(
      fmt.day_label(&day),
      "venerdì 03 maggio"
    );
  }

  #[test]
  fn english_labels() {
    let fmt =
      formatter(Language::English);
    let day = fmt.normalize(
      &DateInput::from("2024-05-03")
    );
    assert_eq!(
      fmt.month_label(&day),
      "May 2024"
    );
    assert_eq!(
      fmt.day_label(&day),
      "Friday, 03 May"
    );
  }

  #[test]
  fn language_keys_accept_regions() {
    assert_eq!(
      Language::from_key("it-IT"),
      Some(Language::Italian)
    );
    assert_eq!(
      Language::from_key("EN_us"),
      Some(Language::English)
    );
    assert_eq!(
      Language::from_key("fr"),
      None
    );
  }
}
