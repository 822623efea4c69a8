use crate::date::{
  DateInput,
  iso_day
};
use crate::index::EventIndex;
use crate::locale::LocaleFormatter;
use crate::rows::PanelRow;

/// Rendered content of the day-detail
/// panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayDetail {
  pub iso_day: String,
  pub label:   String,
  pub rows:    Vec<PanelRow>
}

/// Items of one day in server order, or a
/// single empty-state row.
pub fn render_day_detail(
  index: &EventIndex,
  date: &DateInput,
  formatter: &LocaleFormatter
) -> DayDetail {
  let day = formatter.normalize(date);
  let key = iso_day(&day);
  let items = index.day(&key);

  let rows = if items.is_empty() {
    vec![PanelRow::Empty {
      message: formatter
        .messages()
        .day_empty
        .to_string()
    }]
  } else {
    items
      .iter()
      .map(|item| PanelRow::Entry {
        kind:  item.kind,
        label: item.label.clone(),
        count: item
          .visible_count()
          .map(u64::from)
      })
      .collect()
  };

  tracing::debug!(
    day = %key,
    items = items.len(),
    "day detail rendered"
  );

  DayDetail {
    label: formatter.day_label(&day),
    iso_day: key,
    rows
  }
}

#[cfg(test)]
mod tests {
  use dashcal_shared::{
    DayEvents,
    EventItem,
    EventKind,
    EventsResponse
  };

  use super::*;
  use crate::locale::Language;

  fn formatter() -> LocaleFormatter {
    LocaleFormatter::new(
      Language::Italian,
      chrono_tz::Europe::Rome
    )
  }

  #[test]
  fn rows_keep_server_order() {
    let index = EventIndex::from_response(
      EventsResponse {
        events: vec![DayEvents {
          date:  "2024-05-03".to_string(),
          items: vec![
            EventItem {
              kind:  EventKind::Routine,
              label: "Routine".to_string(),
              count: Some(2)
            },
            EventItem {
              kind:  EventKind::Task,
              label: "Task".to_string(),
              count: Some(1)
            },
          ]
        }]
      }
    );

    let detail = render_day_detail(
      &index,
      &DateInput::from("2024-05-03"),
      &formatter()
    );

    assert_eq!(detail.iso_day, "2024-05-03");
    assert_eq!(detail.label, "venerdì 03 maggio");
    let labels = detail
      .rows
      .iter()
      .map(|row| row.text().to_string())
      .collect::<Vec<_>>();
    assert_eq!(labels, vec!["Routine", "Task"]);
    assert_eq!(detail.rows[0].count_text(), "2");
    assert_eq!(
      detail.rows[0].chip_class().as_deref(),
      Some("event-chip event-routine")
    );
  }

  #[test]
  fn absent_day_renders_one_empty_row() {
    let detail = render_day_detail(
      &EventIndex::new(),
      &DateInput::from("2024-05-04"),
      &formatter()
    );

    assert_eq!(detail.rows.len(), 1);
    assert!(detail.rows[0].is_empty_state());
    assert_eq!(
      detail.rows[0].text(),
      "Nessun evento per questa data."
    );
    assert_eq!(detail.label, "sabato 04 maggio");
  }
}
