use crate::index::EventIndex;
use crate::kinds::KIND_STYLES;
use crate::locale::LocaleFormatter;
use crate::rows::PanelRow;

/// Per-kind totals for the whole index in
/// the fixed kind order. Zero kinds are
/// left out; an all-zero index yields the
/// single empty-state row.
pub fn render_month_summary(
  index: &EventIndex,
  formatter: &LocaleFormatter
) -> Vec<PanelRow> {
  let totals = index.kind_totals();
  let language = formatter.language();

  let rows = KIND_STYLES
    .iter()
    .filter_map(|style| {
      let count = totals
        .get(&style.kind)
        .copied()
        .unwrap_or(0);
      (count > 0).then(|| {
        PanelRow::Entry {
          kind:  style.kind,
          label: style
            .name(language)
            .to_string(),
          count: Some(count)
        }
      })
    })
    .collect::<Vec<_>>();

  if rows.is_empty() {
    return vec![PanelRow::Empty {
      message: formatter
        .messages()
        .month_empty
        .to_string()
    }];
  }

  tracing::debug!(
    kinds = rows.len(),
    days = index.day_count(),
    "month summary rendered"
  );
  rows
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

  fn day(
    date: &str,
    kinds: &[EventKind]
  ) -> DayEvents {
    DayEvents {
      date:  date.to_string(),
      items: kinds
        .iter()
        .map(|kind| EventItem {
          kind:  *kind,
          label: kind.as_key().to_string(),
          count: None
        })
        .collect()
    }
  }

  #[test]
  fn kinds_render_in_priority_order() {
    let index = EventIndex::from_response(
      EventsResponse {
        events: vec![
          day("2024-05-01", &[
            EventKind::Routine,
            EventKind::Transaction
          ]),
          day("2024-05-02", &[
            EventKind::Subscription,
            EventKind::Task
          ]),
          day("2024-05-03", &[
            EventKind::Planner
          ]),
        ]
      }
    );

    let kinds = render_month_summary(
      &index,
      &formatter()
    )
    .into_iter()
    .map(|row| match row {
      | PanelRow::Entry { kind, .. } => kind,
      | PanelRow::Empty { .. } => {
        panic!("unexpected empty row")
      }
    })
    .collect::<Vec<_>>();

    assert_eq!(kinds, EventKind::ALL.to_vec());
  }

  #[test]
  fn zero_kinds_are_hidden() {
    let index = EventIndex::from_response(
      EventsResponse {
        events: vec![day("2024-05-09", &[
          EventKind::Transaction,
          EventKind::Transaction
        ])]
      }
    );

    let rows =
      render_month_summary(&index, &formatter());
    assert_eq!(
      rows,
      vec![PanelRow::Entry {
        kind:  EventKind::Transaction,
        label: "Transazioni".to_string(),
        count: Some(2)
      }]
    );
  }

  #[test]
  fn empty_index_renders_one_empty_row() {
    let with_blank_day =
      EventIndex::from_response(
        EventsResponse {
          events: vec![day("2024-05-09", &[])]
        }
      );

    for index in
      [EventIndex::new(), with_blank_day]
    {
      let rows = render_month_summary(
        &index,
        &formatter()
      );
      assert_eq!(rows.len(), 1);
      assert!(rows[0].is_empty_state());
      assert_eq!(
        rows[0].text(),
        "Nessun evento nel mese selezionato."
      );
    }
  }
}
