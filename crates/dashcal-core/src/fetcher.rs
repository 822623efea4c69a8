use dashcal_shared::{
  DayEvents,
  EventItem,
  EventsResponse
};
use serde_json::Value;
use thiserror::Error;

use crate::index::EventIndex;
use crate::range::MonthRange;
use crate::session::CalendarSession;

/// Why a month could not be loaded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
  #[error("transport error: {0}")]
  Transport(String),

  #[error("server answered with status {0}")]
  Status(u16),

  #[error("malformed response body: {0}")]
  Malformed(String)
}

/// Handle for one issued month read.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct FetchTicket {
  pub generation: u64,
  pub range:      MonthRange
}

/// Reads scheduled items overlapping a
/// month range.
#[allow(async_fn_in_trait)]
pub trait EventSource {
  async fn fetch_events(
    &self,
    range: &MonthRange
  ) -> Result<EventsResponse, FetchError>;
}

/// What a resolved fetch did to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
  Applied {
    days:  usize,
    items: usize
  },
  Cleared(FetchError),
  /// A newer fetch was issued before this
  /// one resolved.
  Discarded
}

/// Parses an events body. Entries whose
/// `date` is not a string are skipped;
/// entries with a missing or malformed
/// `items` list become empty days.
pub fn parse_events_body(
  body: &str
) -> Result<EventsResponse, FetchError> {
  let value: Value =
    serde_json::from_str(body).map_err(
      |err| {
        FetchError::Malformed(
          err.to_string()
        )
      }
    )?;

  let entries = value
    .get("events")
    .and_then(Value::as_array)
    .ok_or_else(|| {
      FetchError::Malformed(
        "missing `events` array"
          .to_string()
      )
    })?;

  let events = entries
    .iter()
    .filter_map(parse_day_entry)
    .collect();

  Ok(EventsResponse { events })
}

fn parse_day_entry(
  entry: &Value
) -> Option<DayEvents> {
  let Some(date) = entry
    .get("date")
    .and_then(Value::as_str)
  else {
    tracing::warn!(
      entry = %entry,
      "skipping calendar entry without \
       a date"
    );
    return None;
  };

  let items = match entry.get("items") {
    | Some(raw) => {
      serde_json::from_value::<
        Vec<EventItem>
      >(raw.clone())
      .unwrap_or_else(|err| {
        tracing::warn!(
          date,
          error = %err,
          "malformed items list; \
           treating day as empty"
        );
        Vec::new()
      })
    }
    | None => Vec::new()
  };

  Some(DayEvents {
    date: date.to_string(),
    items
  })
}

/// Sole writer of the event index: applies
/// a resolved fetch to `session`.
pub fn apply_fetch_result(
  session: &mut CalendarSession,
  ticket: FetchTicket,
  result: Result<
    EventsResponse,
    FetchError
  >
) -> FetchOutcome {
  if !session.accepts(ticket) {
    tracing::info!(
      generation = ticket.generation,
      latest = session.generation(),
      start = %ticket.range.start,
      "discarding stale calendar response"
    );
    return FetchOutcome::Discarded;
  }

  match result {
    | Ok(response) => {
      let index =
        EventIndex::from_response(response);
      let days = index.day_count();
      let items = index.item_count();
      session.replace_index(index);
      tracing::info!(
        generation = ticket.generation,
        start = %ticket.range.start,
        end = %ticket.range.end,
        days,
        items,
        "calendar events loaded"
      );
      FetchOutcome::Applied {
        days,
        items
      }
    }
    | Err(err) => {
      session.replace_index(
        EventIndex::new()
      );
      tracing::warn!(
        generation = ticket.generation,
        start = %ticket.range.start,
        error = %err,
        "calendar fetch failed; cleared \
         events"
      );
      FetchOutcome::Cleared(err)
    }
  }
}

#[cfg(test)]
mod tests {
  use dashcal_shared::EventKind;

  use super::*;

  #[test]
  fn parses_well_formed_body() {
    let response = parse_events_body(
      r#"{"events":[{"date":"2024-05-03","items":[{"kind":"task","label":"Pay rent"},{"kind":"routine","label":"Routine","count":2}]}]}"#,
    )
    .expect("parse body");

    assert_eq!(response.events.len(), 1);
    let items = &response.events[0].items;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].kind, EventKind::Task);
    assert_eq!(items[1].count, Some(2));
  }

  #[test]
  fn misshapen_entries_degrade_to_empty_days()
  {
    let response = parse_events_body(
      r#"{"events":[
        {"date":"2024-05-01","items":"nope"},
        {"date":"2024-05-02"},
        {"date":"2024-05-03","items":[{"kind":"meeting","label":"?"}]},
        {"date":7,"items":[]},
        "garbage"
      ]}"#,
    )
    .expect("parse body");

    let dates = response
      .events
      .iter()
      .map(|day| day.date.as_str())
      .collect::<Vec<_>>();
    assert_eq!(
      dates,
      vec![
        "2024-05-01",
        "2024-05-02",
        "2024-05-03"
      ]
    );
    assert!(
      response
        .events
        .iter()
        .all(|day| day.items.is_empty())
    );
  }

  #[test]
  fn missing_events_array_is_malformed() {
    for body in [
      "not json",
      "{}",
      r#"{"events":{}}"#,
      "null"
    ] {
      assert!(
        matches!(
          parse_events_body(body),
          Err(FetchError::Malformed(_))
        ),
        "{body} should be malformed"
      );
    }
  }
}
