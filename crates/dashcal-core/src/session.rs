use chrono::NaiveDate;

use crate::fetcher::FetchTicket;
use crate::index::EventIndex;
use crate::range::{
  MonthKey,
  MonthRange
};

/// Page-session state shared by the
/// fetcher and the renderers.
#[derive(Debug, Clone, Default)]
pub struct CalendarSession {
  index:          EventIndex,
  last_month_key: Option<MonthKey>,
  generation:     u64,
  discard_stale:  bool,
  selected_day:   Option<NaiveDate>
}

impl CalendarSession {
  pub fn new(discard_stale: bool) -> Self {
    Self {
      discard_stale,
      ..Self::default()
    }
  }

  pub fn index(&self) -> &EventIndex {
    &self.index
  }

  /// Day shown in the detail panel.
  pub fn selected_day(
    &self
  ) -> Option<NaiveDate> {
    self.selected_day
  }

  pub fn select_day(&mut self, day: NaiveDate) {
    self.selected_day = Some(day);
  }

  /// Latest generation handed out.
  pub fn generation(&self) -> u64 {
    self.generation
  }

  /// Records `key` as the displayed month.
  /// Returns `false` when it was already
  /// the last one seen.
  pub fn remember_month(
    &mut self,
    key: MonthKey
  ) -> bool {
    if self.last_month_key == Some(key) {
      return false;
    }
    self.last_month_key = Some(key);
    true
  }

  pub fn issue_ticket(
    &mut self,
    range: MonthRange
  ) -> FetchTicket {
    self.generation =
      self.generation.saturating_add(1);
    FetchTicket {
      generation: self.generation,
      range
    }
  }

  /// Whether a response for `ticket` may
  /// still be written.
  pub fn accepts(
    &self,
    ticket: FetchTicket
  ) -> bool {
    !self.discard_stale
      || ticket.generation == self.generation
  }

  pub(crate) fn replace_index(
    &mut self,
    index: EventIndex
  ) {
    self.index = index;
  }

  /// Drops the index and the month key.
  /// Generations keep counting so replies
  /// issued before the reset are stale.
  pub fn reset(&mut self) {
    self.index.clear();
    self.last_month_key = None;
    self.generation =
      self.generation.saturating_add(1);
    tracing::debug!(
      generation = self.generation,
      "calendar session reset"
    );
  }
}
