use std::collections::BTreeMap;

use dashcal_shared::{
  EventItem,
  EventKind,
  EventsResponse
};

/// Day-keyed view of the last successful
/// fetch. Replaced wholesale, never
/// patched.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct EventIndex {
  days: BTreeMap<String, Vec<EventItem>>
}

impl EventIndex {
  pub fn new() -> Self {
    Self::default()
  }

  /// Later entries for the same date
  /// replace earlier ones.
  pub fn from_response(
    response: EventsResponse
  ) -> Self {
    let days = response
      .events
      .into_iter()
      .map(|entry| (entry.date, entry.items))
      .collect();
    Self { days }
  }

  /// Items for `iso_day`, in server order.
  pub fn day(
    &self,
    iso_day: &str
  ) -> &[EventItem] {
    self
      .days
      .get(iso_day)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  pub fn iter(
    &self
  ) -> impl Iterator<Item = (&str, &[EventItem])>
  {
    self.days.iter().map(|(day, items)| {
      (day.as_str(), items.as_slice())
    })
  }

  pub fn day_count(&self) -> usize {
    self.days.len()
  }

  pub fn item_count(&self) -> usize {
    self.days.values().map(Vec::len).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.item_count() == 0
  }

  pub fn clear(&mut self) {
    self.days.clear();
  }

  /// Sum of item weights per kind across
  /// every day.
  pub fn kind_totals(
    &self
  ) -> BTreeMap<EventKind, u64> {
    let mut totals = BTreeMap::new();
    for item in self.days.values().flatten()
    {
      *totals.entry(item.kind).or_insert(0) +=
        item.weight();
    }
    totals
  }
}
