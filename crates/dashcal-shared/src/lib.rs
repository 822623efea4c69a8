use serde::{
  Deserialize,
  Serialize
};

/// Category of a scheduled item. Drives
/// both coloring and summary ordering.
#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
  Task,
  Planner,
  Subscription,
  Transaction,
  Routine
}

impl EventKind {
  /// Fixed priority order used by every
  /// per-kind listing.
  pub const ALL: [EventKind; 5] = [
    EventKind::Task,
    EventKind::Planner,
    EventKind::Subscription,
    EventKind::Transaction,
    EventKind::Routine
  ];

  pub fn as_key(self) -> &'static str {
    match self {
      | EventKind::Task => "task",
      | EventKind::Planner => "planner",
      | EventKind::Subscription => {
        "subscription"
      }
      | EventKind::Transaction => {
        "transaction"
      }
      | EventKind::Routine => "routine"
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct EventItem {
  pub kind:  EventKind,
  #[serde(default)]
  pub label: String,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub count: Option<u32>
}

impl EventItem {
  /// Count worth displaying. A zero count
  /// is shown the same as no count.
  pub fn visible_count(
    &self
  ) -> Option<u32> {
    self.count.filter(|count| *count > 0)
  }

  /// Contribution of this item to a
  /// per-kind total.
  pub fn weight(&self) -> u64 {
    u64::from(
      self.visible_count().unwrap_or(1)
    )
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct DayEvents {
  pub date:  String,
  #[serde(default)]
  pub items: Vec<EventItem>
}

/// Body returned by the calendar events
/// endpoint.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct EventsResponse {
  pub events: Vec<DayEvents>
}

/// One event record in the month-grid
/// widget's native shape.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct WidgetEvent {
  pub id:          String,
  pub calendar_id: String,
  pub title:       String,
  pub category:    String,
  pub start:       String,
  pub end:         String,
  pub raw:         EventItem
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct WidgetWeekOptions {
  pub start_day_of_week: u8,
  pub day_names:         Vec<String>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct WidgetCalendar {
  pub id:               String,
  pub name:             String,
  pub background_color: String,
  pub border_color:     String
}

/// Construction options for the
/// month-grid widget.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct WidgetOptions {
  pub default_view:     String,
  pub usage_statistics: bool,
  pub is_read_only:     bool,
  pub week:             WidgetWeekOptions,
  pub month:            WidgetWeekOptions,
  pub calendars:        Vec<WidgetCalendar>
}
