use std::cell::{
  Cell,
  RefCell
};

use chrono::{
  DateTime,
  NaiveDate,
  Weekday
};
use chrono_tz::Tz;
use dashcal_shared::{
  WidgetCalendar,
  WidgetEvent,
  WidgetOptions,
  WidgetWeekOptions
};

use crate::date::DateInput;
use crate::index::EventIndex;
use crate::kinds::KIND_STYLES;
use crate::locale::LocaleFormatter;
use crate::range::MonthRange;
use crate::session::CalendarSession;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Navigation {
  Prev,
  Next
}

/// The month-grid widget as seen from the
/// dashboard. Calls are synchronous from
/// the caller's side.
pub trait CalendarWidget {
  fn displayed_date(&self) -> DateInput;

  fn set_displayed_date(
    &self,
    day: NaiveDate
  );

  fn clear(&self);

  fn insert_events(
    &self,
    events: &[WidgetEvent]
  );

  fn navigate(
    &self,
    direction: Navigation
  );
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewTransition {
  SameMonth(MonthRange),
  MonthChanged(MonthRange)
}

/// Construction options: read-only month
/// view, configured week start, one
/// colored sub-calendar per kind.
pub fn widget_options(
  week_start: Weekday,
  formatter: &LocaleFormatter
) -> WidgetOptions {
  let week = WidgetWeekOptions {
    start_day_of_week: week_start
      .num_days_from_sunday()
      as u8,
    day_names:         formatter
      .language()
      .short_day_names()
      .iter()
      .map(|name| name.to_string())
      .collect()
  };

  let calendars = KIND_STYLES
    .iter()
    .map(|style| WidgetCalendar {
      id:               style
        .kind
        .as_key()
        .to_string(),
      name:             style
        .name(formatter.language())
        .to_string(),
      background_color: style
        .color
        .to_string(),
      border_color:     style
        .color
        .to_string()
    })
    .collect();

  WidgetOptions {
    default_view: "month".to_string(),
    usage_statistics: false,
    is_read_only: true,
    month: week.clone(),
    week,
    calendars
  }
}

/// One widget event per (date, item,
/// position). The position keeps ids
/// unique within a day.
pub fn build_widget_events(
  index: &EventIndex
) -> Vec<WidgetEvent> {
  index
    .iter()
    .flat_map(|(date, items)| {
      items.iter().enumerate().map(
        move |(position, item)| {
          let title =
            match item.visible_count() {
              | Some(count) => {
                format!(
                  "{} · {}",
                  item.label, count
                )
              }
              | None => item.label.clone()
            };
          WidgetEvent {
            id: format!(
              "{date}-{}-{position}",
              item.kind.as_key()
            ),
            calendar_id: item
              .kind
              .as_key()
              .to_string(),
            title,
            category: "allday".to_string(),
            start: date.to_string(),
            end: date.to_string(),
            raw: item.clone()
          }
        }
      )
    })
    .collect()
}

/// Bridges the event index and the
/// widget's native event set.
#[derive(Debug)]
pub struct CalendarAdapter<W> {
  widget: W
}

impl<W: CalendarWidget> CalendarAdapter<W> {
  pub fn new(widget: W) -> Self {
    Self { widget }
  }

  pub fn widget(&self) -> &W {
    &self.widget
  }

  pub fn displayed(
    &self,
    formatter: &LocaleFormatter
  ) -> DateTime<Tz> {
    formatter
      .normalize(&self.widget.displayed_date())
  }

  pub fn current_range(
    &self,
    formatter: &LocaleFormatter
  ) -> MonthRange {
    MonthRange::containing(
      self.displayed(formatter).date_naive()
    )
  }

  /// Replaces the widget's events with the
  /// contents of `index`.
  pub fn repaint(
    &self,
    index: &EventIndex
  ) -> usize {
    self.widget.clear();
    let events = build_widget_events(index);
    if !events.is_empty() {
      self.widget.insert_events(&events);
    }
    tracing::debug!(
      events = events.len(),
      "calendar widget repainted"
    );
    events.len()
  }

  /// Compares the displayed month with the
  /// last one seen and records it.
  pub fn on_view_changed(
    &self,
    session: &mut CalendarSession,
    formatter: &LocaleFormatter
  ) -> ViewTransition {
    let range = self.current_range(formatter);
    if session.remember_month(range.key()) {
      tracing::debug!(
        month = %range.key(),
        "displayed month changed"
      );
      ViewTransition::MonthChanged(range)
    } else {
      ViewTransition::SameMonth(range)
    }
  }

  pub fn navigate(
    &self,
    direction: Navigation
  ) {
    self.widget.navigate(direction);
  }

  pub fn jump_to(&self, day: NaiveDate) {
    self.widget.set_displayed_date(day);
  }
}

/// Widget kept entirely in memory. Backs
/// the terminal preview and tests.
#[derive(Debug)]
pub struct MemoryWidget {
  displayed: Cell<NaiveDate>,
  events:    RefCell<Vec<WidgetEvent>>,
  clears:    Cell<usize>
}

impl MemoryWidget {
  pub fn new(displayed: NaiveDate) -> Self {
    Self {
      displayed: Cell::new(displayed),
      events:    RefCell::new(Vec::new()),
      clears:    Cell::new(0)
    }
  }

  pub fn events(&self) -> Vec<WidgetEvent> {
    self.events.borrow().clone()
  }

  pub fn clear_count(&self) -> usize {
    self.clears.get()
  }
}

impl CalendarWidget for MemoryWidget {
  fn displayed_date(&self) -> DateInput {
    DateInput::Day(self.displayed.get())
  }

  fn set_displayed_date(
    &self,
    day: NaiveDate
  ) {
    self.displayed.set(day);
  }

  fn clear(&self) {
    self.events.borrow_mut().clear();
    self.clears.set(self.clears.get() + 1);
  }

  fn insert_events(
    &self,
    events: &[WidgetEvent]
  ) {
    self
      .events
      .borrow_mut()
      .extend_from_slice(events);
  }

  fn navigate(
    &self,
    direction: Navigation
  ) {
    let current = self.displayed.get();
    let shifted = match direction {
      | Navigation::Prev => {
        current.checked_sub_months(
          chrono::Months::new(1)
        )
      }
      | Navigation::Next => {
        current.checked_add_months(
          chrono::Months::new(1)
        )
      }
    };
    self.displayed.set(
      shifted.unwrap_or(current)
    );
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

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
    year: i32,
    month: u32,
    day: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(
      year, month, day
    )
    .expect("valid date")
  }

  fn sample_index() -> EventIndex {
    EventIndex::from_response(
      EventsResponse {
        events: vec![DayEvents {
          date:  "2024-05-03".to_string(),
          items: vec![
            EventItem {
              kind:  EventKind::Task,
              label: "Pay rent".to_string(),
              count: None
            },
            EventItem {
              kind:  EventKind::Task,
              label: "Task".to_string(),
              count: Some(4)
            },
          ]
        }]
      }
    )
  }

  #[test]
  fn same_kind_same_day_ids_are_distinct() {
    let events =
      build_widget_events(&sample_index());
    let ids = events
      .iter()
      .map(|event| event.id.as_str())
      .collect::<BTreeSet<_>>();

    assert_eq!(ids.len(), 2);
    assert!(ids.contains("2024-05-03-task-0"));
    assert!(ids.contains("2024-05-03-task-1"));
    assert_eq!(events[0].title, "Pay rent");
    assert_eq!(events[1].title, "Task · 4");
    assert!(
      events
        .iter()
        .all(|event| event.category == "allday")
    );
  }

  #[test]
  fn repaint_clears_before_inserting() {
    let adapter = CalendarAdapter::new(
      MemoryWidget::new(day(2024, 5, 3))
    );

    adapter.repaint(&sample_index());
    adapter.repaint(&sample_index());
    assert_eq!(adapter.widget().events().len(), 2);

    adapter.repaint(&EventIndex::new());
    assert!(adapter.widget().events().is_empty());
    assert_eq!(adapter.widget().clear_count(), 3);
  }

  #[test]
  fn view_change_detects_month_switches() {
    let fmt = formatter();
    let adapter = CalendarAdapter::new(
      MemoryWidget::new(day(2024, 5, 3))
    );
    let mut session =
      CalendarSession::new(true);

    assert!(matches!(
      adapter.on_view_changed(&mut session, &fmt),
      ViewTransition::MonthChanged(_)
    ));
    adapter.jump_to(day(2024, 5, 28));
    assert!(matches!(
      adapter.on_view_changed(&mut session, &fmt),
      ViewTransition::SameMonth(_)
    ));
    adapter.navigate(Navigation::Next);
    let transition =
      adapter.on_view_changed(&mut session, &fmt);
    assert_eq!(
      transition,
      ViewTransition::MonthChanged(
        MonthRange::containing(day(2024, 6, 1))
      )
    );
  }

  #[test]
  fn options_describe_read_only_month_view()
  {
    let options =
      widget_options(Weekday::Mon, &formatter());

    assert_eq!(options.default_view, "month");
    assert!(options.is_read_only);
    assert!(!options.usage_statistics);
    assert_eq!(options.week.start_day_of_week, 1);
    assert_eq!(options.month.day_names[0], "Dom");
    let ids = options
      .calendars
      .iter()
      .map(|calendar| calendar.id.as_str())
      .collect::<Vec<_>>();
    assert_eq!(
      ids,
      vec![
        "task",
        "planner",
        "subscription",
        "transaction",
        "routine"
      ]
    );
  }
}
