use std::cell::RefCell;

use chrono::Utc;
use dashcal_shared::EventsResponse;

use crate::adapter::{
  CalendarAdapter,
  CalendarWidget,
  Navigation,
  ViewTransition
};
use crate::config::CalendarConfig;
use crate::date::{
  DateInput,
  parse_iso_day
};
use crate::detail::{
  DayDetail,
  render_day_detail
};
use crate::fetcher::{
  EventSource,
  FetchError,
  FetchOutcome,
  FetchTicket,
  apply_fetch_result
};
use crate::index::EventIndex;
use crate::locale::LocaleFormatter;
use crate::range::MonthRange;
use crate::rows::PanelRow;
use crate::session::CalendarSession;
use crate::signals::{
  Signal,
  SignalBus
};
use crate::summary::render_month_summary;

/// Ties the session, the widget adapter
/// and the renderers together. Every state
/// change is announced on the signal bus.
///
/// Handlers registered on the bus run while
/// the dashboard is borrowed; they must not
/// call back into it.
#[derive(Debug)]
pub struct Dashboard<W> {
  config:    CalendarConfig,
  formatter: LocaleFormatter,
  session:   CalendarSession,
  adapter:   CalendarAdapter<W>,
  signals:   SignalBus
}

impl<W: CalendarWidget> Dashboard<W> {
  pub fn new(
    widget: W,
    config: CalendarConfig
  ) -> Self {
    Self {
      formatter: config.formatter(),
      session: CalendarSession::new(
        config.discard_stale_responses
      ),
      adapter: CalendarAdapter::new(widget),
      signals: SignalBus::new(),
      config
    }
  }

  pub fn config(&self) -> &CalendarConfig {
    &self.config
  }

  pub fn formatter(
    &self
  ) -> &LocaleFormatter {
    &self.formatter
  }

  pub fn session(&self) -> &CalendarSession {
    &self.session
  }

  pub fn index(&self) -> &EventIndex {
    self.session.index()
  }

  pub fn widget(&self) -> &W {
    self.adapter.widget()
  }

  pub fn signals_mut(
    &mut self
  ) -> &mut SignalBus {
    &mut self.signals
  }

  /// First pass after the widget exists:
  /// syncs the month label, issues the
  /// first fetch and shows today's detail.
  /// The caller performs the returned
  /// fetch.
  pub fn boot(&mut self) -> FetchTicket {
    let range = self
      .adapter
      .current_range(&self.formatter);
    self.session.remember_month(range.key());
    self.publish_month_label(range, true);

    let ticket =
      self.session.issue_ticket(range);
    tracing::info!(
      month = %range.key(),
      generation = ticket.generation,
      "calendar booted"
    );

    let today = DateInput::Date(Utc::now());
    let detail = self.show_detail(&today);
    self
      .signals
      .publish(&Signal::DaySelected(detail));
    ticket
  }

  /// Handles the widget's view-changed
  /// notification. Returns a ticket only
  /// when the displayed month changed.
  pub fn view_changed(
    &mut self
  ) -> Option<FetchTicket> {
    let transition = self
      .adapter
      .on_view_changed(
        &mut self.session,
        &self.formatter
      );

    match transition {
      | ViewTransition::SameMonth(range) => {
        self.publish_month_label(range, false);
        None
      }
      | ViewTransition::MonthChanged(
        range
      ) => {
        self.publish_month_label(range, true);
        let ticket =
          self.session.issue_ticket(range);
        tracing::info!(
          month = %range.key(),
          generation = ticket.generation,
          "month changed; fetching events"
        );
        Some(ticket)
      }
    }
  }

  /// Day-name click or date selection.
  pub fn select_day(
    &mut self,
    date: DateInput
  ) -> DayDetail {
    let detail = self.show_detail(&date);
    self.signals.publish(
      &Signal::DaySelected(detail.clone())
    );
    detail
  }

  /// Click on a single widget event.
  pub fn select_event(
    &mut self,
    date: DateInput
  ) -> DayDetail {
    let detail = self.show_detail(&date);
    self.signals.publish(
      &Signal::EventSelected(
        detail.clone()
      )
    );
    detail
  }

  pub fn navigate(
    &self,
    direction: Navigation
  ) {
    self.adapter.navigate(direction);
  }

  pub fn jump_to_today(&self) {
    let today = self
      .formatter
      .normalize(&DateInput::Missing)
      .date_naive();
    self.adapter.jump_to(today);
  }

  /// Applies a resolved fetch, then
  /// repaints the summary, the widget and
  /// the selected day's detail unless the
  /// response was stale.
  pub fn complete_fetch(
    &mut self,
    ticket: FetchTicket,
    result: Result<
      EventsResponse,
      FetchError
    >
  ) -> FetchOutcome {
    let outcome = apply_fetch_result(
      &mut self.session,
      ticket,
      result
    );

    let signal = match &outcome {
      | FetchOutcome::Discarded => None,
      | FetchOutcome::Applied { .. } => {
        Some(Signal::FetchResolved {
          generation: ticket.generation,
          summary:    self.month_summary()
        })
      }
      | FetchOutcome::Cleared(err) => {
        Some(Signal::FetchFailed {
          generation: ticket.generation,
          summary:    self.month_summary(),
          error:      err.to_string()
        })
      }
    };
    let Some(signal) = signal else {
      return outcome;
    };

    self.adapter.repaint(self.session.index());
    self.signals.publish(&signal);

    if let Some(day) =
      self.session.selected_day()
    {
      let detail =
        self.day_detail(&DateInput::Day(day));
      self
        .signals
        .publish(&Signal::DaySelected(detail));
    }
    outcome
  }

  pub fn month_summary(
    &self
  ) -> Vec<PanelRow> {
    render_month_summary(
      self.session.index(),
      &self.formatter
    )
  }

  pub fn day_detail(
    &self,
    date: &DateInput
  ) -> DayDetail {
    render_day_detail(
      self.session.index(),
      date,
      &self.formatter
    )
  }

  pub fn month_label(&self) -> String {
    self.formatter.month_label(
      &self.adapter.displayed(&self.formatter)
    )
  }

  /// Forgets the index and the month key
  /// and clears the widget. Registered
  /// handlers stay.
  pub fn reset(&mut self) {
    self.session.reset();
    self.adapter.repaint(self.session.index());
  }

  /// Renders the detail for `date` and
  /// remembers its day for later repaints.
  fn show_detail(
    &mut self,
    date: &DateInput
  ) -> DayDetail {
    let detail = self.day_detail(date);
    if let Some(day) =
      parse_iso_day(&detail.iso_day)
    {
      self.session.select_day(day);
    }
    detail
  }

  fn publish_month_label(
    &mut self,
    range: MonthRange,
    month_changed: bool
  ) {
    let signal = Signal::ViewChanged {
      month_label: self.month_label(),
      range,
      month_changed
    };
    self.signals.publish(&signal);
  }
}

/// Performs the read for `ticket` and hands
/// the result to the dashboard. The
/// dashboard is not borrowed while the
/// read is pending.
pub async fn load_month<W, S>(
  dashboard: &RefCell<Dashboard<W>>,
  source: &S,
  ticket: FetchTicket
) -> FetchOutcome
where
  W: CalendarWidget,
  S: EventSource
{
  tracing::debug!(
    generation = ticket.generation,
    start = %ticket.range.start_iso(),
    end = %ticket.range.end_iso(),
    "requesting calendar events"
  );
  let result =
    source.fetch_events(&ticket.range).await;
  dashboard
    .borrow_mut()
    .complete_fetch(ticket, result)
}
