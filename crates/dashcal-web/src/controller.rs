use std::cell::RefCell;
use std::rc::Rc;

use dashcal_core::adapter::widget_options;
use dashcal_core::{
  CalendarConfig,
  Dashboard,
  DateInput,
  FetchTicket,
  Navigation,
  load_month
};
use gloo::events::EventListener;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;
use yew::UseReducerDispatcher;

use crate::api::BrowserEventSource;
use crate::app::PanelState;
use crate::bootstrap::Mounts;
use crate::widget::{
  AFTER_RENDER,
  CLICK_DAYNAME,
  CLICK_EVENT,
  SELECT_DATE_TIME,
  ToastCalendar,
  calendar_constructor,
  date_at
};

type SharedDashboard =
  Rc<RefCell<Dashboard<ToastCalendar>>>;

/// Owns the live widget, its JS callbacks
/// and the button listeners. Dropping it
/// detaches the buttons; widget callbacks
/// live as long as the page.
pub struct Controller {
  dashboard: SharedDashboard,
  _buttons:  Vec<EventListener>
}

impl Controller {
  /// Builds the widget inside the calendar
  /// mount, wires every notification and
  /// performs the boot sequence.
  pub fn start(
    mounts: &Mounts,
    config: CalendarConfig,
    panels: UseReducerDispatcher<PanelState>
  ) -> Result<Self, JsValue> {
    let constructor = calendar_constructor()
      .ok_or_else(|| {
        JsValue::from_str(
          "tui.Calendar is not loaded"
        )
      })?;
    let formatter = config.formatter();
    let options = widget_options(
      config.week_start(),
      &formatter
    );
    let widget = ToastCalendar::construct(
      &constructor,
      &mounts.calendar,
      &options
    )?;

    let source = Rc::new(
      BrowserEventSource::new(
        config.endpoint.clone()
      )
    );
    let dashboard: SharedDashboard = Rc::new(
      RefCell::new(Dashboard::new(
        widget.clone(),
        config
      ))
    );
    dashboard
      .borrow_mut()
      .signals_mut()
      .subscribe_all(move |signal| {
        panels.dispatch(signal.clone());
      });

    listen(&widget, AFTER_RENDER, {
      let dashboard = Rc::clone(&dashboard);
      let source = Rc::clone(&source);
      move |_: JsValue| {
        defer_view_changed(&dashboard, &source)
      }
    })?;
    listen(&widget, CLICK_DAYNAME, {
      let dashboard = Rc::clone(&dashboard);
      move |payload: JsValue| {
        defer_select(
          &dashboard,
          date_at(&payload, &["date"]),
          false
        )
      }
    })?;
    listen(&widget, SELECT_DATE_TIME, {
      let dashboard = Rc::clone(&dashboard);
      move |payload: JsValue| {
        let start =
          date_at(&payload, &["start"]);
        if !matches!(start, DateInput::Missing)
        {
          defer_select(&dashboard, start, false);
        }
      }
    })?;
    listen(&widget, CLICK_EVENT, {
      let dashboard = Rc::clone(&dashboard);
      move |payload: JsValue| {
        defer_select(
          &dashboard,
          date_at(&payload, &["event", "start"]),
          true
        )
      }
    })?;

    let mut buttons = Vec::new();
    if let Some(button) = &mounts.prev_button {
      buttons.push(navigation_button(
        button,
        &dashboard,
        Navigation::Prev
      ));
    }
    if let Some(button) = &mounts.next_button {
      buttons.push(navigation_button(
        button,
        &dashboard,
        Navigation::Next
      ));
    }
    if let Some(button) = &mounts.today_button
    {
      let dashboard = Rc::clone(&dashboard);
      let source = Rc::clone(&source);
      buttons.push(EventListener::new(
        button,
        "click",
        move |_| {
          dashboard.borrow().jump_to_today();
          defer_view_changed(&dashboard, &source);
        }
      ));
    }

    let ticket = dashboard.borrow_mut().boot();
    spawn_fetch(&dashboard, &source, ticket);

    Ok(Self {
      dashboard,
      _buttons: buttons
    })
  }
}

impl Drop for Controller {
  fn drop(&mut self) {
    if let Ok(mut dashboard) =
      self.dashboard.try_borrow_mut()
    {
      dashboard.signals_mut().clear();
    }
    tracing::debug!(
      "calendar controller dropped"
    );
  }
}

/// Registers `handler` for a widget
/// notification. The widget keeps the
/// callback for the rest of the page.
fn listen(
  widget: &ToastCalendar,
  name: &str,
  handler: impl FnMut(JsValue) + 'static
) -> Result<(), JsValue> {
  let closure =
    Closure::<dyn FnMut(JsValue)>::new(
      handler
    );
  widget.on(name, closure.as_ref().unchecked_ref())?;
  closure.forget();
  Ok(())
}

fn navigation_button(
  button: &Element,
  dashboard: &SharedDashboard,
  direction: Navigation
) -> EventListener {
  let dashboard = Rc::clone(dashboard);
  EventListener::new(
    button,
    "click",
    move |_| {
      tracing::debug!(
        ?direction,
        "calendar navigation"
      );
      dashboard.borrow().navigate(direction);
    }
  )
}

/// Widget notifications can arrive while
/// the dashboard is mutably borrowed (a
/// repaint triggers `afterRender`), so the
/// work runs on the next tick.
fn defer_view_changed(
  dashboard: &SharedDashboard,
  source: &Rc<BrowserEventSource>
) {
  let dashboard = Rc::clone(dashboard);
  let source = Rc::clone(source);
  spawn_local(async move {
    let ticket =
      dashboard.borrow_mut().view_changed();
    let Some(ticket) = ticket else {
      return;
    };
    let outcome =
      load_month(&*dashboard, source.as_ref(), ticket)
        .await;
    tracing::debug!(
      generation = ticket.generation,
      ?outcome,
      "month fetch settled"
    );
  });
}

fn defer_select(
  dashboard: &SharedDashboard,
  date: DateInput,
  from_event: bool
) {
  let dashboard = Rc::clone(dashboard);
  spawn_local(async move {
    let mut dashboard = dashboard.borrow_mut();
    if from_event {
      dashboard.select_event(date);
    } else {
      dashboard.select_day(date);
    }
  });
}

fn spawn_fetch(
  dashboard: &SharedDashboard,
  source: &Rc<BrowserEventSource>,
  ticket: FetchTicket
) {
  let dashboard = Rc::clone(dashboard);
  let source = Rc::clone(source);
  spawn_local(async move {
    let outcome =
      load_month(&*dashboard, source.as_ref(), ticket)
        .await;
    tracing::debug!(
      generation = ticket.generation,
      ?outcome,
      "initial fetch settled"
    );
  });
}
