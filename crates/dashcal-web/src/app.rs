use std::rc::Rc;

use dashcal_core::{
  CalendarConfig,
  PanelRow,
  Signal
};
use yew::{
  Html,
  Properties,
  Reducible,
  create_portal,
  function_component,
  html,
  use_effect_with,
  use_reducer
};

use crate::bootstrap::{
  Mounts,
  render_unavailable
};
use crate::components::PanelRows;
use crate::controller::Controller;

/// What the four side panels show. Fed
/// exclusively by dashboard signals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
  pub month_label:  String,
  pub detail_label: String,
  pub detail_rows:  Vec<PanelRow>,
  pub summary:      Vec<PanelRow>
}

impl Reducible for PanelState {
  type Action = Signal;

  fn reduce(
    self: Rc<Self>,
    action: Signal
  ) -> Rc<Self> {
    let mut next = (*self).clone();
    match action {
      | Signal::ViewChanged {
        month_label,
        ..
      } => {
        if next.month_label == month_label {
          return self;
        }
        next.month_label = month_label;
      }
      | Signal::DaySelected(detail)
      | Signal::EventSelected(detail) => {
        next.detail_label = detail.label;
        next.detail_rows = detail.rows;
      }
      | Signal::FetchResolved {
        summary,
        ..
      }
      | Signal::FetchFailed {
        summary,
        ..
      } => {
        next.summary = summary;
      }
    }
    Rc::new(next)
  }
}

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
  pub mounts: Rc<Mounts>,
  pub config: Rc<CalendarConfig>
}

#[function_component(DashboardCalendar)]
pub fn dashboard_calendar(
  props: &DashboardProps
) -> Html {
  let panels =
    use_reducer(PanelState::default);

  {
    let dispatcher = panels.dispatcher();
    let mounts = props.mounts.clone();
    let config = props.config.clone();
    use_effect_with((), move |_| {
      let controller = match Controller::start(
        &mounts,
        (*config).clone(),
        dispatcher
      ) {
        | Ok(controller) => Some(controller),
        | Err(err) => {
          tracing::error!(
            error = ?err,
            "calendar widget construction failed"
          );
          render_unavailable(
            &mounts.calendar,
            config.language().messages()
          );
          None
        }
      };
      move || drop(controller)
    });
  }

  let mounts = &props.mounts;
  let text_portal =
    |host: &Option<web_sys::Element>,
     text: &str| {
      host.clone().map(|host| {
        create_portal(
          html! { { text.to_string() } },
          host
        )
      })
    };

  // The detail panel needs both its
  // elements.
  let detail = match (
    &mounts.detail_date,
    &mounts.detail_list
  ) {
    | (Some(date), Some(list)) => {
      Some((date.clone(), list.clone()))
    }
    | _ => None
  };

  html! {
      <>
          { text_portal(&mounts.month_label, &panels.month_label) }
          {
              for detail.map(|(date, list)| html! {
                  <>
                      { create_portal(html! { { panels.detail_label.clone() } }, date) }
                      {
                          create_portal(
                              html! { <PanelRows rows={panels.detail_rows.clone()} /> },
                              list,
                          )
                      }
                  </>
              })
          }
          {
              for mounts.month_list.clone().map(|list| create_portal(
                  html! { <PanelRows rows={panels.summary.clone()} /> },
                  list,
              ))
          }
      </>
  }
}

#[cfg(test)]
mod tests {
  use dashcal_core::{
    DayDetail,
    MonthKey,
    MonthRange
  };
  use dashcal_shared::EventKind;

  use super::*;

  fn may() -> MonthRange {
    MonthRange::for_key(
      MonthKey::parse("2024-05")
        .expect("month key")
    )
  }

  #[test]
  fn view_changes_update_the_label_only()
  {
    let state = Rc::new(PanelState::default());
    let next = state.reduce(
      Signal::ViewChanged {
        month_label:   "maggio 2024".into(),
        range:         may(),
        month_changed: true
      }
    );
    assert_eq!(next.month_label, "maggio 2024");
    assert!(next.summary.is_empty());
    assert!(next.detail_rows.is_empty());
  }

  #[test]
  fn selections_replace_the_detail() {
    let state = Rc::new(PanelState::default());
    let next = state.reduce(
      Signal::EventSelected(DayDetail {
        iso_day: "2024-05-03".into(),
        label:   "venerdì 03 maggio".into(),
        rows:    vec![PanelRow::Entry {
          kind:  EventKind::Task,
          label: "Pay rent".into(),
          count: None
        }]
      })
    );
    assert_eq!(
      next.detail_label,
      "venerdì 03 maggio"
    );
    assert_eq!(next.detail_rows.len(), 1);
  }

  #[test]
  fn failed_fetch_still_replaces_summary() {
    let state = Rc::new(PanelState {
      summary: vec![PanelRow::Entry {
        kind:  EventKind::Routine,
        label: "Routine".into(),
        count: Some(2)
      }],
      ..PanelState::default()
    });
    let next = state.reduce(
      Signal::FetchFailed {
        generation: 2,
        summary:    vec![PanelRow::Empty {
          message: "Nessun evento nel mese \
                    selezionato."
            .into()
        }],
        error:      "status 500".into()
      }
    );
    assert_eq!(next.summary.len(), 1);
    assert!(next.summary[0].is_empty_state());
  }
}
