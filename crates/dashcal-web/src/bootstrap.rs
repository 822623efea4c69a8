use std::rc::Rc;

use dashcal_core::CalendarConfig;
use dashcal_core::config::MountIds;
use dashcal_core::locale::Messages;
use web_sys::{
  Document,
  Element
};

use crate::app::{
  DashboardCalendar,
  DashboardProps
};
use crate::widget::calendar_constructor;

const CALENDAR_CONFIG_TOML: &str =
  include_str!("../assets/calendar.toml");
const ROOT_ID: &str = "dashcal-root";

/// Host-page elements, looked up once.
/// Only `calendar` is required.
#[derive(Debug, Clone, PartialEq)]
pub struct Mounts {
  pub calendar:     Element,
  pub month_label:  Option<Element>,
  pub detail_date:  Option<Element>,
  pub detail_list:  Option<Element>,
  pub month_list:   Option<Element>,
  pub prev_button:  Option<Element>,
  pub next_button:  Option<Element>,
  pub today_button: Option<Element>
}

impl Mounts {
  pub fn locate(
    document: &Document,
    ids: &MountIds
  ) -> Option<Self> {
    let find = |id: &str| {
      let element =
        document.get_element_by_id(id);
      if element.is_none() {
        tracing::debug!(
          id,
          "optional calendar element missing"
        );
      }
      element
    };

    Some(Self {
      calendar:     document
        .get_element_by_id(&ids.calendar)?,
      month_label:  find(&ids.month_label),
      detail_date:  find(&ids.detail_date),
      detail_list:  find(&ids.detail_list),
      month_list:   find(&ids.month_list),
      prev_button:  find(&ids.prev_button),
      next_button:  find(&ids.next_button),
      today_button: find(&ids.today_button)
    })
  }

  /// Empties the panels Yew renders into.
  fn clear_panels(&self) {
    for element in [
      &self.month_label,
      &self.detail_date,
      &self.detail_list,
      &self.month_list
    ]
    .into_iter()
    .flatten()
    {
      element.set_inner_html("");
    }
  }
}

/// Static fallback shown in place of the
/// widget.
pub fn render_unavailable(
  mount: &Element,
  messages: &Messages
) {
  mount.set_inner_html(&format!(
    "<div class=\"calendar-empty\">{}</div>",
    messages.unavailable
  ));
}

/// Runs once the document is ready.
pub fn boot() {
  let Some(document) = web_sys::window()
    .and_then(|window| window.document())
  else {
    tracing::error!("no document; calendar not started");
    return;
  };

  let config = CalendarConfig::load_or_default(
    CALENDAR_CONFIG_TOML,
    "assets/calendar.toml"
  );
  let Some(mounts) =
    Mounts::locate(&document, &config.mounts)
  else {
    tracing::warn!(
      id = %config.mounts.calendar,
      "calendar mount missing; nothing to do"
    );
    return;
  };

  if calendar_constructor().is_none() {
    tracing::warn!(
      "tui.Calendar not loaded; showing fallback"
    );
    render_unavailable(
      &mounts.calendar,
      config.language().messages()
    );
    return;
  }

  let Some(root) = yew_root(&document) else {
    tracing::error!(
      "could not create the dashboard root"
    );
    render_unavailable(
      &mounts.calendar,
      config.language().messages()
    );
    return;
  };

  mounts.clear_panels();
  let props = DashboardProps {
    mounts: Rc::new(mounts),
    config: Rc::new(config)
  };
  yew::Renderer::<DashboardCalendar>::with_root_and_props(
    root, props
  )
  .render();
}

/// Hidden element the Yew tree lives in;
/// all visible output goes through portals.
fn yew_root(
  document: &Document
) -> Option<Element> {
  if let Some(existing) =
    document.get_element_by_id(ROOT_ID)
  {
    return Some(existing);
  }
  let root =
    document.create_element("div").ok()?;
  root.set_id(ROOT_ID);
  root
    .set_attribute("hidden", "")
    .ok()?;
  document
    .body()?
    .append_child(&root)
    .ok()?;
  Some(root)
}
