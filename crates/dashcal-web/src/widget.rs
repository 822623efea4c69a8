use chrono::{
  Datelike,
  NaiveDate
};
use dashcal_core::{
  CalendarWidget,
  DateInput,
  Navigation
};
use dashcal_shared::{
  WidgetEvent,
  WidgetOptions
};
use js_sys::{
  Array,
  Function,
  Reflect
};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;
use web_sys::Element;

#[wasm_bindgen]
extern "C" {
  /// An instance of `tui.Calendar`.
  #[wasm_bindgen(extends = js_sys::Object)]
  #[derive(Debug, Clone)]
  pub type ToastCalendar;

  #[wasm_bindgen(method, catch, js_name = getDate)]
  fn js_get_date(
    this: &ToastCalendar
  ) -> Result<JsValue, JsValue>;

  #[wasm_bindgen(method, catch, js_name = setDate)]
  fn js_set_date(
    this: &ToastCalendar,
    date: &JsValue
  ) -> Result<(), JsValue>;

  #[wasm_bindgen(method, catch, js_name = clear)]
  fn js_clear(
    this: &ToastCalendar
  ) -> Result<(), JsValue>;

  #[wasm_bindgen(method, catch, js_name = createEvents)]
  fn js_create_events(
    this: &ToastCalendar,
    events: &JsValue
  ) -> Result<(), JsValue>;

  #[wasm_bindgen(method, catch, js_name = prev)]
  fn js_prev(
    this: &ToastCalendar
  ) -> Result<(), JsValue>;

  #[wasm_bindgen(method, catch, js_name = next)]
  fn js_next(
    this: &ToastCalendar
  ) -> Result<(), JsValue>;

  #[wasm_bindgen(method, catch, js_name = on)]
  fn js_on(
    this: &ToastCalendar,
    name: &str,
    handler: &Function
  ) -> Result<(), JsValue>;
}

/// Widget notifications the dashboard
/// listens to.
pub const AFTER_RENDER: &str =
  "afterRender";
pub const CLICK_DAYNAME: &str =
  "clickDayname";
pub const SELECT_DATE_TIME: &str =
  "selectDateTime";
pub const CLICK_EVENT: &str =
  "clickEvent";

/// Returns the `window.tui.Calendar`
/// constructor when the library is loaded.
pub fn calendar_constructor()
-> Option<Function> {
  let window = web_sys::window()?;
  let tui =
    Reflect::get(&window, &"tui".into())
      .ok()
      .filter(|value| value.is_object())?;
  Reflect::get(&tui, &"Calendar".into())
    .ok()?
    .dyn_into::<Function>()
    .ok()
}

impl ToastCalendar {
  /// `new tui.Calendar(mount, options)`.
  pub fn construct(
    constructor: &Function,
    mount: &Element,
    options: &WidgetOptions
  ) -> Result<Self, JsValue> {
    let options =
      to_js(options).map_err(|err| {
        JsValue::from_str(&err.to_string())
      })?;
    let args = Array::of2(mount, &options);
    let instance =
      Reflect::construct(constructor, &args)?;
    Ok(instance.unchecked_into())
  }

  pub fn on(
    &self,
    name: &str,
    handler: &Function
  ) -> Result<(), JsValue> {
    self.js_on(name, handler)
  }
}

impl CalendarWidget for ToastCalendar {
  fn displayed_date(&self) -> DateInput {
    match self.js_get_date() {
      | Ok(value) => date_input_from_js(&value),
      | Err(err) => {
        log_js_error("getDate", &err);
        DateInput::Missing
      }
    }
  }

  fn set_displayed_date(
    &self,
    day: NaiveDate
  ) {
    let date = js_sys::Date::new_with_year_month_day(
      day.year().max(0) as u32,
      day.month0() as i32,
      day.day() as i32
    );
    if let Err(err) = self.js_set_date(&date)
    {
      log_js_error("setDate", &err);
    }
  }

  fn clear(&self) {
    if let Err(err) = self.js_clear() {
      log_js_error("clear", &err);
    }
  }

  fn insert_events(
    &self,
    events: &[WidgetEvent]
  ) {
    let payload = match to_js(events) {
      | Ok(payload) => payload,
      | Err(err) => {
        tracing::error!(
          error = %err,
          count = events.len(),
          "failed encoding widget events"
        );
        return;
      }
    };
    if let Err(err) =
      self.js_create_events(&payload)
    {
      log_js_error("createEvents", &err);
    }
  }

  fn navigate(
    &self,
    direction: Navigation
  ) {
    let (name, result) = match direction {
      | Navigation::Prev => {
        ("prev", self.js_prev())
      }
      | Navigation::Next => {
        ("next", self.js_next())
      }
    };
    if let Err(err) = result {
      log_js_error(name, &err);
    }
  }
}

fn to_js<T: Serialize + ?Sized>(
  value: &T
) -> Result<JsValue, serde_wasm_bindgen::Error>
{
  value.serialize(
    &Serializer::json_compatible()
  )
}

/// Converts whatever the widget hands out
/// (a `Date`, its own `TZDate`, a string)
/// into a `DateInput`.
///
/// The widget works in browser-local days,
/// so date objects become the local
/// calendar day rather than an instant.
pub fn date_input_from_js(
  value: &JsValue
) -> DateInput {
  if value.is_undefined() || value.is_null()
  {
    return DateInput::Missing;
  }
  if let Some(text) = value.as_string() {
    return DateInput::Text(text);
  }
  if let Some(millis) = value.as_f64() {
    let date = js_sys::Date::new(
      &JsValue::from_f64(millis)
    );
    return local_day_of(&date);
  }
  if let Some(date) =
    value.dyn_ref::<js_sys::Date>()
  {
    return local_day_of(date);
  }

  // TZDate exposes the same local getters.
  let parts = ["getFullYear", "getMonth", "getDate"]
    .map(|name| call_number(value, name));
  if let [Some(year), Some(month0), Some(day)] =
    parts
  {
    return day_input(year, month0, day);
  }

  match call_number(value, "getTime") {
    | Some(millis) => {
      let date = js_sys::Date::new(
        &JsValue::from_f64(millis)
      );
      local_day_of(&date)
    }
    | None => {
      tracing::debug!(
        "unrecognized widget date value"
      );
      DateInput::Missing
    }
  }
}

fn local_day_of(
  date: &js_sys::Date
) -> DateInput {
  day_input(
    f64::from(date.get_full_year()),
    f64::from(date.get_month()),
    f64::from(date.get_date())
  )
}

fn call_number(
  value: &JsValue,
  method: &str
) -> Option<f64> {
  Reflect::get(value, &method.into())
    .ok()?
    .dyn_into::<Function>()
    .ok()?
    .call0(value)
    .ok()?
    .as_f64()
}

fn day_input(
  year: f64,
  month0: f64,
  day: f64
) -> DateInput {
  match local_day(year, month0, day) {
    | Some(day) => DateInput::Day(day),
    | None => {
      tracing::debug!(
        year,
        month0,
        day,
        "widget date outside the calendar"
      );
      DateInput::Missing
    }
  }
}

/// Builds a day from JS-style parts:
/// zero-based month, one-based day.
pub fn local_day(
  year: f64,
  month0: f64,
  day: f64
) -> Option<NaiveDate> {
  if ![year, month0, day]
    .iter()
    .all(|part| part.is_finite())
  {
    return None;
  }
  NaiveDate::from_ymd_opt(
    year as i32,
    (month0 as u32).checked_add(1)?,
    day as u32
  )
}

/// Reads `payload[path[0]][path[1]]...` as
/// a date.
pub fn date_at(
  payload: &JsValue,
  path: &[&str]
) -> DateInput {
  let mut current = payload.clone();
  for key in path {
    if !current.is_object() {
      return DateInput::Missing;
    }
    current = Reflect::get(
      &current,
      &JsValue::from_str(key)
    )
    .unwrap_or(JsValue::UNDEFINED);
  }
  date_input_from_js(&current)
}

pub fn log_js_error(
  call: &str,
  err: &JsValue
) {
  tracing::warn!(
    call,
    error = ?err,
    "calendar widget call failed"
  );
}

#[cfg(test)]
mod tests {
  use super::local_day;

  #[test]
  fn js_parts_map_to_the_same_day() {
    assert_eq!(
      local_day(2024.0, 4.0, 3.0),
      chrono::NaiveDate::from_ymd_opt(
        2024, 5, 3
      )
    );
    assert_eq!(
      local_day(2024.0, 5.0, 1.0),
      chrono::NaiveDate::from_ymd_opt(
        2024, 6, 1
      )
    );
  }

  #[test]
  fn nonsense_parts_are_rejected() {
    assert_eq!(
      local_day(f64::NAN, 4.0, 3.0),
      None
    );
    assert_eq!(
      local_day(2024.0, 12.0, 1.0),
      None
    );
    assert_eq!(
      local_day(2024.0, 1.0, 30.0),
      None
    );
  }
}
