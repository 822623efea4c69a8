mod api;
mod app;
mod bootstrap;
mod components;
mod controller;
mod widget;

use gloo::events::EventListener;

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    "starting dashboard calendar"
  );

  let Some(document) = web_sys::window()
    .and_then(|window| window.document())
  else {
    tracing::error!(
      "no document; calendar not started"
    );
    return;
  };

  if still_loading(&document.ready_state())
  {
    EventListener::once(
      &document,
      "DOMContentLoaded",
      |_| bootstrap::boot()
    )
    .forget();
  } else {
    bootstrap::boot();
  }
}

/// `document.readyState` is `"loading"`
/// until the parser finishes.
fn still_loading(ready_state: &str) -> bool {
  ready_state == "loading"
}

#[cfg(test)]
mod tests {
  use super::still_loading;

  #[test]
  fn only_the_loading_state_waits() {
    assert!(still_loading("loading"));
    assert!(!still_loading("interactive"));
    assert!(!still_loading("complete"));
  }
}
