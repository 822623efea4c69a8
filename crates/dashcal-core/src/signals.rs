use crate::detail::DayDetail;
use crate::range::MonthRange;
use crate::rows::PanelRow;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash,
)]
pub enum SignalKind {
  ViewChanged,
  DaySelected,
  EventSelected,
  FetchResolved,
  FetchFailed
}

/// Notification published by the
/// dashboard after each state change,
/// carrying what the panels need to
/// repaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
  ViewChanged {
    month_label:   String,
    range:         MonthRange,
    month_changed: bool
  },
  DaySelected(DayDetail),
  EventSelected(DayDetail),
  FetchResolved {
    generation: u64,
    summary:    Vec<PanelRow>
  },
  FetchFailed {
    generation: u64,
    summary:    Vec<PanelRow>,
    error:      String
  }
}

impl Signal {
  pub fn kind(&self) -> SignalKind {
    match self {
      | Signal::ViewChanged { .. } => {
        SignalKind::ViewChanged
      }
      | Signal::DaySelected(_) => {
        SignalKind::DaySelected
      }
      | Signal::EventSelected(_) => {
        SignalKind::EventSelected
      }
      | Signal::FetchResolved { .. } => {
        SignalKind::FetchResolved
      }
      | Signal::FetchFailed { .. } => {
        SignalKind::FetchFailed
      }
    }
  }
}

type Handler = Box<dyn FnMut(&Signal)>;

/// Synchronous handler registry. Handlers
/// run in registration order, inside the
/// call to `publish`.
#[derive(Default)]
pub struct SignalBus {
  handlers: Vec<(Option<SignalKind>, Handler)>
}

impl SignalBus {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn subscribe<F>(
    &mut self,
    kind: SignalKind,
    handler: F
  ) where
    F: FnMut(&Signal) + 'static
  {
    self
      .handlers
      .push((Some(kind), Box::new(handler)));
  }

  pub fn subscribe_all<F>(
    &mut self,
    handler: F
  ) where
    F: FnMut(&Signal) + 'static
  {
    self
      .handlers
      .push((None, Box::new(handler)));
  }

  /// Returns how many handlers ran.
  pub fn publish(
    &mut self,
    signal: &Signal
  ) -> usize {
    let kind = signal.kind();
    let mut delivered = 0;
    for (filter, handler) in
      &mut self.handlers
    {
      if filter.is_none_or(|wanted| {
        wanted == kind
      }) {
        handler(signal);
        delivered += 1;
      }
    }
    tracing::trace!(
      ?kind,
      delivered,
      "signal published"
    );
    delivered
  }

  pub fn clear(&mut self) {
    self.handlers.clear();
  }
}

impl std::fmt::Debug for SignalBus {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>
  ) -> std::fmt::Result {
    f.debug_struct("SignalBus")
      .field("handlers", &self.handlers.len())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;
  use std::rc::Rc;

  use super::*;

  fn failed() -> Signal {
    Signal::FetchFailed {
      generation: 1,
      summary:    vec![],
      error:      "boom".to_string()
    }
  }

  #[test]
  fn handlers_run_in_registration_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut bus = SignalBus::new();

    for name in ["first", "second", "third"] {
      let log = Rc::clone(&log);
      bus.subscribe_all(move |_| {
        log.borrow_mut().push(name);
      });
    }

    assert_eq!(bus.publish(&failed()), 3);
    assert_eq!(
      *log.borrow(),
      vec!["first", "second", "third"]
    );
  }

  #[test]
  fn kind_filters_are_respected() {
    let hits = Rc::new(RefCell::new(0));
    let mut bus = SignalBus::new();
    {
      let hits = Rc::clone(&hits);
      bus.subscribe(
        SignalKind::FetchResolved,
        move |_| *hits.borrow_mut() += 1
      );
    }

    assert_eq!(bus.publish(&failed()), 0);
    assert_eq!(
      bus.publish(&Signal::FetchResolved {
        generation: 2,
        summary:    vec![]
      }),
      1
    );
    assert_eq!(*hits.borrow(), 1);
  }
}
