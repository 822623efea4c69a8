use dashcal_shared::EventKind;

use crate::locale::Language;

/// Display name and color of one event
/// kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindStyle {
  pub kind:    EventKind,
  pub color:   &'static str,
  pub name_it: &'static str,
  pub name_en: &'static str
}

impl KindStyle {
  pub fn name(
    &self,
    language: Language
  ) -> &'static str {
    match language {
      | Language::Italian => self.name_it,
      | Language::English => self.name_en
    }
  }
}

/// Kept in the same order as
/// `EventKind::ALL`.
pub const KIND_STYLES: [KindStyle; 5] = [
  KindStyle {
    kind:    EventKind::Task,
    color:   "#1971c2",
    name_it: "Task",
    name_en: "Tasks"
  },
  KindStyle {
    kind:    EventKind::Planner,
    color:   "#2f9e44",
    name_it: "Planner",
    name_en: "Planner"
  },
  KindStyle {
    kind:    EventKind::Subscription,
    color:   "#f08c00",
    name_it: "Abbonamenti",
    name_en: "Subscriptions"
  },
  KindStyle {
    kind:    EventKind::Transaction,
    color:   "#7048e8",
    name_it: "Transazioni",
    name_en: "Transactions"
  },
  KindStyle {
    kind:    EventKind::Routine,
    color:   "#0f766e",
    name_it: "Routine",
    name_en: "Routines"
  }
];

pub fn kind_style(
  kind: EventKind
) -> &'static KindStyle {
  let slot = match kind {
    | EventKind::Task => 0,
    | EventKind::Planner => 1,
    | EventKind::Subscription => 2,
    | EventKind::Transaction => 3,
    | EventKind::Routine => 4
  };
  &KIND_STYLES[slot]
}

pub fn chip_class(
  kind: EventKind
) -> String {
  format!(
    "event-chip event-{}",
    kind.as_key()
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn table_matches_priority_order() {
    let table_order = KIND_STYLES
      .iter()
      .map(|style| style.kind)
      .collect::<Vec<_>>();
    assert_eq!(
      table_order,
      EventKind::ALL.to_vec()
    );

    for kind in EventKind::ALL {
      assert_eq!(kind_style(kind).kind, kind);
    }
  }

  #[test]
  fn names_are_localized() {
    let style =
      kind_style(EventKind::Subscription);
    assert_eq!(
      style.name(Language::Italian),
      "Abbonamenti"
    );
    assert_eq!(
      style.name(Language::English),
      "Subscriptions"
    );
    assert_eq!(
      chip_class(style.kind),
      "event-chip event-subscription"
    );
  }
}
