use dashcal_shared::EventKind;

use crate::kinds::chip_class;

/// One line of a panel list: either a
/// labelled chip with an optional count,
/// or the panel's empty-state message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelRow {
  Entry {
    kind:  EventKind,
    label: String,
    count: Option<u64>
  },
  Empty {
    message: String
  }
}

impl PanelRow {
  pub fn is_empty_state(&self) -> bool {
    matches!(self, PanelRow::Empty { .. })
  }

  pub fn chip_class(
    &self
  ) -> Option<String> {
    match self {
      | PanelRow::Entry { kind, .. } => {
        Some(chip_class(*kind))
      }
      | PanelRow::Empty { .. } => None
    }
  }

  /// Text of the count cell; blank when
  /// there is no count.
  pub fn count_text(&self) -> String {
    match self {
      | PanelRow::Entry {
        count: Some(count),
        ..
      } => count.to_string(),
      | _ => String::new()
    }
  }

  pub fn text(&self) -> &str {
    match self {
      | PanelRow::Entry { label, .. } => {
        label
      }
      | PanelRow::Empty { message } => {
        message
      }
    }
  }
}
