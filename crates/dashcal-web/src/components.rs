use dashcal_core::PanelRow;
use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct PanelRowsProps {
  pub rows: Vec<PanelRow>
}

/// Chip rows for the detail and summary
/// lists.
#[function_component(PanelRows)]
pub fn panel_rows(
  props: &PanelRowsProps
) -> Html {
  html! {
      <>
          {
              for props.rows.iter().map(|row| match row.chip_class() {
                  Some(chip) => html! {
                      <div class="calendar-event-row">
                          <span class={chip}>{ row.text().to_string() }</span>
                          <span class="calendar-event-count">{ row.count_text() }</span>
                      </div>
                  },
                  None => html! {
                      <div class="calendar-empty">{ row.text().to_string() }</div>
                  }
              })
          }
      </>
  }
}
