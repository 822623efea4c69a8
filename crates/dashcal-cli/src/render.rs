use std::io::{self, IsTerminal, Write};

use dashcal_core::kinds::kind_style;
use dashcal_core::{DayDetail, PanelRow};
use dashcal_shared::WidgetEvent;

/// Everything the dashboard would show for one month.
#[derive(Debug, Clone)]
pub struct Preview {
    pub month_label: String,
    pub summary: Vec<PanelRow>,
    pub events: Vec<WidgetEvent>,
    pub detail: DayDetail,
    pub failure: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn for_stdout(disable_color: bool) -> Self {
        Self::new(!disable_color && io::stdout().is_terminal())
    }

    #[tracing::instrument(skip_all)]
    pub fn print_preview<W: Write>(&self, out: &mut W, preview: &Preview) -> io::Result<()> {
        writeln!(out, "{}", self.bold(&preview.month_label))?;
        if let Some(failure) = &preview.failure {
            writeln!(out, "{}", self.paint(failure, "31"))?;
        }
        writeln!(out)?;

        self.print_rows(out, &preview.summary)?;
        writeln!(out)?;

        for event in &preview.events {
            writeln!(out, "  {}  {}", event.start, self.kind_text(&event.title, &event.raw))?;
        }
        if !preview.events.is_empty() {
            writeln!(out)?;
        }

        writeln!(out, "{}", self.bold(&preview.detail.label))?;
        self.print_rows(out, &preview.detail.rows)?;
        Ok(())
    }

    fn print_rows<W: Write>(&self, out: &mut W, rows: &[PanelRow]) -> io::Result<()> {
        let width = rows
            .iter()
            .map(|row| row.text().chars().count())
            .max()
            .unwrap_or(0);

        for row in rows {
            match row {
                PanelRow::Entry { kind, label, .. } => {
                    let padded = format!("{label:<width$}");
                    let chip = self.kind_color(*kind, &padded);
                    writeln!(out, "  {chip}  {}", row.count_text())?;
                }
                PanelRow::Empty { message } => {
                    writeln!(out, "  {}", self.paint(message, "2"))?;
                }
            }
        }
        Ok(())
    }

    fn kind_text(&self, text: &str, item: &dashcal_shared::EventItem) -> String {
        self.kind_color(item.kind, text)
    }

    fn kind_color(&self, kind: dashcal_shared::EventKind, text: &str) -> String {
        match hex_rgb(kind_style(kind).color) {
            Some((r, g, b)) => self.paint(text, &format!("38;2;{r};{g};{b}")),
            None => text.to_string(),
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(text, "1")
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.color {
            format!("\u{1b}[{code}m{text}\u{1b}[0m")
        } else {
            text.to_string()
        }
    }
}

fn hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(hex.get(at..at + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
