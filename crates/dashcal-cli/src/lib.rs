pub mod cli;
pub mod http;
pub mod render;

use std::cell::RefCell;
use std::ffi::OsString;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use dashcal_core::{
    CalendarConfig, Dashboard, DateInput, EventSource, FetchOutcome, MemoryWidget, MonthKey,
    load_month,
};
use tracing::{debug, info, warn};

use crate::cli::{PreviewCli, init_tracing};
use crate::http::HttpEventSource;
use crate::render::{Preview, Renderer};

pub fn run(args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = PreviewCli::try_parse_from(args)?;
    init_tracing(cli.verbose, cli.quiet)?;

    let config = match &cli.config {
        Some(path) => CalendarConfig::load_file(path)?,
        None => CalendarConfig::default(),
    };
    let source = HttpEventSource::new(&cli.base_url, &config.endpoint, cli.cookie.clone())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let preview = runtime.block_on(build_preview(config, &source, cli.month, cli.day.clone()))?;

    let renderer = Renderer::for_stdout(cli.no_color);
    let mut stdout = std::io::stdout().lock();
    renderer
        .print_preview(&mut stdout, &preview)
        .context("failed to write preview")?;
    Ok(())
}

/// Boots a dashboard against an in-memory widget, performs the first
/// month read and collects what each panel would display.
pub async fn build_preview<S: EventSource>(
    config: CalendarConfig,
    source: &S,
    month: Option<MonthKey>,
    day: Option<String>,
) -> anyhow::Result<Preview> {
    let formatter = config.formatter();
    let today = formatter.normalize(&DateInput::Missing).date_naive();
    let displayed = match month {
        Some(key) => NaiveDate::from_ymd_opt(key.year, key.month, 1)
            .with_context(|| format!("month out of range: {key}"))?,
        None => today,
    };

    let dashboard = RefCell::new(Dashboard::new(MemoryWidget::new(displayed), config));
    dashboard.borrow_mut().signals_mut().subscribe_all(|signal| {
        debug!(kind = ?signal.kind(), "dashboard signal");
    });

    let ticket = dashboard.borrow_mut().boot();
    let failure = match load_month(&dashboard, source, ticket).await {
        FetchOutcome::Applied { days, items } => {
            info!(days, items, month = %ticket.range.key(), "calendar events loaded");
            None
        }
        FetchOutcome::Cleared(err) => {
            warn!(error = %err, "calendar events unavailable");
            let unavailable = dashboard.borrow().formatter().messages().unavailable;
            Some(format!("{unavailable} ({err})"))
        }
        FetchOutcome::Discarded => None,
    };

    let detail_day = match day {
        Some(raw) => DateInput::from(raw),
        None => DateInput::Day(today),
    };

    let mut board = dashboard.borrow_mut();
    let detail = board.select_day(detail_day);
    Ok(Preview {
        month_label: board.month_label(),
        summary: board.month_summary(),
        events: board.widget().events(),
        detail,
        failure,
    })
}
