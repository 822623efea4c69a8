use std::time::Duration;

use anyhow::Context;
use dashcal_core::fetcher::parse_events_body;
use dashcal_core::{EventSource, FetchError, MonthRange};
use dashcal_shared::EventsResponse;
use reqwest::Url;
use reqwest::header::COOKIE;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Reads the events endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpEventSource {
    client: reqwest::Client,
    base: Url,
    endpoint: String,
    cookie: Option<String>,
}

impl HttpEventSource {
    pub fn new(base_url: &str, endpoint: &str, cookie: Option<String>) -> anyhow::Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("invalid base url: {base_url}"))?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            client,
            base,
            endpoint: endpoint.to_string(),
            cookie,
        })
    }

    pub fn url_for(&self, range: &MonthRange) -> Result<Url, FetchError> {
        self.base
            .join(&range.request_url(&self.endpoint))
            .map_err(|err| FetchError::Transport(err.to_string()))
    }
}

impl EventSource for HttpEventSource {
    async fn fetch_events(&self, range: &MonthRange) -> Result<EventsResponse, FetchError> {
        let url = self.url_for(range)?;
        tracing::debug!(url = %url, "fetching calendar events");

        let mut request = self.client.get(url);
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        parse_events_body(&body)
    }
}
