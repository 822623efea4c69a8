use dashcal_core::fetcher::parse_events_body;
use dashcal_core::{EventSource, FetchError, MonthRange};
use dashcal_shared::EventsResponse;
use gloo::net::http::Request;
use web_sys::RequestCredentials;

/// Same-origin `fetch` against the events endpoint.
#[derive(Debug, Clone)]
pub struct BrowserEventSource {
    endpoint: String,
}

impl BrowserEventSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl EventSource for BrowserEventSource {
    async fn fetch_events(&self, range: &MonthRange) -> Result<EventsResponse, FetchError> {
        let url = range.request_url(&self.endpoint);
        let response = Request::get(&url)
            .credentials(RequestCredentials::SameOrigin)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.ok() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        parse_events_body(&body)
    }
}
