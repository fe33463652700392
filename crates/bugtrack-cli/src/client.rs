//! Blocking HTTP client for the bug API.

use std::time::Duration;

use anyhow::{anyhow, Context};
use bugtrack_core::{Bug, BugInput, BugStats, FieldError, ListParams};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One page of bugs as returned by `GET /bugs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugList {
    pub count: usize,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub data: Vec<Bug>,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    #[serde(default)]
    message: Option<String>,
}

/// Failure body sent by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

impl ErrorBody {
    /// Renders the server message followed by one line per field error.
    pub fn describe(&self, status: u16) -> String {
        let mut out = format!("{} (HTTP {})", self.message, status);
        for error in &self.errors {
            out.push_str(&format!("\n  - {}: {}", error.field, error.message));
        }
        out
    }
}

pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn list(&self, params: &ListParams) -> anyhow::Result<BugList> {
        let mut request = self.agent.get(&self.url("/bugs"));
        for (name, value) in params.to_pairs() {
            request = request.query(name, value);
        }
        read_json(request.call())
    }

    pub fn get(&self, id: Uuid) -> anyhow::Result<Bug> {
        let request = self.agent.get(&self.url(&format!("/bugs/{id}")));
        read_data(request.call())
    }

    pub fn create(&self, input: &BugInput) -> anyhow::Result<Bug> {
        let request = self.agent.post(&self.url("/bugs"));
        read_data(request.send_json(input))
    }

    pub fn update(&self, id: Uuid, input: &BugInput) -> anyhow::Result<Bug> {
        let request = self.agent.put(&self.url(&format!("/bugs/{id}")));
        read_data(request.send_json(input))
    }

    /// Deletes a bug and returns the server's confirmation message.
    pub fn delete(&self, id: Uuid) -> anyhow::Result<String> {
        let request = self.agent.delete(&self.url(&format!("/bugs/{id}")));
        let body: MessageEnvelope = read_json(request.call())?;
        Ok(body
            .message
            .unwrap_or_else(|| "Bug successfully deleted".to_string()))
    }

    pub fn stats(&self) -> anyhow::Result<BugStats> {
        let request = self.agent.get(&self.url("/bugs/stats"));
        read_data(request.call())
    }
}

fn read_data<T: DeserializeOwned>(
    result: Result<ureq::Response, ureq::Error>,
) -> anyhow::Result<T> {
    let envelope: DataEnvelope<T> = read_json(result)?;
    Ok(envelope.data)
}

fn read_json<T: DeserializeOwned>(
    result: Result<ureq::Response, ureq::Error>,
) -> anyhow::Result<T> {
    match result {
        Ok(response) => response
            .into_json::<T>()
            .context("Failed to parse API response"),
        Err(ureq::Error::Status(status, response)) => {
            let text = response.into_string().unwrap_or_default();
            Err(anyhow!(api_error_message(status, &text)))
        }
        Err(ureq::Error::Transport(transport)) => {
            Err(anyhow!("Failed to reach API: {}", transport))
        }
    }
}

/// Builds a readable message from a non-2xx response body.
fn api_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(error) => error.describe(status),
        Err(_) if body.trim().is_empty() => format!("Request failed (HTTP {})", status),
        Err(_) => format!("Request failed (HTTP {}): {}", status, body.trim()),
    }
}
