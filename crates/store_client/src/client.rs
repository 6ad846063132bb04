use std::time::Duration;

use formgrid_protocol::{TemplateDoc, TemplateSummary};
use serde::Deserialize;

use crate::auth::{load_auth, AuthCredentials};

/// Storage service API client (blocking).
#[derive(Clone)]
pub struct StoreClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

/// Error type for storage operations.
#[derive(Debug)]
pub enum StoreError {
    /// No auth credentials configured
    NotAuthenticated,
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// JSON parsing error
    Parse(String),
    /// Server returned a validation error (4xx with message)
    Validation(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotAuthenticated => {
                write!(f, "Not authenticated — run `fgrid login` first")
            }
            StoreError::Network(msg) => write!(f, "Network error: {}", msg),
            StoreError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            StoreError::Parse(msg) => write!(f, "Parse error: {}", msg),
            StoreError::Validation(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Response shape of the create endpoint.
#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: String,
}

impl StoreClient {
    /// Create a new client using saved auth credentials.
    pub fn from_saved_auth() -> Result<Self, StoreError> {
        let creds = load_auth().ok_or(StoreError::NotAuthenticated)?;
        Ok(Self::new(creds))
    }

    /// Create a new client with explicit credentials.
    pub fn new(creds: AuthCredentials) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("fgrid/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: creds.api_base,
            token: creds.token,
        }
    }

    /// List template metadata.
    pub fn list_templates(&self) -> Result<Vec<TemplateSummary>, StoreError> {
        let url = format!("{}/api/templates", self.api_base);
        let resp = self.get(&url)?;
        resp.json::<Vec<TemplateSummary>>()
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// Fetch one template by id.
    pub fn fetch_template(&self, id: &str) -> Result<TemplateDoc, StoreError> {
        let url = format!("{}/api/templates/{}", self.api_base, id);
        log::debug!("fetching template {}", id);
        let resp = self.get(&url)?;
        resp.json::<TemplateDoc>()
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// Create a new template; returns the new id.
    pub fn create_template(&self, name: &str, doc: &TemplateDoc) -> Result<String, StoreError> {
        let url = format!("{}/api/templates", self.api_base);
        let mut body = serde_json::to_value(doc).map_err(|e| StoreError::Parse(e.to_string()))?;
        body["name"] = serde_json::Value::String(name.to_string());

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let resp = Self::check_status(resp)?;
        let created: CreatedResponse = resp.json().map_err(|e| StoreError::Parse(e.to_string()))?;
        Ok(created.id)
    }

    /// Replace a stored template. The document is only borrowed: on error
    /// the caller still owns its unchanged in-memory state and may retry.
    pub fn update_template(&self, id: &str, doc: &TemplateDoc) -> Result<(), StoreError> {
        let url = format!("{}/api/templates/{}", self.api_base, id);
        log::debug!("pushing template {}", id);
        let resp = self
            .http
            .put(&url)
            .bearer_auth(&self.token)
            .json(doc)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Self::check_status(resp)?;
        Ok(())
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, StoreError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Self::check_status(resp)
    }

    fn check_status(
        resp: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let code = status.as_u16();
        let body = resp.text().unwrap_or_default();
        // 4xx with a `detail` field is a service validation message worth
        // showing verbatim
        if status.is_client_error() {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
                if let Some(detail) = json.get("detail").and_then(|d| d.as_str()) {
                    return Err(StoreError::Validation(detail.to_string()));
                }
            }
        }
        log::warn!("storage service returned {}", code);
        Err(StoreError::Http(code, body))
    }
}
