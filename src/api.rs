// API client module: a small blocking HTTP client for the Canvas global
// outcomes import endpoints. Every call is one synchronous request; errors
// bubble up to `main`, which ends the run.

use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::json::null_as_default;

const AVAILABLE_ENDPOINT: &str = "/api/v1/global/outcomes_import/available";
const IMPORT_ENDPOINT: &str = "/api/v1/global/outcomes_import/";
const STATUS_ENDPOINT: &str = "/api/v1/global/outcomes_import/migration_status";

/// One importable outcomes package.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImportableGuid {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub guid: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct MigrationIssue {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub issue_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "error_report_html_url", deserialize_with = "null_as_default")]
    pub error_report_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub error_message: String,
}

/// Status of one migration. The server answers an unknown id with a body
/// that has no `id`, which decodes as `id == 0`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct MigrationStatus {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub workflow_state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub migration_issues_count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub migration_issues: Vec<MigrationIssue>,
}

impl MigrationStatus {
    pub fn is_not_found(&self) -> bool {
        self.id == 0
    }
}

/// Response to a successful import request.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct NewImport {
    #[serde(deserialize_with = "null_as_default")]
    pub migration_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub guid: String,
}

/// Return the guid whose title is exactly `guid_or_title`, or the input
/// unchanged when no title matches.
pub fn resolve_guid(available: &[ImportableGuid], guid_or_title: &str) -> String {
    available
        .iter()
        .find(|g| g.title == guid_or_title)
        .map(|g| g.guid.clone())
        .unwrap_or_else(|| guid_or_title.to_string())
}

/// Blocking client bound to one Canvas domain and API key.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// `base_url` must already be normalized (see `domain::normalize`).
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.to_string(),
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Build an authenticated request for `endpoint` under the base URL.
    /// A non-empty `body` is sent form-encoded.
    pub fn request(&self, method: Method, endpoint: &str, body: &str) -> Result<RequestBuilder> {
        let raw = format!("{}{}", self.base_url, endpoint);
        let url = Url::parse(&raw).with_context(|| format!("Invalid request URL {raw}"))?;

        let mut req = self
            .client
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token));
        if !body.is_empty() {
            req = req
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body.to_string());
        }
        Ok(req)
    }

    /// Send `req` and decode the JSON body. The HTTP status is not checked:
    /// the server reports some failures inside an otherwise normal body.
    /// The body is read as text first so a decode error can quote it.
    fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let res = req.send().context("Failed to send request")?;
        let status = res.status();
        let url = res.url().clone();
        tracing::debug!(%status, %url, "received response");

        let text = res
            .text()
            .with_context(|| format!("Failed to read response body from {url}"))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Unexpected response from {url} ({status}): {text}"))
    }

    /// `GET .../available`: every package that can be imported.
    pub fn list_available(&self) -> Result<Vec<ImportableGuid>> {
        let req = self.request(Method::GET, AVAILABLE_ENDPOINT, "")?;
        tracing::info!("Requesting available guids from {}{}", self.base_url, AVAILABLE_ENDPOINT);
        self.execute(req).context("Listing available guids")
    }

    /// Start importing `guid_or_title`. A value equal to an available
    /// package's title is swapped for that package's guid first, which
    /// costs one extra `list_available` call every time.
    pub fn start_import(&self, guid_or_title: &str) -> Result<NewImport> {
        let available = self.list_available()?;
        let guid = resolve_guid(&available, guid_or_title);

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("guid", &guid)
            .finish();
        let req = self.request(Method::POST, IMPORT_ENDPOINT, &body)?;
        tracing::info!("Requesting import of GUID {guid}");
        self.execute(req)
            .with_context(|| format!("Importing GUID {guid}"))
    }

    /// `GET .../migration_status/<id>`.
    pub fn migration_status(&self, migration_id: i64) -> Result<MigrationStatus> {
        let endpoint = format!("{STATUS_ENDPOINT}/{migration_id}");
        let req = self.request(Method::GET, &endpoint, "")?;
        tracing::info!("Retrieving status for migration {migration_id}");
        self.execute(req)
            .with_context(|| format!("Retrieving status for migration {migration_id}"))
    }
}
