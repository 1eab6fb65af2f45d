//! GitHub API Client
//!
//! Module for managing interactions with the GitHub labels API

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Label;
use crate::error::Result;

/// Default GitHub API root
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// API version pinned to one that supports label descriptions
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// Encode a string for use in URL path segments (RFC 3986 with UTF-8 support)
///
/// Only unreserved characters (A-Z, a-z, 0-9, -, ., _, ~) are left unencoded,
/// so label names with spaces or non-ASCII text address the right resource.
fn encode_path_segment(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            // RFC 3986 unreserved characters
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '.' | '_' | '~' => c.to_string(),
            // Everything else gets percent-encoded as UTF-8 bytes
            _ => c
                .to_string()
                .bytes()
                .map(|b| format!("%{:02X}", b))
                .collect::<String>(),
        })
        .collect()
}

/// Label as returned by the listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteLabel {
    /// Label name
    pub name: String,

    /// Label color (6-digit hexadecimal, without #)
    pub color: String,

    /// Label description
    pub description: Option<String>,
}

/// Outcome of a single mutating API call
///
/// Transport-level faults are not represented here; they surface as `Err`
/// from the client methods. This type only distinguishes the expected status
/// code from any other response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    /// The call returned the expected status code
    Success,

    /// Any other status; carries the raw response body for the operator
    Failure { status: u16, body: String },
}

/// Result of the listing call
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    /// Listing succeeded
    Labels(Vec<RemoteLabel>),

    /// Listing returned a non-success status
    Failed { status: u16, body: String },
}

/// GitHub API Client
///
/// Issues the three label calls against a fixed API root. The token is taken
/// by reference at construction and held only for the client's lifetime.
pub struct GitHubClient {
    http: reqwest::Client,
    api_root: Url,
    token: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Create a client against the public GitHub API
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built
    pub fn new(access_token: &str, owner: &str, repo: &str) -> Result<Self> {
        Self::with_api_root(access_token, owner, repo, GITHUB_API_URL)
    }

    /// Create a client against an explicit API root
    ///
    /// Used by tests to point the client at a mock server.
    ///
    /// # Errors
    /// Returns an error if the API root is not a valid URL
    pub fn with_api_root(
        access_token: &str,
        owner: &str,
        repo: &str,
        api_root: &str,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gh-relabel/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_root: Url::parse(api_root)?,
            token: access_token.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// URL of the repository's label collection
    fn labels_url(&self) -> Result<Url> {
        let path = format!("repos/{}/{}/labels", self.owner, self.repo);
        Ok(self.api_root.join(&path)?)
    }

    /// URL of a single label, addressed by name
    fn label_url(&self, name: &str) -> Result<Url> {
        let path = format!(
            "repos/{}/{}/labels/{}",
            self.owner,
            self.repo,
            encode_path_segment(name)
        );
        Ok(self.api_root.join(&path)?)
    }

    /// List all labels in the repository
    ///
    /// A non-success status is reported as [`Listing::Failed`] rather than
    /// an error, so callers can decide how to proceed.
    ///
    /// # Errors
    /// Returns an error only on transport-level faults
    pub async fn list_labels(&self) -> Result<Listing> {
        let response = self
            .http
            .get(self.labels_url()?)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", ACCEPT_HEADER)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let labels: Vec<RemoteLabel> = response.json().await?;
            Ok(Listing::Labels(labels))
        } else {
            Ok(Listing::Failed {
                status: status.as_u16(),
                body: response.text().await?,
            })
        }
    }

    /// Delete one label by name (success = HTTP 204)
    ///
    /// # Errors
    /// Returns an error only on transport-level faults
    pub async fn delete_label(&self, name: &str) -> Result<ApiOutcome> {
        let response = self
            .http
            .delete(self.label_url(name)?)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", ACCEPT_HEADER)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NO_CONTENT {
            Ok(ApiOutcome::Success)
        } else {
            Ok(ApiOutcome::Failure {
                status: status.as_u16(),
                body: response.text().await?,
            })
        }
    }

    /// Create one label (success = HTTP 201)
    ///
    /// The JSON body carries exactly name, color, and description, with the
    /// color normalized to bare hex.
    ///
    /// # Errors
    /// Returns an error only on transport-level faults
    pub async fn create_label(&self, label: &Label) -> Result<ApiOutcome> {
        let body = serde_json::json!({
            "name": label.name,
            "color": Label::normalize_color(&label.color),
            "description": label.description,
        });

        let response = self
            .http
            .post(self.labels_url()?)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", ACCEPT_HEADER)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::CREATED {
            Ok(ApiOutcome::Success)
        } else {
            Ok(ApiOutcome::Failure {
                status: status.as_u16(),
                body: response.text().await?,
            })
        }
    }
}
