//! Jira comment access through the backend proxy
//!
//! The proxy exposes a single JSON route (by default `/api/jira`). Both
//! operations use `POST` and are told apart only by the payload shape:
//!
//! - `{ "issueKey": "PROJ-1" }` returns the issue's comments as an array
//! - `{ "issueKey": "PROJ-1", "comment": <ADF> }` creates a comment and
//!   returns it
//!
//! Failures come back with a non-success status and `{ "error": "..." }`.
//! Authentication with Jira itself is the proxy's business.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::adf::Document;
use crate::error::{Error, Result};

/// A comment as returned by the proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub body: CommentBody,
    pub author: Author,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

/// Comment bodies arrive either already flattened to text or as ADF
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommentBody {
    Text(String),
    Document(Document),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub display_name: String,
}

impl Comment {
    pub fn new(body: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: None,
            body: CommentBody::Text(body.into()),
            author: Author {
                display_name: author.into(),
            },
            created: None,
        }
    }

    /// The body as displayable text
    pub fn body_text(&self) -> String {
        match &self.body {
            CommentBody::Text(text) => text.clone(),
            CommentBody::Document(doc) => doc.to_plain_text(),
        }
    }
}

/// The two operations the comment panel needs from the backend
pub trait CommentsApi {
    /// Fetch all comments of an issue, in server order
    fn fetch_comments(&self, issue_key: &str) -> Result<Vec<Comment>>;

    /// Post a new comment and return the stored comment
    fn add_comment(&self, issue_key: &str, comment: &Document) -> Result<Comment>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchRequest<'a> {
    issue_key: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddRequest<'a> {
    issue_key: &'a str,
    comment: &'a Document,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the Jira proxy route
#[derive(Debug, Clone)]
pub struct JiraProxy {
    client: Client,
    endpoint: String,
}

impl JiraProxy {
    /// Build a client for the given endpoint URL
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the proxy route (e.g. "http://localhost:3000/api/jira")
    /// * `timeout` - Per-request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, payload: &B) -> Result<T> {
        let response = self.client.post(&self.endpoint).json(payload).send()?;
        let status = response.status();
        let body = response.text()?;

        tracing::debug!(endpoint = %self.endpoint, status = status.as_u16(), "proxy responded");

        parse_response(status, &body)
    }
}

impl CommentsApi for JiraProxy {
    fn fetch_comments(&self, issue_key: &str) -> Result<Vec<Comment>> {
        tracing::debug!(issue_key, "fetching comments");
        self.post(&FetchRequest { issue_key })
    }

    fn add_comment(&self, issue_key: &str, comment: &Document) -> Result<Comment> {
        tracing::debug!(issue_key, blocks = comment.content.len(), "adding comment");
        self.post(&AddRequest { issue_key, comment })
    }
}

/// Turn a proxy response into the expected payload or an error
///
/// Non-success responses surface the server's `error` string verbatim. When
/// the server gives no message, the status code is reported instead.
fn parse_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    if status.is_success() {
        return serde_json::from_str(body).map_err(|e| Error::Decode(e.to_string()));
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: Some(message),
        }) => Err(Error::Api(message)),
        _ => Err(Error::Api(format!(
            "Request failed with status {}",
            status.as_u16()
        ))),
    }
}
