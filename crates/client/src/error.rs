//! Errors surfaced by [`crate::ApiClient`].

use reqwest::header::InvalidHeaderValue;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::endpoints::EndpointError;

/// Longest slice of a non-JSON body kept for diagnostics.
const BODY_SNIPPET_CHARS: usize = 500;

/// Errors that can occur when talking to the platform.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The platform answered with a non-2xx status.
    #[error("{method} {url} returned {status}: {message}", message = .body.rendered_message())]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: ErrorBody,
    },

    /// Connection, TLS or timeout failure.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A 2xx body did not match the expected shape.
    #[error("failed to decode {status} response: {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("invalid endpoint configuration: {0}")]
    Endpoint(#[from] EndpointError),
}

impl ApiError {
    /// HTTP status, when the platform answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The platform's error body, for non-2xx answers.
    #[must_use]
    pub const fn body(&self) -> Option<&ErrorBody> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Human-readable message with placeholders filled in.
    #[must_use]
    pub fn message(&self) -> String {
        self.body()
            .map_or_else(|| self.to_string(), ErrorBody::rendered_message)
    }

    /// Case-insensitive search of the message and every sub-error.
    #[must_use]
    pub fn message_contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        let Some(body) = self.body() else {
            return self.to_string().to_lowercase().contains(&needle);
        };
        body.messages()
            .iter()
            .any(|m| m.to_lowercase().contains(&needle))
    }

    /// `true` when the status is one of `codes`.
    #[must_use]
    pub fn is_status(&self, codes: &[u16]) -> bool {
        self.status().is_some_and(|s| codes.contains(&s.as_u16()))
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.is_status(&[404])
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}

/// Error payload: `{ message, errors[], parameters }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

/// One entry of `errors[]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

impl ErrorBody {
    /// Parse an error body, keeping a snippet of anything that is not JSON
    /// (HTML error pages, proxy errors) as the message.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_else(|_| Self {
            message: snippet(bytes),
            ..Self::default()
        })
    }

    /// `message` with `%name` / `%1` placeholders substituted.
    #[must_use]
    pub fn rendered_message(&self) -> String {
        render(&self.message, self.parameters.as_ref())
    }

    /// The rendered top-level message followed by every rendered sub-error.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        std::iter::once(self.rendered_message())
            .chain(self.errors.iter().map(ErrorDetail::rendered_message))
            .collect()
    }
}

impl ErrorDetail {
    #[must_use]
    pub fn rendered_message(&self) -> String {
        render(&self.message, self.parameters.as_ref())
    }
}

/// Lossy UTF-8 text of a body, cut to a readable length.
pub(crate) fn snippet(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim()
        .chars()
        .take(BODY_SNIPPET_CHARS)
        .collect()
}

fn render(template: &str, parameters: Option<&Value>) -> String {
    let mut substitutions: Vec<(String, String)> = match parameters {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| (format!("%{k}"), value_text(v)))
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("%{}", i + 1), value_text(v)))
            .collect(),
        _ => return template.to_string(),
    };
    // Longest placeholder first so `%1` never eats the head of `%10`.
    substitutions.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = template.to_string();
    for (placeholder, value) in substitutions {
        out = out.replace(&placeholder, &value);
    }
    out
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
