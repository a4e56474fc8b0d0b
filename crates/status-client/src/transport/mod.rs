// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP transport abstraction.
//!
//! The API client never talks to an HTTP library directly; it sends
//! [`HttpRequest`] values through an injected [`HttpTransport`]. Production code
//! uses [`ReqwestTransport`], tests substitute their own implementation.

mod reqwest_transport;

#[cfg(test)]
pub(crate) mod mock;

use std::fmt;
use std::future::Future;

use thiserror::Error;

pub use reqwest_transport::ReqwestTransport;

/// Failure of a registry call that is not a conventional business outcome.
///
/// Carries whatever the server sent back so callers can show it, or the
/// transport-level message when no response arrived at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("registry responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed registry response (status {status}): {reason}")]
    Decode {
        status: u16,
        body: String,
        reason: String,
    },

    #[error("registry unreachable: {message}")]
    Network { message: String },
}

impl TransportError {
    /// HTTP status of the response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
            Self::Network { .. } => None,
        }
    }

    /// Raw response payload, if one was received.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } | Self::Decode { body, .. } => Some(body),
            Self::Network { .. } => None,
        }
    }
}

/// HTTP methods used against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        })
    }
}

/// A request relative to the registry base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path segments, unencoded. The transport is responsible for escaping.
    pub segments: Vec<String>,
    /// Optional JSON body.
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| (*s).to_string()).collect(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Display form of the path, e.g. `/api/v1/service/foo`.
    #[must_use]
    pub fn path(&self) -> String {
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            path.push_str(segment);
        }
        path
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the registry.
///
/// Any response the server produces, whatever its status, is `Ok`. Only the
/// absence of a response is an error, reported as [`TransportError::Network`].
pub trait HttpTransport: Send + Sync + fmt::Debug {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_path() {
        let request = HttpRequest::new(Method::Delete, &["api", "v1", "service", "svc1"]);
        assert_eq!(request.path(), "/api/v1/service/svc1");
        assert_eq!(request.method.to_string(), "DELETE");
    }

    #[test]
    fn test_error_exposes_status_and_body() {
        let err = TransportError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.body(), Some("boom"));

        let err = TransportError::Network {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
    }
}
