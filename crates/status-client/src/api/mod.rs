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

//! Registry API client.
//!
//! Maps between wire DTOs and domain records and turns HTTP outcomes into the
//! three-way result callers care about: success, business rejection (`false`),
//! or an indeterminate failure ([`TransportError`]).

use log::{debug, info};
use thiserror::Error;

use crate::model::{NewService, ServiceStatusDto, ServiceStatusRecord};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};

/// Path segments of the registry collection resource.
pub const SERVICE_RESOURCE: [&str; 3] = ["api", "v1", "service"];

const STATUS_CREATED: u16 = 201;
const STATUS_NO_CONTENT: u16 = 204;
const STATUS_BAD_REQUEST: u16 = 400;
const STATUS_NOT_FOUND: u16 = 404;

/// Errors returned by the mutating operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ApiError {
    /// The underlying transport failure, if any.
    #[must_use]
    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(err) => Some(err),
            Self::EmptyField { .. } => None,
        }
    }
}

/// Stateless client for the registry's `/api/v1/service` resource.
#[derive(Debug)]
pub struct StatusApiClient<T> {
    transport: T,
}

impl<T: HttpTransport> StatusApiClient<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch every registered service, in the order the registry returns them.
    pub async fn list(&self) -> Result<Vec<ServiceStatusRecord>, TransportError> {
        let response = self
            .transport
            .send(HttpRequest::new(Method::Get, &SERVICE_RESOURCE))
            .await?;

        if !response.is_success() {
            return Err(unexpected(response));
        }

        let dtos: Vec<ServiceStatusDto> = match serde_json::from_str(&response.body) {
            Ok(dtos) => dtos,
            Err(e) => return Err(decode_error(response, e.to_string())),
        };

        let mut records = Vec::with_capacity(dtos.len());
        for dto in dtos {
            match ServiceStatusRecord::try_from(dto) {
                Ok(record) => records.push(record),
                Err(e) => return Err(decode_error(response, e.to_string())),
            }
        }

        debug!("Listed {} services", records.len());
        Ok(records)
    }

    /// Register a service.
    ///
    /// Returns `Ok(true)` when the registry created it and `Ok(false)` when the
    /// registry rejected it (duplicate name, invalid url).
    pub async fn add(&self, name: &str, url: &str) -> Result<bool, ApiError> {
        require_non_empty("name", name)?;
        require_non_empty("url", url)?;

        let request = HttpRequest::new(Method::Post, &SERVICE_RESOURCE)
            .with_body(NewService { name, url }.into());
        let response = self.transport.send(request).await?;

        match response.status {
            STATUS_CREATED => {
                info!("Registered service '{}' ({})", name, url);
                Ok(true)
            }
            STATUS_BAD_REQUEST => {
                info!("Registry rejected service '{}': {}", name, response.body);
                Ok(false)
            }
            _ => Err(unexpected(response).into()),
        }
    }

    /// Unregister a service.
    ///
    /// Returns `Ok(true)` when it was deleted and `Ok(false)` when the registry
    /// does not know `name`.
    pub async fn delete(&self, name: &str) -> Result<bool, ApiError> {
        require_non_empty("name", name)?;

        let mut segments = SERVICE_RESOURCE.to_vec();
        segments.push(name);
        let response = self
            .transport
            .send(HttpRequest::new(Method::Delete, &segments))
            .await?;

        match response.status {
            STATUS_NO_CONTENT => {
                info!("Removed service '{}'", name);
                Ok(true)
            }
            STATUS_NOT_FOUND => {
                info!("Service '{}' is not registered", name);
                Ok(false)
            }
            _ => Err(unexpected(response).into()),
        }
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        Err(ApiError::EmptyField { field })
    } else {
        Ok(())
    }
}

fn unexpected(response: HttpResponse) -> TransportError {
    TransportError::Status {
        status: response.status,
        body: response.body,
    }
}

fn decode_error(response: HttpResponse, reason: String) -> TransportError {
    TransportError::Decode {
        status: response.status,
        body: response.body,
        reason,
    }
}
