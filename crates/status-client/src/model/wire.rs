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

//! Wire representation of registry records.
//!
//! The registry encodes the registration time as epoch milliseconds under
//! `created_at`. Conversion to and from [`ServiceStatusRecord`] is lossless at
//! millisecond precision.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ServiceHealth, ServiceStatusRecord};

/// Errors raised while mapping a DTO into the domain model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("created_at {millis} for service '{name}' is out of range")]
    TimestampOutOfRange { name: String, millis: i64 },
}

/// A record as sent by `GET /api/v1/service`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatusDto {
    pub url: String,
    pub name: String,
    /// Registration time in epoch milliseconds.
    pub created_at: i64,
    #[serde(default)]
    pub status: Option<String>,
}

/// Request body for `POST /api/v1/service`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewService<'a> {
    pub name: &'a str,
    pub url: &'a str,
}

impl From<NewService<'_>> for serde_json::Value {
    fn from(body: NewService<'_>) -> Self {
        serde_json::json!({ "name": body.name, "url": body.url })
    }
}

impl TryFrom<ServiceStatusDto> for ServiceStatusRecord {
    type Error = MappingError;

    fn try_from(dto: ServiceStatusDto) -> Result<Self, Self::Error> {
        let Some(created_at) = DateTime::from_timestamp_millis(dto.created_at) else {
            return Err(MappingError::TimestampOutOfRange {
                name: dto.name,
                millis: dto.created_at,
            });
        };

        Ok(Self {
            status: ServiceHealth::from_wire(dto.status.as_deref()),
            name: dto.name,
            url: dto.url,
            created_at,
        })
    }
}

impl From<&ServiceStatusRecord> for ServiceStatusDto {
    fn from(record: &ServiceStatusRecord) -> Self {
        Self {
            url: record.url.clone(),
            name: record.name.clone(),
            created_at: record.created_at.timestamp_millis(),
            status: Some(record.status.as_str().to_string()),
        }
    }
}
