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

//! Domain model for registered services and their observed health.
//!
//! Records are produced by the API layer from wire DTOs (see [`wire`]) and are
//! never constructed from user input. The client observes `status`; it never
//! writes it.

pub mod wire;

use std::fmt;

use chrono::{DateTime, Utc};

pub use wire::{MappingError, NewService, ServiceStatusDto};

/// Health value reported by the registry for a single service.
///
/// The registry currently emits `OK`, `FAIL` and `UNKNOWN`. Any other value is
/// kept verbatim so server-side additions survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ServiceHealth {
    /// No health check has completed yet (or the server sent no status).
    #[default]
    Unknown,
    /// The last probe got a response.
    Ok,
    /// The last probe failed.
    Fail,
    /// A server-defined value this client does not know about.
    Other(String),
}

impl ServiceHealth {
    /// Parse the wire representation. Missing or empty values map to [`ServiceHealth::Unknown`].
    #[must_use]
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            None | Some("" | "UNKNOWN") => Self::Unknown,
            Some("OK") => Self::Ok,
            Some("FAIL") => Self::Fail,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    /// Wire representation of this value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Ok => "OK",
            Self::Fail => "FAIL",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for ServiceHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A service registered with the remote registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatusRecord {
    /// Unique key within the registry, chosen by the caller at creation.
    pub name: String,
    /// Endpoint address probed by the registry.
    pub url: String,
    /// Registration time, assigned by the server.
    pub created_at: DateTime<Utc>,
    /// Last observed health.
    pub status: ServiceHealth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_known_values() {
        assert_eq!(ServiceHealth::from_wire(Some("OK")), ServiceHealth::Ok);
        assert_eq!(ServiceHealth::from_wire(Some("FAIL")), ServiceHealth::Fail);
        assert_eq!(ServiceHealth::from_wire(Some("UNKNOWN")), ServiceHealth::Unknown);
    }

    #[test]
    fn test_health_missing_is_unknown() {
        assert_eq!(ServiceHealth::from_wire(None), ServiceHealth::Unknown);
        assert_eq!(ServiceHealth::from_wire(Some("")), ServiceHealth::Unknown);
    }

    #[test]
    fn test_health_server_defined_value_preserved() {
        let health = ServiceHealth::from_wire(Some("DEGRADED"));
        assert_eq!(health, ServiceHealth::Other("DEGRADED".to_string()));
        assert_eq!(health.as_str(), "DEGRADED");
        assert_eq!(health.to_string(), "DEGRADED");
    }
}
