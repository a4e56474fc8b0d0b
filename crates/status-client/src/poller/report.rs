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

//! Error-reporting collaborator for failed refreshes.

use std::fmt;

use chrono::{DateTime, Utc};
use log::warn;

use crate::transport::TransportError;

/// What triggered a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOrigin {
    /// A scheduled poll tick.
    Tick,
    /// The out-of-band refresh following a successful add or delete.
    Mutation,
}

impl fmt::Display for RefreshOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tick => "scheduled poll",
            Self::Mutation => "post-mutation refresh",
        })
    }
}

/// A refresh that failed and was recovered locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollFailure {
    pub origin: RefreshOrigin,
    pub error: TransportError,
    pub at: DateTime<Utc>,
}

impl PollFailure {
    #[must_use]
    pub fn new(origin: RefreshOrigin, error: TransportError) -> Self {
        Self {
            origin,
            error,
            at: Utc::now(),
        }
    }
}

impl fmt::Display for PollFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.origin, self.error)
    }
}

/// Receives every failed refresh exactly once.
///
/// Implementations must not block; they are called from the polling task.
pub trait ErrorReporter: Send + Sync + fmt::Debug {
    fn report(&self, failure: &PollFailure);
}

/// Reporter that writes failures to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, failure: &PollFailure) {
        warn!("{}", failure);
    }
}
