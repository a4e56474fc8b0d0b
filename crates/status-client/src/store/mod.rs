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

//! Locally cached snapshot of the registry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::ServiceStatusRecord;

/// The registry state as seen by one successful `list()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    records: Arc<[ServiceStatusRecord]>,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    #[must_use]
    pub fn new(records: Vec<ServiceStatusRecord>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            records: records.into(),
            fetched_at,
        }
    }

    /// Records in registry order.
    #[must_use]
    pub fn records(&self) -> &[ServiceStatusRecord] {
        &self.records
    }

    /// When the snapshot was installed.
    #[must_use]
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ServiceStatusRecord> {
        self.records.iter().find(|r| r.name == name)
    }
}

/// Holds the latest [`Snapshot`]; `None` until the first successful refresh.
///
/// Cloning a store yields another handle to the same snapshot. Replacement is a
/// single swap, so readers see either the old set or the new one.
#[derive(Debug, Clone)]
pub struct StatusStore {
    tx: Arc<watch::Sender<Option<Snapshot>>>,
}

impl Default for StatusStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Current snapshot, or `None` if nothing has been loaded yet.
    #[must_use]
    pub fn read(&self) -> Option<Snapshot> {
        self.tx.borrow().clone()
    }

    /// Install `records` as the new snapshot, discarding the previous one.
    pub fn replace(&self, records: Vec<ServiceStatusRecord>) -> Snapshot {
        let snapshot = Snapshot::new(records, Utc::now());
        self.tx.send_replace(Some(snapshot.clone()));
        snapshot
    }

    /// Receiver that is notified on every replacement.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Snapshot>> {
        self.tx.subscribe()
    }
}
