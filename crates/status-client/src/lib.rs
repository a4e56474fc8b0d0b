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

//! Client library for a remote service status registry.
//!
//! The registry keeps a list of named service endpoints and probes their
//! health on its own. This crate is the client side: it reads the list, keeps a
//! cached snapshot fresh, and registers or removes services.
//!
//! - **Transport layer**: [`HttpTransport`] abstraction with a `reqwest`
//!   implementation ([`ReqwestTransport`])
//! - **API layer**: [`StatusApiClient`], DTO mapping and error taxonomy
//! - **Store**: [`StatusStore`], an atomically replaced [`Snapshot`]
//! - **Polling**: [`PollingController`], a cancellable single-flight refresh loop
//! - **Mutations**: [`MutationCoordinator`], add/remove followed by an immediate refresh
//!
//! # Quick Start
//!
//! ```no_run
//! use status_client::{Monitor, MonitorConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let monitor = Monitor::connect(&MonitorConfig {
//!         registry_url: "http://localhost:8080".to_string(),
//!         ..Default::default()
//!     })
//!     .expect("valid registry url");
//!
//!     monitor.start().expect("polling starts once");
//!
//!     let mut updates = monitor.store().subscribe();
//!     while updates.changed().await.is_ok() {
//!         if let Some(snapshot) = updates.borrow_and_update().as_ref() {
//!             for record in snapshot.records() {
//!                 println!("{} {} ({})", record.status, record.name, record.url);
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! # Error handling
//!
//! `add`/`delete` report the registry's conventional rejections (400 on add,
//! 404 on delete) as `Ok(false)`. Every other failure is a [`TransportError`]
//! carrying the response status and body, so "rejected" and "indeterminate"
//! are never confused. Poll failures go to an [`ErrorReporter`] and leave the
//! previous snapshot in place.

pub mod api;
pub mod coordinator;
pub mod model;
pub mod poller;
pub mod store;
pub mod transport;

use std::sync::Arc;
use std::time::Duration;

pub use api::{ApiError, StatusApiClient};
pub use coordinator::MutationCoordinator;
pub use model::{ServiceHealth, ServiceStatusDto, ServiceStatusRecord};
pub use poller::{
    ErrorReporter, LogReporter, PollFailure, PollerConfig, PollerError, PollerState,
    PollingController, RefreshHandle, RefreshOrigin,
};
pub use store::{Snapshot, StatusStore};
pub use transport::{HttpTransport, ReqwestTransport, TransportError};

/// Default registry location.
pub const DEFAULT_REGISTRY_URL: &str = "http://localhost:8080";

/// Configuration for the full-stack [`Monitor`].
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Base URL of the registry; `/api/v1/service` is appended.
    pub registry_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Polling schedule.
    pub poller: PollerConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            poller: PollerConfig::default(),
        }
    }
}

/// Wires the API client, store, poller and coordinator together.
///
/// One API client instance is shared by the poller and the coordinator.
pub struct Monitor<T> {
    api: Arc<StatusApiClient<T>>,
    poller: PollingController<T>,
    coordinator: MutationCoordinator<T>,
    poller_config: PollerConfig,
}

impl<T> std::fmt::Debug for Monitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("poller", &self.poller)
            .field("poller_config", &self.poller_config)
            .finish_non_exhaustive()
    }
}

impl Monitor<ReqwestTransport> {
    /// Build a monitor talking HTTP to `config.registry_url`, logging poll failures.
    pub fn connect(config: &MonitorConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(&config.registry_url, config.request_timeout)?;
        Ok(Self::with_transport(transport, config.poller, Arc::new(LogReporter)))
    }
}

impl<T: HttpTransport + 'static> Monitor<T> {
    #[must_use]
    pub fn with_transport(
        transport: T,
        poller_config: PollerConfig,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let api = Arc::new(StatusApiClient::new(transport));
        let poller = PollingController::new(Arc::clone(&api), StatusStore::new(), reporter);
        let coordinator = MutationCoordinator::new(Arc::clone(&api), poller.refresh_handle());

        Self {
            api,
            poller,
            coordinator,
            poller_config,
        }
    }

    /// Start background polling with the configured schedule.
    pub fn start(&self) -> Result<(), PollerError> {
        self.poller.start(self.poller_config)
    }

    /// Stop polling; see [`PollingController::stop`].
    pub fn stop(&self) {
        self.poller.stop();
    }

    /// Stop polling and wait for the background task to finish.
    pub async fn shutdown(&self) {
        self.poller.stop();
        self.poller.stopped().await;
    }

    /// Refresh once now, outside the schedule.
    pub async fn refresh(&self) -> Result<bool, TransportError> {
        self.poller.refresh_handle().refresh().await
    }

    #[must_use]
    pub fn store(&self) -> &StatusStore {
        self.poller.store()
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.store().read()
    }

    #[must_use]
    pub fn api(&self) -> &StatusApiClient<T> {
        &self.api
    }

    #[must_use]
    pub fn poller(&self) -> &PollingController<T> {
        &self.poller
    }

    #[must_use]
    pub fn coordinator(&self) -> &MutationCoordinator<T> {
        &self.coordinator
    }
}
