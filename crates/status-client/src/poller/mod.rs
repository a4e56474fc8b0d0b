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

//! Periodic refresh of the [`StatusStore`].
//!
//! A [`PollingController`] runs one background task that calls
//! [`StatusApiClient::list`] on a fixed interval and installs each result in the
//! store. The task awaits every fetch before waiting for the next tick, so the
//! controller never has two `list()` calls outstanding. Ticks that come due
//! while a fetch is in flight are coalesced into a single tick delivered as soon
//! as the fetch completes; the schedule then realigns to the original period.
//!
//! [`PollingController::stop`] is terminal. It cancels the task (dropping any
//! in-flight fetch) and, under the same lock that guards store updates, marks
//! the controller stopped so no result can be applied afterwards.

pub mod report;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, info};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::api::StatusApiClient;
use crate::model::ServiceStatusRecord;
use crate::store::StatusStore;
use crate::transport::{HttpTransport, TransportError};

pub use report::{ErrorReporter, LogReporter, PollFailure, RefreshOrigin};

/// Default delay between two scheduled fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Lifecycle misuse.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PollerError {
    #[error("polling has already been started")]
    AlreadyStarted,

    #[error("polling has been stopped and cannot be restarted")]
    Stopped,

    #[error("poll interval must be greater than zero")]
    InvalidInterval,
}

/// Lifecycle of a [`PollingController`]. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Running,
    Stopped,
}

/// Scheduling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Time between scheduled fetches.
    pub interval: Duration,
    /// Fetch as soon as polling starts instead of after the first interval.
    pub fetch_immediately: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            fetch_immediately: true,
        }
    }
}

struct Shared<T> {
    api: Arc<StatusApiClient<T>>,
    store: StatusStore,
    reporter: Arc<dyn ErrorReporter>,
    state: Mutex<PollerState>,
    cancel: CancellationToken,
}

impl<T: HttpTransport> Shared<T> {
    fn lock_state(&self) -> MutexGuard<'_, PollerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_stopped(&self) -> bool {
        *self.lock_state() == PollerState::Stopped
    }

    /// Fetch once and install the result. Returns whether the store was updated.
    ///
    /// Nothing is fetched once the controller is stopped, and a failure that
    /// lands after stop is returned without being reported.
    async fn refresh(&self, origin: RefreshOrigin) -> Result<bool, TransportError> {
        if self.is_stopped() {
            debug!("Skipping {} refresh after stop", origin);
            return Ok(false);
        }
        match self.api.list().await {
            Ok(records) => Ok(self.apply(records, origin)),
            Err(error) => {
                if !self.is_stopped() {
                    self.reporter.report(&PollFailure::new(origin, error.clone()));
                }
                Err(error)
            }
        }
    }

    fn apply(&self, records: Vec<ServiceStatusRecord>, origin: RefreshOrigin) -> bool {
        let state = self.lock_state();
        if *state == PollerState::Stopped {
            debug!("Discarding {} result received after stop", origin);
            return false;
        }
        let snapshot = self.store.replace(records);
        debug!("Installed snapshot of {} services from {}", snapshot.len(), origin);
        true
    }
}

/// Drives periodic refresh of a [`StatusStore`].
pub struct PollingController<T> {
    shared: Arc<Shared<T>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<T> fmt::Debug for PollingController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollingController")
            .field("cancel_token", &self.shared.cancel)
            .finish_non_exhaustive()
    }
}

impl<T: HttpTransport + 'static> PollingController<T> {
    #[must_use]
    pub fn new(
        api: Arc<StatusApiClient<T>>,
        store: StatusStore,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                api,
                store,
                reporter,
                state: Mutex::new(PollerState::Idle),
                cancel: CancellationToken::new(),
            }),
            task: Mutex::new(None),
        }
    }

    /// Begin polling. Must be called from within a tokio runtime.
    pub fn start(&self, config: PollerConfig) -> Result<(), PollerError> {
        let mut state = self.shared.lock_state();
        match *state {
            PollerState::Running => return Err(PollerError::AlreadyStarted),
            PollerState::Stopped => return Err(PollerError::Stopped),
            PollerState::Idle => {}
        }
        if config.interval.is_zero() {
            return Err(PollerError::InvalidInterval);
        }

        info!(
            "Starting status polling every {} ms",
            config.interval.as_millis()
        );
        *state = PollerState::Running;

        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(poll_loop(shared, config));
        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(())
    }

    /// Stop polling for good.
    ///
    /// Safe to call at any time and more than once. Once this returns, no
    /// further fetch is started and no pending result reaches the store.
    pub fn stop(&self) {
        let mut state = self.shared.lock_state();
        if *state != PollerState::Stopped {
            info!("Stopping status polling");
            *state = PollerState::Stopped;
        }
        self.shared.cancel.cancel();
    }

    /// Wait for the polling task to exit after [`stop`](Self::stop).
    pub async fn stopped(&self) {
        let handle = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    #[must_use]
    pub fn state(&self) -> PollerState {
        *self.shared.lock_state()
    }

    #[must_use]
    pub fn store(&self) -> &StatusStore {
        &self.shared.store
    }

    /// Handle for out-of-band refreshes that honour this controller's stop.
    #[must_use]
    pub fn refresh_handle(&self) -> RefreshHandle<T> {
        RefreshHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Drop for PollingController<T> {
    fn drop(&mut self) {
        *self.shared.state.lock().unwrap_or_else(PoisonError::into_inner) = PollerState::Stopped;
        self.shared.cancel.cancel();
    }
}

/// Triggers a fetch outside the polling schedule.
///
/// Such a fetch may overlap a scheduled one; whichever result arrives last is
/// the snapshot that stays installed.
pub struct RefreshHandle<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for RefreshHandle<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for RefreshHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshHandle").finish_non_exhaustive()
    }
}

impl<T: HttpTransport> RefreshHandle<T> {
    /// Fetch now and install the result unless the controller has been stopped.
    ///
    /// Failures are reported to the controller's [`ErrorReporter`] and returned.
    pub async fn refresh(&self) -> Result<bool, TransportError> {
        self.shared.refresh(RefreshOrigin::Mutation).await
    }
}

async fn poll_loop<T: HttpTransport>(shared: Arc<Shared<T>>, config: PollerConfig) {
    let first = if config.fetch_immediately {
        Instant::now()
    } else {
        Instant::now() + config.interval
    };
    let mut ticker = interval_at(first, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = shared.cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        tokio::select! {
            biased;
            () = shared.cancel.cancelled() => {
                debug!("Abandoning in-flight fetch");
                break;
            }
            result = shared.refresh(RefreshOrigin::Tick) => {
                if result.is_err() {
                    debug!("Poll failed, keeping previous snapshot");
                }
            }
        }
    }

    info!("Status polling stopped");
}
