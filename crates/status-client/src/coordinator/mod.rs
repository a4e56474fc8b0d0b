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

//! Add and remove services, then refresh the store straight away.

use std::sync::Arc;

use log::debug;

use crate::api::{ApiError, StatusApiClient};
use crate::poller::RefreshHandle;
use crate::transport::HttpTransport;

/// Performs registry mutations and follows each success with an out-of-band
/// refresh, so the change shows up without waiting for the next poll tick.
///
/// A failing refresh is reported through the poller's error reporter and does
/// not change the mutation's own result.
pub struct MutationCoordinator<T> {
    api: Arc<StatusApiClient<T>>,
    refresher: RefreshHandle<T>,
}

impl<T> std::fmt::Debug for MutationCoordinator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationCoordinator")
            .field("refresher", &self.refresher)
            .finish_non_exhaustive()
    }
}

impl<T: HttpTransport> MutationCoordinator<T> {
    #[must_use]
    pub fn new(api: Arc<StatusApiClient<T>>, refresher: RefreshHandle<T>) -> Self {
        Self { api, refresher }
    }

    /// Register `name` at `url`. `Ok(false)` means the registry rejected it.
    pub async fn add_service(&self, name: &str, url: &str) -> Result<bool, ApiError> {
        let created = self.api.add(name, url).await?;
        if created {
            self.refresh_after("add").await;
        }
        Ok(created)
    }

    /// Unregister `name`. `Ok(false)` means the registry did not know it.
    pub async fn remove_service(&self, name: &str) -> Result<bool, ApiError> {
        let deleted = self.api.delete(name).await?;
        if deleted {
            self.refresh_after("delete").await;
        }
        Ok(deleted)
    }

    async fn refresh_after(&self, mutation: &str) {
        match self.refresher.refresh().await {
            Ok(true) => debug!("Store refreshed after {}", mutation),
            Ok(false) => debug!("Refresh after {} discarded, polling stopped", mutation),
            // already delivered to the error reporter
            Err(_) => {}
        }
    }
}
