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

//! Plain-text rendering of the cached service list.

use std::fmt::Write as _;

use status_client::{ErrorReporter, PollFailure, ServiceStatusRecord, Snapshot};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// One line per service: `STATUS  - name (url)  registered <time>`
pub fn render_record(record: &ServiceStatusRecord) -> String {
    format!(
        "{:<7} - {} ({})  registered {}",
        record.status.as_str(),
        record.name,
        record.url,
        record.created_at.format(TIMESTAMP_FORMAT)
    )
}

/// Render the whole list, or a placeholder before the first successful poll.
pub fn render_snapshot(snapshot: Option<&Snapshot>) -> String {
    let Some(snapshot) = snapshot else {
        return "loading...\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} service(s) as of {}",
        snapshot.len(),
        snapshot.fetched_at().format(TIMESTAMP_FORMAT)
    );
    if snapshot.is_empty() {
        out.push_str("  (no services registered)\n");
    }
    for record in snapshot.records() {
        let _ = writeln!(out, "  {}", render_record(record));
    }
    out
}

/// Prints poll failures to stderr so they show up next to the list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ErrorReporter for ConsoleReporter {
    fn report(&self, failure: &PollFailure) {
        eprintln!("[{}] {}", failure.at.format(TIMESTAMP_FORMAT), failure);
    }
}
