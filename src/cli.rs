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

//! Command-line interface.

use clap::{Parser, Subcommand};

/// Watch and manage services registered with a status registry
#[derive(Debug, Parser)]
#[command(name = "service-monitor", version, about)]
pub struct Cli {
    /// Registry base URL (overrides config file and STATUS_REGISTRY_URL)
    #[arg(long, global = true)]
    pub registry_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll the registry and redraw the service list whenever it changes
    Watch {
        /// Poll interval in milliseconds (overrides config)
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Print the current service list once
    List {
        /// Print the raw registry records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register a service
    Add {
        /// Unique service name
        name: String,
        /// Endpoint the registry should probe
        url: String,
    },

    /// Unregister a service
    Remove {
        /// Name of the service to remove
        name: String,
    },

    /// Show the configuration file location and effective settings
    Config {
        /// Write the effective settings back to the configuration file
        #[arg(long)]
        save: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cli = Cli::parse_from(["service-monitor", "add", "svc1", "https://example.com"]);
        match cli.command {
            Command::Add { name, url } => {
                assert_eq!(name, "svc1");
                assert_eq!(url, "https://example.com");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_registry_url_after_subcommand() {
        let cli = Cli::parse_from([
            "service-monitor",
            "watch",
            "--interval-ms",
            "250",
            "--registry-url",
            "http://registry:9000",
        ]);
        assert_eq!(cli.registry_url.as_deref(), Some("http://registry:9000"));
        assert!(matches!(cli.command, Command::Watch { interval_ms: Some(250) }));
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
