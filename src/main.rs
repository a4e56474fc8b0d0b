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

mod cli;
mod config;
mod render;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::info;
use status_client::{HttpTransport, Monitor, ReqwestTransport, ServiceStatusDto};

use cli::{Cli, Command};
use config::AppConfig;
use render::{render_snapshot, ConsoleReporter};

type AppResult = Result<(), Box<dyn Error>>;

fn main() -> AppResult {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    config.apply_env();
    if let Some(url) = cli.registry_url.clone() {
        config.registry_url = url;
    }
    if let Command::Watch {
        interval_ms: Some(interval_ms),
    } = cli.command
    {
        config.poll_interval_ms = interval_ms;
    }

    // All registry calls run on one cooperative thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(cli.command, config))
}

async fn run(command: Command, config: AppConfig) -> AppResult {
    match command {
        Command::Config { save } => show_config(&config, save),
        Command::Watch { .. } => watch(&connect(&config)?).await,
        Command::List { json } => list(&connect(&config)?, json).await,
        Command::Add { name, url } => add(&connect(&config)?, &name, &url).await,
        Command::Remove { name } => remove(&connect(&config)?, &name).await,
    }
}

fn connect(config: &AppConfig) -> Result<Monitor<ReqwestTransport>, Box<dyn Error>> {
    let monitor_config = config.monitor_config();
    let transport = ReqwestTransport::new(&monitor_config.registry_url, monitor_config.request_timeout)?;
    info!("Using registry at {}", monitor_config.registry_url);
    Ok(Monitor::with_transport(
        transport,
        monitor_config.poller,
        Arc::new(ConsoleReporter),
    ))
}

async fn add<T: HttpTransport + 'static>(monitor: &Monitor<T>, name: &str, url: &str) -> AppResult {
    if monitor.coordinator().add_service(name, url).await? {
        println!("Registered '{name}'");
        print!("{}", render_snapshot(monitor.snapshot().as_ref()));
        Ok(())
    } else {
        Err(format!("registry rejected '{name}' ({url})").into())
    }
}

async fn remove<T: HttpTransport + 'static>(monitor: &Monitor<T>, name: &str) -> AppResult {
    if monitor.coordinator().remove_service(name).await? {
        println!("Removed '{name}'");
        print!("{}", render_snapshot(monitor.snapshot().as_ref()));
        Ok(())
    } else {
        Err(format!("no service named '{name}'").into())
    }
}

async fn watch(monitor: &Monitor<ReqwestTransport>) -> AppResult {
    let mut updates = monitor.store().subscribe();
    monitor.start()?;
    print!("{}", render_snapshot(None));

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                println!();
                print!("{}", render_snapshot(snapshot.as_ref()));
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    // Give an in-flight poll a moment to be abandoned cleanly
    tokio::time::timeout(Duration::from_secs(1), monitor.shutdown()).await?;
    Ok(())
}

/// One-shot listing. Errors are returned to `main` rather than also going
/// through the poll failure reporter.
async fn list<T: HttpTransport + 'static>(monitor: &Monitor<T>, json: bool) -> AppResult {
    let records = monitor.api().list().await?;
    let snapshot = monitor.store().replace(records);

    if json {
        let dtos: Vec<ServiceStatusDto> = snapshot.records().iter().map(ServiceStatusDto::from).collect();
        println!("{}", serde_json::to_string_pretty(&dtos)?);
    } else {
        print!("{}", render_snapshot(Some(&snapshot)));
    }
    Ok(())
}

fn show_config(config: &AppConfig, save: bool) -> AppResult {
    println!("Config file: {}", AppConfig::get_config_path()?.display());
    println!("registry_url       = {}", config.registry_url);
    println!("poll_interval_ms   = {}", config.poll_interval_ms);
    println!("fetch_immediately  = {}", config.fetch_immediately);
    println!("request_timeout_ms = {}", config.request_timeout_ms);

    if save {
        config.save()?;
        println!("Configuration saved");
    }
    Ok(())
}
