// Copyright 2026 BadCompany
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

// Main entry point for the dirserve daemon.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dirserve::config::Config;
use dirserve::server::listener::{bootstrap, serve};
use dirserve::service::Services;
use dirserve::store::{FlatFile, GroupStore, UserStore};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Address to bind, e.g. 127.0.0.1:5050
    #[arg(short, long)]
    bind: Option<String>,

    /// Directory holding the flat-file snapshots
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level override (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Env is the base layer, CLI flags overlay it.
    let mut config = Config::from_env();
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if cli.log_json {
        config.log_format = "json".to_string();
    }

    init_tracing(&config);

    let user_store = Arc::new(Mutex::new(UserStore::new(Box::new(FlatFile::new(
        config.users_path(),
    )))));
    let group_store = Arc::new(Mutex::new(GroupStore::new(Box::new(FlatFile::new(
        config.groups_path(),
    )))));
    user_store.lock().await.load()?;
    group_store.lock().await.load()?;
    bootstrap(&config, &user_store, &group_store).await?;

    let services = Arc::new(Services::new(user_store, group_store));
    let listener = TcpListener::bind(&config.bind_addr).await?;

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("ctrl-c received, shutting down");
                shutdown.cancel();
            }
        });
    }

    serve(listener, services, Arc::new(config), shutdown).await
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
