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

//! TCP listener, first-boot seeding, and the per-connection loop.
//!
//! One task per connection, admission bounded by a semaphore, reads
//! bounded by an idle timeout. Shutdown stops accepting and drains
//! in-flight connections before returning.

use crate::config::Config;
use crate::directory::constants::{defaults, limits, wire};
use crate::directory::errors::DirectoryError;
use crate::directory::models::{Group, Role, User};
use crate::directory::password;
use crate::server::response::{Reply, Response};
use crate::server::session::SessionHandler;
use crate::service::{Services, Shared};
use crate::store::{GroupStore, UserStore};
use anyhow::Result;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tokio_util::codec::{Framed, LinesCodec};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

/// Seed the default admin account and its group if they are missing.
/// Runs once at startup, before the listener accepts anything; existence
/// checks make it idempotent across restarts.
pub async fn bootstrap(
    config: &Config,
    users: &Shared<UserStore>,
    groups: &Shared<GroupStore>,
) -> Result<(), DirectoryError> {
    {
        let mut store = users.lock().await;
        if store.find(defaults::BOOTSTRAP_USERNAME).is_none() {
            info!(username = defaults::BOOTSTRAP_USERNAME, "seeding bootstrap admin");
            store.upsert(User {
                username: defaults::BOOTSTRAP_USERNAME.to_string(),
                password_hash: password::hash(&config.bootstrap_password),
                email: "admin@example.com".to_string(),
                full_name: "System Admin".to_string(),
                role: Role::Admin,
            });
            store.save()?;
        }
    }
    let mut store = groups.lock().await;
    if store.find(defaults::BOOTSTRAP_GROUP).is_none() {
        let mut group = Group::new(defaults::BOOTSTRAP_GROUP);
        group.add_member(defaults::BOOTSTRAP_USERNAME);
        store.upsert(group);
        store.save()?;
    }
    Ok(())
}

/// Accept loop. Returns once `shutdown` fires and every spawned
/// connection task has finished.
pub async fn serve(
    listener: TcpListener,
    services: Arc<Services>,
    config: Arc<Config>,
    shutdown: CancellationToken,
) -> Result<()> {
    let tracker = TaskTracker::new();
    let permits = Arc::new(Semaphore::new(config.max_connections));
    info!(addr = %listener.local_addr()?, "listening");

    loop {
        let permit = tokio::select! {
            _ = shutdown.cancelled() => break,
            permit = permits.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };
        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(pair) => pair,
                Err(err) => {
                    warn!(error = %err, "accept failed");
                    continue;
                }
            },
        };

        let services = services.clone();
        let config = config.clone();
        let shutdown = shutdown.clone();
        let span = tracing::info_span!("conn", id = %Uuid::new_v4(), %peer);
        tracker.spawn(
            async move {
                let _admission = permit;
                if let Err(err) = handle_connection(stream, services, config, shutdown).await {
                    debug!(error = %err, "connection ended with transport error");
                }
            }
            .instrument(span),
        );
    }

    tracker.close();
    info!("draining in-flight connections");
    tracker.wait().await;
    Ok(())
}

/// One blocking read-process-write cycle per request line, strictly
/// sequential within the connection.
async fn handle_connection(
    stream: TcpStream,
    services: Arc<Services>,
    config: Arc<Config>,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut framed = Framed::new(stream, LinesCodec::new_with_max_length(limits::MAX_LINE_BYTES));
    framed.send(Response::ok(wire::GREETING).to_line()).await?;

    let mut handler = SessionHandler::new(services);
    loop {
        let next = tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("shutdown requested, closing connection");
                return Ok(());
            }
            next = timeout(config.idle_timeout, framed.next()) => next,
        };
        let line = match next {
            Err(_) => {
                debug!("idle timeout, closing connection");
                return Ok(());
            }
            Ok(None) => return Ok(()), // peer closed
            Ok(Some(Err(err))) => return Err(err.into()),
            Ok(Some(Ok(line))) => line,
        };

        match handler.handle_line(line.trim()).await {
            Reply::Line(response) => framed.send(response.to_line()).await?,
            Reply::Close(response) => {
                framed.send(response.to_line()).await?;
                debug!("close sentinel, ending connection");
                return Ok(());
            }
        }
    }
}
