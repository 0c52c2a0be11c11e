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

//! Per-connection session state machine.
//!
//! Holds the connection's ephemeral identity and turns each request line
//! into exactly one reply. Gate order is fixed: parse, authentication,
//! RBAC matrix, ownership, then the domain service. Business failures
//! become error lines; nothing here ever closes the connection except the
//! EXIT sentinel.

use crate::directory::errors::DirectoryError;
use crate::directory::models::Role;
use crate::server::command::Command;
use crate::server::response::{Reply, Response};
use crate::service::{authz, Services};
use std::sync::Arc;
use tracing::{debug, warn};

/// The authenticated principal, if any. Never persisted, never shared
/// across connections.
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
    pub role: Role,
}

pub struct SessionHandler {
    services: Arc<Services>,
    who: Option<Identity>,
}

impl SessionHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self {
            services,
            who: None,
        }
    }

    /// Handle one trimmed request line.
    pub async fn handle_line(&mut self, line: &str) -> Reply {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(err) => return Reply::Line(Response::error(err.wire_message())),
        };

        let verb = command.verb();
        match self.dispatch(command).await {
            Ok(reply) => reply,
            Err(err) => {
                match &err {
                    DirectoryError::Storage(io) => warn!(verb, error = %io, "storage failure"),
                    other => debug!(verb, error = %other, "command rejected"),
                }
                Reply::Line(Response::error(err.wire_message()))
            }
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<Reply, DirectoryError> {
        if command.requires_auth() {
            let identity = self.who.as_ref().ok_or(DirectoryError::NotAuthenticated)?;
            if !authz::can_execute(identity.role, &command) {
                return Err(DirectoryError::PermissionDenied);
            }
        }

        let services = self.services.clone();
        match command {
            Command::Auth { username, password } => {
                let user = services.auth.authenticate(&username, &password).await?;
                self.who = Some(Identity {
                    username: user.username.clone(),
                    role: user.role,
                });
                let groups = services.authz.groups_of(&user.username).await;
                debug!(username = %user.username, role = %user.role, "authenticated");
                Ok(Reply::Line(
                    Response::ok(format!("Welcome {}", user.username))
                        .with_role(user.role)
                        .with_group_names(groups),
                ))
            }
            Command::Logout => {
                self.who = None;
                Ok(Reply::Line(Response::ok("Logged out")))
            }
            Command::Ping => Ok(Reply::Line(
                Response::ok_payload().with_time(chrono::Utc::now().to_rfc3339()),
            )),
            Command::Exit => Ok(Reply::Close(Response::ok(
                crate::directory::constants::wire::FAREWELL,
            ))),

            Command::AddUser {
                username,
                password,
                role,
                email,
                full_name,
            } => {
                services
                    .users
                    .create_user(&username, &password, &email, &full_name, role)
                    .await?;
                Ok(Reply::Line(Response::ok("User added")))
            }
            Command::ReadUser { username } => {
                self.require_self_or_elevated(&username)?;
                let user = services.users.read_user(&username).await?;
                Ok(Reply::Line(Response::ok_payload().with_user(user.public())))
            }
            Command::UpdateUser {
                username,
                email,
                full_name,
            } => {
                self.require_self_or_elevated(&username)?;
                services
                    .users
                    .update_user(&username, &email, &full_name)
                    .await?;
                Ok(Reply::Line(Response::ok("User updated")))
            }
            Command::DeleteUser { username } => {
                services.users.delete_user(&username).await?;
                Ok(Reply::Line(Response::ok("User deleted")))
            }
            Command::ListUsers => {
                let users = services.users.list_all().await;
                let users = users.iter().map(|u| u.public()).collect();
                Ok(Reply::Line(Response::ok_payload().with_users(users)))
            }

            Command::CreateGroup { name } => {
                services.groups.create_group(&name).await?;
                Ok(Reply::Line(Response::ok("Group created")))
            }
            Command::DeleteGroup { name } => {
                services.groups.delete_group(&name).await?;
                Ok(Reply::Line(Response::ok("Group deleted")))
            }
            Command::AddMember { username, group } => {
                services.groups.add_member(&group, &username).await?;
                Ok(Reply::Line(Response::ok("Member added")))
            }
            Command::RemoveMember { username, group } => {
                services.groups.remove_member(&group, &username).await?;
                Ok(Reply::Line(Response::ok("Member removed")))
            }
            Command::ListGroups => {
                let groups = services.groups.list_groups().await;
                let views = groups.iter().map(|g| g.view()).collect();
                Ok(Reply::Line(Response::ok_payload().with_group_listing(views)))
            }
        }
    }

    fn require_self_or_elevated(&self, target: &str) -> Result<(), DirectoryError> {
        let identity = self.who.as_ref().ok_or(DirectoryError::NotAuthenticated)?;
        if authz::may_touch_account(&identity.username, identity.role, target) {
            Ok(())
        } else {
            Err(DirectoryError::PermissionDenied)
        }
    }
}
