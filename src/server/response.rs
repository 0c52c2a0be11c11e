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

//! Response encoding: one JSON object per line.
//!
//! `groups` carries plain names after AUTH and full listings for
//! LISTGROUP, so it is kept as a JSON value rather than two fields
//! fighting over one key.

use crate::directory::models::{GroupView, PublicUser, Role};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<PublicUser>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl Response {
    fn bare(status: Status) -> Self {
        Self {
            status,
            message: None,
            role: None,
            groups: None,
            user: None,
            users: None,
            time: None,
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::bare(Status::Ok)
        }
    }

    /// `OK` with payload fields only, no message.
    pub fn ok_payload() -> Self {
        Self::bare(Status::Ok)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::bare(Status::Error)
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_group_names(mut self, names: Vec<String>) -> Self {
        self.groups = Some(serde_json::json!(names));
        self
    }

    pub fn with_group_listing(mut self, listing: Vec<GroupView>) -> Self {
        self.groups = Some(serde_json::json!(listing));
        self
    }

    pub fn with_user(mut self, user: PublicUser) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_users(mut self, users: Vec<PublicUser>) -> Self {
        self.users = Some(users);
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Encode as one wire line. Encoding this struct cannot realistically
    /// fail; if it ever does the client still gets well-formed JSON.
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"status":"ERROR","message":"Internal encoding error"}"#.to_string()
        })
    }
}

/// What the connection loop should do after sending a response. `Close`
/// is the out-of-band sentinel: flush the final line, then drop the socket.
#[derive(Debug)]
pub enum Reply {
    Line(Response),
    Close(Response),
}
