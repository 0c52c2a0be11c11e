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

//! Request parsing into a closed command type.
//!
//! One line in, one `Command` out: the verb is matched case-insensitively,
//! arity is checked here and nowhere else, and trailing free-text fields
//! (full names) are rejoined with single spaces. Dispatch downstream is an
//! exhaustive match, so adding a verb without handling it will not compile.

use crate::directory::errors::DirectoryError;
use crate::directory::models::Role;

const USAGE_AUTH: &str = "Usage: AUTH <username> <password>";
const USAGE_ADDUSER: &str = "Usage: ADDUSER <username> <password> <role> [email] [fullName]";
const USAGE_READUSER: &str = "Usage: READUSER <username>";
const USAGE_UPDATEUSER: &str = "Usage: UPDATEUSER <username> <email> [fullName]";
const USAGE_DELETEUSER: &str = "Usage: DELETEUSER <username>";
const USAGE_CREATEGROUP: &str = "Usage: CREATEGROUP <groupname>";
const USAGE_DELETEGROUP: &str = "Usage: DELETEGROUP <groupname>";
const USAGE_ADDUSERTOGROUP: &str = "Usage: ADDUSERTOGROUP <username> <group>";
const USAGE_REMOVEUSERFROMGROUP: &str = "Usage: REMOVEUSERFROMGROUP <username> <group>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Auth { username: String, password: String },
    Logout,
    Ping,
    Exit,
    AddUser {
        username: String,
        password: String,
        role: Role,
        email: String,
        full_name: String,
    },
    ReadUser { username: String },
    UpdateUser {
        username: String,
        email: String,
        full_name: String,
    },
    DeleteUser { username: String },
    ListUsers,
    CreateGroup { name: String },
    DeleteGroup { name: String },
    AddMember { username: String, group: String },
    RemoveMember { username: String, group: String },
    ListGroups,
}

impl Command {
    /// Parse one trimmed request line.
    pub fn parse(line: &str) -> Result<Self, DirectoryError> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Err(DirectoryError::Malformed("Empty command".to_string()));
        };
        let args: Vec<&str> = parts.collect();

        match verb.to_ascii_uppercase().as_str() {
            "AUTH" => {
                need(&args, 2, USAGE_AUTH)?;
                Ok(Self::Auth {
                    username: args[0].to_string(),
                    password: args[1].to_string(),
                })
            }
            "LOGOUT" => Ok(Self::Logout),
            "PING" => Ok(Self::Ping),
            "EXIT" => Ok(Self::Exit),
            "ADDUSER" => {
                need(&args, 3, USAGE_ADDUSER)?;
                Ok(Self::AddUser {
                    username: args[0].to_string(),
                    password: args[1].to_string(),
                    role: Role::parse_safe(args[2]),
                    email: args.get(3).copied().unwrap_or_default().to_string(),
                    full_name: join_from(&args, 4),
                })
            }
            "READUSER" => {
                need(&args, 1, USAGE_READUSER)?;
                Ok(Self::ReadUser {
                    username: args[0].to_string(),
                })
            }
            "UPDATEUSER" => {
                need(&args, 2, USAGE_UPDATEUSER)?;
                Ok(Self::UpdateUser {
                    username: args[0].to_string(),
                    email: args[1].to_string(),
                    full_name: join_from(&args, 2),
                })
            }
            "DELETEUSER" => {
                need(&args, 1, USAGE_DELETEUSER)?;
                Ok(Self::DeleteUser {
                    username: args[0].to_string(),
                })
            }
            "LISTUSER" => Ok(Self::ListUsers),
            "CREATEGROUP" => {
                need(&args, 1, USAGE_CREATEGROUP)?;
                Ok(Self::CreateGroup {
                    name: args[0].to_string(),
                })
            }
            "DELETEGROUP" => {
                need(&args, 1, USAGE_DELETEGROUP)?;
                Ok(Self::DeleteGroup {
                    name: args[0].to_string(),
                })
            }
            "ADDUSERTOGROUP" => {
                need(&args, 2, USAGE_ADDUSERTOGROUP)?;
                Ok(Self::AddMember {
                    username: args[0].to_string(),
                    group: args[1].to_string(),
                })
            }
            "REMOVEUSERFROMGROUP" => {
                need(&args, 2, USAGE_REMOVEUSERFROMGROUP)?;
                Ok(Self::RemoveMember {
                    username: args[0].to_string(),
                    group: args[1].to_string(),
                })
            }
            "LISTGROUP" => Ok(Self::ListGroups),
            unknown => Err(DirectoryError::Malformed(format!(
                "Unknown command: {unknown}"
            ))),
        }
    }

    /// Canonical verb, mainly for logging and permission diagnostics.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Auth { .. } => "AUTH",
            Self::Logout => "LOGOUT",
            Self::Ping => "PING",
            Self::Exit => "EXIT",
            Self::AddUser { .. } => "ADDUSER",
            Self::ReadUser { .. } => "READUSER",
            Self::UpdateUser { .. } => "UPDATEUSER",
            Self::DeleteUser { .. } => "DELETEUSER",
            Self::ListUsers => "LISTUSER",
            Self::CreateGroup { .. } => "CREATEGROUP",
            Self::DeleteGroup { .. } => "DELETEGROUP",
            Self::AddMember { .. } => "ADDUSERTOGROUP",
            Self::RemoveMember { .. } => "REMOVEUSERFROMGROUP",
            Self::ListGroups => "LISTGROUP",
        }
    }

    /// Everything except AUTH/LOGOUT/PING/EXIT requires an authenticated
    /// session.
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Self::Auth { .. } | Self::Logout | Self::Ping | Self::Exit
        )
    }
}

fn need(args: &[&str], min: usize, usage: &str) -> Result<(), DirectoryError> {
    if args.len() < min {
        return Err(DirectoryError::Malformed(usage.to_string()));
    }
    Ok(())
}

fn join_from(args: &[&str], start: usize) -> String {
    args.get(start..).unwrap_or_default().join(" ")
}
