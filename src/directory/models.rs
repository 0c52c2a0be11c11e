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

//! Directory records and their flat-file codec.
//!
//! Users and groups persist as one line per record: fields joined by a
//! comma, group members joined by semicolons inside their field. Field
//! values containing a delimiter do not survive a round trip; the store
//! drops lines it cannot decode rather than keeping a partial record.

use crate::directory::constants::snapshot;
use serde::{Deserialize, Serialize};

/// Principal role. Unknown role strings parse to the least-privileged
/// variant rather than being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Developer,
    User,
}

impl Role {
    pub fn parse_safe(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "developer" => Role::Developer,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Developer => "developer",
            Role::User => "user",
        }
    }

    /// Admins and developers may read and update accounts other than
    /// their own.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Admin | Role::Developer)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directory user. The password hash is an opaque tagged string; it is
/// persisted but never serialized onto the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl User {
    /// Encode as one snapshot line: `username,hash,email,fullName,role`.
    pub fn to_line(&self) -> String {
        let d = snapshot::FIELD_DELIMITER;
        format!(
            "{}{d}{}{d}{}{d}{}{d}{}",
            self.username, self.password_hash, self.email, self.full_name, self.role
        )
    }

    /// Decode one snapshot line; `None` for anything short of five fields.
    pub fn from_line(line: &str) -> Option<Self> {
        let p: Vec<&str> = line.split(snapshot::FIELD_DELIMITER).collect();
        if p.len() < 5 {
            return None;
        }
        Some(Self {
            username: p[0].to_string(),
            password_hash: p[1].to_string(),
            email: p[2].to_string(),
            full_name: p[3].to_string(),
            role: Role::parse_safe(p[4]),
        })
    }

    /// Wire projection without the password hash.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
        }
    }
}

/// The subset of a user record that responses expose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub username: String,
    pub email: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub role: Role,
}

/// A named group of usernames. Membership keeps insertion order, ignores
/// duplicates, and is a soft reference: deleting a user does not remove it
/// from groups it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    members: Vec<String>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn contains(&self, username: &str) -> bool {
        self.members.iter().any(|m| m == username)
    }

    /// Returns `false` if the username was already a member.
    pub fn add_member(&mut self, username: &str) -> bool {
        if self.contains(username) {
            return false;
        }
        self.members.push(username.to_string());
        true
    }

    /// Returns `false` if the username was not a member.
    pub fn remove_member(&mut self, username: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != username);
        self.members.len() != before
    }

    /// Encode as one snapshot line: `name,member1;member2;...`.
    pub fn to_line(&self) -> String {
        let joined = self.members.join(&snapshot::MEMBER_DELIMITER.to_string());
        format!("{}{}{}", self.name, snapshot::FIELD_DELIMITER, joined)
    }

    /// Decode one snapshot line. A line without a member field decodes to
    /// an empty group.
    pub fn from_line(line: &str) -> Option<Self> {
        let mut parts = line.splitn(2, snapshot::FIELD_DELIMITER);
        let name = parts.next()?;
        if name.is_empty() {
            return None;
        }
        let mut group = Group::new(name);
        if let Some(members) = parts.next() {
            for member in members.split(snapshot::MEMBER_DELIMITER) {
                if !member.is_empty() {
                    group.add_member(member);
                }
            }
        }
        Some(group)
    }

    /// Wire projection for LISTGROUP.
    pub fn view(&self) -> GroupView {
        GroupView {
            name: self.name.clone(),
            members: self.members.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupView {
    pub name: String,
    pub members: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            username: "alice".to_string(),
            password_hash: "{SSHA}AAAA".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "Alice Liddell".to_string(),
            role: Role::Developer,
        }
    }

    #[test]
    fn user_round_trips_through_snapshot_line() {
        let user = sample_user();
        let decoded = User::from_line(&user.to_line()).unwrap();
        assert_eq!(decoded, user);
    }

    #[test]
    fn user_line_with_missing_fields_is_rejected() {
        assert!(User::from_line("alice,{SSHA}AAAA,alice@example.com").is_none());
        assert!(User::from_line("").is_none());
    }

    #[test]
    fn unknown_role_falls_back_to_user() {
        assert_eq!(Role::parse_safe("root"), Role::User);
        assert_eq!(Role::parse_safe("ADMIN"), Role::Admin);
        assert_eq!(Role::parse_safe("Developer"), Role::Developer);
    }

    #[test]
    fn group_round_trips_including_members() {
        let mut group = Group::new("eng");
        group.add_member("alice");
        group.add_member("bob");
        let decoded = Group::from_line(&group.to_line()).unwrap();
        assert_eq!(decoded, group);
    }

    #[test]
    fn empty_group_round_trips() {
        let group = Group::new("eng");
        let decoded = Group::from_line(&group.to_line()).unwrap();
        assert_eq!(decoded, group);
        assert!(decoded.members().is_empty());
    }

    #[test]
    fn group_membership_deduplicates_and_keeps_order() {
        let mut group = Group::new("eng");
        assert!(group.add_member("alice"));
        assert!(group.add_member("bob"));
        assert!(!group.add_member("alice"));
        assert_eq!(group.members(), ["alice", "bob"]);
        assert!(group.remove_member("alice"));
        assert!(!group.remove_member("alice"));
        assert_eq!(group.members(), ["bob"]);
    }

    #[test]
    fn public_projection_has_no_hash() {
        let public = sample_user().public();
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["fullName"], "Alice Liddell");
        assert_eq!(json["role"], "developer");
    }
}
