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

//! Authorization: group membership queries and the RBAC matrix.
//!
//! Two independent checks gate a command: the role matrix in
//! [`can_execute`], and the self-or-elevated ownership rule in
//! [`may_touch_account`] for the two commands that target an account.
//! Both must hold.

use crate::directory::models::Role;
use crate::server::command::Command;
use crate::service::Shared;
use crate::store::GroupStore;

pub struct AuthorizationService {
    groups: Shared<GroupStore>,
}

impl AuthorizationService {
    pub fn new(groups: Shared<GroupStore>) -> Self {
        Self { groups }
    }

    pub async fn is_member_of(&self, username: &str, group: &str) -> bool {
        self.groups
            .lock()
            .await
            .find(group)
            .is_some_and(|g| g.contains(username))
    }

    /// Ordered names of every group the user belongs to.
    pub async fn groups_of(&self, username: &str) -> Vec<String> {
        self.groups.lock().await.groups_of_user(username)
    }
}

/// The RBAC matrix. Admins may do anything; every other role is limited to
/// reads, listings, and account updates. All structural mutations are
/// admin-only, developers included.
pub fn can_execute(role: Role, command: &Command) -> bool {
    if matches!(role, Role::Admin) {
        return true;
    }
    match command {
        Command::ListUsers
        | Command::ReadUser { .. }
        | Command::UpdateUser { .. }
        | Command::ListGroups => true,

        Command::AddUser { .. }
        | Command::DeleteUser { .. }
        | Command::CreateGroup { .. }
        | Command::DeleteGroup { .. }
        | Command::AddMember { .. }
        | Command::RemoveMember { .. } => false,

        // Session commands are gated before RBAC, not by it.
        Command::Auth { .. } | Command::Logout | Command::Ping | Command::Exit => true,
    }
}

/// Self-or-elevated rule: READUSER/UPDATEUSER may only target the caller's
/// own account unless the caller is an admin or a developer.
pub fn may_touch_account(caller: &str, role: Role, target: &str) -> bool {
    caller == target || role.is_elevated()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::models::Group;
    use crate::store::Memory;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn all_commands() -> Vec<Command> {
        vec![
            Command::AddUser {
                username: "x".into(),
                password: "p".into(),
                role: Role::User,
                email: String::new(),
                full_name: String::new(),
            },
            Command::ReadUser { username: "x".into() },
            Command::UpdateUser {
                username: "x".into(),
                email: String::new(),
                full_name: String::new(),
            },
            Command::DeleteUser { username: "x".into() },
            Command::ListUsers,
            Command::CreateGroup { name: "g".into() },
            Command::DeleteGroup { name: "g".into() },
            Command::AddMember {
                username: "x".into(),
                group: "g".into(),
            },
            Command::RemoveMember {
                username: "x".into(),
                group: "g".into(),
            },
            Command::ListGroups,
        ]
    }

    #[test]
    fn admin_may_execute_everything() {
        for command in all_commands() {
            assert!(can_execute(Role::Admin, &command), "{}", command.verb());
        }
    }

    #[test]
    fn non_admin_matrix_is_read_list_update_only() {
        for role in [Role::Developer, Role::User] {
            for command in all_commands() {
                let expected = matches!(
                    command,
                    Command::ListUsers
                        | Command::ReadUser { .. }
                        | Command::UpdateUser { .. }
                        | Command::ListGroups
                );
                assert_eq!(
                    can_execute(role, &command),
                    expected,
                    "role {role} verb {}",
                    command.verb()
                );
            }
        }
    }

    #[test]
    fn developer_cannot_mutate_structure() {
        // developers look privileged but the matrix denies them mutations
        let command = Command::DeleteGroup { name: "eng".into() };
        assert!(!can_execute(Role::Developer, &command));
    }

    #[test]
    fn ownership_rule_is_self_or_elevated() {
        assert!(may_touch_account("alice", Role::User, "alice"));
        assert!(!may_touch_account("alice", Role::User, "bob"));
        assert!(may_touch_account("alice", Role::Developer, "bob"));
        assert!(may_touch_account("alice", Role::Admin, "bob"));
    }

    #[tokio::test]
    async fn membership_queries_reflect_the_store() {
        let mut store = GroupStore::new(Box::new(Memory::new()));
        let mut eng = Group::new("eng");
        eng.add_member("alice");
        store.upsert(eng);
        store.upsert(Group::new("ops"));

        let authz = AuthorizationService::new(Arc::new(Mutex::new(store)));
        assert!(authz.is_member_of("alice", "eng").await);
        assert!(!authz.is_member_of("alice", "ops").await);
        assert!(!authz.is_member_of("alice", "missing").await);
        assert_eq!(authz.groups_of("alice").await, ["eng"]);
    }
}
