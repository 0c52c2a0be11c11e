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

//! User CRUD. Every successful mutation persists before the lock drops,
//! so a reader admitted next always sees committed state.

use crate::directory::errors::DirectoryError;
use crate::directory::models::{Role, User};
use crate::directory::password;
use crate::service::Shared;
use crate::store::UserStore;
use tracing::info;

pub struct UserService {
    users: Shared<UserStore>,
}

impl UserService {
    pub fn new(users: Shared<UserStore>) -> Self {
        Self { users }
    }

    pub async fn create_user(
        &self,
        username: &str,
        plaintext: &str,
        email: &str,
        full_name: &str,
        role: Role,
    ) -> Result<(), DirectoryError> {
        let mut store = self.users.lock().await;
        if store.find(username).is_some() {
            return Err(DirectoryError::AlreadyExists(format!("user {username}")));
        }
        store.upsert(User {
            username: username.to_string(),
            password_hash: password::hash(plaintext),
            email: email.to_string(),
            full_name: full_name.to_string(),
            role,
        });
        store.save()?;
        info!(username, %role, "user created");
        Ok(())
    }

    pub async fn read_user(&self, username: &str) -> Result<User, DirectoryError> {
        self.users
            .lock()
            .await
            .find(username)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("user {username}")))
    }

    /// Email and full name only; role and password are immutable over the
    /// current protocol.
    pub async fn update_user(
        &self,
        username: &str,
        email: &str,
        full_name: &str,
    ) -> Result<(), DirectoryError> {
        let mut store = self.users.lock().await;
        {
            let user = store
                .find_mut(username)
                .ok_or_else(|| DirectoryError::NotFound(format!("user {username}")))?;
            user.email = email.to_string();
            user.full_name = full_name.to_string();
        }
        store.save()?;
        Ok(())
    }

    /// Group memberships are left behind on purpose; they are soft
    /// references and the group store is not consulted here.
    pub async fn delete_user(&self, username: &str) -> Result<(), DirectoryError> {
        let mut store = self.users.lock().await;
        if !store.remove(username) {
            return Err(DirectoryError::NotFound(format!("user {username}")));
        }
        store.save()?;
        info!(username, "user deleted");
        Ok(())
    }

    pub async fn list_all(&self) -> Vec<User> {
        self.users.lock().await.list_all().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Memory;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn service() -> UserService {
        UserService::new(Arc::new(Mutex::new(UserStore::new(Box::new(Memory::new())))))
    }

    #[tokio::test]
    async fn create_then_read_back() {
        let users = service();
        users
            .create_user("alice", "pw123", "a@example.com", "Alice Liddell", Role::User)
            .await
            .unwrap();
        let user = users.read_user("alice").await.unwrap();
        assert_eq!(user.full_name, "Alice Liddell");
        assert!(password::verify("pw123", &user.password_hash));
    }

    #[tokio::test]
    async fn duplicate_create_fails_without_overwriting() {
        let users = service();
        users
            .create_user("alice", "pw123", "", "", Role::User)
            .await
            .unwrap();
        let err = users
            .create_user("alice", "other", "", "", Role::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::AlreadyExists(_)));

        let unchanged = users.read_user("alice").await.unwrap();
        assert_eq!(unchanged.role, Role::User);
        assert!(password::verify("pw123", &unchanged.password_hash));
    }

    #[tokio::test]
    async fn update_touches_only_email_and_full_name() {
        let users = service();
        users
            .create_user("alice", "pw123", "old@example.com", "Old Name", Role::Developer)
            .await
            .unwrap();
        users
            .update_user("alice", "new@example.com", "New Name")
            .await
            .unwrap();

        let user = users.read_user("alice").await.unwrap();
        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.full_name, "New Name");
        assert_eq!(user.role, Role::Developer);
        assert!(password::verify("pw123", &user.password_hash));
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let users = service();
        assert!(matches!(
            users.delete_user("ghost").await,
            Err(DirectoryError::NotFound(_))
        ));
    }
}
