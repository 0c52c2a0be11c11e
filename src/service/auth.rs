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

//! Authentication: username + password against the stored hash.
//! No lockout, no rate limiting, no credential rotation.

use crate::directory::errors::DirectoryError;
use crate::directory::models::User;
use crate::directory::password;
use crate::service::Shared;
use crate::store::UserStore;
use tracing::debug;

pub struct AuthService {
    users: Shared<UserStore>,
}

impl AuthService {
    pub fn new(users: Shared<UserStore>) -> Self {
        Self { users }
    }

    /// `NotFound` for an unknown username, `InvalidCredential` when the
    /// hash check fails.
    pub async fn authenticate(
        &self,
        username: &str,
        plaintext: &str,
    ) -> Result<User, DirectoryError> {
        let store = self.users.lock().await;
        let user = store
            .find(username)
            .ok_or_else(|| DirectoryError::NotFound(format!("user {username}")))?;
        if !password::verify(plaintext, &user.password_hash) {
            debug!(username, "credential check failed");
            return Err(DirectoryError::InvalidCredential);
        }
        Ok(user.clone())
    }
}
