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

//! Group CRUD and membership. Members need not exist as users; the group
//! must exist for membership changes.

use crate::directory::errors::DirectoryError;
use crate::directory::models::Group;
use crate::service::Shared;
use crate::store::GroupStore;
use tracing::info;

pub struct GroupService {
    groups: Shared<GroupStore>,
}

impl GroupService {
    pub fn new(groups: Shared<GroupStore>) -> Self {
        Self { groups }
    }

    pub async fn create_group(&self, name: &str) -> Result<(), DirectoryError> {
        let mut store = self.groups.lock().await;
        if store.find(name).is_some() {
            return Err(DirectoryError::AlreadyExists(format!("group {name}")));
        }
        store.upsert(Group::new(name));
        store.save()?;
        info!(group = name, "group created");
        Ok(())
    }

    pub async fn delete_group(&self, name: &str) -> Result<(), DirectoryError> {
        let mut store = self.groups.lock().await;
        if !store.remove(name) {
            return Err(DirectoryError::NotFound(format!("group {name}")));
        }
        store.save()?;
        info!(group = name, "group deleted");
        Ok(())
    }

    /// Adding an existing member is a no-op, not an error.
    pub async fn add_member(&self, name: &str, username: &str) -> Result<(), DirectoryError> {
        let mut store = self.groups.lock().await;
        {
            let group = store
                .find_mut(name)
                .ok_or_else(|| DirectoryError::NotFound(format!("group {name}")))?;
            group.add_member(username);
        }
        store.save()?;
        Ok(())
    }

    /// Removing a non-member is likewise a no-op.
    pub async fn remove_member(&self, name: &str, username: &str) -> Result<(), DirectoryError> {
        let mut store = self.groups.lock().await;
        {
            let group = store
                .find_mut(name)
                .ok_or_else(|| DirectoryError::NotFound(format!("group {name}")))?;
            group.remove_member(username);
        }
        store.save()?;
        Ok(())
    }

    pub async fn list_groups(&self) -> Vec<Group> {
        self.groups.lock().await.list_all().to_vec()
    }
}
