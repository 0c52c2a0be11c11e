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

//! User store: the authoritative, insertion-ordered collection of users.

use crate::directory::errors::DirectoryError;
use crate::directory::models::User;
use crate::store::snapshot::Snapshot;
use tracing::warn;

pub struct UserStore {
    snapshot: Box<dyn Snapshot>,
    records: Vec<User>,
}

impl UserStore {
    pub fn new(snapshot: Box<dyn Snapshot>) -> Self {
        Self {
            snapshot,
            records: Vec::new(),
        }
    }

    /// Clear in-memory state and reparse the snapshot. Blank lines are
    /// skipped; undecodable lines are dropped, a partial record being worse
    /// than a missing one.
    pub fn load(&mut self) -> Result<(), DirectoryError> {
        self.records.clear();
        for line in self.snapshot.read_lines()? {
            if line.trim().is_empty() {
                continue;
            }
            match User::from_line(&line) {
                Some(user) => self.upsert(user),
                None => warn!("dropping malformed user record"),
            }
        }
        Ok(())
    }

    /// Rewrite the whole snapshot from memory.
    pub fn save(&self) -> Result<(), DirectoryError> {
        let lines: Vec<String> = self.records.iter().map(User::to_line).collect();
        self.snapshot.write_lines(&lines)
    }

    pub fn find(&self, username: &str) -> Option<&User> {
        self.records.iter().find(|u| u.username == username)
    }

    pub fn find_mut(&mut self, username: &str) -> Option<&mut User> {
        self.records.iter_mut().find(|u| u.username == username)
    }

    /// Insert or replace by username, keeping first-insertion order.
    pub fn upsert(&mut self, user: User) {
        match self.find_mut(&user.username) {
            Some(existing) => *existing = user,
            None => self.records.push(user),
        }
    }

    /// Returns `false` if no such user existed.
    pub fn remove(&mut self, username: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|u| u.username != username);
        self.records.len() != before
    }

    pub fn list_all(&self) -> &[User] {
        &self.records
    }
}
