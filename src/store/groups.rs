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

//! Group store. Membership lookups scan every group; there is no reverse
//! index, which is fine at directory scale.

use crate::directory::errors::DirectoryError;
use crate::directory::models::Group;
use crate::store::snapshot::Snapshot;

pub struct GroupStore {
    snapshot: Box<dyn Snapshot>,
    records: Vec<Group>,
}

impl GroupStore {
    pub fn new(snapshot: Box<dyn Snapshot>) -> Self {
        Self {
            snapshot,
            records: Vec::new(),
        }
    }

    /// Clear in-memory state and reparse the snapshot, skipping blank and
    /// undecodable lines.
    pub fn load(&mut self) -> Result<(), DirectoryError> {
        self.records.clear();
        for line in self.snapshot.read_lines()? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(group) = Group::from_line(&line) {
                self.upsert(group);
            }
        }
        Ok(())
    }

    /// Rewrite the whole snapshot from memory.
    pub fn save(&self) -> Result<(), DirectoryError> {
        let lines: Vec<String> = self.records.iter().map(Group::to_line).collect();
        self.snapshot.write_lines(&lines)
    }

    pub fn find(&self, name: &str) -> Option<&Group> {
        self.records.iter().find(|g| g.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Group> {
        self.records.iter_mut().find(|g| g.name == name)
    }

    /// Insert or replace by name, keeping first-insertion order.
    pub fn upsert(&mut self, group: Group) {
        match self.find_mut(&group.name) {
            Some(existing) => *existing = group,
            None => self.records.push(group),
        }
    }

    /// Returns `false` if no such group existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|g| g.name != name);
        self.records.len() != before
    }

    pub fn list_all(&self) -> &[Group] {
        &self.records
    }

    /// Names of every group the username belongs to, in store order.
    pub fn groups_of_user(&self, username: &str) -> Vec<String> {
        self.records
            .iter()
            .filter(|g| g.contains(username))
            .map(|g| g.name.clone())
            .collect()
    }
}
