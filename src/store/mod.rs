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

//! In-memory record stores backed by pluggable snapshot persistence.
//!
//! Each store owns every record of one entity type and is wrapped in a
//! single exclusive lock by its callers; the persistence backend only ever
//! sees whole snapshots.

pub mod groups;
pub mod snapshot;
pub mod users;

pub use groups::GroupStore;
pub use snapshot::{FlatFile, Memory, Snapshot};
pub use users::UserStore;
