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

//! Domain services: thin transactional wrappers over the stores.
//!
//! Each store sits behind one exclusive async lock; a service operation
//! holds the lock across its check-mutate-persist sequence so concurrent
//! connections serialize per entity type, never per record.

pub mod auth;
pub mod authz;
pub mod groups;
pub mod users;

use crate::store::{GroupStore, UserStore};
use std::sync::Arc;
use tokio::sync::Mutex;

pub use auth::AuthService;
pub use authz::AuthorizationService;
pub use groups::GroupService;
pub use users::UserService;

/// Shared handle to a store, one lock per entity type.
pub type Shared<T> = Arc<Mutex<T>>;

/// The singleton service bundle every connection handler borrows.
pub struct Services {
    pub auth: AuthService,
    pub authz: AuthorizationService,
    pub users: UserService,
    pub groups: GroupService,
}

impl Services {
    pub fn new(user_store: Shared<UserStore>, group_store: Shared<GroupStore>) -> Self {
        Self {
            auth: AuthService::new(user_store.clone()),
            authz: AuthorizationService::new(group_store.clone()),
            users: UserService::new(user_store),
            groups: GroupService::new(group_store),
        }
    }
}
