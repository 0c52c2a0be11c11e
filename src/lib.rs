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

//! dirserve: a small flat-file directory service.
//!
//! This library provides the core logic for the dirserve daemon: a TCP
//! server speaking a line-oriented text protocol for authenticating
//! principals and managing users and groups under role-based access
//! control, with all state persisted to flat-file snapshots.

pub mod config;
pub mod directory;
pub mod server;
pub mod service;
pub mod store;
