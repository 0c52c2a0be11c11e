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

//! Error taxonomy for the directory service.
//!
//! Business failures are ordinary values propagated with `?`; every variant
//! maps to one `status: ERROR` response line and never terminates the
//! connection that raised it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Unknown verb or too few arguments; carries the usage hint verbatim.
    #[error("{0}")]
    Malformed(String),

    #[error("Authenticate first")]
    NotAuthenticated,

    #[error("Permission denied")]
    PermissionDenied,

    /// The named entity (`user alice`, `group eng`) does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The named entity's key is already taken.
    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredential,

    /// Persistence failure. The inner diagnostic is for logs only.
    #[error("storage failure: {0}")]
    Storage(#[from] std::io::Error),
}

impl DirectoryError {
    /// Message presented to the remote client.
    ///
    /// Storage errors collapse to a fixed string so raw I/O diagnostics
    /// (paths, errno text) never reach the wire.
    pub fn wire_message(&self) -> String {
        match self {
            Self::Storage(_) => "Internal storage error".to_string(),
            other => other.to_string(),
        }
    }
}
