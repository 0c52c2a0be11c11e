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

//! dirserve constants - single source of truth for configuration values.
//!
//! This module centralizes delimiters, limits, and default values so the
//! wire format and the persistence format are defined in exactly one place.

/// Configuration environment variables
pub mod config {
    pub const ENV_BIND_ADDR: &str = "DIRSERVE_BIND_ADDR";
    pub const ENV_DATA_DIR: &str = "DIRSERVE_DATA_DIR";
    pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
    pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
    pub const ENV_MAX_CONNECTIONS: &str = "DIRSERVE_MAX_CONNECTIONS";
    pub const ENV_IDLE_TIMEOUT_SECS: &str = "DIRSERVE_IDLE_TIMEOUT_SECS";
    pub const ENV_BOOTSTRAP_PASSWORD: &str = "DIRSERVE_BOOTSTRAP_PASSWORD";
}

/// Default configuration values
pub mod defaults {
    /// Default listen address
    pub const BIND_ADDR: &str = "127.0.0.1:5050";
    /// Default directory for flat-file snapshots
    pub const DATA_DIR: &str = "data";
    /// User snapshot file name inside the data directory
    pub const USERS_FILE: &str = "users.db";
    /// Group snapshot file name inside the data directory
    pub const GROUPS_FILE: &str = "groups.db";
    /// Maximum concurrently admitted connections
    pub const MAX_CONNECTIONS: usize = 256;
    /// Seconds a silent connection is kept open before being dropped
    pub const IDLE_TIMEOUT_SECS: u64 = 300;
    /// Account seeded on first boot
    pub const BOOTSTRAP_USERNAME: &str = "admin";
    /// Password of the seeded account; override via env in any real deployment
    pub const BOOTSTRAP_PASSWORD: &str = "admin123";
    /// Group seeded on first boot, containing the bootstrap account
    pub const BOOTSTRAP_GROUP: &str = "admins";
}

/// Transport limits (DoS protection)
pub mod limits {
    /// Maximum accepted request line length in bytes
    pub const MAX_LINE_BYTES: usize = 8 * 1024;
}

/// Wire protocol fixtures
pub mod wire {
    /// Greeting message sent as the first line on every connection
    pub const GREETING: &str = "dirserve ready";
    /// Farewell message sent before an EXIT-initiated close
    pub const FAREWELL: &str = "Bye";
}

/// Flat-file snapshot format
pub mod snapshot {
    /// Separates record fields within a line
    pub const FIELD_DELIMITER: char = ',';
    /// Separates member names inside a group's member field
    pub const MEMBER_DELIMITER: char = ';';
}

/// SSHA password hash layout
pub mod ssha {
    /// Scheme prefix on every stored hash
    pub const TAG: &str = "{SSHA}";
    /// Random salt length in bytes
    pub const SALT_LENGTH: usize = 8;
    /// SHA-256 digest length in bytes; the salt trails the digest
    pub const DIGEST_LENGTH: usize = 32;
}
