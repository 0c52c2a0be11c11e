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

//! Runtime configuration, environment first with CLI overrides on top.
//! Unparseable values fall back to defaults rather than refusing to boot.

use crate::directory::constants::{config as env_keys, defaults};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub log_level: String,
    pub log_format: String, // "json" or "text"
    pub max_connections: usize,
    pub idle_timeout: Duration,
    pub bootstrap_password: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var(env_keys::ENV_BIND_ADDR)
                .unwrap_or_else(|_| defaults::BIND_ADDR.to_string()),
            data_dir: env::var(env_keys::ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(defaults::DATA_DIR)),
            log_level: env::var(env_keys::ENV_LOG_LEVEL).unwrap_or_else(|_| "info".to_string()),
            log_format: env::var(env_keys::ENV_LOG_FORMAT).unwrap_or_else(|_| "text".to_string()),
            max_connections: env::var(env_keys::ENV_MAX_CONNECTIONS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults::MAX_CONNECTIONS),
            idle_timeout: Duration::from_secs(
                env::var(env_keys::ENV_IDLE_TIMEOUT_SECS)
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults::IDLE_TIMEOUT_SECS),
            ),
            bootstrap_password: env::var(env_keys::ENV_BOOTSTRAP_PASSWORD)
                .unwrap_or_else(|_| defaults::BOOTSTRAP_PASSWORD.to_string()),
        }
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(defaults::USERS_FILE)
    }

    pub fn groups_path(&self) -> PathBuf {
        self.data_dir.join(defaults::GROUPS_FILE)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: defaults::BIND_ADDR.to_string(),
            data_dir: PathBuf::from(defaults::DATA_DIR),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            max_connections: defaults::MAX_CONNECTIONS,
            idle_timeout: Duration::from_secs(defaults::IDLE_TIMEOUT_SECS),
            bootstrap_password: defaults::BOOTSTRAP_PASSWORD.to_string(),
        }
    }
}
