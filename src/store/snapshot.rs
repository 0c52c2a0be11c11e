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

//! Snapshot persistence backends.
//!
//! A store reads and writes its entire state as a sequence of lines; the
//! backend decides where those lines live. `FlatFile` is the production
//! backend, `Memory` backs tests without touching the filesystem.

use crate::directory::errors::DirectoryError;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

pub trait Snapshot: Send + Sync {
    /// Read every line of the current snapshot. A snapshot that has never
    /// been written reads as empty.
    fn read_lines(&self) -> Result<Vec<String>, DirectoryError>;

    /// Replace the snapshot wholesale.
    fn write_lines(&self, lines: &[String]) -> Result<(), DirectoryError>;
}

/// One newline-delimited file, rewritten in full on every save.
pub struct FlatFile {
    path: PathBuf,
}

impl FlatFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Snapshot for FlatFile {
    fn read_lines(&self) -> Result<Vec<String>, DirectoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        Ok(contents.lines().map(str::to_string).collect())
    }

    fn write_lines(&self, lines: &[String]) -> Result<(), DirectoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Write a sibling file first, then rename over the live snapshot:
        // an interruption mid-write can never truncate committed state.
        let mut tmp: OsString = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let mut body = lines.join("\n");
        if !body.is_empty() {
            body.push('\n');
        }
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Volatile backend for tests and ephemeral instances.
#[derive(Default)]
pub struct Memory {
    lines: Mutex<Vec<String>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Snapshot for Memory {
    fn read_lines(&self) -> Result<Vec<String>, DirectoryError> {
        let lines = self
            .lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(lines.clone())
    }

    fn write_lines(&self, lines: &[String]) -> Result<(), DirectoryError> {
        let mut slot = self
            .lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = lines.to_vec();
        Ok(())
    }
}
