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

//! Salted one-way password hashing.
//!
//! Stored form: `{SSHA}` + base64(SHA-256(plaintext || salt) || salt) with
//! a random 8-byte salt. Verification fails closed: any malformed stored
//! value (missing tag, short payload, bad base64) is simply `false`.

use crate::directory::constants::ssha;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Hash a plaintext password into its tagged stored form.
pub fn hash(plaintext: &str) -> String {
    let mut salt = [0u8; ssha::SALT_LENGTH];
    rand::rng().fill(&mut salt[..]);

    let digest = digest_with_salt(plaintext, &salt);
    let mut combo = Vec::with_capacity(ssha::DIGEST_LENGTH + ssha::SALT_LENGTH);
    combo.extend_from_slice(&digest);
    combo.extend_from_slice(&salt);

    format!("{}{}", ssha::TAG, BASE64.encode(combo))
}

/// Verify a plaintext password against a stored tagged hash.
pub fn verify(plaintext: &str, stored: &str) -> bool {
    let Some(payload) = stored.strip_prefix(ssha::TAG) else {
        return false;
    };
    let Ok(combo) = BASE64.decode(payload) else {
        return false;
    };
    if combo.len() < ssha::DIGEST_LENGTH {
        return false;
    }
    let (digest, salt) = combo.split_at(ssha::DIGEST_LENGTH);
    let candidate = digest_with_salt(plaintext, salt);
    ct_eq(&candidate, digest)
}

fn digest_with_salt(plaintext: &str, salt: &[u8]) -> [u8; ssha::DIGEST_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hasher.update(salt);
    hasher.finalize().into()
}

// Constant-time equality: an early-exit loop would leak the length of the
// matching digest prefix through response timing.
fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
