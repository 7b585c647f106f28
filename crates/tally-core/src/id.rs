//! Identifier generation for tally
//!
//! - Format: `ty-<hash>` with adaptive length
//! - Examples: `ty-VGhpcUxc`, `ty-9k2hQw_a`
//! - Hash ids are SHA-256 digests in the base64url alphabet, truncated short
//!   and lengthened only on collision
//!
//! Alternate scheme supported:
//! - `ulid`: time-ordered ULID identifiers
//!
//! Rubric documents may also carry human-authored ids (graders name items
//! `cat-0-item-1` and the like), so entity ids stay plain strings; this
//! module only covers generation of fresh ones.

use std::collections::HashSet;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, TallyError};

/// The standard id prefix
pub const ID_PREFIX: &str = "ty-";

/// Minimum hash suffix length
pub const MIN_HASH_LEN: usize = 8;

/// Maximum hash suffix length (full SHA-256 digest in base64url)
pub const MAX_HASH_LEN: usize = 43;

/// ID generation scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    /// Hash-based ids (default): `ty-<base64url>`
    #[default]
    Hash,
    /// ULID-based ids: `ty-<ulid>`
    Ulid,
}

impl FromStr for IdScheme {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hash" => Ok(IdScheme::Hash),
            "ulid" => Ok(IdScheme::Ulid),
            other => Err(TallyError::UnknownIdScheme(other.to_string())),
        }
    }
}

impl std::fmt::Display for IdScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdScheme::Hash => write!(f, "hash"),
            IdScheme::Ulid => write!(f, "ulid"),
        }
    }
}

/// Generate a new hash-based id
///
/// Uses adaptive length based on existing ids to minimize collisions
/// while keeping ids short.
pub fn generate_hash(name: &str, existing_ids: &HashSet<String>) -> String {
    let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or(0);
    let input = format!("{}:{}:{}", name, timestamp, rand_suffix());

    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = URL_SAFE_NO_PAD.encode(hasher.finalize());

    // Find minimum length that doesn't collide
    let mut len = MIN_HASH_LEN;
    loop {
        let candidate = format!("{}{}", ID_PREFIX, &digest[..len]);
        if !existing_ids.contains(&candidate) || len >= MAX_HASH_LEN {
            return candidate;
        }
        len += 1;
    }
}

/// Generate a new ULID-based id
pub fn generate_ulid() -> String {
    let ulid = ulid::Ulid::new();
    format!("{}{}", ID_PREFIX, ulid.to_string().to_lowercase())
}

/// Generate a new id using the specified scheme
pub fn generate(scheme: IdScheme, name: &str, existing_ids: &HashSet<String>) -> String {
    match scheme {
        IdScheme::Hash => generate_hash(name, existing_ids),
        IdScheme::Ulid => generate_ulid(),
    }
}

/// Generate a fresh id with no collision set
///
/// Entity factories use this when no store context is available.
pub fn fresh_id() -> String {
    generate_hash("", &HashSet::new())
}

/// Generate a random suffix for hash uniqueness
///
/// Mixes a process-local counter into the clock so back-to-back calls
/// within one timer tick still diverge.
fn rand_suffix() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let ticket = COUNTER.fetch_add(1, Ordering::Relaxed);
    (duration.as_nanos() as u64 ^ (duration.as_secs() * 1_000_000_007))
        ^ ticket.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Generate a slug from a name
pub fn slugify(name: &str) -> String {
    slug::slugify(name)
}

/// Generate a document filename from id and name
///
/// Format: `<id>-<slug(name)>.json`
/// Example: `ty-VGhpcUxc-problem-set-3.json`
pub fn filename(id: &str, name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        format!("{}.json", id)
    } else {
        format!("{}-{}.json", id, slug)
    }
}
