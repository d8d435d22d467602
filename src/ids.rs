use rand::rngs::OsRng;
use rand::RngCore;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::storage::Store;

/// Symbols an identifier is drawn from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Shape of generated identifiers and how hard to look for a free one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IdPolicy {
    pub length: usize,
    pub max_retries: u32,
}

impl Default for IdPolicy {
    fn default() -> Self {
        IdPolicy {
            length: 4,
            max_retries: 10,
        }
    }
}

/// Source of random bytes for identifiers.
pub trait RandomSource: Send + Sync {
    fn fill(&self, buf: &mut [u8]);
}

/// The operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) {
        OsRng.fill_bytes(buf);
    }
}

/// Generate a candidate identifier of `length` symbols.
///
/// Each random byte is reduced modulo the alphabet size. 256 is not a multiple
/// of 62, so the first eight symbols come up slightly more often than the rest;
/// existing identifiers were minted this way and the mapping is kept as is.
pub fn generate_id(random: &dyn RandomSource, length: usize) -> String {
    let mut bytes = vec![0u8; length];
    random.fill(&mut bytes);
    bytes
        .iter()
        .map(|b| ALPHABET[*b as usize % ALPHABET.len()] as char)
        .collect()
}

/// Find an identifier that is not currently in use.
///
/// Only reads from the store. Another writer can still claim the identifier
/// between this check and the caller's `put`.
pub async fn allocate_id(
    store: &mut impl Store,
    random: &dyn RandomSource,
    policy: IdPolicy,
) -> crate::ApiResult<String> {
    for attempt in 1..=policy.max_retries {
        let candidate = generate_id(random, policy.length);
        if store.get(&candidate).await?.is_none() {
            return Ok(candidate);
        }
        debug!("id collision: id='{candidate}', attempt={attempt}");
    }

    warn!(
        "no free id after {} attempts at length {}",
        policy.max_retries, policy.length
    );
    Err(ApiError::IdentifierSpaceExhausted)
}
