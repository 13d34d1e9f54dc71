//! Version-id generation and storage-key construction.
//!
//! A version id is a millisecond Unix timestamp plus a random alphanumeric
//! suffix. The suffix only exists to break ties when two publishes for the
//! same page land within one clock tick, so storage keys never collide
//! without any locking.

use rand::Rng;

use crate::error::CoreError;
use crate::types::DbId;

/// Hard ceiling on artifact size: 2 MiB.
///
/// This is an application-level guard checked before any network call is
/// made, independent of whatever limit the storage provider enforces.
pub const MAX_ARTIFACT_BYTES: usize = 2 * 1024 * 1024;

/// Length of the random tie-breaking suffix.
const SUFFIX_LEN: usize = 8;

const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a fresh version id: `{unix_millis}-{random_suffix}`.
pub fn generate_version_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{millis}-{suffix}")
}

/// Build the deterministic object-store key for a page version.
///
/// Layout: `pages/{page_id}/{version}/index.html`. The versioned key
/// guarantees no two publishes ever share a key, which is what makes
/// artifacts safe to cache forever.
pub fn storage_key(page_id: DbId, version: &str) -> String {
    format!("pages/{page_id}/{version}/index.html")
}

/// Enforce the artifact size ceiling.
///
/// A payload of exactly [`MAX_ARTIFACT_BYTES`] passes; one byte over fails.
pub fn check_payload_size(size_bytes: usize) -> Result<(), CoreError> {
    if size_bytes > MAX_ARTIFACT_BYTES {
        return Err(CoreError::PayloadTooLarge {
            size_bytes,
            limit_bytes: MAX_ARTIFACT_BYTES,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_ids_are_unique_within_one_millisecond() {
        // Generating many ids back-to-back guarantees same-tick collisions
        // would surface if the suffix did not break ties.
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generate_version_id()));
        }
    }

    #[test]
    fn version_id_has_timestamp_and_suffix() {
        let id = generate_version_id();
        let (millis, suffix) = id.split_once('-').expect("id must contain a dash");
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), SUFFIX_LEN);
    }

    #[test]
    fn storage_key_layout() {
        assert_eq!(
            storage_key(42, "1700000000000-abcd1234"),
            "pages/42/1700000000000-abcd1234/index.html"
        );
    }

    #[test]
    fn payload_at_ceiling_passes() {
        assert!(check_payload_size(MAX_ARTIFACT_BYTES).is_ok());
    }

    #[test]
    fn payload_one_byte_over_ceiling_fails() {
        let err = check_payload_size(MAX_ARTIFACT_BYTES + 1).unwrap_err();
        match err {
            CoreError::PayloadTooLarge {
                size_bytes,
                limit_bytes,
            } => {
                assert_eq!(size_bytes, MAX_ARTIFACT_BYTES + 1);
                assert_eq!(limit_bytes, MAX_ARTIFACT_BYTES);
            }
            other => panic!("expected PayloadTooLarge, got {other:?}"),
        }
    }
}
