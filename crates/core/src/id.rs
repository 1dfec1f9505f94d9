//! Entity id generation and format validation.
//!
//! Ids are 24-character lowercase hex strings: a 4-byte unix-seconds prefix
//! followed by 8 random bytes. The timestamp prefix keeps freshly created
//! rows roughly id-ordered; the random tail makes collisions across
//! concurrent writers a non-issue.

use rand::RngCore;
use std::fmt::Write;

use crate::types::EntityId;

/// Generate a new 24-character hex entity id.
pub fn new_entity_id() -> EntityId {
    let secs = chrono::Utc::now().timestamp().max(0) as u32;
    let mut tail = [0u8; 8];
    rand::rng().fill_bytes(&mut tail);

    let mut id = String::with_capacity(24);
    write!(id, "{secs:08x}").expect("writing to a String cannot fail");
    for byte in tail {
        write!(id, "{byte:02x}").expect("writing to a String cannot fail");
    }
    id
}

/// Whether `candidate` is a well-formed entity id (24 lowercase hex chars).
///
/// Route handlers check this before touching the store so malformed ids
/// surface as 400 rather than leaking into queries.
pub fn is_valid_entity_id(candidate: &str) -> bool {
    candidate.len() == 24
        && candidate
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_valid() {
        for _ in 0..100 {
            let id = new_entity_id();
            assert_eq!(id.len(), 24);
            assert!(is_valid_entity_id(&id), "generated id {id} failed its own check");
        }
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = new_entity_id();
        let b = new_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(!is_valid_entity_id(""));
        assert!(!is_valid_entity_id("abc"));
        assert!(!is_valid_entity_id("5f2b8c9d1e3a4f5b6c7d8e9")); // 23 chars
        assert!(!is_valid_entity_id("5f2b8c9d1e3a4f5b6c7d8e9f0")); // 25 chars
        assert!(!is_valid_entity_id("5F2B8C9D1E3A4F5B6C7D8E9F")); // uppercase
        assert!(!is_valid_entity_id("5f2b8c9d1e3a4f5b6c7d8e9g")); // non-hex
    }

    #[test]
    fn accepts_well_formed_ids() {
        assert!(is_valid_entity_id("5f2b8c9d1e3a4f5b6c7d8e9f"));
        assert!(is_valid_entity_id("000000000000000000000000"));
    }
}
