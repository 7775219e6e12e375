//! ID generation.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Default prefix for bug IDs.
pub const DEFAULT_BUG_PREFIX: &str = "bug";

/// Generate a unique record ID with the given prefix.
///
/// IDs look like `<prefix>-<hash>` where the hash is lowercase base36
/// derived from SHA256 over the title, creation instant and a nonce.
/// The `exists` closure checks for collisions.
pub fn generate_id<F>(
    prefix: &str,
    title: &str,
    created_at: DateTime<Utc>,
    record_count: usize,
    exists: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let mut length = optimal_hash_length(record_count);

    loop {
        for nonce in 0..10 {
            let id = format!(
                "{prefix}-{}",
                compute_id_hash(&id_seed(title, created_at, nonce), length)
            );
            if !exists(&id) {
                return id;
            }
        }

        if length < 8 {
            length += 1;
        } else {
            let mut nonce = 10u32;
            loop {
                let hash_str = compute_id_hash(&id_seed(title, created_at, nonce), 12);
                let id = format!("{prefix}-{hash_str}");
                if !exists(&id) {
                    return id;
                }
                nonce += 1;
                if nonce > 1000 {
                    return format!("{prefix}-{hash_str}{nonce}");
                }
            }
        }
    }
}

/// Smallest hash length whose birthday-bound collision probability
/// stays under 25% for `record_count` records.
#[must_use]
#[allow(clippy::cast_precision_loss)]
fn optimal_hash_length(record_count: usize) -> usize {
    let n = record_count as f64;
    let max_prob = 0.25;

    for (len, exp) in [(3_usize, 3_i32), (4, 4), (5, 5), (6, 6), (7, 7), (8, 8)] {
        let space = 36_f64.powi(exp);
        let prob = 1.0 - (-n * n / (2.0 * space)).exp();
        if prob < max_prob {
            return len;
        }
    }
    8
}

fn id_seed(title: &str, created_at: DateTime<Utc>, nonce: u32) -> String {
    format!(
        "{}|{}|{}",
        title,
        created_at.timestamp_nanos_opt().unwrap_or(0),
        nonce
    )
}

fn compute_id_hash(input: &str, length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();

    let mut num = 0u64;
    for &byte in result.iter().take(8) {
        num = (num << 8) | u64::from(byte);
    }

    let mut encoded = base36_encode(num);
    if encoded.len() < length {
        encoded = format!("{encoded:0>length$}");
    }
    encoded.chars().take(length).collect()
}

fn base36_encode(mut num: u64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if num == 0 {
        return "0".to_string();
    }
    let mut chars = Vec::new();
    while num > 0 {
        chars.push(ALPHABET[(num % 36) as usize] as char);
        num /= 36;
    }
    chars.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_format() {
        let id = generate_id("bug", "Crash", Utc::now(), 0, |_| false);
        assert!(id.starts_with("bug-"));
        let hash = id.strip_prefix("bug-").unwrap();
        assert_eq!(hash.len(), 3);
        assert!(
            hash.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_generate_id_collision_handling() {
        let now = Utc::now();
        let mut generated = HashSet::new();
        for _ in 0..50 {
            let id = generate_id("bug", "Same title", now, generated.len(), |id| {
                generated.contains(id)
            });
            assert!(generated.insert(id), "duplicate id generated");
        }
    }

    #[test]
    fn test_hash_length_grows_with_count() {
        assert_eq!(optimal_hash_length(0), 3);
        assert!(optimal_hash_length(10_000) > optimal_hash_length(10));
        assert_eq!(optimal_hash_length(usize::MAX / 2), 8);
    }

    #[test]
    fn test_base36() {
        assert_eq!(base36_encode(0), "0");
        assert_eq!(base36_encode(35), "z");
        assert_eq!(base36_encode(36), "10");
    }
}
