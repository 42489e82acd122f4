//! Deduplication keys for error events.

use chrono::{DateTime, TimeZone, Utc};
use sha2::{Digest, Sha256};

const FIELD_SEPARATOR: [u8; 1] = [0x1f];

/// SHA-256 hex digest of message, stack, route and action.
pub fn fingerprint(message: &str, stack: Option<&str>, route: &str, action: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [message, stack.unwrap_or(""), route, action] {
        hasher.update(part.as_bytes());
        hasher.update(FIELD_SEPARATOR);
    }
    hex::encode(hasher.finalize())
}

/// Opaque rate-limit key for a client: hash of IP and session id.
pub fn actor_hash(ip: &str, session_id: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ip.as_bytes());
    hasher.update(b":");
    hasher.update(session_id.unwrap_or("anon").as_bytes());
    hex::encode(hasher.finalize())
}

/// Floor a timestamp to the start of its dedup window.
pub fn time_bucket(at: DateTime<Utc>, window_seconds: i64) -> DateTime<Utc> {
    let window = window_seconds.max(1);
    let secs = at.timestamp();
    let floored = secs - secs.rem_euclid(window);
    Utc.timestamp_opt(floored, 0).single().unwrap_or(at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        let a = fingerprint("boom", Some("at x"), "/", "load");
        let b = fingerprint("boom", Some("at x"), "/", "load");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_distinguishes_fields() {
        let a = fingerprint("ab", None, "c", "d");
        let b = fingerprint("a", None, "bc", "d");
        assert_ne!(a, b);
        assert_ne!(
            fingerprint("boom", None, "/", "load"),
            fingerprint("boom", None, "/", "save")
        );
    }

    #[test]
    fn test_actor_hash_defaults_session() {
        assert_eq!(actor_hash("10.0.0.1", None), actor_hash("10.0.0.1", Some("anon")));
        assert_ne!(actor_hash("10.0.0.1", None), actor_hash("10.0.0.2", None));
    }

    #[test]
    fn test_time_bucket_floors() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 17, 42).unwrap();
        let bucket = time_bucket(at, 600);
        assert_eq!(bucket, Utc.with_ymd_and_hms(2024, 5, 1, 10, 10, 0).unwrap());

        let later = Utc.with_ymd_and_hms(2024, 5, 1, 10, 19, 59).unwrap();
        assert_eq!(time_bucket(later, 600), bucket);

        let next = Utc.with_ymd_and_hms(2024, 5, 1, 10, 20, 0).unwrap();
        assert_ne!(time_bucket(next, 600), bucket);
    }
}
