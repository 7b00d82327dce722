//! Ticket token codec
//!
//! A ticket token is the opaque string embedded in an attendee's QR code:
//! the attendee id, the event id, and a random suffix joined by `-`. The
//! suffix only makes the string non-guessable; validity is always re-checked
//! against storage, never inferred from the token's own structure.

use rand::Rng;

/// Separator between token segments
pub const SEPARATOR: char = '-';

/// Random suffix length in bytes (hex-encoded to twice this many chars)
const ENTROPY_BYTES: usize = 8;

/// Identifiers carried by a parseable ticket token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketClaims {
    pub attendee_id: i64,
    pub event_id: i64,
}

/// Produce a fresh ticket token for a registration.
///
/// No collision check happens here; the storage-level uniqueness constraint
/// on the token column is the backstop.
pub fn issue(attendee_id: i64, event_id: i64) -> String {
    let mut bytes = [0u8; ENTROPY_BYTES];
    rand::thread_rng().fill(&mut bytes[..]);

    let mut suffix = String::with_capacity(ENTROPY_BYTES * 2);
    for byte in bytes {
        suffix.push_str(&format!("{:02x}", byte));
    }

    format!("{attendee_id}{SEPARATOR}{event_id}{SEPARATOR}{suffix}")
}

/// Syntactic check: exactly three non-empty `-`-separated segments.
///
/// A well-formed token is not necessarily a real ticket.
pub fn is_well_formed(token: &str) -> bool {
    let segments: Vec<&str> = token.split(SEPARATOR).collect();
    segments.len() == 3 && segments.iter().all(|s| !s.is_empty())
}

/// Extract the identifiers from a token.
///
/// Returns None when the token is not well-formed or either id segment is
/// not a decimal integer. The entropy suffix carries no data and is
/// discarded.
pub fn parse(token: &str) -> Option<TicketClaims> {
    if !is_well_formed(token) {
        return None;
    }

    let mut segments = token.split(SEPARATOR);
    let attendee_id = segments.next()?.parse::<i64>().ok()?;
    let event_id = segments.next()?.parse::<i64>().ok()?;

    Some(TicketClaims { attendee_id, event_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_issued_token_is_well_formed() {
        let token = issue(42, 7);
        assert!(is_well_formed(&token));
        assert!(token.starts_with("42-7-"));
    }

    #[test]
    fn test_issue_uses_fresh_entropy() {
        assert_ne!(issue(1, 1), issue(1, 1));
    }

    #[test]
    fn test_well_formed_rejects_wrong_segment_counts() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("justone"));
        assert!(!is_well_formed("two-segments"));
        assert!(!is_well_formed("a-b-c-d"));
    }

    #[test]
    fn test_well_formed_rejects_empty_segments() {
        assert!(!is_well_formed("-2-abc"));
        assert!(!is_well_formed("1--abc"));
        assert!(!is_well_formed("1-2-"));
        assert!(!is_well_formed("--"));
    }

    #[test]
    fn test_parse_rejects_non_numeric_ids() {
        assert_eq!(parse("abc-2-deadbeef"), None);
        assert_eq!(parse("1-def-deadbeef"), None);
        assert_eq!(parse("not well formed"), None);
    }

    #[test]
    fn test_parse_extracts_claims() {
        let claims = parse("15-3-0011223344556677").expect("token should parse");
        assert_eq!(claims.attendee_id, 15);
        assert_eq!(claims.event_id, 3);
    }

    proptest! {
        #[test]
        fn prop_round_trip(attendee_id in 1i64..=i64::MAX, event_id in 1i64..=i64::MAX) {
            let token = issue(attendee_id, event_id);
            let claims = parse(&token).expect("issued tokens always parse");
            prop_assert_eq!(claims.attendee_id, attendee_id);
            prop_assert_eq!(claims.event_id, event_id);
        }
    }
}
