// Filename derivation for stored faxes.

use chrono::{DateTime, Utc};

/// Build the name a fax is stored under:
/// `<utc timestamp>-from-<sender>-to-<recipient>.pdf`.
///
/// Sender and recipient are the event numbers with their two-character
/// dial prefix (`+1`) removed, so two faxes between the same pair of
/// numbers only collide if they arrive within the same second.
pub fn fax_filename(received_at: DateTime<Utc>, from: &str, to: &str) -> String {
    format!(
        "{}-from-{}-to-{}.pdf",
        received_at.format("%Y-%m-%d-%H-%M-%S"),
        strip_dial_prefix(from),
        strip_dial_prefix(to),
    )
}

/// Drop the first two characters of a phone-number-like string.
///
/// Inbound numbers arrive as `+1XXXXXXXXXX`; the stored name keeps only
/// the national digits. Inputs shorter than the prefix yield an empty
/// string rather than panicking.
pub fn strip_dial_prefix(number: &str) -> &str {
    match number.char_indices().nth(2) {
        Some((idx, _)) => &number[idx..],
        None => "",
    }
}

// ============================================================================
// TESTS
// ============================================================================
