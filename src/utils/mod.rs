//! Shared helpers for validation and input parsing

pub mod time_parser;
pub mod url_validator;

pub use time_parser::TimeParser;

use rand::RngExt;

/// Character set for generated short codes (lowercase + digits, matching
/// what the redirect service itself hands out)
const CODE_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of wizard-generated short codes
pub const GENERATED_CODE_LENGTH: usize = 12;

/// Generate a random short code of the given length
pub fn generate_random_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CODE_CHARS.len());
            CODE_CHARS[idx] as char
        })
        .collect()
}
