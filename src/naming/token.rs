//! Random alphanumeric tokens.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Number of distinct characters a token may contain (`A-Z`, `a-z`, `0-9`).
pub const ALPHABET_SIZE: usize = 62;

/// Draw `length` characters uniformly, with replacement, from the 62-character
/// alphanumeric alphabet. Two calls may return the same token.
pub fn generate_token<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

pub fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}
