//! UUID-shaped identifiers.
//!
//! Output follows `xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx` with `y` in `{8,9,a,b}`.
//! The bytes come from the caller's [`RandomSource`](super::RandomSource), so
//! the value carries no uniqueness or unpredictability guarantee.

use rand::Rng;
use uuid::Builder;

/// Layout every pseudo-UUID follows.
pub const TEMPLATE: &str = "xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx";

pub const LENGTH: usize = 36;

pub fn generate_pseudo_uuid<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bytes: [u8; 16] = rng.gen();
    Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
}

/// Check `value` against [`TEMPLATE`].
pub fn matches_template(value: &str) -> bool {
    value.len() == LENGTH
        && value.chars().zip(TEMPLATE.chars()).all(|(c, t)| match t {
            'x' => matches!(c, '0'..='9' | 'a'..='f'),
            'y' => matches!(c, '8' | '9' | 'a' | 'b'),
            literal => c == literal,
        })
}
