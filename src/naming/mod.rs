//! # Naming
//!
//! Random tokens, pseudo-UUIDs and timestamps used to name containers and
//! records. [`NameGenerator`] bundles them around an owned [`RandomSource`].

pub mod pseudo_uuid;
pub mod random;
pub mod timestamp;
pub mod token;

pub use pseudo_uuid::generate_pseudo_uuid;
pub use random::RandomSource;
pub use timestamp::TimestampFormatter;
pub use token::generate_token;

use crate::config::{GeneratorConfig, TimestampPrecision};
use crate::models::ContainerId;

/// Produces the names and identifiers of one container and its records.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    rng: RandomSource,
    token_length: usize,
    index_width: usize,
    timestamps: TimestampFormatter,
}

impl NameGenerator {
    pub fn new(
        rng: RandomSource,
        token_length: usize,
        index_width: usize,
        precision: TimestampPrecision,
    ) -> Self {
        Self {
            rng,
            token_length,
            index_width,
            timestamps: TimestampFormatter::new(precision),
        }
    }

    pub fn from_config(rng: RandomSource, config: &GeneratorConfig) -> Self {
        Self::new(
            rng,
            config.layout.token_length,
            config.layout.index_width,
            config.record.timestamp_precision,
        )
    }

    pub fn token(&mut self) -> String {
        generate_token(&mut self.rng, self.token_length)
    }

    pub fn pseudo_uuid(&mut self) -> String {
        generate_pseudo_uuid(&mut self.rng)
    }

    pub fn timestamp(&self) -> String {
        self.timestamps.now()
    }

    /// Identity for the container at 1-based `index`.
    pub fn container_id(&mut self, index: usize) -> ContainerId {
        let token = self.token();
        ContainerId::new(index, self.index_width, token)
    }

    /// Child generator with its own random stream.
    pub fn fork(&mut self) -> Self {
        Self {
            rng: self.rng.fork(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_ids_are_padded_and_tokenized() {
        let mut names =
            NameGenerator::new(RandomSource::seeded(3), 8, 4, TimestampPrecision::Micros);
        let id = names.container_id(7);
        assert!(id.as_str().starts_with("0007_"));
        assert_eq!(id.as_str().len(), 13);
        assert_eq!(id.index(), 7);
    }

    #[test]
    fn seeded_generators_agree() {
        let seeded =
            || NameGenerator::new(RandomSource::seeded(11), 8, 4, TimestampPrecision::Nanos);
        let (mut a, mut b) = (seeded(), seeded());
        assert_eq!(a.container_id(1), b.container_id(1));
        assert_eq!(a.pseudo_uuid(), b.pseudo_uuid());
    }
}
