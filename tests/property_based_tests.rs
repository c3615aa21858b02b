mod common;

use common::strategies::*;
use proptest::prelude::*;
use std::collections::HashSet;

use batch_generator::naming::pseudo_uuid::{self, generate_pseudo_uuid};
use batch_generator::naming::timestamp::{date_part, matches_layout};
use batch_generator::naming::token::{generate_token, is_token_char};
use batch_generator::naming::{NameGenerator, RandomSource, TimestampFormatter};
use batch_generator::{ContainerId, Record, TimestampPrecision};

proptest! {
    /// Property: tokens have the requested length and only alphanumeric characters
    #[test]
    fn tokens_are_alphanumeric_with_requested_length(
        seed in any::<u64>(),
        length in token_length_strategy(),
    ) {
        let token = generate_token(&mut RandomSource::seeded(seed), length);
        prop_assert_eq!(token.len(), length);
        prop_assert!(token.chars().all(is_token_char));
    }

    /// Property: pseudo-UUIDs always follow the version-4 layout
    #[test]
    fn pseudo_uuids_follow_template(seed in any::<u64>()) {
        let mut rng = RandomSource::seeded(seed);
        for _ in 0..8 {
            let value = generate_pseudo_uuid(&mut rng);
            prop_assert!(pseudo_uuid::matches_template(&value), "bad pseudo-UUID: {}", value);
        }
    }

    /// Property: formatted timestamps match the layout and begin with their date
    #[test]
    fn timestamps_match_layout(
        instant in datetime_strategy(),
        precision in precision_strategy(),
    ) {
        let value = TimestampFormatter::new(precision).format(&instant);
        prop_assert!(matches_layout(&value, precision), "bad timestamp: {}", value);
        prop_assert_eq!(date_part(&value), instant.format("%Y-%m-%d").to_string());
    }

    /// Property: a record's date, folder and file name are derived from its inputs
    #[test]
    fn records_derive_date_and_file_name(
        seed in any::<u64>(),
        index in 1usize..=9999,
        instant in datetime_strategy(),
        precision in precision_strategy(),
    ) {
        let mut rng = RandomSource::seeded(seed);
        let id = ContainerId::new(index, 4, generate_token(&mut rng, 8));
        let timestamp = TimestampFormatter::new(precision).format(&instant);
        let record = Record::new(&id, timestamp.clone(), "Author", generate_pseudo_uuid(&mut rng));

        prop_assert_eq!(&record.folder, id.as_str());
        prop_assert_eq!(record.file_name, format!("{id}_{timestamp}.txt"));
        prop_assert_eq!(record.date, date_part(&timestamp).to_string());
        prop_assert_eq!(id.index(), index);
    }

    /// Property: the same seed yields the same container names
    #[test]
    fn seeded_generators_are_reproducible(seed in any::<u64>()) {
        let names = || NameGenerator::new(RandomSource::seeded(seed), 8, 4, TimestampPrecision::Micros);
        let (mut first, mut second) = (names(), names());
        for index in 1..=5 {
            prop_assert_eq!(first.fork().container_id(index), second.fork().container_id(index));
        }
    }
}

#[test]
fn short_tokens_collide() {
    // 100 draws from a 62-symbol alphabet cannot all be distinct
    let mut rng = RandomSource::seeded(3);
    let tokens: HashSet<String> = (0..100).map(|_| generate_token(&mut rng, 1)).collect();
    assert!(tokens.len() < 100);
}

#[test]
fn equal_seeds_repeat_tokens() {
    let first = generate_token(&mut RandomSource::seeded(11), 8);
    let second = generate_token(&mut RandomSource::seeded(11), 8);
    assert_eq!(first, second);
}
