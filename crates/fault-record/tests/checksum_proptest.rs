//! Property-based tests for the record checksum.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use fault_record::checksum::{crc32, record_crc32};
use fault_record::config::{CRC32_INIT, CRC32_POLYNOMIAL};
use proptest::prelude::*;

proptest! {
    /// Feeding two halves in sequence equals feeding their concatenation.
    #[test]
    fn checksum_is_incremental(data in proptest::collection::vec(any::<u8>(), 0..256), split in 0usize..256) {
        let split = split.min(data.len());
        let (head, tail) = data.split_at(split);
        let staged = crc32(crc32(CRC32_INIT, head, CRC32_POLYNOMIAL), tail, CRC32_POLYNOMIAL);
        prop_assert_eq!(staged, crc32(CRC32_INIT, &data, CRC32_POLYNOMIAL));
    }

    /// Word feeding is byte feeding of the little-endian representation.
    #[test]
    fn words_are_fed_little_endian(words in proptest::collection::vec(any::<u32>(), 0..40)) {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        prop_assert_eq!(record_crc32(words.iter().copied()), crc32(CRC32_INIT, &bytes, CRC32_POLYNOMIAL));
    }

    /// Any single-bit flip in a word changes the checksum.
    #[test]
    fn single_bit_flip_is_detected(words in proptest::collection::vec(any::<u32>(), 1..40), index in 0usize..40, bit in 0u32..32) {
        let index = index % words.len();
        let mut flipped = words.clone();
        if let Some(word) = flipped.get_mut(index) {
            *word ^= 1u32.wrapping_shl(bit);
        }
        prop_assert_ne!(record_crc32(words), record_crc32(flipped));
    }
}

#[test]
fn empty_input_is_identity() {
    assert_eq!(crc32(CRC32_INIT, &[], CRC32_POLYNOMIAL), CRC32_INIT);
}
