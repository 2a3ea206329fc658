//! Bit-serial CRC-32 used to seal the fault record.
//!
//! MSB-first, no reflection, no final XOR, no lookup table. The routine is a
//! pure function over a byte slice so it is safe to run from the capture path
//! (no allocation, no statics, bounded stack use).
//!
//! With `init = 0xFFFF_FFFF` and polynomial `0x04C1_1DB7` this is the
//! CRC-32/MPEG-2 variant: the check value of `b"123456789"` is `0x0376_E6E7`.
//!
//! Because the running value is the only state, a checksum can be computed
//! incrementally: feeding `a` then `b` yields the same result as feeding
//! `a ‖ b` in one call.

use crate::config::{CRC32_INIT, CRC32_POLYNOMIAL};

/// Compute a CRC-32 over `data`, starting from `init`.
///
/// For each byte, the byte is XORed into the top byte of the running value,
/// then eight shift steps follow; whenever the bit shifted out is set the
/// running value is XORed with `polynomial`.
#[must_use]
pub fn crc32(init: u32, data: &[u8], polynomial: u32) -> u32 {
    data.iter().fold(init, |crc, &byte| {
        let mut crc = crc ^ u32::from(byte).wrapping_shl(24);
        for _ in 0..8 {
            let carry = crc & 0x8000_0000 != 0;
            crc = crc.wrapping_shl(1);
            if carry {
                crc ^= polynomial;
            }
        }
        crc
    })
}

/// Feed one 32-bit word, as its four little-endian bytes, into a running CRC.
#[must_use]
pub fn crc32_word(crc: u32, word: u32) -> u32 {
    crc32(crc, &word.to_le_bytes(), CRC32_POLYNOMIAL)
}

/// CRC over a sequence of words with the record's default parameters.
#[must_use]
pub fn record_crc32<I>(words: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    words.into_iter().fold(CRC32_INIT, crc32_word)
}
