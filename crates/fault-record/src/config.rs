//! Recorder-wide constants
//!
//! Every value that describes the on-memory format or the report layout lives
//! here. Capture, decoder and host tooling reference these constants rather
//! than hardcoding values.

/// Record format version, major part.
pub const FORMAT_VERSION_MAJOR: u8 = 0;

/// Record format version, minor part.
pub const FORMAT_VERSION_MINOR: u8 = 1;

/// Sentinel stored in `FaultRecord::magic` once a capture has completed
/// (ASCII "FltR" read as a little-endian word).
pub const MAGIC: u32 = 0x5274_6C46;

/// Initial value of the record checksum.
pub const CRC32_INIT: u32 = 0xFFFF_FFFF;

/// CRC-32 polynomial (MSB-first, IEEE 802.3 generator).
pub const CRC32_POLYNOMIAL: u32 = 0x04C1_1DB7;

/// Additional state context integrity signature (Armv8-M). Bit 0 selects
/// the FP/non-FP variant and is ignored when comparing.
pub const INTEGRITY_SIGNATURE: u32 = 0xFEFA_125A;

/// Mask applied to the stacked integrity signature before comparing.
pub const INTEGRITY_SIGNATURE_MASK: u32 = 0xFFFF_FFFE;

/// Width of the label column in the printed report.
pub const LABEL_WIDTH: usize = 18;

/// Crate version (synchronized with Cargo.toml)
pub const RECORDER_VERSION: &str = env!("CARGO_PKG_VERSION");
