//! Record validation errors.
//!
//! Nothing in the capture path can fail; these variants only describe why a
//! stored record cannot be trusted when it is read back.

use thiserror_no_std::Error;

/// Why a stored fault record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// The magic sentinel is absent: no capture has completed since the
    /// last clear (or since power-on).
    #[error("no fault record present")]
    NoRecord,
    /// The magic sentinel is present but the body does not match its checksum.
    #[error("invalid checksum: stored {stored:#010x}, computed {computed:#010x}")]
    InvalidChecksum {
        /// Checksum stored in the record.
        stored: u32,
        /// Checksum recomputed over the stored body.
        computed: u32,
    },
    /// A record image handed to [`FaultRecord::from_le_bytes`] is too short.
    ///
    /// [`FaultRecord::from_le_bytes`]: crate::FaultRecord::from_le_bytes
    #[error("record image is {actual} bytes, expected at least {expected}")]
    Truncated {
        /// Required image size in bytes.
        expected: usize,
        /// Size of the image that was supplied.
        actual: usize,
    },
}
