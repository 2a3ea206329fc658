//! The fault record: a fixed-layout, checksummed, self-describing structure.
//!
//! Memory layout (35 little-endian words, 140 bytes):
//!
//! ```text
//! [0]      magic                      0x5274_6C46 once capture completed
//! [1]      checksum                   CRC-32 over the body (see below)
//! [2]      format                     FormatDescriptor bits
//! [3..11]  state_context              R0-R3, R12, LR, ReturnAddress, xPSR
//! [11..15] common                     xPSR, EXC_RETURN, MSP, PSP (live)
//! [15..21] fault_registers            CFSR, HFSR, DFSR, MMFAR, BFAR, AFSR
//! [21..31] additional_context         IntegritySignature, Reserved, R4-R11
//! [31..33] stack_limits               MSPLIM, PSPLIM (live)
//! [33..35] secure_fault_registers     SFSR, SFAR (Mainline, Secure world)
//! ```
//!
//! The checksummed body is `format`, `state_context`, `common`, then only the
//! optional blocks the descriptor declares present. A reader therefore needs
//! nothing but the record itself to recompute the checksum.

use crate::checksum::record_crc32;
use crate::config::{INTEGRITY_SIGNATURE, INTEGRITY_SIGNATURE_MASK, MAGIC};
use crate::error::RecordError;
use crate::profile::TargetProfile;

// ─── Format descriptor ───────────────────────────────────────────────────────

const FORMAT_FAULT_REGISTERS: u32 = 1 << 16;
const FORMAT_EXTENDED: u32 = 1 << 17;
const FORMAT_SECURE: u32 = 1 << 18;

/// Record format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatVersion {
    /// Major version.
    pub major: u8,
    /// Minor version.
    pub minor: u8,
}

/// Which optional blocks a record contains and where it was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatDescriptor {
    /// Record format version.
    pub version: FormatVersion,
    /// Fault status registers were captured.
    pub fault_registers: bool,
    /// Armv8-M extended variant: additional state context and stack limits.
    pub extended: bool,
    /// Captured while running in the Secure world.
    pub secure: bool,
}

impl FormatDescriptor {
    /// Pack into the `format` word.
    #[allow(clippy::cast_lossless)] // u32::from is not const
    pub const fn to_bits(self) -> u32 {
        let mut bits = (self.version.minor as u32) | (self.version.major as u32).wrapping_shl(8);
        if self.fault_registers {
            bits |= FORMAT_FAULT_REGISTERS;
        }
        if self.extended {
            bits |= FORMAT_EXTENDED;
        }
        if self.secure {
            bits |= FORMAT_SECURE;
        }
        bits
    }

    /// Unpack a `format` word. Reserved bits are ignored.
    #[allow(clippy::cast_possible_truncation)] // both fields are masked to 8 bits
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            version: FormatVersion {
                minor: (bits & 0xFF) as u8,
                major: (bits.wrapping_shr(8) & 0xFF) as u8,
            },
            fault_registers: bits & FORMAT_FAULT_REGISTERS != 0,
            extended: bits & FORMAT_EXTENDED != 0,
            secure: bits & FORMAT_SECURE != 0,
        }
    }

    /// The Secure fault register block is part of the record.
    ///
    /// Armv8-M Baseline has no fault status registers at all, so a Secure
    /// Baseline record carries no SFSR/SFAR either.
    pub const fn has_secure_fault_registers(self) -> bool {
        self.fault_registers && self.extended && self.secure
    }
}

// ─── Register blocks ─────────────────────────────────────────────────────────

/// Basic exception frame pushed by hardware on trap entry.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)] // fields are the architectural register names
pub struct StateContext {
    pub r0: u32,
    pub r1: u32,
    pub r2: u32,
    pub r3: u32,
    pub r12: u32,
    /// Link register before the exception.
    pub lr: u32,
    /// Address of the faulting (or next) instruction.
    pub return_address: u32,
    /// Program status register before the exception.
    pub xpsr: u32,
}

impl StateContext {
    /// Words in the block, in stacking order.
    pub const WORDS: usize = 8;

    /// Block contents in stacking order.
    pub const fn words(&self) -> [u32; Self::WORDS] {
        [
            self.r0,
            self.r1,
            self.r2,
            self.r3,
            self.r12,
            self.lr,
            self.return_address,
            self.xpsr,
        ]
    }

    /// Build from words in stacking order.
    pub const fn from_words(words: [u32; Self::WORDS]) -> Self {
        let [r0, r1, r2, r3, r12, lr, return_address, xpsr] = words;
        Self {
            r0,
            r1,
            r2,
            r3,
            r12,
            lr,
            return_address,
            xpsr,
        }
    }
}

/// Armv8-M additional state context (stacked when EXC_RETURN.DCRS == 0).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)] // fields are the architectural register names
pub struct AdditionalStateContext {
    /// Integrity signature; bit 0 reflects the frame type.
    pub integrity_signature: u32,
    pub reserved: u32,
    pub r4: u32,
    pub r5: u32,
    pub r6: u32,
    pub r7: u32,
    pub r8: u32,
    pub r9: u32,
    pub r10: u32,
    pub r11: u32,
}

impl AdditionalStateContext {
    /// Words in the block, in stacking order.
    pub const WORDS: usize = 10;

    /// Block contents in stacking order.
    pub const fn words(&self) -> [u32; Self::WORDS] {
        [
            self.integrity_signature,
            self.reserved,
            self.r4,
            self.r5,
            self.r6,
            self.r7,
            self.r8,
            self.r9,
            self.r10,
            self.r11,
        ]
    }

    /// Build from words in stacking order.
    pub const fn from_words(words: [u32; Self::WORDS]) -> Self {
        let [integrity_signature, reserved, r4, r5, r6, r7, r8, r9, r10, r11] = words;
        Self {
            integrity_signature,
            reserved,
            r4,
            r5,
            r6,
            r7,
            r8,
            r9,
            r10,
            r11,
        }
    }

    /// The stacked signature matches the architectural pattern.
    pub const fn signature_valid(&self) -> bool {
        self.integrity_signature & INTEGRITY_SIGNATURE_MASK == INTEGRITY_SIGNATURE
    }

    /// R4-R11 paired with their report labels.
    pub const fn named_registers(&self) -> [(&'static str, u32); 8] {
        [
            ("- R4:", self.r4),
            ("- R5:", self.r5),
            ("- R6:", self.r6),
            ("- R7:", self.r7),
            ("- R8:", self.r8),
            ("- R9:", self.r9),
            ("- R10:", self.r10),
            ("- R11:", self.r11),
        ]
    }
}

/// Registers read live in the capture routine.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommonRegisters {
    /// xPSR inside the exception handler (IPSR holds the exception number).
    pub xpsr: u32,
    /// EXC_RETURN value of the trap.
    pub exc_return: u32,
    /// Main stack pointer at trap entry.
    pub msp: u32,
    /// Process stack pointer at trap entry.
    pub psp: u32,
}

impl CommonRegisters {
    /// Words in the block.
    pub const WORDS: usize = 4;

    /// Block contents in layout order.
    pub const fn words(&self) -> [u32; Self::WORDS] {
        [self.xpsr, self.exc_return, self.msp, self.psp]
    }

    /// Build from words in layout order.
    pub const fn from_words(words: [u32; Self::WORDS]) -> Self {
        let [xpsr, exc_return, msp, psp] = words;
        Self {
            xpsr,
            exc_return,
            msp,
            psp,
        }
    }
}

/// Armv8-M stack limit registers, read live.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)] // fields are the architectural register names
pub struct StackLimits {
    pub msplim: u32,
    pub psplim: u32,
}

impl StackLimits {
    /// Words in the block.
    pub const WORDS: usize = 2;

    /// Block contents in layout order.
    pub const fn words(&self) -> [u32; Self::WORDS] {
        [self.msplim, self.psplim]
    }

    /// Build from words in layout order.
    pub const fn from_words(words: [u32; Self::WORDS]) -> Self {
        let [msplim, psplim] = words;
        Self { msplim, psplim }
    }
}

/// System Control Block fault status and address registers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)] // fields are the architectural register names
pub struct FaultRegisters {
    pub cfsr: u32,
    pub hfsr: u32,
    pub dfsr: u32,
    pub mmfar: u32,
    pub bfar: u32,
    pub afsr: u32,
}

impl FaultRegisters {
    /// Words in the block.
    pub const WORDS: usize = 6;

    /// Block contents in layout order.
    pub const fn words(&self) -> [u32; Self::WORDS] {
        [
            self.cfsr, self.hfsr, self.dfsr, self.mmfar, self.bfar, self.afsr,
        ]
    }

    /// Build from words in layout order.
    pub const fn from_words(words: [u32; Self::WORDS]) -> Self {
        let [cfsr, hfsr, dfsr, mmfar, bfar, afsr] = words;
        Self {
            cfsr,
            hfsr,
            dfsr,
            mmfar,
            bfar,
            afsr,
        }
    }
}

/// Armv8-M Mainline SecureFault status and address.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)] // fields are the architectural register names
pub struct SecureFaultRegisters {
    pub sfsr: u32,
    pub sfar: u32,
}

impl SecureFaultRegisters {
    /// Words in the block.
    pub const WORDS: usize = 2;

    /// Block contents in layout order.
    pub const fn words(&self) -> [u32; Self::WORDS] {
        [self.sfsr, self.sfar]
    }

    /// Build from words in layout order.
    pub const fn from_words(words: [u32; Self::WORDS]) -> Self {
        let [sfsr, sfar] = words;
        Self { sfsr, sfar }
    }
}

// ─── FaultRecord ─────────────────────────────────────────────────────────────

/// The single persisted fault record.
///
/// Fields are public so the capture routine and host tooling can fill them
/// directly; readers should prefer the descriptor-gated accessors
/// ([`FaultRecord::fault_registers`] and friends), which return `None` for
/// blocks the record does not contain.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaultRecord {
    /// [`MAGIC`] once a capture has completed; written last.
    pub magic: u32,
    /// CRC-32 over the body.
    pub checksum: u32,
    /// Packed [`FormatDescriptor`].
    pub format: u32,
    /// Hardware-stacked basic frame.
    pub state_context: StateContext,
    /// Live registers at capture time.
    pub common: CommonRegisters,
    /// Fault status registers (if the descriptor says so).
    pub fault_registers: FaultRegisters,
    /// Armv8-M additional state context (if extended).
    pub additional_context: AdditionalStateContext,
    /// Armv8-M stack limits (if extended).
    pub stack_limits: StackLimits,
    /// SecureFault registers (if extended and secure).
    pub secure_fault_registers: SecureFaultRegisters,
}

const _: () = assert!(core::mem::size_of::<FaultRecord>() == FaultRecord::SIZE);
const _: () = assert!(core::mem::align_of::<FaultRecord>() == core::mem::align_of::<u32>());

impl FaultRecord {
    /// Number of 32-bit words in the in-memory layout.
    pub const WORDS: usize = 3
        + StateContext::WORDS
        + CommonRegisters::WORDS
        + FaultRegisters::WORDS
        + AdditionalStateContext::WORDS
        + StackLimits::WORDS
        + SecureFaultRegisters::WORDS;

    /// Size of the in-memory layout in bytes.
    pub const SIZE: usize = Self::WORDS * 4;

    /// An all-zero record (no magic, so not trustworthy).
    pub const fn zeroed() -> Self {
        Self {
            magic: 0,
            checksum: 0,
            format: 0,
            state_context: StateContext::from_words([0; StateContext::WORDS]),
            common: CommonRegisters::from_words([0; CommonRegisters::WORDS]),
            fault_registers: FaultRegisters::from_words([0; FaultRegisters::WORDS]),
            additional_context: AdditionalStateContext::from_words(
                [0; AdditionalStateContext::WORDS],
            ),
            stack_limits: StackLimits::from_words([0; StackLimits::WORDS]),
            secure_fault_registers: SecureFaultRegisters::from_words(
                [0; SecureFaultRegisters::WORDS],
            ),
        }
    }

    /// Erase the record. Afterwards the magic is absent.
    pub fn clear(&mut self) {
        *self = Self::zeroed();
    }

    /// Unpacked format descriptor.
    pub const fn descriptor(&self) -> FormatDescriptor {
        FormatDescriptor::from_bits(self.format)
    }

    /// Fault status registers, if the record contains them.
    pub fn fault_registers(&self) -> Option<&FaultRegisters> {
        self.descriptor()
            .fault_registers
            .then_some(&self.fault_registers)
    }

    /// Additional state context, if the record is the extended variant.
    pub fn additional_context(&self) -> Option<&AdditionalStateContext> {
        self.descriptor()
            .extended
            .then_some(&self.additional_context)
    }

    /// Stack limit registers, if the record is the extended variant.
    pub fn stack_limits(&self) -> Option<&StackLimits> {
        self.descriptor().extended.then_some(&self.stack_limits)
    }

    /// SecureFault registers, if the record is extended and Secure.
    pub fn secure_fault_registers(&self) -> Option<&SecureFaultRegisters> {
        self.descriptor()
            .has_secure_fault_registers()
            .then_some(&self.secure_fault_registers)
    }

    /// Checksummed words: the descriptor, the mandatory blocks, then every
    /// optional block the descriptor declares present.
    pub fn body_words(&self) -> impl Iterator<Item = u32> + '_ {
        let descriptor = self.descriptor();
        let fault = descriptor
            .fault_registers
            .then(|| self.fault_registers.words());
        let additional = descriptor
            .extended
            .then(|| self.additional_context.words());
        let limits = descriptor.extended.then(|| self.stack_limits.words());
        let secure = descriptor
            .has_secure_fault_registers()
            .then(|| self.secure_fault_registers.words());

        core::iter::once(self.format)
            .chain(self.state_context.words())
            .chain(self.common.words())
            .chain(fault.into_iter().flatten())
            .chain(additional.into_iter().flatten())
            .chain(limits.into_iter().flatten())
            .chain(secure.into_iter().flatten())
    }

    /// Recompute the checksum over the stored body.
    pub fn compute_checksum(&self) -> u32 {
        record_crc32(self.body_words())
    }

    /// Check magic and checksum.
    ///
    /// # Errors
    ///
    /// - [`RecordError::NoRecord`] if the magic is absent
    /// - [`RecordError::InvalidChecksum`] if the body does not match
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.magic != MAGIC {
            return Err(RecordError::NoRecord);
        }
        let computed = self.compute_checksum();
        if computed != self.checksum {
            return Err(RecordError::InvalidChecksum {
                stored: self.checksum,
                computed,
            });
        }
        Ok(())
    }

    /// Magic present and checksum matches.
    pub fn is_trustworthy(&self) -> bool {
        self.validate().is_ok()
    }

    /// The hardware-stacked frame can be trusted.
    ///
    /// Without fault status registers there is no way to detect a stacking
    /// failure, so the frame is assumed valid.
    pub fn stacked_context_valid(&self, profile: &TargetProfile) -> bool {
        self.fault_registers()
            .map_or(true, |regs| regs.cfsr & profile.stacking_error_mask() == 0)
    }

    /// All 35 words in memory order.
    pub fn to_words(&self) -> [u32; Self::WORDS] {
        let all = [self.magic, self.checksum, self.format]
            .into_iter()
            .chain(self.state_context.words())
            .chain(self.common.words())
            .chain(self.fault_registers.words())
            .chain(self.additional_context.words())
            .chain(self.stack_limits.words())
            .chain(self.secure_fault_registers.words());
        let mut words = [0u32; Self::WORDS];
        for (slot, word) in words.iter_mut().zip(all) {
            *slot = word;
        }
        words
    }

    /// Rebuild a record from its 35 words in memory order.
    pub fn from_words(words: &[u32; Self::WORDS]) -> Self {
        let mut it = words.iter().copied();
        let [magic, checksum, format] = take(&mut it);
        Self {
            magic,
            checksum,
            format,
            state_context: StateContext::from_words(take(&mut it)),
            common: CommonRegisters::from_words(take(&mut it)),
            fault_registers: FaultRegisters::from_words(take(&mut it)),
            additional_context: AdditionalStateContext::from_words(take(&mut it)),
            stack_limits: StackLimits::from_words(take(&mut it)),
            secure_fault_registers: SecureFaultRegisters::from_words(take(&mut it)),
        }
    }

    /// Memory image, as a debugger would dump it from a little-endian target.
    pub fn to_le_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(self.to_words()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// Parse a memory image. Bytes beyond [`FaultRecord::SIZE`] are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Truncated`] if fewer than
    /// [`FaultRecord::SIZE`] bytes are supplied.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        let truncated = RecordError::Truncated {
            expected: Self::SIZE,
            actual: bytes.len(),
        };
        let image = bytes.get(..Self::SIZE).ok_or(truncated)?;
        let mut words = [0u32; Self::WORDS];
        for (slot, chunk) in words.iter_mut().zip(image.chunks_exact(4)) {
            let chunk: [u8; 4] = chunk.try_into().map_err(|_| truncated)?;
            *slot = u32::from_le_bytes(chunk);
        }
        Ok(Self::from_words(&words))
    }
}

impl Default for FaultRecord {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Pull the next `N` words; missing words read as zero.
fn take<const N: usize>(it: &mut impl Iterator<Item = u32>) -> [u32; N] {
    core::array::from_fn(|_| it.next().unwrap_or(0))
}

#[cfg(test)]
#[allow(clippy::expect_used)] // Tests use expect() for readable assertions
mod tests {
    use super::*;
    use crate::profile::ArchFamily;

    fn sealed(mut record: FaultRecord) -> FaultRecord {
        record.checksum = record.compute_checksum();
        record.magic = MAGIC;
        record
    }

    #[test]
    fn layout_is_140_bytes() {
        assert_eq!(FaultRecord::WORDS, 35);
        assert_eq!(FaultRecord::SIZE, 140);
    }

    #[test]
    fn descriptor_bits_round_trip() {
        let d = TargetProfile::new(ArchFamily::Armv8MMainline, true).descriptor();
        assert_eq!(d.to_bits(), 0x0007_0001);
        assert_eq!(FormatDescriptor::from_bits(d.to_bits()), d);
    }

    #[test]
    fn descriptor_for_armv7em() {
        let d = TargetProfile::new(ArchFamily::Armv7EM, false).descriptor();
        assert_eq!(d.to_bits(), 0x0001_0001);
    }

    #[test]
    fn zeroed_record_has_no_magic() {
        assert_eq!(FaultRecord::zeroed().validate(), Err(RecordError::NoRecord));
    }

    #[test]
    fn body_length_follows_descriptor() {
        let mut record = FaultRecord::zeroed();
        record.format = TargetProfile::new(ArchFamily::Armv6M, false)
            .descriptor()
            .to_bits();
        assert_eq!(record.body_words().count(), 1 + 8 + 4);

        record.format = TargetProfile::new(ArchFamily::Armv7EM, false)
            .descriptor()
            .to_bits();
        assert_eq!(record.body_words().count(), 1 + 8 + 4 + 6);

        record.format = TargetProfile::new(ArchFamily::Armv8MMainline, true)
            .descriptor()
            .to_bits();
        assert_eq!(record.body_words().count(), 1 + 8 + 4 + 6 + 10 + 2 + 2);
    }

    #[test]
    fn absent_blocks_do_not_affect_checksum() {
        let mut record = FaultRecord::zeroed();
        record.format = TargetProfile::new(ArchFamily::Armv7M, false)
            .descriptor()
            .to_bits();
        let before = record.compute_checksum();
        record.additional_context.r4 = 0x1234;
        record.stack_limits.msplim = 0x2000_0000;
        assert_eq!(record.compute_checksum(), before);
    }

    #[test]
    fn accessors_are_gated_on_descriptor() {
        let mut record = FaultRecord::zeroed();
        record.format = TargetProfile::new(ArchFamily::Armv7EM, false)
            .descriptor()
            .to_bits();
        assert!(record.fault_registers().is_some());
        assert!(record.additional_context().is_none());
        assert!(record.stack_limits().is_none());
        assert!(record.secure_fault_registers().is_none());
    }

    #[test]
    fn corrupted_body_fails_validation() {
        let mut record = FaultRecord::zeroed();
        record.format = TargetProfile::BUILD.descriptor().to_bits();
        record.state_context.return_address = 0x0800_1234;
        let mut record = sealed(record);
        assert!(record.is_trustworthy());

        record.state_context.r2 ^= 0x0000_0100;
        assert!(matches!(
            record.validate(),
            Err(RecordError::InvalidChecksum { .. })
        ));
    }

    #[test]
    fn stacking_error_invalidates_frame() {
        let profile = TargetProfile::new(ArchFamily::Armv7EM, false);
        let mut record = FaultRecord::zeroed();
        record.format = profile.descriptor().to_bits();
        assert!(record.stacked_context_valid(&profile));
        record.fault_registers.cfsr = crate::registers::CFSR_STKERR;
        assert!(!record.stacked_context_valid(&profile));
    }

    #[test]
    fn byte_image_round_trip() {
        let mut record = FaultRecord::zeroed();
        record.format = TargetProfile::BUILD.descriptor().to_bits();
        record.common.msp = 0x2001_FFC0;
        record.fault_registers.bfar = 0xDEAD_BEEF;
        let record = sealed(record);

        let bytes = record.to_le_bytes();
        assert_eq!(bytes.get(..4), Some(&[0x46, 0x6C, 0x74, 0x52][..]));
        let parsed = FaultRecord::from_le_bytes(&bytes).expect("full image parses");
        assert_eq!(parsed, record);
    }

    #[test]
    fn short_image_is_rejected() {
        assert_eq!(
            FaultRecord::from_le_bytes(&[0u8; 12]),
            Err(RecordError::Truncated {
                expected: 140,
                actual: 12
            })
        );
    }

    #[test]
    fn clear_removes_magic() {
        let mut record = sealed(FaultRecord::zeroed());
        assert!(record.is_trustworthy());
        record.clear();
        assert_eq!(record, FaultRecord::zeroed());
        assert_eq!(record.validate(), Err(RecordError::NoRecord));
    }
}
