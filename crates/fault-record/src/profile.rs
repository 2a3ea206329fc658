//! Target profile: which optional register blocks exist on this build.
//!
//! The six supported architecture families differ in three ways that matter
//! to the recorder:
//!
//! | Family              | Fault status regs | Armv8-M extended | Lazy-stacking bits | STKOF |
//! |---------------------|-------------------|------------------|--------------------|-------|
//! | Armv6-M             | no                | no               | no                 | no    |
//! | Armv7-M             | yes               | no               | no                 | no    |
//! | Armv7E-M            | yes               | no               | yes                | no    |
//! | Armv8-M Baseline    | no                | yes              | no                 | no    |
//! | Armv8-M Mainline    | yes               | yes              | yes                | yes   |
//! | Armv8.1-M Mainline  | yes               | yes              | yes                | yes   |
//!
//! On top of that, Armv8-M builds may run in the Secure world, which adds the
//! Non-secure register aliases and the SecureFault registers.
//!
//! A [`TargetProfile`] is computed once ([`TargetProfile::BUILD`]) and is
//! inspected by both capture and decoder; neither infers capabilities ad hoc.

use crate::config::{FORMAT_VERSION_MAJOR, FORMAT_VERSION_MINOR};
use crate::record::{FormatDescriptor, FormatVersion};
use crate::registers::{CFSR_MSTKERR, CFSR_STKERR, CFSR_STKOF};

/// Cortex-M architecture family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArchFamily {
    /// Cortex-M0/M0+/M1.
    Armv6M,
    /// Cortex-M3.
    Armv7M,
    /// Cortex-M4/M7.
    Armv7EM,
    /// Cortex-M23.
    Armv8MBaseline,
    /// Cortex-M33/M35P.
    Armv8MMainline,
    /// Cortex-M55/M85.
    Armv81MMainline,
}

impl ArchFamily {
    /// All families, in architecture order.
    pub const ALL: [Self; 6] = [
        Self::Armv6M,
        Self::Armv7M,
        Self::Armv7EM,
        Self::Armv8MBaseline,
        Self::Armv8MMainline,
        Self::Armv81MMainline,
    ];

    /// CFSR/HFSR/DFSR/MMFAR/BFAR/AFSR are implemented.
    pub const fn has_fault_registers(self) -> bool {
        matches!(
            self,
            Self::Armv7M | Self::Armv7EM | Self::Armv8MMainline | Self::Armv81MMainline
        )
    }

    /// Armv8-M family: stack limit registers, additional state context.
    pub const fn is_armv8m(self) -> bool {
        matches!(
            self,
            Self::Armv8MBaseline | Self::Armv8MMainline | Self::Armv81MMainline
        )
    }

    /// Armv8-M Baseline.
    pub const fn is_baseline(self) -> bool {
        matches!(self, Self::Armv8MBaseline)
    }

    /// Armv8-M or Armv8.1-M Mainline.
    pub const fn is_mainline_v8(self) -> bool {
        matches!(self, Self::Armv8MMainline | Self::Armv81MMainline)
    }

    /// MLSPERR / LSPERR exist (floating-point lazy state preservation).
    pub const fn has_lazy_stacking_faults(self) -> bool {
        matches!(
            self,
            Self::Armv7EM | Self::Armv8MMainline | Self::Armv81MMainline
        )
    }

    /// CFSR.STKOF exists.
    pub const fn has_stack_overflow_fault(self) -> bool {
        self.is_mainline_v8()
    }

    /// Short name, also accepted by [`ArchFamily::from_name`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Armv6M => "armv6m",
            Self::Armv7M => "armv7m",
            Self::Armv7EM => "armv7em",
            Self::Armv8MBaseline => "armv8m.base",
            Self::Armv8MMainline => "armv8m.main",
            Self::Armv81MMainline => "armv8.1m.main",
        }
    }

    /// Parse a short name as produced by [`ArchFamily::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|arch| arch.name() == name)
    }

    /// Map a Rust target triple (`thumbv7em-none-eabihf`, ...) to its family.
    pub fn from_target_triple(triple: &str) -> Option<Self> {
        let arch = triple.split('-').next()?;
        match arch {
            "thumbv6m" => Some(Self::Armv6M),
            "thumbv7m" => Some(Self::Armv7M),
            "thumbv7em" => Some(Self::Armv7EM),
            "thumbv8m.base" => Some(Self::Armv8MBaseline),
            "thumbv8m.main" => Some(Self::Armv8MMainline),
            "thumbv8.1m.main" => Some(Self::Armv81MMainline),
            _ => None,
        }
    }
}

/// Build-time capability record shared by capture and decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TargetProfile {
    arch: ArchFamily,
    secure: bool,
}

impl TargetProfile {
    /// Profile of the target this crate is compiled for.
    ///
    /// The architecture comes from the target triple (see `build.rs`); the
    /// Secure world flag from the `secure` feature.
    pub const BUILD: Self = Self::new(BUILD_ARCH, cfg!(feature = "secure"));

    /// Create a profile. `secure` is ignored outside the Armv8-M families.
    pub const fn new(arch: ArchFamily, secure: bool) -> Self {
        Self {
            arch,
            secure: secure && arch.is_armv8m(),
        }
    }

    /// Architecture family.
    pub const fn arch(&self) -> ArchFamily {
        self.arch
    }

    /// Recorder runs in the Secure world.
    pub const fn secure(&self) -> bool {
        self.secure
    }

    /// Fault status registers are available.
    pub const fn has_fault_registers(&self) -> bool {
        self.arch.has_fault_registers()
    }

    /// Armv8-M extended variant (stack limits, additional state context).
    pub const fn is_extended(&self) -> bool {
        self.arch.is_armv8m()
    }

    /// SFSR/SFAR are captured.
    pub const fn has_secure_fault_registers(&self) -> bool {
        self.secure && self.arch.is_mainline_v8() && self.arch.has_fault_registers()
    }

    /// MSPLIM_NS/PSPLIM_NS can be read from this build.
    ///
    /// Baseline has no Non-secure stack limit aliases.
    pub const fn has_non_secure_stack_limits(&self) -> bool {
        self.secure && self.arch.is_mainline_v8()
    }

    /// CFSR bits that signal a failed push of the pre-fault frame.
    pub const fn stacking_error_mask(&self) -> u32 {
        if self.arch.has_stack_overflow_fault() {
            CFSR_STKERR | CFSR_MSTKERR | CFSR_STKOF
        } else {
            CFSR_STKERR | CFSR_MSTKERR
        }
    }

    /// Format descriptor stamped into every record captured on this profile.
    pub const fn descriptor(&self) -> FormatDescriptor {
        FormatDescriptor {
            version: FormatVersion {
                major: FORMAT_VERSION_MAJOR,
                minor: FORMAT_VERSION_MINOR,
            },
            fault_registers: self.arch.has_fault_registers(),
            extended: self.arch.is_armv8m(),
            secure: self.secure,
        }
    }
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self::BUILD
    }
}

#[cfg(fault_record_arch = "armv6m")]
const BUILD_ARCH: ArchFamily = ArchFamily::Armv6M;
#[cfg(fault_record_arch = "armv7m")]
const BUILD_ARCH: ArchFamily = ArchFamily::Armv7M;
#[cfg(fault_record_arch = "armv7em")]
const BUILD_ARCH: ArchFamily = ArchFamily::Armv7EM;
#[cfg(fault_record_arch = "armv8m_base")]
const BUILD_ARCH: ArchFamily = ArchFamily::Armv8MBaseline;
#[cfg(fault_record_arch = "armv8m_main")]
const BUILD_ARCH: ArchFamily = ArchFamily::Armv8MMainline;
#[cfg(fault_record_arch = "armv8_1m_main")]
const BUILD_ARCH: ArchFamily = ArchFamily::Armv81MMainline;
