//! Cortex-M fault recorder core
//!
//! Captures the processor state at a fault trap into a checksummed record
//! that survives the following reset, and decodes that record into a
//! human-readable report on the next boot.
//!
//! # Pipeline
//!
//! ```text
//! trap entry (firmware, naked asm)
//!         ↓
//! capture()         fills FaultRecord via TrapRegisters, seals it
//!         ↓
//! ExitHook          default: system reset
//!         ↓  (next boot)
//! print_report()    validates, decodes, prints to any fmt::Write
//!         ↓
//! FaultRecord::clear()
//! ```
//!
//! Everything in this crate is target-independent. Register access is
//! behind [`TrapRegisters`]; the hardware implementation lives in the
//! `firmware` crate, host tests use [`mocks::SimulatedTrap`].
//!
//! # Features
//!
//! - `std`: `std::error::Error` for [`RecordError`] and the [`mocks`]
//! - `secure`: build runs in the Secure world (Armv8-M only)
//! - `serde`: `Serialize`/`Deserialize` for the record types
//! - `defmt`: `defmt::Format` derives and defmt log output
//! - `tracing`: host log output

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)]
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this register-level crate:
#![allow(clippy::doc_markdown)] // register names (EXC_RETURN, CFSR) in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::unreadable_literal)] // register values read as hex dumps

mod log;

pub mod capture;
pub mod checksum;
pub mod config;
pub mod error;
pub mod exit_hook;
pub mod mocks;
pub mod profile;
pub mod record;
pub mod registers;
pub mod report;

pub use capture::{capture, record_fault, TrapRegisters};
pub use error::RecordError;
pub use exit_hook::{ExitHook, ReturnToCaller};
pub use profile::{ArchFamily, TargetProfile};
pub use record::{
    AdditionalStateContext, CommonRegisters, FaultRecord, FaultRegisters, FormatDescriptor,
    FormatVersion, SecureFaultRegisters, StackLimits, StateContext,
};
pub use registers::{ExcReturn, ScbRegister, StackAlias};
pub use report::{print_report, Exception, Report, ReportOutcome};
