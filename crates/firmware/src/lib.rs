//! Cortex-M fault recorder firmware
//!
//! Hardware half of the fault recorder: the trap entry linked into the
//! vector table, the record kept in uninitialised RAM across reset, and the
//! output sinks the decoder prints through on the next boot.
//!
//! # Architecture
//!
//! ```text
//! Demo application (main.rs)
//!         ↓
//! fault (trap entry, persistent record, exit hook)   sink (defmt, UART)
//!         ↓                                            ↓
//! fault-record (capture algorithm, decoder, checksum)
//!         ↓
//! cortex-m / cortex-m-rt
//! ```
//!
//! # Features
//!
//! - `recorder` - Trap entry and persistent record for any Cortex-M target
//! - `hardware` - `recorder` plus the STM32H743 demo binary
//! - `secure` - Recorder runs in the Secure world (Armv8-M)
//! - `fault-demo` - Demo binary deliberately faults after boot
//! - `std` - Enable standard library (for host testing)
//!
//! # Examples
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline (allow println in tests via clippy.toml)
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
// Pedantic lints too noisy for register-level code:
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

#[cfg(feature = "recorder")]
pub mod fault;
pub mod sink;

pub use fault_record::config::RECORDER_VERSION;
pub use sink::{IoWriter, LineSink};

#[cfg(feature = "defmt")]
pub use sink::{defmt_sink, DefmtSink};
