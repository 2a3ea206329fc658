//! Fault recorder, hardware side.
//!
//! Links the naked trap entry into the vector table, owns the persistent
//! record and the exit hook, and exposes the next-boot operations.
//!
//! # Lifecycle
//!
//! ```text
//! fault ─► fault_recorder_entry (asm)   save LR/MSP/PSP[/limits], switch stack
//!        ─► capture_entry               record_fault() into FAULT_RECORD
//!        ─► exit hook                   default: SCB::sys_reset()
//! reset ─► print_last_fault()           decode and print
//!        ─► clear_last_fault()
//! ```
//!
//! `FAULT_RECORD` lives in `.uninit`, which cortex-m-rt never initialises,
//! and is exported unmangled so a debugger can dump it by name.

mod entry;
mod trap;

use core::cell::Cell;
use core::fmt;
use core::mem::MaybeUninit;
use core::ptr;

use cortex_m::peripheral::SCB;
use critical_section::Mutex;
use fault_record::{
    print_report, record_fault, ExitHook, FaultRecord, RecordError, ReportOutcome, TargetProfile,
};

use trap::CortexMTrap;

/// Values only the trap entry can observe, stored before the stack switch.
#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) struct EntrySnapshot {
    exc_return: u32,
    msp: u32,
    psp: u32,
    msplim: u32,
    psplim: u32,
}

impl EntrySnapshot {
    const ZERO: Self = Self {
        exc_return: 0,
        msp: 0,
        psp: 0,
        msplim: 0,
        psplim: 0,
    };
}

/// Written by `fault_recorder_entry` only.
static mut FAULT_ENTRY_SNAPSHOT: EntrySnapshot = EntrySnapshot::ZERO;

/// The persistent record.
#[no_mangle]
#[link_section = ".uninit.FAULT_RECORD"]
static mut FAULT_RECORD: MaybeUninit<FaultRecord> = MaybeUninit::uninit();

/// `None` selects the default, a system reset.
static EXIT_HOOK: Mutex<Cell<Option<fn()>>> = Mutex::new(Cell::new(None));

/// SHCSR enable bits for MemManage, BusFault and UsageFault.
#[cfg(fault_entry_configurable)]
const SHCSR_CONFIGURABLE_FAULTS: u32 = (1 << 16) | (1 << 17) | (1 << 18);

/// SHCSR.SECUREFAULTENA.
#[cfg(all(feature = "secure", fault_entry_mainline_v8))]
const SHCSR_SECUREFAULTENA: u32 = 1 << 19;

/// Installed exit hook, falling back to a system reset.
struct InstalledHook;

impl ExitHook for InstalledHook {
    fn on_exit(&mut self) {
        match critical_section::with(|cs| EXIT_HOOK.borrow(cs).get()) {
            Some(hook) => hook(),
            None => SCB::sys_reset(),
        }
    }
}

/// Rust half of the trap entry. Runs on the capture stack.
///
/// # Safety
///
/// Only `fault_recorder_entry` may call this, after filling the snapshot.
unsafe extern "C" fn capture_entry() -> ! {
    // SAFETY: the entry wrote the snapshot just before branching here and
    // nothing else writes it.
    let snapshot = unsafe { ptr::addr_of!(FAULT_ENTRY_SNAPSHOT).read_volatile() };
    let trap = CortexMTrap::new(snapshot);

    // SAFETY: trap context runs to completion unpreempted, so this is the
    // only live reference to the record.
    let record = unsafe { (*ptr::addr_of_mut!(FAULT_RECORD)).write(FaultRecord::zeroed()) };
    record_fault(record, &TargetProfile::BUILD, &trap, &mut InstalledHook);

    // A returning hook cannot resume the faulting context from here.
    loop {
        cortex_m::asm::wfi();
    }
}

/// Replace the default exit hook (system reset).
///
/// If `hook` returns, the core is parked in a `wfi` loop.
pub fn set_exit_hook(hook: fn()) {
    critical_section::with(|cs| EXIT_HOOK.borrow(cs).set(Some(hook)));
}

/// Enable the configurable fault handlers so faults arrive on their own
/// vector instead of escalating to HardFault.
///
/// No-op on Armv6-M and Armv8-M Baseline, which only have HardFault.
#[allow(unused_variables)]
pub fn enable_fault_handlers(scb: &mut SCB) {
    #[allow(unused_mut)]
    let mut enable = 0u32;
    #[cfg(fault_entry_configurable)]
    {
        enable |= SHCSR_CONFIGURABLE_FAULTS;
    }
    #[cfg(all(feature = "secure", fault_entry_mainline_v8))]
    {
        enable |= SHCSR_SECUREFAULTENA;
    }
    if enable != 0 {
        // SAFETY: setting handler enable bits only changes which vector a
        // fault is delivered on; all of them route to the recorder.
        unsafe { scb.shcsr.modify(|shcsr| shcsr | enable) };
        defmt::debug!("fault handlers enabled: shcsr |= {=u32:#x}", enable);
    }
}

/// Copy of the persistent record, whatever it contains.
pub fn raw_last_fault() -> FaultRecord {
    critical_section::with(|_| {
        // SAFETY: `FaultRecord` is `repr(C)` and made only of `u32` fields
        // with no padding (size and alignment asserted in `fault_record`), so
        // any bit pattern left in `.uninit` is a valid value. Trust is decided
        // afterwards by the magic and checksum. The critical section excludes
        // a concurrent clear.
        unsafe { ptr::addr_of!(FAULT_RECORD).cast::<FaultRecord>().read_volatile() }
    })
}

/// The record left by the last fault, if one was sealed intact.
pub fn last_fault() -> Result<FaultRecord, RecordError> {
    let record = raw_last_fault();
    record.validate()?;
    Ok(record)
}

/// Decode the persistent record into `out`.
pub fn print_last_fault<W: fmt::Write + ?Sized>(out: &mut W) -> Result<ReportOutcome, fmt::Error> {
    let record = raw_last_fault();
    print_report(&record, &TargetProfile::BUILD, out)
}

/// Erase the persistent record.
pub fn clear_last_fault() {
    critical_section::with(|_| {
        // SAFETY: exclusive inside the critical section; a fault cannot be
        // recorded concurrently from thread mode.
        unsafe {
            ptr::addr_of_mut!(FAULT_RECORD)
                .cast::<FaultRecord>()
                .write_volatile(FaultRecord::zeroed());
        }
    });
    defmt::info!("fault record cleared");
}
