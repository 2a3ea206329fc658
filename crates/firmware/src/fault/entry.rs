//! Trap entry.
//!
//! Runs as the vector itself, before any compiler-generated prologue, with LR
//! still holding EXC_RETURN. Until MSP has been moved to the capture stack it
//! only moves registers and stores them into [`FAULT_ENTRY_SNAPSHOT`], so a
//! fault caused by a broken stack cannot fault again here.
//!
//! Snapshot layout (word offsets):
//!
//! | Offset | Field      | Armv8-M only |
//! |--------|------------|--------------|
//! | 0      | EXC_RETURN |              |
//! | 4      | MSP        |              |
//! | 8      | PSP        |              |
//! | 12     | MSPLIM     | yes          |
//! | 16     | PSPLIM     | yes          |
//!
//! The capture stack is 2 KiB in `.bss`. flip-link places the main stack
//! below `.bss`, so an overflowing main stack cannot reach it.
//!
//! Only Thumb-1 encodings are used so the same text assembles for Armv6-M
//! and Armv8-M Baseline. Every fault vector name is bound to the entry;
//! cortex-m-rt only references the ones the core implements and its weak
//! defaults lose to these definitions.

use core::arch::global_asm;

use super::{capture_entry, FAULT_ENTRY_SNAPSHOT};

macro_rules! fault_entry {
    ($($save_limits:literal,)*) => {
        global_asm!(
            ".pushsection .text.fault_recorder_entry,\"ax\",%progbits",
            ".global fault_recorder_entry",
            ".global HardFault",
            ".global MemoryManagement",
            ".global BusFault",
            ".global UsageFault",
            ".global SecureFault",
            ".type fault_recorder_entry,%function",
            ".thumb_func",
            "fault_recorder_entry:",
            ".thumb_func",
            "HardFault:",
            ".thumb_func",
            "MemoryManagement:",
            ".thumb_func",
            "BusFault:",
            ".thumb_func",
            "UsageFault:",
            ".thumb_func",
            "SecureFault:",
            "    ldr r0, ={snapshot}",
            "    mov r1, lr",
            "    str r1, [r0, #0]",
            "    mrs r1, msp",
            "    str r1, [r0, #4]",
            "    mrs r1, psp",
            "    str r1, [r0, #8]",
            $($save_limits,)*
            "    ldr r1, =fault_recorder_stack_top",
            "    mov sp, r1",
            "    bl {capture}",
            "1:  b 1b",
            "    .ltorg",
            ".size fault_recorder_entry, . - fault_recorder_entry",
            ".popsection",
            "",
            ".pushsection .bss.fault_recorder_stack,\"aw\",%nobits",
            ".global fault_recorder_stack_bottom",
            ".global fault_recorder_stack_top",
            ".balign 8",
            "fault_recorder_stack_bottom:",
            "    .space 2048",
            "fault_recorder_stack_top:",
            ".popsection",
            snapshot = sym FAULT_ENTRY_SNAPSHOT,
            capture = sym capture_entry,
        );
    };
}

#[cfg(not(fault_entry_stack_limits))]
fault_entry!();

// MSPLIM is cleared before the switch so the capture stack is never checked
// against the faulting context's limit.
#[cfg(fault_entry_stack_limits)]
fault_entry!(
    "    mrs r1, msplim",
    "    str r1, [r0, #12]",
    "    mrs r1, psplim",
    "    str r1, [r0, #16]",
    "    movs r1, #0",
    "    msr msplim, r1",
);
