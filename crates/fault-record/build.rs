//! Maps the Cargo target triple onto the architecture family cfg used by
//! `TargetProfile::BUILD`.
//!
//! | Triple prefix       | cfg value          |
//! |---------------------|--------------------|
//! | `thumbv6m`          | `armv6m`           |
//! | `thumbv7m`          | `armv7m`           |
//! | `thumbv7em`         | `armv7em`          |
//! | `thumbv8m.base`     | `armv8m_base`      |
//! | `thumbv8m.main`     | `armv8m_main`      |
//! | `thumbv8.1m.main`   | `armv8_1m_main`    |
//! | anything else       | `armv7em` (host)   |

use std::env;

const ARCH_VALUES: &[&str] = &[
    "armv6m",
    "armv7m",
    "armv7em",
    "armv8m_base",
    "armv8m_main",
    "armv8_1m_main",
];

fn arch_for(target: &str) -> &'static str {
    if target.starts_with("thumbv6m") {
        "armv6m"
    } else if target.starts_with("thumbv7em") {
        "armv7em"
    } else if target.starts_with("thumbv7m") {
        "armv7m"
    } else if target.starts_with("thumbv8m.base") {
        "armv8m_base"
    } else if target.starts_with("thumbv8m.main") {
        "armv8m_main"
    } else if target.starts_with("thumbv8.1m.main") {
        "armv8_1m_main"
    } else {
        // Host builds (tests, xtask) model the STM32H743 Cortex-M7.
        "armv7em"
    }
}

fn main() {
    let target = env::var("TARGET").unwrap_or_default();

    let values = ARCH_VALUES
        .iter()
        .map(|v| format!("\"{v}\""))
        .collect::<Vec<_>>()
        .join(", ");
    println!("cargo:rustc-check-cfg=cfg(fault_record_arch, values({values}))");
    println!("cargo:rustc-cfg=fault_record_arch=\"{}\"", arch_for(&target));

    println!("cargo:rerun-if-changed=build.rs");
}
