use std::env;

fn main() {
    // Trap entry capabilities, keyed on the target triple:
    //   fault_entry_configurable  MemManage/BusFault/UsageFault vectors exist
    //   fault_entry_stack_limits  MSPLIM/PSPLIM must be saved and MSPLIM cleared
    //   fault_entry_mainline_v8   SecureFault vector and Non-secure limit aliases
    println!("cargo:rustc-check-cfg=cfg(fault_entry_configurable)");
    println!("cargo:rustc-check-cfg=cfg(fault_entry_stack_limits)");
    println!("cargo:rustc-check-cfg=cfg(fault_entry_mainline_v8)");
    println!("cargo:rerun-if-env-changed=TARGET");

    let target = env::var("TARGET").unwrap_or_default();
    let baseline = target.starts_with("thumbv6m") || target.starts_with("thumbv8m.base");
    let armv8m = target.starts_with("thumbv8m") || target.starts_with("thumbv8.1m");

    if target.starts_with("thumb") && !baseline {
        println!("cargo:rustc-cfg=fault_entry_configurable");
    }
    if armv8m {
        println!("cargo:rustc-cfg=fault_entry_stack_limits");
    }
    if armv8m && !baseline {
        println!("cargo:rustc-cfg=fault_entry_mainline_v8");
    }

    // Only run linker script setup for hardware builds
    #[cfg(feature = "hardware")]
    {
        use std::fs::File;
        use std::io::Write;
        use std::path::PathBuf;

        // Put `memory.x` in our output directory and ensure it's on the linker search path.
        let Some(out_dir) = env::var_os("OUT_DIR") else {
            println!("cargo:warning=OUT_DIR not set, skipping memory.x");
            return;
        };
        let out = PathBuf::from(out_dir);
        let memory_x = include_bytes!("../../memory.x");

        if let Err(e) = File::create(out.join("memory.x")).and_then(|mut f| f.write_all(memory_x)) {
            println!("cargo:warning=failed to write memory.x: {e}");
            return;
        }

        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rerun-if-changed=../../memory.x");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
