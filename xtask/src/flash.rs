use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

const TARGET: &str = "thumbv7em-none-eabihf";
const CHIP: &str = "STM32H743ZITx";

fn binary_path(release: bool) -> String {
    let profile = if release { "release" } else { "debug" };
    format!("target/{TARGET}/{profile}/firmware")
}

pub fn run(release: bool, fault_demo: bool) -> Result<()> {
    let mode = if release { "release" } else { "debug" };
    let features = if fault_demo { "fault-demo" } else { "hardware" };

    println!();
    println!(
        "{}",
        format!("🔨 Building firmware ({mode} mode, features: {features})...")
            .cyan()
            .bold()
    );
    println!();

    // Build the demo for the Nucleo-H743ZI
    let build_start = Instant::now();
    let mut build_cmd = Command::new("cargo");
    build_cmd.args(["build", "-p", "firmware", "--target", TARGET, "--features", features]);

    if release {
        build_cmd.arg("--release");
    }

    let build_output = build_cmd.output().context("Failed to run cargo build")?;

    if !build_output.status.success() {
        eprintln!("{}", "✗ Build failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&build_output.stderr));
        anyhow::bail!("Build failed");
    }

    println!(
        "{}",
        format!(
            "✓ Build successful in {:.2}s",
            build_start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();

    // Record placement is what makes the recorder work across reset.
    show_record_address(release);
    println!();

    // Flash with probe-rs
    println!("{}", format!("📡 Flashing to {CHIP}...").cyan().bold());
    println!("   {}", "Connecting to probe...".dimmed());

    let flash_start = Instant::now();
    let flash_output = Command::new("probe-rs")
        .arg("download")
        .arg(binary_path(release))
        .args(["--chip", CHIP, "--probe-index", "0"])
        .output()
        .context("Failed to run probe-rs. Is probe-rs installed? (cargo install probe-rs-tools)")?;

    if !flash_output.status.success() {
        eprintln!("{}", "✗ Flash failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&flash_output.stderr));
        anyhow::bail!("Flash failed - check that the probe is connected and the device is powered");
    }

    let reset = Command::new("probe-rs")
        .args(["reset", "--chip", CHIP, "--probe-index", "0"])
        .status()
        .context("Failed to reset target")?;
    if !reset.success() {
        anyhow::bail!("Target reset failed");
    }

    println!(
        "{}",
        format!(
            "✓ Flash successful in {:.2}s",
            flash_start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
    println!("{}", "Fault recorder demo is running on hardware!".bold());
    println!(
        "   {}",
        format!("Use 'probe-rs attach --chip {CHIP} {}' to view RTT logs", binary_path(release)).dimmed()
    );
    println!();

    Ok(())
}

/// Print where `FAULT_RECORD` was linked, for `probe-rs read` and `xtask decode`.
fn show_record_address(release: bool) {
    let output = Command::new("arm-none-eabi-nm")
        .args(["--radix=hex", &binary_path(release)])
        .output();

    let address = output.ok().filter(|out| out.status.success()).and_then(|out| {
        String::from_utf8_lossy(&out.stdout).lines().find_map(|line| {
            let mut parts = line.split_whitespace();
            let addr = parts.next()?;
            (parts.last() == Some("FAULT_RECORD")).then(|| addr.to_string())
        })
    });

    match address {
        Some(addr) => {
            println!("{}", "📊 Fault record:".cyan());
            println!("   {}", format!("FAULT_RECORD at 0x{addr}").dimmed());
            println!(
                "   {}",
                format!("dump: probe-rs read b32 --chip {CHIP} 0x{addr} 35 > fault.txt").dimmed()
            );
            println!("   {}", "decode: cargo xtask decode fault.txt".dimmed());
        }
        None => println!(
            "   {}",
            "arm-none-eabi-nm not available, FAULT_RECORD address unknown".dimmed()
        ),
    }
}
