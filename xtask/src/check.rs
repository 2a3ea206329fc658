use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

use fault_record::ArchFamily;

/// One Rust target per supported architecture family.
pub const TARGETS: [(ArchFamily, &str); 6] = [
    (ArchFamily::Armv6M, "thumbv6m-none-eabi"),
    (ArchFamily::Armv7M, "thumbv7m-none-eabi"),
    (ArchFamily::Armv7EM, "thumbv7em-none-eabihf"),
    (ArchFamily::Armv8MBaseline, "thumbv8m.base-none-eabi"),
    (ArchFamily::Armv8MMainline, "thumbv8m.main-none-eabihf"),
    (ArchFamily::Armv81MMainline, "thumbv8.1m.main-none-eabihf"),
];

/// Run `cargo <args>`, printing a pass/fail line. Returns whether it passed.
fn cargo_step(label: &str, args: &[&str]) -> Result<bool> {
    let start = Instant::now();
    let output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("Failed to run cargo for {label}"))?;

    if output.status.success() {
        println!(
            "{}",
            format!("  ✓ {label} passed in {:.2}s", start.elapsed().as_secs_f64()).green()
        );
        Ok(true)
    } else {
        eprintln!("{}", format!("  ✗ {label} failed").red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        Ok(false)
    }
}

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking fault recorder builds...".cyan().bold());
    println!();

    let total_start = Instant::now();
    let mut failed = Vec::new();

    // Check 1: core crate for every architecture, Secure variants on Armv8-M
    println!("{}", "  Checking fault-record (no_std) per architecture...".cyan());
    for (arch, target) in TARGETS {
        let label = format!("fault-record {} ({target})", arch.name());
        if !cargo_step(&label, &["check", "-p", "fault-record", "--target", target, "--features", "defmt"])? {
            failed.push(label);
        }
        if arch.is_armv8m() {
            let label = format!("fault-record {} secure", arch.name());
            let args = ["check", "-p", "fault-record", "--target", target, "--features", "defmt,secure"];
            if !cargo_step(&label, &args)? {
                failed.push(label);
            }
        }
    }
    println!();

    // Check 2: firmware trap entry assembles for every architecture
    println!("{}", "  Checking firmware trap entry per architecture...".cyan());
    for (arch, target) in TARGETS {
        let label = format!("firmware lib {} ({target})", arch.name());
        let args = ["check", "-p", "firmware", "--lib", "--target", target, "--features", "recorder"];
        if !cargo_step(&label, &args)? {
            failed.push(label);
        }
    }
    println!();

    // Check 3: demo binary for the reference board
    println!("{}", "  Checking demo firmware (STM32H743)...".cyan());
    let label = "firmware demo (thumbv7em-none-eabihf)".to_string();
    let args = ["check", "-p", "firmware", "--target", "thumbv7em-none-eabihf", "--features", "fault-demo"];
    if !cargo_step(&label, &args)? {
        failed.push(label);
    }
    println!();

    // Check 4: Clippy lints
    println!("{}", "  Running clippy lints...".cyan());
    if !cargo_step("Clippy", &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])? {
        // Don't fail on clippy warnings, just show them
        eprintln!("{}", "  ⚠ Clippy warnings found".yellow().bold());
    }
    println!();

    // Check 5: Format check
    println!("{}", "  Checking code formatting...".cyan());
    let fmt_output = Command::new("cargo")
        .args(["fmt", "--all", "--check"])
        .output()
        .context("Failed to run cargo fmt")?;

    if fmt_output.status.success() {
        println!("{}", "  ✓ Formatting check passed".green());
    } else {
        eprintln!("{}", "  ⚠ Formatting issues found".yellow().bold());
        eprintln!("     Run 'cargo fmt --all' to fix");
        // Don't fail on format issues
    }
    println!();

    if !failed.is_empty() {
        anyhow::bail!("{} check(s) failed: {}", failed.len(), failed.join(", "));
    }

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}
