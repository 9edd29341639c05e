//! Development automation tasks for the CIAM CLI workspace.
//!
//! Run with: `cargo xtask <command>`
//!
//! This is a CLI tool for developers, so `println!` and `eprintln!` are
//! intentionally used for user-facing output rather than structured logging.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::process::{Command, ExitCode};

use anyhow::anyhow;

mod features;

fn main() -> ExitCode {
    let task = env::args().nth(1);

    let result = match task.as_deref() {
        Some("ci") => run_ci(),
        Some("fmt") => run_fmt(),
        Some("clippy") => run_clippy(),
        Some("test") => run_test(),
        Some("deny") => run_deny(),
        Some("audit") => run_audit(),
        Some("test-features") => features::test_feature_matrix(),
        Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(unknown) => {
            eprintln!("Unknown task: {unknown}");
            eprintln!();
            print_help();
            Err(anyhow::anyhow!("Unknown task"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Task failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!("CIAM CLI Development Tasks");
    println!();
    println!("USAGE:");
    println!("    cargo xtask <TASK>");
    println!();
    println!("TASKS:");
    println!("    ci             Run all CI checks (fmt, clippy, test-features, test)");
    println!("    fmt            Check Rust code formatting");
    println!("    clippy         Run Clippy lints");
    println!("    test           Run all tests");
    println!("    test-features  Verify the test-utils feature compiles on and off");
    println!("    deny           Check dependencies with cargo-deny");
    println!("    audit          Audit dependencies for security vulnerabilities");
    println!("    help           Show this help message");
}

/// Run all CI checks in sequence
fn run_ci() -> anyhow::Result<()> {
    println!("==> Running CI checks...\n");

    println!("==> Step 1/4: Checking Rust format...");
    run_fmt()?;

    println!("\n==> Step 2/4: Running Clippy...");
    run_clippy()?;

    println!("\n==> Step 3/4: Checking feature matrix...");
    features::test_feature_matrix()?;

    println!("\n==> Step 4/4: Running tests...");
    run_test()?;

    println!("\n✓ All CI checks passed!");
    Ok(())
}

/// Check Rust code formatting
fn run_fmt() -> anyhow::Result<()> {
    let status = Command::new("cargo").args(["fmt", "--all", "--", "--check"]).status()?;

    if !status.success() {
        anyhow::bail!("Format check failed. Run 'cargo fmt --all' to fix.");
    }

    Ok(())
}

/// Run Clippy lints
fn run_clippy() -> anyhow::Result<()> {
    let status = Command::new("cargo")
        .args(["clippy", "--workspace", "--all-targets", "--all-features", "--", "-D", "warnings"])
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("Clippy run failed. See output above."))
    }
}

/// Run all workspace tests
fn run_test() -> anyhow::Result<()> {
    let status = Command::new("cargo").args(["test", "--workspace", "--all-features"]).status()?;

    if !status.success() {
        anyhow::bail!("Tests failed");
    }

    Ok(())
}

/// Run a cargo subcommand that may not be installed.
fn run_optional_tool(tool: &str, args: &[&str], failure: &str) -> anyhow::Result<()> {
    let check_installed = Command::new("cargo").args([tool, "--version"]).output();

    if !check_installed.as_ref().is_ok_and(|o| o.status.success()) {
        eprintln!("cargo-{tool} is not installed.");
        eprintln!("Install it with: cargo install cargo-{tool}");
        anyhow::bail!("cargo-{tool} not found");
    }

    let status = Command::new("cargo").arg(tool).args(args).status()?;

    if !status.success() {
        anyhow::bail!("{failure}");
    }

    Ok(())
}

/// Check dependencies with cargo-deny
fn run_deny() -> anyhow::Result<()> {
    run_optional_tool("deny", &["check"], "cargo-deny found issues")
}

/// Audit dependencies for security vulnerabilities
fn run_audit() -> anyhow::Result<()> {
    run_optional_tool("audit", &[], "cargo-audit found vulnerabilities")
}
