use crate::config::BuildConfig;
use crate::project::ProjectLayout;
use crate::ui;
use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// How far `buildrun` got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The build tool could not be launched or exited unsuccessfully.
    BuildFailed(Option<i32>),
    /// The build passed but the program could not be launched or failed.
    RunFailed(Option<i32>),
    Succeeded,
}

/// Path of the linked program inside the project directory.
pub fn binary_path(layout: &ProjectLayout, build: &BuildConfig) -> Result<PathBuf> {
    let name = if cfg!(target_os = "windows") {
        format!("{}.exe", build.target)
    } else {
        build.target.clone()
    };
    let root = std::path::absolute(layout.root())
        .with_context(|| format!("Failed to resolve {}", layout.root().display()))?;
    Ok(root.join(name))
}

fn run_in(program: &Path, args: &[String], dir: &Path) -> std::io::Result<ExitStatus> {
    Command::new(program).args(args).current_dir(dir).status()
}

// --- COMMAND: Build & Run ---
pub fn build_and_run(layout: &ProjectLayout, build: &BuildConfig) -> Result<RunOutcome> {
    let title = layout.name();
    ui::banner(&title);
    let outcome = build_then_run(layout, build);
    ui::banner_end(&title);
    outcome
}

fn build_then_run(layout: &ProjectLayout, build: &BuildConfig) -> Result<RunOutcome> {
    ui::phase("⚡ Building project...");

    match run_in(Path::new(&build.tool), &build.args, layout.root()) {
        Ok(status) if status.success() => {}
        Ok(status) => {
            println!("\n{}", "✖ Error: Build failed!".bold().red());
            return Ok(RunOutcome::BuildFailed(status.code()));
        }
        Err(e) => {
            ui::error(format!("Failed to launch '{}': {}", build.tool, e));
            println!("\n{}", "✖ Error: Build failed!".bold().red());
            return Ok(RunOutcome::BuildFailed(None));
        }
    }

    println!("\n{}", "✔ Build successful!".bold().green());
    ui::phase("▶ Running project...");

    let binary = binary_path(layout, build)?;
    match run_in(&binary, &[], layout.root()) {
        Ok(status) if status.success() => {
            println!("\n{}", "✔ Program executed successfully!".bold().green());
            Ok(RunOutcome::Succeeded)
        }
        Ok(status) => {
            println!("\n{}", "✖ Error: Program execution failed!".bold().red());
            Ok(RunOutcome::RunFailed(status.code()))
        }
        Err(e) => {
            ui::error(format!("Failed to launch {}: {}", binary.display(), e));
            println!("\n{}", "✖ Error: Program execution failed!".bold().red());
            Ok(RunOutcome::RunFailed(None))
        }
    }
}
