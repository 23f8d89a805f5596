//! Terminal output helpers.
//!
//! Status lines carry a colored glyph prefix: `✓` success, `+` created,
//! `~` updated, `-` removed, `!` warning and `x` error. Errors go to stderr.

use colored::*;
use std::fmt::Display;
use std::path::Path;

const BANNER_SIDE: usize = 20;

pub fn success(msg: impl Display) {
    println!("{} {}", "✓".green(), msg);
}

pub fn warn(msg: impl Display) {
    println!("{} {}", "!".yellow(), msg);
}

pub fn error(msg: impl Display) {
    eprintln!("{} {}", "x".red(), msg);
}

pub fn created(kind: &str, path: &Path) {
    println!("{} Created {}: {}", "+".green(), kind, path.display());
}

pub fn updated(msg: impl Display) {
    println!("{} {}", "~".cyan(), msg);
}

pub fn removed(kind: &str, path: &Path) {
    println!("{} Removed {}: {}", "-".red(), kind, path.display());
}

pub fn not_found(kind: &str, path: &Path) {
    println!(
        "{} {}",
        "-".dimmed(),
        format!("No {} to remove at {}", kind, path.display()).dimmed()
    );
}

/// Top rule of the build/run section: `━━━ name ━━━`.
pub fn banner(title: &str) {
    let side = "━".repeat(BANNER_SIDE);
    println!("\n{} {} {}", side, title.bold(), side);
}

/// Bottom rule, as wide as the matching [`banner`].
pub fn banner_end(title: &str) {
    let width = 2 * BANNER_SIDE + title.chars().count() + 2;
    println!("\n{}\n", "━".repeat(width));
}

pub fn phase(msg: impl Display) {
    println!("\n{}\n", msg.to_string().bold().yellow());
}

pub fn print_usage() {
    let commands = [
        ("📁 Create New Project", "cpg <ProjectName>"),
        ("❓ Show Help", "cpg help"),
        (
            "➕ Add Function",
            "cpg addfunc <ProjectName> <LibName> <FuncName> <ReturnType> [Params]",
        ),
        (
            "➖ Remove Function",
            "cpg removefunc <ProjectName> <LibName> <FuncName>",
        ),
        ("📚 Add Library", "cpg addlib <ProjectName> <LibraryName>"),
        ("🗑️  Remove Library", "cpg removelib <ProjectName> <LibraryName>"),
        ("💣 Remove Project", "cpg removeproject <ProjectName>"),
        ("🚀 Build and Run", "cpg buildrun <ProjectName>"),
    ];

    println!();
    println!("{}", "📦 C Project Generator - Command Line Tool".bold().cyan());
    println!();
    println!("{}", "🔧 Available Commands:".bold().yellow());
    println!();
    for (title, usage) in commands {
        println!("  {}", title.bold().blue());
        println!("     {}", usage.green());
        println!();
    }
    println!("{}", "⚙  Options:".bold().yellow());
    println!();
    println!(
        "  {}   how names are matched when removing code",
        "--match <substring|word>".green()
    );
    println!(
        "  {}   what to do when an added artifact already exists",
        "--on-duplicate <overwrite|reject>".green()
    );
    println!();
    println!(
        "  Settings can also live in {} or {}.",
        "cpg.toml".bold(),
        "~/.cpg/config.toml".bold()
    );
    println!();
}
