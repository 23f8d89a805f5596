//! # cpg CLI Entry Point
//!
//! Parses the verb and its positional arguments with clap and routes them to
//! the project operations. An unrecognized first token is taken as the name
//! of a project to create.
//!
//! Exit status is 0 whenever an operation was attempted, even if some of its
//! steps failed, and 1 for usage errors.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use cpg::build::{self, RunOutcome};
use cpg::config::{self, CpgConfig, DuplicatePolicy, MatchMode};
use cpg::project::{self, FunctionSpec, ProjectLayout};
use cpg::ui;

#[derive(Parser)]
#[command(name = "cpg")]
#[command(about = "C Project Generator", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
#[command(disable_help_subcommand = true)]
#[command(allow_external_subcommands = true)]
struct Cli {
    /// How names are matched when removing code [default: substring]
    #[arg(long = "match", value_enum, global = true)]
    match_mode: Option<MatchMode>,
    /// What to do when an added artifact already exists [default: overwrite]
    #[arg(long, value_enum, global = true)]
    on_duplicate: Option<DuplicatePolicy>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show available commands
    Help,
    /// Add a function to a library
    #[command(name = "addfunc")]
    AddFunc {
        project: String,
        lib: String,
        func: String,
        return_type: String,
        /// Parameter list, e.g. "int a, int b"
        params: Option<String>,
    },
    /// Remove every line naming a function from a library
    #[command(name = "removefunc")]
    RemoveFunc {
        project: String,
        lib: String,
        func: String,
    },
    /// Add a header/source library to a project
    #[command(name = "addlib")]
    AddLib { project: String, library: String },
    /// Remove a library and its Makefile/main.c wiring
    #[command(name = "removelib")]
    RemoveLib { project: String, library: String },
    /// Delete a project directory tree
    #[command(name = "removeproject")]
    RemoveProject { project: String },
    /// Build with make, then run the program
    #[command(name = "buildrun")]
    BuildRun { project: String },
    /// Any other word creates a project of that name
    #[command(external_subcommand)]
    External(Vec<String>),
}

fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            if code != 0 {
                println!("Use 'cpg help' for usage.");
            }
            std::process::exit(code);
        }
    }
}

fn main() -> Result<()> {
    let cli = parse_cli();

    let Some(command) = cli.command else {
        ui::error("No command provided. Use 'cpg help' for usage.");
        std::process::exit(1);
    };

    // Loaded per command so `help` works even next to a broken cpg.toml.
    let settings = || -> Result<CpgConfig> {
        let mut config = config::load_config()?;
        if let Some(mode) = cli.match_mode {
            config.edit.match_mode = mode;
        }
        if let Some(policy) = cli.on_duplicate {
            config.edit.on_duplicate = policy;
        }
        Ok(config)
    };

    match command {
        Commands::Help => ui::print_usage(),
        Commands::AddFunc {
            project,
            lib,
            func,
            return_type,
            params,
        } => {
            let function = FunctionSpec {
                name: &func,
                return_type: &return_type,
                params: params.as_deref().unwrap_or_default(),
            };
            project::add_function(&ProjectLayout::new(project), &lib, function, &settings()?)?;
        }
        Commands::RemoveFunc { project, lib, func } => {
            project::remove_function(&ProjectLayout::new(project), &lib, &func, &settings()?)?;
        }
        Commands::AddLib { project, library } => {
            project::add_library(&ProjectLayout::new(project), &library, &settings()?)?;
        }
        Commands::RemoveLib { project, library } => {
            project::remove_library(&ProjectLayout::new(project), &library, &settings()?)?;
        }
        Commands::RemoveProject { project } => {
            project::remove_project(&ProjectLayout::new(project))?;
        }
        Commands::BuildRun { project } => {
            let layout = ProjectLayout::new(project);
            let config = settings()?;
            if let RunOutcome::BuildFailed(_) = build::build_and_run(&layout, &config.build)? {
                ui::warn("Skipped running because the build failed");
            }
        }
        Commands::External(args) => {
            let Some((name, rest)) = args.split_first() else {
                anyhow::bail!("No project name provided");
            };
            if !rest.is_empty() {
                ui::warn(format!("Ignoring extra arguments: {}", rest.join(" ")));
            }
            project::create_project(&ProjectLayout::new(name), &settings()?)?;
        }
    }

    Ok(())
}
