//! Project operations.
//!
//! Each operation is a short list of independent steps. A failing step is
//! reported and recorded in the returned [`Outcome`], and the remaining steps
//! still run; nothing is rolled back. Only the `reject` duplicate policy
//! checks preconditions, and it does so before the first mutation.

mod function;
mod layout;
mod library;

pub use function::{FunctionSpec, add_function, remove_function};
pub use layout::{BUILD_FILE, MAIN_FILE, ProjectLayout};
pub use library::{add_library, remove_library};

use crate::config::{CpgConfig, DuplicatePolicy};
use crate::{fsops, templates, ui};
use anyhow::{Result, bail};

/// Steps of one operation that did not complete.
#[derive(Debug, Default)]
pub struct Outcome {
    failed: Vec<String>,
}

impl Outcome {
    /// Reports a failed step and remembers it. Returns whether it succeeded.
    pub(crate) fn record(&mut self, step: &str, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                ui::error(format!("{}: {:#}", step, e));
                self.failed.push(step.to_string());
                false
            }
        }
    }

    pub fn failed_steps(&self) -> &[String] {
        &self.failed
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn finish(&self, what: &str) {
        if self.is_complete() {
            ui::success(what);
        } else {
            ui::warn(format!(
                "{} with {} failed step(s)",
                what,
                self.failed.len()
            ));
        }
    }
}

pub fn create_project(layout: &ProjectLayout, config: &CpgConfig) -> Result<Outcome> {
    if config.edit.on_duplicate == DuplicatePolicy::Reject && layout.root().exists() {
        bail!("Directory '{}' already exists", layout.root().display());
    }

    let mut outcome = Outcome::default();

    for dir in layout.directories() {
        outcome.record(
            "create directory",
            fsops::create_directory(&dir).map(|_| ui::created("directory", &dir)),
        );
    }

    let main_file = layout.main_file();
    outcome.record(
        "write entry file",
        fsops::write_file(&main_file, &templates::main_source())
            .map(|_| ui::created("file", &main_file)),
    );

    let makefile = layout.makefile();
    outcome.record(
        "write Makefile",
        fsops::write_file(&makefile, &templates::makefile(&config.build))
            .map(|_| ui::created("file", &makefile)),
    );

    outcome.finish(&format!("Project '{}' created", layout.name()));
    Ok(outcome)
}

pub fn remove_project(layout: &ProjectLayout) -> Result<Outcome> {
    let mut outcome = Outcome::default();
    outcome.record("remove project", fsops::remove_tree(layout.root()));
    outcome.finish(&format!("Project '{}' removed", layout.name()));
    Ok(outcome)
}
