use super::{Outcome, ProjectLayout};
use crate::config::{CpgConfig, DuplicatePolicy, MatchMode};
use crate::fsops::{self, LineMatcher};
use crate::{templates, ui};
use anyhow::{Context, Result, bail};
use std::fs;

/// A function to template into a library.
#[derive(Debug, Clone, Copy)]
pub struct FunctionSpec<'a> {
    pub name: &'a str,
    pub return_type: &'a str,
    pub params: &'a str,
}

impl FunctionSpec<'_> {
    pub fn signature(&self) -> String {
        templates::signature(self.return_type, self.name, self.params)
    }
}

/// Whether any header line already declares `name(` as a whole identifier.
fn declares(header_content: &str, name: &str) -> Result<bool> {
    let matcher = LineMatcher::new(name, MatchMode::Word)?;
    let call = format!("{}(", name);
    Ok(header_content
        .lines()
        .any(|line| matcher.matches(line) && line.contains(&call)))
}

/// Splices the declaration before the header's closing guard and appends a
/// stub definition to the library source.
pub fn add_function(
    layout: &ProjectLayout,
    library: &str,
    function: FunctionSpec<'_>,
    config: &CpgConfig,
) -> Result<Outcome> {
    let header = layout.header(library);
    let source = layout.source(library);

    if config.edit.on_duplicate == DuplicatePolicy::Reject {
        let content = fs::read_to_string(&header)
            .with_context(|| format!("Failed to read {}", header.display()))?;
        if declares(&content, function.name)? {
            bail!(
                "Function '{}' is already declared in {}",
                function.name,
                header.display()
            );
        }
    }

    let mut outcome = Outcome::default();
    let signature = function.signature();

    outcome.record(
        "add declaration",
        fsops::insert_before_closing_guard(
            &header,
            &templates::closing_guard(library),
            &templates::declaration(function.return_type, function.name, function.params),
        )
        .map(|_| ui::updated(format!("Declared {}; in {}", signature, header.display()))),
    );

    outcome.record(
        "add definition",
        fsops::append_file(
            &source,
            &templates::definition(function.return_type, function.name, function.params),
        )
        .map(|_| ui::updated(format!("Defined {} in {}", signature, source.display()))),
    );

    outcome.finish(&format!("Function '{}' added to {}", function.name, library));
    Ok(outcome)
}

/// Drops the function's lines from the header and source.
///
/// With substring matching every line containing the name goes, including
/// unrelated lines that merely contain it and leaving the rest of a body
/// behind. With word matching the header loses its declaration lines and the
/// source loses whole definition blocks.
pub fn remove_function(
    layout: &ProjectLayout,
    library: &str,
    name: &str,
    config: &CpgConfig,
) -> Result<Outcome> {
    let matcher = LineMatcher::new(name, config.edit.match_mode)?;
    let header = layout.header(library);
    let source = layout.source(library);
    let mut outcome = Outcome::default();

    outcome.record(
        "remove declaration",
        fsops::remove_matching_lines(&header, &matcher).map(|n| {
            ui::updated(format!("Removed {} line(s) from {}", n, header.display()))
        }),
    );

    let stripped = match matcher.mode() {
        MatchMode::Substring => fsops::remove_matching_lines(&source, &matcher),
        MatchMode::Word => fsops::remove_definition_blocks(&source, &matcher),
    };
    outcome.record(
        "remove definition",
        stripped.map(|n| ui::updated(format!("Removed {} line(s) from {}", n, source.display()))),
    );

    outcome.finish(&format!("Function '{}' removed from {}", name, library));
    Ok(outcome)
}
