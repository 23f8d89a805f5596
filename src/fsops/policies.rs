use super::{LineEdit, edit_in_place, splice_lines};
use crate::config::MatchMode;
use crate::templates::{INCLUDE_MARKER, OBJECT_LIST_MARKER};
use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;

/// Decides whether a line mentions a function or library name.
#[derive(Debug, Clone)]
pub struct LineMatcher {
    needle: String,
    word: Option<Regex>,
}

impl LineMatcher {
    pub fn new(needle: &str, mode: MatchMode) -> Result<Self> {
        let word = match mode {
            MatchMode::Substring => None,
            MatchMode::Word => {
                let pattern = format!(
                    r"(?:^|[^A-Za-z0-9_]){}(?:[^A-Za-z0-9_]|$)",
                    regex::escape(needle)
                );
                Some(Regex::new(&pattern).context("Failed to build name matcher")?)
            }
        };
        Ok(Self {
            needle: needle.to_string(),
            word,
        })
    }

    pub fn mode(&self) -> MatchMode {
        if self.word.is_some() {
            MatchMode::Word
        } else {
            MatchMode::Substring
        }
    }

    pub fn matches(&self, line: &str) -> bool {
        match &self.word {
            Some(re) => re.is_match(line),
            None => line.contains(&self.needle),
        }
    }
}

/// Appends `token` to the first `OBJ =` line. Returns whether a line was found.
pub fn insert_object_token(makefile: &Path, token: &str) -> Result<bool> {
    let mut done = false;
    edit_in_place(makefile, |line| {
        if !done && line.contains(OBJECT_LIST_MARKER) {
            done = true;
            LineEdit::Replace(format!("{} {}", line, token))
        } else {
            LineEdit::Keep
        }
    })?;
    Ok(done)
}

/// Writes `include` right after the first `#include` line.
pub fn insert_include(main_file: &Path, include: &str) -> Result<bool> {
    let mut done = false;
    edit_in_place(main_file, |line| {
        if !done && line.contains(INCLUDE_MARKER) {
            done = true;
            LineEdit::Append(vec![include.to_string()])
        } else {
            LineEdit::Keep
        }
    })?;
    Ok(done)
}

/// Splices `lines` in front of the last line equal to `guard`.
///
/// Trailing whitespace on the guard line is tolerated. A header without the
/// guard is left untouched.
pub fn insert_before_closing_guard(header: &Path, guard: &str, lines: &[String]) -> Result<()> {
    splice_lines(header, |content| {
        let position = content
            .iter()
            .rposition(|line| String::from_utf8_lossy(line).trim_end() == guard)
            .with_context(|| {
                format!(
                    "Closing guard '{}' not found in {}",
                    guard,
                    header.display()
                )
            })?;
        let tail = content.split_off(position);
        content.extend(lines.iter().map(|line| line.as_bytes().to_vec()));
        content.extend(tail);
        Ok(())
    })
}

/// Drops every line the matcher accepts. Returns the number of dropped lines.
pub fn remove_matching_lines(path: &Path, matcher: &LineMatcher) -> Result<usize> {
    let mut dropped = 0;
    edit_in_place(path, |line| {
        if matcher.matches(line) {
            dropped += 1;
            LineEdit::Drop
        } else {
            LineEdit::Keep
        }
    })?;
    Ok(dropped)
}

/// Words that can precede `name(` on a line without making it a definition.
const STATEMENT_KEYWORDS: [&str; 7] = ["return", "if", "else", "while", "for", "switch", "do"];

/// Whether `line` starts a top-level definition of `name`: it begins at
/// column 0 and reads `<return type> name(`.
fn opens_definition(line: &str, name: &str) -> bool {
    if line.is_empty() || line.starts_with(char::is_whitespace) {
        return false;
    }
    let head = line.trim_start();
    if head.starts_with('#') || head.starts_with("//") || head.starts_with("/*") {
        return false;
    }
    line.match_indices(name).any(|(at, _)| {
        let before = &line[..at];
        let after = &line[at + name.len()..];
        if !after.trim_start().starts_with('(') {
            return false;
        }
        if before.ends_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
            return false;
        }
        let return_type = before.trim_end();
        !return_type.contains(['(', ')', '=', ';', ',', '{', '}'])
            && !return_type
                .split_whitespace()
                .any(|word| STATEMENT_KEYWORDS.contains(&word))
    })
}

/// Counts `{` and `}` outside string literals, character literals and
/// comments. `in_comment` carries an open `/* */` comment across lines.
fn count_braces(line: &str, in_comment: &mut bool) -> (usize, usize) {
    let (mut open, mut close) = (0, 0);
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if *in_comment {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                *in_comment = false;
            }
            continue;
        }
        match c {
            '/' if chars.peek() == Some(&'/') => break,
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                *in_comment = true;
            }
            '"' | '\'' => {
                while let Some(inner) = chars.next() {
                    if inner == '\\' {
                        chars.next();
                    } else if inner == c {
                        break;
                    }
                }
            }
            '{' => open += 1,
            '}' => close += 1,
            _ => {}
        }
    }
    (open, close)
}

/// Drops whole definition blocks of the matcher's name together with the
/// blank line in front of each.
///
/// A block starts at a column-0 line that reads `<return type> name(` and
/// ends on the line where its braces balance. Calls, prototypes and a block
/// that never closes are left alone. Returns the number of dropped lines.
pub fn remove_definition_blocks(source: &Path, matcher: &LineMatcher) -> Result<usize> {
    let mut dropped = 0;
    splice_lines(source, |content| {
        let text: Vec<String> = content
            .iter()
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect();
        let mut keep = vec![true; text.len()];
        let mut in_comment = false;
        let mut i = 0;

        while i < text.len() {
            if !in_comment
                && matcher.matches(&text[i])
                && opens_definition(&text[i], &matcher.needle)
                && let Some((end, comment_after)) = block_end(&text, i)
            {
                keep[i..=end].fill(false);
                if i > 0 && keep[i - 1] && text[i - 1].trim().is_empty() {
                    keep[i - 1] = false;
                }
                in_comment = comment_after;
                i = end + 1;
                continue;
            }
            count_braces(&text[i], &mut in_comment);
            i += 1;
        }

        let mut flags = keep.into_iter();
        content.retain(|_| flags.next().unwrap_or(true));
        dropped = text.len() - content.len();
        Ok(())
    })?;
    Ok(dropped)
}

/// Index of the line closing the block that starts at `start`, plus the
/// comment state after it. `None` for prototypes and unterminated blocks.
fn block_end(text: &[String], start: usize) -> Option<(usize, bool)> {
    let mut in_comment = false;
    let mut depth = 0usize;
    let mut opened = false;
    for (index, line) in text.iter().enumerate().skip(start) {
        let (open, close) = count_braces(line, &mut in_comment);
        if open > 0 {
            opened = true;
        }
        if !opened && line.contains(';') {
            return None;
        }
        depth = (depth + open).saturating_sub(close);
        if opened && depth == 0 {
            return Some((index, in_comment));
        }
    }
    None
}

/// Strips `token` from `OBJ =` lines and drops the other lines the matcher
/// accepts. Returns the number of touched lines.
pub fn remove_object_token(makefile: &Path, token: &str, matcher: &LineMatcher) -> Result<usize> {
    let mut touched = 0;
    let spaced = format!(" {}", token);
    edit_in_place(makefile, |line| {
        if line.contains(OBJECT_LIST_MARKER) {
            if line.contains(&spaced) {
                touched += 1;
                LineEdit::Replace(line.replace(&spaced, ""))
            } else {
                LineEdit::Keep
            }
        } else if matcher.matches(line) {
            touched += 1;
            LineEdit::Drop
        } else {
            LineEdit::Keep
        }
    })?;
    Ok(touched)
}
