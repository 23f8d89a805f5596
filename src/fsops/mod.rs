//! Filesystem mutation primitives.
//!
//! Creation helpers are thin wrappers over `std::fs` that attach the path to
//! every error. Existing artifacts are only ever changed through
//! [`edit_in_place`] or [`splice_lines`]: the new content is written to a
//! temporary sibling which is then renamed over the original, so a failed
//! edit never leaves a half-written file behind.

mod policies;

pub use policies::{
    LineMatcher, insert_before_closing_guard, insert_include, insert_object_token,
    remove_definition_blocks, remove_matching_lines, remove_object_token,
};

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// What happens to one line during [`edit_in_place`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEdit {
    Keep,
    Drop,
    /// Write this text instead of the line.
    Replace(String),
    /// Keep the line and write these lines right after it.
    Append(Vec<String>),
}

pub fn create_directory(path: &Path) -> Result<()> {
    fs::create_dir(path).with_context(|| format!("Failed to create directory {}", path.display()))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Appends to an existing file. A missing file is an error, never created.
pub fn append_file(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {} for appending", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to append to {}", path.display()))
}

/// Deletes a file. Returns `false` when there was nothing to delete.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

pub fn remove_tree(path: &Path) -> Result<()> {
    fs::remove_dir_all(path).with_context(|| format!("Failed to remove {}", path.display()))
}

/// Temporary sibling used while rewriting `path` (`Makefile` -> `Makefile.cpg-tmp`).
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".cpg-tmp");
    path.with_file_name(name)
}

/// Streams `path` line by line through `transform` into a temporary sibling,
/// then renames the result over the original.
///
/// `transform` sees each line without its terminator, decoded lossily so a
/// stray non-UTF-8 byte never aborts the edit. Kept lines are copied byte for
/// byte; replaced and appended lines end with `\n`.
pub fn edit_in_place<F>(path: &Path, mut transform: F) -> Result<()>
where
    F: FnMut(&str) -> LineEdit,
{
    let source = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(source);

    commit_via_temp(path, |writer| {
        let mut reader = reader;
        let mut raw = Vec::new();
        loop {
            raw.clear();
            if reader.read_until(b'\n', &mut raw)? == 0 {
                break;
            }
            let text = String::from_utf8_lossy(&raw);
            let line = text.trim_end_matches(['\n', '\r']);
            match transform(line) {
                LineEdit::Keep => writer.write_all(&raw)?,
                LineEdit::Drop => {}
                LineEdit::Replace(text) => writeln!(writer, "{}", text)?,
                LineEdit::Append(extra) => {
                    writer.write_all(&raw)?;
                    if !raw.ends_with(b"\n") {
                        writeln!(writer)?;
                    }
                    for text in extra {
                        writeln!(writer, "{}", text)?;
                    }
                }
            }
        }
        Ok(())
    })
}

/// Loads `path` as a list of raw lines (terminator stripped), lets `splice`
/// rearrange them and writes the result back through a temporary sibling.
/// Every line is written back with a `\n`. Nothing is written when `splice`
/// fails.
pub fn splice_lines<F>(path: &Path, splice: F) -> Result<()>
where
    F: FnOnce(&mut Vec<Vec<u8>>) -> Result<()>,
{
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut lines: Vec<Vec<u8>> = content
        .split(|&b| b == b'\n')
        .map(<[u8]>::to_vec)
        .collect();
    if content.is_empty() || content.ends_with(b"\n") {
        lines.pop();
    }
    splice(&mut lines)?;

    commit_via_temp(path, |writer| {
        for line in &lines {
            writer.write_all(line)?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    })
}

fn commit_via_temp<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let permissions = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata of {}", path.display()))?
        .permissions();
    let temp_path = temp_path_for(path);
    let temp = File::create(&temp_path)
        .with_context(|| format!("Failed to create temporary file {}", temp_path.display()))?;
    let mut writer = BufWriter::new(temp);

    let written = write(&mut writer).and_then(|_| writer.flush());
    drop(writer);

    let result = written
        .with_context(|| format!("Failed to rewrite {}", path.display()))
        .and_then(|_| {
            fs::set_permissions(&temp_path, permissions)
                .with_context(|| format!("Failed to copy permissions of {}", path.display()))
        })
        .and_then(|_| {
            fs::rename(&temp_path, path)
                .with_context(|| format!("Failed to replace {}", path.display()))
        });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_directory_fails_when_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("include");
        create_directory(&path).unwrap();
        assert!(create_directory(&path).is_err());
    }

    #[test]
    fn test_create_directory_fails_without_parent() {
        let dir = tempfile::tempdir().unwrap();
        assert!(create_directory(&dir.path().join("missing").join("src")).is_err());
    }

    #[test]
    fn test_append_file_does_not_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lib.c");
        assert!(append_file(&path, "x").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_file_if_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("math.o");
        fs::write(&path, "").unwrap();
        assert!(remove_file_if_exists(&path).unwrap());
        assert!(!remove_file_if_exists(&path).unwrap());
    }

    #[test]
    fn test_temp_path_is_derived_from_target() {
        assert_eq!(
            temp_path_for(Path::new("demo/include/math.h")),
            PathBuf::from("demo/include/math.h.cpg-tmp")
        );
    }

    #[test]
    fn test_edit_in_place_applies_each_edit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "keep\ndrop\nswap\nafter\n").unwrap();

        edit_in_place(&path, |line| match line {
            "drop" => LineEdit::Drop,
            "swap" => LineEdit::Replace("swapped".into()),
            "after" => LineEdit::Append(vec!["one".into(), "two".into()]),
            _ => LineEdit::Keep,
        })
        .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "keep\nswapped\nafter\none\ntwo\n"
        );
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_edit_in_place_terminates_last_line_before_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "first\nlast").unwrap();

        edit_in_place(&path, |line| {
            if line == "last" {
                LineEdit::Append(vec!["tail".into()])
            } else {
                LineEdit::Keep
            }
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nlast\ntail\n");
    }

    #[test]
    fn test_edit_in_place_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        assert!(edit_in_place(&path, |_| LineEdit::Keep).is_err());
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_splice_failure_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "a\nb\n").unwrap();

        let result = splice_lines(&path, |_| anyhow::bail!("no anchor"));
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_edit_in_place_passes_non_utf8_bytes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.c");
        fs::write(&path, b"#include <stdio.h>\n// caf\xe9\nint main() {}\n").unwrap();

        edit_in_place(&path, |line| {
            if line.starts_with("#include") {
                LineEdit::Append(vec!["#include \"math.h\"".into()])
            } else {
                LineEdit::Keep
            }
        })
        .unwrap();

        assert_eq!(
            fs::read(&path).unwrap(),
            b"#include <stdio.h>\n#include \"math.h\"\n// caf\xe9\nint main() {}\n"
        );
    }

    #[test]
    fn test_splice_keeps_non_utf8_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("math.h");
        fs::write(&path, b"// \xff\xfe\n#endif\n").unwrap();

        splice_lines(&path, |lines| {
            lines.insert(1, b"int f();".to_vec());
            Ok(())
        })
        .unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"// \xff\xfe\nint f();\n#endif\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_edit_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Makefile");
        fs::write(&path, "OBJ = main.o\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        edit_in_place(&path, |_| LineEdit::Keep).unwrap();
        splice_lines(&path, |_| Ok(())).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }
}
