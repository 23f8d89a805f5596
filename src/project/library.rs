use super::{Outcome, ProjectLayout};
use crate::config::{CpgConfig, DuplicatePolicy, MatchMode};
use crate::fsops::{self, LineMatcher};
use crate::{templates, ui};
use anyhow::{Result, bail};

/// Generates `<lib>.h` and `<lib>.c` and wires them into the Makefile and
/// `main.c`.
pub fn add_library(layout: &ProjectLayout, library: &str, config: &CpgConfig) -> Result<Outcome> {
    let header = layout.header(library);
    let source = layout.source(library);

    if config.edit.on_duplicate == DuplicatePolicy::Reject {
        for existing in [&header, &source] {
            if existing.exists() {
                bail!(
                    "Library '{}' already exists ({})",
                    library,
                    existing.display()
                );
            }
        }
    }

    let mut outcome = Outcome::default();

    outcome.record(
        "write header",
        fsops::write_file(&header, &templates::header(library))
            .map(|_| ui::created("header file", &header)),
    );
    outcome.record(
        "write source",
        fsops::write_file(&source, &templates::source(library))
            .map(|_| ui::created("source file", &source)),
    );

    let makefile = layout.makefile();
    let token = templates::object_token(library);
    outcome.record(
        "update Makefile",
        fsops::insert_object_token(&makefile, &token).map(|found| {
            if found {
                ui::updated(format!("Added {} to the Makefile object list", token));
            } else {
                ui::warn(format!(
                    "No '{}' line in {}",
                    templates::OBJECT_LIST_MARKER,
                    makefile.display()
                ));
            }
        }),
    );

    let main_file = layout.main_file();
    let include = templates::include_line(library);
    outcome.record(
        "update entry file",
        fsops::insert_include(&main_file, &include).map(|found| {
            if found {
                ui::updated(format!("Added {} to {}", include, main_file.display()));
            } else {
                ui::warn(format!("No #include line in {}", main_file.display()));
            }
        }),
    );

    outcome.finish(&format!("Library '{}' added", library));
    Ok(outcome)
}

/// Deletes the library files and strips every Makefile and `main.c` line
/// that mentions the library. Removing an absent library is not an error.
pub fn remove_library(
    layout: &ProjectLayout,
    library: &str,
    config: &CpgConfig,
) -> Result<Outcome> {
    let matcher = LineMatcher::new(library, config.edit.match_mode)?;
    let mut outcome = Outcome::default();

    let artifacts = [
        ("header file", layout.header(library)),
        ("source file", layout.source(library)),
        ("object file", layout.object(library)),
    ];
    for (kind, path) in &artifacts {
        outcome.record(
            &format!("remove {}", kind),
            fsops::remove_file_if_exists(path).map(|deleted| {
                if deleted {
                    ui::removed(kind, path);
                } else {
                    ui::not_found(kind, path);
                }
            }),
        );
    }

    let makefile = layout.makefile();
    let cleaned = match matcher.mode() {
        MatchMode::Substring => fsops::remove_matching_lines(&makefile, &matcher),
        MatchMode::Word => {
            fsops::remove_object_token(&makefile, &templates::object_token(library), &matcher)
        }
    };
    outcome.record(
        "update Makefile",
        cleaned.map(|n| ui::updated(format!("Cleaned {} line(s) from {}", n, makefile.display()))),
    );

    let main_file = layout.main_file();
    outcome.record(
        "update entry file",
        fsops::remove_matching_lines(&main_file, &matcher).map(|n| {
            ui::updated(format!("Cleaned {} line(s) from {}", n, main_file.display()))
        }),
    );

    outcome.finish(&format!("Library '{}' removed", library));
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;
    use crate::project::create_project;
    use std::fs;

    fn demo(dir: &tempfile::TempDir) -> ProjectLayout {
        let layout = ProjectLayout::new(dir.path().join("demo"));
        create_project(&layout, &CpgConfig::default()).unwrap();
        layout
    }

    #[test]
    fn test_add_library() {
        let dir = tempfile::tempdir().unwrap();
        let layout = demo(&dir);

        let outcome = add_library(&layout, "math", &CpgConfig::default()).unwrap();
        assert!(outcome.is_complete());

        let header = fs::read_to_string(layout.header("math")).unwrap();
        assert!(header.contains("#ifndef MATH_H"));
        assert!(header.contains("#define MATH_H"));
        assert!(header.trim_end().ends_with("#endif // MATH_H"));

        let source = fs::read_to_string(layout.source("math")).unwrap();
        assert!(source.contains("#include \"math.h\""));

        let makefile = fs::read_to_string(layout.makefile()).unwrap();
        assert!(makefile.contains("OBJ = main.o $(SRC_DIR)/math.o\n"));

        let main: Vec<String> = fs::read_to_string(layout.main_file())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        assert_eq!(main[0], "#include <stdio.h>");
        assert_eq!(main[1], "#include \"math.h\"");
    }

    #[test]
    fn test_add_library_twice_duplicates_wiring() {
        let dir = tempfile::tempdir().unwrap();
        let layout = demo(&dir);
        add_library(&layout, "math", &CpgConfig::default()).unwrap();
        add_library(&layout, "math", &CpgConfig::default()).unwrap();

        let makefile = fs::read_to_string(layout.makefile()).unwrap();
        assert_eq!(makefile.matches("$(SRC_DIR)/math.o").count(), 2);
        let main = fs::read_to_string(layout.main_file()).unwrap();
        assert_eq!(main.matches("#include \"math.h\"").count(), 2);
    }

    #[test]
    fn test_add_library_reject_leaves_files_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let layout = demo(&dir);
        add_library(&layout, "math", &CpgConfig::default()).unwrap();
        let makefile_before = fs::read_to_string(layout.makefile()).unwrap();
        let main_before = fs::read_to_string(layout.main_file()).unwrap();

        let mut config = CpgConfig::default();
        config.edit.on_duplicate = DuplicatePolicy::Reject;
        assert!(add_library(&layout, "math", &config).is_err());

        assert_eq!(fs::read_to_string(layout.makefile()).unwrap(), makefile_before);
        assert_eq!(fs::read_to_string(layout.main_file()).unwrap(), main_before);
    }

    #[test]
    fn test_add_library_without_project_reports_every_step() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::new(dir.path().join("nowhere"));

        let outcome = add_library(&layout, "math", &CpgConfig::default()).unwrap();
        assert_eq!(outcome.failed_steps().len(), 4);
    }

    #[test]
    fn test_remove_library_strips_every_mention() {
        let dir = tempfile::tempdir().unwrap();
        let layout = demo(&dir);
        add_library(&layout, "math", &CpgConfig::default()).unwrap();
        fs::write(layout.object("math"), "").unwrap();
        let mut makefile = fs::read_to_string(layout.makefile()).unwrap();
        makefile.push_str("# aftermath of the build\n");
        fs::write(layout.makefile(), makefile).unwrap();

        let outcome = remove_library(&layout, "math", &CpgConfig::default()).unwrap();
        assert!(outcome.is_complete());

        assert!(!layout.header("math").exists());
        assert!(!layout.source("math").exists());
        assert!(!layout.object("math").exists());
        let makefile = fs::read_to_string(layout.makefile()).unwrap();
        assert!(!makefile.contains("math"));
        assert!(!makefile.contains("OBJ ="));
        assert!(!fs::read_to_string(layout.main_file()).unwrap().contains("math"));
    }

    #[test]
    fn test_remove_library_twice_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let layout = demo(&dir);
        add_library(&layout, "math", &CpgConfig::default()).unwrap();

        assert!(remove_library(&layout, "math", &CpgConfig::default()).unwrap().is_complete());
        assert!(remove_library(&layout, "math", &CpgConfig::default()).unwrap().is_complete());
    }

    #[test]
    fn test_remove_library_word_mode_keeps_object_list() {
        let dir = tempfile::tempdir().unwrap();
        let layout = demo(&dir);
        let mut config = CpgConfig::default();
        config.edit.match_mode = MatchMode::Word;
        add_library(&layout, "math", &config).unwrap();
        add_library(&layout, "io", &config).unwrap();

        remove_library(&layout, "math", &config).unwrap();

        let makefile = fs::read_to_string(layout.makefile()).unwrap();
        assert!(makefile.contains("OBJ = main.o $(SRC_DIR)/io.o\n"));
        assert!(!makefile.contains("math"));
        let main = fs::read_to_string(layout.main_file()).unwrap();
        assert!(main.contains("#include \"io.h\""));
        assert!(!main.contains("math"));
    }

    #[test]
    fn test_word_mode_round_trip_restores_makefile() {
        let dir = tempfile::tempdir().unwrap();
        let layout = demo(&dir);
        let mut config = CpgConfig::default();
        config.edit.match_mode = MatchMode::Word;

        add_library(&layout, "math", &config).unwrap();
        remove_library(&layout, "math", &config).unwrap();

        assert_eq!(
            fs::read_to_string(layout.makefile()).unwrap(),
            templates::makefile(&BuildConfig::default())
        );
        assert_eq!(
            fs::read_to_string(layout.main_file()).unwrap(),
            templates::main_source()
        );
    }
}
