//! Text templates for generated C artifacts.
//!
//! Every function here is pure: it renders a string from its inputs and
//! never touches the filesystem.
//!
//! ## Artifacts
//!
//! - `main.c` - entry point printing a greeting
//! - `Makefile` - object list, link rule, pattern rule and `clean`
//! - `<lib>.h` / `<lib>.c` - library skeletons
//! - function declarations and definition stubs

use crate::config::BuildConfig;

/// Marker of the Makefile line that lists linked objects.
pub const OBJECT_LIST_MARKER: &str = "OBJ =";

/// Marker of the lines `main.c` uses to pull in headers.
pub const INCLUDE_MARKER: &str = "#include";

/// Return type rendered without a `return` statement.
pub const NO_VALUE_TYPE: &str = "void";

pub fn main_source() -> String {
    r#"#include <stdio.h>

int main() {
    printf("Hello, World!\n");
    return 0;
}
"#
    .to_string()
}

pub fn makefile(build: &BuildConfig) -> String {
    let cflags = if build.cflags.is_empty() {
        "-I$(INCLUDE_DIR)".to_string()
    } else {
        format!("{} -I$(INCLUDE_DIR)", build.cflags.join(" "))
    };

    format!(
        r#"# Project directories
INCLUDE_DIR = include
SRC_DIR = src
LIB_DIR = lib

# Compiler settings
CC = {compiler}
CFLAGS = {cflags}

# Source files
{marker} main.o
TARGET = {target}

# Build rules
all: $(TARGET)

$(TARGET): $(OBJ)
	$(CC) $(OBJ) -o $(TARGET)

%.o: %.c
	$(CC) $(CFLAGS) -c $< -o $@

clean:
	rm -f $(OBJ) $(TARGET)

.PHONY: all clean
"#,
        compiler = build.compiler,
        cflags = cflags,
        marker = OBJECT_LIST_MARKER,
        target = build.target,
    )
}

/// Include-guard macro for a library: `math` becomes `MATH_H`.
pub fn guard_name(library: &str) -> String {
    let stem: String = library
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_H", stem)
}

/// Terminal line of a library header, without line terminator.
pub fn closing_guard(library: &str) -> String {
    format!("#endif // {}", guard_name(library))
}

pub fn header(library: &str) -> String {
    let guard = guard_name(library);
    format!(
        "#ifndef {guard}\n#define {guard}\n\n// Function declarations for {library}\n\n{}\n",
        closing_guard(library)
    )
}

pub fn source(library: &str) -> String {
    format!(
        "{}\n\n// Function implementations for {}\n",
        include_line(library),
        library
    )
}

pub fn include_line(library: &str) -> String {
    format!("{} \"{}.h\"", INCLUDE_MARKER, library)
}

/// Token appended to the Makefile object list for a library.
pub fn object_token(library: &str) -> String {
    format!("$(SRC_DIR)/{}.o", library)
}

pub fn signature(return_type: &str, name: &str, params: &str) -> String {
    format!("{} {}({})", return_type, name, params)
}

/// Declaration lines spliced before the closing guard.
pub fn declaration(return_type: &str, name: &str, params: &str) -> Vec<String> {
    vec![
        format!("{};", signature(return_type, name, params)),
        String::new(),
    ]
}

/// Definition block appended to a library source file.
pub fn definition(return_type: &str, name: &str, params: &str) -> String {
    let mut block = format!("\n{} {{\n", signature(return_type, name, params));
    block.push_str(&format!("    // TODO: Implement {}\n", name));
    if return_type.trim() != NO_VALUE_TYPE {
        block.push_str("    return 0; // Default return value\n");
    }
    block.push_str("}\n");
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_source() {
        let code = main_source();
        assert_eq!(code.matches("Hello, World!").count(), 1);
        assert!(code.contains("return 0;"));
        assert!(code.starts_with("#include <stdio.h>"));
    }

    #[test]
    fn test_default_makefile() {
        let mk = makefile(&BuildConfig::default());
        assert!(mk.contains("CC = gcc\n"));
        assert!(mk.contains("CFLAGS = -Wall -Wextra -I$(INCLUDE_DIR)\n"));
        assert!(mk.contains("OBJ = main.o\n"));
        assert!(mk.contains("TARGET = main\n"));
        assert!(mk.contains("%.o: %.c\n\t$(CC) $(CFLAGS) -c $< -o $@\n"));
        assert!(mk.contains("clean:\n\trm -f $(OBJ) $(TARGET)\n"));
        assert_eq!(mk.matches(OBJECT_LIST_MARKER).count(), 1);
    }

    #[test]
    fn test_makefile_uses_build_settings() {
        let build = BuildConfig {
            compiler: "clang".into(),
            cflags: vec![],
            target: "app".into(),
            ..Default::default()
        };
        let mk = makefile(&build);
        assert!(mk.contains("CC = clang\n"));
        assert!(mk.contains("CFLAGS = -I$(INCLUDE_DIR)\n"));
        assert!(mk.contains("TARGET = app\n"));
    }

    #[test]
    fn test_header_guard() {
        let h = header("math");
        assert!(h.starts_with("#ifndef MATH_H\n#define MATH_H\n"));
        assert!(h.ends_with("#endif // MATH_H\n"));
        assert_eq!(guard_name("my-lib.v2"), "MY_LIB_V2_H");
    }

    #[test]
    fn test_source_includes_header() {
        let c = source("math");
        assert!(c.starts_with("#include \"math.h\"\n"));
        assert!(c.contains("// Function implementations for math"));
    }

    #[test]
    fn test_declaration() {
        assert_eq!(
            declaration("int", "add", "int a, int b"),
            vec!["int add(int a, int b);".to_string(), String::new()]
        );
    }

    #[test]
    fn test_definition_returns_default_value() {
        let block = definition("int", "add", "int a, int b");
        assert!(block.starts_with("\nint add(int a, int b) {\n"));
        assert!(block.contains("// TODO: Implement add"));
        assert!(block.ends_with("    return 0; // Default return value\n}\n"));
    }

    #[test]
    fn test_void_definition_has_no_return() {
        let block = definition("void", "reset", "");
        assert!(block.starts_with("\nvoid reset() {\n"));
        assert!(!block.contains("return"));
    }
}
