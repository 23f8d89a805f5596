//! # cpg - C Project Generator
//!
//! cpg scaffolds a small Makefile-based C project and keeps it wired up as
//! libraries and functions are added or removed.
//!
//! ## Quick Start
//!
//! ```bash
//! cpg demo                                   # demo/{include,src,lib}, main.c, Makefile
//! cpg addlib demo math                       # include/math.h, src/math.c
//! cpg addfunc demo math add int "int a, int b"
//! cpg buildrun demo
//! ```
//!
//! ## Module Organization
//!
//! - [`templates`] - Pure text rendering of every generated artifact
//! - [`fsops`] - File creation and line-based edit-in-place
//! - [`project`] - The project, library and function operations
//! - [`build`] - Build tool and program invocation
//! - [`config`] - Optional `cpg.toml` settings

/// Build-and-run of a generated project.
pub mod build;

/// Configuration file parsing (`cpg.toml`).
pub mod config;

/// File creation and edit-in-place primitives.
pub mod fsops;

/// Project, library and function operations.
pub mod project;

/// Templates for generated C sources and Makefiles.
pub mod templates;

/// Terminal output helpers.
pub mod ui;
