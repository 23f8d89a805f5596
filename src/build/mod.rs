//! Building and running a generated project with its Makefile.

mod core;

pub use core::{RunOutcome, binary_path, build_and_run};
