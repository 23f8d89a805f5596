use std::path::{Path, PathBuf};

pub const HEADER_EXT: &str = "h";
pub const SOURCE_EXT: &str = "c";
pub const OBJECT_EXT: &str = "o";
pub const MAIN_FILE: &str = "main.c";
pub const BUILD_FILE: &str = "Makefile";

/// Resolves artifact paths of a generated project from its root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Project name: the final component of the root path.
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .unwrap_or(self.root.as_os_str())
            .to_string_lossy()
            .to_string()
    }

    pub fn include_dir(&self) -> PathBuf {
        self.root.join("include")
    }

    pub fn src_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }

    pub fn main_file(&self) -> PathBuf {
        self.root.join(MAIN_FILE)
    }

    pub fn makefile(&self) -> PathBuf {
        self.root.join(BUILD_FILE)
    }

    pub fn header(&self, library: &str) -> PathBuf {
        self.include_dir()
            .join(format!("{}.{}", library, HEADER_EXT))
    }

    pub fn source(&self, library: &str) -> PathBuf {
        self.src_dir().join(format!("{}.{}", library, SOURCE_EXT))
    }

    pub fn object(&self, library: &str) -> PathBuf {
        self.src_dir().join(format!("{}.{}", library, OBJECT_EXT))
    }

    /// Directories created for a new project, root first.
    pub fn directories(&self) -> [PathBuf; 4] {
        [
            self.root.clone(),
            self.include_dir(),
            self.src_dir(),
            self.lib_dir(),
        ]
    }
}
