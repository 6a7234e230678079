//! Template directory fixtures for tests.
//!
//! [`TemplateDir`] is a temporary directory that tests populate with template
//! files and point a renderer at through glob patterns. The directory is
//! removed when the fixture is dropped.
//!
//! ```rust
//! use trellis_test::TemplateDir;
//!
//! let dir = TemplateDir::new();
//! dir.write("hello.tmpl", "Hello {{ name }}!");
//! dir.write("partials/footer.tmpl", "bye");
//!
//! let templates = dir.glob("*.tmpl");
//! assert!(templates.ends_with("*.tmpl"));
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory of template files.
pub struct TemplateDir {
    dir: TempDir,
}

impl TemplateDir {
    /// Creates an empty fixture directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create template fixture directory");
        Self { dir }
    }

    /// Writes `content` to `relative`, creating parent directories as needed.
    ///
    /// Overwrites any existing file. Returns the absolute path written.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create fixture subdirectory");
        }
        fs::write(&path, content).expect("failed to write fixture template");
        path
    }

    /// Removes a previously written file.
    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.dir.path().join(relative))
            .expect("failed to remove fixture template");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Joins `pattern` onto the fixture root, ready for use as a glob.
    pub fn glob(&self, pattern: &str) -> String {
        self.dir.path().join(pattern).to_string_lossy().into_owned()
    }
}

impl Default for TemplateDir {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_parents() {
        let dir = TemplateDir::new();
        let path = dir.write("partials/nested/q.tmpl", "hi");

        assert!(path.starts_with(dir.path()));
        assert_eq!(fs::read_to_string(path).unwrap(), "hi");
    }

    #[test]
    fn test_write_overwrites() {
        let dir = TemplateDir::new();
        dir.write("a.tmpl", "one");
        let path = dir.write("a.tmpl", "two");
        assert_eq!(fs::read_to_string(path).unwrap(), "two");
    }

    #[test]
    fn test_remove() {
        let dir = TemplateDir::new();
        let path = dir.write("a.tmpl", "one");
        dir.remove("a.tmpl");
        assert!(!path.exists());
    }

    #[test]
    fn test_glob_is_rooted() {
        let dir = TemplateDir::new();
        let pattern = dir.glob("*.tmpl");
        assert!(Path::new(&pattern).starts_with(dir.path()));
        assert!(pattern.ends_with("*.tmpl"));
    }

    #[test]
    fn test_directory_removed_on_drop() {
        let root = {
            let dir = TemplateDir::new();
            dir.write("a.tmpl", "x");
            dir.path().to_path_buf()
        };
        assert!(!root.exists());
    }
}
