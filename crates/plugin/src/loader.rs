//! Module loader: resolves script names under the r2dec-js installation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Environment variable overriding the installation root.
pub const ROOT_ENV: &str = "R2DEC_HOME";

/// Installation directory relative to the user's home.
const DEFAULT_ROOT: [&str; 5] = [".config", "radare2", "r2pm", "git", "r2dec-js"];

/// Where the loader finds its root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootSource {
    /// Resolved from [`ROOT_ENV`] or the home directory on every read.
    Environment,

    /// A fixed directory.
    Fixed(PathBuf),
}

/// Resolves the installation root from an optional override and home directory.
///
/// The override wins whenever it is set, even if no home directory exists.
pub fn resolve_root_with(env_override: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(root) = env_override {
        return Some(PathBuf::from(root));
    }

    let mut root = home?;
    root.extend(DEFAULT_ROOT);
    Some(root)
}

/// Resolves the installation root from the process environment.
pub fn resolve_root() -> Option<PathBuf> {
    resolve_root_with(std::env::var_os(ROOT_ENV), dirs::home_dir())
}

/// Reads script files relative to the installation root.
#[derive(Debug, Clone)]
pub struct ModuleLoader {
    source: RootSource,
}

impl ModuleLoader {
    /// Creates a loader reading from `source`.
    pub fn new(source: RootSource) -> Self {
        Self { source }
    }

    /// Creates a loader pinned to `root`.
    pub fn fixed(root: impl Into<PathBuf>) -> Self {
        Self::new(RootSource::Fixed(root.into()))
    }

    /// Returns the current root, if one can be determined.
    pub fn root(&self) -> Option<PathBuf> {
        match &self.source {
            RootSource::Environment => resolve_root(),
            RootSource::Fixed(path) => Some(path.clone()),
        }
    }

    /// Returns the path `file_name` maps to under the root.
    pub fn path_of(&self, file_name: &str) -> Option<PathBuf> {
        if file_name.is_empty() {
            return None;
        }
        self.root().map(|root| root.join(file_name))
    }

    /// Reads `file_name` under the root.
    ///
    /// Missing, unreadable and empty files are all reported as `None`.
    pub fn read(&self, file_name: &str) -> Option<String> {
        let Some(path) = self.path_of(file_name) else {
            debug!(file = file_name, "no script root to resolve against");
            return None;
        };

        read_non_empty(&path)
    }
}

fn read_non_empty(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.is_empty() => {
            debug!(path = %path.display(), "script is empty");
            None
        }
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "script not readable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_override_wins() {
        let root = resolve_root_with(Some(OsString::from("/tmp/x")), None);
        assert_eq!(root, Some(PathBuf::from("/tmp/x")));

        let root = resolve_root_with(Some(OsString::from("/tmp/x")), Some("/home/u".into()));
        assert_eq!(root, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_default_under_home() {
        let root = resolve_root_with(None, Some(PathBuf::from("/home/u"))).unwrap();
        let expected: PathBuf = ["/home/u", ".config", "radare2", "r2pm", "git", "r2dec-js"]
            .iter()
            .collect();
        assert_eq!(root, expected);
    }

    #[test]
    fn test_no_home_no_root() {
        assert_eq!(resolve_root_with(None, None), None);
    }

    #[test]
    fn test_read_existing_file() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("js")).unwrap();
        fs::write(dir.path().join("js").join("a.js"), "var a = 1;\n").unwrap();

        let loader = ModuleLoader::fixed(dir.path());
        assert_eq!(loader.read("js/a.js").as_deref(), Some("var a = 1;\n"));
    }

    #[test]
    fn test_read_empty_name() {
        let dir = tempdir().unwrap();
        let loader = ModuleLoader::fixed(dir.path());
        assert_eq!(loader.read(""), None);
    }

    #[test]
    fn test_read_empty_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("empty.js"), "").unwrap();

        let loader = ModuleLoader::fixed(dir.path());
        assert_eq!(loader.read("empty.js"), None);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let loader = ModuleLoader::fixed(dir.path());
        assert_eq!(loader.read("missing.js"), None);
    }

    #[test]
    fn test_path_of() {
        let loader = ModuleLoader::fixed("/opt/r2dec");
        assert_eq!(
            loader.path_of("js/require.js"),
            Some(PathBuf::from("/opt/r2dec/js/require.js"))
        );
        assert_eq!(loader.path_of(""), None);
    }
}
