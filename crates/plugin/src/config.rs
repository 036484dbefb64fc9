//! Plugin configuration.

use std::path::PathBuf;

use crate::loader::RootSource;
use crate::runtime::FatalPolicy;

/// Bootstrap scripts evaluated, in order, at the start of every decompile.
pub const DEFAULT_BOOTSTRAP: [&str; 2] = ["js/require.js", "js/r2dec-duk.js"];

/// Function the bootstrap scripts are expected to define.
pub const DEFAULT_ENTRY_POINT: &str = "r2dec_main";

/// Maximum nesting of `___internal_require` calls.
pub const DEFAULT_MAX_REQUIRE_DEPTH: usize = 64;

/// Configuration of a [`DecompilerPlugin`](crate::DecompilerPlugin).
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Where scripts are looked up.
    pub root: RootSource,

    /// What happens when the interpreter reports a fatal error.
    pub fatal_policy: FatalPolicy,

    /// Scripts evaluated before the entry point is invoked.
    pub bootstrap: Vec<String>,

    /// Name of the global function invoked with the command arguments.
    pub entry_point: String,

    /// Maximum nesting of required modules.
    pub max_require_depth: usize,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            root: RootSource::Environment,
            fatal_policy: FatalPolicy::default(),
            bootstrap: DEFAULT_BOOTSTRAP.iter().map(|s| s.to_string()).collect(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            max_require_depth: DEFAULT_MAX_REQUIRE_DEPTH,
        }
    }
}

impl PluginConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the script root to a fixed directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = RootSource::Fixed(root.into());
        self
    }

    /// Sets the fatal error policy.
    pub fn with_fatal_policy(mut self, policy: FatalPolicy) -> Self {
        self.fatal_policy = policy;
        self
    }

    /// Sets the maximum require nesting.
    pub fn with_max_require_depth(mut self, depth: usize) -> Self {
        self.max_require_depth = depth;
        self
    }

    /// Replaces the bootstrap script list.
    pub fn with_bootstrap<I, S>(mut self, scripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bootstrap = scripts.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the name of the entry point function.
    pub fn with_entry_point(mut self, name: impl Into<String>) -> Self {
        self.entry_point = name.into();
        self
    }
}
