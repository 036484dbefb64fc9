//! r2dec Plugin - embeds a JavaScript interpreter and hands `pdd` commands to
//! the r2dec-js decompiler scripts.
//!
//! Each decompile request gets its own [`Interpreter`]. The bridge globals
//! installed into it (`r2cmd`, `___internal_load`, `___internal_require`)
//! capture the host for that instance only, and lose it when the instance
//! is torn down.

mod command;
mod config;
mod error;
mod host;
pub mod loader;
mod manifest;
mod plugin;
mod runtime;

#[cfg(test)]
mod testing;

pub use command::{
    Action, COMMAND_PREFIX, HelpEntry, MISSING_ENTRY_MESSAGE, OutputMode, Request, USAGE,
    entry_invocation, render_help,
};
pub use config::{DEFAULT_BOOTSTRAP, DEFAULT_ENTRY_POINT, DEFAULT_MAX_REQUIRE_DEPTH, PluginConfig};
pub use error::{PluginError, Result};
pub use host::{COMMAND_FN, LOAD_FN, REQUIRE_FN};
pub use loader::{ModuleLoader, ROOT_ENV, RootSource, resolve_root};
pub use manifest::PluginDescriptor;
pub use plugin::DecompilerPlugin;
pub use runtime::{FatalPolicy, Interpreter};
