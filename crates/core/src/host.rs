//! The narrow interface through which the plugin reaches its host framework.

/// Capabilities the host framework lends to the plugin.
///
/// Implementations are single-threaded: every method takes `&self`, so hosts
/// that keep state use interior mutability.
pub trait Host {
    /// Runs a host command and returns its captured textual output.
    ///
    /// This is not sandboxed: the command may move the cursor, change
    /// analysis state or do anything else the host can do.
    fn cmd(&self, command: &str) -> String;

    /// Writes one line of user-visible output.
    fn print(&self, line: &str);

    /// Writes one line of diagnostic output.
    fn eprint(&self, line: &str) {
        eprintln!("{line}");
    }

    /// Whether output may carry terminal colours.
    fn use_color(&self) -> bool {
        false
    }

    /// Reads a configuration value.
    fn config_get(&self, key: &str) -> Option<String>;

    /// Creates or overwrites a configuration value.
    fn config_set(&self, key: &str, value: &str, description: &str);

    /// Locks or unlocks creation of new configuration keys.
    fn config_lock(&self, _locked: bool) {}

    /// Registers a command keyword for autocompletion.
    fn autocomplete_add(&self, _keyword: &str) {}
}
