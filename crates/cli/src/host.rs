//! Host backed by a radare2 child process.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::io;

use console::style;
use r2dec_core::{Host, SettingValue};
use tracing::{debug, error, warn};

use crate::pipe::Radare2Pipe;

/// Something that can run host commands.
pub trait Backend {
    fn run(&self, command: &str) -> io::Result<String>;
}

impl Backend for Radare2Pipe {
    fn run(&self, command: &str) -> io::Result<String> {
        self.cmd(command)
    }
}

/// Host for the standalone driver.
///
/// The child radare2 has no r2dec plugin loaded, so the plugin's settings live
/// here and `e <key>` / `e <key>=<value>` for those keys never reach it.
pub struct CliHost<B> {
    backend: B,
    settings: RefCell<BTreeMap<String, String>>,
    locked: Cell<bool>,
    color: bool,
}

impl<B: Backend> CliHost<B> {
    /// Creates a host over `backend`.
    pub fn new(backend: B, color: bool) -> Self {
        Self {
            backend,
            settings: RefCell::new(BTreeMap::new()),
            locked: Cell::new(false),
            color,
        }
    }

    /// Stores user overrides ahead of plugin initialization.
    pub fn apply_overrides(&self, overrides: &[(String, SettingValue)]) {
        let mut settings = self.settings.borrow_mut();
        for (key, value) in overrides {
            settings.insert(key.clone(), value.to_string());
        }
    }

    /// Answers `e` commands that target a local setting.
    fn intercept(&self, command: &str) -> Option<String> {
        let rest = command.trim().strip_prefix("e ")?.trim();

        if let Some((key, value)) = rest.split_once('=') {
            let mut settings = self.settings.borrow_mut();
            let slot = settings.get_mut(key.trim())?;
            *slot = value.trim().to_string();
            return Some(String::new());
        }

        self.settings.borrow().get(rest).map(|v| format!("{v}\n"))
    }
}

impl<B: Backend> Host for CliHost<B> {
    fn cmd(&self, command: &str) -> String {
        if let Some(output) = self.intercept(command) {
            return output;
        }

        match self.backend.run(command) {
            Ok(output) => output,
            Err(e) => {
                error!(command = %command, error = %e, "radare2 command failed");
                String::new()
            }
        }
    }

    fn print(&self, line: &str) {
        println!("{line}");
    }

    fn eprint(&self, line: &str) {
        if self.color {
            eprintln!("{}", style(line).red());
        } else {
            eprintln!("{line}");
        }
    }

    fn use_color(&self) -> bool {
        self.color
    }

    fn config_get(&self, key: &str) -> Option<String> {
        self.settings.borrow().get(key).cloned()
    }

    fn config_set(&self, key: &str, value: &str, description: &str) {
        let mut settings = self.settings.borrow_mut();
        if self.locked.get() && !settings.contains_key(key) {
            warn!(key = %key, "configuration is locked, new key ignored");
            return;
        }

        debug!(key = %key, value = %value, description = %description, "setting registered");
        settings.insert(key.to_string(), value.to_string());
    }

    fn config_lock(&self, locked: bool) {
        self.locked.set(locked);
    }

    fn autocomplete_add(&self, keyword: &str) {
        debug!(keyword = %keyword, "autocomplete keyword registered");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeBackend {
        seen: RefCell<Vec<String>>,
    }

    impl Backend for FakeBackend {
        fn run(&self, command: &str) -> io::Result<String> {
            self.seen.borrow_mut().push(command.to_string());
            if command == "fail" {
                return Err(io::Error::other("broken pipe"));
            }
            Ok(format!("ran {command}"))
        }
    }

    fn host() -> CliHost<FakeBackend> {
        let host = CliHost::new(FakeBackend::default(), false);
        host.config_set("pdd.out.tabsize", "4", "indent size");
        host
    }

    #[test]
    fn test_forwards_unknown_commands() {
        let host = host();
        assert_eq!(host.cmd("pdfj"), "ran pdfj");
        assert_eq!(host.cmd("e asm.arch"), "ran e asm.arch");
        assert_eq!(host.backend.seen.borrow().len(), 2);
    }

    #[test]
    fn test_answers_local_settings() {
        let host = host();
        assert_eq!(host.cmd("e pdd.out.tabsize"), "4\n");
        assert_eq!(host.cmd("e pdd.out.tabsize = 2"), "");
        assert_eq!(host.cmd("e pdd.out.tabsize"), "2\n");
        assert!(host.backend.seen.borrow().is_empty());
    }

    #[test]
    fn test_backend_failure_yields_empty_output() {
        let host = host();
        assert_eq!(host.cmd("fail"), "");
    }

    #[test]
    fn test_locked_config_rejects_new_keys() {
        let host = host();
        host.config_lock(true);
        host.config_set("pdd.new", "1", "");
        host.config_set("pdd.out.tabsize", "8", "");

        assert_eq!(host.config_get("pdd.new"), None);
        assert_eq!(host.config_get("pdd.out.tabsize").as_deref(), Some("8"));
    }

    #[test]
    fn test_overrides() {
        let host = host();
        host.apply_overrides(&[("pdd.out.theme".to_string(), SettingValue::Text("none".into()))]);
        assert_eq!(host.config_get("pdd.out.theme").as_deref(), Some("none"));
    }
}
