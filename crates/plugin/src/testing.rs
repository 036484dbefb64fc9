//! Test double for the host framework.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use r2dec_core::Host;

/// Host that answers commands from a table and records everything else.
#[derive(Default)]
pub(crate) struct RecordingHost {
    replies: RefCell<BTreeMap<String, String>>,
    commands: RefCell<Vec<String>>,
    printed: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
    config: RefCell<BTreeMap<String, String>>,
    lock_calls: RefCell<Vec<bool>>,
    autocomplete: RefCell<Vec<String>>,
    color: Cell<bool>,
}

impl RecordingHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, command: &str, output: &str) -> Self {
        self.replies
            .borrow_mut()
            .insert(command.to_string(), output.to_string());
        self
    }

    pub(crate) fn with_config(self, key: &str, value: &str) -> Self {
        self.config
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub(crate) fn with_color(self) -> Self {
        self.color.set(true);
        self
    }

    pub(crate) fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    pub(crate) fn printed(&self) -> Vec<String> {
        self.printed.borrow().clone()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    pub(crate) fn config(&self) -> BTreeMap<String, String> {
        self.config.borrow().clone()
    }

    pub(crate) fn lock_calls(&self) -> Vec<bool> {
        self.lock_calls.borrow().clone()
    }

    pub(crate) fn autocomplete(&self) -> Vec<String> {
        self.autocomplete.borrow().clone()
    }
}

impl Host for RecordingHost {
    fn cmd(&self, command: &str) -> String {
        self.commands.borrow_mut().push(command.to_string());
        self.replies
            .borrow()
            .get(command)
            .cloned()
            .unwrap_or_default()
    }

    fn print(&self, line: &str) {
        self.printed.borrow_mut().push(line.to_string());
    }

    fn eprint(&self, line: &str) {
        self.errors.borrow_mut().push(line.to_string());
    }

    fn use_color(&self) -> bool {
        self.color.get()
    }

    fn config_get(&self, key: &str) -> Option<String> {
        self.config.borrow().get(key).cloned()
    }

    fn config_set(&self, key: &str, value: &str, _description: &str) {
        self.config
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn config_lock(&self, locked: bool) {
        self.lock_calls.borrow_mut().push(locked);
    }

    fn autocomplete_add(&self, keyword: &str) {
        self.autocomplete.borrow_mut().push(keyword.to_string());
    }
}
