//! The `pdd` command plugin.

use std::rc::Rc;

use r2dec_core::{Host, default_settings};
use tracing::{debug, info, warn};

use crate::command::{Action, COMMAND_PREFIX, Request, USAGE, entry_invocation, render_help};
use crate::config::PluginConfig;
use crate::error::Result;
use crate::loader::ModuleLoader;
use crate::manifest::PluginDescriptor;
use crate::runtime::Interpreter;

/// Command plugin that hands `pdd` invocations to the r2dec scripts.
#[derive(Debug, Clone, Default)]
pub struct DecompilerPlugin {
    config: PluginConfig,
}

impl DecompilerPlugin {
    /// Creates a plugin with the given configuration.
    pub fn new(config: PluginConfig) -> Self {
        Self { config }
    }

    /// Returns the plugin descriptor.
    pub fn descriptor(&self) -> PluginDescriptor {
        PluginDescriptor::current()
    }

    /// Registers the plugin's configuration keys and autocomplete keyword.
    ///
    /// Keys that already exist keep their value, so calling this twice is
    /// harmless.
    pub fn init(&self, host: &dyn Host) {
        host.config_lock(false);
        for setting in default_settings() {
            if host.config_get(&setting.name).is_some() {
                debug!(key = %setting.name, "setting already present");
                continue;
            }
            host.config_set(
                &setting.name,
                &setting.default.to_string(),
                &setting.description,
            );
        }
        host.config_lock(true);

        host.autocomplete_add(COMMAND_PREFIX);
        info!("r2dec plugin initialized");
    }

    /// Handles `input` if it starts with the `pdd` prefix.
    ///
    /// Returns `false` when the command belongs to someone else. Failures past
    /// that point are reported through the host and still count as handled.
    pub fn handle_command(&self, host: Rc<dyn Host>, input: &str) -> bool {
        match self.dispatch(Rc::clone(&host), input) {
            Ok(handled) => handled,
            Err(e) => {
                host.eprint(&e.to_string());
                true
            }
        }
    }

    /// Like [`handle_command`](Self::handle_command), but hands failures back
    /// to the caller instead of printing them.
    pub fn dispatch(&self, host: Rc<dyn Host>, input: &str) -> Result<bool> {
        let Some(rest) = input.strip_prefix(COMMAND_PREFIX) else {
            return Ok(false);
        };

        match Action::classify(rest) {
            Action::Help => self.usage(host.as_ref()),
            Action::Decompile(request) => self.decompile(host, &request)?,
        }

        Ok(true)
    }

    /// Runs one decompile request in a fresh interpreter.
    pub fn decompile(&self, host: Rc<dyn Host>, request: &Request) -> Result<()> {
        debug!(mode = ?request.mode, args = ?request.args, "decompile requested");

        let loader = ModuleLoader::new(self.config.root.clone());
        let mut interpreter = Interpreter::create(self.config.fatal_policy);
        let result = self.run(&mut interpreter, host, loader, request);
        interpreter.destroy();

        result
    }

    fn run(
        &self,
        interpreter: &mut Interpreter,
        host: Rc<dyn Host>,
        loader: ModuleLoader,
        request: &Request,
    ) -> Result<()> {
        interpreter.install_bridge(host, loader.clone(), self.config.max_require_depth)?;

        for script in &self.config.bootstrap {
            match loader.read(script) {
                Some(text) => interpreter.evaluate(&text)?,
                None => warn!(script = %script, "bootstrap script not found"),
            }
        }

        let source = entry_invocation(&self.config.entry_point, &request.args)?;
        interpreter.evaluate(&source)
    }

    /// Prints the usage help.
    pub fn usage(&self, host: &dyn Host) {
        for line in render_help(&USAGE, host.use_color()) {
            host.print(&line);
        }
    }
}
