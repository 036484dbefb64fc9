//! JavaScript interpreter lifecycle.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use boa_engine::{Context, Source};
use r2dec_core::Host;
use tracing::{debug, error};

use crate::error::{PluginError, Result};
use crate::host::{self, BridgeState};
use crate::loader::ModuleLoader;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

#[cfg(test)]
thread_local! {
    static CREATED_ON_THREAD: std::cell::Cell<u64> = const { std::cell::Cell::new(0) };
}

/// Interpreters created so far on the calling thread.
#[cfg(test)]
pub(crate) fn created_on_thread() -> u64 {
    CREATED_ON_THREAD.with(|count| count.get())
}

/// What to do when the interpreter reports an unrecoverable error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FatalPolicy {
    /// Print the diagnostic to stderr and abort the whole process.
    Abort,

    /// Return [`PluginError::Fatal`] to the caller.
    #[default]
    Report,
}

/// One embedded interpreter, alive for a single invocation.
///
/// Dropping the interpreter tears it down; [`Interpreter::destroy`] only makes
/// that explicit. Either way the host handle captured by the bridge is
/// released exactly once.
pub struct Interpreter {
    id: u64,
    context: Context,
    fatal: FatalPolicy,
    bridge: Option<Rc<BridgeState>>,
}

impl Interpreter {
    /// Creates a fresh interpreter instance.
    pub fn create(fatal: FatalPolicy) -> Self {
        let id = NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed);
        debug!(instance = id, ?fatal, "interpreter created");
        #[cfg(test)]
        CREATED_ON_THREAD.with(|count| count.set(count.get() + 1));

        Self {
            id,
            context: Context::default(),
            fatal,
            bridge: None,
        }
    }

    /// Process-unique id of this instance.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether bridge calls currently reach a host.
    pub fn is_bridged(&self) -> bool {
        self.bridge.as_ref().is_some_and(|b| b.is_attached())
    }

    /// Installs `r2cmd`, `___internal_load`, `___internal_require` and
    /// `console`, all bound to `host`.
    pub fn install_bridge(
        &mut self,
        host: Rc<dyn Host>,
        loader: ModuleLoader,
        max_require_depth: usize,
    ) -> Result<()> {
        if let Some(previous) = self.bridge.take() {
            previous.release();
        }

        let state = Rc::new(BridgeState::new(host, loader, max_require_depth));
        match host::install(&mut self.context, Rc::clone(&state)) {
            Ok(()) => {
                debug!(instance = self.id, "bridge installed");
                self.bridge = Some(state);
                Ok(())
            }
            Err(e) => {
                state.release();
                Err(self.fatal(Some(&e.to_string())))
            }
        }
    }

    /// Runs `source` as a top-level script, discarding its value.
    ///
    /// Exceptions the script does not catch are fatal.
    pub fn evaluate(&mut self, source: &str) -> Result<()> {
        match self.context.eval(Source::from_bytes(source.as_bytes())) {
            Ok(_) => Ok(()),
            Err(e) => {
                let report = e.to_string();
                debug!(instance = self.id, "uncaught exception:\n{report}");
                Err(self.fatal(report.lines().next()))
            }
        }
    }

    /// Tears the instance down.
    pub fn destroy(self) {}

    fn fatal(&self, message: Option<&str>) -> PluginError {
        let message = message.unwrap_or("no message");
        error!(instance = self.id, "fatal interpreter error: {message}");

        match self.fatal {
            FatalPolicy::Abort => {
                eprintln!("*** FATAL ERROR: {message}");
                std::process::abort()
            }
            FatalPolicy::Report => PluginError::Fatal(message.to_string()),
        }
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        if let Some(bridge) = self.bridge.take() {
            bridge.release();
        }
        debug!(instance = self.id, "interpreter destroyed");
    }
}
