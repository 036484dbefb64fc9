//! Host functions exposed to scripts.

use std::cell::RefCell;
use std::rc::Rc;

use boa_engine::object::ObjectInitializer;
use boa_engine::property::Attribute;
use boa_engine::{
    Context, JsArgs, JsNativeError, JsResult, JsString, JsValue, NativeFunction, Source,
};
use boa_gc::{Finalize, Trace};
use r2dec_core::Host;
use tracing::{debug, warn};

use crate::error::{PluginError, Result};
use crate::loader::ModuleLoader;

/// Global running a host command: `r2cmd(string) -> string`.
pub const COMMAND_FN: &str = "r2cmd";

/// Global returning a script's text: `___internal_load(file) -> string`.
pub const LOAD_FN: &str = "___internal_load";

/// Global evaluating a module: `___internal_require(name) -> "name.js"`.
pub const REQUIRE_FN: &str = "___internal_require";

const REQUIRE_SUFFIX: &str = ".js";

/// State shared by the bridge functions of one interpreter instance.
pub(crate) struct BridgeState {
    host: RefCell<Option<Rc<dyn Host>>>,
    loader: ModuleLoader,
    requiring: RefCell<Vec<String>>,
    max_depth: usize,
}

impl BridgeState {
    pub(crate) fn new(host: Rc<dyn Host>, loader: ModuleLoader, max_depth: usize) -> Self {
        Self {
            host: RefCell::new(Some(host)),
            loader,
            requiring: RefCell::new(Vec::new()),
            max_depth,
        }
    }

    /// Drops the host handle. Bridge calls fail from here on.
    pub(crate) fn release(&self) {
        self.host.borrow_mut().take();
        self.requiring.borrow_mut().clear();
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.host.borrow().is_some()
    }

    fn host(&self) -> JsResult<Rc<dyn Host>> {
        self.host.borrow().clone().ok_or_else(|| {
            JsNativeError::typ()
                .with_message("host context is no longer available")
                .into()
        })
    }

    fn diagnostic(&self, message: &str) {
        warn!("{message}");
        let host = self.host.borrow().clone();
        if let Some(host) = host {
            host.eprint(message);
        }
    }

    fn enter(&self, module: &str) -> JsResult<RequireGuard<'_>> {
        let mut stack = self.requiring.borrow_mut();

        if stack.iter().any(|m| m == module) {
            return Err(JsNativeError::error()
                .with_message(format!("circular require of '{module}'"))
                .into());
        }

        if stack.len() >= self.max_depth {
            return Err(JsNativeError::error()
                .with_message(format!(
                    "require nesting deeper than {} while loading '{module}'",
                    self.max_depth
                ))
                .into());
        }

        stack.push(module.to_string());
        Ok(RequireGuard { state: self })
    }
}

/// Pops the in-progress module on every exit from a require.
struct RequireGuard<'a> {
    state: &'a BridgeState,
}

impl Drop for RequireGuard<'_> {
    fn drop(&mut self) {
        self.state.requiring.borrow_mut().pop();
    }
}

#[derive(Clone, Trace, Finalize)]
struct Captures {
    #[unsafe_ignore_trace]
    state: Rc<BridgeState>,
}

/// Installs the bridge globals and `console` into `context`.
pub(crate) fn install(context: &mut Context, state: Rc<BridgeState>) -> Result<()> {
    let captures = Captures { state };

    register(
        context,
        COMMAND_FN,
        NativeFunction::from_copy_closure_with_captures(command_execute, captures.clone()),
    )?;
    register(
        context,
        LOAD_FN,
        NativeFunction::from_copy_closure_with_captures(internal_load, captures.clone()),
    )?;
    register(
        context,
        REQUIRE_FN,
        NativeFunction::from_copy_closure_with_captures(internal_require, captures.clone()),
    )?;

    install_console(context, captures)
}

fn register(context: &mut Context, name: &'static str, function: NativeFunction) -> Result<()> {
    context
        .register_global_builtin_callable(JsString::from(name), 1, function)
        .map_err(|e| PluginError::Bridge {
            name,
            reason: e.to_string(),
        })
}

fn install_console(context: &mut Context, captures: Captures) -> Result<()> {
    let print = NativeFunction::from_copy_closure_with_captures(console_print, captures.clone());
    let eprint = NativeFunction::from_copy_closure_with_captures(console_eprint, captures);

    let console = ObjectInitializer::new(context)
        .function(print.clone(), JsString::from("log"), 0)
        .function(print.clone(), JsString::from("info"), 0)
        .function(print, JsString::from("debug"), 0)
        .function(eprint.clone(), JsString::from("warn"), 0)
        .function(eprint, JsString::from("error"), 0)
        .build();

    context
        .register_global_property(JsString::from("console"), console, Attribute::all())
        .map_err(|e| PluginError::Bridge {
            name: "console",
            reason: e.to_string(),
        })
}

fn string_arg(args: &[JsValue], function: &str) -> JsResult<String> {
    args.get_or_undefined(0)
        .as_string()
        .map(|s| s.to_std_string_escaped())
        .ok_or_else(|| {
            JsNativeError::typ()
                .with_message(format!("{function}: expected a string argument"))
                .into()
        })
}

fn not_found(function: &str, file: &str) -> boa_engine::JsError {
    JsNativeError::typ()
        .with_message(format!("{function}: '{file}' not found"))
        .into()
}

fn command_execute(
    _this: &JsValue,
    args: &[JsValue],
    captures: &Captures,
    _context: &mut Context,
) -> JsResult<JsValue> {
    let command = string_arg(args, COMMAND_FN)?;
    let host = captures.state.host()?;

    debug!(command = %command, "forwarding command to host");
    let output = host.cmd(&command);

    Ok(JsValue::from(JsString::from(output)))
}

fn internal_load(
    _this: &JsValue,
    args: &[JsValue],
    captures: &Captures,
    _context: &mut Context,
) -> JsResult<JsValue> {
    let file = string_arg(args, LOAD_FN)?;

    match captures.state.loader.read(&file) {
        Some(text) => Ok(JsValue::from(JsString::from(text))),
        None => {
            captures
                .state
                .diagnostic(&format!("Error: '{file}' not found."));
            Err(not_found(LOAD_FN, &file))
        }
    }
}

fn internal_require(
    _this: &JsValue,
    args: &[JsValue],
    captures: &Captures,
    context: &mut Context,
) -> JsResult<JsValue> {
    let name = string_arg(args, REQUIRE_FN)?;
    let file = format!("{name}{REQUIRE_SUFFIX}");

    let Some(text) = captures.state.loader.read(&file) else {
        captures
            .state
            .diagnostic(&format!("Error: '{file}' not found."));
        return Err(not_found(REQUIRE_FN, &file));
    };

    let _guard = captures.state.enter(&file)?;
    debug!(module = %file, "evaluating required module");
    context.eval(Source::from_bytes(text.as_bytes()))?;

    Ok(JsValue::from(JsString::from(file)))
}

fn console_text(args: &[JsValue], context: &mut Context) -> JsResult<String> {
    let mut parts = Vec::with_capacity(args.len());
    for arg in args {
        parts.push(arg.to_string(context)?.to_std_string_escaped());
    }
    Ok(parts.join(" "))
}

fn console_print(
    _this: &JsValue,
    args: &[JsValue],
    captures: &Captures,
    context: &mut Context,
) -> JsResult<JsValue> {
    let line = console_text(args, context)?;
    captures.state.host()?.print(&line);
    Ok(JsValue::undefined())
}

fn console_eprint(
    _this: &JsValue,
    args: &[JsValue],
    captures: &Captures,
    context: &mut Context,
) -> JsResult<JsValue> {
    let line = console_text(args, context)?;
    captures.state.host()?.eprint(&line);
    Ok(JsValue::undefined())
}
