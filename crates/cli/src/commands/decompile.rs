//! Decompile command implementation.

use std::path::PathBuf;
use std::rc::Rc;

use miette::{Result, miette};
use r2dec_core::{Host, settings};
use r2dec_plugin::{COMMAND_PREFIX, DecompilerPlugin, FatalPolicy, PluginConfig};
use tracing::debug;

use crate::host::CliHost;
use crate::output;
use crate::pipe::{self, Radare2Pipe};

/// Options of a decompile run.
#[derive(Debug, Default)]
pub struct DecompileOptions {
    pub file: PathBuf,
    pub seek: Option<String>,
    pub analyze: bool,
    pub json: bool,
    pub settings: Vec<String>,
    pub root: Option<PathBuf>,
    pub radare2: Option<PathBuf>,
    pub abort_on_fatal: bool,
    pub color: bool,
    pub args: Vec<String>,
}

/// Opens a binary in radare2 and runs `pdd` on it.
pub fn execute(options: DecompileOptions) -> Result<()> {
    let overrides = options
        .settings
        .iter()
        .map(|s| settings::parse_assignment(s))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| miette!("{}", e))?;

    let program = match &options.radare2 {
        Some(path) => path.clone(),
        None => pipe::locate_radare2().map_err(|e| miette!("{}", e))?,
    };

    let pipe = Radare2Pipe::spawn(&program, &options.file).map_err(|e| {
        miette!(
            "Failed to open {} with {}: {}",
            options.file.display(),
            program.display(),
            e
        )
    })?;
    let host = Rc::new(CliHost::new(pipe, options.color));
    host.apply_overrides(&overrides);

    if options.analyze {
        let spinner = output::create_spinner("Analyzing binary");
        host.cmd("aaa");
        output::spinner_success(&spinner, "Analysis complete");
    }

    if let Some(address) = &options.seek {
        debug!(address = %address, "seeking");
        host.cmd(&format!("s {address}"));
    }

    let plugin = DecompilerPlugin::new(plugin_config(&options));
    plugin.init(host.as_ref());

    let command = command_line(options.json, &options.args);
    let handled = plugin
        .dispatch(host.clone(), &command)
        .map_err(|e| miette!("{}", e))?;
    if !handled {
        return Err(miette!("'{}' is not a {} command", command, COMMAND_PREFIX));
    }

    Ok(())
}

fn plugin_config(options: &DecompileOptions) -> PluginConfig {
    let mut config = PluginConfig::new();

    if let Some(root) = &options.root {
        config = config.with_root(root);
    }
    if options.abort_on_fatal {
        config = config.with_fatal_policy(FatalPolicy::Abort);
    }

    config
}

/// Builds the `pdd` command line handed to the plugin.
fn command_line(json: bool, args: &[String]) -> String {
    let mut command = String::from(COMMAND_PREFIX);
    if json {
        command.push('j');
    }
    for arg in args {
        command.push(' ');
        command.push_str(arg);
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use r2dec_plugin::{Action, OutputMode};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    /// Stands in for `radare2 -q0`: a NUL after the banner and after every
    /// command until `q!`.
    #[cfg(unix)]
    const FAKE_RADARE2: &str = "#!/bin/sh\n\
        printf '\\0'\n\
        while IFS= read -r line; do\n\
          [ \"$line\" = 'q!' ] && exit 0\n\
          printf '\\0'\n\
        done\n";

    #[cfg(unix)]
    fn fake_radare2(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("radare2");
        fs::write(&path, FAKE_RADARE2).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    fn scripts(dir: &Path, require_js: &str) -> PathBuf {
        let root = dir.join("r2dec-js");
        fs::create_dir_all(root.join("js")).unwrap();
        fs::write(root.join("js").join("require.js"), require_js).unwrap();
        fs::write(
            root.join("js").join("r2dec-duk.js"),
            "function r2dec_main(args) { r2cmd('pdfj'); }",
        )
        .unwrap();
        root
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_fails_on_interpreter_error() {
        let dir = tempdir().unwrap();
        let radare2 = fake_radare2(dir.path());

        let broken = DecompileOptions {
            file: dir.path().join("a.out"),
            root: Some(scripts(&dir.path().join("broken"), "throw new Error('broken');")),
            radare2: Some(radare2.clone()),
            ..DecompileOptions::default()
        };
        let err = execute(broken).unwrap_err();
        assert!(err.to_string().starts_with("*** FATAL ERROR: "));
        assert!(err.to_string().contains("broken"));

        let working = DecompileOptions {
            file: dir.path().join("a.out"),
            root: Some(scripts(&dir.path().join("working"), "var loaded = true;")),
            radare2: Some(radare2),
            ..DecompileOptions::default()
        };
        execute(working).unwrap();
    }

    #[test]
    fn test_command_line() {
        assert_eq!(command_line(false, &[]), "pdd");
        assert_eq!(command_line(true, &[]), "pddj");
        assert_eq!(
            command_line(true, &["--debug".to_string()]),
            "pddj --debug"
        );
        assert_eq!(command_line(false, &["?".to_string()]), "pdd ?");
    }

    #[test]
    fn test_command_line_classification() {
        let command = command_line(true, &["extra".to_string()]);
        let rest = command.strip_prefix(COMMAND_PREFIX).unwrap();
        match Action::classify(rest) {
            Action::Decompile(request) => {
                assert_eq!(request.mode, OutputMode::Json);
                assert_eq!(request.args, vec!["j", "extra"]);
            }
            Action::Help => panic!("expected a decompile request"),
        }
    }

    #[test]
    fn test_plugin_config() {
        let options = DecompileOptions {
            root: Some(PathBuf::from("/opt/r2dec-js")),
            abort_on_fatal: true,
            ..DecompileOptions::default()
        };
        let config = plugin_config(&options);
        assert_eq!(config.fatal_policy, FatalPolicy::Abort);
        assert_eq!(
            config.root,
            r2dec_plugin::RootSource::Fixed(PathBuf::from("/opt/r2dec-js"))
        );
    }
}
