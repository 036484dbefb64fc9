//! Locate command implementation.

use std::path::PathBuf;

use miette::{Result, miette};
use r2dec_plugin::{DEFAULT_BOOTSTRAP, ModuleLoader, ROOT_ENV, RootSource};

use crate::output;

/// Shows where the r2dec-js scripts are looked up.
pub fn execute(root: Option<PathBuf>) -> Result<()> {
    let source = match root {
        Some(path) => RootSource::Fixed(path),
        None => RootSource::Environment,
    };
    let loader = ModuleLoader::new(source);

    let root = loader.root().ok_or_else(|| {
        miette!(
            "Cannot determine the r2dec-js directory: set {} or a home directory",
            ROOT_ENV
        )
    })?;

    output::section_header("r2dec-js");
    output::key_value("root", &root.display().to_string());

    let mut missing = 0;
    for script in DEFAULT_BOOTSTRAP {
        let path = root.join(script);
        if loader.read(script).is_some() {
            output::list_item(&format!("{} found", path.display()));
        } else {
            missing += 1;
            output::list_item(&format!("{} missing", path.display()));
        }
    }

    if missing > 0 {
        output::warning("Bootstrap scripts are missing; install r2dec-js or set R2DEC_HOME");
    } else {
        output::success("All bootstrap scripts present");
    }

    Ok(())
}
