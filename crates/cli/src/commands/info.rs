//! Info command implementation.

use miette::{Result, miette};
use r2dec_plugin::DecompilerPlugin;

/// Prints the plugin descriptor as JSON.
pub fn execute() -> Result<()> {
    let json = DecompilerPlugin::default()
        .descriptor()
        .to_json()
        .map_err(|e| miette!("Failed to encode descriptor: {}", e))?;

    println!("{json}");
    Ok(())
}
