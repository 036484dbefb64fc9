//! Settings command implementation.

use miette::{Result, miette};
use r2dec_core::default_settings;

use crate::output;

/// Lists the configuration keys the plugin registers.
pub fn execute(json: bool) -> Result<()> {
    let settings = default_settings();

    if json {
        let text = serde_json::to_string_pretty(&settings)
            .map_err(|e| miette!("Failed to encode settings: {}", e))?;
        println!("{text}");
        return Ok(());
    }

    output::section_header("Settings");
    for setting in &settings {
        output::key_value(
            &setting.name,
            &format!("{} ({})", setting.default, setting.description),
        );
    }

    Ok(())
}
