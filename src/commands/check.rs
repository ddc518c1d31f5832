//! Validate configuration without starting anything.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::paths;
use crate::ui;

/// Print the effective configuration summary, warnings and errors.
pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    match config.validate() {
        Ok(validation) => {
            ui::print_warnings(&validation.warnings);
            let data_dir = paths::get_data_dir(config.storage.data_dir.as_deref())?;
            println!("Configuration OK");
            println!("  listen:   {}:{}", config.server.host, config.server.port);
            println!("  data dir: {}", data_dir.display());
            println!("  backend:  {:?}", config.storage.backend);
            println!(
                "  model:    {} (timeout {}s)",
                config.generation.model, config.generation.timeout_secs
            );
            println!(
                "  metrics:  {}",
                if config.metrics.enabled { "enabled" } else { "disabled" }
            );
            Ok(())
        },
        Err(e) => {
            let message = e.to_string();
            let details: Vec<String> = message.lines().skip(1).map(str::to_string).collect();
            ui::print_error_box("Configuration check failed", &details);
            anyhow::bail!("invalid configuration")
        },
    }
}
