use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use pathwalk_router::{ConfigKey, RouterConfig};

pub fn execute(file: &Path) -> Result<()> {
    let config = check(file)?;

    println!("{} {}", "✓".green(), "Config is valid".green().bold());
    println!();

    for key in ConfigKey::ALL {
        let value = config
            .get(key.name())?
            .map(|value| value.to_string())
            .unwrap_or_else(|| "(unset)".dimmed().to_string());
        println!("  {:<28} {}", key.name(), value);
    }

    for warning in warnings(&config) {
        println!();
        println!("{} {}", "⚠".yellow(), warning);
    }

    Ok(())
}

fn check(file: &Path) -> Result<RouterConfig> {
    if !file.exists() {
        anyhow::bail!("Config file {:?} does not exist", file);
    }

    RouterConfig::load(file).with_context(|| format!("Invalid config file {:?}", file))
}

/// Settings that load fine but probably do not do what was meant
fn warnings(config: &RouterConfig) -> Vec<&'static str> {
    let mut warnings = Vec::new();

    if config.parameter_left_delimiter.is_some() != config.parameter_right_delimiter.is_some() {
        warnings.push("only one parameter delimiter is set; delimited parameter directories stay disabled");
    }
    if config.search_extensions.is_empty() {
        warnings.push("search_extensions is empty; only exact file names will match");
    }
    if config.index_extensions.is_empty() {
        warnings.push("index_extensions is empty; only a bare index file will be served");
    }

    warnings
}
