//! @acp:module "Init Command"
//! @acp:summary "Write a default bridgegen.config.json"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{bail, Result};
use console::style;

use crate::config::Config;

/// Options for the init command
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Where to write the config
    pub path: PathBuf,
    /// Force overwrite existing config
    pub force: bool,
}

/// Execute the init command
pub fn execute_init(options: InitOptions) -> Result<()> {
    if options.path.exists() && !options.force {
        eprintln!(
            "{} Config file already exists. Use --force to overwrite.",
            style("✗").red()
        );
        bail!("{} already exists", options.path.display());
    }

    let config = Config::default();
    config.save(&options.path)?;
    println!(
        "{} Created {}",
        style("✓").green(),
        options.path.display()
    );

    println!("\n{}", style("Next steps:").bold());
    println!(
        "  1. Run {} to build a dataset",
        style("bridgegen generate 10 --seed 42").cyan()
    );
    println!(
        "  2. Run {} to summarise it",
        style("bridgegen stats").cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridgegen.config.json");
        execute_init(InitOptions { path: path.clone(), force: false }).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridgegen.config.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(execute_init(InitOptions { path: path.clone(), force: false }).is_err());
        execute_init(InitOptions { path, force: true }).unwrap();
    }
}
