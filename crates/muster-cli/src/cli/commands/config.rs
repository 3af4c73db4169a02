//! Config command handlers.

use anyhow::Result;
use muster_core::config::{Config, paths};

/// Prints the config file path.
pub fn path() -> Result<()> {
    println!("{}", paths::config_path().display());
    Ok(())
}

/// Writes the default config template if no config exists yet.
pub fn init() -> Result<()> {
    let path = paths::config_path();
    if Config::init()? {
        println!("✓ Created {}", path.display());
    } else {
        println!("Config already exists at {}", path.display());
    }
    Ok(())
}
