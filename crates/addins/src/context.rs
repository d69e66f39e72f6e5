//! Global options and the manager they describe.

use addins_common::AddinsConfig;
use addins_common::config::CONFIG_FILE_NAME;
use addins_engine::ExtensionManager;
use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options shared by every command
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Configuration file (defaults to the nearest addins.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Extension directory to scan, in addition to the configured ones
    #[arg(short, long = "dir", global = true)]
    pub dirs: Vec<PathBuf>,

    /// Host module used for host-relative discovery
    #[arg(long, global = true)]
    pub host: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// Log discovery details
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalOptions {
    /// Configuration file to use: the explicit one, else the nearest
    /// `addins.toml` above `cwd`, else the user-level one if present.
    pub fn config_path(&self, cwd: &Path) -> Option<PathBuf> {
        if let Some(path) = &self.config {
            return Some(path.clone());
        }
        AddinsConfig::discover(cwd).or_else(|| {
            dirs::config_dir()
                .map(|dir| dir.join("addins").join(CONFIG_FILE_NAME))
                .filter(|path| path.is_file())
        })
    }

    /// Load the configuration and apply command-line overrides.
    pub fn load_config(&self) -> Result<AddinsConfig> {
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        let mut config = match self.config_path(&cwd) {
            Some(path) => {
                debug!("Using configuration {}", path.display());
                AddinsConfig::load(&path)?
            }
            None => AddinsConfig::default(),
        };

        config.discovery.directories.extend(self.dirs.iter().cloned());
        if let Some(host) = &self.host {
            config.host.module = Some(host.clone());
        }
        Ok(config)
    }

    /// Build a manager and run the configured discovery.
    pub fn manager(&self) -> Result<ExtensionManager> {
        let config = self.load_config()?;
        ExtensionManager::from_config(&config).context("Extension discovery failed")
    }
}
