//! Configuration module
//!
//! Handles loading and parsing of `addins.toml`.

pub mod model;

use anyhow::Context;
use std::path::{Path, PathBuf};

pub use self::model::*;

/// File name looked up by [`AddinsConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "addins.toml";

impl AddinsConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config =
            Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    /// Rebase relative module and directory paths onto `base`, the directory
    /// of the file that declared them.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        let discovery = &mut self.discovery;
        for path in discovery.points.iter_mut().chain(discovery.directories.iter_mut()) {
            *path = resolve_path(path, base);
        }
        if let Some(module) = self.host.module.as_mut() {
            *module = resolve_path(module, base);
        }
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> crate::Result<Self> {
        let config: AddinsConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Walk up from `start_dir` looking for `addins.toml`
    pub fn discover(start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir.to_path_buf();

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        None
    }
}

/// Resolve `path` relative to `base` unless it is already absolute
fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_toml() -> anyhow::Result<()> {
        let toml_content = r#"
[host]
runtime = "core@8.0"
version = "3.17.0"

[discovery]
points = ["/opt/app/app.dll"]
directories = ["/opt/app/addins"]

[extensions]
disabled = ["Vendor.Reporting.XmlReporter"]
"#;
        let dir = tempfile::tempdir()?;
        let file_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&file_path, toml_content)?;

        let config = AddinsConfig::load(&file_path)?;
        assert_eq!(config.host.runtime.as_deref(), Some("core@8.0"));
        assert_eq!(config.host.version.as_deref(), Some("3.17.0"));
        assert_eq!(config.discovery.points, vec![PathBuf::from("/opt/app/app.dll")]);
        assert_eq!(
            config.extensions.disabled,
            vec!["Vendor.Reporting.XmlReporter".to_string()]
        );
        // Unspecified discovery lists fall back to their defaults
        assert_eq!(config.discovery.library_patterns, default_library_patterns());
        assert_eq!(config.discovery.host_patterns, default_host_patterns());

        Ok(())
    }

    #[test]
    fn test_empty_config_uses_defaults() -> anyhow::Result<()> {
        let config = AddinsConfig::parse("")?;
        assert_eq!(config, AddinsConfig::default());
        assert!(config.host.runtime.is_none());
        Ok(())
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(AddinsConfig::parse("[host\nruntime = ").is_err());
    }

    #[test]
    fn test_relative_paths_resolve_against_config_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let absolute = dir.path().join("shared").join("addins");
        let toml_content = format!(
            "[host]\nmodule = \"bin/Host.dll\"\n\n[discovery]\npoints = [\"bin/Host.dll\"]\ndirectories = [\"addins\", {:?}]\n",
            absolute.display().to_string()
        );
        let file_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&file_path, toml_content)?;

        let config = AddinsConfig::load(&file_path)?;
        assert_eq!(config.host.module, Some(dir.path().join("bin/Host.dll")));
        assert_eq!(config.discovery.points, vec![dir.path().join("bin/Host.dll")]);
        assert_eq!(
            config.discovery.directories,
            vec![dir.path().join("addins"), absolute]
        );
        Ok(())
    }

    #[test]
    fn test_parse_leaves_relative_paths_alone() -> anyhow::Result<()> {
        let config = AddinsConfig::parse("[discovery]\ndirectories = [\"addins\"]\n")?;
        assert_eq!(config.discovery.directories, vec![PathBuf::from("addins")]);
        Ok(())
    }

    #[test]
    fn test_discover_walks_up() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested)?;
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "")?;

        let found = AddinsConfig::discover(&nested);
        assert_eq!(found, Some(dir.path().join(CONFIG_FILE_NAME)));
        Ok(())
    }
}
