//! `addins list`: list installed extensions

use super::finish;
use crate::context::GlobalOptions;
use crate::output::{ExtensionView, OutputFormat, render_extensions};
use anyhow::{Result, bail};
use starbase::AppResult;

/// Run the list command
pub fn run_list(options: &GlobalOptions, path: Option<String>, all: bool) -> AppResult {
    finish(list_report(options, path.as_deref(), all))
}

/// Installed extensions, optionally restricted to one extension point.
/// Disabled extensions are shown only with `all`.
pub fn list_report(options: &GlobalOptions, path: Option<&str>, all: bool) -> Result<String> {
    let mut manager = options.manager()?;

    let views: Vec<ExtensionView> = match path {
        Some(path) => {
            if manager.extension_point(path).is_none() {
                bail!("No extension point has path {}", path);
            }
            manager
                .extension_nodes(path)?
                .iter()
                .filter(|node| all || node.enabled())
                .map(ExtensionView::from)
                .collect()
        }
        None => manager
            .extensions()?
            .filter(|node| all || node.enabled())
            .map(ExtensionView::from)
            .collect(),
    };

    render_extensions(&views, OutputFormat::from_flag(options.json))
}
