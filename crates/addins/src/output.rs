//! Command output: serializable views and table rendering.

use addins_engine::{CandidateModule, ExtensionNode, ExtensionPoint};
use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::PathBuf;

/// How a command prints its results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json { OutputFormat::Json } else { OutputFormat::Table }
    }
}

#[derive(Debug, Serialize)]
pub struct PointView {
    pub path: String,
    pub contract: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub extensions: usize,
}

impl From<&ExtensionPoint> for PointView {
    fn from(point: &ExtensionPoint) -> Self {
        Self {
            path: point.path().to_string(),
            contract: point.type_name().to_string(),
            description: point.description().map(str::to_string),
            extensions: point.extensions().len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExtensionView {
    pub type_name: String,
    pub path: Option<String>,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub module: PathBuf,
    pub module_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_runtime: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Vec<String>>,
}

impl From<&ExtensionNode> for ExtensionView {
    fn from(node: &ExtensionNode) -> Self {
        let mut properties: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in node.properties() {
            properties
                .entry(name.to_string())
                .or_default()
                .push(value.to_string());
        }

        Self {
            type_name: node.type_name().to_string(),
            path: node.path().map(str::to_string),
            enabled: node.enabled(),
            description: node.description().map(str::to_string),
            module: node.module_path().to_path_buf(),
            module_version: node.module_version().to_string(),
            host_version: node.host_version().map(|v| v.to_string()),
            target_runtime: node.target_runtime().map(|r| r.to_string()),
            properties,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CandidateView {
    pub name: String,
    pub version: String,
    pub path: PathBuf,
    pub from_wildcard: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_runtime: Option<String>,
}

impl From<&CandidateModule> for CandidateView {
    fn from(candidate: &CandidateModule) -> Self {
        Self {
            name: candidate.name().to_string(),
            version: candidate.version().to_string(),
            path: candidate.path().to_path_buf(),
            from_wildcard: candidate.from_wildcard(),
            target_runtime: candidate
                .header()
                .target_runtime
                .as_ref()
                .map(|r| r.to_string()),
        }
    }
}

pub fn render_points(points: &[PointView], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(points)?);
    }
    if points.is_empty() {
        return Ok("No extension points declared\n".to_string());
    }

    let mut out = String::new();
    writeln!(out, "{}", "Extension points".bold())?;
    for point in points {
        writeln!(
            out,
            "  {}  {}  ({} extension(s))",
            point.path.cyan(),
            point.contract,
            point.extensions
        )?;
        if let Some(description) = &point.description {
            writeln!(out, "      {}", description.dimmed())?;
        }
    }
    Ok(out)
}

pub fn render_extensions(extensions: &[ExtensionView], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(extensions)?);
    }
    if extensions.is_empty() {
        return Ok("No extensions installed\n".to_string());
    }

    let mut out = String::new();
    writeln!(out, "{}", "Extensions".bold())?;
    for ext in extensions {
        let state = if ext.enabled {
            "enabled".green().to_string()
        } else {
            "disabled".yellow().to_string()
        };
        writeln!(
            out,
            "  {}  {}  [{}]",
            ext.type_name,
            ext.path.as_deref().unwrap_or("-").cyan(),
            state
        )?;
        writeln!(
            out,
            "      {} v{}",
            ext.module.display(),
            ext.module_version
        )?;
        for (name, values) in &ext.properties {
            writeln!(out, "      {} = {}", name, values.join(", "))?;
        }
    }
    Ok(out)
}

pub fn render_candidates(candidates: &[CandidateView], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(candidates)?);
    }
    if candidates.is_empty() {
        return Ok("No candidate modules found\n".to_string());
    }

    let mut out = String::new();
    writeln!(out, "{}", "Candidate modules".bold())?;
    for candidate in candidates {
        let provenance = if candidate.from_wildcard { "wildcard" } else { "literal" };
        writeln!(
            out,
            "  {} v{}  {}  ({}{})",
            candidate.name,
            candidate.version,
            candidate.path.display().cyan(),
            provenance,
            candidate
                .target_runtime
                .as_deref()
                .map(|r| format!(", {}", r))
                .unwrap_or_default()
        )?;
    }
    Ok(out)
}
