//! `addins points`: list declared extension points

use super::finish;
use crate::context::GlobalOptions;
use crate::output::{OutputFormat, PointView, render_points};
use anyhow::Result;
use starbase::AppResult;

/// Run the points command
pub fn run_points(options: &GlobalOptions) -> AppResult {
    finish(points_report(options))
}

pub fn points_report(options: &GlobalOptions) -> Result<String> {
    let mut manager = options.manager()?;
    manager.load_extensions()?;

    let points: Vec<PointView> = manager
        .extension_points()
        .iter()
        .map(PointView::from)
        .collect();
    render_points(&points, OutputFormat::from_flag(options.json))
}
