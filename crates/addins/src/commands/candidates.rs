//! `addins candidates`: list tracked candidate modules

use super::finish;
use crate::context::GlobalOptions;
use crate::output::{CandidateView, OutputFormat, render_candidates};
use anyhow::Result;
use starbase::AppResult;

/// Run the candidates command
pub fn run_candidates(options: &GlobalOptions) -> AppResult {
    finish(candidates_report(options))
}

pub fn candidates_report(options: &GlobalOptions) -> Result<String> {
    let manager = options.manager()?;
    let candidates: Vec<CandidateView> = manager
        .candidates()
        .iter()
        .map(CandidateView::from)
        .collect();
    render_candidates(&candidates, OutputFormat::from_flag(options.json))
}
