use tracing::{info, warn};

use crate::model::{FixOutcome, ValidationReport};

pub fn render_validation(stage: &str, report: &ValidationReport) {
    info!(
        stage,
        valid = report.valid,
        issues = report.summary.total_issues,
        warnings = report.summary.total_warnings,
        total_films = report.summary.total_films,
        timestamp = %report.timestamp,
        "validation results"
    );

    for issue in &report.issues {
        warn!(stage, "{issue}");
    }
    for warning in &report.warnings {
        info!(stage, "{warning}");
    }
}

pub fn render_fix(outcome: &FixOutcome) {
    info!(
        path = %outcome.data_path,
        backup = %outcome.backup_path.as_deref().unwrap_or("disabled"),
        source_sha256 = %outcome.source_sha256,
        fixes = outcome.fixes.len(),
        "applied fixes"
    );

    for fix in &outcome.fixes {
        info!("{fix}");
    }
}
