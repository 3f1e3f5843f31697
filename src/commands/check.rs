use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::cli::CheckArgs;
use crate::commands::fix::fix_options;
use crate::fixer::{FixOptions, fix_file};
use crate::model::{FixOutcome, ValidationReport};
use crate::policy::ValidationPolicy;
use crate::report::{render_fix, render_validation};
use crate::store::StoreError;
use crate::util::write_json_pretty;
use crate::validator::validate_file;

/// Result of one validate, fix, re-validate cycle.
#[derive(Debug)]
pub struct CheckOutcome {
    pub initial: ValidationReport,
    pub fix: Option<FixOutcome>,
    pub final_report: Option<ValidationReport>,
}

impl CheckOutcome {
    pub fn latest_report(&self) -> &ValidationReport {
        self.final_report.as_ref().unwrap_or(&self.initial)
    }
}

pub fn run(args: CheckArgs) -> Result<()> {
    let policy = ValidationPolicy::from(&args.thresholds);
    let options = fix_options(&args.caps);
    info!(path = %args.data.data_path.display(), "validating cinema data");

    let outcome = check(&args.data.data_path, &policy, &options)?;

    if let Some(report_path) = args.report_path {
        write_json_pretty(&report_path, outcome.latest_report())?;
        info!(path = %report_path.display(), "wrote validation report");
    }

    Ok(())
}

/// Validates `path`; when invalid, fixes it in place and validates again.
pub fn check(
    path: &Path,
    policy: &ValidationPolicy,
    options: &FixOptions,
) -> Result<CheckOutcome, StoreError> {
    let initial = validate_file(path, policy)?;
    render_validation("initial", &initial);

    if initial.valid {
        info!("data looks good");
        return Ok(CheckOutcome {
            initial,
            fix: None,
            final_report: None,
        });
    }

    info!("auto-fixing data");
    let fix = fix_file(path, options)?;
    render_fix(&fix);

    info!("re-validating after fixes");
    let final_report = validate_file(path, policy)?;
    render_validation("final", &final_report);

    Ok(CheckOutcome {
        initial,
        fix: Some(fix),
        final_report: Some(final_report),
    })
}
