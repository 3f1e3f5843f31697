use anyhow::Result;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::policy::ValidationPolicy;
use crate::report::render_validation;
use crate::util::write_json_pretty;
use crate::validator::validate_file;

pub fn run(args: ValidateArgs) -> Result<()> {
    let policy = ValidationPolicy::from(&args.thresholds);
    info!(path = %args.data.data_path.display(), "validating cinema data");

    let report = validate_file(&args.data.data_path, &policy)?;
    render_validation("initial", &report);

    if let Some(report_path) = args.report_path {
        write_json_pretty(&report_path, &report)?;
        info!(path = %report_path.display(), "wrote validation report");
    }

    Ok(())
}
