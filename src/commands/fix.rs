use anyhow::Result;
use tracing::info;

use crate::cli::{CapArgs, FixArgs};
use crate::fixer::{FixOptions, fix_file};
use crate::policy::ShowtimeCapPolicy;
use crate::report::render_fix;

pub fn run(args: FixArgs) -> Result<()> {
    let options = fix_options(&args.caps);
    info!(
        path = %args.data.data_path.display(),
        backup = options.backup,
        "auto-fixing cinema data"
    );

    let outcome = fix_file(&args.data.data_path, &options)?;
    render_fix(&outcome);

    Ok(())
}

pub fn fix_options(args: &CapArgs) -> FixOptions {
    FixOptions {
        caps: ShowtimeCapPolicy::from(args),
        backup: !args.no_backup,
    }
}
