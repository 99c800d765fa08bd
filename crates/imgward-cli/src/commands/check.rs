//! Check command implementation.

use crate::cli::CheckArgs;
use crate::error::add_scan_context;
use crate::output::Notices;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use imgward_core::classify_file;
use std::process::ExitCode;

pub fn execute(args: &CheckArgs, formatter: &dyn OutputFormatter) -> Result<ExitCode> {
    if !args.file.is_file() {
        bail!(
            "Not a file: '{}'\n\
             HINT: Use `imgward scan <DIR>` to scan a whole directory.",
            args.file.display()
        );
    }

    let config = args.to_config();
    let verdict = add_scan_context(classify_file(&args.file, &config))?;

    let mut notices = Notices::default();
    if args.strict && verdict.is_flagged() {
        notices.fail(format!("{} flagged (--strict)", args.file.display()));
    }

    formatter.format_verdict(&verdict, &notices)?;
    Ok(notices.exit_code())
}
