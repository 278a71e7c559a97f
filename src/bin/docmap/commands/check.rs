//! `docmap check` command

use anyhow::{bail, Result};

use crate::cli::CheckArgs;
use crate::GlobalOptions;
use docmap::ops::{check, CheckOptions, OutputStatus};
use docmap::util::diagnostic::{self, suggestions};
use docmap::util::Status;

pub fn execute(args: CheckArgs, opts: &GlobalOptions) -> Result<()> {
    let ctx = opts.context()?;
    let shell = &opts.shell;
    let is_file = args.file.is_some();

    let result = check(
        &ctx,
        &CheckOptions {
            file: args.file,
            target: args.target,
            emitted: args.emitted,
        },
    )?;

    for checked in &result.maps {
        for issue in checked.report.issues() {
            if shell.is_quiet() && !issue.is_error() {
                continue;
            }
            let diag = issue.to_diagnostic();
            let diag = if is_file {
                diag.with_location(&checked.name)
            } else {
                diag.with_context(format!("in target `{}`", checked.name))
            };
            diagnostic::emit(&diag, shell.use_color());
        }

        if !checked.report.has_errors() {
            shell.status(
                Status::Checked,
                format!("{} ({} namespaces)", checked.name, checked.map.len()),
            );
        }
    }

    for output in &result.outputs {
        let status = match output.status {
            OutputStatus::Stale => Status::Stale,
            OutputStatus::Missing => Status::Missing,
            OutputStatus::UpToDate | OutputStatus::Written => Status::Fresh,
        };
        shell.status(
            status,
            format!("{} ({})", output.target, output.path.display()),
        );
    }

    let errors = result.error_count();
    let stale = result.out_of_date().count();
    if errors > 0 {
        bail!(
            "check failed with {} error{}",
            errors,
            if errors == 1 { "" } else { "s" }
        );
    }
    if stale > 0 {
        bail!(
            "{} generated url map file{} out of date\n{}",
            stale,
            if stale == 1 { " is" } else { "s are" },
            suggestions::STALE_OUTPUT
        );
    }

    let warnings = result.warning_count();
    if warnings > 0 {
        shell.warn(format!(
            "{} warning{}",
            warnings,
            if warnings == 1 { "" } else { "s" }
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::CheckArgs;
    use clap::Parser;

    fn parse_check_args(args: &[&str]) -> CheckArgs {
        #[derive(Parser)]
        struct TestCli {
            #[command(flatten)]
            check: CheckArgs,
        }
        TestCli::parse_from(args).check
    }

    #[test]
    fn test_check_defaults() {
        let args = parse_check_args(&["test"]);
        assert!(args.file.is_none());
        assert!(args.target.is_none());
        assert!(!args.emitted);
    }

    #[test]
    fn test_check_emitted_for_target() {
        let args = parse_check_args(&["test", "--target", "docs", "--emitted"]);
        assert_eq!(args.target, Some("docs".to_string()));
        assert!(args.emitted);
    }
}
