//! `docmap emit` command

use anyhow::{bail, Result};

use crate::cli::EmitArgs;
use crate::GlobalOptions;
use docmap::ops::{emit, EmitOptions, OutputStatus, Project};
use docmap::util::diagnostic::suggestions;
use docmap::util::Status;

pub fn execute(args: EmitArgs, opts: &GlobalOptions) -> Result<()> {
    let ctx = opts.context()?;
    let project = Project::load(&ctx)?;

    let emit_opts = EmitOptions {
        target: args.target,
        check: args.check,
    };
    let outcomes = emit(&project, &emit_opts)?;

    for outcome in &outcomes {
        let status = match outcome.status {
            OutputStatus::Written => Status::Written,
            OutputStatus::UpToDate => Status::Fresh,
            OutputStatus::Stale => Status::Stale,
            OutputStatus::Missing => Status::Missing,
        };
        opts.shell.status(
            status,
            format!("{} ({})", outcome.target, outcome.path.display()),
        );
    }

    let out_of_date = outcomes
        .iter()
        .filter(|o| o.status.is_out_of_date())
        .count();
    if out_of_date > 0 {
        bail!(
            "{} of {} url map files are out of date\n{}",
            out_of_date,
            outcomes.len(),
            suggestions::STALE_OUTPUT
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::EmitArgs;
    use clap::Parser;

    fn parse_emit_args(args: &[&str]) -> EmitArgs {
        #[derive(Parser)]
        struct TestCli {
            #[command(flatten)]
            emit: EmitArgs,
        }
        TestCli::parse_from(args).emit
    }

    #[test]
    fn test_emit_defaults() {
        let args = parse_emit_args(&["test"]);
        assert!(args.target.is_none());
        assert!(!args.check);
    }

    #[test]
    fn test_emit_check_single_target() {
        let args = parse_emit_args(&["test", "--target", "v3", "--check"]);
        assert_eq!(args.target, Some("v3".to_string()));
        assert!(args.check);
    }
}
