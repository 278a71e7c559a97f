//! `docmap remove` command

use anyhow::Result;

use crate::cli::RemoveArgs;
use crate::GlobalOptions;
use docmap::ops::{remove_namespace, RemoveOptions};
use docmap::util::Status;

pub fn execute(args: RemoveArgs, opts: &GlobalOptions) -> Result<()> {
    let ctx = opts.context()?;
    let manifest_path = ctx.find_manifest()?;

    let remove_opts = RemoveOptions {
        namespace: args.namespace,
        target: args.target,
    };
    let url = remove_namespace(&manifest_path, &remove_opts)?;

    opts.shell.status(
        Status::Removed,
        format!("{} ({})", remove_opts.namespace, url),
    );

    Ok(())
}
