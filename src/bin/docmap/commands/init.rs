//! `docmap init` command

use anyhow::Result;

use crate::cli::InitArgs;
use crate::GlobalOptions;
use docmap::ops::{init_project, InitOptions};
use docmap::util::Status;

pub fn execute(args: InitArgs, opts: &GlobalOptions) -> Result<()> {
    let ctx = opts.context()?;
    let dir = match args.path {
        Some(path) => ctx.cwd().join(path),
        None => ctx.cwd().to_path_buf(),
    };

    let manifest_path = init_project(
        &dir,
        &InitOptions {
            name: args.name,
            from: args.from,
            target: args.target,
        },
    )?;

    opts.shell
        .status(Status::Created, manifest_path.display());
    Ok(())
}
