//! `docmap link` command

use anyhow::{bail, Result};

use super::print_warnings;
use crate::cli::LinkArgs;
use crate::GlobalOptions;
use docmap::ops::{load_table, MapSource};
use docmap::util::diagnostic::suggestions;

pub fn execute(args: LinkArgs, opts: &GlobalOptions) -> Result<()> {
    let ctx = opts.context()?;
    let loaded = load_table(&ctx, &MapSource::from_args(args.file, args.target))?;
    print_warnings(&loaded.name, &loaded.report, &opts.shell);

    let Some(link) = loaded.table.link(&args.namespace, &args.page) else {
        bail!(
            "namespace `{}` is not mapped in {}\n{}",
            args.namespace,
            loaded.name,
            suggestions::NAMESPACE_NOT_FOUND
        );
    };

    println!("{}", link);
    Ok(())
}
