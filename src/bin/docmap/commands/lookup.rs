//! `docmap lookup` command

use anyhow::{bail, Result};

use super::print_warnings;
use crate::cli::LookupArgs;
use crate::GlobalOptions;
use docmap::ops::{load_table, MapSource};
use docmap::util::diagnostic::suggestions;

pub fn execute(args: LookupArgs, opts: &GlobalOptions) -> Result<()> {
    let ctx = opts.context()?;
    let loaded = load_table(&ctx, &MapSource::from_args(args.file, args.target))?;
    print_warnings(&loaded.name, &loaded.report, &opts.shell);

    match loaded.table.lookup(&args.namespace) {
        Some(url) => {
            println!("{}", url);
            Ok(())
        }
        None => bail!(
            "namespace `{}` is not mapped in {}\n{}",
            args.namespace,
            loaded.name,
            suggestions::NAMESPACE_NOT_FOUND
        ),
    }
}
