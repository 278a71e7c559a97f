//! `docmap diff` command

use anyhow::{bail, Context, Result};

use crate::cli::DiffArgs;
use crate::GlobalOptions;
use docmap::ops::{diff, MapDiff};

pub fn execute(args: DiffArgs, opts: &GlobalOptions) -> Result<()> {
    let ctx = opts.context()?;
    let result = diff(&ctx, &args.left, &args.right)?;

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("failed to serialize diff")?;
        println!("{}", json);
    } else {
        print_diff(&result, &args.left, &args.right);
    }

    // Order alone does not change any lookup
    if result.same_mapping() {
        if result.reordered {
            opts.shell
                .note("both maps agree; only the order of entries differs");
        }
        return Ok(());
    }

    bail!("`{}` and `{}` map namespaces differently", args.left, args.right);
}

fn print_diff(diff: &MapDiff, left: &str, right: &str) {
    for entry in &diff.only_left {
        println!("- {} {} (only in {})", entry.namespace, entry.base_url, left);
    }
    for entry in &diff.only_right {
        println!("+ {} {} (only in {})", entry.namespace, entry.base_url, right);
    }
    for changed in &diff.changed {
        println!(
            "~ {} {} -> {}",
            changed.namespace, changed.left, changed.right
        );
    }
    if diff.reordered {
        println!("! entries are in a different order");
    }
}
