//! `docmap list` command

use anyhow::{Context, Result};

use super::print_warnings;
use crate::cli::ListArgs;
use crate::GlobalOptions;
use docmap::ops::{load_table, MapSource, Project};
use docmap::util::GlobalContext;

pub fn execute(args: ListArgs, opts: &GlobalOptions) -> Result<()> {
    let ctx = opts.context()?;

    if args.targets {
        return list_targets(&ctx, args.json);
    }

    let loaded = load_table(&ctx, &MapSource::from_args(args.file, args.target))?;
    print_warnings(&loaded.name, &loaded.report, &opts.shell);

    if args.json {
        let json = serde_json::to_string_pretty(loaded.table.entries())
            .context("failed to serialize url map")?;
        println!("{}", json);
        return Ok(());
    }

    let width = loaded
        .table
        .namespaces()
        .map(|n| n.as_str().len())
        .max()
        .unwrap_or(0);
    for entry in &loaded.table {
        println!(
            "{:<width$}  {}",
            entry.namespace,
            entry.base_url,
            width = width
        );
    }

    Ok(())
}

fn list_targets(ctx: &GlobalContext, json: bool) -> Result<()> {
    let project = Project::load(ctx)?;
    let default = project.manifest.default_target().ok().map(|t| t.name.clone());

    if json {
        let targets: Vec<_> = project
            .manifest
            .targets
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "output": project.display_output(t),
                    "format": t.format().to_string(),
                    "default": Some(&t.name) == default.as_ref(),
                })
            })
            .collect();
        let json = serde_json::to_string_pretty(&targets).context("failed to serialize targets")?;
        println!("{}", json);
        return Ok(());
    }

    for target in &project.manifest.targets {
        let output = project
            .display_output(target)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(no output)".to_string());
        let marker = if Some(&target.name) == default.as_ref() {
            " (default)"
        } else {
            ""
        };
        println!("{}{}  {}", target.name, marker, output);
    }

    Ok(())
}
