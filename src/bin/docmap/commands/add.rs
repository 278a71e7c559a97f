//! `docmap add` command

use anyhow::Result;

use crate::cli::AddArgs;
use crate::GlobalOptions;
use docmap::ops::{add_namespace, AddOptions};
use docmap::util::Status;

pub fn execute(args: AddArgs, opts: &GlobalOptions) -> Result<()> {
    let ctx = opts.context()?;
    let manifest_path = ctx.find_manifest()?;

    let add_opts = AddOptions {
        namespace: args.namespace,
        url: args.url,
        target: args.target,
    };
    add_namespace(&manifest_path, &add_opts)?;

    let scope = match add_opts.target {
        Some(ref target) => format!(" (target `{}`)", target),
        None => String::new(),
    };
    opts.shell.status(
        Status::Added,
        format!("{} -> {}{}", add_opts.namespace, add_opts.url, scope),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::AddArgs;
    use clap::Parser;

    /// Helper to parse AddArgs from command-line strings.
    fn parse_add_args(args: &[&str]) -> AddArgs {
        #[derive(Parser)]
        struct TestCli {
            #[command(flatten)]
            add: AddArgs,
        }
        TestCli::parse_from(args).add
    }

    #[test]
    fn test_add_shared_namespace() {
        let args = parse_add_args(&["test", "Gtk", "https://docs.gtk.org/gtk4/"]);
        assert_eq!(args.namespace, "Gtk");
        assert_eq!(args.url, "https://docs.gtk.org/gtk4/");
        assert!(args.target.is_none());
    }

    #[test]
    fn test_add_target_namespace() {
        let args = parse_add_args(&[
            "test",
            "Gtk",
            "https://docs.gtk.org/gtk4/",
            "--target",
            "v3",
        ]);
        assert_eq!(args.target, Some("v3".to_string()));
    }
}
