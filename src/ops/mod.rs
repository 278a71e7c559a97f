//! High-level operations.
//!
//! This module contains the implementation of docmap commands.

pub mod check;
pub mod diff;
pub mod docmap_add;
pub mod docmap_emit;
pub mod docmap_new;
pub mod project;

pub use check::{check, CheckOptions, CheckResult, CheckedMap};
pub use diff::{diff, diff_tables, ChangedEntry, MapDiff};
pub use docmap_add::{add_namespace, remove_namespace, AddOptions, RemoveOptions};
pub use docmap_emit::{emit, render_target, EmitOptions, EmitOutcome, OutputStatus};
pub use docmap_new::{init_project, InitOptions};
pub use project::{load_table, LoadedTable, MapSource, Project};
