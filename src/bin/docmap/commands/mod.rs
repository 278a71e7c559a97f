//! Command implementations

pub mod add;
pub mod check;
pub mod completions;
pub mod diff;
pub mod emit;
pub mod init;
pub mod link;
pub mod list;
pub mod lookup;
pub mod remove;

use docmap::core::ValidationReport;
use docmap::util::diagnostic;
use docmap::util::Shell;

/// Print the warnings of a table that was built anyway.
pub fn print_warnings(name: &str, report: &ValidationReport, shell: &Shell) {
    if shell.is_quiet() {
        return;
    }
    for issue in report.warnings() {
        let diag = issue.to_diagnostic().with_context(format!("in {}", name));
        diagnostic::emit(&diag, shell.use_color());
    }
}
