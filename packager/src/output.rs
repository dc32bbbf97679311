//! Progress and summary output for the packager CLI.
//!
//! Progress lines are written to an injected writer (stderr in production)
//! so tests can capture them. Structured diagnostics go through `log`
//! instead.

use crate::driver::RunReport;
use crate::registry::Registry;
use std::fmt::Display;
use std::io::Write;

/// Write a single line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// User-facing progress reporter.
///
/// Headings and informational lines are suppressed in quiet mode; warnings
/// are always written.
pub struct Progress<'a> {
    sink: &'a mut dyn Write,
    quiet: bool,
}

impl<'a> Progress<'a> {
    /// Create a reporter writing to `sink`.
    pub fn new(sink: &'a mut dyn Write, quiet: bool) -> Self {
        Self { sink, quiet }
    }

    /// Write a stage heading such as `--- BUILDING ---`.
    pub fn heading(&mut self, title: impl Display) {
        if !self.quiet {
            write_stderr_line(self.sink, format!("--- {title} ---"));
        }
    }

    /// Write an informational line.
    pub fn line(&mut self, message: impl Display) {
        if !self.quiet {
            write_stderr_line(self.sink, message);
        }
    }

    /// Write a warning, even in quiet mode.
    pub fn warn(&mut self, message: impl Display) {
        write_stderr_line(self.sink, message);
    }
}

/// Format the list of registered configurations for `--list`.
#[must_use]
pub fn configuration_list_text(registry: &Registry) -> String {
    let mut text = String::from("Available configurations:");
    for configuration in registry.iter() {
        let target = configuration.target();
        text.push_str(&format!(
            "\n  {:<10} {:<16} {}",
            configuration.name(),
            target.platform(),
            target.triple()
        ));
    }
    text
}

/// Format the closing summary of a run.
#[must_use]
pub fn summary_message(report: &RunReport) -> String {
    let count = report.packaged.len();
    let plural = if count == 1 { "archive" } else { "archives" };
    let mut text = format!("Packaged {count} {plural}");
    for output in &report.packaged {
        text.push_str(&format!("\n  {}", output.archive_path));
    }
    if !report.skipped.is_empty() {
        text.push_str(&format!("\nSkipped: {}", report.skipped.join(", ")));
    }
    text
}
