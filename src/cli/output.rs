//! Console output for commit-gate
//!
//! Styled status lines in the spirit of lint-staged. Errors always go to
//! stderr, even in quiet mode.

use crate::pipeline::Reporter;
use console::style;

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// Print a step in a process
    pub fn step(&self, step: &str) {
        if !self.quiet {
            println!("{} {}", style("❯").cyan(), step);
        }
    }

    /// Print a table row
    pub fn table_row(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<20} {}", style(key).dim(), value);
        }
    }

    /// Print tool output below the step it belongs to
    pub fn indent_block(&self, text: &str) {
        for line in text.lines() {
            eprintln!("    {line}");
        }
    }

    pub fn status_indicator(&self, status: &str, message: &str, is_success: bool) {
        if !self.quiet {
            let (icon, color) = if is_success {
                ("✓", style(status).green())
            } else {
                ("✗", style(status).red())
            };
            println!("{} {} {}", style(icon).bold(), color.bold(), message);
        }
    }
}

impl Reporter for Output {
    fn step_starting(&self, title: &str) {
        self.step(&format!("{title}..."));
    }

    fn step_succeeded(&self, detail: &str) {
        if self.verbose {
            self.success(detail);
        } else {
            self.success("ok");
        }
    }

    fn step_failed(&self, detail: &str) {
        self.error("failed");
        self.indent_block(detail);
    }

    fn step_warned(&self, detail: &str) {
        self.warning("failed, continuing");
        if !self.quiet {
            self.indent_block(detail);
        }
    }

    fn step_skipped(&self, title: &str, reason: &str) {
        self.verbose(&format!("{title} skipped ({reason})"));
    }

    fn notice(&self, message: &str) {
        if !self.quiet {
            println!("{}", style(message).bold());
        }
    }
}
