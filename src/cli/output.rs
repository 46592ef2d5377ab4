//! Colored output helpers for the CLI.

use crate::types::RetrievedResult;
use owo_colors::OwoColorize;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the startup banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n  {} {}\n",
                "Docket".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!("\n  Docket v{}\n", env!("CARGO_PKG_VERSION"));
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print one retrieved result in a readable form, text truncated for
    /// the terminal.
    pub fn search_result(&self, rank: usize, result: &RetrievedResult) {
        let preview: String = result.text.chars().take(200).collect();
        let ellipsis = if result.text.chars().count() > 200 {
            "..."
        } else {
            ""
        };

        if self.colored {
            println!(
                "\n  {} {}",
                format!("[{}]", rank).bright_cyan().bold(),
                format!("(Score: {:.3})", result.score).dimmed()
            );
            println!("  {} {}", "Source:".dimmed(), result.source());
            println!("  {}{}", preview, ellipsis);
        } else {
            println!("\n  [{}] (Score: {:.3})", rank, result.score);
            println!("  Source: {}", result.source());
            println!("  {}{}", preview, ellipsis);
        }
    }
}
