//! Progress output for the pipelines

use colored::Colorize;

/// Receives user-facing progress messages from a pipeline
pub trait Reporter {
    /// A new pipeline step is starting
    fn step(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn success(&self, message: &str);
}

/// Plain colored console output
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn step(&self, message: &str) {
        println!("{} {}", "->".blue(), message.bold());
    }

    fn info(&self, message: &str) {
        println!("   {}", message.dimmed());
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {}", "Warning:".yellow(), message);
    }

    fn success(&self, message: &str) {
        println!("{}", message.green().bold());
    }
}
