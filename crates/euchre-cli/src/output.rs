//! Output formatting for the CLI.

use clap::ValueEnum;
use serde::Serialize;

/// Output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message.
pub fn print_success(message: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", message),
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "status": "success", "message": message }));
        }
    }
}

/// Print an error message.
pub fn print_error(message: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("Error: {}", message),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "status": "error", "message": message }));
        }
    }
}

/// Print a table row.
pub fn print_row(label: &str, value: &str) {
    println!("  {:<16} {}", format!("{}:", label), value);
}

/// Print a divider line.
pub fn print_divider(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Print a heading.
pub fn print_heading(text: &str) {
    println!("\n{}", text);
    print_divider(50);
}

/// Format a 0..=1 ratio as a percentage.
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
