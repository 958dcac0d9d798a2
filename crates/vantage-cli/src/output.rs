//! Terminal output helpers.

use colored::Colorize;
use serde::Serialize;

/// Pretty-print any serializable value as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("{}: {e}", "failed to serialize output".red()),
    }
}

pub fn print_kv(key: &str, value: &str) {
    println!("  {:<22} {}", key.bold(), value);
}

/// Render an optional value, dimmed when absent.
pub fn opt<T: ToString>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".dimmed().to_string(),
    }
}

pub fn header(title: &str) {
    println!("{}", title.bold().underline());
}
