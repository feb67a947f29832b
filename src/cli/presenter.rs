//! CLI presenter for output formatting

use colored::*;

use crate::domain::geometry::WindowGeometry;
use crate::domain::value::StoreValue;

/// Presenter for CLI output formatting
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for list and status)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Render a setting value for display
    pub fn format_value(&self, value: &StoreValue) -> String {
        match value {
            StoreValue::String(s) if s.is_empty() => "(not set)".to_string(),
            StoreValue::String(s) => s.clone(),
            StoreValue::Bool(b) => b.to_string(),
            StoreValue::Int32Pair(w, h) => self.format_size(&WindowGeometry::from_size(*w, *h)),
        }
    }

    /// Render a window size as `WxH`
    pub fn format_size(&self, geometry: &WindowGeometry) -> String {
        format!("{}x{}", geometry.width, geometry.height)
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
