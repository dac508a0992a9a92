//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde_json::Value;

use crate::auth::{Claims, SessionState, ADMIN_CLAIM};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Format session state as a colored string
pub fn format_state(state: SessionState) -> String {
    match state {
        SessionState::Authenticated => state.to_string().green().to_string(),
        SessionState::Anonymous => state.to_string().yellow().to_string(),
    }
}

/// Render a claim value for display. Timestamp claims get a readable date.
pub fn format_claim(name: &str, value: &Value) -> String {
    match (name, value) {
        ("iat" | "exp" | "nbf", Value::Number(n)) => n
            .as_i64()
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
            .map(|dt| format!("{} ({})", n, dt.format("%Y-%m-%d %H:%M:%S UTC")))
            .unwrap_or_else(|| n.to_string()),
        (_, Value::String(s)) => s.clone(),
        (_, other) => other.to_string(),
    }
}

/// Print a table of claims
pub fn print_claims_table(claims: &Claims) {
    if claims.is_empty() {
        info("Token carries no claims");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Claim").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    for (name, value) in claims.iter() {
        let cell = Cell::new(format_claim(name, value));
        let cell = if name == ADMIN_CLAIM && claims.is_admin() {
            cell.fg(Color::Green)
        } else {
            cell
        };
        table.add_row(vec![Cell::new(name), cell]);
    }

    println!("{table}");
}
