//! Formatting helpers shared by the display modules

use crate::models::Money;

/// Format an amount with a currency symbol, rounded to the cent
pub fn format_amount(amount: f64, symbol: &str) -> String {
    Money::from_amount(amount).format_with_symbol(symbol)
}

/// Format a signed balance with color hints for terminal display
pub fn format_balance_colored(amount: f64, symbol: &str) -> String {
    let money = Money::from_amount(amount);
    let text = money.format_with_symbol(symbol);
    if money.is_negative() {
        format!("\x1b[31m{}\x1b[0m", text) // Red for negative
    } else if money.is_positive() {
        format!("\x1b[32m{}\x1b[0m", text) // Green for positive
    } else {
        text
    }
}

/// Format a share fraction (0-1) as a percentage
pub fn format_fraction(fraction: f64) -> String {
    let pct = fraction * 100.0;
    if (pct - pct.round()).abs() < 0.005 {
        format!("{:.0}%", pct)
    } else {
        format!("{:.1}%", pct)
    }
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
