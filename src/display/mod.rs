//! Terminal formatting helpers
//!
//! Shared by the CLI handlers and the statement renderer.

use crate::models::Money;

/// Format a money amount with color hints for terminal display
pub fn format_money_colored(amount: Money) -> String {
    if amount.is_negative() {
        format!("\x1b[31m{}\x1b[0m", amount) // Red for negative
    } else if amount.is_positive() {
        format!("\x1b[32m{}\x1b[0m", amount) // Green for positive
    } else {
        amount.to_string()
    }
}

/// Format a money delta with an explicit sign
pub fn format_signed(amount: Money) -> String {
    if amount.is_negative() {
        format!("-{}", amount.abs())
    } else {
        format!("+{}", amount)
    }
}

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a double separator line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.05), "0.05%");
        assert_eq!(format_percentage(3.846), "3.8%");
        assert_eq!(format_percentage(67.5), "68%");
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(5.0, 10.0, 10), "█████░░░░░");
        assert_eq!(format_bar(0.0, 10.0, 4), "    ");
        assert_eq!(format_bar(20.0, 10.0, 4), "████");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(Money::from_cents(5000)), "+$50.00");
        assert_eq!(format_signed(Money::from_cents(-5000)), "-$50.00");
        assert_eq!(format_signed(Money::zero()), "+$0.00");
    }
}
