// Display transforms for catalog values. Raw prices are per token; the
// displayed unit is per million tokens.

use crate::model::parse_price;

/// Format a token count as "1.0M", "128K", "500".
pub fn format_context_length(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.0}K", (n as f64 / 1_000.0).round())
    } else {
        n.to_string()
    }
}

/// Format a per-token decimal price as a per-million-tokens dollar amount.
pub fn format_price(raw: &str) -> String {
    let Some(price) = parse_price(raw) else {
        return "n/a".to_string();
    };
    if price == 0.0 {
        "Free".to_string()
    } else if price < 0.000_001 {
        format!("${:.4}", price * 1_000_000.0)
    } else {
        format!("${:.2}", price * 1_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_length_millions() {
        assert_eq!(format_context_length(1_000_000), "1.0M");
        assert_eq!(format_context_length(2_097_152), "2.1M");
    }

    #[test]
    fn context_length_thousands() {
        assert_eq!(format_context_length(128_000), "128K");
        assert_eq!(format_context_length(131_072), "131K");
        assert_eq!(format_context_length(1_500), "2K");
        assert_eq!(format_context_length(999_999), "1000K");
    }

    #[test]
    fn context_length_small() {
        assert_eq!(format_context_length(500), "500");
        assert_eq!(format_context_length(0), "0");
    }

    #[test]
    fn price_free() {
        assert_eq!(format_price("0"), "Free");
        assert_eq!(format_price("0.000"), "Free");
    }

    #[test]
    fn price_sub_micro_uses_four_decimals() {
        assert_eq!(format_price("0.0000005"), "$0.5000");
        assert_eq!(format_price("0.00000015"), "$0.1500");
    }

    #[test]
    fn price_regular_uses_two_decimals() {
        assert_eq!(format_price("0.000003"), "$3.00");
        assert_eq!(format_price("0.00003"), "$30.00");
        assert_eq!(format_price("0.000001"), "$1.00");
    }

    #[test]
    fn price_unparseable() {
        assert_eq!(format_price("abc"), "n/a");
    }
}
