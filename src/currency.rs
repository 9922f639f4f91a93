// Display formatting for amounts (id-ID): "1.250.000,00", "Rp 1.250.000,00"
// Presentation only; stored amounts stay integers.

pub const THOUSANDS_SEPARATOR: char = '.';
pub const DECIMAL_SEPARATOR: char = ',';
pub const CURRENCY_PREFIX: &str = "Rp ";

/// Amount with grouped thousands and two decimals
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(c);
    }

    grouped.push(DECIMAL_SEPARATOR);
    grouped.push_str("00");
    grouped
}

/// Amount with the currency prefix, as shown on screen
pub fn format_currency(amount: u64) -> String {
    format!("{}{}", CURRENCY_PREFIX, format_amount(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0,00");
        assert_eq!(format_amount(999), "999,00");
        assert_eq!(format_amount(1_000), "1.000,00");
        assert_eq!(format_amount(750_000), "750.000,00");
        assert_eq!(format_amount(1_250_000), "1.250.000,00");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1_550_000), "Rp 1.550.000,00");
    }
}
