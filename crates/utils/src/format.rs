//! Display formatting helpers shared by the API layer.

/// Round a dollar amount to whole cents.
///
/// Half-cent boundaries like 32.925 sit just below .5 in binary floating
/// point; the epsilon nudge keeps them rounding up.
pub fn round_cents(amount: f64) -> f64 {
    let cents = amount * 100.0;
    (cents + cents.signum() * 1e-9).round() / 100.0
}

/// Format a dollar amount as `$1,234.56`. Negative amounts render as
/// `-$1,234.56`.
pub fn format_currency(amount: f64) -> String {
    let rounded = round_cents(amount);
    let negative = rounded < 0.0;
    let cents = (rounded.abs() * 100.0).round() as u64;
    let dollars = cents / 100;
    let remainder = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{remainder:02}")
}

/// Format a phone number as `(XXX) XXX-XXXX`.
///
/// Anything that is not exactly ten digits after stripping non-digit
/// characters is returned unchanged.
pub fn format_phone(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 10 {
        return input.to_string();
    }
    format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_ten_digit_phone() {
        assert_eq!(format_phone("5035551234"), "(503) 555-1234");
        assert_eq!(format_phone("503-555-1234"), "(503) 555-1234");
        assert_eq!(format_phone("(503) 555.1234"), "(503) 555-1234");
    }

    #[test]
    fn leaves_non_ten_digit_input_unchanged() {
        assert_eq!(format_phone("555-1234"), "555-1234");
        assert_eq!(format_phone("+1 503 555 1234"), "+1 503 555 1234");
        assert_eq!(format_phone(""), "");
    }

    #[test]
    fn formats_currency_with_grouping() {
        assert_eq!(format_currency(1234.56), "$1,234.56");
        assert_eq!(format_currency(0.5), "$0.50");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(-42.1), "-$42.10");
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round_cents(10.005), 10.01);
        assert_eq!(round_cents(10.004), 10.0);
    }

    #[test]
    fn half_cent_boundaries_round_up() {
        // 1125 * 0.029 + 0.30 lands on a half cent in binary float.
        assert_eq!(round_cents(1125.0 * 0.029 + 0.30), 32.93);
        assert_eq!(round_cents(32.925), 32.93);
        assert_eq!(round_cents(-32.925), -32.93);
    }
}
