//! Money helpers. Amounts are integer minor units (cents); the ISO
//! currency code lives on the owning user.

/// Formats a minor-unit amount for presentation, e.g. `$4.50` or
/// `-12.00 CHF` for codes without a known symbol.
pub fn format_minor_units(amount_cents: i64, currency_code: &str) -> String {
    let sign = if amount_cents < 0 { "-" } else { "" };
    let magnitude = amount_cents.unsigned_abs();
    let units = magnitude / 100;
    let cents = magnitude % 100;
    match currency_symbol(currency_code) {
        Some(symbol) => format!("{sign}{symbol}{units}.{cents:02}"),
        None => format!("{sign}{units}.{cents:02} {currency_code}"),
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" | "CAD" | "AUD" => Some("$"),
        "EUR" => Some("\u{20ac}"),
        "GBP" => Some("\u{a3}"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_symbol_currencies() {
        assert_eq!(format_minor_units(450, "USD"), "$4.50");
        assert_eq!(format_minor_units(120_000, "USD"), "$1200.00");
        assert_eq!(format_minor_units(999, "EUR"), "\u{20ac}9.99");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(format_minor_units(-450, "USD"), "-$4.50");
    }

    #[test]
    fn falls_back_to_code_suffix() {
        assert_eq!(format_minor_units(1500, "CHF"), "15.00 CHF");
    }
}
