//! Display formatting for ledger values.
//!
//! Values render with two decimals and Indian digit grouping (`12,34,567.89`).
//! Negatives use the accounting convention `(1,234.00)`. Absent, non-finite and
//! zero values all render as [`PLACEHOLDER`].

use crate::schema::ValueUnit;

pub const PLACEHOLDER: &str = "—";
pub const CURRENCY_GLYPH: &str = "₹";
const NBSP: char = '\u{a0}';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    pub currency: bool,
    pub percent: bool,
}

impl FormatOptions {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn currency() -> Self {
        Self {
            currency: true,
            percent: false,
        }
    }

    pub fn percent() -> Self {
        Self {
            currency: false,
            percent: true,
        }
    }
}

impl From<ValueUnit> for FormatOptions {
    fn from(unit: ValueUnit) -> Self {
        match unit {
            ValueUnit::Plain => Self::plain(),
            ValueUnit::Currency => Self::currency(),
            ValueUnit::Percent => Self::percent(),
        }
    }
}

pub fn format_value(value: Option<f64>, options: FormatOptions) -> String {
    let v = match value {
        Some(v) if v.is_finite() && v != 0.0 => v,
        _ => return PLACEHOLDER.to_string(),
    };

    let mut text = group_indian(v.abs());
    // percent takes precedence if a caller sets both
    if options.percent {
        text.push('%');
    } else if options.currency {
        text = format!("{}{}{}", CURRENCY_GLYPH, NBSP, text);
    }

    if v < 0.0 {
        format!("({})", text)
    } else {
        text
    }
}

pub fn format_unit(value: Option<f64>, unit: ValueUnit) -> String {
    format_value(value, unit.into())
}

/// True when `display` uses the parenthesised negative form produced by [`format_value`].
pub fn is_negative_display(display: &str) -> bool {
    display.starts_with('(') && display.ends_with(')')
}

/// Two-decimal rendering of a non-negative amount with Indian grouping:
/// the last three integer digits, then groups of two.
fn group_indian(amount: f64) -> String {
    let fixed = round_to_paise(amount);
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 2 + 3);

    if digits.len() <= 3 {
        grouped.push_str(int_part);
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let lead = head.len() % 2;
        for (i, c) in head.iter().enumerate() {
            if i > 0 && (i + 2 - lead) % 2 == 0 {
                grouped.push(',');
            }
            grouped.push(*c);
        }
        grouped.push(',');
        grouped.extend(tail);
    }

    format!("{}.{}", grouped, dec_part)
}

/// Rounds a non-negative amount to two decimals, half away from zero, on its
/// shortest decimal form. `2.675` becomes `2.68` even though the nearest
/// binary value lies just below it.
fn round_to_paise(amount: f64) -> String {
    // f64 Display never uses exponent notation
    let shortest = amount.to_string();
    let (int_part, frac_part) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(2))
        .map(|b| b - b'0')
        .collect();

    if frac_part.as_bytes().get(2).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == 9 {
                *d = 0;
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let split = digits.len() - 2;
    let text: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
    format!("{}.{}", &text[..split], &text[split..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indian_grouping() {
        assert_eq!(format_value(Some(1.5), FormatOptions::plain()), "1.50");
        assert_eq!(format_value(Some(999.0), FormatOptions::plain()), "999.00");
        assert_eq!(format_value(Some(1000.0), FormatOptions::plain()), "1,000.00");
        assert_eq!(format_value(Some(12345.0), FormatOptions::plain()), "12,345.00");
        assert_eq!(format_value(Some(123456.0), FormatOptions::plain()), "1,23,456.00");
        assert_eq!(
            format_value(Some(1234567.891), FormatOptions::plain()),
            "12,34,567.89"
        );
        assert_eq!(
            format_value(Some(123456789.0), FormatOptions::plain()),
            "12,34,56,789.00"
        );
    }

    #[test]
    fn test_rounds_half_up_on_decimal_value() {
        assert_eq!(format_value(Some(0.125), FormatOptions::plain()), "0.13");
        assert_eq!(format_value(Some(1.005), FormatOptions::plain()), "1.01");
        assert_eq!(format_value(Some(2.675), FormatOptions::plain()), "2.68");
        assert_eq!(format_value(Some(-2.675), FormatOptions::plain()), "(2.68)");
        assert_eq!(format_value(Some(0.124), FormatOptions::plain()), "0.12");
        assert_eq!(format_value(Some(999.995), FormatOptions::plain()), "1,000.00");
        assert_eq!(format_value(Some(99999.999), FormatOptions::plain()), "1,00,000.00");
        assert_eq!(format_value(Some(0.001), FormatOptions::plain()), "0.00");
        assert_eq!(format_value(Some(1e20), FormatOptions::plain()), "10,00,00,00,00,00,00,00,00,000.00");
    }

    #[test]
    fn test_placeholder_for_zero_and_absent() {
        for options in [
            FormatOptions::plain(),
            FormatOptions::currency(),
            FormatOptions::percent(),
        ] {
            assert_eq!(format_value(None, options), PLACEHOLDER);
            assert_eq!(format_value(Some(0.0), options), PLACEHOLDER);
            assert_eq!(format_value(Some(-0.0), options), PLACEHOLDER);
            assert_eq!(format_value(Some(f64::NAN), options), PLACEHOLDER);
            assert_eq!(format_value(Some(f64::INFINITY), options), PLACEHOLDER);
        }
    }

    #[test]
    fn test_units() {
        assert_eq!(
            format_value(Some(1500.0), FormatOptions::currency()),
            "₹\u{a0}1,500.00"
        );
        assert_eq!(format_value(Some(12.5), FormatOptions::percent()), "12.50%");
        assert_eq!(format_unit(Some(-3.0), ValueUnit::Percent), "(3.00%)");
    }

    #[test]
    fn test_negative_parentheses_enclose_absolute_text() {
        for v in [0.01, 7.0, 1234.5, 98765432.1] {
            for options in [
                FormatOptions::plain(),
                FormatOptions::currency(),
                FormatOptions::percent(),
            ] {
                let negative = format_value(Some(-v), options);
                assert!(is_negative_display(&negative), "{}", negative);
                let inner = &negative[1..negative.len() - 1];
                assert_eq!(inner, format_value(Some(v), options));
            }
        }
    }

    #[test]
    fn test_positive_is_not_negative_display() {
        assert!(!is_negative_display(&format_value(Some(10.0), FormatOptions::plain())));
        assert!(!is_negative_display(PLACEHOLDER));
    }
}
