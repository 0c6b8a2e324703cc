use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as dollars with thousands separators and two decimal
/// places, e.g. `$1,234.50`. Negative amounts keep the sign after the
/// symbol: `$-1,234.50`.
pub fn currency(value: Decimal) -> String {
    let rounded = round_cents(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = match digits.split_once('.') {
        Some((whole, cents)) => (whole, cents),
        None => (digits.as_str(), "00"),
    };

    format!("${}{}.{}", sign, group_thousands(whole), cents)
}

/// Formats a percentage with two decimal places, e.g. `40.83%`. Like
/// [`currency`], a value that rounds to zero carries no sign.
pub fn percentage(value: Decimal) -> String {
    let rounded = round_cents(value);
    if rounded.is_zero() {
        return String::from("0.00%");
    }

    format!("{:.2}%", rounded)
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Inserts a `,` between every group of three digits, counting from the
/// right.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}
