//! Lenient numeric parsing for values stored as spreadsheet text.
//!
//! Cells hold text, so numeric fields are parsed on every read. Parsing is
//! prefix-based and never fails: text that does not start with a number
//! yields "not a number" (`None` for integers, `f64::NAN` for floats) instead
//! of an error, so a hand-edited cell cannot make a whole table unreadable.

/// Parse the leading integer of `text`.
///
/// Leading whitespace and a single sign are accepted, then the longest run of
/// decimal digits, or of hex digits after a `0x`/`0X` prefix. Anything after
/// the digits is ignored (`"12kg"` is `12`, `"10.9"` is `10`, `"0x1Ag"` is
/// `26`). Returns `None` when no digit is found. Values outside the `i64`
/// range saturate.
pub fn parse_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = split_sign(trimmed);
    let (radix, rest) = match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, rest),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }

    let mut value: i64 = 0;
    for c in digits.chars() {
        let digit = i64::from(c.to_digit(radix)?);
        value = match value
            .checked_mul(i64::from(radix))
            .and_then(|v| if negative { v.checked_sub(digit) } else { v.checked_add(digit) })
        {
            Some(v) => v,
            None => return Some(if negative { i64::MIN } else { i64::MAX }),
        };
    }
    Some(value)
}

/// Parse the leading floating point number of `text`.
///
/// Accepts leading whitespace, a sign, `Infinity`, a decimal mantissa with an
/// optional fraction, and an optional exponent. The longest valid prefix is
/// used; `f64::NAN` is returned when there is none.
pub fn parse_float(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let (negative, rest) = split_sign(trimmed);

    if rest.starts_with("Infinity") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let bytes = rest.as_bytes();
    let mut end = 0;
    let mut mantissa_digits = 0;

    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            mantissa_digits += 1;
        }
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return f64::NAN;
    }

    // The exponent only counts when at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    let magnitude = rest[..end].parse::<f64>().unwrap_or(f64::NAN);
    if negative { -magnitude } else { magnitude }
}

/// Render a float so that [`parse_float`] gives the same value back.
///
/// Finite values use the shortest representation that round-trips.
/// Non-finite values use the spellings `parse_float` understands.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        value.to_string()
    }
}

/// Render an optional integer; `None` becomes an empty cell.
pub fn format_int(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}
