//! ECMAScript-compatible number parsing and formatting
//!
//! Text content is coerced with the same grammar as JavaScript's `Number()`
//! and numbers are written the way `JSON.stringify` writes them, so output
//! matches what a browser-based converter produces.

/// Parse trimmed text with `Number()` semantics, keeping only finite results.
///
/// Accepts an optional sign, decimal digits with optional fraction and
/// exponent, and unsigned `0x`/`0o`/`0b` integers. `Infinity`, `NaN`, digit
/// separators and anything overflowing to infinity are rejected.
pub fn parse_finite(text: &str) -> Option<f64> {
    if let Some(value) = parse_radix_literal(text) {
        return value.is_finite().then_some(value);
    }

    let canonical = canonical_decimal(text)?;
    canonical
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn parse_radix_literal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let (radix, digits) = match bytes {
        [b'0', b'x' | b'X', rest @ ..] => (16, rest),
        [b'0', b'o' | b'O', rest @ ..] => (8, rest),
        [b'0', b'b' | b'B', rest @ ..] => (2, rest),
        _ => return None,
    };
    if digits.is_empty() {
        return Some(f64::NAN);
    }

    Some(power_of_two_radix(digits, radix).unwrap_or(f64::NAN))
}

/// Exact value of `digits` in a power-of-two radix, rounded to f64 once.
///
/// Keeps the leading 64 significant bits and folds every bit below them
/// into a sticky bit, which is enough for round-half-even to 53 bits.
fn power_of_two_radix(digits: &[u8], radix: u32) -> Option<f64> {
    let width = radix.trailing_zeros();
    let mut top: u64 = 0;
    let mut kept = 0u32;
    let mut dropped = 0u64;
    let mut sticky = false;

    for &b in digits {
        let digit = char::from(b).to_digit(radix)?;
        for shift in (0..width).rev() {
            let bit = (digit >> shift) & 1 == 1;
            if kept == 0 && !bit {
                continue;
            }
            if kept < u64::BITS {
                top = (top << 1) | u64::from(bit);
                kept += 1;
            } else {
                dropped = dropped.saturating_add(1);
                sticky |= bit;
            }
        }
    }

    if sticky {
        top |= 1;
    }
    let exponent = i32::try_from(dropped).unwrap_or(i32::MAX);
    Some(u64_to_f64(top) * 2f64.powi(exponent))
}

#[allow(clippy::as_conversions)]
fn u64_to_f64(value: u64) -> f64 {
    value as f64
}

/// `WhiteSpace` or `LineTerminator` as `String.prototype.trim` sees them
pub const fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{B}'
            | '\u{C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Rewrite a JavaScript decimal literal into a form `f64::from_str` accepts
/// unambiguously (`[-]digits.digitsEexp`), or `None` if it is not one.
fn canonical_decimal(text: &str) -> Option<String> {
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, text.get(1..)?),
        Some(b'+') => (false, text.get(1..)?),
        _ => (false, text),
    };

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(idx) => (body.get(..idx)?, Some(body.get(idx + 1..)?)),
        None => (body, None),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }

    let exponent = match exponent {
        Some(exp) => {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            if digits.is_empty() || !all_digits(digits) {
                return None;
            }
            exp
        }
        None => "0",
    };

    let sign = if negative { "-" } else { "" };
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let frac_part = if frac_part.is_empty() { "0" } else { frac_part };
    Some(format!("{sign}{int_part}.{frac_part}e{exponent}"))
}

/// Format a number like `Number.prototype.toString()` / `JSON.stringify`.
///
/// Non-finite values have no JSON form and are written as `null`.
pub fn format(value: f64) -> String {
    if !value.is_finite() {
        return "null".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value < 0.0 {
        return format!("-{}", format(-value));
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e3"
    let sci = format!("{value:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let Ok(exp) = exp.parse::<i64>() else {
        return sci;
    };

    let k = i64::try_from(digits.len()).unwrap_or(i64::MAX);
    let n = exp + 1;

    if k <= n && n <= 21 {
        let zeros = usize::try_from(n - k).unwrap_or(0);
        format!("{digits}{}", "0".repeat(zeros))
    } else if 0 < n && n <= 21 {
        let split = usize::try_from(n).unwrap_or(0);
        let (int_part, frac_part) = digits.split_at(split.min(digits.len()));
        format!("{int_part}.{frac_part}")
    } else if -6 < n && n <= 0 {
        let zeros = usize::try_from(-n).unwrap_or(0);
        format!("0.{}{digits}", "0".repeat(zeros))
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let exp = (n - 1).abs();
        let mut chars = digits.chars();
        let first = chars.next().unwrap_or('0');
        let rest = chars.as_str();
        if rest.is_empty() {
            format!("{first}e{sign}{exp}")
        } else {
            format!("{first}.{rest}e{sign}{exp}")
        }
    }
}
