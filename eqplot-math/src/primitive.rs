//! Functions to construct [`Integer`]s and [`Rational`]s from various types.

use rug::{Integer, Rational};

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] with the given value.
pub fn rational<T>(n: T) -> Rational
where
    Rational: From<T>,
{
    Rational::from(n)
}

/// Exponents of larger magnitude are clamped to this value.
const MAX_EXPONENT: u32 = 4096;

/// Creates an exact [`Rational`] from a decimal literal, such as `42`, `0.001`, `3.`, `.5`, or
/// `2.5e-3`.
///
/// Characters other than ASCII digits, the first `.`, and an exponent part are ignored. The
/// tokenizer never produces them.
pub fn rational_from_decimal(s: &str) -> Rational {
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(idx) => (&s[..idx], &s[idx + 1..]),
        None => (s, ""),
    };

    let mut numer = int(0);
    let mut frac_digits = 0u32;
    let mut seen_point = false;

    for c in mantissa.chars() {
        if c == '.' {
            seen_point = true;
        } else if let Some(digit) = c.to_digit(10) {
            numer *= 10;
            numer += digit;
            if seen_point {
                frac_digits += 1;
            }
        }
    }

    let negative = exponent.starts_with('-');
    let exp = exponent.chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u32, |exp, digit| exp.saturating_mul(10).saturating_add(digit).min(MAX_EXPONENT));

    let mut value = Rational::from((numer, Integer::from(Integer::u_pow_u(10, frac_digits))));
    let scale = Integer::from(Integer::u_pow_u(10, exp));
    if negative {
        value /= scale;
    } else {
        value *= scale;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_literals() {
        assert_eq!(rational_from_decimal("42"), rational(42));
        assert_eq!(rational_from_decimal("0.001"), rational((1, 1000)));
        assert_eq!(rational_from_decimal("2.50"), rational((5, 2)));
        assert_eq!(rational_from_decimal("3."), rational(3));
        assert_eq!(rational_from_decimal(".5"), rational((1, 2)));
    }

    #[test]
    fn scientific_literals() {
        assert_eq!(rational_from_decimal("1e3"), rational(1000));
        assert_eq!(rational_from_decimal("2.5e-3"), rational((1, 400)));
        assert_eq!(rational_from_decimal("1E+2"), rational(100));
        assert_eq!(rational_from_decimal("1e-12"), rational((1i64, 1_000_000_000_000i64)));
    }
}
