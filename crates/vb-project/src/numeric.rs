//! Tolerant numeric input.
//!
//! Values typed by people arrive as `12,5`, `12.5` or `12,5 cSt`. Every comma
//! is read as a decimal point and the longest leading number is taken; the
//! rest of the text is ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Parse the longest leading decimal number of `text`.
///
/// Commas count as decimal points. `None` when the text does not start with
/// a number.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let normalized = text.replace(',', ".");
    let s = normalized.trim();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let int_digits = digits(end);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

/// A number given either as a number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    pub fn value(&self) -> Option<f64> {
        match self {
            NumericInput::Number(v) => Some(*v),
            NumericInput::Text(s) => parse_numeric(s),
        }
    }
}

impl From<f64> for NumericInput {
    fn from(v: f64) -> Self {
        NumericInput::Number(v)
    }
}

impl From<&str> for NumericInput {
    fn from(s: &str) -> Self {
        NumericInput::Text(s.to_string())
    }
}

impl fmt::Display for NumericInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericInput::Number(v) => write!(f, "{v}"),
            NumericInput::Text(s) => write!(f, "{s:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_comma() {
        assert_eq!(parse_numeric("12,5"), Some(12.5));
        assert_eq!(parse_numeric("  46.0 "), Some(46.0));
        assert_eq!(parse_numeric("12,5 cSt"), Some(12.5));
        assert_eq!(parse_numeric("-3,25"), Some(-3.25));
    }

    #[test]
    fn leading_prefix_only() {
        assert_eq!(parse_numeric("1.2.3"), Some(1.2));
        assert_eq!(parse_numeric(".5"), Some(0.5));
        assert_eq!(parse_numeric("5."), Some(5.0));
        assert_eq!(parse_numeric("1e3"), Some(1000.0));
        assert_eq!(parse_numeric("2e"), Some(2.0));
        assert_eq!(parse_numeric("2e+"), Some(2.0));
        assert_eq!(parse_numeric("1,5e-1"), Some(0.15));
        assert_eq!(parse_numeric("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_numeric("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn not_a_number() {
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("abc"), None);
        assert_eq!(parse_numeric("-"), None);
        assert_eq!(parse_numeric("."), None);
        assert_eq!(parse_numeric("cSt 12"), None);
    }

    #[test]
    fn input_forms() {
        assert_eq!(NumericInput::from(4.5).value(), Some(4.5));
        assert_eq!(NumericInput::from("4,5").value(), Some(4.5));
        assert_eq!(NumericInput::from("n/a").value(), None);

        let parsed: Vec<NumericInput> = serde_json::from_str(r#"[1.5, "2,5"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![NumericInput::Number(1.5), NumericInput::Text("2,5".into())]
        );
    }
}
