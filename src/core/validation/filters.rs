//! Reusable field filters
//!
//! These filters transform field values before validation

use anyhow::Result;
use serde_json::Value;

/// A boxed filter as stored in [`FieldRules`](super::config::FieldRules)
pub type Filter = Box<dyn Fn(&str, Value) -> Result<Value> + Send + Sync>;

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.trim().to_string()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: convert string to lowercase
pub fn lowercase() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.to_lowercase()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: keep ASCII digits only
pub fn digits_only() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(strip_non_digits(s)))
        } else {
            Ok(value)
        }
    }
}

/// Filter: reformat a CNIC as `XXXXX-XXXXXXX-X`
pub fn cnic() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(format_cnic(s)))
        } else {
            Ok(value)
        }
    }
}

pub fn strip_non_digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Progressive CNIC formatting, applied on every keystroke
///
/// Up to five digits are left alone, the sixth introduces the first dash and
/// the thirteenth the second one. Digits past the thirteenth are dropped.
pub fn format_cnic(input: &str) -> String {
    let digits = strip_non_digits(input);
    match digits.len() {
        0..=5 => digits,
        6..=12 => format!("{}-{}", &digits[..5], &digits[5..]),
        _ => format!("{}-{}-{}", &digits[..5], &digits[5..12], &digits[12..13]),
    }
}
