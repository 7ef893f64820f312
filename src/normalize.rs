// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Display formatting for normalized events.
//!
//! Amount scaling itself lives on the token value types
//! ([`TokenAmount::normalize`](crate::TokenAmount::normalize),
//! [`TokenPrice::value_of`](crate::TokenPrice::value_of)); this module
//! formats the results for human consumption.

use crate::types::tokens::UsdValue;

/// Format a USD value as a display quote, e.g. `$1,234.57`.
///
/// # Examples
///
/// ```
/// use logsense::UsdValue;
/// use logsense::normalize::prettify_usd;
///
/// assert_eq!(prettify_usd(UsdValue::new(1.0)), "$1.00");
/// assert_eq!(prettify_usd(UsdValue::new(1234567.891)), "$1,234,567.89");
/// ```
pub fn prettify_usd(value: UsdValue) -> String {
    let raw = value.as_f64();
    let sign = if raw < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", raw.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

/// Format a plain number with thousands separators and up to three
/// fractional digits, trailing zeros trimmed, e.g. `1,234.5`.
pub fn prettify_number(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');
    let grouped = group_thousands(int_part);
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
