//! Fuzzy column lookup across vendor export formats

use crate::export::RawRow;
use regex::Regex;

/// Lowercase and drop everything that is not an ASCII letter or digit
/// (`"Ball_Speed (mph)"` -> `"ballspeedmph"`).
pub fn normalize_header(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Find the value for a logical field given its candidate column names.
///
/// Normalized exact matches are tried across every column before any substring
/// match is considered, so `"Total"` never shadows an exact `"Total Distance"`.
/// Empty cells never match. Returns `None` when no column fits.
pub fn resolve<'a>(row: &'a RawRow, candidates: &[&str]) -> Option<&'a str> {
    let wanted: Vec<String> = candidates.iter().map(|c| normalize_header(c)).collect();
    let columns: Vec<(String, &str)> = row
        .iter()
        .map(|(key, value)| (normalize_header(key), value))
        .collect();

    let exact = columns
        .iter()
        .find(|(key, value)| !value.is_empty() && wanted.iter().any(|w| w == key));
    if let Some((_, value)) = exact {
        return Some(*value);
    }

    columns
        .iter()
        .find(|(key, value)| {
            !key.is_empty()
                && !value.is_empty()
                && wanted
                    .iter()
                    .any(|w| !w.is_empty() && (key.contains(w.as_str()) || w.contains(key.as_str())))
        })
        .map(|(_, value)| *value)
}

/// Coerce a cell to a number, never failing.
///
/// Everything except digits, `.` and `-` is dropped (units, thousands separators,
/// direction letters), then the longest leading number is parsed. Anything
/// unparsable becomes 0.
pub fn coerce_number(value: &str) -> f64 {
    lazy_static::lazy_static! {
        static ref LEADING_NUMBER: Regex = Regex::new(r"^-?(\d+\.?\d*|\.\d+)").unwrap();
    }

    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    LEADING_NUMBER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Resolve a field and coerce it; absent fields are 0
pub fn resolve_number(row: &RawRow, candidates: &[&str]) -> f64 {
    resolve(row, candidates).map(coerce_number).unwrap_or(0.0)
}
