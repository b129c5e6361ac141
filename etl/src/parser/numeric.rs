//! Numeric cell normalization.
//!
//! Wikipedia-style cells look like `21,427,700` or `2,000[n 1]`. Cleanup runs
//! in a fixed order:
//!
//! 1. trim surrounding whitespace
//! 2. drop every `,` thousands separator
//! 3. cut at the first `[` (footnote annotation and anything after it)
//! 4. parse what is left as an unsigned base-10 number

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseFailure;

/// Unsigned decimal, optional fraction, optional exponent.
static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("number pattern is valid")
});

/// Strip separators and annotations without parsing.
///
/// ```
/// use gdp_etl::parser::numeric::clean;
///
/// assert_eq!(clean(" 1,234.5[note 3] "), "1234.5");
/// ```
pub fn clean(raw: &str) -> String {
    let without_separators = raw.trim().replace(',', "");
    let head = match without_separators.find('[') {
        Some(pos) => &without_separators[..pos],
        None => without_separators.as_str(),
    };
    head.trim().to_string()
}

/// Normalize a raw cell to a number.
pub fn normalize(raw: &str) -> Result<f64, ParseFailure> {
    let cleaned = clean(raw);

    if cleaned.is_empty() {
        return Err(ParseFailure::Empty {
            raw: raw.to_string(),
        });
    }

    if !NUMBER.is_match(&cleaned) {
        return Err(ParseFailure::NotANumber {
            raw: raw.to_string(),
            cleaned,
        });
    }

    match cleaned.parse::<f64>() {
        // An oversized exponent parses to infinity.
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseFailure::NotANumber {
            raw: raw.to_string(),
            cleaned,
        }),
    }
}
