//! Millions → billions conversion.
//!
//! Rounding is half away from zero (`f64::round`), to 2 decimal places.

use crate::models::{RawRecord, Record};

/// Divisor from millions to billions.
pub const MILLIONS_PER_BILLION: f64 = 1000.0;

/// Decimal places kept in the billions figure.
pub const BILLIONS_PRECISION: i32 = 2;

/// Round `value` to `places` decimal places, ties away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Convert a figure in millions to billions, rounded.
pub fn millions_to_billions(millions: f64) -> f64 {
    round_to(millions / MILLIONS_PER_BILLION, BILLIONS_PRECISION)
}

/// Convert one record. The millions figure does not survive.
pub fn convert_record(raw: RawRecord) -> Record {
    Record {
        gdp_usd_billions: millions_to_billions(raw.gdp_usd_millions),
        country: raw.country,
    }
}

/// Convert a whole result set, keeping its order.
pub fn convert(records: Vec<RawRecord>) -> Vec<Record> {
    records.into_iter().map(convert_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(country: &str, millions: f64) -> RawRecord {
        RawRecord {
            country: country.into(),
            gdp_usd_millions: millions,
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(millions_to_billions(21_427_700.0), 21_427.7);
        assert_eq!(millions_to_billions(100_000.0), 100.0);
        assert_eq!(millions_to_billions(2_000.0), 2.0);
        assert_eq!(millions_to_billions(0.0), 0.0);
    }

    #[test]
    fn test_rounds_to_two_places() {
        assert_eq!(millions_to_billions(1_234_567.0), 1_234.57);
        assert_eq!(millions_to_billions(4_429_838.0), 4_429.84);
        assert_eq!(millions_to_billions(1.0), 0.0);
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(round_to(0.5, 0), 1.0);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(0.125, 2), 0.13);
    }

    #[test]
    fn test_convert_keeps_order_and_countries() {
        let converted = convert(vec![raw("A", 50_000.0), raw("B", 150_000.0), raw("C", 300_000.0)]);
        let expected = vec![
            Record { country: "A".into(), gdp_usd_billions: 50.0 },
            Record { country: "B".into(), gdp_usd_billions: 150.0 },
            Record { country: "C".into(), gdp_usd_billions: 300.0 },
        ];
        assert_eq!(converted, expected);
    }

    #[test]
    fn test_convert_empty() {
        assert!(convert(Vec::new()).is_empty());
    }
}
