// Numeric helpers polars has no counterpart for.

use polars::prelude::*;

use crate::domain::EdaError;

/// First value of a float column in an aggregated frame; null reads as NaN.
pub fn first_f64(frame: &DataFrame, name: &str) -> Result<f64, EdaError> {
    Ok(frame.column(name)?.f64()?.get(0).unwrap_or(f64::NAN))
}

/// Sturges' rule.
pub fn bin_count(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    (n as f64).log2().ceil() as usize + 1
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sturges_bin_count() {
        assert_eq!(bin_count(0), 1);
        assert_eq!(bin_count(1), 1);
        assert_eq!(bin_count(8), 4);
        assert_eq!(bin_count(100), 8);
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round2(100.0 / 3.0), 33.33);
        assert_eq!(round2(200.0 / 3.0), 66.67);
        assert!(round2(f64::NAN).is_nan());
    }
}
