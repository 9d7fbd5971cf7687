//! Human-readable size decomposition.
//!
//! Byte counts are split into a number and a binary-prefix suffix (`KiB`, `MiB`, ...). The
//! number is rounded to two decimal places.

const UNITS: [&str; 8] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"];
const OVERFLOW_UNIT: &str = "Yi";
const STEP: f64 = 1024.0;

/// A size expressed as `number` + `suffix`, e.g. `1.5` + `"KiB"`.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedSize {
    pub number: f64,
    pub suffix: String,
}

impl FormattedSize {
    pub fn from_bytes(bytes: u64) -> Self {
        Self::from_value(bytes as f64)
    }

    /// Decomposes an arbitrary byte quantity.
    ///
    /// Divides by 1024 while the magnitude is at least 1024. Past `Zi` the remainder is
    /// reported in `Yi` rather than failing.
    pub fn from_value(value: f64) -> Self {
        let mut value = value;
        for unit in UNITS {
            if value.abs() < STEP {
                return Self::with_unit(value, unit);
            }
            value /= STEP;
        }
        Self::with_unit(value, OVERFLOW_UNIT)
    }

    fn with_unit(value: f64, unit: &str) -> Self {
        Self {
            number: round_to_hundredths(value),
            suffix: format!("{unit}B"),
        }
    }

    /// The number rendered with exactly two decimals, as used for text matching.
    pub fn number_text(&self) -> String {
        format!("{:.2}", self.number)
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(bytes: u64) -> (String, String) {
        let size = FormattedSize::from_bytes(bytes);
        (size.number_text(), size.suffix)
    }

    #[test]
    fn test_bytes_below_one_kibibyte() {
        assert_eq!(parts(0), ("0.00".into(), "B".into()));
        assert_eq!(parts(1023), ("1023.00".into(), "B".into()));
    }

    #[test]
    fn test_kibibyte_boundaries() {
        assert_eq!(parts(1024), ("1.00".into(), "KiB".into()));
        assert_eq!(parts(1536), ("1.50".into(), "KiB".into()));
        assert_eq!(FormattedSize::from_bytes(1536).number, 1.5);
    }

    #[test]
    fn test_larger_units() {
        assert_eq!(parts(5 * 1024 * 1024), ("5.00".into(), "MiB".into()));
        assert_eq!(parts(3 * 1024 * 1024 * 1024 + 1024 * 1024 * 512), ("3.50".into(), "GiB".into()));
        assert_eq!(parts(u64::MAX).1, "EiB");
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        // 1234 / 1024 = 1.205078125
        assert_eq!(parts(1234), ("1.21".into(), "KiB".into()));
    }

    #[test]
    fn test_overflow_falls_back_to_yobi() {
        let size = FormattedSize::from_value(3.0 * STEP.powi(8));

        assert_eq!(size.suffix, "YiB");
        assert_eq!(size.number, 3.0);
    }
}
