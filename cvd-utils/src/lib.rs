//! Shared utility functions for CVD crates.

/// Date utility functions
pub mod dates {
    use chrono::{NaiveDate, NaiveDateTime};

    /// Input formats accepted by [`normalize_date`], tried in order.
    const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"];
    const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Parse a date written in any of the supported source formats.
    ///
    /// `MM/DD/YY` is tried before `MM/DD/YYYY`: `%Y` would otherwise read
    /// "20" as the year 20.
    pub fn parse_any_date(s: &str) -> anyhow::Result<NaiveDate> {
        let s = s.trim();
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Ok(date);
            }
        }
        for fmt in DATE_TIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(dt.date());
            }
        }
        anyhow::bail!("unrecognised date '{}'", s)
    }

    /// Normalize a date string to "YYYY-MM-DD" regardless of its input format.
    ///
    /// The normalized form sorts lexicographically in calendar order, so
    /// downstream grouping and range filters can compare plain strings.
    pub fn normalize_date(s: &str) -> anyhow::Result<String> {
        parse_any_date(s).map(|d| format_date(&d))
    }

    /// Number of days from `earlier` to `later` (both "YYYY-MM-DD").
    pub fn days_between(earlier: &str, later: &str) -> anyhow::Result<i64> {
        let a = parse_date(earlier)?;
        let b = parse_date(later)?;
        Ok((b - a).num_days())
    }

}

/// Half-up rounding of integer ratios.
///
/// Rates and shares are ratios of integer case counts, so they are rounded
/// exactly on the integers instead of on a binary float approximation.
/// Halves always round toward positive infinity (`0.125 -> 0.13`).
pub mod rounding {
    /// Round `numerator / denominator` to `places` decimals, half-up, and
    /// return the result scaled by `10^places` as an integer.
    ///
    /// Returns `None` when the denominator is zero.
    pub fn scaled_half_up(numerator: i64, denominator: i64, places: u32) -> Option<i128> {
        if denominator == 0 {
            return None;
        }
        let (mut n, mut d) = (numerator as i128, denominator as i128);
        if d < 0 {
            n = -n;
            d = -d;
        }
        let scaled = n * 10i128.pow(places);
        Some((2 * scaled + d).div_euclid(2 * d))
    }

    /// Round `numerator / denominator` to `places` decimals, half-up.
    pub fn ratio_half_up(numerator: i64, denominator: i64, places: u32) -> Option<f64> {
        scaled_half_up(numerator, denominator, places)
            .map(|q| q as f64 / 10f64.powi(places as i32))
    }

    /// `100 * part / whole` rounded half-up to `places` decimals.
    pub fn percent_half_up(part: i64, whole: i64, places: u32) -> Option<f64> {
        ratio_half_up(part.saturating_mul(100), whole, places)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_half_rounds_up() {
            // 1/8 = 0.125 exactly
            assert_eq!(ratio_half_up(1, 8, 2), Some(0.13));
            // 5/2 = 2.5
            assert_eq!(ratio_half_up(5, 2, 0), Some(3.0));
            // -5/2 = -2.5 rounds toward +inf
            assert_eq!(ratio_half_up(-5, 2, 0), Some(-2.0));
            assert_eq!(ratio_half_up(5, -2, 0), Some(-2.0));
        }

        #[test]
        fn test_zero_denominator() {
            assert_eq!(ratio_half_up(10, 0, 2), None);
            assert_eq!(scaled_half_up(0, 0, 3), None);
            assert_eq!(percent_half_up(1, 0, 2), None);
        }

        #[test]
        fn test_percent() {
            assert_eq!(percent_half_up(148000, 4290000, 2), Some(3.45));
            assert_eq!(percent_half_up(1, 3, 2), Some(33.33));
            assert_eq!(percent_half_up(2, 3, 2), Some(66.67));
            assert_eq!(percent_half_up(0, 3, 2), Some(0.0));
        }

        #[test]
        fn test_scaled() {
            // 0.3765 -> 0.377 -> 377 thousandths
            assert_eq!(scaled_half_up(3765, 10000, 3), Some(377));
            assert_eq!(scaled_half_up(1, 3, 3), Some(333));
        }
    }
}
