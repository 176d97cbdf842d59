use crate::utils::last_day_of_month;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A reporting period, identified by its fiscal end date.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema,
)]
#[serde(transparent)]
pub struct Period(NaiveDate);

impl Period {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parses a source period identifier.
    ///
    /// Accepts `YYYYMMDD`, `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY-MM` (month end)
    /// and `YYYY` (December 31st).
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        for format in ["%Y%m%d", "%Y-%m-%d", "%Y/%m/%d"] {
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return Some(Self(date));
            }
        }

        if let Some((year, month)) = text.split_once('-').or_else(|| text.split_once('/')) {
            if year.len() == 4 && (1..=2).contains(&month.len()) {
                let year: i32 = year.parse().ok()?;
                let month: u32 = month.parse().ok()?;
                return last_day_of_month(year, month).map(Self);
            }
            return None;
        }

        if text.len() == 4 && text.chars().all(|c| c.is_ascii_digit()) {
            let year: i32 = text.parse().ok()?;
            return Self::from_ymd(year, 12, 31);
        }

        None
    }

}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// True when consecutive periods are spaced inconsistently, e.g. annual
/// reports interleaved with quarterly ones.
///
/// Gaps are measured in 30-day months, rounded to the nearest whole month.
pub fn has_mixed_frequency(periods: &[Period]) -> bool {
    let mut sorted = periods.to_vec();
    sorted.sort();
    sorted.dedup();

    let gaps: BTreeSet<i64> = sorted
        .windows(2)
        .map(|pair| {
            let days = (pair[1].0 - pair[0].0).num_days();
            (days as f64 / 30.0).round() as i64
        })
        .collect();

    gaps.len() > 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(year: i32, month: u32, day: u32) -> Period {
        Period::from_ymd(year, month, day).unwrap()
    }

    #[test]
    fn test_parse_supported_formats() {
        assert_eq!(Period::parse("20231231"), Some(p(2023, 12, 31)));
        assert_eq!(Period::parse(" 2023-06-30 "), Some(p(2023, 6, 30)));
        assert_eq!(Period::parse("2023/03/31"), Some(p(2023, 3, 31)));
        assert_eq!(Period::parse("2024-02"), Some(p(2024, 2, 29)));
        assert_eq!(Period::parse("2022"), Some(p(2022, 12, 31)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Period::parse(""), None);
        assert_eq!(Period::parse("FY2023"), None);
        assert_eq!(Period::parse("20231332"), None);
        assert_eq!(Period::parse("2023-13"), None);
        assert_eq!(Period::parse("23-12"), None);
    }

    #[test]
    fn test_ordering_and_display() {
        let mut periods = vec![p(2023, 12, 31), p(2022, 12, 31), p(2023, 6, 30)];
        periods.sort();
        assert_eq!(periods[0], p(2022, 12, 31));
        assert_eq!(periods[2].to_string(), "2023-12-31");
        assert_eq!(
            serde_json::to_string(&periods[1]).unwrap(),
            "\"2023-06-30\""
        );
    }

    #[test]
    fn test_mixed_frequency_detection() {
        let annual = [p(2021, 12, 31), p(2022, 12, 31), p(2023, 12, 31)];
        assert!(!has_mixed_frequency(&annual));

        let quarterly = [p(2023, 3, 31), p(2023, 6, 30), p(2023, 9, 30), p(2023, 12, 31)];
        assert!(!has_mixed_frequency(&quarterly));

        let mixed = [p(2022, 12, 31), p(2023, 3, 31), p(2023, 12, 31)];
        assert!(has_mixed_frequency(&mixed));

        assert!(!has_mixed_frequency(&[p(2023, 12, 31)]));
    }
}
