use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;

/// day count convention for interest calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// actual days / 365
    Actual365,
    /// actual days / 360
    Actual360,
    /// 30 days per month / 360 days per year
    Thirty360,
    /// actual days / actual days in year (handles leap years)
    ActualActual,
}

impl DayCountConvention {
    /// days between dates under this convention
    pub fn days_between(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        match self {
            DayCountConvention::Actual365
            | DayCountConvention::Actual360
            | DayCountConvention::ActualActual => (end - start).num_days(),
            DayCountConvention::Thirty360 => days_30_360(start, end),
        }
    }

    /// year basis for the convention
    pub fn year_basis(&self, year: i32) -> u32 {
        match self {
            DayCountConvention::Actual365 => 365,
            DayCountConvention::Actual360 | DayCountConvention::Thirty360 => 360,
            DayCountConvention::ActualActual => {
                if is_leap_year(year) {
                    366
                } else {
                    365
                }
            }
        }
    }

    /// multiplier applied to an outstanding balance to yield the interest
    /// accrued over `[start, end]`
    pub fn rate_factor(&self, annual_rate: Rate, start: NaiveDate, end: NaiveDate) -> Decimal {
        let days = self.days_between(start, end);
        if days <= 0 {
            return Decimal::ZERO;
        }
        let basis = self.year_basis(end.year());
        annual_rate.as_decimal() / Decimal::from(basis) * Decimal::from(days)
    }
}

/// 30/360 day count
fn days_30_360(start: NaiveDate, end: NaiveDate) -> i64 {
    let y1 = start.year();
    let y2 = end.year();
    let m1 = start.month() as i64;
    let m2 = end.month() as i64;
    let d1 = start.day().min(30) as i64;
    let d2 = if d1 == 30 {
        end.day().min(30) as i64
    } else {
        end.day() as i64
    };

    let days = 360 * (y2 - y1) as i64 + 30 * (m2 - m1) + (d2 - d1);
    days.max(0)
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_count_conventions() {
        let start = date(2024, 1, 1);
        let end = date(2024, 2, 1);

        assert_eq!(DayCountConvention::Actual365.days_between(start, end), 31);
        assert_eq!(DayCountConvention::Actual360.days_between(start, end), 31);
        assert_eq!(DayCountConvention::Thirty360.days_between(start, end), 30);
    }

    #[test]
    fn test_30_360_month_ends() {
        assert_eq!(
            DayCountConvention::Thirty360.days_between(date(2024, 1, 31), date(2024, 2, 29)),
            29
        );
        assert_eq!(
            DayCountConvention::Thirty360.days_between(date(2024, 2, 28), date(2024, 3, 31)),
            33
        );
    }

    #[test]
    fn test_leap_year_basis() {
        assert_eq!(DayCountConvention::ActualActual.year_basis(2024), 366);
        assert_eq!(DayCountConvention::ActualActual.year_basis(2023), 365);
        assert_eq!(DayCountConvention::Actual360.year_basis(2024), 360);
    }

    #[test]
    fn test_rate_factor() {
        let rate = Rate::from_percentage(10);
        let factor =
            DayCountConvention::Actual365.rate_factor(rate, date(2024, 1, 1), date(2024, 2, 1));
        assert_eq!(factor, dec!(0.10) / dec!(365) * dec!(31));

        // empty or inverted range yields zero
        let factor =
            DayCountConvention::Actual365.rate_factor(rate, date(2024, 1, 1), date(2024, 1, 1));
        assert_eq!(factor, Decimal::ZERO);
    }
}
