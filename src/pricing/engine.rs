use crate::domain::RentType;
use crate::pricing::duration::RentalDuration;

const HOURS_PER_DAY: f64 = 24.0;
const DAYS_PER_WEEK: f64 = 7.0;
const DAYS_PER_MONTH: f64 = 30.0;

/// Per-hour price derived from a per-day rate, rounded to a whole amount.
pub fn hourly_rate(per_day: f64) -> f64 {
    (per_day / HOURS_PER_DAY).round()
}

/// Prices a rental from its per-day rate.
///
/// A rate of zero or less means pricing has not been set yet and quotes `0`.
/// Duration-based rent types return `None` when no duration is known, in which
/// case the caller keeps whatever total it already had.
pub fn quote(
    per_day: f64,
    rent_type: RentType,
    duration: Option<&RentalDuration>,
    custom_days: u32,
) -> Option<f64> {
    if per_day <= 0.0 {
        return Some(0.0);
    }
    if rent_type == RentType::Custom {
        return Some(per_day * f64::from(custom_days));
    }
    let duration = duration?;
    let total = match rent_type {
        RentType::Hourly => hourly_rate(per_day) * duration.hours as f64,
        RentType::Daily => per_day * duration.days as f64,
        RentType::Weekly => per_day * DAYS_PER_WEEK * duration.weeks as f64,
        RentType::Monthly => per_day * DAYS_PER_MONTH * duration.months as f64,
        RentType::Custom => per_day * f64::from(custom_days),
    };
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duration(hours: u64, days: u64, weeks: u64, months: u64) -> RentalDuration {
        RentalDuration {
            hours,
            days,
            weeks,
            months,
        }
    }

    #[test]
    fn formula_table() {
        let span = duration(48, 2, 1, 1);
        assert_eq!(quote(1000.0, RentType::Daily, Some(&span), 0), Some(2000.0));
        assert_eq!(quote(1200.0, RentType::Hourly, Some(&span), 0), Some(2400.0));
        assert_eq!(quote(1000.0, RentType::Weekly, Some(&span), 0), Some(7000.0));
        assert_eq!(quote(1000.0, RentType::Monthly, Some(&span), 0), Some(30000.0));
        assert_eq!(quote(1000.0, RentType::Custom, Some(&span), 5), Some(5000.0));
    }

    #[test]
    fn hourly_rate_is_rounded_before_multiplying() {
        // 1000 / 24 = 41.67 -> 42 per hour
        let span = duration(10, 1, 1, 1);
        assert_eq!(hourly_rate(1000.0), 42.0);
        assert_eq!(quote(1000.0, RentType::Hourly, Some(&span), 0), Some(420.0));
        // 1020 / 24 = 42.5 rounds up
        assert_eq!(hourly_rate(1020.0), 43.0);
    }

    #[test]
    fn unset_rate_quotes_zero() {
        let span = duration(240, 10, 2, 1);
        for rent_type in RentType::ALL {
            assert_eq!(quote(0.0, rent_type, Some(&span), 3), Some(0.0));
            assert_eq!(quote(-50.0, rent_type, Some(&span), 3), Some(0.0));
            assert_eq!(quote(0.0, rent_type, None, 3), Some(0.0));
        }
    }

    #[test]
    fn missing_duration_defers_duration_based_types() {
        assert_eq!(quote(1000.0, RentType::Daily, None, 0), None);
        assert_eq!(quote(1000.0, RentType::Hourly, None, 0), None);
        assert_eq!(quote(1000.0, RentType::Custom, None, 4), Some(4000.0));
    }
}
