use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

const MILLIS_PER_HOUR: i64 = 3_600_000;
const MILLIS_PER_DAY: i64 = 86_400_000;
const DAYS_PER_WEEK: u64 = 7;
const DAYS_PER_MONTH: u64 = 30;

/// Elapsed rental time bucketed the way each rent type bills it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RentalDuration {
    pub hours: u64,
    pub days: u64,
    pub weeks: u64,
    pub months: u64,
}

impl RentalDuration {
    /// Buckets the time between delivery and return.
    ///
    /// Returns `None` unless `returned` is strictly after `delivered`. Every
    /// partial unit is billed as a whole one, and days, weeks and months are
    /// never less than one.
    pub fn between(delivered: NaiveDateTime, returned: NaiveDateTime) -> Option<Self> {
        let elapsed = (returned - delivered).num_milliseconds();
        if elapsed <= 0 {
            return None;
        }
        Some(Self::from_millis(elapsed as u64))
    }

    fn from_millis(elapsed: u64) -> Self {
        let hours = elapsed.div_ceil(MILLIS_PER_HOUR as u64);
        let days = elapsed.div_ceil(MILLIS_PER_DAY as u64).max(1);
        Self {
            hours,
            days,
            weeks: days.div_ceil(DAYS_PER_WEEK).max(1),
            months: days.div_ceil(DAYS_PER_MONTH).max(1),
        }
    }

    /// Convenience for optional endpoints, as captured by the period form.
    pub fn from_endpoints(
        delivered: Option<NaiveDateTime>,
        returned: Option<NaiveDateTime>,
    ) -> Option<Self> {
        match (delivered, returned) {
            (Some(delivered), Some(returned)) => Self::between(delivered, returned),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn two_full_days() {
        let duration = RentalDuration::between(at(1, 10, 0), at(3, 10, 0)).expect("duration");
        assert_eq!(
            duration,
            RentalDuration {
                hours: 48,
                days: 2,
                weeks: 1,
                months: 1,
            }
        );
    }

    #[test]
    fn partial_units_round_up() {
        let duration = RentalDuration::between(at(1, 10, 0), at(1, 11, 1)).expect("duration");
        assert_eq!(duration.hours, 2);
        assert_eq!(duration.days, 1);

        let duration = RentalDuration::between(at(1, 10, 0), at(9, 10, 1)).expect("duration");
        assert_eq!(duration.days, 9);
        assert_eq!(duration.weeks, 2);
        assert_eq!(duration.months, 1);
    }

    #[test]
    fn month_buckets_use_thirty_days() {
        let start = at(1, 0, 0);
        let end = NaiveDate::from_ymd_opt(2024, 2, 5)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid timestamp");
        let duration = RentalDuration::between(start, end).expect("duration");
        assert_eq!(duration.days, 35);
        assert_eq!(duration.weeks, 5);
        assert_eq!(duration.months, 2);
    }

    #[test]
    fn non_positive_spans_have_no_duration() {
        assert_eq!(RentalDuration::between(at(2, 10, 0), at(2, 10, 0)), None);
        assert_eq!(RentalDuration::between(at(3, 10, 0), at(2, 10, 0)), None);
        assert_eq!(RentalDuration::from_endpoints(Some(at(1, 0, 0)), None), None);
    }
}
