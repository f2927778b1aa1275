use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Named date-range shorthand offered by the attendance views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum DatePreset {
    Today,
    Yesterday,
    #[serde(rename = "This Week")]
    ThisWeek,
    #[serde(rename = "This Month")]
    ThisMonth,
    #[serde(rename = "Last Month")]
    LastMonth,
    #[serde(rename = "This Year")]
    ThisYear,
    #[default]
    All,
    Custom,
}

/// Inclusive range of organization-local date-times. Unbounded when either side is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub const fn unbounded() -> Self {
        DateRange {
            start: None,
            end: None,
        }
    }

    fn days(first: NaiveDate, last: NaiveDate) -> Option<Self> {
        Some(DateRange {
            start: Some(start_of_day(first)),
            end: Some(end_of_day(last)?),
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() || self.end.is_none()
    }

    pub fn contains(&self, local: NaiveDateTime) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= local && local <= end,
            _ => true,
        }
    }

    /// Tests a UTC instant against the range using the organization's wall clock.
    pub fn contains_instant(&self, instant: &DateTime<Utc>, tz: &Tz) -> bool {
        self.is_unbounded() || self.contains(instant.with_timezone(tz).naive_local())
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// 23:59:59.999 of `date`.
pub fn end_of_day(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_milli_opt(23, 59, 59, 999)
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    first_of_month(date)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Resolve a preset against `today`.
///
/// `custom_start`/`custom_end` are only read for [`DatePreset::Custom`]; if either
/// is missing the range stays unbounded until the caller supplies both.
/// Returns `None` when a bound falls outside the representable calendar.
pub fn resolve(
    preset: DatePreset,
    today: NaiveDate,
    custom_start: Option<NaiveDate>,
    custom_end: Option<NaiveDate>,
) -> Option<DateRange> {
    match preset {
        DatePreset::Today => DateRange::days(today, today),
        DatePreset::Yesterday => {
            let yesterday = today.pred_opt()?;
            DateRange::days(yesterday, yesterday)
        }
        DatePreset::ThisWeek => {
            let from_monday = u64::from(today.weekday().num_days_from_monday());
            let monday = today.checked_sub_days(Days::new(from_monday))?;
            DateRange::days(monday, monday.checked_add_days(Days::new(6))?)
        }
        DatePreset::ThisMonth => DateRange::days(first_of_month(today)?, last_of_month(today)?),
        DatePreset::LastMonth => {
            let previous = first_of_month(today)?.pred_opt()?;
            DateRange::days(first_of_month(previous)?, previous)
        }
        DatePreset::ThisYear => DateRange::days(
            NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
            NaiveDate::from_ymd_opt(today.year(), 12, 31)?,
        ),
        DatePreset::Custom => match (custom_start, custom_end) {
            (Some(start), Some(end)) => DateRange::days(start, end),
            _ => Some(DateRange::unbounded()),
        },
        DatePreset::All => Some(DateRange::unbounded()),
    }
}
