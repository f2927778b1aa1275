//! Pure attendance aggregation: filter, group by day, summarize.
//!
//! Every attendance view (management table, per-user details, stats cards) goes
//! through [`aggregate`] so they cannot drift apart.

pub mod date_range;
pub mod filter;
pub mod grouping;
pub mod summary;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use chrono_tz::Tz;

pub use date_range::{DatePreset, DateRange};
pub use filter::{AttendanceFilter, filter_records};
pub use grouping::{DayBucket, DayPages};
pub use summary::{StatisticsSummary, StatusCounts, count_by_status};

use crate::model::AttendanceRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceView {
    pub range: DateRange,
    /// Size of the filtered set.
    pub total: usize,
    pub pages: DayPages,
    pub counts: StatusCounts,
    pub statistics: StatisticsSummary,
}

/// Runs the whole pipeline once. `None` when the filter's date range falls
/// outside the representable calendar.
pub fn aggregate(
    records: &[AttendanceRecord],
    filter: &AttendanceFilter,
    today: NaiveDate,
    tz: &Tz,
) -> Option<AttendanceView> {
    let range = filter.date_range(today)?;
    let filtered = filter_records(records, filter, today, tz)?;
    let counts = count_by_status(&filtered);
    let statistics = StatisticsSummary::from_records(&filtered);

    Some(AttendanceView {
        range,
        total: filtered.len(),
        pages: DayPages::group(filtered, tz),
        counts,
        statistics,
    })
}

/// Distinct non-empty job titles, sorted, for the job-title filter control.
pub fn job_titles(records: &[AttendanceRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.user.job_title.trim())
        .filter(|title| !title.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
