use chrono::NaiveDate;
use chrono_tz::Tz;

use super::date_range::{self, DatePreset, DateRange};
use crate::model::{AttendanceRecord, StatusFilter};

/// Current state of the filter controls on an attendance view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceFilter {
    pub preset: DatePreset,
    pub custom_start: Option<NaiveDate>,
    pub custom_end: Option<NaiveDate>,
    /// `None`, empty or `"All"` disables the job-title stage.
    pub job_title: Option<String>,
    pub search: String,
    pub status: StatusFilter,
    /// Restricts the view to one user (user details page).
    pub user_id: Option<String>,
}

impl AttendanceFilter {
    /// `None` when the preset cannot be resolved around `today`.
    pub fn date_range(&self, today: NaiveDate) -> Option<DateRange> {
        date_range::resolve(self.preset, today, self.custom_start, self.custom_end)
    }

    fn job_title(&self) -> Option<&str> {
        self.job_title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty() && *title != "All")
    }

    fn search_needle(&self) -> Option<String> {
        let needle = self.search.trim();
        (!needle.is_empty()).then(|| needle.to_lowercase())
    }
}

/// Run the filter stages in order: date range, job title, name search, status, user.
///
/// Each stage passes everything through when its control is at its "no filter"
/// value. Input order is kept. `None` when the date range cannot be resolved.
pub fn filter_records(
    records: &[AttendanceRecord],
    filter: &AttendanceFilter,
    today: NaiveDate,
    tz: &Tz,
) -> Option<Vec<AttendanceRecord>> {
    let range = filter.date_range(today)?;
    let job_title = filter.job_title();
    let needle = filter.search_needle();
    let user_id = filter.user_id.as_deref();

    let filtered = records
        .iter()
        .filter(|r| range.contains_instant(&r.created_at, tz))
        .filter(|r| job_title.is_none_or(|title| r.user.job_title.trim() == title))
        .filter(|r| {
            needle
                .as_deref()
                .is_none_or(|needle| r.user.name.to_lowercase().contains(needle))
        })
        .filter(|r| filter.status.matches(r.status))
        .filter(|r| user_id.is_none_or(|id| r.user.id == id))
        .cloned()
        .collect();
    Some(filtered)
}
