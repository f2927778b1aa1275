use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{AttendanceRecord, AttendanceStatus};

pub type StatusCounts = BTreeMap<AttendanceStatus, usize>;

/// Occurrences of each status present in `records`. Absent tags are not zero-filled.
pub fn count_by_status<'a, I>(records: I) -> StatusCounts
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut counts = StatusCounts::new();
    for record in records {
        *counts.entry(record.status).or_default() += 1;
    }
    counts
}

/// Fixed-shape headline statistics for a record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct StatisticsSummary {
    #[schema(example = 22)]
    pub total_days: usize,
    pub present: usize,
    pub completed: usize,
    pub absent: usize,
    pub late_in: usize,
    pub half_day: usize,
    pub early_out: usize,
    pub late_in_and_early_out: usize,
    pub public_holiday: usize,
    /// Every leave subtype together.
    pub leaves: usize,
    pub unknown: usize,
    /// Records whose status counts towards attendance.
    pub attended: usize,
    #[schema(example = 95.45)]
    pub attendance_rate: f64,
    #[schema(example = 9.09)]
    pub leave_rate: f64,
    pub total_duration_secs: i64,
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

impl StatisticsSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a AttendanceRecord>,
    {
        let mut stats = StatisticsSummary::default();
        for record in records {
            stats.total_days += 1;
            stats.total_duration_secs = stats.total_duration_secs.saturating_add(record.duration);

            let class = record.status.class();
            if class.counts_as_attendance {
                stats.attended += 1;
            }
            if class.is_leave {
                stats.leaves += 1;
                continue;
            }
            let counter = match record.status {
                AttendanceStatus::Present => &mut stats.present,
                AttendanceStatus::Completed => &mut stats.completed,
                AttendanceStatus::Absent => &mut stats.absent,
                AttendanceStatus::LateIn => &mut stats.late_in,
                AttendanceStatus::HalfDay => &mut stats.half_day,
                AttendanceStatus::EarlyOut => &mut stats.early_out,
                AttendanceStatus::LateInAndEarlyOut => &mut stats.late_in_and_early_out,
                AttendanceStatus::PublicHoliday => &mut stats.public_holiday,
                _ => &mut stats.unknown,
            };
            *counter += 1;
        }

        stats.attendance_rate = percent(stats.attended, stats.total_days);
        stats.leave_rate = percent(stats.leaves, stats.total_days);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_status(status: AttendanceStatus, duration: i64) -> AttendanceRecord {
        AttendanceRecord {
            status,
            duration,
            ..AttendanceRecord::default()
        }
    }

    #[test]
    fn counts_only_present_tags_and_sum_to_len() {
        let records = vec![
            with_status(AttendanceStatus::Present, 0),
            with_status(AttendanceStatus::Present, 0),
            with_status(AttendanceStatus::SickLeave, 0),
            with_status(AttendanceStatus::Unknown, 0),
        ];
        let counts = count_by_status(&records);
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&AttendanceStatus::Present], 2);
        assert!(!counts.contains_key(&AttendanceStatus::Absent));
        assert_eq!(counts.values().sum::<usize>(), records.len());
    }

    #[test]
    fn empty_set_has_zero_rates() {
        let none: Vec<AttendanceRecord> = Vec::new();
        let stats = StatisticsSummary::from_records(&none);
        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.attendance_rate, 0.0);
        assert_eq!(stats.leave_rate, 0.0);
        assert!(count_by_status(&none).is_empty());
    }

    #[test]
    fn rates_follow_the_policy_table() {
        let records = vec![
            with_status(AttendanceStatus::Completed, 28_800),
            with_status(AttendanceStatus::LateInAndEarlyOut, 14_400),
            with_status(AttendanceStatus::AnnualLeave, 0),
            with_status(AttendanceStatus::Absent, 0),
        ];
        let stats = StatisticsSummary::from_records(&records);
        assert_eq!(stats.total_days, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.late_in_and_early_out, 1);
        assert_eq!(stats.absent, 1);
        assert_eq!(stats.leaves, 1);
        assert_eq!(stats.attended, 3);
        assert_eq!(stats.attendance_rate, 75.0);
        assert_eq!(stats.leave_rate, 25.0);
        assert_eq!(stats.total_duration_secs, 43_200);
    }

    #[test]
    fn unknown_tags_do_not_count_as_attendance() {
        let records = vec![
            with_status(AttendanceStatus::Unknown, 0),
            with_status(AttendanceStatus::PublicHoliday, 0),
        ];
        let stats = StatisticsSummary::from_records(&records);
        assert_eq!(stats.unknown, 1);
        assert_eq!(stats.public_holiday, 1);
        assert_eq!(stats.attendance_rate, 50.0);
        assert_eq!(stats.leave_rate, 0.0);
    }

    #[test]
    fn total_duration_saturates() {
        let records = vec![
            with_status(AttendanceStatus::Completed, 9_000_000_000_000_000_000),
            with_status(AttendanceStatus::Completed, 9_000_000_000_000_000_000),
        ];
        let stats = StatisticsSummary::from_records(&records);
        assert_eq!(stats.total_duration_secs, i64::MAX);
        assert_eq!(stats.completed, 2);
    }
}
