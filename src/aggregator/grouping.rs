use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::model::AttendanceRecord;

/// All records created on one organization-local calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub records: Vec<AttendanceRecord>,
}

/// Day buckets, newest first. One page is one day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayPages {
    buckets: Vec<DayBucket>,
}

fn clock_in_key(record: &AttendanceRecord) -> i64 {
    record.clock_in.map_or(0, |t| t.timestamp_millis())
}

impl DayPages {
    pub fn group(records: Vec<AttendanceRecord>, tz: &Tz) -> Self {
        let mut by_day: BTreeMap<NaiveDate, Vec<AttendanceRecord>> = BTreeMap::new();
        for record in records {
            let day = record.created_at.with_timezone(tz).date_naive();
            by_day.entry(day).or_default().push(record);
        }

        let buckets = by_day
            .into_iter()
            .rev()
            .map(|(date, mut records)| {
                records.sort_by_key(clock_in_key);
                DayBucket { date, records }
            })
            .collect();

        DayPages { buckets }
    }

    pub fn page_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// 1-based page lookup. Out-of-range pages are `None`.
    pub fn page(&self, page: usize) -> Option<&DayBucket> {
        page.checked_sub(1).and_then(|index| self.buckets.get(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DayBucket> {
        self.buckets.iter()
    }

    pub fn into_page(self, page: usize) -> Option<DayBucket> {
        page.checked_sub(1)
            .and_then(|index| self.buckets.into_iter().nth(index))
    }
}
