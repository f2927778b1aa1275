use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use crate::backend::RecordSource;

/// Read-only state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RecordSource>,
    /// Day boundaries are taken in this zone, never the server's.
    pub timezone: Tz,
}

impl AppState {
    pub fn new(source: Arc<dyn RecordSource>, timezone: Tz) -> Self {
        Self { source, timezone }
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}
