use actix_web::{HttpRequest, HttpResponse, http::header, web};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::aggregator::{
    self, AttendanceFilter, AttendanceView, DatePreset, DayBucket, DateRange, StatisticsSummary,
    StatusCounts,
};
use crate::error::ApiError;
use crate::model::{AttendanceRecord, StatusFilter};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Date-range preset, defaults to `All`
    #[param(value_type = Option<String>, example = "This Month")]
    pub preset: Option<DatePreset>,
    /// First day of a `Custom` range
    #[param(value_type = Option<String>, example = "2024-01-01")]
    pub start: Option<NaiveDate>,
    /// Last day of a `Custom` range (inclusive)
    #[param(value_type = Option<String>, example = "2024-01-31")]
    pub end: Option<NaiveDate>,
    /// Exact job title, `All` for every title
    #[param(example = "Designer")]
    pub job_title: Option<String>,
    /// Case-insensitive substring of the user name
    #[param(example = "ali")]
    pub search: Option<String>,
    /// Status tag, `All` for every status
    #[param(example = "Sick Leave")]
    pub status: Option<String>,
    /// Overrides "today" for preset resolution
    #[param(value_type = Option<String>, example = "2024-01-07")]
    pub as_of: Option<NaiveDate>,
    /// 1-based page; each page is one calendar day
    #[param(example = 1)]
    pub page: Option<usize>,
}

impl AttendanceQuery {
    pub fn to_filter(&self, user_id: Option<String>) -> Result<AttendanceFilter, ApiError> {
        let status = match self.status.as_deref() {
            Some(raw) => raw
                .parse::<StatusFilter>()
                .map_err(|_| ApiError::BadRequest(format!("Unknown status filter: {raw}")))?,
            None => StatusFilter::All,
        };

        Ok(AttendanceFilter {
            preset: self.preset.unwrap_or_default(),
            custom_start: self.start,
            custom_end: self.end,
            job_title: self.job_title.clone(),
            search: self.search.clone().unwrap_or_default(),
            status,
            user_id,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RangeResponse {
    #[schema(value_type = String, example = "This Month")]
    pub preset: DatePreset,
    #[schema(value_type = Option<String>, format = "date-time", example = "2024-01-01T00:00:00")]
    pub start: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = "date-time", example = "2024-01-31T23:59:59.999")]
    pub end: Option<NaiveDateTime>,
}

impl RangeResponse {
    fn new(preset: DatePreset, range: DateRange) -> Self {
        Self {
            preset,
            start: range.start,
            end: range.end,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DayBucketResponse {
    #[schema(value_type = String, format = "date", example = "2024-01-05")]
    pub date: NaiveDate,
    pub records: Vec<AttendanceRecord>,
}

impl From<DayBucket> for DayBucketResponse {
    fn from(bucket: DayBucket) -> Self {
        Self {
            date: bucket.date,
            records: bucket.records,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "range": { "preset": "All", "start": null, "end": null },
    "page": 1,
    "page_count": 2,
    "total": 4,
    "day": {
        "date": "2024-01-06",
        "records": [{
            "id": "65a1f0c2e4b0a1b2c3d4e5f6",
            "user": { "id": "u-1", "name": "Ali Khan", "jobTitle": "Designer" },
            "clockInTime": null,
            "clockOutTime": null,
            "duration": 0,
            "type": "Sick Leave",
            "createdAt": "2024-01-06T09:00:00Z"
        }]
    },
    "counts": { "Present": 1, "Completed": 1, "Absent": 1, "Sick Leave": 1 },
    "statistics": { "total_days": 4, "leaves": 1, "attendance_rate": 75.0, "leave_rate": 25.0 }
}))]
pub struct AttendanceViewResponse {
    pub range: RangeResponse,
    pub page: usize,
    pub page_count: usize,
    /// Records in the filtered set, across all pages
    pub total: usize,
    /// Bucket for the requested day page, absent when the page is out of range
    pub day: Option<DayBucketResponse>,
    #[schema(value_type = Object)]
    pub counts: StatusCounts,
    pub statistics: StatisticsSummary,
}

impl AttendanceViewResponse {
    fn new(preset: DatePreset, page: usize, view: AttendanceView) -> Self {
        let page_count = view.pages.page_count();
        Self {
            range: RangeResponse::new(preset, view.range),
            page,
            page_count,
            total: view.total,
            day: view.pages.into_page(page).map(DayBucketResponse::from),
            counts: view.counts,
            statistics: view.statistics,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceStatsResponse {
    pub range: RangeResponse,
    pub total: usize,
    #[schema(value_type = Object)]
    pub counts: StatusCounts,
    pub statistics: StatisticsSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobTitlesResponse {
    #[schema(example = json!(["Designer", "Developer"]))]
    pub data: Vec<String>,
}

fn authorization(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

async fn load_records(
    state: &AppState,
    req: &HttpRequest,
) -> Result<Vec<AttendanceRecord>, ApiError> {
    state
        .source
        .fetch_records(authorization(req))
        .await
        .map_err(|e| {
            error!(error = %format!("{e:#}"), "Attendance fetch failed");
            ApiError::Upstream(e)
        })
}

fn out_of_calendar() -> ApiError {
    ApiError::BadRequest("Date range is outside the supported calendar".to_string())
}

/// Fetches the record set and runs it through the shared aggregation pipeline.
async fn run_aggregate(
    state: &AppState,
    req: &HttpRequest,
    query: &AttendanceQuery,
    user_id: Option<String>,
) -> Result<(DatePreset, AttendanceView), ApiError> {
    let filter = query.to_filter(user_id)?;
    let today = query.as_of.unwrap_or_else(|| state.today());
    // Reject unresolvable ranges before touching the backend.
    filter.date_range(today).ok_or_else(out_of_calendar)?;

    let records = load_records(state, req).await?;
    let view = aggregator::aggregate(&records, &filter, today, &state.timezone)
        .ok_or_else(out_of_calendar)?;
    debug!(
        fetched = records.len(),
        filtered = view.total,
        days = view.pages.page_count(),
        "Attendance view built"
    );

    Ok((filter.preset, view))
}

async fn build_view(
    state: &AppState,
    req: &HttpRequest,
    query: &AttendanceQuery,
    user_id: Option<String>,
) -> Result<AttendanceViewResponse, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let (preset, view) = run_aggregate(state, req, query, user_id).await?;
    Ok(AttendanceViewResponse::new(preset, page, view))
}

/// Attendance management view: filtered records, one day per page
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Filtered, day-paged attendance", body = AttendanceViewResponse),
        (status = 400, description = "Invalid filter", body = Object, example = json!({
            "message": "Unknown status filter: Holiday"
        })),
        (status = 502, description = "Backend unavailable", body = Object, example = json!({
            "message": "Failed to load attendance records"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(name = "attendance_view", skip(req, state, query), fields(preset = ?query.preset))]
pub async fn attendance_view(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, ApiError> {
    let response = build_view(&state, &req, &query, None).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// One user's attendance history
#[utoipa::path(
    get,
    path = "/api/attendance/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "Backend id of the user"),
        AttendanceQuery
    ),
    responses(
        (status = 200, description = "The user's day-paged attendance", body = AttendanceViewResponse),
        (status = 400, description = "Invalid filter"),
        (status = 502, description = "Backend unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(name = "user_attendance", skip(req, state, query))]
pub async fn user_attendance(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let response = build_view(&state, &req, &query, Some(user_id)).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Headline statistics for the filtered set
#[utoipa::path(
    get,
    path = "/api/attendance/stats",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Status counts and rates", body = AttendanceStatsResponse),
        (status = 400, description = "Invalid filter"),
        (status = 502, description = "Backend unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(name = "attendance_stats", skip(req, state, query), fields(preset = ?query.preset))]
pub async fn attendance_stats(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, ApiError> {
    let (preset, view) = run_aggregate(&state, &req, &query, None).await?;
    let response = AttendanceStatsResponse {
        range: RangeResponse::new(preset, view.range),
        total: view.total,
        counts: view.counts,
        statistics: view.statistics,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Job titles available to the job-title filter
#[utoipa::path(
    get,
    path = "/api/attendance/job-titles",
    responses(
        (status = 200, description = "Distinct job titles", body = JobTitlesResponse),
        (status = 502, description = "Backend unavailable")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(name = "attendance_job_titles", skip(req, state))]
pub async fn job_titles(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let records = load_records(&state, &req).await?;
    Ok(HttpResponse::Ok().json(JobTitlesResponse {
        data: aggregator::job_titles(&records),
    }))
}
