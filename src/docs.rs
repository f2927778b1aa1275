use crate::aggregator::StatisticsSummary;
use crate::api::attendance::{
    AttendanceStatsResponse, AttendanceViewResponse, DayBucketResponse, JobTitlesResponse,
    RangeResponse,
};
use crate::model::{AttendanceRecord, UserRef};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance API",
        version = "1.0.0",
        description = r#"
## Attendance views for the HRM system

Read-only views over the attendance records held by the HR backend. Every view
runs the same pipeline:

1. date-range preset (`Today`, `Yesterday`, `This Week`, `This Month`, `Last Month`, `This Year`, `All`, `Custom`)
2. job title, user name search, status
3. grouping by calendar day in the organization time zone, newest day first

### Pagination
One page is one calendar day. `page_count` is the number of distinct days.

### Security
The `Authorization` header is forwarded to the backend untouched.
"#,
    ),
    paths(
        crate::api::attendance::attendance_view,
        crate::api::attendance::user_attendance,
        crate::api::attendance::attendance_stats,
        crate::api::attendance::job_titles,
        crate::api::health::health
    ),
    components(
        schemas(
            AttendanceRecord,
            UserRef,
            RangeResponse,
            DayBucketResponse,
            AttendanceViewResponse,
            AttendanceStatsResponse,
            JobTitlesResponse,
            StatisticsSummary
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Attendance", description = "Attendance aggregation views"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Prefix the attendance paths are declared under.
const DOCUMENTED_PREFIX: &str = "/api";

/// The OpenAPI document with attendance paths moved under `api_prefix`.
pub fn openapi_for_prefix(api_prefix: &str) -> openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let api_prefix = api_prefix.trim_end_matches('/');
    doc.paths.paths = std::mem::take(&mut doc.paths.paths)
        .into_iter()
        .map(|(path, item)| match path.strip_prefix(DOCUMENTED_PREFIX) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => {
                (format!("{api_prefix}{rest}"), item)
            }
            _ => (path, item),
        })
        .collect();
    doc
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
