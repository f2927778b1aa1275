use std::sync::{Arc, Mutex};

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::{Value, json};

use hrm_attendance::backend::{RecordSource, parse_records};
use hrm_attendance::model::AttendanceRecord;
use hrm_attendance::routes;
use hrm_attendance::state::AppState;

struct StaticSource {
    records: Vec<AttendanceRecord>,
    seen_authorization: Mutex<Option<String>>,
}

#[async_trait]
impl RecordSource for StaticSource {
    async fn fetch_records(
        &self,
        authorization: Option<&str>,
    ) -> anyhow::Result<Vec<AttendanceRecord>> {
        *self.seen_authorization.lock().unwrap() = authorization.map(str::to_string);
        Ok(self.records.clone())
    }
}

struct FailingSource;

#[async_trait]
impl RecordSource for FailingSource {
    async fn fetch_records(&self, _: Option<&str>) -> anyhow::Result<Vec<AttendanceRecord>> {
        Err(anyhow!("connection refused"))
    }
}

fn backend_payload() -> Value {
    json!([
        {
            "_id": "r1",
            "user": { "_id": "u1", "name": "Ali Khan", "jobTitle": "Designer" },
            "clockInTime": "2024-01-05T09:30:00Z",
            "clockOutTime": "2024-01-05T17:00:00Z",
            "duration": 27000,
            "type": "Present",
            "createdAt": "2024-01-05T09:30:00Z"
        },
        {
            "_id": "r2",
            "user": { "_id": "u2", "name": "Sally", "jobTitle": "Developer" },
            "clockInTime": null,
            "clockOutTime": null,
            "duration": 0,
            "type": "Absent",
            "createdAt": "2024-01-05T08:00:00Z"
        },
        {
            "_id": "r3",
            "user": { "_id": "u3", "name": "ALISHA", "jobTitle": "Developer" },
            "clockInTime": "2024-01-05T08:45:00Z",
            "clockOutTime": "2024-01-05T17:15:00Z",
            "duration": 30600,
            "type": "Completed",
            "createdAt": "2024-01-05T08:45:00Z"
        },
        {
            "_id": "r4",
            "user": { "_id": "u1", "name": "Ali Khan", "jobTitle": "Designer" },
            "clockInTime": null,
            "clockOutTime": null,
            "duration": 0,
            "type": "Sick Leave",
            "createdAt": "2024-01-06T07:00:00Z"
        }
    ])
}

fn static_state() -> (AppState, Arc<StaticSource>) {
    let source = Arc::new(StaticSource {
        records: parse_records(backend_payload()).unwrap(),
        seen_authorization: Mutex::new(None),
    });
    (AppState::new(source.clone(), chrono_tz::Tz::UTC), source)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .service(web::scope("/api").configure(routes::attendance_routes)),
        )
        .await
    };
}

#[actix_web::test]
async fn all_preset_returns_newest_day_first() {
    let (state, _) = static_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/attendance?preset=All&as_of=2024-01-07")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["page"], 1);
    assert_eq!(body["page_count"], 2);
    assert_eq!(body["total"], 4);
    assert_eq!(body["day"]["date"], "2024-01-06");
    assert_eq!(body["day"]["records"][0]["type"], "Sick Leave");
    assert_eq!(
        body["counts"],
        json!({ "Present": 1, "Completed": 1, "Absent": 1, "Sick Leave": 1 })
    );
    assert_eq!(body["statistics"]["total_days"], 4);
    assert_eq!(body["statistics"]["leaves"], 1);
    assert_eq!(body["statistics"]["attendance_rate"], 75.0);
}

#[actix_web::test]
async fn second_page_is_sorted_by_clock_in() {
    let (state, _) = static_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/attendance?page=2")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["day"]["date"], "2024-01-05");
    let ids: Vec<&str> = body["day"]["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["r2", "r3", "r1"]);
}

#[actix_web::test]
async fn page_past_the_last_day_has_no_bucket() {
    let (state, _) = static_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/attendance?page=9")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["page_count"], 2);
    assert!(body["day"].is_null());
}

#[actix_web::test]
async fn today_preset_without_records_is_empty() {
    let (state, _) = static_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/attendance/stats?preset=Today&as_of=2024-01-07")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 0);
    assert_eq!(body["counts"], json!({}));
    assert_eq!(body["statistics"]["attendance_rate"], 0.0);
    assert_eq!(body["statistics"]["leave_rate"], 0.0);
    assert_eq!(body["range"]["start"], "2024-01-07T00:00:00");
    assert_eq!(body["range"]["end"], "2024-01-07T23:59:59.999");
}

#[actix_web::test]
async fn search_and_status_filters_apply() {
    let (state, _) = static_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/attendance/stats?search=ali")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 3);

    let req = test::TestRequest::get()
        .uri("/api/attendance/stats?search=ali&status=Sick%20Leave")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["statistics"]["leave_rate"], 100.0);
}

#[actix_web::test]
async fn custom_range_with_one_bound_is_unfiltered() {
    let (state, _) = static_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/attendance/stats?preset=Custom&start=2024-01-06")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 4);
    assert!(body["range"]["start"].is_null());

    let req = test::TestRequest::get()
        .uri("/api/attendance/stats?preset=Custom&start=2024-01-06&end=2024-01-06")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
}

#[actix_web::test]
async fn user_details_are_limited_to_the_user() {
    let (state, _) = static_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/attendance/users/u1?preset=This%20Week&as_of=2024-01-07")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 2);
    assert_eq!(body["page_count"], 2);
    assert_eq!(body["statistics"]["total_duration_secs"], 27000);
    assert_eq!(body["range"]["preset"], "This Week");
}

#[actix_web::test]
async fn job_titles_are_listed() {
    let (state, _) = static_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/attendance/job-titles")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], json!(["Designer", "Developer"]));
}

#[actix_web::test]
async fn authorization_is_forwarded_to_the_source() {
    let (state, source) = static_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/attendance")
        .insert_header(("Authorization", "Bearer token-1"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        source.seen_authorization.lock().unwrap().as_deref(),
        Some("Bearer token-1")
    );
}

#[actix_web::test]
async fn unknown_status_filter_is_a_bad_request() {
    let (state, _) = static_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/attendance?status=Holiday")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Unknown status filter: Holiday");
}

#[actix_web::test]
async fn backend_failure_is_a_one_line_error() {
    let app = app!(AppState::new(Arc::new(FailingSource), chrono_tz::Tz::UTC));

    let req = test::TestRequest::get().uri("/api/attendance").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Failed to load attendance records" }));
}

#[actix_web::test]
async fn malformed_query_is_a_json_bad_request() {
    let (state, _) = static_state();
    let app = app!(state);

    for uri in [
        "/api/attendance?preset=Weekly",
        "/api/attendance/stats?as_of=garbage",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");

        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].is_string(), "{uri}: {body}");
    }
}

#[actix_web::test]
async fn preset_outside_the_calendar_is_a_bad_request() {
    let (state, _) = static_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/attendance/stats?preset=Yesterday&as_of=-262143-01-01")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "message": "Date range is outside the supported calendar" })
    );
}
