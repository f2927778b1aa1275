use crate::api::{attendance, health};
use crate::error::ApiError;
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::anyhow;
use std::sync::Arc;

pub type RateLimiter = Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

/// Per-client limiter allowing `requests_per_min` with an equal burst.
pub fn build_limiter(requests_per_min: u32) -> anyhow::Result<RateLimiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);

    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("Invalid rate limit: {requests_per_min} per minute"))?;

    Ok(Arc::new(Governor::new(&cfg)))
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str, limiter: RateLimiter) {
    cfg.service(health::health);

    cfg.service(
        web::scope(api_prefix)
            .wrap(limiter) // rate limiting
            .configure(attendance_routes),
    );
}

/// Attendance views, mounted under the API prefix.
pub fn attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            // malformed query strings get the same JSON body as other 400s
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
            )
            // /attendance
            .service(web::resource("").route(web::get().to(attendance::attendance_view)))
            // /attendance/stats
            .service(web::resource("/stats").route(web::get().to(attendance::attendance_stats)))
            // /attendance/job-titles
            .service(web::resource("/job-titles").route(web::get().to(attendance::job_titles)))
            // /attendance/users/{user_id}
            .service(
                web::resource("/users/{user_id}")
                    .route(web::get().to(attendance::user_attendance)),
            ),
    );
}
