use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::status::AttendanceStatus;

/// Owner of an attendance record, as embedded by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(alias = "_id", default, deserialize_with = "opaque_id")]
    #[schema(example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(example = "Ali Khan")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(example = "Designer")]
    pub job_title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(alias = "_id", default, deserialize_with = "opaque_id")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_user")]
    pub user: UserRef,

    #[serde(rename = "clockInTime", default, deserialize_with = "lenient_timestamp")]
    #[schema(example = "2024-01-05T09:00:00Z", format = "date-time", value_type = Option<String>)]
    pub clock_in: Option<DateTime<Utc>>,

    #[serde(rename = "clockOutTime", default, deserialize_with = "lenient_timestamp")]
    #[schema(example = "2024-01-05T17:30:00Z", format = "date-time", value_type = Option<String>)]
    pub clock_out: Option<DateTime<Utc>>,

    /// Worked time in seconds.
    #[serde(default, deserialize_with = "lenient_seconds")]
    #[schema(example = 30600)]
    pub duration: i64,

    #[serde(rename = "type", alias = "status", default)]
    #[schema(example = "Present", value_type = String)]
    pub status: AttendanceStatus,

    #[serde(default, deserialize_with = "lenient_created_at")]
    #[schema(example = "2024-01-05T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Office")]
    pub work_location: Option<String>,
}

fn opaque_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

// Some endpoints send the user unpopulated (bare id) or null.
fn lenient_user<'de, D: Deserializer<'de>>(deserializer: D) -> Result<UserRef, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        obj @ Value::Object(_) => serde_json::from_value(obj).unwrap_or_default(),
        Value::String(id) => UserRef {
            id,
            ..UserRef::default()
        },
        Value::Number(n) => UserRef {
            id: n.to_string(),
            ..UserRef::default()
        },
        _ => UserRef::default(),
    })
}

// Negative, non-finite or non-numeric durations read as 0.
fn lenient_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let seconds = value
        .as_i64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.round() as i64)
        })
        .unwrap_or(0);
    Ok(seconds.max(0))
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(Value::deserialize(deserializer)?
        .as_str()
        .and_then(parse_timestamp))
}

fn lenient_created_at<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    Ok(lenient_timestamp(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339 and zone-less ISO timestamps (read as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}
