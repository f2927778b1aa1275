use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Closed set of attendance status tags as the backend spells them.
///
/// Anything outside the set (or a missing tag) lands in [`AttendanceStatus::Unknown`]
/// so a single bad record cannot take down a whole view.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum AttendanceStatus {
    Present,
    Completed,
    Absent,
    #[strum(serialize = "Late IN")]
    LateIn,
    #[strum(serialize = "Half Day")]
    HalfDay,
    #[strum(serialize = "Early Out")]
    EarlyOut,
    #[strum(serialize = "Late IN and Early Out")]
    LateInAndEarlyOut,
    #[strum(serialize = "Sick Leave")]
    SickLeave,
    #[strum(serialize = "Casual Leave")]
    CasualLeave,
    #[strum(serialize = "Annual Leave")]
    AnnualLeave,
    #[strum(serialize = "Maternity Leave")]
    MaternityLeave,
    #[strum(serialize = "Paternity Leave")]
    PaternityLeave,
    #[strum(serialize = "Unpaid Leave")]
    UnpaidLeave,
    #[strum(serialize = "Emergency Leave")]
    EmergencyLeave,
    #[strum(serialize = "Public Holiday")]
    PublicHoliday,
    #[default]
    Unknown,
}

/// How a status feeds the headline statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusClass {
    pub is_leave: bool,
    pub counts_as_attendance: bool,
}

impl AttendanceStatus {
    /// Product policy table. Absent and Unknown are the only statuses that do
    /// not count towards the attendance rate.
    pub const fn class(self) -> StatusClass {
        use AttendanceStatus::*;
        match self {
            Present | Completed | LateIn | HalfDay | EarlyOut | LateInAndEarlyOut
            | PublicHoliday => StatusClass {
                is_leave: false,
                counts_as_attendance: true,
            },
            SickLeave | CasualLeave | AnnualLeave | MaternityLeave | PaternityLeave
            | UnpaidLeave | EmergencyLeave => StatusClass {
                is_leave: true,
                counts_as_attendance: true,
            },
            Absent | Unknown => StatusClass {
                is_leave: false,
                counts_as_attendance: false,
            },
        }
    }

    pub const fn is_leave(self) -> bool {
        self.class().is_leave
    }

    pub const fn counts_as_attendance(self) -> bool {
        self.class().counts_as_attendance
    }

    /// Lenient parse used for backend payloads: unrecognised tags become `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        tag.trim().parse().unwrap_or(AttendanceStatus::Unknown)
    }
}

impl Serialize for AttendanceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_ref())
    }
}

impl<'de> Deserialize<'de> for AttendanceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .map(AttendanceStatus::from_tag)
            .unwrap_or_default())
    }
}

/// Status control of a view: either every status or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AttendanceStatus),
}

impl std::str::FromStr for StatusFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "All" {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

impl StatusFilter {
    pub fn matches(self, status: AttendanceStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}
