pub mod attendance;
pub mod status;

pub use attendance::{AttendanceRecord, UserRef};
pub use status::{AttendanceStatus, StatusClass, StatusFilter};
