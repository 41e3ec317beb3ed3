use serde::Deserialize;
use services::AppError;
use services::session::{
    AttendanceEntry, CreateSession, SessionClock, UpdateSession, parse_session_date,
};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(alias = "course")]
    pub course_id: String,

    #[serde(alias = "group")]
    pub group_id: String,

    #[validate(length(min = 1, message = "Date is required"))]
    pub date: String,

    #[validate(length(min = 1, message = "Start time is required"))]
    pub start_time: String,

    #[validate(length(min = 1, message = "End time is required"))]
    pub end_time: String,

    #[serde(default)]
    pub attendance: Vec<AttendanceEntry>,
}

impl CreateSessionRequest {
    pub fn into_params(self) -> Result<CreateSession, AppError> {
        Ok(CreateSession {
            date: parse_session_date(&self.date)?,
            start_time: self.start_time.parse()?,
            end_time: self.end_time.parse()?,
            course_id: self.course_id,
            group_id: self.group_id,
            attendance: self.attendance,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    #[validate(length(min = 1, message = "Start time must not be empty"))]
    pub start_time: Option<String>,

    #[validate(length(min = 1, message = "End time must not be empty"))]
    pub end_time: Option<String>,

    pub attendance: Option<Vec<AttendanceEntry>>,
}

impl UpdateSessionRequest {
    pub fn into_params(self) -> Result<UpdateSession, AppError> {
        let clock = |raw: Option<String>| raw.map(|r| r.parse::<SessionClock>()).transpose();
        Ok(UpdateSession {
            start_time: clock(self.start_time)?,
            end_time: clock(self.end_time)?,
            attendance: self.attendance,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    #[serde(alias = "session")]
    pub session_id: String,

    #[serde(alias = "student")]
    pub student_id: String,

    pub is_present: bool,
}
