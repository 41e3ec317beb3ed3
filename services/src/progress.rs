//! Progress Calculator.
//!
//! Recomputed on every call from the sessions recorded for a course; nothing
//! is cached.

use db::models::{course, session};
use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::error::AppError;
use crate::reference;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub course_id: String,
    /// `<number>.<2 digits>%`, not clamped at 100.
    pub progress: String,
}

/// Hours covered by the given sessions, measured from their bounds.
pub fn recorded_hours(sessions: &[session::Model]) -> f64 {
    sessions
        .iter()
        .map(|s| (s.end_time - s.start_time).num_milliseconds() as f64 / MILLIS_PER_HOUR)
        .fold(0.0, |acc, hours| acc + hours)
}

/// `recorded / total * 100`. A non-positive or non-finite total is rejected.
pub fn percentage(recorded_hours: f64, total_duration: f64) -> Option<f64> {
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return None;
    }
    Some(recorded_hours / total_duration * 100.0)
}

pub fn format_percentage(value: f64) -> String {
    format!("{value:.2}%")
}

pub async fn course_progress<C: ConnectionTrait>(
    db: &C,
    course_id: &str,
) -> Result<CourseProgress, AppError> {
    let course = reference::find_required::<course::Entity, C>(db, "courseId", course_id).await?;
    let sessions = session::Model::find_by_course(db, &course.id).await?;

    let hours = recorded_hours(&sessions);
    let value = percentage(hours, course.total_duration)
        .ok_or_else(|| AppError::InvalidCourseDuration(course.id.clone()))?;

    tracing::debug!(course_id = %course.id, sessions = sessions.len(), hours, "progress computed");
    Ok(CourseProgress {
        course_id: course.id,
        progress: format_percentage(value),
    })
}
