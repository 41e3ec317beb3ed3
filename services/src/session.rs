//! Session/Attendance Engine.
//!
//! A session is created once with its roster; afterwards only presence flags
//! change (`mark_attendance`) or the roster is replaced wholesale by an update
//! that supplies a new attendance list.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use db::models::attendance_record::{self, ActiveModel as RecordActiveModel};
use db::models::session::{self, ActiveModel, Column, Entity, minutes_between};
use db::models::{course, group, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use std::str::FromStr;

use crate::error::AppError;
use crate::reference::{self, Predicate};
use crate::views::{self, SessionView};

/// A session bound as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionClock {
    /// A full instant.
    At(DateTime<Utc>),
    /// A wall-clock time on the session date, interpreted as UTC.
    Clock(NaiveTime),
}

impl SessionClock {
    pub fn resolve(self, date: NaiveDate) -> DateTime<Utc> {
        match self {
            SessionClock::At(instant) => instant,
            SessionClock::Clock(time) => date.and_time(time).and_utc(),
        }
    }
}

impl FromStr for SessionClock {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
            return Ok(SessionClock::At(instant.with_timezone(&Utc)));
        }
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map(SessionClock::Clock)
            .map_err(|_| {
                AppError::Validation(format!(
                    "'{raw}' is neither an RFC 3339 timestamp nor an HH:MM time"
                ))
            })
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, keeping only its UTC date.
pub fn parse_session_date(raw: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc).date_naive())
        .map_err(|_| AppError::Validation(format!("'{raw}' is not a valid date")))
}

/// One roster entry as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    #[serde(alias = "student")]
    pub student_id: String,
    pub is_present: bool,
}

#[derive(Debug, Clone)]
pub struct CreateSession {
    pub course_id: String,
    pub group_id: String,
    pub date: NaiveDate,
    pub start_time: SessionClock,
    pub end_time: SessionClock,
    pub attendance: Vec<AttendanceEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSession {
    pub start_time: Option<SessionClock>,
    pub end_time: Option<SessionClock>,
    pub attendance: Option<Vec<AttendanceEntry>>,
}

/// Minutes between the bounds, rejecting empty or inverted ranges.
pub fn session_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<f64, AppError> {
    let minutes = minutes_between(start, end);
    if minutes <= 0.0 {
        return Err(AppError::InvalidTimeRange);
    }
    Ok(minutes)
}

/// Validates roster students (role = student, one row per entry) and returns
/// the normalised roster.
async fn validate_roster<C: sea_orm::ConnectionTrait>(
    db: &C,
    entries: &[AttendanceEntry],
) -> Result<Vec<(String, bool)>, AppError> {
    let ids: Vec<String> = entries.iter().map(|e| e.student_id.clone()).collect();
    let students = reference::validate_exact::<user::Entity, C>(
        db,
        "attendance",
        &ids,
        Some(&Predicate::role(user::Role::Student)),
    )
    .await?;

    Ok(students
        .into_iter()
        .zip(entries.iter().map(|e| e.is_present))
        .collect())
}

pub struct SessionService;

impl SessionService {
    pub async fn create(db: &DatabaseConnection, params: CreateSession) -> Result<SessionView, AppError> {
        let txn = db.begin().await?;

        let course = reference::find_required::<course::Entity, _>(&txn, "courseId", &params.course_id).await?;
        let group = reference::find_required::<group::Entity, _>(&txn, "groupId", &params.group_id).await?;
        let roster = validate_roster(&txn, &params.attendance).await?;

        let start = params.start_time.resolve(params.date);
        let end = params.end_time.resolve(params.date);
        session_minutes(start, end)?;

        let session = session::Model::create(&txn, &course.id, &group.id, params.date, start, end).await?;
        attendance_record::Model::insert_roster(&txn, &session.id, &roster).await?;

        txn.commit().await?;

        tracing::info!(
            session_id = %session.id,
            course_id = %session.course_id,
            group_id = %session.group_id,
            roster = roster.len(),
            "session created"
        );
        Ok(views::session_view(db, session).await?)
    }

    pub async fn get(db: &DatabaseConnection, id: &str) -> Result<SessionView, AppError> {
        let session = reference::find_required::<Entity, _>(db, "id", id).await?;
        Ok(views::session_view(db, session).await?)
    }

    /// Sessions of one course for one group, ordered by start time.
    pub async fn list_for(
        db: &DatabaseConnection,
        course_id: &str,
        group_id: &str,
    ) -> Result<Vec<SessionView>, AppError> {
        let course_id = reference::parse_id("courseId", course_id)?;
        let group_id = reference::parse_id("groupId", group_id)?;

        let sessions = Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::GroupId.eq(group_id))
            .order_by_asc(Column::StartTime)
            .all(db)
            .await?;

        let mut out = Vec::with_capacity(sessions.len());
        for session in sessions {
            out.push(views::session_view(db, session).await?);
        }
        Ok(out)
    }

    /// Partial update.
    ///
    /// A bound given as `HH:MM` resolves against the stored date. When either
    /// bound changes, `session_time` is recomputed from the effective pair. A
    /// supplied attendance list replaces the roster.
    pub async fn update(
        db: &DatabaseConnection,
        id: &str,
        params: UpdateSession,
    ) -> Result<SessionView, AppError> {
        let txn = db.begin().await?;
        let session = reference::find_required::<Entity, _>(&txn, "id", id).await?;

        let roster = match &params.attendance {
            Some(entries) => Some(validate_roster(&txn, entries).await?),
            None => None,
        };

        let mut active: ActiveModel = session.clone().into();

        if params.start_time.is_some() || params.end_time.is_some() {
            let start = params
                .start_time
                .map(|c| c.resolve(session.date))
                .unwrap_or(session.start_time);
            let end = params
                .end_time
                .map(|c| c.resolve(session.date))
                .unwrap_or(session.end_time);

            active.session_time = Set(session_minutes(start, end)?);
            active.start_time = Set(start);
            active.end_time = Set(end);
        }

        if let Some(roster) = &roster {
            attendance_record::Model::delete_roster(&txn, &session.id).await?;
            attendance_record::Model::insert_roster(&txn, &session.id, roster).await?;
        }

        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            session_id = %updated.id,
            session_time = updated.session_time,
            roster_replaced = roster.is_some(),
            "session updated"
        );
        Ok(views::session_view(db, updated).await?)
    }

    /// Removes the session and its roster. Course and group are untouched.
    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<(), AppError> {
        let txn = db.begin().await?;
        let session = reference::find_required::<Entity, _>(&txn, "id", id).await?;

        attendance_record::Model::delete_roster(&txn, &session.id).await?;
        Entity::delete_by_id(session.id.clone()).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(session_id = %session.id, "session deleted");
        Ok(())
    }

    /// Sets the presence flag of a student already on the roster.
    pub async fn mark_attendance(
        db: &DatabaseConnection,
        session_id: &str,
        student_id: &str,
        is_present: bool,
    ) -> Result<SessionView, AppError> {
        let txn = db.begin().await?;

        let session = reference::find_required::<Entity, _>(&txn, "sessionId", session_id).await?;
        let student_id = reference::require_target::<user::Entity, _>(
            &txn,
            "studentId",
            student_id,
            Some(&Predicate::role(user::Role::Student)),
        )
        .await?;

        let record = attendance_record::Entity::find()
            .filter(attendance_record::Column::SessionId.eq(session.id.as_str()))
            .filter(attendance_record::Column::StudentId.eq(student_id.as_str()))
            .order_by_asc(attendance_record::Column::Position)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::AttendanceRecordNotFound {
                session_id: session.id.clone(),
                student_id: student_id.clone(),
            })?;

        let mut active: RecordActiveModel = record.into();
        active.is_present = Set(is_present);
        active.update(&txn).await?;

        let mut touched: ActiveModel = session.into();
        touched.updated_at = Set(Utc::now());
        let session = touched.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(session_id = %session.id, student_id = %student_id, is_present, "attendance marked");
        Ok(views::session_view(db, session).await?)
    }
}
