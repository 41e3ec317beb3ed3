//! Reference-expanded projections returned by every read and write.
//!
//! A set-valued reference whose target no longer exists is skipped; a
//! single-valued one becomes `null`.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use db::association::{self, Association, CourseFiles, CourseGroups, GroupCourses, GroupStudents};
use db::collection::Collection;
use db::models::{attendance_record, course, file, group, session, user};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub id: String,
    pub filename: String,
    pub file_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: String,
    pub name: String,
}

impl From<user::Model> for UserSummary {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
        }
    }
}

impl From<file::Model> for FileSummary {
    fn from(m: file::Model) -> Self {
        Self {
            id: m.id,
            filename: m.filename,
            file_path: m.file_path,
        }
    }
}

impl From<group::Model> for GroupSummary {
    fn from(m: group::Model) -> Self {
        Self { id: m.id, name: m.name }
    }
}

impl From<course::Model> for CourseSummary {
    fn from(m: course::Model) -> Self {
        Self { id: m.id, name: m.name }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: user::Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user::Model> for UserView {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
            role: m.role,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseView {
    pub id: String,
    pub name: String,
    pub teacher_id: String,
    pub teacher: Option<UserSummary>,
    pub files: Vec<FileSummary>,
    pub groups: Vec<GroupSummary>,
    pub total_duration: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub id: String,
    pub name: String,
    pub students: Vec<UserSummary>,
    pub courses: Vec<CourseSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileView {
    pub id: String,
    pub filename: String,
    pub file_path: String,
    pub course_id: String,
    pub course: Option<CourseSummary>,
    pub section: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceView {
    pub student_id: String,
    pub student: Option<UserSummary>,
    pub is_present: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: String,
    pub course_id: String,
    pub course: Option<CourseSummary>,
    pub group_id: String,
    pub group: Option<GroupSummary>,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Minutes.
    pub session_time: f64,
    /// Hours, derived from `session_time`.
    pub duration: f64,
    pub attendance: Vec<AttendanceView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Loads rows by id, returned in the order of `ids`. Missing rows are skipped.
async fn load_in_order<E, C, F>(db: &C, ids: &[String], id_of: F) -> Result<Vec<E::Model>, DbErr>
where
    E: Collection,
    C: ConnectionTrait,
    F: Fn(&E::Model) -> &str,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = E::find()
        .filter(E::id_column().is_in(ids.iter().cloned()))
        .all(db)
        .await?;
    let mut by_id: HashMap<String, E::Model> = rows
        .into_iter()
        .map(|row| (id_of(&row).to_owned(), row))
        .collect();

    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

async fn load_one<E, C>(db: &C, id: &str) -> Result<Option<E::Model>, DbErr>
where
    E: Collection,
    C: ConnectionTrait,
{
    E::find().filter(E::id_column().eq(id)).one(db).await
}

pub async fn user_summaries<C: ConnectionTrait>(
    db: &C,
    ids: &[String],
) -> Result<Vec<UserSummary>, DbErr> {
    let rows = load_in_order::<user::Entity, _, _>(db, ids, |m| &m.id).await?;
    Ok(rows.into_iter().map(UserSummary::from).collect())
}

/// Targets of an association, expanded with `F`.
async fn expand_set<A, C, T, F>(db: &C, owner: &str, id_of: F) -> Result<Vec<T>, DbErr>
where
    A: Association,
    C: ConnectionTrait,
    F: Fn(&<A::Target as EntityTrait>::Model) -> &str,
    T: From<<A::Target as EntityTrait>::Model>,
{
    let ids = association::targets::<A, C>(db, owner).await?;
    let rows = load_in_order::<A::Target, C, F>(db, &ids, id_of).await?;
    Ok(rows.into_iter().map(T::from).collect())
}

pub async fn course_view<C: ConnectionTrait>(db: &C, m: course::Model) -> Result<CourseView, DbErr> {
    let teacher = load_one::<user::Entity, _>(db, &m.teacher_id)
        .await?
        .map(UserSummary::from);
    let files = expand_set::<CourseFiles, _, FileSummary, _>(db, &m.id, |f| &f.id).await?;
    let groups = expand_set::<CourseGroups, _, GroupSummary, _>(db, &m.id, |g| &g.id).await?;

    Ok(CourseView {
        id: m.id,
        name: m.name,
        teacher_id: m.teacher_id,
        teacher,
        files,
        groups,
        total_duration: m.total_duration,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub async fn group_view<C: ConnectionTrait>(db: &C, m: group::Model) -> Result<GroupView, DbErr> {
    let students = expand_set::<GroupStudents, _, UserSummary, _>(db, &m.id, |u| &u.id).await?;
    let courses = expand_set::<GroupCourses, _, CourseSummary, _>(db, &m.id, |c| &c.id).await?;

    Ok(GroupView {
        id: m.id,
        name: m.name,
        students,
        courses,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub async fn file_view<C: ConnectionTrait>(db: &C, m: file::Model) -> Result<FileView, DbErr> {
    let course = load_one::<course::Entity, _>(db, &m.course_id)
        .await?
        .map(CourseSummary::from);

    Ok(FileView {
        id: m.id,
        filename: m.filename,
        file_path: m.file_path,
        course_id: m.course_id,
        course,
        section: m.section,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub async fn session_view<C: ConnectionTrait>(
    db: &C,
    m: session::Model,
) -> Result<SessionView, DbErr> {
    let course = load_one::<course::Entity, _>(db, &m.course_id)
        .await?
        .map(CourseSummary::from);
    let group = load_one::<group::Entity, _>(db, &m.group_id)
        .await?
        .map(GroupSummary::from);

    let roster = attendance_record::Model::roster(db, &m.id).await?;
    let student_ids: Vec<String> = roster.iter().map(|r| r.student_id.clone()).collect();
    let students: HashMap<String, UserSummary> = user_summaries(db, &student_ids)
        .await?
        .into_iter()
        .map(|s| (s.id.clone(), s))
        .collect();

    let attendance = roster
        .into_iter()
        .map(|r| AttendanceView {
            student: students.get(&r.student_id).cloned(),
            student_id: r.student_id,
            is_present: r.is_present,
        })
        .collect();

    Ok(SessionView {
        duration: m.duration_hours(),
        id: m.id,
        course_id: m.course_id,
        course,
        group_id: m.group_id,
        group,
        date: m.date,
        start_time: m.start_time,
        end_time: m.end_time,
        session_time: m.session_time,
        attendance,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}
