//! Explicit orphan cleanup.
//!
//! Deletes never cascade, so rows can outlive what they point at. This
//! module reports such rows and, on request, removes exactly what it
//! reported. It never runs implicitly.

use db::association::{self, Association, CourseFiles, GroupCourses, GroupStudents};
use db::models::{attendance_record, course, file, group, session};
use sea_orm::sea_query::Query;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingEdge {
    /// `owner.field`, e.g. `group.students`.
    pub field: String,
    pub owner_id: String,
    pub target_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanReport {
    pub files_without_course: Vec<String>,
    pub sessions_without_course: Vec<String>,
    pub sessions_without_group: Vec<String>,
    pub dangling_edges: Vec<DanglingEdge>,
}

impl OrphanReport {
    pub fn is_empty(&self) -> bool {
        self.files_without_course.is_empty()
            && self.sessions_without_course.is_empty()
            && self.sessions_without_group.is_empty()
            && self.dangling_edges.is_empty()
    }

    fn session_ids(&self) -> Vec<String> {
        let mut ids = self.sessions_without_course.clone();
        for id in &self.sessions_without_group {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeSummary {
    pub files: u64,
    pub sessions: u64,
    pub attendance_records: u64,
    pub edges: u64,
}

async fn edges_of<A: Association, C: ConnectionTrait>(
    db: &C,
    owner: &str,
    out: &mut Vec<DanglingEdge>,
) -> Result<(), AppError> {
    for (owner_id, target_id) in association::dangling::<A, C>(db).await? {
        out.push(DanglingEdge {
            field: format!("{owner}.{}", A::FIELD),
            owner_id,
            target_id,
        });
    }
    Ok(())
}

pub async fn find_orphans<C: ConnectionTrait>(db: &C) -> Result<OrphanReport, AppError> {
    let course_ids = Query::select()
        .column(course::Column::Id)
        .from(course::Entity)
        .to_owned();
    let group_ids = Query::select()
        .column(group::Column::Id)
        .from(group::Entity)
        .to_owned();

    let files_without_course = file::Entity::find()
        .select_only()
        .column(file::Column::Id)
        .filter(file::Column::CourseId.not_in_subquery(course_ids.clone()))
        .order_by_asc(file::Column::CreatedAt)
        .into_tuple::<String>()
        .all(db)
        .await?;
    let sessions_without_course = session::Entity::find()
        .select_only()
        .column(session::Column::Id)
        .filter(session::Column::CourseId.not_in_subquery(course_ids))
        .order_by_asc(session::Column::CreatedAt)
        .into_tuple::<String>()
        .all(db)
        .await?;
    let sessions_without_group = session::Entity::find()
        .select_only()
        .column(session::Column::Id)
        .filter(session::Column::GroupId.not_in_subquery(group_ids))
        .order_by_asc(session::Column::CreatedAt)
        .into_tuple::<String>()
        .all(db)
        .await?;

    let mut dangling_edges = Vec::new();
    edges_of::<GroupStudents, C>(db, "group", &mut dangling_edges).await?;
    // Also covers Course.groups, which shares the table.
    edges_of::<GroupCourses, C>(db, "group", &mut dangling_edges).await?;
    edges_of::<CourseFiles, C>(db, "course", &mut dangling_edges).await?;

    Ok(OrphanReport {
        files_without_course,
        sessions_without_course,
        sessions_without_group,
        dangling_edges,
    })
}

/// Deletes what [`find_orphans`] reports, in one transaction.
pub async fn purge_orphans(db: &DatabaseConnection) -> Result<(OrphanReport, PurgeSummary), AppError> {
    let txn = db.begin().await?;
    let report = find_orphans(&txn).await?;
    let mut summary = PurgeSummary::default();

    // Edges before files, so `course.files` rows pointing at purged files stay for the next report.
    summary.edges = association::purge_dangling::<GroupStudents, _>(&txn).await?
        + association::purge_dangling::<GroupCourses, _>(&txn).await?
        + association::purge_dangling::<CourseFiles, _>(&txn).await?;

    if !report.files_without_course.is_empty() {
        summary.files = file::Entity::delete_many()
            .filter(file::Column::Id.is_in(report.files_without_course.iter().cloned()))
            .exec(&txn)
            .await?
            .rows_affected;
    }

    let session_ids = report.session_ids();
    if !session_ids.is_empty() {
        summary.attendance_records = attendance_record::Entity::delete_many()
            .filter(attendance_record::Column::SessionId.is_in(session_ids.iter().cloned()))
            .exec(&txn)
            .await?
            .rows_affected;
        summary.sessions = session::Entity::delete_many()
            .filter(session::Column::Id.is_in(session_ids.iter().cloned()))
            .exec(&txn)
            .await?
            .rows_affected;
    }

    txn.commit().await?;

    if !report.is_empty() {
        tracing::warn!(
            files = summary.files,
            sessions = summary.sessions,
            attendance_records = summary.attendance_records,
            edges = summary.edges,
            "orphans purged"
        );
    }
    Ok((report, summary))
}
