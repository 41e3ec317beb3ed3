//! Set-valued reference fields stored as edge tables.
//!
//! Each edge table has a composite primary key `(owner, target)`, so adding
//! an edge is an `INSERT .. ON CONFLICT DO NOTHING` and duplicates cannot be
//! stored. Targets are listed in the order they were added.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    Order, QueryFilter, QueryOrder, QuerySelect,
};

use crate::collection::Collection;
use crate::models::{course, course_file, file, group, group_course, group_student, user};

/// One named set-valued field of an owner entity.
pub trait Association {
    type Owner: Collection;
    type Target: Collection;
    type Edge: EntityTrait<Model = Self::EdgeModel>;
    type EdgeModel: IntoActiveModel<Self::EdgeActive> + Send + Sync;
    type EdgeActive: ActiveModelTrait<Entity = Self::Edge> + Send;

    /// Field name on the owner, as exposed over the API.
    const FIELD: &'static str;

    fn owner_column() -> <Self::Edge as EntityTrait>::Column;
    fn target_column() -> <Self::Edge as EntityTrait>::Column;
    fn added_at_column() -> <Self::Edge as EntityTrait>::Column;
    fn new_edge(owner: &str, target: &str, added_at: DateTime<Utc>) -> Self::EdgeActive;
}

/// `Group.students`
pub struct GroupStudents;
/// `Group.courses`
pub struct GroupCourses;
/// `Course.groups`, the reverse view of [`GroupCourses`].
pub struct CourseGroups;
/// `Course.files`
pub struct CourseFiles;

impl Association for GroupStudents {
    type Owner = group::Entity;
    type Target = user::Entity;
    type Edge = group_student::Entity;
    type EdgeModel = group_student::Model;
    type EdgeActive = group_student::ActiveModel;

    const FIELD: &'static str = "students";

    fn owner_column() -> group_student::Column {
        group_student::Column::GroupId
    }

    fn target_column() -> group_student::Column {
        group_student::Column::StudentId
    }

    fn added_at_column() -> group_student::Column {
        group_student::Column::AddedAt
    }

    fn new_edge(owner: &str, target: &str, added_at: DateTime<Utc>) -> group_student::ActiveModel {
        group_student::ActiveModel {
            group_id: sea_orm::Set(owner.to_owned()),
            student_id: sea_orm::Set(target.to_owned()),
            added_at: sea_orm::Set(added_at),
        }
    }
}

impl Association for GroupCourses {
    type Owner = group::Entity;
    type Target = course::Entity;
    type Edge = group_course::Entity;
    type EdgeModel = group_course::Model;
    type EdgeActive = group_course::ActiveModel;

    const FIELD: &'static str = "courses";

    fn owner_column() -> group_course::Column {
        group_course::Column::GroupId
    }

    fn target_column() -> group_course::Column {
        group_course::Column::CourseId
    }

    fn added_at_column() -> group_course::Column {
        group_course::Column::AddedAt
    }

    fn new_edge(owner: &str, target: &str, added_at: DateTime<Utc>) -> group_course::ActiveModel {
        group_course::ActiveModel {
            group_id: sea_orm::Set(owner.to_owned()),
            course_id: sea_orm::Set(target.to_owned()),
            added_at: sea_orm::Set(added_at),
        }
    }
}

impl Association for CourseGroups {
    type Owner = course::Entity;
    type Target = group::Entity;
    type Edge = group_course::Entity;
    type EdgeModel = group_course::Model;
    type EdgeActive = group_course::ActiveModel;

    const FIELD: &'static str = "groups";

    fn owner_column() -> group_course::Column {
        group_course::Column::CourseId
    }

    fn target_column() -> group_course::Column {
        group_course::Column::GroupId
    }

    fn added_at_column() -> group_course::Column {
        group_course::Column::AddedAt
    }

    fn new_edge(owner: &str, target: &str, added_at: DateTime<Utc>) -> group_course::ActiveModel {
        GroupCourses::new_edge(target, owner, added_at)
    }
}

impl Association for CourseFiles {
    type Owner = course::Entity;
    type Target = file::Entity;
    type Edge = course_file::Entity;
    type EdgeModel = course_file::Model;
    type EdgeActive = course_file::ActiveModel;

    const FIELD: &'static str = "files";

    fn owner_column() -> course_file::Column {
        course_file::Column::CourseId
    }

    fn target_column() -> course_file::Column {
        course_file::Column::FileId
    }

    fn added_at_column() -> course_file::Column {
        course_file::Column::AddedAt
    }

    fn new_edge(owner: &str, target: &str, added_at: DateTime<Utc>) -> course_file::ActiveModel {
        course_file::ActiveModel {
            course_id: sea_orm::Set(owner.to_owned()),
            file_id: sea_orm::Set(target.to_owned()),
            added_at: sea_orm::Set(added_at),
        }
    }
}

fn conflict_target<A: Association>() -> OnConflict {
    OnConflict::columns([A::owner_column(), A::target_column()])
        .do_nothing()
        .to_owned()
}

/// Adds `target` to the owner's set. Returns `false` when it was already there.
pub async fn add<A: Association, C: ConnectionTrait>(
    db: &C,
    owner: &str,
    target: &str,
) -> Result<bool, DbErr> {
    let inserted = A::Edge::insert(A::new_edge(owner, target, Utc::now()))
        .on_conflict(conflict_target::<A>())
        .exec_without_returning(db)
        .await?;
    Ok(inserted > 0)
}

/// Adds every target in order, skipping those already present.
pub async fn add_all<A: Association, C: ConnectionTrait>(
    db: &C,
    owner: &str,
    targets: &[String],
) -> Result<u64, DbErr> {
    if targets.is_empty() {
        return Ok(0);
    }
    let now = Utc::now();
    A::Edge::insert_many(targets.iter().map(|t| A::new_edge(owner, t, now)))
        .on_conflict(conflict_target::<A>())
        .exec_without_returning(db)
        .await
}

/// Replaces the owner's whole set with `targets`.
pub async fn replace<A: Association, C: ConnectionTrait>(
    db: &C,
    owner: &str,
    targets: &[String],
) -> Result<(), DbErr> {
    clear_owner::<A, C>(db, owner).await?;
    add_all::<A, C>(db, owner, targets).await?;
    Ok(())
}

/// Target ids in insertion order.
pub async fn targets<A: Association, C: ConnectionTrait>(
    db: &C,
    owner: &str,
) -> Result<Vec<String>, DbErr> {
    A::Edge::find()
        .select_only()
        .column(A::target_column())
        .filter(A::owner_column().eq(owner))
        .order_by_asc(A::added_at_column())
        .order_by(Expr::cust("rowid"), Order::Asc)
        .into_tuple::<String>()
        .all(db)
        .await
}

/// Removes every edge of `owner`.
pub async fn clear_owner<A: Association, C: ConnectionTrait>(
    db: &C,
    owner: &str,
) -> Result<u64, DbErr> {
    A::Edge::delete_many()
        .filter(A::owner_column().eq(owner))
        .exec(db)
        .await
        .map(|res| res.rows_affected)
}

fn dangling_condition<A: Association>() -> Condition {
    let owners = Query::select()
        .column(A::Owner::id_column())
        .from(A::Owner::default())
        .to_owned();
    let targets = Query::select()
        .column(A::Target::id_column())
        .from(A::Target::default())
        .to_owned();

    Condition::any()
        .add(A::owner_column().not_in_subquery(owners))
        .add(A::target_column().not_in_subquery(targets))
}

/// Edges whose owner or target no longer exists, as `(owner, target)`.
pub async fn dangling<A: Association, C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<(String, String)>, DbErr> {
    A::Edge::find()
        .select_only()
        .column(A::owner_column())
        .column(A::target_column())
        .filter(dangling_condition::<A>())
        .order_by_asc(A::added_at_column())
        .into_tuple::<(String, String)>()
        .all(db)
        .await
}

/// Deletes the edges [`dangling`] reports. Returns how many were removed.
pub async fn purge_dangling<A: Association, C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    A::Edge::delete_many()
        .filter(dangling_condition::<A>())
        .exec(db)
        .await
        .map(|res| res.rows_affected)
}
