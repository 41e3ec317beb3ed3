use chrono::Utc;
use db::association::{self, GroupCourses, GroupStudents};
use db::models::group::{ActiveModel, Column, Entity, Model};
use db::models::{course, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::association::{Added, add_association, replace_association};
use crate::error::AppError;
use crate::reference::{self, Predicate};
use crate::views::{self, GroupView};

#[derive(Debug, Clone)]
pub struct CreateGroup {
    pub name: String,
    pub students: Option<Vec<String>>,
    pub courses: Option<Vec<String>>,
}

/// Supplied sets replace the stored ones.
#[derive(Debug, Clone, Default)]
pub struct UpdateGroup {
    pub name: Option<String>,
    pub students: Option<Vec<String>>,
    pub courses: Option<Vec<String>>,
}

fn students() -> Predicate {
    Predicate::role(user::Role::Student)
}

pub struct GroupService;

impl GroupService {
    async fn ensure_name_free<C: sea_orm::ConnectionTrait>(
        db: &C,
        name: &str,
        except: Option<&str>,
    ) -> Result<(), AppError> {
        let mut query = Entity::find().filter(Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }
        if query.one(db).await?.is_some() {
            return Err(AppError::Conflict(format!("A group named '{name}' already exists")));
        }
        Ok(())
    }

    pub async fn create(db: &DatabaseConnection, params: CreateGroup) -> Result<GroupView, AppError> {
        let name = params.name.trim();

        let txn = db.begin().await?;
        let student_ids = reference::validate_optional::<user::Entity, _>(
            &txn,
            "students",
            params.students.as_deref(),
            Some(&students()),
        )
        .await?;
        let course_ids =
            reference::validate_optional::<course::Entity, _>(&txn, "courses", params.courses.as_deref(), None)
                .await?;
        Self::ensure_name_free(&txn, name, None).await?;

        let group = Model::create(&txn, name).await?;
        if let Some(ids) = &student_ids {
            association::add_all::<GroupStudents, _>(&txn, &group.id, ids).await?;
        }
        if let Some(ids) = &course_ids {
            association::add_all::<GroupCourses, _>(&txn, &group.id, ids).await?;
        }
        txn.commit().await?;

        tracing::info!(group_id = %group.id, name = %group.name, "group created");
        Ok(views::group_view(db, group).await?)
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<GroupView>, AppError> {
        let groups = Entity::find().order_by_asc(Column::CreatedAt).all(db).await?;
        let mut out = Vec::with_capacity(groups.len());
        for group in groups {
            out.push(views::group_view(db, group).await?);
        }
        Ok(out)
    }

    pub async fn get(db: &DatabaseConnection, id: &str) -> Result<GroupView, AppError> {
        let group = reference::find_required::<Entity, _>(db, "id", id).await?;
        Ok(views::group_view(db, group).await?)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: &str,
        params: UpdateGroup,
    ) -> Result<GroupView, AppError> {
        let txn = db.begin().await?;
        let group = reference::find_required::<Entity, _>(&txn, "id", id).await?;
        let mut active: ActiveModel = group.clone().into();

        if let Some(name) = params.name.as_deref().map(str::trim) {
            Self::ensure_name_free(&txn, name, Some(&group.id)).await?;
            active.name = Set(name.to_owned());
        }
        if let Some(ids) = &params.students {
            replace_association::<GroupStudents, _>(&txn, &group.id, ids, Some(&students())).await?;
        }
        if let Some(ids) = &params.courses {
            replace_association::<GroupCourses, _>(&txn, &group.id, ids, None).await?;
        }

        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(group_id = %updated.id, "group updated");
        Ok(views::group_view(db, updated).await?)
    }

    /// Removes the group row only; sessions and edges keep their references.
    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<(), AppError> {
        let id = reference::parse_id("id", id)?;
        let res = Entity::delete_by_id(id.clone()).exec(db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("groups {id}")));
        }
        tracing::info!(group_id = %id, "group deleted");
        Ok(())
    }

    pub async fn add_student(
        db: &DatabaseConnection,
        group_id: &str,
        student_id: &str,
    ) -> Result<GroupView, AppError> {
        let txn = db.begin().await?;
        let Added { owner_id, target_id, inserted } =
            add_association::<GroupStudents, _>(&txn, group_id, student_id, Some(&students())).await?;
        txn.commit().await?;

        if inserted {
            tracing::info!(group_id = %owner_id, student_id = %target_id, "student added to group");
        }
        Self::get(db, &owner_id).await
    }

    pub async fn add_course(
        db: &DatabaseConnection,
        group_id: &str,
        course_id: &str,
    ) -> Result<GroupView, AppError> {
        let txn = db.begin().await?;
        let Added { owner_id, target_id, inserted } =
            add_association::<GroupCourses, _>(&txn, group_id, course_id, None).await?;
        txn.commit().await?;

        if inserted {
            tracing::info!(group_id = %owner_id, course_id = %target_id, "course added to group");
        }
        Self::get(db, &owner_id).await
    }
}
