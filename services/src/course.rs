use chrono::Utc;
use db::association::{self, CourseFiles, CourseGroups};
use db::models::course::{ActiveModel, Column, Entity, Model};
use db::models::{file, group, user};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, TransactionTrait};

use crate::association::{Added, add_association, replace_association};
use crate::error::AppError;
use crate::progress::{self, CourseProgress};
use crate::reference::{self, Predicate};
use crate::views::{self, CourseView};

#[derive(Debug, Clone)]
pub struct CreateCourse {
    pub name: String,
    pub teacher_id: String,
    pub files: Option<Vec<String>>,
    pub groups: Option<Vec<String>>,
    pub total_duration: f64,
}

/// Supplied sets replace the stored ones.
#[derive(Debug, Clone, Default)]
pub struct UpdateCourse {
    pub name: Option<String>,
    pub teacher_id: Option<String>,
    pub files: Option<Vec<String>>,
    pub groups: Option<Vec<String>>,
    pub total_duration: Option<f64>,
}

fn check_total_duration(hours: f64) -> Result<(), AppError> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(AppError::Validation(
            "totalDuration must be a positive number of hours".into(),
        ));
    }
    Ok(())
}

pub struct CourseService;

impl CourseService {
    /// Creates a course after validating every reference.
    ///
    /// `teacher_id` must name a teacher; `files` and `groups` must exist.
    /// Nothing is written when any check fails.
    pub async fn create(db: &DatabaseConnection, params: CreateCourse) -> Result<CourseView, AppError> {
        check_total_duration(params.total_duration)?;

        let txn = db.begin().await?;
        let teacher = reference::validate_reference::<user::Entity, _>(
            &txn,
            "teacher",
            &params.teacher_id,
            Some(&Predicate::role(user::Role::Teacher)),
        )
        .await?;
        let files =
            reference::validate_optional::<file::Entity, _>(&txn, "files", params.files.as_deref(), None).await?;
        let groups =
            reference::validate_optional::<group::Entity, _>(&txn, "groups", params.groups.as_deref(), None).await?;

        let course = Model::create(&txn, params.name.trim(), &teacher, params.total_duration).await?;
        if let Some(files) = &files {
            association::add_all::<CourseFiles, _>(&txn, &course.id, files).await?;
        }
        if let Some(groups) = &groups {
            association::add_all::<CourseGroups, _>(&txn, &course.id, groups).await?;
        }
        txn.commit().await?;

        tracing::info!(course_id = %course.id, teacher_id = %course.teacher_id, "course created");
        Ok(views::course_view(db, course).await?)
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<CourseView>, AppError> {
        let courses = Entity::find().order_by_asc(Column::CreatedAt).all(db).await?;
        let mut out = Vec::with_capacity(courses.len());
        for course in courses {
            out.push(views::course_view(db, course).await?);
        }
        Ok(out)
    }

    pub async fn get(db: &DatabaseConnection, id: &str) -> Result<CourseView, AppError> {
        let course = reference::find_required::<Entity, _>(db, "id", id).await?;
        Ok(views::course_view(db, course).await?)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: &str,
        params: UpdateCourse,
    ) -> Result<CourseView, AppError> {
        if let Some(hours) = params.total_duration {
            check_total_duration(hours)?;
        }

        let txn = db.begin().await?;
        let course = reference::find_required::<Entity, _>(&txn, "id", id).await?;
        let mut active: ActiveModel = course.clone().into();

        if let Some(teacher_id) = &params.teacher_id {
            let teacher = reference::validate_reference::<user::Entity, _>(
                &txn,
                "teacher",
                teacher_id,
                Some(&Predicate::role(user::Role::Teacher)),
            )
            .await?;
            active.teacher_id = Set(teacher);
        }
        if let Some(files) = &params.files {
            replace_association::<CourseFiles, _>(&txn, &course.id, files, None).await?;
        }
        if let Some(groups) = &params.groups {
            replace_association::<CourseGroups, _>(&txn, &course.id, groups, None).await?;
        }
        if let Some(name) = &params.name {
            active.name = Set(name.trim().to_owned());
        }
        if let Some(hours) = params.total_duration {
            active.total_duration = Set(hours);
        }

        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(course_id = %updated.id, "course updated");
        Ok(views::course_view(db, updated).await?)
    }

    /// Removes the course row only. Files, sessions and edges that refer to it
    /// are left in place; see the orphan cleanup.
    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<(), AppError> {
        let id = reference::parse_id("id", id)?;
        let res = Entity::delete_by_id(id.clone()).exec(db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("courses {id}")));
        }
        tracing::info!(course_id = %id, "course deleted");
        Ok(())
    }

    /// Adds an existing file to the course's file set.
    pub async fn add_file(
        db: &DatabaseConnection,
        course_id: &str,
        file_id: &str,
    ) -> Result<CourseView, AppError> {
        let txn = db.begin().await?;
        let Added { owner_id, target_id, inserted } =
            add_association::<CourseFiles, _>(&txn, course_id, file_id, None).await?;
        txn.commit().await?;

        if inserted {
            tracing::info!(course_id = %owner_id, file_id = %target_id, "file added to course");
        }
        Self::get(db, &owner_id).await
    }

    pub async fn progress(db: &DatabaseConnection, course_id: &str) -> Result<CourseProgress, AppError> {
        progress::course_progress(db, course_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use db::models::group::Model as Group;
    use db::models::session::{self, Model as Session};
    use db::models::user::{Model as User, Role};
    use db::test_utils::setup_test_db;
    use sea_orm::PaginatorTrait;

    async fn teacher(db: &DatabaseConnection) -> String {
        User::create(db, "t1", "t1@example.com", "secret1", Role::Teacher)
            .await
            .unwrap()
            .id
    }

    fn new_course(teacher_id: &str) -> CreateCourse {
        CreateCourse {
            name: "Rust".into(),
            teacher_id: teacher_id.into(),
            files: None,
            groups: None,
            total_duration: 10.0,
        }
    }

    #[tokio::test]
    async fn create_expands_teacher_and_sets() {
        let db = setup_test_db().await;
        let teacher_id = teacher(&db).await;
        let group = Group::create(&db, "G1").await.unwrap();

        let mut params = new_course(&teacher_id);
        params.groups = Some(vec![group.id.clone(), group.id.clone()]);
        let view = CourseService::create(&db, params).await.unwrap();

        assert_eq!(view.teacher.as_ref().unwrap().username, "t1");
        assert_eq!(view.groups.len(), 1);
        assert_eq!(view.groups[0].name, "G1");
        assert!(view.files.is_empty());
    }

    #[tokio::test]
    async fn non_teacher_or_missing_teacher_persists_nothing() {
        let db = setup_test_db().await;
        let student = User::create(&db, "s1", "s1@example.com", "secret1", Role::Student)
            .await
            .unwrap();

        let err = CourseService::create(&db, new_course(&student.id)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRole { .. }));

        let err = CourseService::create(&db, new_course("0123456789abcdef01234567"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingReferences { .. }));

        assert_eq!(Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_file_aborts_create() {
        let db = setup_test_db().await;
        let teacher_id = teacher(&db).await;
        let mut params = new_course(&teacher_id);
        params.files = Some(vec!["0123456789abcdef01234567".into()]);

        let err = CourseService::create(&db, params).await.unwrap_err();
        assert!(matches!(err, AppError::MissingReferences { collection: "files", .. }));
        assert_eq!(Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn non_positive_total_duration_is_rejected() {
        let db = setup_test_db().await;
        let teacher_id = teacher(&db).await;
        let mut params = new_course(&teacher_id);
        params.total_duration = 0.0;

        let err = CourseService::create(&db, params).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn update_replaces_sets() {
        let db = setup_test_db().await;
        let teacher_id = teacher(&db).await;
        let g1 = Group::create(&db, "G1").await.unwrap();
        let g2 = Group::create(&db, "G2").await.unwrap();
        let mut params = new_course(&teacher_id);
        params.groups = Some(vec![g1.id.clone()]);
        let created = CourseService::create(&db, params).await.unwrap();

        let updated = CourseService::update(
            &db,
            &created.id,
            UpdateCourse {
                name: Some("Advanced Rust".into()),
                groups: Some(vec![g2.id.clone()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Advanced Rust");
        assert_eq!(updated.groups.iter().map(|g| g.id.as_str()).collect::<Vec<_>>(), vec![g2.id.as_str()]);
    }

    #[tokio::test]
    async fn add_file_is_idempotent() {
        let db = setup_test_db().await;
        let teacher_id = teacher(&db).await;
        let course = CourseService::create(&db, new_course(&teacher_id)).await.unwrap();
        let f = file::Model::create(&db, "notes.pdf", "http://x/uploads/general/notes.pdf", &course.id, "general")
            .await
            .unwrap();

        CourseService::add_file(&db, &course.id, &f.id).await.unwrap();
        let view = CourseService::add_file(&db, &course.id, &f.id).await.unwrap();
        assert_eq!(view.files.len(), 1);
        assert_eq!(view.files[0].filename, "notes.pdf");
    }

    #[tokio::test]
    async fn deleting_a_course_leaves_files_and_sessions() {
        let db = setup_test_db().await;
        let teacher_id = teacher(&db).await;
        let course = CourseService::create(&db, new_course(&teacher_id)).await.unwrap();
        let group = Group::create(&db, "G1").await.unwrap();
        let f = file::Model::create(&db, "a.png", "http://x/uploads/general/a.png", &course.id, "general")
            .await
            .unwrap();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let s = Session::create(
            &db,
            &course.id,
            &group.id,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            start,
            start + chrono::Duration::hours(1),
        )
        .await
        .unwrap();

        CourseService::delete(&db, &course.id).await.unwrap();

        assert!(matches!(CourseService::get(&db, &course.id).await, Err(AppError::NotFound(_))));
        let orphan_file = file::Entity::find_by_id(f.id.clone()).one(&db).await.unwrap().unwrap();
        assert_eq!(orphan_file.course_id, course.id);
        let orphan_session = session::Entity::find_by_id(s.id.clone()).one(&db).await.unwrap().unwrap();
        assert_eq!(orphan_session.course_id, course.id);
    }
}
