use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, QueryFilter, QueryOrder, Set};
use serde::Serialize;

use crate::object_id::new_id;

/// Metadata for an uploaded file. The bytes live in storage; only the
/// locator is kept here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub filename: String,
    /// Public locator of the stored bytes.
    pub file_path: String,
    pub course_id: String,
    pub section: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        filename: &str,
        file_path: &str,
        course_id: &str,
        section: &str,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();

        let active_model = ActiveModel {
            id: Set(new_id()),
            filename: Set(filename.to_owned()),
            file_path: Set(file_path.to_owned()),
            course_id: Set(course_id.to_owned()),
            section: Set(section.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active_model.insert(db).await
    }

    pub async fn find_by_course<C: ConnectionTrait>(
        db: &C,
        course_id: &str,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::CreatedAt)
            .all(db)
            .await
    }
}
