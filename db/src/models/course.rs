use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, Set};
use serde::Serialize;

use crate::object_id::new_id;

/// A course taught by one teacher. `teacher_id` is a soft reference.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub teacher_id: String,
    /// Declared length of the course in hours.
    pub total_duration: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        name: &str,
        teacher_id: &str,
        total_duration: f64,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();

        let active_model = ActiveModel {
            id: Set(new_id()),
            name: Set(name.to_owned()),
            teacher_id: Set(teacher_id.to_owned()),
            total_duration: Set(total_duration),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active_model.insert(db).await
    }
}
