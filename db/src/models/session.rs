use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, QueryFilter, QueryOrder, Set};
use serde::Serialize;

use crate::object_id::new_id;

/// A taught session of a course for one group.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub course_id: String,
    pub group_id: String,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// `end_time - start_time` in minutes.
    pub session_time: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecord,
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        course_id: &str,
        group_id: &str,
        date: NaiveDate,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();

        let active_model = ActiveModel {
            id: Set(new_id()),
            course_id: Set(course_id.to_owned()),
            group_id: Set(group_id.to_owned()),
            date: Set(date),
            start_time: Set(start_time),
            end_time: Set(end_time),
            session_time: Set(minutes_between(start_time, end_time)),
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
            .order_by_asc(Column::StartTime)
            .all(db)
            .await
    }

    /// Duration in hours, derived from `session_time`.
    pub fn duration_hours(&self) -> f64 {
        self.session_time / 60.0
    }
}

/// Minutes elapsed from `start` to `end`; negative when `end` precedes `start`.
pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 60_000.0
}
