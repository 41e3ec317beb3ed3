use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, QueryFilter, QueryOrder, Set};
use serde::Serialize;

/// One roster entry of a session. `position` keeps the roster order.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub position: i32,

    pub student_id: String,
    pub is_present: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::session::Entity",
        from = "Column::SessionId",
        to = "super::session::Column::Id",
        on_delete = "Cascade"
    )]
    Session,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Writes a roster in order. Existing rows for the session must be gone.
    pub async fn insert_roster<C: ConnectionTrait>(
        db: &C,
        session_id: &str,
        roster: &[(String, bool)],
    ) -> Result<(), DbErr> {
        if roster.is_empty() {
            return Ok(());
        }

        let rows = roster
            .iter()
            .enumerate()
            .map(|(position, (student_id, is_present))| ActiveModel {
                session_id: Set(session_id.to_owned()),
                position: Set(position as i32),
                student_id: Set(student_id.clone()),
                is_present: Set(*is_present),
            });

        Entity::insert_many(rows).exec_without_returning(db).await?;
        Ok(())
    }

    pub async fn roster<C: ConnectionTrait>(
        db: &C,
        session_id: &str,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .order_by_asc(Column::Position)
            .all(db)
            .await
    }

    pub async fn delete_roster<C: ConnectionTrait>(db: &C, session_id: &str) -> Result<u64, DbErr> {
        Entity::delete_many()
            .filter(Column::SessionId.eq(session_id))
            .exec(db)
            .await
            .map(|res| res.rows_affected)
    }
}
