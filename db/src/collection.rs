//! Entity collections addressable by identifier.

use sea_orm::EntityTrait;

use crate::models::{course, file, group, session, user};

/// A table whose rows are keyed by a 24-char hex `id`.
pub trait Collection: EntityTrait {
    /// Name used in error reports.
    const NAME: &'static str;

    fn id_column() -> Self::Column;
}

impl Collection for user::Entity {
    const NAME: &'static str = "users";

    fn id_column() -> Self::Column {
        user::Column::Id
    }
}

impl Collection for course::Entity {
    const NAME: &'static str = "courses";

    fn id_column() -> Self::Column {
        course::Column::Id
    }
}

impl Collection for group::Entity {
    const NAME: &'static str = "groups";

    fn id_column() -> Self::Column {
        group::Column::Id
    }
}

impl Collection for file::Entity {
    const NAME: &'static str = "files";

    fn id_column() -> Self::Column {
        file::Column::Id
    }
}

impl Collection for session::Entity {
    const NAME: &'static str = "sessions";

    fn id_column() -> Self::Column {
        session::Column::Id
    }
}
