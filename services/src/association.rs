//! Association Manager.
//!
//! Set-union edges between an owner and its targets. Adding is idempotent and
//! never removes anything; replacing a whole set is only done by the owner's
//! update path.

use db::association::{self, Association};
use sea_orm::ConnectionTrait;

use crate::error::AppError;
use crate::reference::{self, Predicate};

/// Outcome of [`add_association`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Added {
    pub owner_id: String,
    pub target_id: String,
    /// `false` when the edge already existed.
    pub inserted: bool,
}

/// Adds `target_id` to the owner's `A::FIELD` set if absent.
///
/// The owner must exist (`NotFound`); the target must exist and satisfy
/// `predicate` (`NotFound` / `InvalidRole`).
pub async fn add_association<A, C>(
    db: &C,
    owner_id: &str,
    target_id: &str,
    predicate: Option<&Predicate>,
) -> Result<Added, AppError>
where
    A: Association,
    C: ConnectionTrait,
{
    let owner_id = reference::parse_id("id", owner_id)?;
    let target_id = reference::parse_id(A::FIELD, target_id)?;

    reference::find_required::<A::Owner, C>(db, "id", &owner_id).await?;
    reference::require_target::<A::Target, C>(db, A::FIELD, &target_id, predicate).await?;

    let inserted = association::add::<A, C>(db, &owner_id, &target_id).await?;
    if !inserted {
        tracing::debug!(owner = %owner_id, target = %target_id, field = A::FIELD, "association already present");
    }

    Ok(Added {
        owner_id,
        target_id,
        inserted,
    })
}

/// Validates `ids` and makes them the owner's whole `A::FIELD` set.
pub async fn replace_association<A, C>(
    db: &C,
    owner_id: &str,
    ids: &[String],
    predicate: Option<&Predicate>,
) -> Result<Vec<String>, AppError>
where
    A: Association,
    C: ConnectionTrait,
{
    let targets = reference::validate_references::<A::Target, C>(db, A::FIELD, ids, predicate).await?;
    association::replace::<A, C>(db, owner_id, &targets).await?;
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::association::{GroupStudents, targets};
    use db::models::group::Model as Group;
    use db::models::user::{Model as User, Role};
    use db::test_utils::setup_test_db;

    #[tokio::test]
    async fn adding_the_same_student_twice_yields_one_membership() {
        let db = setup_test_db().await;
        let group = Group::create(&db, "G1").await.unwrap();
        let s1 = User::create(&db, "s1", "s1@example.com", "secret1", Role::Student)
            .await
            .unwrap();
        let student = Predicate::role(Role::Student);

        let first = add_association::<GroupStudents, _>(&db, &group.id, &s1.id, Some(&student))
            .await
            .unwrap();
        let second = add_association::<GroupStudents, _>(&db, &group.id, &s1.id.to_uppercase(), Some(&student))
            .await
            .unwrap();

        assert!(first.inserted);
        assert!(!second.inserted);
        assert_eq!(targets::<GroupStudents, _>(&db, &group.id).await.unwrap(), vec![s1.id]);
    }

    #[tokio::test]
    async fn missing_owner_is_not_found() {
        let db = setup_test_db().await;
        let s1 = User::create(&db, "s1", "s1@example.com", "secret1", Role::Student)
            .await
            .unwrap();

        let err = add_association::<GroupStudents, _>(&db, "0123456789abcdef01234567", &s1.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn wrong_role_target_leaves_set_untouched() {
        let db = setup_test_db().await;
        let group = Group::create(&db, "G1").await.unwrap();
        let teacher = User::create(&db, "t1", "t1@example.com", "secret1", Role::Teacher)
            .await
            .unwrap();

        let err = add_association::<GroupStudents, _>(
            &db,
            &group.id,
            &teacher.id,
            Some(&Predicate::role(Role::Student)),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::InvalidRole { .. }));
        assert!(targets::<GroupStudents, _>(&db, &group.id).await.unwrap().is_empty());
    }
}
