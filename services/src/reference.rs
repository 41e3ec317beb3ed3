//! Reference Validator.
//!
//! Confirms that claimed identifiers name existing rows of one collection,
//! optionally narrowed by a predicate such as `role = teacher`. Every check is
//! a single batch query and nothing is written.

use std::collections::HashSet;

use db::collection::Collection;
use db::models::user::{self, Role};
use db::object_id;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, QueryFilter, QuerySelect};

use crate::error::AppError;

/// Extra condition a referenced row must satisfy.
#[derive(Debug, Clone)]
pub struct Predicate {
    condition: Condition,
    expected: String,
}

impl Predicate {
    pub fn new(condition: Condition, expected: impl Into<String>) -> Self {
        Self {
            condition,
            expected: expected.into(),
        }
    }

    /// The referenced user must hold `role`.
    pub fn role(role: Role) -> Self {
        Self::new(
            Condition::all().add(user::Column::Role.eq(role)),
            format!("a {role}"),
        )
    }
}

/// Parses one identifier, normalising it to lowercase.
pub fn parse_id(field: &str, raw: &str) -> Result<String, AppError> {
    object_id::normalize(raw).map_err(|e| AppError::invalid_format(field, e))
}

/// Parses every identifier before any lookup. Order is kept.
pub fn parse_ids(field: &str, raw: &[String]) -> Result<Vec<String>, AppError> {
    raw.iter().map(|id| parse_id(field, id)).collect()
}

/// Drops repeated ids, keeping first occurrences in order.
pub fn unique(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

async fn existing<E, C>(
    db: &C,
    ids: &[String],
    predicate: Option<&Predicate>,
) -> Result<HashSet<String>, AppError>
where
    E: Collection,
    C: ConnectionTrait,
{
    let mut query = E::find()
        .select_only()
        .column(E::id_column())
        .filter(E::id_column().is_in(ids.iter().cloned()));
    if let Some(predicate) = predicate {
        query = query.filter(predicate.condition.clone());
    }

    let found = query.into_tuple::<String>().all(db).await?;
    Ok(found.into_iter().collect())
}

/// Builds the error for ids that did not resolve.
///
/// Ids that exist but fail the predicate are reported as a role error only
/// when every unresolved id exists.
async fn explain_mismatch<E, C>(
    db: &C,
    field: &str,
    expected: usize,
    found: &HashSet<String>,
    requested: &[String],
    predicate: Option<&Predicate>,
) -> AppError
where
    E: Collection,
    C: ConnectionTrait,
{
    let unresolved: Vec<String> = requested
        .iter()
        .filter(|id| !found.contains(*id))
        .cloned()
        .collect();

    if let Some(predicate) = predicate {
        match existing::<E, C>(db, &unresolved, None).await {
            Ok(present) if present.len() == unresolved.len() => {
                return AppError::InvalidRole {
                    field: field.to_owned(),
                    expected: predicate.expected.clone(),
                    ids: unresolved,
                };
            }
            Ok(present) => {
                let missing: Vec<String> = unresolved
                    .into_iter()
                    .filter(|id| !present.contains(id))
                    .collect();
                return AppError::MissingReferences {
                    collection: E::NAME,
                    expected,
                    found: found.len(),
                    missing,
                };
            }
            Err(e) => return e,
        }
    }

    AppError::MissingReferences {
        collection: E::NAME,
        expected,
        found: found.len(),
        missing: unresolved,
    }
}

/// Validates a set-valued reference field.
///
/// Repeated ids count once. Returns the normalised unique ids in request
/// order.
pub async fn validate_references<E, C>(
    db: &C,
    field: &str,
    ids: &[String],
    predicate: Option<&Predicate>,
) -> Result<Vec<String>, AppError>
where
    E: Collection,
    C: ConnectionTrait,
{
    let parsed = parse_ids(field, ids)?;
    let requested = unique(&parsed);
    if requested.is_empty() {
        return Ok(requested);
    }

    let found = existing::<E, C>(db, &requested, predicate).await?;
    if found.len() != requested.len() {
        let err =
            explain_mismatch::<E, C>(db, field, requested.len(), &found, &requested, predicate)
                .await;
        tracing::debug!(field, error = %err, "reference validation rejected");
        return Err(err);
    }

    Ok(requested)
}

/// Like [`validate_references`], but an absent field skips the check.
pub async fn validate_optional<E, C>(
    db: &C,
    field: &str,
    ids: Option<&[String]>,
    predicate: Option<&Predicate>,
) -> Result<Option<Vec<String>>, AppError>
where
    E: Collection,
    C: ConnectionTrait,
{
    match ids {
        Some(ids) => validate_references::<E, C>(db, field, ids, predicate)
            .await
            .map(Some),
        None => Ok(None),
    }
}

/// Validates a list whose entries must each resolve to a distinct row.
///
/// The number of resolved rows must equal the number of entries, so a
/// repeated id fails the whole list. Returns the normalised ids in order.
pub async fn validate_exact<E, C>(
    db: &C,
    field: &str,
    ids: &[String],
    predicate: Option<&Predicate>,
) -> Result<Vec<String>, AppError>
where
    E: Collection,
    C: ConnectionTrait,
{
    let parsed = parse_ids(field, ids)?;
    let requested = unique(&parsed);
    if requested.is_empty() {
        return Ok(parsed);
    }

    let found = existing::<E, C>(db, &requested, predicate).await?;
    if found.len() != requested.len() {
        let err =
            explain_mismatch::<E, C>(db, field, parsed.len(), &found, &requested, predicate).await;
        tracing::debug!(field, error = %err, "reference validation rejected");
        return Err(err);
    }

    if found.len() != parsed.len() {
        let mut seen = HashSet::new();
        let repeated: Vec<String> = parsed
            .iter()
            .filter(|id| !seen.insert(id.as_str()))
            .cloned()
            .collect();
        tracing::debug!(field, ?repeated, "repeated references rejected");
        return Err(AppError::MissingReferences {
            collection: E::NAME,
            expected: parsed.len(),
            found: found.len(),
            missing: unique(&repeated),
        });
    }

    Ok(parsed)
}

/// Validates a single-valued reference field.
pub async fn validate_reference<E, C>(
    db: &C,
    field: &str,
    id: &str,
    predicate: Option<&Predicate>,
) -> Result<String, AppError>
where
    E: Collection,
    C: ConnectionTrait,
{
    let mut ids = validate_references::<E, C>(db, field, &[id.to_owned()], predicate).await?;
    Ok(ids.remove(0))
}

/// Resolves the target of an association add.
///
/// A missing target is `NotFound`; one that exists with the wrong role is
/// `InvalidRole`.
pub async fn require_target<E, C>(
    db: &C,
    field: &str,
    id: &str,
    predicate: Option<&Predicate>,
) -> Result<String, AppError>
where
    E: Collection,
    C: ConnectionTrait,
{
    match validate_reference::<E, C>(db, field, id, predicate).await {
        Err(AppError::MissingReferences { missing, .. }) => Err(AppError::NotFound(format!(
            "{} {}",
            E::NAME,
            missing.join(", ")
        ))),
        other => other,
    }
}

/// Loads a row by id or fails with `NotFound`.
pub async fn find_required<E, C>(
    db: &C,
    field: &str,
    id: &str,
) -> Result<E::Model, AppError>
where
    E: Collection,
    C: ConnectionTrait,
{
    let id = parse_id(field, id)?;
    E::find()
        .filter(E::id_column().eq(id.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} {}", E::NAME, id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::models::{course, user::Model as User};
    use db::test_utils::setup_test_db;

    async fn user(db: &sea_orm::DatabaseConnection, name: &str, role: Role) -> String {
        User::create(db, name, &format!("{name}@example.com"), "secret1", role)
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn absent_field_skips_the_check() {
        let db = setup_test_db().await;
        let out = validate_optional::<user::Entity, _>(&db, "students", None, None)
            .await
            .unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn empty_list_is_trivially_valid() {
        let db = setup_test_db().await;
        let out = validate_references::<user::Entity, _>(&db, "students", &[], None)
            .await
            .unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn malformed_id_is_a_format_error() {
        let db = setup_test_db().await;
        let err = validate_references::<user::Entity, _>(
            &db,
            "students",
            &["not-a-valid-id".to_string()],
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidReferenceFormat { ref value, .. } if value == "not-a-valid-id"));
    }

    #[test]
    fn padded_id_is_a_format_error() {
        let err = parse_id("teacherId", " 665f1c2e9b1d4a0012345678 ").unwrap_err();
        assert!(matches!(err, AppError::InvalidReferenceFormat { ref field, .. } if field == "teacherId"));
        assert_eq!(
            parse_id("teacherId", "665F1C2E9B1D4A0012345678").unwrap(),
            "665f1c2e9b1d4a0012345678"
        );
    }

    #[tokio::test]
    async fn missing_ids_are_enumerated() {
        let db = setup_test_db().await;
        let s1 = user(&db, "s1", Role::Student).await;
        let ghost = "0123456789abcdef01234567".to_string();

        let err = validate_references::<user::Entity, _>(
            &db,
            "students",
            &[s1.clone(), ghost.clone()],
            Some(&Predicate::role(Role::Student)),
        )
        .await
        .unwrap_err();

        match err {
            AppError::MissingReferences { collection, expected, found, missing } => {
                assert_eq!(collection, "users");
                assert_eq!((expected, found), (2, 1));
                assert_eq!(missing, vec![ghost]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn wrong_role_is_reported_as_invalid_role() {
        let db = setup_test_db().await;
        let teacher = user(&db, "t1", Role::Teacher).await;

        let err = validate_reference::<user::Entity, _>(
            &db,
            "students",
            &teacher,
            Some(&Predicate::role(Role::Student)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidRole { ref ids, .. } if ids == &vec![teacher.clone()]));
    }

    #[tokio::test]
    async fn duplicates_count_once_for_sets_but_fail_exact_lists() {
        let db = setup_test_db().await;
        let s1 = user(&db, "s1", Role::Student).await;
        let upper = s1.to_uppercase();

        let set = validate_references::<user::Entity, _>(&db, "students", &[s1.clone(), upper.clone()], None)
            .await
            .unwrap();
        assert_eq!(set, vec![s1.clone()]);

        let err = validate_exact::<user::Entity, _>(&db, "attendance", &[s1.clone(), upper], None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingReferences { expected: 2, found: 1, .. }));
    }

    #[tokio::test]
    async fn require_target_maps_missing_to_not_found() {
        let db = setup_test_db().await;
        let err = require_target::<course::Entity, _>(&db, "courseId", "0123456789abcdef01234567", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
