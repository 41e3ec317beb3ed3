use chrono::Utc;
use db::models::attendance_record;
use db::models::course;
use db::models::group_student;
use db::models::user::{ActiveModel, Column, Entity, Model, Role};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::error::AppError;
use crate::reference;
use crate::views::UserView;

pub use db::models::user::Model as User;

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// References that assumed a user's previous role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleReferences {
    pub courses_taught: u64,
    pub group_memberships: u64,
    pub roster_entries: u64,
}

pub struct UserService;

impl UserService {
    /// Fails with `Conflict` when another user already holds `username` or `email`.
    async fn ensure_unique<C: ConnectionTrait>(
        db: &C,
        username: Option<&str>,
        email: Option<&str>,
        except: Option<&str>,
    ) -> Result<(), AppError> {
        let mut clash = Condition::any();
        if let Some(username) = username {
            clash = clash.add(Column::Username.eq(username));
        }
        if let Some(email) = email {
            clash = clash.add(Column::Email.eq(email));
        }
        if clash.is_empty() {
            return Ok(());
        }

        let mut query = Entity::find().filter(clash);
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }

        if let Some(existing) = query.one(db).await? {
            let field = if username == Some(existing.username.as_str()) {
                "username"
            } else {
                "email"
            };
            tracing::debug!(field, "duplicate user rejected");
            return Err(AppError::Conflict(format!(
                "A user with this {field} already exists"
            )));
        }
        Ok(())
    }

    pub async fn create(db: &DatabaseConnection, params: CreateUser) -> Result<UserView, AppError> {
        let username = params.username.trim();
        let email = params.email.trim().to_lowercase();

        let txn = db.begin().await?;
        Self::ensure_unique(&txn, Some(username), Some(&email), None).await?;
        let user = Model::create(&txn, username, &email, &params.password, params.role).await?;
        txn.commit().await?;

        tracing::info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user.into())
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<UserView>, AppError> {
        let users = Entity::find().order_by_asc(Column::CreatedAt).all(db).await?;
        Ok(users.into_iter().map(UserView::from).collect())
    }

    pub async fn get(db: &DatabaseConnection, id: &str) -> Result<UserView, AppError> {
        let user = reference::find_required::<Entity, _>(db, "id", id).await?;
        Ok(user.into())
    }

    pub async fn list_by_role(db: &DatabaseConnection, role: Role) -> Result<Vec<UserView>, AppError> {
        let users = Model::find_by_role(db, role).await?;
        Ok(users.into_iter().map(UserView::from).collect())
    }

    /// Counts rows that were validated against `user_id` holding `role`.
    pub async fn role_references<C: ConnectionTrait>(
        db: &C,
        user_id: &str,
        role: Role,
    ) -> Result<RoleReferences, AppError> {
        match role {
            Role::Teacher => Ok(RoleReferences {
                courses_taught: course::Entity::find()
                    .filter(course::Column::TeacherId.eq(user_id))
                    .count(db)
                    .await?,
                ..Default::default()
            }),
            Role::Student => Ok(RoleReferences {
                group_memberships: group_student::Entity::find()
                    .filter(group_student::Column::StudentId.eq(user_id))
                    .count(db)
                    .await?,
                roster_entries: attendance_record::Entity::find()
                    .filter(attendance_record::Column::StudentId.eq(user_id))
                    .count(db)
                    .await?,
                ..Default::default()
            }),
            Role::Admin => Ok(RoleReferences::default()),
        }
    }

    /// Partial update.
    ///
    /// Uniqueness is checked against other users only. A role change is a
    /// reclassification: it is applied and logged, and references that
    /// assumed the old role are left as they are.
    pub async fn update(
        db: &DatabaseConnection,
        id: &str,
        params: UpdateUser,
    ) -> Result<UserView, AppError> {
        let txn = db.begin().await?;
        let user = reference::find_required::<Entity, _>(&txn, "id", id).await?;

        let username = params.username.as_deref().map(str::trim);
        let email = params.email.as_deref().map(|e| e.trim().to_lowercase());
        Self::ensure_unique(&txn, username, email.as_deref(), Some(&user.id)).await?;

        let mut active: ActiveModel = user.clone().into();
        if let Some(username) = username {
            active.username = Set(username.to_owned());
        }
        if let Some(email) = email {
            active.email = Set(email);
        }
        if let Some(password) = &params.password {
            active.password_hash = Set(Model::hash_password(password)?);
        }

        if let Some(role) = params.role.filter(|r| *r != user.role) {
            let refs = Self::role_references(&txn, &user.id, user.role).await?;
            tracing::warn!(
                user_id = %user.id,
                from = %user.role,
                to = %role,
                courses_taught = refs.courses_taught,
                group_memberships = refs.group_memberships,
                roster_entries = refs.roster_entries,
                "user reclassified; existing references are not re-validated"
            );
            active.role = Set(role);
        }

        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(user_id = %updated.id, "user updated");
        Ok(updated.into())
    }

    /// Removes the user. Courses, groups and rosters keep their references.
    pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<(), AppError> {
        let id = reference::parse_id("id", id)?;
        let res = Entity::delete_by_id(id.clone()).exec(db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("users {id}")));
        }
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Checks an email/password pair.
    pub async fn verify_credentials(
        db: &DatabaseConnection,
        email: &str,
        password: &str,
    ) -> Result<Model, AppError> {
        let user = Model::find_by_email(db, &email.trim().to_lowercase()).await?;
        match user {
            Some(user) if user.verify_password(password) => Ok(user),
            _ => {
                tracing::debug!("login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    /// Creates the configured admin when no admin exists yet.
    ///
    /// Returns the new admin, or `None` when one was already present.
    pub async fn ensure_admin(
        db: &DatabaseConnection,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<UserView>, AppError> {
        let admins = Entity::find()
            .filter(Column::Role.eq(Role::Admin))
            .count(db)
            .await?;
        if admins > 0 {
            return Ok(None);
        }

        let admin = Self::create(
            db,
            CreateUser {
                username: username.to_owned(),
                email: email.to_owned(),
                password: password.to_owned(),
                role: Role::Admin,
            },
        )
        .await?;
        tracing::info!(user_id = %admin.id, "bootstrap admin created");
        Ok(Some(admin))
    }
}
