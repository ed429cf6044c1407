use crate::entities::users;
use crate::error::{ServiceError, on_unique_violation};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher};
use chrono::Utc;
use models::role::Role;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Raw password; hashed with Argon2id before storage.
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

pub struct UserService;

impl UserService {
    pub async fn list(
        db: &DatabaseConnection,
        role: Option<Role>,
    ) -> Result<Vec<users::Model>, ServiceError> {
        let mut query = users::Entity::find();
        if let Some(role) = role {
            query = query.filter(users::Column::Role.eq(role));
        }
        Ok(query.all(db).await?)
    }

    pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<users::Model, ServiceError> {
        users::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))
    }

    /// Email is unique; a duplicate surfaces as Conflict.
    pub async fn create(
        db: &DatabaseConnection,
        input: CreateUser,
    ) -> Result<users::Model, ServiceError> {
        let now = Utc::now();
        users::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            password_hash: Set(hash_password(&input.password)?),
            role: Set(input.role),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|err| on_unique_violation(err, "Email already registered"))
    }

    /// Role and email are immutable after creation.
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        patch: UserPatch,
    ) -> Result<users::Model, ServiceError> {
        let existing = users::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))?;

        let mut record: users::ActiveModel = existing.into();
        if let Some(name) = patch.name {
            record.name = Set(name);
        }
        if let Some(phone) = patch.phone {
            record.phone = Set(phone);
        }
        if let Some(password) = patch.password {
            record.password_hash = Set(hash_password(&password)?);
        }
        record.updated_at = Set(Utc::now());
        Ok(record.update(db).await?)
    }
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ServiceError::Internal(format!("password hashing failed: {err}")))
}
