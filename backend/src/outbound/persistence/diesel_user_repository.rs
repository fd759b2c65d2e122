//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! The enrollment set is read from `enrollments` on every lookup, so a user is
//! never stale with respect to purchases made through another request. Reset
//! state lives in three `users` columns that are always written together.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, PasswordHash, PasswordReset, User, UserId};

use super::conversions::{reset_columns, user_from_row};
use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserProfileUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{enrollments, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn hydrate(
        conn: &mut AsyncPgConnection,
        row: Option<UserRow>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let Some(row) = row else {
            return Ok(None);
        };
        let courses: Vec<Uuid> = enrollments::table
            .filter(enrollments::user_id.eq(row.id))
            .select(enrollments::course_id)
            .load(conn)
            .await
            .map_err(map_diesel_error)?;
        user_from_row(row, courses)
            .map(Some)
            .map_err(UserPersistenceError::query)
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            name: user.name().as_ref(),
            email: user.email().as_ref(),
            password_hash: user.password_hash().map(|hash| hash.as_ref()),
            role: user.role().as_str(),
            photo_url: user.photo_url(),
            description: user.description(),
        };

        match diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err, Some("users_email_key")) => {
                debug!(user_id = %user.id(), "email already registered");
                Err(UserPersistenceError::duplicate_email(user.email().as_ref()))
            }
            Err(err) => Err(map_diesel_error(err)),
        }
    }

    async fn update_profile(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserProfileUpdate {
            name: user.name().as_ref(),
            photo_url: user.photo_url(),
            description: user.description(),
        };

        let updated = diesel::update(users::table.find(*user.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(UserPersistenceError::query("user not found"));
        }
        Ok(())
    }

    async fn save_password_reset(
        &self,
        id: &UserId,
        reset: Option<PasswordReset>,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let columns = reset_columns(reset.as_ref());
        let updated = diesel::update(users::table.find(*id.as_uuid()))
            .set(&columns)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(UserPersistenceError::query("user not found"));
        }
        Ok(())
    }

    async fn replace_password(
        &self,
        id: &UserId,
        hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let cleared = reset_columns(None);
        let updated = diesel::update(users::table.find(*id.as_uuid()))
            .set((users::password_hash.eq(hash.as_ref()), &cleared))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(UserPersistenceError::query("user not found"));
        }
        debug!(user_id = %id, "password replaced");
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Self::hydrate(&mut conn, row).await
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Self::hydrate(&mut conn, row).await
    }
}
