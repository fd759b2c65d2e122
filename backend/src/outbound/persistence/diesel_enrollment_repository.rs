//! PostgreSQL-backed `EnrollmentRepository` implementation using Diesel ORM.
//!
//! The `(user_id, course_id)` primary key makes `enroll` idempotent:
//! `ON CONFLICT DO NOTHING` reports zero affected rows for a repeat.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::Enrollment;
use crate::domain::ports::{EnrollmentPersistenceError, EnrollmentRepository};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewEnrollmentRow;
use super::pool::{DbPool, PoolError};
use super::schema::enrollments;

/// Diesel-backed implementation of the `EnrollmentRepository` port.
#[derive(Clone)]
pub struct DieselEnrollmentRepository {
    pool: DbPool,
}

impl DieselEnrollmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EnrollmentPersistenceError {
    map_basic_pool_error(error, EnrollmentPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EnrollmentPersistenceError {
    map_basic_diesel_error(
        error,
        EnrollmentPersistenceError::query,
        EnrollmentPersistenceError::connection,
    )
}

#[async_trait]
impl EnrollmentRepository for DieselEnrollmentRepository {
    async fn enroll(&self, enrollment: &Enrollment) -> Result<bool, EnrollmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewEnrollmentRow {
            user_id: *enrollment.user_id.as_uuid(),
            course_id: *enrollment.course_id.as_uuid(),
            gateway_order_id: &enrollment.gateway_order_id,
            enrolled_at: enrollment.enrolled_at,
        };

        let rows_affected = diesel::insert_into(enrollments::table)
            .values(&row)
            .on_conflict((enrollments::user_id, enrollments::course_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if rows_affected == 0 {
            debug!(
                user_id = %enrollment.user_id,
                course_id = %enrollment.course_id,
                "enrollment already recorded"
            );
        }
        Ok(rows_affected > 0)
    }
}
