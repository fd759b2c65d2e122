//! PostgreSQL-backed `LectureRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LecturePersistenceError, LectureRepository};
use crate::domain::{CourseId, Lecture, LectureId};

use super::conversions::lecture_from_row;
use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{LectureRow, LectureUpdate, NewLectureRow};
use super::pool::{DbPool, PoolError};
use super::schema::lectures;

/// Diesel-backed implementation of the `LectureRepository` port.
#[derive(Clone)]
pub struct DieselLectureRepository {
    pool: DbPool,
}

impl DieselLectureRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LecturePersistenceError {
    map_basic_pool_error(error, LecturePersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LecturePersistenceError {
    map_basic_diesel_error(
        error,
        LecturePersistenceError::query,
        LecturePersistenceError::connection,
    )
}

#[async_trait]
impl LectureRepository for DieselLectureRepository {
    async fn insert(&self, lecture: &Lecture) -> Result<(), LecturePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewLectureRow {
            id: *lecture.id.as_uuid(),
            course_id: *lecture.course_id.as_uuid(),
            title: lecture.title.as_ref(),
            video_url: lecture.video_url.as_deref(),
            is_preview_free: lecture.is_preview_free,
        };
        diesel::insert_into(lectures::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, lecture: &Lecture) -> Result<(), LecturePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = LectureUpdate {
            title: lecture.title.as_ref(),
            video_url: lecture.video_url.as_deref(),
            is_preview_free: lecture.is_preview_free,
        };
        let updated = diesel::update(lectures::table.find(*lecture.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(LecturePersistenceError::query("lecture not found"));
        }
        Ok(())
    }

    async fn delete(&self, id: &LectureId) -> Result<bool, LecturePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(lectures::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find_by_id(&self, id: &LectureId) -> Result<Option<Lecture>, LecturePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<LectureRow> = lectures::table
            .find(*id.as_uuid())
            .select(LectureRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(lecture_from_row)
            .transpose()
            .map_err(LecturePersistenceError::query)
    }

    async fn list_for_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<Lecture>, LecturePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<LectureRow> = lectures::table
            .filter(lectures::course_id.eq(course_id.as_uuid()))
            .order_by(lectures::position.asc())
            .select(LectureRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| lecture_from_row(row).map_err(LecturePersistenceError::query))
            .collect()
    }
}
