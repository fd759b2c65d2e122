//! PostgreSQL-backed `CourseRepository` implementation using Diesel ORM.
//!
//! Courses are read together with their enrollment, lecture and review ids in
//! one transaction so list pages observe a single MVCC snapshot.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::{AsSelect, SqlTypeOf};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{CoursePersistenceError, CourseRepository};
use crate::domain::{Course, CourseDraft, CourseId, UserId};

use super::conversions::{CourseRelations, course_from_row, course_values};
use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::CourseRow;
use super::pool::{DbPool, PoolError};
use super::schema::{courses, enrollments, lectures, reviews};

/// Diesel-backed implementation of the `CourseRepository` port.
#[derive(Clone)]
pub struct DieselCourseRepository {
    pool: DbPool,
}

impl DieselCourseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Load courses matching `selection` plus their relations in one snapshot.
    async fn load_courses(
        &self,
        selection: CourseSelection,
    ) -> Result<Vec<Course>, CoursePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (rows, mut relations) = conn
            .transaction(|conn| {
                async move {
                    let rows: Vec<CourseRow> = course_query(selection).load(conn).await?;
                    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
                    let relations = load_relations(conn, &ids).await?;
                    Ok::<_, diesel::result::Error>((rows, relations))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| {
                let related = relations.remove(&row.id).unwrap_or_default();
                course_from_row(row, related).map_err(CoursePersistenceError::query)
            })
            .collect()
    }
}

/// Which courses a read returns.
#[derive(Debug, Clone, Copy)]
enum CourseSelection {
    ById(Uuid),
    Published,
    ByCreator(Uuid),
}

type CourseQuery = courses::BoxedQuery<'static, Pg, SqlTypeOf<AsSelect<CourseRow, Pg>>>;

/// Course rows for `selection`, ordered by title.
fn course_query(selection: CourseSelection) -> CourseQuery {
    let query = courses::table
        .order_by((courses::title.asc(), courses::id.asc()))
        .select(CourseRow::as_select())
        .into_boxed();
    match selection {
        CourseSelection::ById(id) => query.filter(courses::id.eq(id)),
        CourseSelection::Published => query.filter(courses::is_published.eq(true)),
        CourseSelection::ByCreator(creator) => query.filter(courses::creator_id.eq(creator)),
    }
}

fn map_pool_error(error: PoolError) -> CoursePersistenceError {
    map_basic_pool_error(error, CoursePersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CoursePersistenceError {
    map_basic_diesel_error(
        error,
        CoursePersistenceError::query,
        CoursePersistenceError::connection,
    )
}

/// Fetch enrolled students, ordered lectures and reviews for `ids`.
async fn load_relations(
    conn: &mut AsyncPgConnection,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, CourseRelations>, diesel::result::Error> {
    let mut relations: HashMap<Uuid, CourseRelations> = HashMap::new();
    if ids.is_empty() {
        return Ok(relations);
    }

    let students: Vec<(Uuid, Uuid)> = enrollments::table
        .filter(enrollments::course_id.eq_any(ids))
        .select((enrollments::course_id, enrollments::user_id))
        .load(conn)
        .await?;
    let lecture_ids: Vec<(Uuid, Uuid)> = lectures::table
        .filter(lectures::course_id.eq_any(ids))
        .order_by(lectures::position.asc())
        .select((lectures::course_id, lectures::id))
        .load(conn)
        .await?;
    let review_ids: Vec<(Uuid, Uuid)> = reviews::table
        .filter(reviews::course_id.eq_any(ids))
        .select((reviews::course_id, reviews::id))
        .load(conn)
        .await?;

    for (course_id, user_id) in students {
        relations.entry(course_id).or_default().students.push(user_id);
    }
    for (course_id, lecture_id) in lecture_ids {
        relations
            .entry(course_id)
            .or_default()
            .lectures
            .push(lecture_id);
    }
    for (course_id, review_id) in review_ids {
        relations.entry(course_id).or_default().reviews.push(review_id);
    }
    Ok(relations)
}

#[async_trait]
impl CourseRepository for DieselCourseRepository {
    async fn insert(&self, draft: &CourseDraft) -> Result<(), CoursePersistenceError> {
        let values = course_values(draft).map_err(CoursePersistenceError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(courses::table)
            .values(&values)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, draft: &CourseDraft) -> Result<(), CoursePersistenceError> {
        let values = course_values(draft).map_err(CoursePersistenceError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(courses::table.find(values.id))
            .set(&values)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(CoursePersistenceError::query("course not found"));
        }
        Ok(())
    }

    async fn delete(&self, id: &CourseId) -> Result<bool, CoursePersistenceError> {
        let course_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = conn
            .transaction(|conn| {
                async move {
                    let enrollments_removed = diesel::delete(
                        enrollments::table.filter(enrollments::course_id.eq(course_id)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::delete(reviews::table.filter(reviews::course_id.eq(course_id)))
                        .execute(conn)
                        .await?;
                    diesel::delete(lectures::table.filter(lectures::course_id.eq(course_id)))
                        .execute(conn)
                        .await?;
                    let courses_removed = diesel::delete(courses::table.find(course_id))
                        .execute(conn)
                        .await?;
                    debug!(%course_id, enrollments_removed, "course removed");
                    Ok::<_, diesel::result::Error>(courses_removed > 0)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted)
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, CoursePersistenceError> {
        let course_id = *id.as_uuid();
        let mut found = self.load_courses(CourseSelection::ById(course_id)).await?;
        Ok(found.pop())
    }

    async fn list_published(&self) -> Result<Vec<Course>, CoursePersistenceError> {
        self.load_courses(CourseSelection::Published).await
    }

    async fn list_by_creator(
        &self,
        creator: &UserId,
    ) -> Result<Vec<Course>, CoursePersistenceError> {
        let creator_id = *creator.as_uuid();
        self.load_courses(CourseSelection::ByCreator(creator_id))
            .await
    }
}
