//! Port abstraction for the enrollment relation.
use async_trait::async_trait;

use crate::domain::Enrollment;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by enrollment repository adapters.
    pub enum EnrollmentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "enrollment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "enrollment repository query failed: {message}",
    }
}

/// Storage for enrollments.
///
/// Both the user's course set and the course's student set are read from
/// this relation, so one successful `enroll` commits both sides.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Record an enrollment unless the pair is already enrolled.
    ///
    /// Returns `true` when a new record was written. Concurrent calls for the
    /// same pair leave exactly one record.
    async fn enroll(&self, enrollment: &Enrollment) -> Result<bool, EnrollmentPersistenceError>;
}
