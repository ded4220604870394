//! The read interface the recommendation service needs from a data store.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Advisor, Course, CourseId, Enrollment, StudentId};

/// Read operations against the course-advising data store.
///
/// Implementations must report failures as `Err` and reserve `Ok` with an
/// empty collection for "the table really is empty".
///
/// `Send + Sync` lets a single handle be shared across request tasks as
/// `Arc<dyn DataStore>`.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Every course, each with its advisor(s) embedded.
    async fn fetch_all_courses(&self) -> Result<Vec<Course>>;

    /// Every advisor.
    async fn fetch_all_advisors(&self) -> Result<Vec<Advisor>>;

    /// Every enrollment row, across all students.
    async fn fetch_all_enrollments(&self) -> Result<Vec<Enrollment>>;

    /// Course ids the given student is enrolled in.
    async fn fetch_enrolled_ids(&self, student_id: StudentId) -> Result<HashSet<CourseId>>;

    /// The store's precomputed ranking for a student.
    ///
    /// `Ok(None)` means the store answered but had nothing to say.
    async fn remote_rank(&self, student_id: StudentId) -> Result<Option<Vec<Course>>>;
}
