//! In-memory implementation of [`DataStore`].
//!
//! Holds the three tables and any precomputed rankings in plain collections.
//! Backs the CLI's `--fixture` mode and the test suites.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::error::Result;
use crate::store::DataStore;
use crate::types::{Advisor, Course, CourseId, Enrollment, StudentId};

/// A data store whose tables live in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub(crate) courses: Vec<Course>,
    pub(crate) advisors: Vec<Advisor>,
    pub(crate) enrollments: Vec<Enrollment>,
    /// Precomputed rankings keyed by student
    pub(crate) remote_rankings: HashMap<StudentId, Vec<Course>>,
}

impl MemoryStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_course(&mut self, course: Course) {
        self.courses.push(course);
    }

    pub fn insert_advisor(&mut self, advisor: Advisor) {
        self.advisors.push(advisor);
    }

    pub fn insert_enrollment(&mut self, enrollment: Enrollment) {
        self.enrollments.push(enrollment);
    }

    /// Register what the remote ranking procedure returns for a student
    pub fn set_remote_ranking(&mut self, student_id: StudentId, courses: Vec<Course>) {
        self.remote_rankings.insert(student_id, courses);
    }

    /// Get counts for debugging/validation
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.courses.len(), self.advisors.len(), self.enrollments.len())
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn fetch_all_courses(&self) -> Result<Vec<Course>> {
        Ok(self.courses.clone())
    }

    async fn fetch_all_advisors(&self) -> Result<Vec<Advisor>> {
        Ok(self.advisors.clone())
    }

    async fn fetch_all_enrollments(&self) -> Result<Vec<Enrollment>> {
        Ok(self.enrollments.clone())
    }

    async fn fetch_enrolled_ids(&self, student_id: StudentId) -> Result<HashSet<CourseId>> {
        Ok(self
            .enrollments
            .iter()
            .filter(|e| e.user_id == student_id)
            .map(|e| e.course_id)
            .collect())
    }

    async fn remote_rank(&self, student_id: StudentId) -> Result<Option<Vec<Course>>> {
        Ok(self.remote_rankings.get(&student_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_store() {
        let store = MemoryStore::new();
        assert_eq!(store.counts(), (0, 0, 0));

        assert!(store.fetch_all_courses().await.unwrap().is_empty());
        assert!(store.fetch_all_enrollments().await.unwrap().is_empty());
        assert!(store.fetch_enrolled_ids(1).await.unwrap().is_empty());
        assert!(store.remote_rank(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_enrolled_ids_are_per_student() {
        let mut store = MemoryStore::new();
        store.insert_enrollment(Enrollment::new(1, 42));
        store.insert_enrollment(Enrollment::new(2, 42));
        store.insert_enrollment(Enrollment::new(2, 42));
        store.insert_enrollment(Enrollment::new(3, 99));

        let mine = store.fetch_enrolled_ids(42).await.unwrap();
        assert_eq!(mine, HashSet::from([1, 2]));

        // Duplicates stay in the global table
        assert_eq!(store.fetch_all_enrollments().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_remote_ranking_lookup() {
        let mut store = MemoryStore::new();
        store.set_remote_ranking(42, vec![Course::new(9)]);

        let ranked = store.remote_rank(42).await.unwrap().unwrap();
        assert_eq!(ranked[0].id, 9);
        assert!(store.remote_rank(7).await.unwrap().is_none());
    }
}
