//! Per-request student context.
//!
//! Gathers what the filters and the scoring pass need to know about the
//! requesting student, so neither has to go back to the data store.

use std::collections::HashSet;

use data_access::{CourseId, StudentId};

/// What we know about the student a ranking is computed for.
#[derive(Debug, Clone, Default)]
pub struct StudentContext {
    pub student_id: StudentId,
    /// Courses the student is already enrolled in
    pub enrolled_courses: HashSet<CourseId>,
    /// Declared interests, in request order
    pub interests: Vec<String>,
}

impl StudentContext {
    pub fn new(student_id: StudentId) -> Self {
        Self {
            student_id,
            ..Self::default()
        }
    }

    /// Builder-style setter for the enrolled course set.
    pub fn with_enrolled(mut self, enrolled: impl IntoIterator<Item = CourseId>) -> Self {
        self.enrolled_courses = enrolled.into_iter().collect();
        self
    }

    /// Builder-style setter for interests.
    pub fn with_interests<S: Into<String>>(mut self, interests: impl IntoIterator<Item = S>) -> Self {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_enrolled(&self, course_id: CourseId) -> bool {
        self.enrolled_courses.contains(&course_id)
    }
}
