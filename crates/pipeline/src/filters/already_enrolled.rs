//! Filter to remove courses the student is already enrolled in.
//!
//! This runs before scoring, as there's no point in ranking a course
//! the student has already taken.

use crate::context::StudentContext;
use crate::traits::Filter;
use anyhow::Result;
use data_access::Course;

/// Removes candidates whose id is in the student's enrolled set.
///
/// ## Algorithm
/// Uses the HashSet in StudentContext.enrolled_courses for O(1) lookups.
/// Order of the surviving courses is unchanged.
pub struct AlreadyEnrolledFilter;

impl Filter for AlreadyEnrolledFilter {
    fn name(&self) -> &str {
        "AlreadyEnrolledFilter"
    }

    fn apply(&self, candidates: Vec<Course>, context: &StudentContext) -> Result<Vec<Course>> {
        let filtered: Vec<Course> = candidates
            .into_iter()
            .filter(|course| !context.is_enrolled(course.id))
            .collect();
        Ok(filtered)
    }
}
