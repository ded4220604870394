//! Narrowing the catalog down to the courses a student may be offered.

use anyhow::Result;
use data_access::Course;
use tracing::debug;

use crate::context::StudentContext;
use crate::filters::AlreadyEnrolledFilter;
use crate::traits::Filter;

/// Course filters run in insertion order; each sees the survivors of the
/// previous one.
///
/// ```ignore
/// let candidates = FilterPipeline::standard().apply(all_courses, &context)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// A pipeline that lets every course through.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Drops the student's own courses; what every recommendation uses.
    pub fn standard() -> Self {
        Self::new().add_filter(AlreadyEnrolledFilter)
    }

    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run `courses` through every filter for `context`'s student.
    ///
    /// Stops at the first filter error.
    pub fn apply(&self, courses: Vec<Course>, context: &StudentContext) -> Result<Vec<Course>> {
        self.filters.iter().try_fold(courses, |remaining, filter| {
            let before = remaining.len();
            let kept = filter.apply(remaining, context)?;
            debug!(
                "{} kept {}/{} courses for student {}",
                filter.name(),
                kept.len(),
                before,
                context.student_id
            );
            Ok(kept)
        })
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
