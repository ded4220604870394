//! Extension point for deciding which courses a student can be offered.

use anyhow::Result;
use data_access::Course;

use crate::context::StudentContext;

/// Removes courses from a candidate list.
///
/// Implementations must keep the relative order of the courses they let
/// through; ranking ties fall back to catalog order. `Send + Sync` so one
/// pipeline can serve concurrent requests.
pub trait Filter: Send + Sync {
    /// Short name used in debug logs
    fn name(&self) -> &str;

    /// The courses from `candidates` that `context`'s student may be offered.
    fn apply(&self, candidates: Vec<Course>, context: &StudentContext) -> Result<Vec<Course>>;
}
