//! Loading a [`MemoryStore`] from a JSON fixture file.
//!
//! Format:
//! ```json
//! {
//!   "courses":     [{"id": 1, "title": "...", "created_at": "...", "advisors": {...}}],
//!   "advisors":    [{"id": 7, "name": "...", "expertise": "..."}],
//!   "enrollments": [{"course_id": 1, "user_id": 42}],
//!   "remote_rankings": {"42": [{"id": 3}]}
//! }
//! ```
//! Every section is optional.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{DataAccessError, Result};
use crate::memory::MemoryStore;
use crate::types::{Advisor, Course, CourseId, Enrollment, StudentId};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Fixture {
    courses: Vec<Course>,
    advisors: Vec<Advisor>,
    enrollments: Vec<Enrollment>,
    remote_rankings: HashMap<StudentId, Vec<Course>>,
}

impl MemoryStore {
    /// Load a store from a fixture file on disk.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| DataAccessError::Fixture {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::from_json(&raw)?;

        let (courses, advisors, enrollments) = store.counts();
        info!(
            "Loaded fixture {}: {} courses, {} advisors, {} enrollments",
            path.display(),
            courses,
            advisors,
            enrollments
        );
        Ok(store)
    }

    /// Build a store from fixture JSON text.
    pub fn from_json(raw: &str) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(raw).map_err(|source| {
            DataAccessError::Decode {
                what: "fixture",
                source,
            }
        })?;

        let store = Self {
            courses: fixture.courses,
            advisors: fixture.advisors,
            enrollments: fixture.enrollments,
            remote_rankings: fixture.remote_rankings,
        };
        store.warn_on_dangling_enrollments();
        Ok(store)
    }

    /// Enrollments pointing at unknown courses are kept (they still count
    /// towards popularity of an id nobody will see) but are worth a warning.
    fn warn_on_dangling_enrollments(&self) {
        let known: HashSet<CourseId> = self.courses.iter().map(|c| c.id).collect();
        let dangling = self
            .enrollments
            .iter()
            .filter(|e| !known.contains(&e.course_id))
            .count();
        if dangling > 0 {
            warn!("{} enrollments reference unknown courses", dangling);
        }
    }
}
