//! Core domain types for the course-advising data store.
//!
//! Records arrive as JSON rows from the store. Only the fields the ranking
//! needs are typed; everything else rides along in `extra` so that a course
//! handed back to a caller looks the way the store produced it.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a course
pub type CourseId = i64;

/// Identifier for a student (the `user_id` column of enrollments)
pub type StudentId = i64;

// =============================================================================
// Advisors
// =============================================================================

/// An advisor attached to one or more courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisor {
    /// Whatever key the advisors table uses (integer, UUID, ...)
    #[serde(default)]
    pub id: Option<Value>,
    /// Free-text area of expertise, e.g. "Machine Learning and NLP"
    #[serde(default)]
    pub expertise: Option<String>,
    /// Name, contact and any other columns, untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Advisor {
    pub fn new(id: impl Into<Value>, expertise: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            expertise: Some(expertise.into()),
            extra: Map::new(),
        }
    }
}

/// Wire shapes the embedded `advisors` column can take.
#[derive(Deserialize)]
#[serde(untagged)]
enum AdvisorShape {
    Many(Vec<Advisor>),
    One(Advisor),
    /// A scalar or a malformed list: no usable advisors
    Other(IgnoredAny),
}

/// Normalizes `null`, a single advisor object, or a list into a `Vec`.
///
/// Any other shape reads as no advisors rather than failing the course.
fn deserialize_advisors<'de, D>(deserializer: D) -> Result<Vec<Advisor>, D::Error>
where
    D: Deserializer<'de>,
{
    let shape = Option::<AdvisorShape>::deserialize(deserializer)?;
    Ok(match shape {
        None => Vec::new(),
        Some(AdvisorShape::One(advisor)) => vec![advisor],
        Some(AdvisorShape::Many(advisors)) => advisors,
        Some(AdvisorShape::Other(_)) => Vec::new(),
    })
}

// =============================================================================
// Courses
// =============================================================================

/// A course together with the advisor(s) joined onto it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    /// Creation timestamp as stored. Kept raw: it may be missing, not a
    /// string, or not a valid date, and scoring has to cope with all three.
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_advisors")]
    pub advisors: Vec<Advisor>,
    /// Title, description, credits, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Course {
    pub fn new(id: CourseId) -> Self {
        Self {
            id,
            created_at: None,
            advisors: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Builder-style setter for the creation timestamp.
    pub fn created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(Value::String(created_at.into()));
        self
    }

    /// Builder-style setter appending an advisor.
    pub fn with_advisor(mut self, advisor: Advisor) -> Self {
        self.advisors.push(advisor);
        self
    }

    /// Builder-style setter for a pass-through field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The creation timestamp, if the store gave us a string.
    pub fn created_at_str(&self) -> Option<&str> {
        self.created_at.as_ref().and_then(Value::as_str)
    }

    /// Title column, when present.
    pub fn title(&self) -> Option<&str> {
        self.extra.get("title").and_then(Value::as_str)
    }
}

// =============================================================================
// Enrollments
// =============================================================================

/// One row of the student/course join table.
///
/// Duplicate rows are legal and each one counts towards popularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub course_id: CourseId,
    pub user_id: StudentId,
}

impl Enrollment {
    pub fn new(course_id: CourseId, user_id: StudentId) -> Self {
        Self { course_id, user_id }
    }
}
