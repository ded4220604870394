//! Relevance scoring for candidate courses.
//!
//! A course's score is the sum of three terms:
//! - **popularity**: number of enrollment rows for the course, all students
//! - **expertise match**: +10 for every interest found in the advisors' expertise
//! - **recency**: `max(0, 3 - days_old / 30)`
//!
//! Scoring is total: missing advisors, missing or garbage timestamps and
//! empty interests all just contribute nothing.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use data_access::{Advisor, Course, CourseId, Enrollment};
use rayon::prelude::*;

/// Enrollment count per course, across every student.
pub type PopularityTable = HashMap<CourseId, u32>;

/// Added once per interest found in the expertise text.
pub const INTEREST_MATCH_BONUS: f64 = 10.0;

/// Recency bonus of a course created right now.
pub const MAX_RECENCY_BONUS: f64 = 3.0;

/// Days it takes the recency bonus to drop by one point.
pub const RECENCY_DECAY_DAYS: f64 = 30.0;

// `%#z` takes `+hh`, `+hhmm` and `+hh:mm`
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Count enrollment rows per course. Duplicate rows each count.
pub fn popularity_table(enrollments: &[Enrollment]) -> PopularityTable {
    let mut counts = PopularityTable::new();
    for enrollment in enrollments {
        *counts.entry(enrollment.course_id).or_insert(0) += 1;
    }
    counts
}

/// All advisors' expertise joined by single spaces.
///
/// No advisors gives "", one advisor gives its expertise verbatim, and an
/// advisor without expertise contributes an empty segment.
pub fn expertise_text(advisors: &[Advisor]) -> String {
    advisors
        .iter()
        .map(|a| a.expertise.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
}

/// How many interests appear, case-insensitively, inside the expertise text.
///
/// Plain substring test: "art" matches "party". Every interest in the list
/// is tested on its own, so a repeated interest counts twice.
pub fn interest_matches(advisors: &[Advisor], interests: &[String]) -> u32 {
    let text = expertise_text(advisors);
    if interests.is_empty() || text.is_empty() {
        return 0;
    }

    let lowered = text.to_lowercase();
    interests
        .iter()
        .filter(|interest| !interest.is_empty())
        .filter(|interest| lowered.contains(&interest.to_lowercase()))
        .count() as u32
}

/// Parse a stored creation timestamp.
///
/// Accepts ISO-8601 date-times with `T` or a space as separator, optional
/// fractional seconds and an optional UTC offset (`+05`, `+0530` or
/// `+05:30`). A trailing `Z` means UTC.
/// No offset means UTC. A bare date is midnight UTC. Anything else is `None`.
pub fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }

    let normalized = match raw.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => raw.to_string(),
    };

    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(&normalized, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Whole days in `delta`, rounded towards negative infinity.
fn floor_days(delta: Duration) -> i64 {
    match delta.num_microseconds() {
        Some(micros) => micros.div_euclid(86_400 * 1_000_000),
        None => delta.num_days(),
    }
}

/// Linearly decaying bonus for new courses.
///
/// Only the lower bound is clamped: a course dated in the future gets more
/// than [`MAX_RECENCY_BONUS`].
pub fn recency_bonus(created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(created) = created else {
        return 0.0;
    };
    let days = floor_days(now - created);
    (MAX_RECENCY_BONUS - days as f64 / RECENCY_DECAY_DAYS).max(0.0)
}

/// The three terms that make up a course's score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub popularity: u32,
    pub interest_matches: u32,
    pub recency: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.popularity as f64 + self.interest_matches as f64 * INTEREST_MATCH_BONUS + self.recency
    }
}

/// Break a course's score into its terms.
pub fn score_breakdown(
    course: &Course,
    popularity: &PopularityTable,
    interests: &[String],
    now: DateTime<Utc>,
) -> ScoreBreakdown {
    let created = course.created_at_str().and_then(parse_created_at);
    ScoreBreakdown {
        popularity: popularity.get(&course.id).copied().unwrap_or(0),
        interest_matches: interest_matches(&course.advisors, interests),
        recency: recency_bonus(created, now),
    }
}

/// Score a single course.
pub fn score_course(
    course: &Course,
    popularity: &PopularityTable,
    interests: &[String],
    now: DateTime<Utc>,
) -> f64 {
    score_breakdown(course, popularity, interests, now).total()
}

/// Scores candidates for one request.
///
/// Holds the request-scoped inputs (popularity table, interests and the
/// reference time) so every candidate is scored against the same snapshot.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    popularity: PopularityTable,
    interests: Vec<String>,
    now: DateTime<Utc>,
}

impl ScoringEngine {
    pub fn new(popularity: PopularityTable, interests: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            popularity,
            interests,
            now,
        }
    }

    /// Build the engine straight from the global enrollment rows.
    pub fn from_enrollments(
        enrollments: &[Enrollment],
        interests: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(popularity_table(enrollments), interests, now)
    }

    pub fn popularity(&self) -> &PopularityTable {
        &self.popularity
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn breakdown(&self, course: &Course) -> ScoreBreakdown {
        score_breakdown(course, &self.popularity, &self.interests, self.now)
    }

    pub fn score(&self, course: &Course) -> f64 {
        self.breakdown(course).total()
    }

    /// Score all candidates in parallel.
    ///
    /// # Returns
    /// One breakdown per candidate, in the same order
    pub fn score_all(&self, candidates: &[Course]) -> Vec<ScoreBreakdown> {
        candidates
            .par_iter()
            .map(|course| self.breakdown(course))
            .collect()
    }
}
