//! # Ranking Orchestrator
//!
//! This module coordinates a recommendation request:
//! 1. Ask the data store for its precomputed ranking
//! 2. If that yields nothing, fall back to ranking locally:
//!    a. Fetch courses, enrollments and the student's enrollments (concurrently)
//!    b. Filter out courses the student already takes
//!    c. Score the remaining candidates
//!    d. Stable-sort by score and keep the top N
//!
//! A failing remote ranking is an ordinary branch, not an error. A failing
//! fetch on the fallback path ends the request with
//! [`RecommendError::DataAccess`].

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{error, info, warn};

use data_access::{Course, DataAccessError, DataStore, StudentId};
use pipeline::{FilterPipeline, ScoreBreakdown, ScoringEngine, StudentContext};

/// Number of recommendations when the caller doesn't say.
pub const DEFAULT_LIMIT: usize = 5;

/// Errors that end a recommendation request
#[derive(Error, Debug)]
pub enum RecommendError {
    /// A fallback fetch failed; ranking on partial data would mislead
    #[error("upstream data fetch failed: {0}")]
    DataAccess(#[from] DataAccessError),

    /// Anything else (filter failure, scoring task died)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Outcome of asking the data store for a precomputed ranking
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteRanking {
    /// A non-empty ranked list, to be returned as-is
    Ranked(Vec<Course>),
    /// Nothing usable: the call failed or came back empty
    Unavailable,
}

/// Where a recommendation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingSource {
    Remote,
    Local,
}

/// A recommended course, with its score when ranked locally
#[derive(Debug, Clone)]
pub struct CourseRecommendation {
    pub course: Course,
    pub source: RankingSource,
    pub breakdown: Option<ScoreBreakdown>,
}

impl CourseRecommendation {
    pub fn score(&self) -> Option<f64> {
        self.breakdown.as_ref().map(ScoreBreakdown::total)
    }

    /// Human-readable account of the score
    pub fn explanation(&self) -> String {
        match &self.breakdown {
            Some(b) => format!(
                "Score: {:.2} (popularity {}, {} interest match(es), recency {:.2})",
                b.total(),
                b.popularity,
                b.interest_matches,
                b.recency
            ),
            None => "Precomputed ranking from the data store".to_string(),
        }
    }
}

/// Main orchestrator that coordinates the ranking strategy
#[derive(Clone)]
pub struct RankingOrchestrator {
    store: Arc<dyn DataStore>,
    filter_pipeline: Arc<FilterPipeline>,
}

impl RankingOrchestrator {
    /// Create an orchestrator reading from `store`
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            filter_pipeline: Arc::new(FilterPipeline::standard()),
        }
    }

    /// The data store this orchestrator reads from
    pub fn store(&self) -> &Arc<dyn DataStore> {
        &self.store
    }

    /// Main entry point: recommend courses for a student
    ///
    /// # Returns
    /// At most `limit` courses from the local path, or the remote ranking
    /// unchanged when the data store provides one
    pub async fn recommend(
        &self,
        student_id: StudentId,
        interests: &[String],
        limit: usize,
    ) -> Result<Vec<CourseRecommendation>, RecommendError> {
        let start_time = Instant::now();

        if let RemoteRanking::Ranked(courses) = self.try_remote(student_id).await {
            info!(
                "Remote ranking returned {} recommendations for student {}",
                courses.len(),
                student_id
            );
            return Ok(courses
                .into_iter()
                .map(|course| CourseRecommendation {
                    course,
                    source: RankingSource::Remote,
                    breakdown: None,
                })
                .collect());
        }

        let recommendations = self
            .fallback_recommend_at(student_id, interests, limit, Utc::now())
            .await?;

        info!(
            "Ranked {} recommendations locally for student {} in {:.2?}",
            recommendations.len(),
            student_id,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Ask the data store for its precomputed ranking.
    ///
    /// Never fails: errors and empty answers both become `Unavailable`.
    pub async fn try_remote(&self, student_id: StudentId) -> RemoteRanking {
        info!("Attempting remote ranking for student_id={}", student_id);
        match self.store.remote_rank(student_id).await {
            Ok(Some(courses)) if !courses.is_empty() => RemoteRanking::Ranked(courses),
            Ok(_) => {
                info!("Remote ranking returned no data, falling back to local ranking");
                RemoteRanking::Unavailable
            }
            Err(e) => {
                warn!("Remote ranking failed, falling back to local ranking: {}", e);
                RemoteRanking::Unavailable
            }
        }
    }

    /// Local ranking with an explicit reference time
    pub async fn fallback_recommend_at(
        &self,
        student_id: StudentId,
        interests: &[String],
        limit: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<CourseRecommendation>, RecommendError> {
        // The three reads are independent; the first failure aborts the rest
        let (courses, enrollments, enrolled) = tokio::try_join!(
            self.store.fetch_all_courses(),
            self.store.fetch_all_enrollments(),
            self.store.fetch_enrolled_ids(student_id),
        )
        .map_err(|e| {
            error!("Data fetch error in local ranking: {}", e);
            RecommendError::DataAccess(e)
        })?;
        info!(
            "Fetched {} courses, {} enrollments; student {} enrolled in {}",
            courses.len(),
            enrollments.len(),
            student_id,
            enrolled.len()
        );

        let context = StudentContext::new(student_id)
            .with_enrolled(enrolled)
            .with_interests(interests.iter().cloned());

        let candidates = self
            .filter_pipeline
            .apply(courses, &context)
            .map_err(|e| RecommendError::Internal(format!("Failed to apply filters: {e:#}")))?;

        let engine = ScoringEngine::from_enrollments(&enrollments, context.interests.clone(), now);

        // Scoring fans out over rayon; keep it off the async workers
        let (candidates, breakdowns) = tokio::task::spawn_blocking(move || {
            let breakdowns = engine.score_all(&candidates);
            (candidates, breakdowns)
        })
        .await
        .map_err(|e| RecommendError::Internal(format!("Scoring task failed: {e}")))?;

        Ok(rank_and_select(candidates, breakdowns, limit))
    }
}

/// Sort candidates by score, highest first, and keep the top `limit`.
///
/// The sort is stable: equal scores keep their candidate order.
pub fn rank_and_select(
    candidates: Vec<Course>,
    breakdowns: Vec<ScoreBreakdown>,
    limit: usize,
) -> Vec<CourseRecommendation> {
    let mut scored: Vec<(Course, ScoreBreakdown)> = candidates.into_iter().zip(breakdowns).collect();

    scored.sort_by(|a, b| {
        b.1.total()
            .partial_cmp(&a.1.total())
            .unwrap_or(Ordering::Equal)
    });
    scored.truncate(limit);

    scored
        .into_iter()
        .map(|(course, breakdown)| CourseRecommendation {
            course,
            source: RankingSource::Local,
            breakdown: Some(breakdown),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(popularity: u32) -> ScoreBreakdown {
        ScoreBreakdown {
            popularity,
            interest_matches: 0,
            recency: 0.0,
        }
    }

    #[test]
    fn test_rank_and_select_sorts_by_score_descending() {
        let candidates = vec![Course::new(1), Course::new(2), Course::new(3)];
        let scores = vec![breakdown(2), breakdown(9), breakdown(5)];

        let ranked = rank_and_select(candidates, scores, 10);

        let ids: Vec<_> = ranked.iter().map(|r| r.course.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(ranked[0].score(), Some(9.0));
        assert!(ranked.iter().all(|r| r.source == RankingSource::Local));
    }

    #[test]
    fn test_rank_and_select_truncates_to_limit() {
        let candidates: Vec<_> = (1..=5).map(Course::new).collect();
        let scores: Vec<_> = (1..=5).map(breakdown).collect();

        let ranked = rank_and_select(candidates, scores, 3);

        let ids: Vec<_> = ranked.iter().map(|r| r.course.id).collect();
        assert_eq!(ids, vec![5, 4, 3]);
    }

    #[test]
    fn test_rank_and_select_limit_zero() {
        let ranked = rank_and_select(vec![Course::new(1)], vec![breakdown(1)], 0);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_rank_and_select_is_stable() {
        let candidates = vec![Course::new(10), Course::new(20), Course::new(30), Course::new(40)];
        let scores = vec![breakdown(1), breakdown(7), breakdown(1), breakdown(7)];

        let ranked = rank_and_select(candidates, scores, 10);

        let ids: Vec<_> = ranked.iter().map(|r| r.course.id).collect();
        assert_eq!(ids, vec![20, 40, 10, 30]);
    }

    #[test]
    fn test_rank_and_select_handles_empty_input() {
        assert!(rank_and_select(vec![], vec![], 5).is_empty());
    }

    #[test]
    fn test_explanation() {
        let local = CourseRecommendation {
            course: Course::new(1),
            source: RankingSource::Local,
            breakdown: Some(ScoreBreakdown {
                popularity: 1,
                interest_matches: 1,
                recency: 3.0,
            }),
        };
        assert!(local.explanation().starts_with("Score: 14.00"));

        let remote = CourseRecommendation {
            course: Course::new(1),
            source: RankingSource::Remote,
            breakdown: None,
        };
        assert_eq!(remote.score(), None);
        assert!(remote.explanation().contains("Precomputed"));
    }
}
