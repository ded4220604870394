//! Pipeline for filtering and scoring candidate courses.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - ScoringEngine for the popularity / expertise / recency score
//!
//! ## Architecture
//! The pipeline processes candidates in stages:
//! 1. Filters remove unwanted candidates (courses already taken)
//! 2. ScoringEngine scores the remaining candidates
//! 3. The caller sorts by score and keeps the top N
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterPipeline, ScoringEngine, StudentContext};
//!
//! let context = StudentContext::new(42)
//!     .with_enrolled(enrolled_ids)
//!     .with_interests(["ai"]);
//!
//! let candidates = FilterPipeline::standard().apply(all_courses, &context)?;
//!
//! let engine = ScoringEngine::from_enrollments(&enrollments, context.interests.clone(), Utc::now());
//! let scores = engine.score_all(&candidates);
//! ```

pub mod context;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod scoring;

// Re-export main types
pub use context::StudentContext;
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
pub use scoring::{PopularityTable, ScoreBreakdown, ScoringEngine};
