//! Test doubles shared by the server integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use data_access::{
    Advisor, Course, CourseId, DataAccessError, DataStore, Enrollment, MemoryStore, Result,
    StudentId,
};

/// How the remote ranking call behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoteMode {
    /// Whatever the wrapped MemoryStore has registered
    #[default]
    FromStore,
    /// Fail the call
    Fail,
}

/// Wraps a MemoryStore, counts calls and fails operations on request.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub remote_mode: RemoteMode,
    pub fail_courses: bool,
    pub fail_advisors: bool,
    pub fail_enrollments: bool,
    pub fail_enrolled: bool,

    pub remote_calls: AtomicUsize,
    pub course_calls: AtomicUsize,
    pub advisor_calls: AtomicUsize,
    pub enrollment_calls: AtomicUsize,
    pub enrolled_calls: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Total calls to the three fallback-path fetches
    pub fn fallback_calls(&self) -> usize {
        self.course_calls.load(Ordering::SeqCst)
            + self.enrollment_calls.load(Ordering::SeqCst)
            + self.enrolled_calls.load(Ordering::SeqCst)
    }
}

fn refused(what: &'static str) -> DataAccessError {
    DataAccessError::Unavailable {
        what,
        reason: "connection refused".to_string(),
    }
}

#[async_trait]
impl DataStore for CountingStore {
    async fn fetch_all_courses(&self) -> Result<Vec<Course>> {
        self.course_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_courses {
            return Err(refused("courses"));
        }
        self.inner.fetch_all_courses().await
    }

    async fn fetch_all_advisors(&self) -> Result<Vec<Advisor>> {
        self.advisor_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_advisors {
            return Err(refused("advisors"));
        }
        self.inner.fetch_all_advisors().await
    }

    async fn fetch_all_enrollments(&self) -> Result<Vec<Enrollment>> {
        self.enrollment_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_enrollments {
            return Err(refused("enrollments"));
        }
        self.inner.fetch_all_enrollments().await
    }

    async fn fetch_enrolled_ids(&self, student_id: StudentId) -> Result<HashSet<CourseId>> {
        self.enrolled_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_enrolled {
            return Err(refused("my enrollments"));
        }
        self.inner.fetch_enrolled_ids(student_id).await
    }

    async fn remote_rank(&self, student_id: StudentId) -> Result<Option<Vec<Course>>> {
        self.remote_calls.fetch_add(1, Ordering::SeqCst);
        match self.remote_mode {
            RemoteMode::Fail => Err(refused("recommend rpc")),
            RemoteMode::FromStore => self.inner.remote_rank(student_id).await,
        }
    }
}

/// The catalog from the end-to-end scenario: a brand-new AI course with one
/// enrollment, and an old course with no advisors.
pub fn scenario_store(now_rfc3339: &str, old_rfc3339: &str) -> MemoryStore {
    let fixture = serde_json::json!({
        "courses": [
            {"id": 1, "title": "Intro to AI", "created_at": now_rfc3339,
             "advisors": {"id": 1, "expertise": "AI"}},
            {"id": 2, "title": "History of Computing", "created_at": old_rfc3339,
             "advisors": null}
        ],
        "advisors": [{"id": 1, "name": "Dr. Smith", "expertise": "AI"}],
        "enrollments": [{"course_id": 1, "user_id": 99}]
    });
    MemoryStore::from_json(&fixture.to_string()).expect("scenario fixture")
}
