//! PostgREST (Supabase) implementation of [`DataStore`].
//!
//! Tables read:
//! - `courses?select=*,advisors(*)` - courses with advisors embedded
//! - `advisors?select=*`
//! - `enrollments?select=course_id,user_id`
//! - `enrollments?select=course_id&user_id=eq.{id}`
//!
//! and the `recommend_courses` RPC for the precomputed ranking.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::error::{DataAccessError, Result};
use crate::store::DataStore;
use crate::types::{Advisor, Course, CourseId, Enrollment, StudentId};

/// Name of the ranking procedure exposed by the database.
pub const RECOMMEND_RPC: &str = "recommend_courses";

#[derive(Deserialize)]
struct EnrolledCourse {
    course_id: CourseId,
}

/// HTTP client for a Supabase project's REST endpoint.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseStore {
    /// Build a client for the project at `base_url`.
    ///
    /// `timeout` bounds every request this store makes.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| DataAccessError::Request {
                what: "client",
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Base URL of the project this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    /// GET a table with PostgREST query parameters.
    async fn select<T: DeserializeOwned>(
        &self,
        what: &'static str,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self.client.get(self.rest_url(table)).query(query);
        self.send(what, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        what: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|source| DataAccessError::Request { what, source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| DataAccessError::Request { what, source })?;

        if !status.is_success() {
            return Err(DataAccessError::Status {
                what,
                status: status.as_u16(),
                body,
            });
        }

        debug!("{} fetch returned {} bytes", what, body.len());
        serde_json::from_str(&body).map_err(|source| DataAccessError::Decode { what, source })
    }
}

#[async_trait]
impl DataStore for SupabaseStore {
    async fn fetch_all_courses(&self) -> Result<Vec<Course>> {
        let courses: Option<Vec<Course>> = self
            .select("courses", "courses", &[("select", "*,advisors(*)".to_string())])
            .await?;
        Ok(courses.unwrap_or_default())
    }

    async fn fetch_all_advisors(&self) -> Result<Vec<Advisor>> {
        let advisors: Option<Vec<Advisor>> = self
            .select("advisors", "advisors", &[("select", "*".to_string())])
            .await?;
        Ok(advisors.unwrap_or_default())
    }

    async fn fetch_all_enrollments(&self) -> Result<Vec<Enrollment>> {
        let enrollments: Option<Vec<Enrollment>> = self
            .select(
                "enrollments",
                "enrollments",
                &[("select", "course_id,user_id".to_string())],
            )
            .await?;
        Ok(enrollments.unwrap_or_default())
    }

    async fn fetch_enrolled_ids(&self, student_id: StudentId) -> Result<HashSet<CourseId>> {
        let rows: Option<Vec<EnrolledCourse>> = self
            .select(
                "my enrollments",
                "enrollments",
                &[
                    ("select", "course_id".to_string()),
                    ("user_id", format!("eq.{student_id}")),
                ],
            )
            .await?;
        Ok(rows
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.course_id)
            .collect())
    }

    async fn remote_rank(&self, student_id: StudentId) -> Result<Option<Vec<Course>>> {
        let request = self
            .client
            .post(self.rest_url(&format!("rpc/{RECOMMEND_RPC}")))
            .json(&json!({ "student_id": student_id }));
        self.send("recommend rpc", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store =
            SupabaseStore::new("https://example.supabase.co/", "key", Duration::from_secs(1))
                .unwrap();
        assert_eq!(store.base_url(), "https://example.supabase.co");
        assert_eq!(
            store.rest_url("courses"),
            "https://example.supabase.co/rest/v1/courses"
        );
    }
}
