//! HTTP repository for a Supabase-style REST backend.
//!
//! Endpoints, relative to `base_url`:
//!
//! | call                 | method | path                                         |
//! |----------------------|--------|----------------------------------------------|
//! | `health_check`       | GET    | `/health`                                    |
//! | `load_periods`       | GET    | `/schools/{school}/periods`                  |
//! | `load_draft_entries` | GET    | `/schools/{school}/drafts/{draft}/entries`   |
//! | `save_draft_entries` | PUT    | `/schools/{school}/drafts/{draft}/entries`   |
//! | `check_slot`         | POST   | `/schools/{school}/drafts/{draft}/check-slot`|
//! | `publish_draft`      | POST   | `/schools/{school}/drafts/{draft}/publish`   |
//!
//! Upstream period and entry records go through the ingestion normalisers, so
//! alternate field names from older backends are accepted.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::db::models::{
    OperationOutcome, PublishDraftRequest, SaveDraftRequest, SlotCheckRequest, SlotCheckResponse,
};
use crate::db::repository::*;
use crate::models::{DraftId, Period, ScheduleEntry, SchoolId};
use crate::parsing::records::normalize_all;
use crate::parsing::{normalize_entry, normalize_period, RawEntry, RawPeriod};

/// Connection settings of the REST backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    pub base_url: String,
    /// Sent as `apikey` and as bearer token.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Database schema selected through `Accept-Profile`/`Content-Profile`.
    pub schema: Option<String>,
}

impl RestConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_secs: 30,
            schema: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Read `SCHEDULER_API_URL` and the optional `SCHEDULER_API_KEY`.
    pub fn from_env() -> Result<Self, String> {
        let base_url = std::env::var("SCHEDULER_API_URL")
            .map_err(|_| "SCHEDULER_API_URL is not set".to_string())?;
        let mut config = Self::new(base_url);
        config.api_key = std::env::var("SCHEDULER_API_KEY").ok().filter(|k| !k.is_empty());
        Ok(config)
    }
}

pub struct RestRepository {
    client: Client,
    config: RestConfig,
}

impl RestRepository {
    pub fn new(config: RestConfig) -> RepositoryResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(RepositoryError::configuration(
                "REST repository requires a base URL",
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RepositoryError::internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn draft_path(school_id: &SchoolId, draft_id: &DraftId, tail: &str) -> String {
        format!("/schools/{}/drafts/{}/{}", school_id, draft_id, tail)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, self.url(path));
        if let Some(key) = self.config.api_key.as_deref() {
            builder = builder.header("apikey", key).bearer_auth(key);
        }
        if let Some(schema) = self.config.schema.as_deref() {
            builder = builder
                .header("Accept-Profile", schema)
                .header("Content-Profile", schema);
        }
        builder
    }

    /// Send the request and decode a 2xx JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        operation: &str,
    ) -> RepositoryResult<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(operation))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<empty response>".to_string());

        if !status.is_success() {
            return Err(status_error(status, body.trim(), operation));
        }

        serde_json::from_str(&body).map_err(|e| {
            RepositoryError::validation(format!("Failed to parse response: {}", e))
                .with_operation(operation)
        })
    }

    async fn send_with_body<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        operation: &str,
    ) -> RepositoryResult<T> {
        self.send_json(self.request(method, path).json(body), operation)
            .await
    }
}

fn status_error(status: StatusCode, body: &str, operation: &str) -> RepositoryError {
    let message = format!("{} returned {}: {}", operation, status, body);
    let context = ErrorContext::new(operation).with_details(format!("status={}", status.as_u16()));
    match status {
        StatusCode::NOT_FOUND => RepositoryError::not_found_with_context(message, context),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RepositoryError::ConfigurationError {
            message,
            context,
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            RepositoryError::TimeoutError {
                message,
                context: context.retryable(),
            }
        }
        s if s.is_server_error() => {
            RepositoryError::query_with_context(message, context.retryable())
        }
        _ => RepositoryError::query_with_context(message, context),
    }
}

#[async_trait]
impl ScheduleRepository for RestRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        match self.request(Method::GET, "/health").send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => Err(RepositoryError::from(e).with_operation("health_check")),
        }
    }

    async fn load_periods(&self, school_id: &SchoolId) -> RepositoryResult<Vec<Period>> {
        let path = format!("/schools/{}/periods", school_id);
        let raw: Vec<RawPeriod> = self
            .send_json(self.request(Method::GET, &path), "load_periods")
            .await?;
        Ok(normalize_all(raw, "period", normalize_period))
    }

    async fn load_draft_entries(
        &self,
        school_id: &SchoolId,
        draft_id: &DraftId,
    ) -> RepositoryResult<Vec<ScheduleEntry>> {
        let path = Self::draft_path(school_id, draft_id, "entries");
        let raw: Vec<RawEntry> = self
            .send_json(self.request(Method::GET, &path), "load_draft_entries")
            .await
            .map_err(|e| e.for_draft(school_id, draft_id))?;
        Ok(raw.into_iter().map(normalize_entry).collect())
    }

    async fn save_draft_entries(
        &self,
        school_id: &SchoolId,
        draft_id: &DraftId,
        entries: &[ScheduleEntry],
    ) -> RepositoryResult<OperationOutcome> {
        let path = Self::draft_path(school_id, draft_id, "entries");
        self.send_with_body(
            Method::PUT,
            &path,
            &SaveDraftRequest { entries },
            "save_draft_entries",
        )
        .await
        .map_err(|e| e.for_draft(school_id, draft_id))
    }
}

#[async_trait]
impl PublishRepository for RestRepository {
    async fn check_slot(
        &self,
        school_id: &SchoolId,
        draft_id: &DraftId,
        request: &SlotCheckRequest,
    ) -> RepositoryResult<SlotCheckResponse> {
        let path = Self::draft_path(school_id, draft_id, "check-slot");
        self.send_with_body(Method::POST, &path, request, "check_slot")
            .await
            .map_err(|e| e.for_draft(school_id, draft_id))
    }

    async fn publish_draft(
        &self,
        school_id: &SchoolId,
        draft_id: &DraftId,
        published_by: &str,
    ) -> RepositoryResult<OperationOutcome> {
        let path = Self::draft_path(school_id, draft_id, "publish");
        self.send_with_body(
            Method::POST,
            &path,
            &PublishDraftRequest { published_by },
            "publish_draft",
        )
        .await
        .map_err(|e| e.for_draft(school_id, draft_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_base_url() {
        assert!(RestRepository::new(RestConfig::new("  ")).is_err());
    }

    #[test]
    fn test_url_joining() {
        let repo = RestRepository::new(RestConfig::new("https://api.example.org/v1/")).unwrap();
        assert_eq!(
            repo.url(&RestRepository::draft_path(
                &SchoolId::from("s1"),
                &DraftId::from("d1"),
                "publish"
            )),
            "https://api.example.org/v1/schools/s1/drafts/d1/publish"
        );
    }

    #[test]
    fn test_status_mapping() {
        let err = status_error(StatusCode::NOT_FOUND, "", "load_draft_entries");
        assert!(matches!(err, RepositoryError::NotFound { .. }));

        let err = status_error(StatusCode::BAD_GATEWAY, "upstream", "save_draft_entries");
        assert!(err.is_retryable());

        let err = status_error(StatusCode::UNPROCESSABLE_ENTITY, "bad", "publish_draft");
        assert!(!err.is_retryable());
        assert_eq!(err.context().operation.as_deref(), Some("publish_draft"));
    }
}
