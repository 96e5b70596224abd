//! HTTP client for the task manager backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::types::{
    ActiveSession, ApiErrorBody, EndedSession, FocusObjective, FocusStats, LoginRequest,
    NewObjective, ObjectiveId, ObjectiveUpdate, SessionRecord, StartSessionRequest,
    StartedSession, Task, TaskId,
};
use super::{FocusApi, ObjectiveApi};
use crate::config::ServerConfig;
use crate::error::FocusdeskError;

/// Login credentials for the backend.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Backend API client.
///
/// The backend authenticates with a session cookie, so one client instance
/// must be used for `login` and every later call.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: Client,
}

impl BackendClient {
    /// Create a client for `base_url` with an optional per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, FocusdeskError> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    /// Create a client from the `server` config section.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(server: &ServerConfig) -> Result<Self, FocusdeskError> {
        Self::new(
            server.base_url.clone(),
            server.request_timeout_secs.map(Duration::from_secs),
        )
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    async fn check_response(response: Response) -> Result<Response, FocusdeskError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await?;
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.error.or(parsed.message))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    body
                }
            });
        debug!(status = status.as_u16(), %message, "backend rejected request");
        Err(FocusdeskError::rejected(status.as_u16(), message))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FocusdeskError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn post_empty(&self, path: &str) -> Result<Response, FocusdeskError> {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self.http.post(&url).send().await?;
        Self::check_response(response).await
    }

    /// Log in and keep the session cookie for later calls.
    ///
    /// # Errors
    ///
    /// Returns `ServerRejection` on bad credentials or a blocked account.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), FocusdeskError> {
        let url = self.url("api/login");
        debug!(%url, email = %credentials.email, "POST");
        let request = LoginRequest {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
        };
        let response = self.http.post(&url).json(&request).send().await?;
        Self::check_response(response).await?;
        info!(email = %credentials.email, "logged in");
        Ok(())
    }

    /// Tasks assigned to the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn tasks(&self) -> Result<Vec<Task>, FocusdeskError> {
        self.get_json("tasks").await
    }

    /// Tasks that can still be focused on.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn pending_tasks(&self) -> Result<Vec<Task>, FocusdeskError> {
        let mut tasks = self.tasks().await?;
        tasks.retain(Task::is_pending);
        Ok(tasks)
    }

    /// Focus statistics for the last `days` days.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn focus_stats(&self, days: u32) -> Result<FocusStats, FocusdeskError> {
        self.get_json(&format!("api/focus/stats?days={days}")).await
    }

    /// Finished sessions of the last `days` days, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn session_history(&self, days: u32) -> Result<Vec<SessionRecord>, FocusdeskError> {
        self.get_json(&format!("api/focus/sessions?days={days}")).await
    }
}

#[async_trait]
impl FocusApi for BackendClient {
    async fn start_session(&self, task_id: TaskId) -> Result<StartedSession, FocusdeskError> {
        let url = self.url("api/focus/start_session");
        debug!(%url, task_id, "POST");
        let response = self
            .http
            .post(&url)
            .json(&StartSessionRequest { task_id })
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn end_session(&self) -> Result<EndedSession, FocusdeskError> {
        let response = self.post_empty("api/focus/end_session").await?;
        Ok(response.json().await?)
    }

    async fn discard_session(&self) -> Result<(), FocusdeskError> {
        self.post_empty("api/focus/discard_session").await?;
        Ok(())
    }

    async fn active_session(&self) -> Result<Option<ActiveSession>, FocusdeskError> {
        self.get_json("api/focus/active_session").await
    }
}

#[async_trait]
impl ObjectiveApi for BackendClient {
    async fn list_objectives(&self, task_id: TaskId) -> Result<Vec<FocusObjective>, FocusdeskError> {
        self.get_json(&format!("focus_objectives/{task_id}")).await
    }

    async fn create_objective(
        &self,
        objective: NewObjective,
    ) -> Result<FocusObjective, FocusdeskError> {
        let url = self.url("focus_objectives");
        debug!(%url, task_id = objective.task_id, "POST");
        let response = self.http.post(&url).json(&objective).send().await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn update_objective(
        &self,
        objective_id: ObjectiveId,
        update: ObjectiveUpdate,
    ) -> Result<(), FocusdeskError> {
        let url = self.url(&format!("focus_objectives/{objective_id}"));
        debug!(%url, "PUT");
        let response = self.http.put(&url).json(&update).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }

    async fn delete_objective(&self, objective_id: ObjectiveId) -> Result<(), FocusdeskError> {
        let url = self.url(&format!("focus_objectives/{objective_id}"));
        debug!(%url, "DELETE");
        let response = self.http.delete(&url).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }
}
