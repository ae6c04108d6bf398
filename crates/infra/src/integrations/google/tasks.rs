//! Google Tasks client

use async_trait::async_trait;
use intentrelay_core::{CreatedTask, NewTask, TaskGateway};
use intentrelay_domain::{IntentRelayError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::upstream_error;
use crate::http::{Delivery, HttpClient};

/// Inserts tasks through the Tasks v1 REST API
pub struct GoogleTasksClient {
    http: HttpClient,
    base_url: String,
}

impl GoogleTasksClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into().trim_end_matches('/').to_string() }
    }
}

#[async_trait]
impl TaskGateway for GoogleTasksClient {
    async fn insert_task(&self, access_token: &str, task: &NewTask) -> Result<CreatedTask> {
        let url = format!("{}/lists/{}/tasks", self.base_url, task.task_list_id);
        let body = TaskRequest {
            title: &task.title,
            notes: &task.notes,
            due: task.due.map(|date| date.format("%Y-%m-%d").to_string()),
            status: &task.status,
        };

        let response = self
            .http
            .send(
                self.http.request(Method::POST, &url).bearer_auth(access_token).json(&body),
                Delivery::AtMostOnce,
            )
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error("Tasks", response).await);
        }

        let created: TaskResponse = response.json().await.map_err(|e| {
            IntentRelayError::Upstream(format!("Failed to parse Tasks response: {e}"))
        })?;

        if created.id.is_empty() {
            return Err(IntentRelayError::Upstream("Failed to create task".into()));
        }

        debug!(task_id = %created.id, "task inserted");

        Ok(CreatedTask {
            id: created.id,
            title: created.title.unwrap_or_else(|| task.title.clone()),
            due: created.due.or(body.due),
            status: created.status.unwrap_or_else(|| task.status.clone()),
        })
    }
}

#[derive(Debug, Serialize)]
struct TaskRequest<'a> {
    title: &'a str,
    notes: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    due: Option<String>,
    status: &'a str,
}

#[derive(Debug, Deserialize)]
struct TaskResponse {
    #[serde(default)]
    id: String,
    title: Option<String>,
    due: Option<String>,
    status: Option<String>,
}
