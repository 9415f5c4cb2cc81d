//! HTTP gateway for the task API.
//!
//! Wraps the five REST endpoints behind typed methods and normalizes
//! every failure (transport, HTTP status, body decode) into [`ApiError`].
//! Calls are single attempts. No retries, no caching.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::task::{SubTask, Task};
use crate::tlog_trace;

/// Broad classification of a gateway failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 4xx response
    ClientError,
    /// 5xx or any other non-success status
    ServerError,
    /// Request never produced an HTTP response
    NetworkError,
    /// Response arrived but the body did not parse
    DecodeError,
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ApiErrorKind::ClientError => "client error",
            ApiErrorKind::ServerError => "server error",
            ApiErrorKind::NetworkError => "network error",
            ApiErrorKind::DecodeError => "decode error",
        };
        write!(f, "{}", s)
    }
}

/// Map an HTTP status to an error kind.
pub fn classify_status(status: u16) -> ApiErrorKind {
    match status {
        400..=499 => ApiErrorKind::ClientError,
        _ => ApiErrorKind::ServerError,
    }
}

/// Body of a non-2xx response, resolved at the gateway boundary.
///
/// The server answers either with `{"message": "..."}` or with a
/// field-keyed validation object like `{"title": "Title is required"}`.
/// `Message` must stay declared first: untagged deserialization tries
/// variants in order, and a map would also swallow a message body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    Message { message: String },
    Validation(BTreeMap<String, String>),
}

/// A failed gateway call: what kind of failure, the HTTP status when one
/// was received, and the parsed error body when there was one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
    pub payload: Option<ErrorPayload>,
}

impl ApiError {
    pub fn network(message: String) -> Self {
        Self {
            kind: ApiErrorKind::NetworkError,
            status: None,
            message,
            payload: None,
        }
    }

    pub fn decode(message: String) -> Self {
        Self {
            kind: ApiErrorKind::DecodeError,
            status: None,
            message,
            payload: None,
        }
    }

    pub fn http(status: u16, payload: Option<ErrorPayload>) -> Self {
        let message = match &payload {
            Some(ErrorPayload::Message { message }) => message.clone(),
            _ => format!("Request failed with status code {}", status),
        };
        Self {
            kind: classify_status(status),
            status: Some(status),
            message,
            payload,
        }
    }

    /// Human-readable rendering for the UI.
    ///
    /// A 400 carrying a field-keyed validation object is flattened to the
    /// field messages joined with ", "; everything else uses the envelope
    /// message as-is.
    pub fn user_message(&self) -> String {
        if self.status == Some(400) {
            if let Some(ErrorPayload::Validation(fields)) = &self.payload {
                return fields.values().cloned().collect::<Vec<_>>().join(", ");
            }
        }
        self.message.clone()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {}): {}", self.kind, status, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Thin client over the task API. Cheap to clone; the inner
/// `reqwest::Client` shares its connection pool across clones.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let mut base_url = base_url.to_string();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tlog_trace!("GET {}", url);
        Self::read_response(self.client.get(&url).send().await).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tlog_trace!("POST {}", url);
        Self::read_response(self.client.post(&url).json(body).send().await).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tlog_trace!("PATCH {}", url);
        Self::read_response(self.client.patch(&url).json(body).send().await).await
    }

    async fn read_response<T: DeserializeOwned>(
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, ApiError> {
        let resp = result.map_err(|e| ApiError::network(e.to_string()))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;
        tlog_trace!("response status={} body={}", status.as_u16(), text);

        if !status.is_success() {
            let payload = serde_json::from_str::<ErrorPayload>(&text).ok();
            return Err(ApiError::http(status.as_u16(), payload));
        }

        serde_json::from_str(&text)
            .map_err(|e| ApiError::decode(format!("invalid response body: {}", e)))
    }

    // Typed endpoints

    pub async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.get("/tasks").await
    }

    pub async fn create_task(&self, title: &str) -> Result<Task, ApiError> {
        self.post("/tasks", &serde_json::json!({ "title": title }))
            .await
    }

    pub async fn update_task(&self, task_id: i64, done: bool) -> Result<Task, ApiError> {
        self.patch(
            &format!("/tasks/{}", task_id),
            &serde_json::json!({ "done": done }),
        )
        .await
    }

    pub async fn create_sub_task(&self, task_id: i64, title: &str) -> Result<SubTask, ApiError> {
        self.post(
            &format!("/tasks/{}/subTasks", task_id),
            &serde_json::json!({ "title": title }),
        )
        .await
    }

    pub async fn update_sub_task(
        &self,
        task_id: i64,
        sub_task_id: i64,
        done: bool,
    ) -> Result<SubTask, ApiError> {
        self.patch(
            &format!("/tasks/{}/subTasks/{}", task_id, sub_task_id),
            &serde_json::json!({ "done": done }),
        )
        .await
    }
}
