// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! REST client for the review backend.
//!
//! The backend owns submissions and their status workflow. The editor only
//! fetches a submission to annotate and uploads the saved artifacts.

use crate::config::EditorConfig;
use crate::models::annotation_set::SavePayload;
use crate::models::submission::Submission;
use serde::Deserialize;
use std::io::Read;
use std::time::Duration;

/// Largest image download accepted from the backend.
const MAX_DOWNLOAD_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("apiBaseUrl is not configured")]
    MissingBaseUrl,
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {code}: {body}")]
    Status { code: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Responses come either bare or wrapped in `{ "submission": .. }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SubmissionResponse {
    Wrapped { submission: Submission },
    Bare(Submission),
}

/// Blocking client; call it from a worker thread, never the UI thread.
#[derive(Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &EditorConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();
        Self {
            agent,
            base_url: config.api_base_url.trim().trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        }
    }

    pub fn submission_url(&self, id: &str) -> Result<String, ApiError> {
        if self.base_url.is_empty() {
            return Err(ApiError::MissingBaseUrl);
        }
        Ok(format!("{}/api/submissions/{}", self.base_url, id.trim()))
    }

    /// `GET /api/submissions/{id}`
    pub fn fetch_submission(&self, id: &str) -> Result<Submission, ApiError> {
        let url = self.submission_url(id)?;
        log::info!("Fetching submission {}", id);
        let resp = self
            .request("GET", &url)
            .set("Accept", "application/json")
            .call()
            .map_err(map_ureq_error)?;
        let body = resp
            .into_string()
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        parse_submission(&body)
    }

    /// `PUT /api/submissions/{id}/annotations` with the save payload.
    pub fn save_annotations(&self, id: &str, payload: &SavePayload) -> Result<Submission, ApiError> {
        let url = format!("{}/annotations", self.submission_url(id)?);
        let body = serde_json::to_string(payload)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        log::info!(
            "Uploading {} annotations for submission {}",
            payload.annotation_data.shapes.len(),
            id
        );
        let resp = self
            .request("PUT", &url)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
            .send_string(&body)
            .map_err(map_ureq_error)?;
        let body = resp
            .into_string()
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        parse_submission(&body)
    }

    /// Download raw bytes (used for image URLs).
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let resp = self.request("GET", url).call().map_err(map_ureq_error)?;
        let mut bytes = Vec::new();
        resp.into_reader()
            .take(MAX_DOWNLOAD_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(bytes)
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        let request = self
            .agent
            .request(method, url)
            .set("User-Agent", concat!("toothmark/", env!("CARGO_PKG_VERSION")));
        match &self.token {
            Some(token) => request.set("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }
}

fn map_ureq_error(error: ureq::Error) -> ApiError {
    match error {
        ureq::Error::Status(code, resp) => ApiError::Status {
            code,
            body: resp.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => ApiError::Network(transport.to_string()),
    }
}

fn parse_submission(body: &str) -> Result<Submission, ApiError> {
    let response: SubmissionResponse =
        serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
    Ok(match response {
        SubmissionResponse::Wrapped { submission } => submission,
        SubmissionResponse::Bare(submission) => submission,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submission::SubmissionStatus;

    #[test]
    fn test_submission_url() {
        let config = EditorConfig {
            api_base_url: "http://localhost:5000/".to_string(),
            ..EditorConfig::default()
        };
        let client = ApiClient::new(&config);
        assert_eq!(
            client.submission_url("65f0c").unwrap(),
            "http://localhost:5000/api/submissions/65f0c"
        );
    }

    #[test]
    fn test_missing_base_url() {
        let client = ApiClient::new(&EditorConfig::default());
        assert!(matches!(
            client.submission_url("65f0c"),
            Err(ApiError::MissingBaseUrl)
        ));
    }

    #[test]
    fn test_parse_wrapped_and_bare_submission() {
        let bare = parse_submission(r#"{"id":"a","imageUrl":"/u/a.jpg","status":"annotated"}"#)
            .unwrap();
        assert_eq!(bare.status, SubmissionStatus::Annotated);

        let wrapped = parse_submission(
            r#"{"submission":{"id":"b","imageUrl":"/u/b.jpg","status":"uploaded"}}"#,
        )
        .unwrap();
        assert_eq!(wrapped.id, "b");

        assert!(matches!(
            parse_submission("not json"),
            Err(ApiError::InvalidResponse(_))
        ));
    }
}
