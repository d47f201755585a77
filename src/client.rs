// Thin reqwest client for the training backend. The backend owns all real
// state; nothing here advances local progress before the server acknowledges.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    CompleteModuleRequest, CompleteModuleResponse, CourseDetail, Credential, Module, QuizFeedback,
    ValidationResponse,
};

// keep unreserved characters readable in path segments
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error("api error ({status}): {detail}")]
    Api { status: u16, detail: String },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    /// Bearer token for authenticated endpoints; the public validator works
    /// without one.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = format!("{}/api", self.base_url);
        for seg in segments {
            url.push('/');
            url.push_str(&utf8_percent_encode(seg, SEGMENT).to_string());
        }
        url
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.url(segments);
        tracing::debug!(%url, "GET");
        let res = self.authorized(self.http.get(&url)).send().await?;
        decode(res).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(segments);
        tracing::debug!(%url, "POST");
        let res = self
            .authorized(self.http.post(&url))
            .json(body)
            .send()
            .await?;
        decode(res).await
    }

    pub async fn get_course(&self, course_id: Uuid) -> Result<CourseDetail, ApiError> {
        self.get_json(&["cursos", &course_id.to_string()]).await
    }

    pub async fn get_module(&self, course_id: Uuid, module_id: Uuid) -> Result<Module, ApiError> {
        self.get_json(&[
            "cursos",
            &course_id.to_string(),
            "modulos",
            &module_id.to_string(),
        ])
        .await
    }

    /// Submits quiz selections for server-authoritative grading.
    pub async fn submit_quiz(
        &self,
        course_id: Uuid,
        module_id: Uuid,
        selections: &HashMap<Uuid, usize>,
    ) -> Result<QuizFeedback, ApiError> {
        let body = json!({
            "cursoId": course_id,
            "moduloId": module_id,
            "respuestas": selections,
        });
        self.post_json(&["examenes", "enviar-quiz"], &body).await
    }

    /// Marks a module complete. On the final module the backend updates the
    /// enrollment and issues the credential.
    pub async fn complete_module(
        &self,
        course_id: Uuid,
        module_id: Uuid,
        body: &CompleteModuleRequest,
    ) -> Result<CompleteModuleResponse, ApiError> {
        self.post_json(
            &[
                "inscripciones",
                &course_id.to_string(),
                "modulos",
                &module_id.to_string(),
                "completar",
            ],
            body,
        )
        .await
    }

    pub async fn my_credentials(&self) -> Result<Vec<Credential>, ApiError> {
        self.get_json(&["credenciales", "mis-credenciales"]).await
    }

    /// Public credential lookup by VMP code; no auth required.
    pub async fn validate_credential(&self, code: &str) -> Result<ValidationResponse, ApiError> {
        self.get_json(&["public", "validar", code]).await
    }
}

async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, ApiError> {
    let status = res.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    if !status.is_success() {
        // FastAPI-style {"detail": "..."} error bodies
        let detail = res
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
            .unwrap_or_else(|| "unknown error".into());
        tracing::error!(status = status.as_u16(), %detail, "request failed");
        return Err(ApiError::Api {
            status: status.as_u16(),
            detail,
        });
    }
    Ok(res.json().await?)
}
