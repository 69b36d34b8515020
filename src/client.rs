//! 推論バックエンドのHTTPクライアント
//!
//! 送信形状は `RequestPlan` で決まっている。ここでは1回だけ送信し、
//! 2xx以外は一律に失敗とする（ボディは読まない）。再試行はしない。

use crate::error::{MedSupportError, Result};
use medsupport_common::{api, AnalysisResponse, RequestBody, RequestPlan};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MedSupportError::HttpClient(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 計画どおりに1回送信してレスポンスを得る
    pub async fn execute(&self, plan: &RequestPlan) -> medsupport_common::Result<AnalysisResponse> {
        let url = api::endpoint_url(&self.base_url, plan.endpoint);
        let request = match &plan.body {
            RequestBody::Json(body) => {
                debug!(%url, bytes = body.len(), "POST json");
                self.http
                    .post(&url)
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(body.clone())
            }
            RequestBody::Multipart { file, prompt } => {
                debug!(%url, file = %file.name, has_prompt = prompt.is_some(), "POST multipart");
                self.http.post(&url).multipart(build_form(file, prompt.as_deref())?)
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| medsupport_common::Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "backend returned error status");
            return Err(medsupport_common::Error::Http {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| medsupport_common::Error::Network(e.to_string()))?;
        let parsed: AnalysisResponse = serde_json::from_slice(&bytes)?;
        info!(
            %url,
            chars = parsed.result.len(),
            annotations = parsed.annotations.as_ref().map_or(0, Vec::len),
            "analysis received"
        );
        Ok(parsed)
    }

    /// `GET /api/health`
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = api::endpoint_url(&self.base_url, api::HEALTH);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| MedSupportError::Unreachable(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(MedSupportError::Unreachable(format!(
                "{}: status {}",
                url,
                response.status().as_u16()
            )));
        }

        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| MedSupportError::Unreachable(format!("{}: {}", url, e)))
    }
}

fn build_form(
    file: &medsupport_common::ImageFile,
    prompt: Option<&str>,
) -> medsupport_common::Result<Form> {
    let mut part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
    if !file.media_type.is_empty() {
        part = part
            .mime_str(&file.media_type)
            .map_err(|e| medsupport_common::Error::Network(e.to_string()))?;
    }

    let mut form = Form::new().part(api::FILE_FIELD, part);
    if let Some(prompt) = prompt {
        form = form.text(api::PROMPT_FIELD, prompt.to_string());
    }
    Ok(form)
}
