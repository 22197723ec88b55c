use std::collections::BTreeMap;
use std::time::Duration;

use probe_core::{FileId, OcrResult, OcrService, ProcessId};
use probe_logging::{probe_debug, probe_trace};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ApiError, ApiFailureKind, Document};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Body of `GET /api/status/{process_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusReport {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub services: BTreeMap<String, bool>,
}

/// Body of `GET /api/services`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceCatalog {
    pub services: BTreeMap<String, ServiceInfo>,
    #[serde(default)]
    pub recommended: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    file_id: String,
}

#[derive(Serialize)]
struct ProcessRequest<'a> {
    service: &'a str,
}

#[derive(Deserialize)]
struct ProcessResponse {
    process_id: String,
}

/// The four endpoints a job touches. One call per method, no retries.
#[async_trait::async_trait]
pub trait OcrApi: Send + Sync {
    async fn upload(&self, document: &Document) -> Result<FileId, ApiError>;

    async fn start_processing(
        &self,
        file_id: &FileId,
        service: OcrService,
    ) -> Result<ProcessId, ApiError>;

    async fn status(&self, process_id: &ProcessId) -> Result<StatusReport, ApiError>;

    async fn result(&self, process_id: &ProcessId) -> Result<OcrResult, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpOcrApi {
    base: Url,
    client: reqwest::Client,
}

impl HttpOcrApi {
    pub fn new(base: Url, settings: &ApiSettings) -> Result<Self, ApiError> {
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                ApiFailureKind::InvalidUrl,
                format!("{base} cannot be used as an API base"),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiFailureKind::Network, err.to_string()))?;
        Ok(Self { base, client })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub async fn health(&self) -> Result<HealthReport, ApiError> {
        self.get_json(&["api", "health"]).await
    }

    pub async fn services(&self) -> Result<ServiceCatalog, ApiError> {
        self.get_json(&["api", "services"]).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::new(ApiFailureKind::InvalidUrl, "API base cannot carry a path")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        probe_trace!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

#[async_trait::async_trait]
impl OcrApi for HttpOcrApi {
    async fn upload(&self, document: &Document) -> Result<FileId, ApiError> {
        let url = self.endpoint(&["api", "upload"])?;
        let part = Part::bytes(document.data.to_vec())
            .file_name(document.meta.name.clone())
            .mime_str(&document.meta.mime_type)
            .map_err(|err| ApiError::new(ApiFailureKind::InvalidRequest, err.to_string()))?;
        let form = Form::new().part("file", part);

        probe_debug!(
            "POST {} name={} bytes={}",
            url,
            document.meta.name,
            document.data.len()
        );
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: UploadResponse = read_json(response).await?;
        Ok(FileId(body.file_id))
    }

    async fn start_processing(
        &self,
        file_id: &FileId,
        service: OcrService,
    ) -> Result<ProcessId, ApiError> {
        let url = self.endpoint(&["api", "process", file_id.0.as_str()])?;
        probe_debug!("POST {} service={}", url, service);
        let response = self
            .client
            .post(url)
            .json(&ProcessRequest {
                service: service.as_str(),
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: ProcessResponse = read_json(response).await?;
        Ok(ProcessId(body.process_id))
    }

    async fn status(&self, process_id: &ProcessId) -> Result<StatusReport, ApiError> {
        self.get_json(&["api", "status", process_id.0.as_str()]).await
    }

    async fn result(&self, process_id: &ProcessId) -> Result<OcrResult, ApiError> {
        self.get_json(&["api", "result", process_id.0.as_str()]).await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let detail = response
            .text()
            .await
            .ok()
            .and_then(|body| server_error_message(&body))
            .unwrap_or_else(|| status.to_string());
        return Err(ApiError::new(
            ApiFailureKind::HttpStatus(status.as_u16()),
            detail,
        ));
    }
    response.json::<T>().await.map_err(map_reqwest_error)
}

/// The API reports failures as `{"error": "...", "status": "error"}`.
fn server_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|error| error.as_str())
        .map(str::to_string)
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiFailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(ApiFailureKind::InvalidResponse, err.to_string());
    }
    ApiError::new(ApiFailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_keep_base_path_prefix() {
        let base = Url::parse("http://localhost:5000/ocr/").unwrap();
        let api = HttpOcrApi::new(base, &ApiSettings::default()).unwrap();
        let url = api.endpoint(&["api", "status", "p 1"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/ocr/api/status/p%201");
    }

    #[test]
    fn endpoints_from_bare_origin() {
        let base = Url::parse("http://127.0.0.1:5000").unwrap();
        let api = HttpOcrApi::new(base, &ApiSettings::default()).unwrap();
        let url = api.endpoint(&["api", "upload"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/api/upload");
    }

    #[test]
    fn extracts_server_error_field() {
        assert_eq!(
            server_error_message(r#"{"error":"No file provided","status":"error"}"#),
            Some("No file provided".to_string())
        );
        assert_eq!(server_error_message("<html>oops</html>"), None);
    }
}
