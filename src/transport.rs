//! HTTP transport for bulk import submission and template download.
//!
//! The backend accepts `multipart/form-data` with one `file` part (the
//! spreadsheet) and one `images` part per assembled image.
use crate::import::{BulkImportResponse, ImportConfig, Payload};
use crate::util::{sha256_hex, truncate_string};
use anyhow::{anyhow, Context, Result};
use std::time::{Duration, Instant};

const ERROR_BODY_MAX_BYTES: usize = 2048;
const TEMPLATE_MAX_BYTES: u64 = 64 * 1024 * 1024;

/// One part of a multipart form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart<'a> {
    pub field: &'static str,
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: &'a [u8],
}

/// Encoded multipart body and its boundary.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    pub boundary: String,
    pub bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

/// Encode form parts; the boundary is derived from the part contents.
pub fn encode_multipart(parts: &[FormPart<'_>]) -> MultipartBody {
    let mut seed = Vec::new();
    for part in parts {
        seed.extend_from_slice(part.file_name.as_bytes());
        seed.extend_from_slice(sha256_hex(part.bytes).as_bytes());
    }
    let boundary = format!("----cimport-{}", &sha256_hex(&seed)[..32]);

    let mut bytes = Vec::new();
    for part in parts {
        bytes.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        bytes.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.field,
                escape_quoted(&part.file_name)
            )
            .as_bytes(),
        );
        bytes.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
        bytes.extend_from_slice(part.bytes);
        bytes.extend_from_slice(b"\r\n");
    }
    bytes.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    MultipartBody { boundary, bytes }
}

fn escape_quoted(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\r', " ")
        .replace('\n', " ")
}

/// Guess a content type from a file name extension.
pub fn content_type_for(name: &str) -> &'static str {
    mime_guess::from_path(name)
        .first_raw()
        .unwrap_or("application/octet-stream")
}

/// Build the form parts for a submission: the spreadsheet, then every image.
///
/// Renamed images keep the content type of their original file.
pub fn submission_parts<'a>(
    sheet_name: &str,
    sheet: &'a [u8],
    payload: &Payload<'a>,
) -> Vec<FormPart<'a>> {
    let mut parts = Vec::with_capacity(payload.len() + 1);
    parts.push(FormPart {
        field: "file",
        file_name: sheet_name.to_string(),
        content_type: content_type_for(sheet_name),
        bytes: sheet,
    });
    for file in payload.files() {
        parts.push(FormPart {
            field: "images",
            file_name: file.name.clone(),
            content_type: content_type_for(&file.asset.name),
            bytes: file.content(),
        });
    }
    parts
}

/// Blocking client for the catalog backend.
pub struct CatalogClient {
    agent: ureq::Agent,
    config: ImportConfig,
    token: Option<String>,
}

impl CatalogClient {
    pub fn new(config: ImportConfig, token: Option<String>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            config,
            token,
        }
    }

    fn authorization(&self) -> Option<String> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| format!("Bearer {token}"))
    }

    /// POST the multipart body to the import endpoint and decode the summary.
    pub fn submit(&self, body: &MultipartBody) -> Result<BulkImportResponse> {
        let url = self.config.endpoint_url(&self.config.import_endpoint);
        let start = Instant::now();
        let mut request = self
            .agent
            .post(&url)
            .header("Content-Type", body.content_type());
        if let Some(authorization) = self.authorization() {
            request = request.header("Authorization", authorization);
        }
        let mut response = request
            .send(body.bytes.as_slice())
            .with_context(|| format!("POST {url}"))?;
        let status = response.status();
        let text = response
            .body_mut()
            .read_to_string()
            .with_context(|| format!("read response from {url}"))?;
        tracing::info!(
            elapsed_ms = start.elapsed().as_millis(),
            status = status.as_u16(),
            request_bytes = body.bytes.len(),
            "import submitted"
        );
        if !status.is_success() {
            return Err(status_error("import", status.as_u16(), &text));
        }
        serde_json::from_str(&text).context("parse import response JSON")
    }

    /// GET the import template spreadsheet.
    pub fn download_template(&self) -> Result<Vec<u8>> {
        let url = self.config.endpoint_url(&self.config.template_endpoint);
        let mut request = self.agent.get(&url);
        if let Some(authorization) = self.authorization() {
            request = request.header("Authorization", authorization);
        }
        let mut response = request.call().with_context(|| format!("GET {url}"))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.body_mut().read_to_string().unwrap_or_default();
            return Err(status_error("template download", status.as_u16(), &text));
        }
        response
            .body_mut()
            .with_config()
            .limit(TEMPLATE_MAX_BYTES)
            .read_to_vec()
            .with_context(|| format!("read template from {url}"))
    }
}

fn status_error(action: &str, status: u16, body: &str) -> anyhow::Error {
    let body = truncate_string(body.trim(), ERROR_BODY_MAX_BYTES);
    if body.is_empty() {
        anyhow!("{action} failed ({status})")
    } else {
        anyhow!("{action} failed ({status}): {body}")
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
