use reqwest::multipart::{Form, Part};
use serde_json::json;
use tracing::debug;

use crate::aurora::status_error;
use crate::backend::PinningService;
use crate::error::ClientError;
use crate::responses::PinResponse;

pub const PINATA_API_URL: &str = "https://api.pinata.cloud";

/// Pinata file pinning over the `pinFileToIPFS` endpoint.
#[derive(Debug, Clone)]
pub struct PinataClient {
    api_url: String,
    jwt: String,
    gateway: Option<String>,
    http: reqwest::Client,
}

impl PinataClient {
    pub fn new(api_url: &str, jwt: &str, gateway: Option<&str>) -> Self {
        PinataClient {
            api_url: api_url.trim_end_matches('/').to_string(),
            jwt: jwt.to_string(),
            gateway: gateway
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(|g| g.trim_end_matches('/').to_string()),
            http: reqwest::Client::new(),
        }
    }

    fn pin_file_url(&self) -> String {
        format!("{}/pinning/pinFileToIPFS", self.api_url)
    }
}

impl PinningService for PinataClient {
    async fn upload_file(&self, bytes: Vec<u8>, file_name: &str) -> Result<PinResponse, ClientError> {
        let url = self.pin_file_url();
        debug!("Uploading {} ({} bytes) to {}", file_name, bytes.len(), url);

        let file = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/json")
            .map_err(|e| ClientError::Pinning(e.to_string()))?;
        let form = Form::new()
            .part("file", file)
            .text("pinataMetadata", json!({ "name": file_name }).to_string())
            .text("pinataOptions", json!({ "cidVersion": 1 }).to_string());

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.jwt)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::transport(&url, e))?;
        if !response.status().is_success() {
            return Err(status_error(&url, response).await);
        }
        response.json().await.map_err(|e| ClientError::Decode {
            url,
            reason: e.to_string(),
        })
    }

    fn gateway_url(&self, cid: &str) -> Option<String> {
        self.gateway.as_ref().map(|gateway| {
            if gateway.starts_with("http://") || gateway.starts_with("https://") {
                format!("{}/ipfs/{}", gateway, cid)
            } else {
                format!("https://{}/ipfs/{}", gateway, cid)
            }
        })
    }
}
