//! HTTP client for an IPFS gateway plus a pinning service for uploads.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use folio_types::ContentId;
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{ContentError, ContentResult};
use crate::traits::ContentStore;

const JSON_UPLOAD_PATH: &str = "pinning/pinJSONToIPFS";
const FILE_UPLOAD_PATH: &str = "pinning/pinFileToIPFS";

/// Content store backed by an IPFS HTTP gateway (reads) and a pinning API
/// (writes).
///
/// Reads are `GET {gateway}/ipfs/{cid}`. Writes post JSON or a multipart file
/// to the pinning API, authenticated with a bearer JWT when one is set.
pub struct GatewayContentStore {
    http: reqwest::Client,
    gateway_url: String,
    upload_url: String,
    jwt: Option<String>,
}

impl GatewayContentStore {
    pub fn new(gateway_url: impl Into<String>, upload_url: impl Into<String>) -> Self {
        Self::with_timeout(gateway_url, upload_url, Duration::from_secs(30))
    }

    pub fn with_timeout(
        gateway_url: impl Into<String>,
        upload_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            gateway_url: trim_slash(gateway_url.into()),
            upload_url: trim_slash(upload_url.into()),
            jwt: None,
        }
    }

    /// Authenticate uploads with a pinning-service JWT.
    pub fn with_jwt(mut self, jwt: impl Into<String>) -> Self {
        self.jwt = Some(jwt.into());
        self
    }

    pub fn content_url(&self, cid: &ContentId) -> String {
        format!("{}/ipfs/{}", self.gateway_url, cid)
    }

    fn upload_endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.upload_url, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.jwt {
            Some(jwt) => req.bearer_auth(jwt),
            None => req,
        }
    }

    async fn fetch(&self, cid: &ContentId) -> ContentResult<reqwest::Response> {
        let url = self.content_url(cid);
        tracing::debug!(%url, "fetching content");
        let response = self.http.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(ContentError::NotFound(cid.clone())),
            status if status.is_success() => Ok(response),
            status => Err(gateway_error(status, response).await),
        }
    }

    async fn upload(&self, req: reqwest::RequestBuilder) -> ContentResult<ContentId> {
        let response = self.authorize(req).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(gateway_error(status, response).await);
        }
        let body: Value = response.json().await?;
        let cid = extract_cid(&body).ok_or(ContentError::MissingContentId)?;
        tracing::debug!(%cid, "uploaded content");
        Ok(cid)
    }
}

#[async_trait]
impl ContentStore for GatewayContentStore {
    async fn get_bytes(&self, cid: &ContentId) -> ContentResult<Bytes> {
        Ok(self.fetch(cid).await?.bytes().await?)
    }

    async fn get_json(&self, cid: &ContentId) -> ContentResult<Value> {
        let body = self.fetch(cid).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ContentError::InvalidDocument {
            cid: cid.clone(),
            reason: e.to_string(),
        })
    }

    async fn put_bytes(&self, data: Bytes) -> ContentResult<ContentId> {
        let part = reqwest::multipart::Part::bytes(data.to_vec()).file_name("upload");
        let form = reqwest::multipart::Form::new().part("file", part);
        let req = self
            .http
            .post(self.upload_endpoint(FILE_UPLOAD_PATH))
            .multipart(form);
        self.upload(req).await
    }

    async fn put_json(&self, value: &Value) -> ContentResult<ContentId> {
        let req = self
            .http
            .post(self.upload_endpoint(JSON_UPLOAD_PATH))
            .json(value);
        self.upload(req).await
    }
}

impl std::fmt::Debug for GatewayContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayContentStore")
            .field("gateway_url", &self.gateway_url)
            .field("upload_url", &self.upload_url)
            .field("authenticated", &self.jwt.is_some())
            .finish()
    }
}

async fn gateway_error(status: StatusCode, response: reqwest::Response) -> ContentError {
    let message = response.text().await.unwrap_or_default();
    ContentError::Gateway {
        status: status.as_u16(),
        message,
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

/// Pull the content id out of a pinning-service upload response.
///
/// Accepts the shapes in common use: `{"IpfsHash": ..}`, `{"cid": ..}`,
/// `{"data": {"cid": ..}}`, or a bare JSON string.
pub fn extract_cid(body: &Value) -> Option<ContentId> {
    let raw = match body {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map
            .get("IpfsHash")
            .or_else(|| map.get("cid"))
            .and_then(Value::as_str)
            .or_else(|| map.get("data").and_then(|d| d.get("cid")).and_then(Value::as_str)),
        _ => None,
    }?;
    ContentId::from_uri(raw).ok()
}
