use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{Result, models::PostData};

/// Header the service uses to explain a rejected chart.
pub const ERROR_HEADER: &str = "x-quickchart-error";

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn error_detail(&self) -> Option<String> {
        self.headers
            .get(ERROR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Sends chart requests. Implementations must not retry; a failed request is
/// returned to the caller as is.
#[async_trait]
pub trait Transport: std::fmt::Debug + Send + Sync {
    async fn post_json(&self, url: &Url, body: &PostData) -> Result<TransportResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::build(None)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, */*"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(crate::UA)
            .gzip(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &Url, body: &PostData) -> Result<TransportResponse> {
        debug!("POST {}", url);
        let response = self.client.post(url.clone()).json(body).send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        debug!("Response {} with {} bytes", status, body.len());
        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
