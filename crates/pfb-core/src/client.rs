//! HTTP client for the node gateway.
use crate::{SubmitRequest, SubmitResponse};
use reqwest::{Client, StatusCode};
use std::future::Future;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum GatewayError {
    /// Connection refused, DNS failure, undecodable body and the like.
    #[error("{}", with_causes(.0))]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status code {}{}", .status.as_u16(), detail(.body))]
    Status { status: StatusCode, body: String },
}

/// Top-level message followed by each distinct underlying cause.
fn with_causes(err: &(dyn std::error::Error + 'static)) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !msg.contains(&text) {
            msg.push_str(": ");
            msg.push_str(&text);
        }
        source = cause.source();
    }
    msg
}

fn detail(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

/// Something that can deliver a submission to a node gateway.
pub trait Gateway: Clone + Send + Sync + 'static {
    fn submit(
        &self,
        url: &str,
        body: &SubmitRequest,
    ) -> impl Future<Output = Result<SubmitResponse, GatewayError>> + Send;
}

/// [`Gateway`] over plain HTTP. No timeout and no retries are configured.
#[derive(Debug, Clone, Default)]
pub struct HttpGateway {
    http: Client,
}

impl HttpGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

impl Gateway for HttpGateway {
    async fn submit(&self, url: &str, body: &SubmitRequest) -> Result<SubmitResponse, GatewayError> {
        let resp = self.http.post(url).json(body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%url, %status, "gateway rejected submission");
            return Err(GatewayError::Status { status, body });
        }
        let out = resp.json::<SubmitResponse>().await?;
        info!(%url, height = out.height, txhash = %out.txhash, "submission accepted");
        Ok(out)
    }
}
