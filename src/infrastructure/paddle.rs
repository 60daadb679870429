use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::domain::errors::DomainError;
use crate::domain::payment::ProcessorTransaction;
use crate::domain::ports::PaymentGateway;

pub const LIVE_API_BASE: &str = "https://api.paddle.com";
pub const SANDBOX_API_BASE: &str = "https://sandbox-api.paddle.com";

/// Sandbox keys are prefixed with `test_`.
pub fn api_base_for_key(api_key: &str) -> &'static str {
    if api_key.starts_with("test_") {
        SANDBOX_API_BASE
    } else {
        LIVE_API_BASE
    }
}

#[derive(Debug, Deserialize)]
struct TransactionEnvelope {
    data: Option<TransactionData>,
}

#[derive(Debug, Deserialize)]
struct TransactionData {
    id: String,
    #[serde(default)]
    status: String,
}

/// Reads transactions from the Paddle Billing API with a server-side key.
pub struct PaddleGateway {
    http: Client,
    api_base: Url,
    api_key: String,
}

impl PaddleGateway {
    pub fn new(api_key: String, api_base: &str, timeout: Duration) -> Result<Self, DomainError> {
        let api_base = Url::parse(api_base)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                DomainError::Configuration(format!("invalid Paddle API base '{}'", api_base))
            })?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Internal(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            api_base,
            api_key,
        })
    }

    fn transaction_url(&self, transaction_id: &str) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("transactions")
                .push(transaction_id);
        }
        url
    }
}

#[async_trait]
impl PaymentGateway for PaddleGateway {
    async fn fetch_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<ProcessorTransaction, DomainError> {
        let response = self
            .http
            .get(self.transaction_url(transaction_id))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| {
                log::warn!("Paddle API unreachable: {}", e);
                DomainError::ServiceUnavailable(format!("Paddle verification error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Paddle rejected transaction lookup ({}): {}", status, body);
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => {
                    DomainError::ServiceUnavailable(format!(
                        "Paddle verification failed ({})",
                        status.as_u16()
                    ))
                }
                _ => DomainError::Verification(format!(
                    "Paddle verification failed ({})",
                    status.as_u16()
                )),
            });
        }

        let envelope: TransactionEnvelope = response.json().await.map_err(|e| {
            DomainError::Verification(format!("unreadable Paddle transaction: {}", e))
        })?;
        let data = envelope.data.ok_or_else(|| {
            DomainError::Verification("Paddle returned no transaction data".to_string())
        })?;

        Ok(ProcessorTransaction {
            id: data.id,
            status: data.status,
        })
    }
}
