use crate::domain::ports::{IdentityStatus, IdentityVerifier};
use crate::utils::error::{CardError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_IDENTITY_BASE_URL: &str = "http://localhost:8083";
pub const DEFAULT_IDENTITY_TIMEOUT: Duration = Duration::from_secs(5);

/// Identity check against `GET {base_url}/api/cliente/validarCPF/{customer_id}`.
pub struct HttpIdentityVerifier {
    base_url: Url,
    client: Client,
}

impl HttpIdentityVerifier {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url: String = base_url.into();
        let base_url = Url::parse(&base_url).map_err(|e| CardError::ConfigError {
            message: format!("Invalid identity base URL '{}': {}", base_url, e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CardError::ConfigError {
                message: format!("Identity base URL '{}' cannot take a path", base_url),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| CardError::ConfigError {
                message: format!("Failed to build identity HTTP client: {}", e),
            })?;

        Ok(Self { base_url, client })
    }

    /// The customer id always lands in a single, percent-encoded path segment.
    pub fn endpoint(&self, customer_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "cliente", "validarCPF", customer_id]);
        }
        url
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, customer_id: &str) -> Result<IdentityStatus> {
        let url = self.endpoint(customer_id);
        tracing::debug!("Verifying identity at: {}", url);

        let response = self.client.get(url.as_str()).send().await.map_err(|e| {
            let message = if e.is_timeout() {
                format!("request to {} timed out", url)
            } else {
                format!("request to {} failed: {}", url, e)
            };
            CardError::TransportFailure { message }
        })?;

        tracing::debug!("Identity response status: {}", response.status());

        if response.status().is_success() {
            Ok(IdentityStatus::Valid)
        } else {
            Ok(IdentityStatus::Invalid)
        }
    }
}
