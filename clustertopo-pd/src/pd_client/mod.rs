//! Cluster-management (PD) HTTP API client
//!
//! Pure HTTP client for the PD API endpoints topology discovery reads.
//!
//! # Example
//!
//! ```no_run
//! use clustertopo_core::{config::PdConfig, TopoContext};
//! use clustertopo_pd::pd_client::{PdApi, PdApiClient};
//!
//! # async fn example() -> clustertopo_core::Result<()> {
//! let client = PdApiClient::new(&PdConfig::default())?;
//! let members = client.get_members(&TopoContext::new()).await?;
//! # Ok(())
//! # }
//! ```

mod types;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use clustertopo_core::config::PdConfig;
use clustertopo_core::error::MAX_RESPONSE_SIZE;
use clustertopo_core::{Error, Result, TopoContext};

pub use types::*;

const API_PREFIX: &str = "/pd/api/v1";

/// Read access to the PD HTTP API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PdApi: Send + Sync {
    /// `GET /pd/api/v1/members`
    async fn get_members(&self, ctx: &TopoContext) -> Result<MembersResponse>;

    /// `GET /pd/api/v1/health`
    async fn get_health(&self, ctx: &TopoContext) -> Result<Vec<MemberHealth>>;

    /// `GET /pd/api/v1/stores`
    async fn get_stores(&self, ctx: &TopoContext) -> Result<StoresResponse>;
}

/// PD HTTP API client
///
/// Holds one connection pool for the configured endpoint.
#[derive(Debug, Clone)]
pub struct PdApiClient {
    endpoint: String,
    client: Client,
}

impl PdApiClient {
    /// Build a client for `config.endpoint`
    pub fn new(config: &PdConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build PD HTTP client: {e}")))?;

        Ok(Self::with_client(config.endpoint.clone(), client))
    }

    /// Use an existing `reqwest::Client`
    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self { endpoint, client }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get_json<T: DeserializeOwned>(&self, ctx: &TopoContext, path: &str) -> Result<T> {
        let url = format!("{}{API_PREFIX}{path}", self.endpoint);
        tracing::debug!(url = %url, "PD API request");

        ctx.run(&format!("GET {url}"), async {
            let response = self.client.get(&url).send().await.map_err(network_error)?;
            let response = check_response(response)?;
            json_with_limit(response).await
        })
        .await
    }
}

#[async_trait]
impl PdApi for PdApiClient {
    async fn get_members(&self, ctx: &TopoContext) -> Result<MembersResponse> {
        self.get_json(ctx, "/members").await
    }

    async fn get_health(&self, ctx: &TopoContext) -> Result<Vec<MemberHealth>> {
        self.get_json(ctx, "/health").await
    }

    async fn get_stores(&self, ctx: &TopoContext) -> Result<StoresResponse> {
        self.get_json(ctx, "/stores").await
    }
}

fn network_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(err.to_string())
    } else {
        Error::Network(err.to_string())
    }
}

/// Check HTTP response status before processing body.
fn check_response(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(Error::Http {
            status: status.as_u16(),
            url: resp.url().to_string(),
        });
    }
    Ok(resp)
}

/// Read a response body with size limit and deserialize as JSON.
async fn json_with_limit<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    if let Some(cl) = response.content_length() {
        if cl as usize > MAX_RESPONSE_SIZE {
            return Err(Error::ResponseTooLarge { size: cl });
        }
    }
    let bytes = response.bytes().await.map_err(network_error)?;
    if bytes.len() > MAX_RESPONSE_SIZE {
        return Err(Error::ResponseTooLarge {
            size: bytes.len() as u64,
        });
    }
    serde_json::from_slice(&bytes).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let client = PdApiClient::with_client("http://10.0.0.1:2379/", Client::new());
        assert_eq!(client.endpoint(), "http://10.0.0.1:2379");
    }
}
