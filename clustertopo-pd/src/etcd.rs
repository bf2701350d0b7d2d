//! Coordination service (etcd) key-value source
//!
//! Discovery only needs two reads: a single key and a key prefix. `KvSource`
//! captures exactly that so discovery can run against a mock in tests.

use async_trait::async_trait;
use etcd_client::{Client, ConnectOptions, GetOptions, GetResponse};
use std::time::Duration;

use clustertopo_core::config::EtcdConfig;
use clustertopo_core::{Error, Result, TopoContext};

/// A key-value pair read from etcd
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvPair {
    pub key: String,
    pub value: Vec<u8>,
}

impl KvPair {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Read access to the coordination service's key-value namespace
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KvSource: Send + Sync {
    /// Read a single key; `None` when absent
    async fn get(&self, ctx: &TopoContext, key: &str) -> Result<Option<KvPair>>;

    /// Read every key under `prefix`
    async fn get_prefix(&self, ctx: &TopoContext, prefix: &str) -> Result<Vec<KvPair>>;
}

/// `KvSource` backed by an etcd v3 client
///
/// The client is owned by the caller's process; this type only borrows its
/// connection for reads.
#[derive(Clone)]
pub struct EtcdKv {
    client: Client,
    request_timeout: Duration,
}

impl EtcdKv {
    /// Wrap an already connected client
    #[must_use]
    pub const fn new(client: Client, request_timeout: Duration) -> Self {
        Self {
            client,
            request_timeout,
        }
    }

    /// Connect to the configured endpoints
    pub async fn connect(config: &EtcdConfig) -> Result<Self> {
        let mut options = ConnectOptions::new()
            .with_connect_timeout(config.connect_timeout())
            .with_timeout(config.request_timeout());
        if let (Some(user), Some(password)) = (&config.username, &config.password) {
            options = options.with_user(user.clone(), password.clone());
        }

        let client = Client::connect(&config.endpoints, Some(options))
            .await
            .map_err(|e| {
                Error::Etcd(format!(
                    "failed to connect to {}: {e}",
                    config.endpoints.join(",")
                ))
            })?;

        tracing::debug!(endpoints = ?config.endpoints, "Connected to etcd");
        Ok(Self::new(client, config.request_timeout()))
    }

    async fn fetch(
        &self,
        ctx: &TopoContext,
        key: &str,
        options: Option<GetOptions>,
    ) -> Result<GetResponse> {
        let ctx = ctx.child_with_timeout(self.request_timeout);
        let mut kv = self.client.kv_client();
        ctx.run(&format!("etcd get {key}"), async move {
            kv.get(key, options)
                .await
                .map_err(|e| Error::Etcd(format!("failed to get key {key}: {e}")))
        })
        .await
    }
}

fn to_pairs(resp: &GetResponse) -> Vec<KvPair> {
    resp.kvs()
        .iter()
        .map(|kv| KvPair::new(String::from_utf8_lossy(kv.key()), kv.value()))
        .collect()
}

#[async_trait]
impl KvSource for EtcdKv {
    async fn get(&self, ctx: &TopoContext, key: &str) -> Result<Option<KvPair>> {
        let resp = self.fetch(ctx, key, None).await?;
        Ok(to_pairs(&resp).into_iter().next())
    }

    async fn get_prefix(&self, ctx: &TopoContext, prefix: &str) -> Result<Vec<KvPair>> {
        let resp = self
            .fetch(ctx, prefix, Some(GetOptions::new().with_prefix()))
            .await?;
        Ok(to_pairs(&resp))
    }
}
