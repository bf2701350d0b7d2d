//! Monitoring service discovery (Prometheus, Grafana, Alertmanager)
//!
//! Deployment tooling writes each service's address as JSON under a fixed key.
//! These services are optional, so a missing key is not an error.

use serde::de::DeserializeOwned;

use clustertopo_core::{
    AlertManagerInfo, Error, GrafanaInfo, PrometheusInfo, Result, TopoContext,
};

use crate::etcd::KvSource;

pub const PROMETHEUS_TOPOLOGY_KEY: &str = "/topology/prometheus";
pub const GRAFANA_TOPOLOGY_KEY: &str = "/topology/grafana";
pub const ALERT_MANAGER_TOPOLOGY_KEY: &str = "/topology/alertmanager";

pub async fn get_prometheus_instance<E>(
    ctx: &TopoContext,
    etcd: &E,
) -> Result<Option<PrometheusInfo>>
where
    E: KvSource + ?Sized,
{
    get_monitor_instance(ctx, etcd, PROMETHEUS_TOPOLOGY_KEY).await
}

pub async fn get_grafana_instance<E>(ctx: &TopoContext, etcd: &E) -> Result<Option<GrafanaInfo>>
where
    E: KvSource + ?Sized,
{
    get_monitor_instance(ctx, etcd, GRAFANA_TOPOLOGY_KEY).await
}

pub async fn get_alert_manager_instance<E>(
    ctx: &TopoContext,
    etcd: &E,
) -> Result<Option<AlertManagerInfo>>
where
    E: KvSource + ?Sized,
{
    get_monitor_instance(ctx, etcd, ALERT_MANAGER_TOPOLOGY_KEY).await
}

async fn get_monitor_instance<E, T>(ctx: &TopoContext, etcd: &E, key: &str) -> Result<Option<T>>
where
    E: KvSource + ?Sized,
    T: DeserializeOwned,
{
    let Some(pair) = etcd.get(ctx, key).await? else {
        tracing::debug!(key, "Monitoring service not registered");
        return Ok(None);
    };

    serde_json::from_slice(&pair.value)
        .map(Some)
        .map_err(|e| Error::InvalidTopologyData(format!("{key} unmarshal failed: {e}")))
}
