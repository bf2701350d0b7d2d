// Topology Provider Trait
//
// Core interface implemented by every topology source

use async_trait::async_trait;

use crate::context::TopoContext;
use crate::error::Result;
use crate::types::{
    AlertManagerInfo, GrafanaInfo, PdInfo, PrometheusInfo, TidbInfo, TiflashStoreInfo,
    TikvStoreInfo,
};

/// Topology provider
///
/// Answers "which members does the cluster have" for each component kind.
/// Monitoring services are optional deployments, so they come back as `Option`.
#[async_trait]
pub trait TopologyProvider: Send + Sync {
    // ========== Cluster members ==========

    async fn get_pd(&self, ctx: &TopoContext) -> Result<Vec<PdInfo>>;

    async fn get_tidb(&self, ctx: &TopoContext) -> Result<Vec<TidbInfo>>;

    async fn get_tikv(&self, ctx: &TopoContext) -> Result<Vec<TikvStoreInfo>>;

    async fn get_tiflash(&self, ctx: &TopoContext) -> Result<Vec<TiflashStoreInfo>>;

    // ========== Monitoring services ==========

    async fn get_prometheus(&self, ctx: &TopoContext) -> Result<Option<PrometheusInfo>>;

    async fn get_grafana(&self, ctx: &TopoContext) -> Result<Option<GrafanaInfo>>;

    async fn get_alert_manager(&self, ctx: &TopoContext) -> Result<Option<AlertManagerInfo>>;
}
