//! Whole-cluster topology snapshot

use serde::Serialize;

use clustertopo_core::{
    AlertManagerInfo, GrafanaInfo, PdInfo, PrometheusInfo, Result, TidbInfo, TiflashStoreInfo,
    TikvStoreInfo, TopoContext, TopologyProvider,
};

/// Every component category, fetched in one pass
#[derive(Debug, Clone, Serialize)]
pub struct ClusterTopology {
    pub pd: Vec<PdInfo>,
    pub tidb: Vec<TidbInfo>,
    pub tikv: Vec<TikvStoreInfo>,
    pub tiflash: Vec<TiflashStoreInfo>,
    pub prometheus: Option<PrometheusInfo>,
    pub grafana: Option<GrafanaInfo>,
    pub alert_manager: Option<AlertManagerInfo>,
}

impl ClusterTopology {
    /// Query all categories concurrently; the first error wins.
    pub async fn fetch<T>(provider: &T, ctx: &TopoContext) -> Result<Self>
    where
        T: TopologyProvider + ?Sized,
    {
        let (pd, tidb, tikv, tiflash, prometheus, grafana, alert_manager) = tokio::try_join!(
            provider.get_pd(ctx),
            provider.get_tidb(ctx),
            provider.get_tikv(ctx),
            provider.get_tiflash(ctx),
            provider.get_prometheus(ctx),
            provider.get_grafana(ctx),
            provider.get_alert_manager(ctx),
        )?;

        Ok(Self {
            pd,
            tidb,
            tikv,
            tiflash,
            prometheus,
            grafana,
            alert_manager,
        })
    }
}
