//! Topology provider backed by PD
//!
//! Maps every `TopologyProvider` accessor onto one discovery function. Results
//! and errors pass through untouched.

use async_trait::async_trait;
use std::sync::Arc;

use clustertopo_core::{
    AlertManagerInfo, GrafanaInfo, PdInfo, PrometheusInfo, Result, TidbInfo, TiflashStoreInfo,
    TikvStoreInfo, TopoContext, TopologyProvider,
};

use crate::discovery;
use crate::etcd::{EtcdKv, KvSource};
use crate::pd_client::{PdApi, PdApiClient};

/// Topology information sourced from PD's etcd and PD's HTTP API
pub struct TopologyFromPd<E = EtcdKv, P = PdApiClient> {
    etcd_client: Arc<E>,
    pd_api: Arc<P>,
}

const _: () = {
    const fn assert_provider<T: TopologyProvider>() {}
    assert_provider::<TopologyFromPd>();
};

impl<E, P> TopologyFromPd<E, P>
where
    E: KvSource,
    P: PdApi,
{
    #[must_use]
    pub const fn new(etcd_client: Arc<E>, pd_api: Arc<P>) -> Self {
        Self {
            etcd_client,
            pd_api,
        }
    }
}

impl<E, P> Clone for TopologyFromPd<E, P> {
    fn clone(&self) -> Self {
        Self {
            etcd_client: Arc::clone(&self.etcd_client),
            pd_api: Arc::clone(&self.pd_api),
        }
    }
}

#[async_trait]
impl<E, P> TopologyProvider for TopologyFromPd<E, P>
where
    E: KvSource,
    P: PdApi,
{
    async fn get_pd(&self, ctx: &TopoContext) -> Result<Vec<PdInfo>> {
        discovery::get_pd_instances(ctx, self.pd_api.as_ref()).await
    }

    async fn get_tidb(&self, ctx: &TopoContext) -> Result<Vec<TidbInfo>> {
        discovery::get_tidb_instances(ctx, self.etcd_client.as_ref()).await
    }

    async fn get_tikv(&self, ctx: &TopoContext) -> Result<Vec<TikvStoreInfo>> {
        let (tikv_stores, _) = discovery::get_store_instances(ctx, self.pd_api.as_ref()).await?;
        Ok(tikv_stores)
    }

    async fn get_tiflash(&self, ctx: &TopoContext) -> Result<Vec<TiflashStoreInfo>> {
        let (_, tiflash_stores) = discovery::get_store_instances(ctx, self.pd_api.as_ref()).await?;
        Ok(tiflash_stores)
    }

    async fn get_prometheus(&self, ctx: &TopoContext) -> Result<Option<PrometheusInfo>> {
        discovery::get_prometheus_instance(ctx, self.etcd_client.as_ref()).await
    }

    async fn get_grafana(&self, ctx: &TopoContext) -> Result<Option<GrafanaInfo>> {
        discovery::get_grafana_instance(ctx, self.etcd_client.as_ref()).await
    }

    async fn get_alert_manager(&self, ctx: &TopoContext) -> Result<Option<AlertManagerInfo>> {
        discovery::get_alert_manager_instance(ctx, self.etcd_client.as_ref()).await
    }
}
