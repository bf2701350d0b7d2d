// clustertopo PD source
//
// Topology discovery against a PD-managed cluster:
// - etcd: key-value reads from PD's embedded etcd (TiDB and monitoring records)
// - pd_client: PD HTTP API client (members, health, stores)
// - discovery: turns raw records into clustertopo_core types
// - provider: TopologyFromPd, the TopologyProvider adapter over the two clients

pub mod discovery;
pub mod etcd;
pub mod pd_client;
pub mod provider;

pub use etcd::{EtcdKv, KvPair, KvSource};
pub use pd_client::{PdApi, PdApiClient};
pub use provider::TopologyFromPd;
