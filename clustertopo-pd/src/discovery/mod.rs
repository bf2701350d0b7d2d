//! Topology discovery functions
//!
//! Each function reads one backend through a client trait and turns the raw
//! records into `clustertopo_core` types.

pub mod monitor;
pub mod pd;
pub mod store;
pub mod tidb;

pub use monitor::{get_alert_manager_instance, get_grafana_instance, get_prometheus_instance};
pub use pd::get_pd_instances;
pub use store::get_store_instances;
pub use tidb::get_tidb_instances;
