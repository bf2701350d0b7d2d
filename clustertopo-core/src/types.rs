//! Topology record types
//!
//! One record per cluster member or monitoring service. Records are plain data;
//! discovery code in `clustertopo-pd` fills them in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Component status as observed by discovery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    #[default]
    Unreachable,
    Up,
    Tombstone,
    Offline,
    Down,
}

impl ComponentStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unreachable => "unreachable",
            Self::Up => "up",
            Self::Tombstone => "tombstone",
            Self::Offline => "offline",
            Self::Down => "down",
        }
    }
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placement driver member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdInfo {
    pub git_hash: String,
    pub version: String,
    pub ip: String,
    pub port: u16,
    pub deploy_path: String,
    pub status: ComponentStatus,
    pub start_timestamp: i64,
}

/// SQL gateway (TiDB) node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TidbInfo {
    pub git_hash: String,
    pub version: String,
    pub ip: String,
    pub port: u16,
    pub deploy_path: String,
    pub status: ComponentStatus,
    pub status_port: u16,
    pub start_timestamp: i64,
}

/// Store node (row-oriented or columnar)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub git_hash: String,
    pub version: String,
    pub ip: String,
    pub port: u16,
    pub deploy_path: String,
    pub status: ComponentStatus,
    pub status_port: u16,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    pub start_timestamp: i64,
}

/// Storage-engine (TiKV) store
pub type TikvStoreInfo = StoreInfo;

/// Columnar-engine (TiFlash) store
pub type TiflashStoreInfo = StoreInfo;

/// Address of a monitoring service, as recorded in etcd
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorServiceInfo {
    pub ip: String,
    pub port: u16,
    #[serde(default)]
    pub deploy_path: String,
}

pub type PrometheusInfo = MonitorServiceInfo;
pub type GrafanaInfo = MonitorServiceInfo;
pub type AlertManagerInfo = MonitorServiceInfo;

/// Ordering key shared by every addressable record
pub trait Addressed {
    fn ip(&self) -> &str;
    fn port(&self) -> u16;
}

macro_rules! impl_addressed {
    ($($ty:ty),*) => {
        $(
            impl Addressed for $ty {
                fn ip(&self) -> &str {
                    &self.ip
                }

                fn port(&self) -> u16 {
                    self.port
                }
            }
        )*
    };
}

impl_addressed!(PdInfo, TidbInfo, StoreInfo);

/// Sort records by `(ip, port)`
pub fn sort_by_address<T: Addressed>(items: &mut [T]) {
    items.sort_by(|a, b| a.ip().cmp(b.ip()).then(a.port().cmp(&b.port())));
}
