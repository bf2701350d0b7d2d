//! SQL gateway (TiDB) discovery from etcd topology records
//!
//! Each TiDB server keeps two keys under `/topology/tidb/<host:port>/`:
//! `info` holds a JSON description written at startup, `ttl` holds the unix
//! time in nanoseconds of its latest heartbeat.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use clustertopo_core::addr::parse_host_port;
use clustertopo_core::types::sort_by_address;
use clustertopo_core::{ComponentStatus, Error, Result, TidbInfo, TopoContext};

use crate::etcd::KvSource;

pub const TIDB_TOPOLOGY_KEY_PREFIX: &str = "/topology/tidb/";

/// Heartbeats older than this mark the node unreachable
const TIDB_TTL_SECS: i64 = 45;

#[derive(Debug, Deserialize)]
struct TidbTopologyRecord {
    #[serde(default)]
    version: String,
    #[serde(default)]
    git_hash: String,
    #[serde(default)]
    status_port: u16,
    #[serde(default)]
    deploy_path: String,
    #[serde(default)]
    start_timestamp: i64,
}

/// List TiDB servers registered in etcd.
///
/// Only servers with an `info` record are listed; they are `Up` when their
/// heartbeat is fresh and `Unreachable` otherwise. Malformed keys and values
/// are skipped.
pub async fn get_tidb_instances<E>(ctx: &TopoContext, etcd: &E) -> Result<Vec<TidbInfo>>
where
    E: KvSource + ?Sized,
{
    let pairs = etcd.get_prefix(ctx, TIDB_TOPOLOGY_KEY_PREFIX).await?;
    let now = Utc::now();

    let mut alive = HashSet::new();
    let mut infos = HashMap::new();
    for pair in &pairs {
        let Some(remaining) = pair.key.strip_prefix(TIDB_TOPOLOGY_KEY_PREFIX) else {
            continue;
        };
        // `<host:port>/info` or `<host:port>/ttl`
        let remaining = remaining.trim_end_matches('/');
        let Some((address, kind)) = remaining.split_once('/') else {
            continue;
        };
        if kind.contains('/') {
            continue;
        }

        match kind {
            "info" => match parse_tidb_info(address, &pair.value) {
                Ok(info) => {
                    infos.insert(address, info);
                }
                Err(e) => {
                    tracing::warn!(key = %pair.key, error = %e, "Ignored invalid TiDB topology record");
                }
            },
            "ttl" => match parse_tidb_aliveness(&pair.value, now) {
                Ok(true) => {
                    alive.insert(address);
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(key = %pair.key, error = %e, "Ignored invalid TiDB TTL record");
                }
            },
            _ => {}
        }
    }

    let mut nodes: Vec<TidbInfo> = infos
        .into_iter()
        .map(|(address, mut info)| {
            if alive.contains(address) {
                info.status = ComponentStatus::Up;
            }
            info
        })
        .collect();

    sort_by_address(&mut nodes);
    tracing::debug!(count = nodes.len(), "Discovered TiDB servers");
    Ok(nodes)
}

fn parse_tidb_info(address: &str, value: &[u8]) -> Result<TidbInfo> {
    let record: TidbTopologyRecord = serde_json::from_slice(value)
        .map_err(|e| Error::InvalidTopologyData(format!("TiDB info unmarshal failed: {e}")))?;
    let (ip, port) = parse_host_port(address)?;

    Ok(TidbInfo {
        git_hash: record.git_hash,
        version: record.version,
        ip,
        port,
        deploy_path: record.deploy_path,
        status: ComponentStatus::Unreachable,
        status_port: record.status_port,
        start_timestamp: record.start_timestamp,
    })
}

fn parse_tidb_aliveness(value: &[u8], now: DateTime<Utc>) -> Result<bool> {
    let nanos: i64 = std::str::from_utf8(value)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| Error::InvalidTopologyData("TiDB TTL info parse failed".to_string()))?;

    let heartbeat = DateTime::from_timestamp_nanos(nanos);
    Ok(now.signed_duration_since(heartbeat) <= Duration::seconds(TIDB_TTL_SECS))
}
