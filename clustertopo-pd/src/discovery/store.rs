//! Store (TiKV / TiFlash) discovery from the PD store inventory

use std::collections::BTreeMap;

use clustertopo_core::addr::parse_host_port;
use clustertopo_core::types::sort_by_address;
use clustertopo_core::{
    ComponentStatus, Result, StoreInfo, TiflashStoreInfo, TikvStoreInfo, TopoContext,
};

use crate::pd_client::{PdApi, Store};

const ENGINE_LABEL_KEY: &str = "engine";
const ENGINE_TIFLASH: &str = "tiflash";

/// Fetch every store once and split the result into TiKV and TiFlash stores.
///
/// A store labelled `engine=tiflash` is TiFlash; everything else is TiKV.
pub async fn get_store_instances<P>(
    ctx: &TopoContext,
    pd_api: &P,
) -> Result<(Vec<TikvStoreInfo>, Vec<TiflashStoreInfo>)>
where
    P: PdApi + ?Sized,
{
    let resp = pd_api.get_stores(ctx).await?;

    let (tiflash, tikv): (Vec<Store>, Vec<Store>) = resp
        .stores
        .into_iter()
        .map(|entry| entry.store)
        .partition(is_tiflash);

    let tikv = build_store_topology(tikv);
    let tiflash = build_store_topology(tiflash);
    tracing::debug!(tikv = tikv.len(), tiflash = tiflash.len(), "Discovered stores");
    Ok((tikv, tiflash))
}

fn is_tiflash(store: &Store) -> bool {
    store
        .labels
        .iter()
        .any(|l| l.key == ENGINE_LABEL_KEY && l.value == ENGINE_TIFLASH)
}

fn build_store_topology(stores: Vec<Store>) -> Vec<StoreInfo> {
    let mut nodes: Vec<StoreInfo> = stores
        .into_iter()
        .filter_map(|store| {
            let (ip, port) = match parse_host_port(&store.address) {
                Ok(addr) => addr,
                Err(e) => {
                    tracing::warn!(store_id = store.id, error = %e, "Invalid store address, skipped");
                    return None;
                }
            };
            let status_port = match parse_host_port(&store.status_address) {
                Ok((_, port)) => port,
                Err(e) => {
                    tracing::warn!(store_id = store.id, error = %e, "Invalid store status address, skipped");
                    return None;
                }
            };

            let labels: BTreeMap<String, String> = store
                .labels
                .into_iter()
                .map(|l| (l.key, l.value))
                .collect();

            Some(StoreInfo {
                git_hash: store.git_hash,
                version: normalize_version(store.version),
                ip,
                port,
                deploy_path: store.deploy_path,
                status: parse_store_state(&store.state_name),
                status_port,
                labels,
                start_timestamp: store.start_timestamp,
            })
        })
        .collect();

    sort_by_address(&mut nodes);
    nodes
}

/// TiFlash reports versions without the leading `v`
fn normalize_version(version: String) -> String {
    if version.is_empty() || version.starts_with('v') {
        version
    } else {
        format!("v{version}")
    }
}

fn parse_store_state(state: &str) -> ComponentStatus {
    match state.trim().to_lowercase().as_str() {
        "up" => ComponentStatus::Up,
        "tombstone" => ComponentStatus::Tombstone,
        "offline" => ComponentStatus::Offline,
        "down" => ComponentStatus::Down,
        _ => ComponentStatus::Unreachable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pd_client::{MockPdApi, StoreEntry, StoreLabel, StoresResponse};

    fn store(id: u64, address: &str, engine: Option<&str>, state: &str) -> StoreEntry {
        let mut labels = vec![StoreLabel {
            key: "zone".to_string(),
            value: "z1".to_string(),
        }];
        if let Some(engine) = engine {
            labels.push(StoreLabel {
                key: ENGINE_LABEL_KEY.to_string(),
                value: engine.to_string(),
            });
        }
        let host = address.rsplit_once(':').map_or(address, |(h, _)| h);
        StoreEntry {
            store: Store {
                id,
                address: address.to_string(),
                status_address: format!("{host}:20180"),
                labels,
                version: "7.5.0".to_string(),
                git_hash: "cafe".to_string(),
                deploy_path: "/deploy/store".to_string(),
                start_timestamp: 1_700_000_000,
                state_name: state.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_stores_split_by_engine_label() {
        let mut api = MockPdApi::new();
        api.expect_get_stores().times(1).returning(|_| {
            Ok(StoresResponse {
                count: 4,
                stores: vec![
                    store(1, "10.0.0.5:20160", None, "Up"),
                    store(2, "10.0.0.4:20160", None, "Disconnected"),
                    store(3, "10.0.0.7:3930", Some("tiflash"), "Offline"),
                    store(4, "10.0.0.6:20160", Some("tikv"), "Tombstone"),
                ],
            })
        });

        let (tikv, tiflash) = get_store_instances(&TopoContext::new(), &api).await.unwrap();

        let tikv_addrs: Vec<_> = tikv.iter().map(|s| (s.ip.as_str(), s.status)).collect();
        assert_eq!(
            tikv_addrs,
            vec![
                ("10.0.0.4", ComponentStatus::Unreachable),
                ("10.0.0.5", ComponentStatus::Up),
                ("10.0.0.6", ComponentStatus::Tombstone),
            ]
        );

        assert_eq!(tiflash.len(), 1);
        assert_eq!(tiflash[0].port, 3930);
        assert_eq!(tiflash[0].status_port, 20180);
        assert_eq!(tiflash[0].status, ComponentStatus::Offline);
        assert_eq!(tiflash[0].labels.get("engine").map(String::as_str), Some("tiflash"));
        assert_eq!(tiflash[0].labels.get("zone").map(String::as_str), Some("z1"));
    }

    #[tokio::test]
    async fn test_stores_with_bad_addresses_skipped() {
        let mut api = MockPdApi::new();
        api.expect_get_stores().returning(|_| {
            let mut bad_status = store(2, "10.0.0.2:20160", None, "Up");
            bad_status.store.status_address = String::new();
            Ok(StoresResponse {
                count: 3,
                stores: vec![store(1, "10.0.0.1", None, "Up"), bad_status, store(3, "10.0.0.3:20160", None, "Up")],
            })
        });

        let (tikv, tiflash) = get_store_instances(&TopoContext::new(), &api).await.unwrap();
        assert_eq!(tikv.len(), 1);
        assert_eq!(tikv[0].ip, "10.0.0.3");
        assert!(tiflash.is_empty());
    }

    #[test]
    fn test_normalize_version() {
        assert_eq!(normalize_version("7.5.0".to_string()), "v7.5.0");
        assert_eq!(normalize_version("v7.5.0".to_string()), "v7.5.0");
        assert_eq!(normalize_version(String::new()), "");
    }

    #[test]
    fn test_parse_store_state() {
        assert_eq!(parse_store_state("Up"), ComponentStatus::Up);
        assert_eq!(parse_store_state(" Down\n"), ComponentStatus::Down);
        assert_eq!(parse_store_state("TOMBSTONE"), ComponentStatus::Tombstone);
        assert_eq!(parse_store_state("Offline"), ComponentStatus::Offline);
        assert_eq!(parse_store_state("Disconnected"), ComponentStatus::Unreachable);
        assert_eq!(parse_store_state("Serving"), ComponentStatus::Unreachable);
    }
}
