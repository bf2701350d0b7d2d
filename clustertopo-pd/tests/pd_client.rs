//! PD HTTP API client and PD-backed provider against a mock PD server

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clustertopo_core::config::PdConfig;
use clustertopo_core::{ComponentStatus, Error, Result, TopoContext, TopologyProvider};
use clustertopo_pd::{KvPair, KvSource, PdApi, PdApiClient, TopologyFromPd};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Store accessors never touch etcd
struct UnusedEtcd;

#[async_trait]
impl KvSource for UnusedEtcd {
    async fn get(&self, _ctx: &TopoContext, key: &str) -> Result<Option<KvPair>> {
        panic!("unexpected etcd get {key}");
    }

    async fn get_prefix(&self, _ctx: &TopoContext, prefix: &str) -> Result<Vec<KvPair>> {
        panic!("unexpected etcd prefix read {prefix}");
    }
}

fn client_for(server: &MockServer) -> PdApiClient {
    let config = PdConfig {
        endpoint: format!("{}/", server.uri()),
        connect_timeout_secs: 1,
        timeout_secs: 5,
    };
    PdApiClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_get_members_and_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pd/api/v1/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "header": {"cluster_id": 7},
            "members": [{
                "name": "pd-0",
                "member_id": 11,
                "client_urls": ["http://10.0.0.1:2379"],
                "binary_version": "v7.5.0",
                "git_hash": "abc",
                "deploy_path": "/deploy/pd",
                "start_timestamp": 1_700_000_000
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pd/api/v1/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "pd-0", "member_id": 11, "client_urls": ["http://10.0.0.1:2379"], "health": true}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ctx = TopoContext::new();

    let members = client.get_members(&ctx).await.unwrap();
    assert_eq!(members.members.len(), 1);
    assert_eq!(members.members[0].member_id, 11);

    let health = client.get_health(&ctx).await.unwrap();
    assert!(health[0].health);
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pd/api/v1/stores"))
        .respond_with(ResponseTemplate::new(500).set_body_string("[PD:server:ErrServerNotStarted]"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_stores(&TopoContext::new())
        .await
        .unwrap_err();
    match err {
        Error::Http { status, url } => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/pd/api/v1/stores"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pd/api/v1/stores"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_stores(&TopoContext::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

#[tokio::test]
async fn test_context_deadline_bounds_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pd/api/v1/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let ctx = TopoContext::new().with_timeout(Duration::from_millis(200));
    let err = client_for(&server).get_health(&ctx).await.unwrap_err();
    assert!(matches!(err, Error::Timeout(_)));
}

#[tokio::test]
async fn test_cancelled_context_skips_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pd/api/v1/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"members": []})))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = TopoContext::new();
    ctx.cancel();
    let err = client_for(&server).get_members(&ctx).await.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn test_store_topology_through_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pd/api/v1/stores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "stores": [
                {"store": {
                    "id": 1,
                    "address": "10.0.0.4:20160",
                    "status_address": "10.0.0.4:20180",
                    "version": "7.5.0",
                    "state_name": "Up"
                }},
                {"store": {
                    "id": 2,
                    "address": "10.0.0.5:3930",
                    "status_address": "10.0.0.5:20292",
                    "labels": [{"key": "engine", "value": "tiflash"}],
                    "version": "v7.5.0",
                    "state_name": "Down"
                }}
            ]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let topo = TopologyFromPd::new(Arc::new(UnusedEtcd), Arc::new(client_for(&server)));
    let ctx = TopoContext::new();

    let tikv = topo.get_tikv(&ctx).await.unwrap();
    assert_eq!(tikv.len(), 1);
    assert_eq!(tikv[0].version, "v7.5.0");
    assert_eq!(tikv[0].status, ComponentStatus::Up);

    let tiflash = topo.get_tiflash(&ctx).await.unwrap();
    assert_eq!(tiflash.len(), 1);
    assert_eq!(tiflash[0].status, ComponentStatus::Down);
    assert_eq!(tiflash[0].status_port, 20292);
}
