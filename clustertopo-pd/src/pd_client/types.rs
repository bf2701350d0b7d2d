//! PD HTTP API response types
//!
//! Only the fields discovery reads are modelled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// `GET /pd/api/v1/members`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembersResponse {
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub name: String,
    pub member_id: u64,
    #[serde(default)]
    pub client_urls: Vec<String>,
    #[serde(default)]
    pub binary_version: String,
    #[serde(default)]
    pub deploy_path: String,
    #[serde(default)]
    pub git_hash: String,
    #[serde(default)]
    pub start_timestamp: i64,
}

/// One entry of `GET /pd/api/v1/health`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberHealth {
    #[serde(default)]
    pub name: String,
    pub member_id: u64,
    #[serde(default)]
    pub client_urls: Vec<String>,
    #[serde(default)]
    pub health: bool,
}

/// `GET /pd/api/v1/stores`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoresResponse {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub stores: Vec<StoreEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreEntry {
    pub store: Store,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Store {
    pub id: u64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub status_address: String,
    #[serde(default)]
    pub labels: Vec<StoreLabel>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub git_hash: String,
    #[serde(default)]
    pub deploy_path: String,
    #[serde(default)]
    pub start_timestamp: i64,
    #[serde(default)]
    pub state_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreLabel {
    pub key: String,
    pub value: String,
}
