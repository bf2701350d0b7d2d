// clustertopo core
//
// Shared building blocks for cluster topology discovery:
// - types: member and monitoring-service records
// - provider: the TopologyProvider trait every source implements
// - context: cancellation and deadlines passed down to the clients
// - addr: host/port parsing for reported addresses
// - config, logging: ambient runtime setup

pub mod addr;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod provider;
pub mod types;

pub use config::Config;
pub use context::TopoContext;
pub use error::{Error, Result};
pub use provider::TopologyProvider;
pub use types::*;
