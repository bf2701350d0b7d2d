mod snapshot;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use clustertopo_core::{logging, Config, TopoContext, TopologyProvider};
use clustertopo_pd::{EtcdKv, PdApiClient, TopologyFromPd};

use snapshot::ClusterTopology;

#[derive(Parser, Debug)]
#[command(name = "clustertopo")]
#[command(about = "Print the topology of a PD-managed cluster", long_about = None)]
struct Args {
    /// Configuration file (yaml, toml or json)
    #[arg(long, short, env = "CLUSTERTOPO_CONFIG_PATH")]
    config: Option<String>,

    /// PD HTTP endpoint, e.g. http://127.0.0.1:2379
    #[arg(long)]
    pd_endpoint: Option<String>,

    /// Comma separated etcd endpoints
    #[arg(long, value_delimiter = ',')]
    etcd_endpoints: Option<Vec<String>>,

    /// Overall deadline for the query in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    component: Component,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    /// Placement driver members
    Pd,
    /// SQL gateway servers
    Tidb,
    /// Row storage stores
    Tikv,
    /// Columnar storage stores
    Tiflash,
    Prometheus,
    Grafana,
    Alertmanager,
    /// Every component, fetched concurrently
    All,
}

impl Args {
    /// Command line flags take precedence over file and environment values
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(endpoint) = &self.pd_endpoint {
            config.pd.endpoint.clone_from(endpoint);
        }
        if let Some(endpoints) = &self.etcd_endpoints {
            config.etcd.endpoints.clone_from(endpoints);
        }
        if let Some(secs) = self.timeout_secs {
            config.query_timeout_secs = secs;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load configuration
    let mut config = Config::load(args.config.as_deref())?;
    args.apply_overrides(&mut config);
    if let Err(errors) = config.validate() {
        for e in &errors {
            eprintln!("Config validation error: {e}");
        }
        return Err(anyhow::anyhow!(
            "Configuration validation failed with {} error(s)",
            errors.len()
        ));
    }

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!(pd = %config.pd.endpoint, etcd = ?config.etcd.endpoints, "clustertopo starting");

    // 3. Build clients and the provider
    let etcd = EtcdKv::connect(&config.etcd).await?;
    let pd_api = PdApiClient::new(&config.pd)?;
    let provider = TopologyFromPd::new(Arc::new(etcd), Arc::new(pd_api));

    // 4. Run the query under a deadline, cancelled on Ctrl-C
    let ctx = TopoContext::new().with_timeout(config.query_timeout());
    let signal_ctx = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling topology query");
            signal_ctx.cancel();
        }
    });

    let started = Instant::now();
    let output = query(&provider, &ctx, args.component).await?;
    println!("{output}");

    info!(
        component = ?args.component,
        elapsed = ?started.elapsed(),
        "Topology query finished"
    );
    Ok(())
}

async fn query<T>(provider: &T, ctx: &TopoContext, component: Component) -> Result<String>
where
    T: TopologyProvider + ?Sized,
{
    Ok(match component {
        Component::Pd => to_json(&provider.get_pd(ctx).await?)?,
        Component::Tidb => to_json(&provider.get_tidb(ctx).await?)?,
        Component::Tikv => to_json(&provider.get_tikv(ctx).await?)?,
        Component::Tiflash => to_json(&provider.get_tiflash(ctx).await?)?,
        Component::Prometheus => to_json(&provider.get_prometheus(ctx).await?)?,
        Component::Grafana => to_json(&provider.get_grafana(ctx).await?)?,
        Component::Alertmanager => to_json(&provider.get_alert_manager(ctx).await?)?,
        Component::All => to_json(&ClusterTopology::fetch(provider, ctx).await?)?,
    })
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
