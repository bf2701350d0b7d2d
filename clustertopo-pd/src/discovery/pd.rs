//! Placement driver member discovery

use clustertopo_core::addr::parse_host_port_from_url;
use clustertopo_core::types::sort_by_address;
use clustertopo_core::{ComponentStatus, PdInfo, Result, TopoContext};

use crate::pd_client::{MemberHealth, PdApi};

/// List PD members with their health.
///
/// A member is `Up` only when PD's health endpoint reports it healthy.
/// Members whose first client URL cannot be parsed are skipped.
pub async fn get_pd_instances<P>(ctx: &TopoContext, pd_api: &P) -> Result<Vec<PdInfo>>
where
    P: PdApi + ?Sized,
{
    let health = pd_api.get_health(ctx).await?;
    let members = pd_api.get_members(ctx).await?;

    let mut nodes = Vec::with_capacity(members.members.len());
    for member in members.members {
        let Some(client_url) = member.client_urls.first() else {
            tracing::warn!(member = %member.name, "PD member has no client URL, skipped");
            continue;
        };
        let (ip, port) = match parse_host_port_from_url(client_url) {
            Ok(addr) => addr,
            Err(e) => {
                tracing::warn!(member = %member.name, error = %e, "Invalid PD client URL, skipped");
                continue;
            }
        };

        nodes.push(PdInfo {
            git_hash: member.git_hash,
            version: member.binary_version,
            ip,
            port,
            deploy_path: member.deploy_path,
            status: member_status(member.member_id, &health),
            start_timestamp: member.start_timestamp,
        });
    }

    sort_by_address(&mut nodes);
    tracing::debug!(count = nodes.len(), "Discovered PD members");
    Ok(nodes)
}

fn member_status(member_id: u64, health: &[MemberHealth]) -> ComponentStatus {
    if health.iter().any(|h| h.member_id == member_id && h.health) {
        ComponentStatus::Up
    } else {
        ComponentStatus::Unreachable
    }
}
