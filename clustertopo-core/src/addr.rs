//! Host/port parsing for addresses reported by PD and etcd records

use url::Url;

use crate::error::{Error, Result};

/// Split `host:port` (or `[v6]:port`) into host and port.
pub fn parse_host_port(address: &str) -> Result<(String, u16)> {
    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| Error::InvalidTopologyData(format!("missing port in address {address:?}")))?;

    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if host.is_empty() {
        return Err(Error::InvalidTopologyData(format!(
            "missing host in address {address:?}"
        )));
    }
    if host.contains(':') && !address.starts_with('[') {
        return Err(Error::InvalidTopologyData(format!(
            "too many colons in address {address:?}"
        )));
    }

    let port = port
        .parse::<u16>()
        .map_err(|e| Error::InvalidTopologyData(format!("invalid port in address {address:?}: {e}")))?;

    Ok((host.to_string(), port))
}

/// Extract host and port from a URL such as `http://10.0.0.1:2379`.
///
/// Falls back to the scheme's default port when none is given.
pub fn parse_host_port_from_url(raw: &str) -> Result<(String, u16)> {
    let url = Url::parse(raw)
        .map_err(|e| Error::InvalidTopologyData(format!("invalid URL {raw:?}: {e}")))?;

    let host = match url.host() {
        Some(url::Host::Ipv6(addr)) => addr.to_string(),
        Some(host) => host.to_string(),
        None => {
            return Err(Error::InvalidTopologyData(format!("missing host in URL {raw:?}")));
        }
    };
    let port = url
        .port_or_known_default()
        .ok_or_else(|| Error::InvalidTopologyData(format!("missing port in URL {raw:?}")))?;

    Ok((host, port))
}
