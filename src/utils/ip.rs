//! Caller identity for the suggestion and login rate limiters.
//!
//! The key is the TCP peer address. The first `X-Forwarded-For` entry (or
//! `X-Real-IP`) replaces it only when the peer is a configured trusted proxy,
//! or, with no proxies configured, when the peer is a private or loopback
//! address (the front-end dev server and same-host reverse proxies).

use std::net::{IpAddr, SocketAddr};

use actix_web::http::header::HeaderMap;
use tracing::debug;

/// Key shared by callers whose address cannot be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// One `rate_limit.trusted_proxies` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProxyRule {
    Addr(IpAddr),
    Net(IpAddr, u8),
}

impl ProxyRule {
    fn parse(entry: &str) -> Option<Self> {
        let entry = entry.trim();
        match entry.split_once('/') {
            None => entry.parse().ok().map(ProxyRule::Addr),
            Some((net, prefix)) => {
                let net: IpAddr = net.parse().ok()?;
                let prefix: u8 = prefix.parse().ok()?;
                let bits = if net.is_ipv4() { 32 } else { 128 };
                (prefix <= bits).then_some(ProxyRule::Net(net, prefix))
            }
        }
    }

    fn matches(&self, ip: IpAddr) -> bool {
        match *self {
            ProxyRule::Addr(addr) => addr == ip,
            ProxyRule::Net(IpAddr::V4(net), prefix) => match ip {
                IpAddr::V4(ip) => {
                    same_prefix(u32::from(ip) as u128, u32::from(net) as u128, prefix, 32)
                }
                IpAddr::V6(_) => false,
            },
            ProxyRule::Net(IpAddr::V6(net), prefix) => match ip {
                IpAddr::V6(ip) => same_prefix(u128::from(ip), u128::from(net), prefix, 128),
                IpAddr::V4(_) => false,
            },
        }
    }
}

fn same_prefix(a: u128, b: u128, prefix: u8, width: u32) -> bool {
    let host_bits = width - prefix as u32;
    if host_bits >= width {
        return true;
    }
    (a >> host_bits) == (b >> host_bits)
}

/// Peer strings come as `ip` or `ip:port`.
fn parse_peer(peer: &str) -> Option<IpAddr> {
    peer.parse::<SocketAddr>()
        .map(|s| s.ip())
        .or_else(|_| peer.parse::<IpAddr>())
        .ok()
}

fn is_local_hop(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            v6.is_loopback() || (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80
        }
    }
}

fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    let first_hop = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    first_hop
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(str::to_string)
}

fn peer_may_forward(peer: IpAddr, trusted_proxies: &[String]) -> bool {
    if trusted_proxies.is_empty() {
        return is_local_hop(peer);
    }
    trusted_proxies
        .iter()
        .filter_map(|entry| ProxyRule::parse(entry))
        .any(|rule| rule.matches(peer))
}

/// Resolve the rate-limit key for a request.
///
/// `peer` is `ConnectionInfo::peer_addr()`. Returns `None` when there is no
/// peer address at all.
pub fn client_ip(peer: Option<&str>, headers: &HeaderMap, trusted_proxies: &[String]) -> Option<String> {
    let peer = peer?;
    let Some(peer_ip) = parse_peer(peer) else {
        return Some(peer.to_string());
    };

    if peer_may_forward(peer_ip, trusted_proxies)
        && let Some(forwarded) = forwarded_ip(headers)
    {
        debug!("Client {} forwarded by {}", forwarded, peer_ip);
        return Some(forwarded);
    }

    Some(peer_ip.to_string())
}
