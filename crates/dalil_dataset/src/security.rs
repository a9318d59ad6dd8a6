//! Address policy for dataset sources.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use thiserror::Error;
use url::{Host, Url};

/// Network reach of a dataset host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostScope {
    Public,
    Loopback,
    /// RFC 1918, link-local, shared (CGNAT) and IPv6 unique-local ranges.
    Private,
}

impl fmt::Display for HostScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HostScope::Public => "public",
            HostScope::Loopback => "loopback",
            HostScope::Private => "private network",
        })
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecurityError {
    #[error("Unsupported dataset scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    /// Credentials in the URL would end up in logs and error messages.
    #[error("Dataset URL must not embed credentials")]
    EmbeddedCredentials,

    #[error("Dataset host {host} is a {scope} address; set allow_local to read from it")]
    LocalHost { host: String, scope: HostScope },
}

/// Checks that a dataset URL may be fetched.
///
/// The scheme and credential checks always apply. Hosts outside the public
/// internet are refused unless `allow_local` is set, which is the case for
/// development servers.
pub fn validate_url(url: &Url, allow_local: bool) -> Result<(), SecurityError> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SecurityError::UnsupportedScheme(url.scheme().to_string()));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(SecurityError::EmbeddedCredentials);
    }
    if allow_local {
        return Ok(());
    }

    // http(s) URLs always carry a host.
    let Some(host) = url.host() else {
        return Ok(());
    };
    match host_scope(&host) {
        HostScope::Public => Ok(()),
        scope => Err(SecurityError::LocalHost {
            host: host.to_string(),
            scope,
        }),
    }
}

/// Classifies `host` without resolving names.
pub fn host_scope(host: &Host<&str>) -> HostScope {
    match host {
        Host::Domain(name) => {
            let name = name.trim_end_matches('.').to_ascii_lowercase();
            if name == "localhost" || name.ends_with(".localhost") {
                HostScope::Loopback
            } else {
                HostScope::Public
            }
        }
        Host::Ipv4(ip) => ipv4_scope(*ip),
        Host::Ipv6(ip) => match ip.to_ipv4_mapped() {
            Some(mapped) => ipv4_scope(mapped),
            None => ipv6_scope(*ip),
        },
    }
}

fn ipv4_scope(ip: Ipv4Addr) -> HostScope {
    let [a, b, ..] = ip.octets();
    // 100.64.0.0/10
    let shared = a == 100 && (b & 0xc0) == 64;

    if ip.is_loopback() || ip.is_unspecified() {
        HostScope::Loopback
    } else if ip.is_private() || ip.is_link_local() || shared {
        HostScope::Private
    } else {
        HostScope::Public
    }
}

fn ipv6_scope(ip: Ipv6Addr) -> HostScope {
    if ip.is_loopback() || ip.is_unspecified() {
        HostScope::Loopback
    } else if ip.is_unique_local() || ip.is_unicast_link_local() {
        HostScope::Private
    } else {
        HostScope::Public
    }
}
