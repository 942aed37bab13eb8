//! Async DNS resolver using hickory-dns.
//!
//! This resolver provides fully async DNS resolution with support for:
//! - System DNS configuration auto-detection
//! - Dual-stack (IPv4 + IPv6) lookups
//! - PTR lookups for reverse resolution
//!
//! # Performance
//!
//! The resolver is fully async and doesn't require spawning blocking tasks.
//! It maintains connection pools to DNS servers for better performance
//! under load. Answers are not cached: the discovery host's address set
//! changes as mirrors join and leave, so every lookup goes to the network.

use super::{Addrs, Name, Resolve, Resolving, ReverseResolve, Reversing};
use crate::base::neterror::NetError;
use hickory_resolver::{
    config::{LookupIpStrategy, ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
    TokioResolver,
};
use std::{
    net::{IpAddr, SocketAddr},
    sync::LazyLock,
};

/// Async DNS resolver backed by hickory-dns.
///
/// This resolver is lazily initialized on first use and shared across
/// all instances via a static `LazyLock`. It automatically configures
/// itself based on the system's DNS settings.
///
/// # Example
///
/// ```rust,ignore
/// use radiobrowser::dns::{HickoryResolver, Name, Resolve, ReverseResolve};
///
/// let resolver = HickoryResolver::new();
/// let addrs = resolver.resolve(Name::new("all.api.radio-browser.info")).await?;
/// for addr in addrs {
///     println!("{}", resolver.reverse(addr.ip()).await?);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HickoryResolver {
    resolver: &'static LazyLock<TokioResolver>,
}

impl HickoryResolver {
    /// Creates a new `HickoryResolver`.
    ///
    /// The underlying resolver is lazily initialized on first DNS query.
    /// It will attempt to read system DNS configuration; if that fails,
    /// it falls back to sensible defaults.
    pub fn new() -> Self {
        static RESOLVER: LazyLock<TokioResolver> = LazyLock::new(|| {
            let mut builder = match TokioResolver::builder_tokio() {
                Ok(builder) => {
                    tracing::debug!("Using system DNS configuration");
                    builder
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Failed to read system DNS config, using defaults"
                    );
                    TokioResolver::builder_with_config(
                        ResolverConfig::default(),
                        TokioConnectionProvider::default(),
                    )
                }
            };

            configure(builder.options_mut());
            builder.build()
        });

        Self {
            resolver: &RESOLVER,
        }
    }
}

fn configure(opts: &mut ResolverOpts) {
    // Mirrors publish both A and AAAA records
    opts.ip_strategy = LookupIpStrategy::Ipv4AndIpv6;
    opts.cache_size = 0;
}

impl Default for HickoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolve for HickoryResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move {
            let domain = name.as_str();
            tracing::debug!(domain = %domain, "resolving via hickory-dns");

            let lookup = resolver.resolver.lookup_ip(domain).await.map_err(|e| {
                tracing::debug!(domain = %domain, error = %e, "hickory-dns lookup failed");
                NetError::name_not_resolved(domain, e)
            })?;

            let addrs: Vec<SocketAddr> = lookup.iter().map(|ip| SocketAddr::new(ip, 0)).collect();

            if addrs.is_empty() {
                return Err(NetError::name_not_resolved(domain, "No addresses returned"));
            }

            tracing::debug!(domain = %domain, count = addrs.len(), "hickory-dns resolution complete");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}

impl ReverseResolve for HickoryResolver {
    fn reverse(&self, addr: IpAddr) -> Reversing {
        let resolver = self.clone();
        Box::pin(async move {
            tracing::debug!(%addr, "reverse resolving via hickory-dns");

            let lookup = resolver.resolver.reverse_lookup(addr).await.map_err(|e| {
                tracing::debug!(%addr, error = %e, "hickory-dns reverse lookup failed");
                NetError::address_not_reversed(addr, e)
            })?;

            // Several PTR records are legal; the first answer is the canonical name.
            let name = lookup
                .iter()
                .next()
                .map(|ptr| Name::from_fqdn(&ptr.to_string()))
                .ok_or_else(|| NetError::address_not_reversed(addr, "No PTR record returned"))?;

            tracing::debug!(%addr, name = %name, "hickory-dns reverse resolution complete");
            Ok(name)
        })
    }
}
