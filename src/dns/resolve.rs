//! Core DNS resolution types and traits.
//!
//! This module defines the `Resolve` and `ReverseResolve` traits and the
//! supporting types that form the foundation of the DNS abstraction layer.

use crate::base::neterror::NetError;
use std::{
    borrow::Cow,
    collections::HashMap,
    fmt,
    future::Future,
    net::{IpAddr, SocketAddr},
    pin::Pin,
    sync::Arc,
};

/// A domain name to resolve into IP addresses, or the result of a reverse lookup.
///
/// This is a lightweight wrapper around a hostname string that provides
/// a type-safe way to pass domain names to and from resolvers.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Name {
    host: Box<str>,
}

impl Name {
    /// Creates a new [`Name`] from any string-like type.
    #[inline]
    pub fn new(host: impl Into<Box<str>>) -> Self {
        Self { host: host.into() }
    }

    /// Creates a [`Name`] from a fully qualified answer, dropping the trailing root dot.
    pub fn from_fqdn(fqdn: &str) -> Self {
        Self::new(fqdn.strip_suffix('.').unwrap_or(fqdn))
    }

    /// View the hostname as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.host.into_string()
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.host, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host, f)
    }
}

/// Alias for an `Iterator` trait object over `SocketAddr`.
pub type Addrs = Box<dyn Iterator<Item = SocketAddr> + Send>;

/// Alias for the `Future` type returned by a DNS resolver.
pub type Resolving = Pin<Box<dyn Future<Output = Result<Addrs, NetError>> + Send>>;

/// Alias for the `Future` type returned by a reverse DNS resolver.
pub type Reversing = Pin<Box<dyn Future<Output = Result<Name, NetError>> + Send>>;

/// Forward DNS resolution.
///
/// Implementations must be thread-safe.
///
/// # Design Notes
///
/// - Resolution is assumed to always be ready (no backpressure).
/// - Uses `&self` for concurrent resolution without mutable access.
/// - Returns boxed futures for trait object compatibility.
pub trait Resolve: Send + Sync {
    /// Resolves a domain name to IP addresses.
    ///
    /// The returned addresses will have port 0; callers should set the
    /// appropriate port based on the target service.
    fn resolve(&self, name: Name) -> Resolving;
}

/// Reverse (PTR) DNS resolution.
pub trait ReverseResolve: Send + Sync {
    /// Resolves an address to its canonical host name.
    ///
    /// The returned name carries no trailing root dot.
    fn reverse(&self, addr: IpAddr) -> Reversing;
}

/// A resolver capable of both lookup directions.
///
/// Blanket-implemented for every type implementing [`Resolve`] and [`ReverseResolve`].
pub trait HostResolver: Resolve + ReverseResolve {}

impl<T: Resolve + ReverseResolve + ?Sized> HostResolver for T {}

/// Blanket implementation for Arc-wrapped resolvers.
impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn resolve(&self, name: Name) -> Resolving {
        (**self).resolve(name)
    }
}

impl<R: ReverseResolve + ?Sized> ReverseResolve for Arc<R> {
    fn reverse(&self, addr: IpAddr) -> Reversing {
        (**self).reverse(addr)
    }
}

/// DNS resolver wrapper that supports hostname and address overrides.
///
/// Both override tables are consulted before falling back to the
/// underlying resolver. Useful for:
/// - Testing without real DNS
/// - Pinning the discovery host to a known set of mirrors
/// - Local development with custom hostnames
///
/// # Example
///
/// ```rust,ignore
/// use radiobrowser::dns::{DnsResolverWithOverrides, HickoryResolver, Name};
/// use std::collections::HashMap;
///
/// let mut overrides = HashMap::new();
/// overrides.insert("all.api.local".into(), vec!["10.0.0.1:0".parse().unwrap()]);
///
/// let resolver = DnsResolverWithOverrides::new(Arc::new(HickoryResolver::new()), overrides)
///     .with_reverse_override("10.0.0.1".parse().unwrap(), Name::new("de1.api.local"));
/// ```
pub struct DnsResolverWithOverrides {
    inner: Arc<dyn HostResolver>,
    overrides: Arc<HashMap<Cow<'static, str>, Vec<SocketAddr>>>,
    reverse_overrides: Arc<HashMap<IpAddr, Name>>,
}

impl DnsResolverWithOverrides {
    /// Creates a new resolver with the given forward overrides.
    ///
    /// # Arguments
    ///
    /// * `inner` - The fallback resolver for non-overridden names and addresses.
    /// * `overrides` - Map of hostnames to their resolved addresses.
    pub fn new(
        inner: Arc<dyn HostResolver>,
        overrides: HashMap<Cow<'static, str>, Vec<SocketAddr>>,
    ) -> Self {
        Self {
            inner,
            overrides: Arc::new(overrides),
            reverse_overrides: Arc::new(HashMap::new()),
        }
    }

    /// Adds a reverse override answering `addr` with `name`.
    pub fn with_reverse_override(mut self, addr: IpAddr, name: Name) -> Self {
        Arc::make_mut(&mut self.reverse_overrides).insert(addr, name);
        self
    }

    /// Returns the number of configured forward overrides.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Returns the number of configured reverse overrides.
    pub fn reverse_override_count(&self) -> usize {
        self.reverse_overrides.len()
    }
}

impl Resolve for DnsResolverWithOverrides {
    fn resolve(&self, name: Name) -> Resolving {
        if let Some(addrs) = self.overrides.get(name.as_str()) {
            let addrs: Addrs = Box::new(addrs.clone().into_iter());
            return Box::pin(std::future::ready(Ok(addrs)));
        }
        self.inner.resolve(name)
    }
}

impl ReverseResolve for DnsResolverWithOverrides {
    fn reverse(&self, addr: IpAddr) -> Reversing {
        if let Some(name) = self.reverse_overrides.get(&addr) {
            return Box::pin(std::future::ready(Ok(name.clone())));
        }
        self.inner.reverse(addr)
    }
}

impl fmt::Debug for DnsResolverWithOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsResolverWithOverrides")
            .field("override_count", &self.overrides.len())
            .field("reverse_override_count", &self.reverse_overrides.len())
            .finish_non_exhaustive()
    }
}
