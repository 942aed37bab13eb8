//! Mirror discovery and selection.
//!
//! A single well-known host name resolves to one address per live mirror.
//! Reverse-resolving each address yields that mirror's canonical host name,
//! which becomes the `https://` origin requests are sent to.

use crate::base::error::Error;
use crate::base::neterror::NetError;
use crate::dns::{HostResolver, Name};
use futures::future::join_all;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use url::Url;

/// Host name whose address records enumerate every current mirror.
pub const DISCOVERY_HOST: &str = "all.api.radio-browser.info";

/// Distinct mirror host names from one discovery pass, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorSet {
    hosts: Vec<String>,
}

impl MirrorSet {
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.hosts.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.hosts
    }

    pub fn contains(&self, host: &str) -> bool {
        self.hosts.binary_search_by(|h| h.as_str().cmp(host)).is_ok()
    }

    /// Picks one host uniformly at random, `None` when the set is empty.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.hosts.choose(rng).map(String::as_str)
    }

    /// Every mirror as a base URL, in set order.
    pub fn base_urls(&self) -> Vec<BaseUrl> {
        self.iter().map(BaseUrl::for_mirror).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for MirrorSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let unique: BTreeSet<String> = iter.into_iter().map(Into::into).collect();
        Self {
            hosts: unique.into_iter().collect(),
        }
    }
}

impl IntoIterator for MirrorSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.hosts.into_iter()
    }
}

/// Origin of one mirror, e.g. `https://de1.api.radio-browser.info`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUrl {
    url: String,
}

impl BaseUrl {
    /// Builds the HTTPS origin for a discovered mirror host.
    pub fn for_mirror(host: &str) -> Self {
        Self {
            url: format!("https://{host}"),
        }
    }

    /// Accepts a caller-supplied origin for a pinned mirror.
    ///
    /// Only `http` and `https` URLs with a host are accepted. A trailing
    /// slash is dropped so paths can be appended uniformly.
    pub fn parse(input: &str) -> Result<Self, NetError> {
        let url = Url::parse(input).map_err(|_| NetError::InvalidUrl)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(NetError::DisallowedUrlScheme);
        }
        if url.host_str().is_none() {
            return Err(NetError::InvalidUrl);
        }
        Ok(Self {
            url: input.trim_end_matches('/').to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Host and optional port of the origin.
    pub fn host(&self) -> &str {
        let rest = self.url.split_once("://").map_or(self.url.as_str(), |(_, r)| r);
        rest.split(['/', '?', '#']).next().unwrap_or(rest)
    }

    pub fn to_url(&self) -> Result<Url, NetError> {
        Url::parse(&self.url).map_err(|_| NetError::InvalidUrl)
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Discovers live mirrors through DNS and selects one of them.
#[derive(Clone)]
pub struct MirrorResolver {
    resolver: Arc<dyn HostResolver>,
    discovery_host: Name,
}

impl MirrorResolver {
    pub fn new(resolver: Arc<dyn HostResolver>) -> Self {
        Self {
            resolver,
            discovery_host: Name::new(DISCOVERY_HOST),
        }
    }

    /// Replaces the discovery host name.
    pub fn with_discovery_host(mut self, host: impl Into<Name>) -> Self {
        self.discovery_host = host.into();
        self
    }

    pub fn discovery_host(&self) -> &Name {
        &self.discovery_host
    }

    /// Resolves the discovery host, reverse-resolves every address
    /// concurrently and returns the distinct host names in ascending order.
    ///
    /// A failed reverse lookup only drops that address. A failed forward
    /// lookup is returned as is.
    pub async fn discover_mirrors(&self) -> Result<MirrorSet, NetError> {
        let mut addrs: Vec<IpAddr> = self
            .resolver
            .resolve(self.discovery_host.clone())
            .await?
            .map(|addr| addr.ip())
            .collect();
        addrs.sort_unstable();
        addrs.dedup();

        tracing::debug!(
            host = %self.discovery_host,
            count = addrs.len(),
            "discovery host resolved"
        );

        let lookups = addrs.into_iter().map(|addr| {
            let resolver = self.resolver.clone();
            async move { (addr, resolver.reverse(addr).await) }
        });

        let mirrors: MirrorSet = join_all(lookups)
            .await
            .into_iter()
            .filter_map(|(addr, result)| match result {
                Ok(name) => Some(name.into_string()),
                Err(e) => {
                    tracing::warn!(%addr, error = %e, "skipping mirror address");
                    None
                }
            })
            .collect();

        tracing::debug!(count = mirrors.len(), "mirror discovery complete");
        Ok(mirrors)
    }

    /// Runs a fresh discovery pass and picks one mirror uniformly at random.
    pub async fn pick_base_url(&self) -> Result<BaseUrl, Error> {
        let mirrors = self.discover_mirrors().await?;
        let base_url = select(&mirrors).ok_or(Error::NoHostFound)?;
        tracing::debug!(base_url = %base_url, "mirror selected");
        Ok(base_url)
    }
}

impl fmt::Debug for MirrorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MirrorResolver")
            .field("discovery_host", &self.discovery_host)
            .finish_non_exhaustive()
    }
}

fn select(mirrors: &MirrorSet) -> Option<BaseUrl> {
    mirrors.choose(&mut rand::rng()).map(BaseUrl::for_mirror)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_mirror_set_sorts_and_dedups() {
        let set: MirrorSet = ["b.example.com", "a.example.com", "a.example.com"]
            .into_iter()
            .collect();
        assert_eq!(set.as_slice(), ["a.example.com", "b.example.com"]);
        assert!(set.contains("b.example.com"));
        assert!(!set.contains("c.example.com"));
    }

    #[test]
    fn test_mirror_set_is_case_sensitive() {
        let set: MirrorSet = ["A.example.com", "a.example.com"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice(), ["A.example.com", "a.example.com"]);
    }

    #[test]
    fn test_choose_from_empty_set() {
        let set = MirrorSet::default();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(set.choose(&mut rng).is_none());
        assert!(select(&set).is_none());
    }

    #[test]
    fn test_choose_covers_every_member() {
        let set: MirrorSet = ["a", "b", "c"].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = BTreeSet::new();
        for _ in 0..200 {
            seen.insert(set.choose(&mut rng).unwrap().to_string());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_base_url_for_mirror() {
        let url = BaseUrl::for_mirror("de1.api.radio-browser.info");
        assert_eq!(url.as_str(), "https://de1.api.radio-browser.info");
        assert_eq!(url.host(), "de1.api.radio-browser.info");
        assert_eq!(url.to_string(), "https://de1.api.radio-browser.info");
    }

    #[test]
    fn test_base_url_parse() {
        let url = BaseUrl::parse("http://127.0.0.1:8080/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080");
        assert_eq!(url.host(), "127.0.0.1:8080");

        assert_eq!(BaseUrl::parse("not a url"), Err(NetError::InvalidUrl));
        assert_eq!(
            BaseUrl::parse("ftp://mirror.example.com"),
            Err(NetError::DisallowedUrlScheme)
        );
    }

    #[test]
    fn test_base_urls_keep_order() {
        let set: MirrorSet = ["nl1.api.radio-browser.info", "de1.api.radio-browser.info"]
            .into_iter()
            .collect();
        let urls: Vec<String> = set.base_urls().iter().map(|u| u.to_string()).collect();
        assert_eq!(
            urls,
            [
                "https://de1.api.radio-browser.info",
                "https://nl1.api.radio-browser.info"
            ]
        );
    }
}
