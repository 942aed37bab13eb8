//! Radio-browser client with builder pattern.
//!
//! Discovers a mirror once and routes every domain operation through it.
//!
//! # Example
//!
//! ```rust,ignore
//! use radiobrowser::{RadioBrowser, ResponseFormat};
//! use radiobrowser::query::ListOptions;
//!
//! let client = RadioBrowser::builder()
//!     .format(ResponseFormat::Json)
//!     .build()?;
//!
//! client.init().await?;
//! let tags = client.tags(Some("jazz"), ListOptions::default()).await?;
//! ```

use crate::base::error::Error;
use crate::dns::{HickoryResolver, HostResolver, Name};
use crate::gateway::{
    ApiResponse, EndpointGateway, QueryParameters, ResponseFormat, DEFAULT_USER_AGENT,
};
use crate::http::streamfactory::{HttpStreamFactory, DEFAULT_MAX_IDLE_PER_GROUP};
use crate::http::Session;
use crate::mirror::{BaseUrl, MirrorResolver, MirrorSet};
use crate::query::{ListOptions, SearchQuery, StationsOptions};
use crate::socket::connectjob::tls_connector;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Client for the radio-browser API.
///
/// Use [`RadioBrowser::builder()`] to configure and create a client, then
/// call [`init`](Self::init) before any query. Clones share the selected
/// mirror and the connection pool.
#[derive(Clone)]
pub struct RadioBrowser {
    mirrors: MirrorResolver,
    session: Session,
    format: ResponseFormat,
    user_agent: Arc<str>,
    pinned: Option<BaseUrl>,
    gateway: Arc<OnceCell<EndpointGateway>>,
}

impl RadioBrowser {
    /// Create a new client with default settings.
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Selects the mirror used for the lifetime of this client.
    ///
    /// Only the first successful call does any work; concurrent callers wait
    /// for it. A failed call leaves the client uninitialized.
    pub async fn init(&self) -> Result<(), Error> {
        self.gateway
            .get_or_try_init(|| async {
                let base_url = match &self.pinned {
                    Some(url) => url.clone(),
                    None => self.mirrors.pick_base_url().await?,
                };
                tracing::info!(base_url = %base_url, format = %self.format, "client initialized");
                EndpointGateway::new(
                    base_url,
                    self.format,
                    self.session.clone(),
                    &self.user_agent,
                )
            })
            .await?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.gateway.initialized()
    }

    /// The selected mirror, once initialized.
    pub fn base_url(&self) -> Option<&BaseUrl> {
        self.gateway.get().map(EndpointGateway::base_url)
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    /// Runs a fresh discovery pass. Does not change the selected mirror.
    pub async fn discover_mirrors(&self) -> Result<MirrorSet, Error> {
        Ok(self.mirrors.discover_mirrors().await?)
    }

    /// Drops idle pooled connections.
    pub fn close(&self) {
        self.session.close();
    }

    /// Countries with their station counts.
    pub async fn countries(
        &self,
        search: Option<&str>,
        opts: ListOptions,
    ) -> Result<ApiResponse, Error> {
        self.list("countries", search, opts).await
    }

    /// ISO 3166-1 country codes with their station counts.
    pub async fn country_codes(
        &self,
        search: Option<&str>,
        opts: ListOptions,
    ) -> Result<ApiResponse, Error> {
        self.list("countrycodes", search, opts).await
    }

    pub async fn codecs(
        &self,
        search: Option<&str>,
        opts: ListOptions,
    ) -> Result<ApiResponse, Error> {
        self.list("codecs", search, opts).await
    }

    pub async fn languages(
        &self,
        search: Option<&str>,
        opts: ListOptions,
    ) -> Result<ApiResponse, Error> {
        self.list("languages", search, opts).await
    }

    pub async fn tags(&self, search: Option<&str>, opts: ListOptions) -> Result<ApiResponse, Error> {
        self.list("tags", search, opts).await
    }

    /// States, optionally restricted to one country.
    ///
    /// Filtering by `country` requires a search keyword. Empty strings
    /// count as absent for both.
    pub async fn states(
        &self,
        search: Option<&str>,
        country: Option<&str>,
        opts: ListOptions,
    ) -> Result<ApiResponse, Error> {
        let gateway = self.gateway()?;
        let search = non_empty(search);
        let country = non_empty(country);

        let segments = match (country, search) {
            (Some(_), None) => return Err(Error::RequiredMissing("search")),
            (Some(country), Some(search)) => vec!["states", country, search],
            (None, Some(search)) => vec!["states", search],
            (None, None) => vec!["states", ""],
        };

        let mut params = opts.to_params();
        params.insert_opt("country", country);
        gateway.issue_request_at(&segments, &params).await
    }

    /// Every station, paged.
    pub async fn stations(&self, opts: StationsOptions) -> Result<ApiResponse, Error> {
        self.gateway()?
            .issue_request("stations/", &opts.to_params())
            .await
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<ApiResponse, Error> {
        self.gateway()?
            .issue_request("stations/search", query.params())
            .await
    }

    /// Stations with the given UUIDs.
    pub async fn search_by_uuid<I, S>(&self, uuids: I) -> Result<ApiResponse, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let gateway = self.gateway()?;
        let uuids: Vec<S> = uuids.into_iter().collect();
        let joined = uuids
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<&str>>()
            .join(",");

        let params = QueryParameters::new().with("uuids", joined);
        gateway.issue_request("stations/byuuid", &params).await
    }

    /// Votes for a station. The server accepts one vote per client address
    /// and station every ten minutes.
    pub async fn vote_for_station(&self, uuid: &str) -> Result<ApiResponse, Error> {
        self.gateway()?
            .issue_request_at(&["vote", uuid], &QueryParameters::new())
            .await
    }

    async fn list(
        &self,
        kind: &str,
        search: Option<&str>,
        opts: ListOptions,
    ) -> Result<ApiResponse, Error> {
        let gateway = self.gateway()?;
        // An empty last segment keeps the trailing slash
        let search = non_empty(search).unwrap_or("");
        gateway
            .issue_request_at(&[kind, search], &opts.to_params())
            .await
    }

    fn gateway(&self) -> Result<&EndpointGateway, Error> {
        self.gateway.get().ok_or(Error::NotInitialized)
    }
}

impl std::fmt::Debug for RadioBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadioBrowser")
            .field("mirrors", &self.mirrors)
            .field("format", &self.format)
            .field("base_url", &self.base_url())
            .finish_non_exhaustive()
    }
}

fn non_empty(search: Option<&str>) -> Option<&str> {
    search.filter(|s| !s.is_empty())
}

/// Builder for creating a [`RadioBrowser`].
#[derive(Default)]
pub struct ClientBuilder {
    format: Option<ResponseFormat>,
    format_name: Option<String>,
    resolver: Option<Arc<dyn HostResolver>>,
    discovery_host: Option<Name>,
    base_url: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    max_idle_per_host: Option<usize>,
}

impl ClientBuilder {
    /// Set the response format.
    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = Some(format);
        self.format_name = None;
        self
    }

    /// Set the response format by name ("json" or "xml").
    ///
    /// Unknown names fail at [`build`](Self::build).
    pub fn format_name(mut self, name: impl Into<String>) -> Self {
        self.format_name = Some(name.into());
        self.format = None;
        self
    }

    /// Set the resolver used for mirror discovery and connections.
    pub fn resolver(mut self, resolver: Arc<dyn HostResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Set the host whose addresses identify the mirrors.
    pub fn discovery_host(mut self, host: impl Into<Name>) -> Self {
        self.discovery_host = Some(host.into());
        self
    }

    /// Skip discovery and always use this origin.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the user agent sent with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set how many idle connections are kept per mirror.
    pub fn max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = Some(max);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<RadioBrowser, Error> {
        let format = match (self.format, self.format_name) {
            (Some(format), _) => format,
            (None, Some(name)) => name.parse()?,
            (None, None) => ResponseFormat::default(),
        };

        let pinned = self.base_url.as_deref().map(BaseUrl::parse).transpose()?;

        let resolver = self
            .resolver
            .unwrap_or_else(|| Arc::new(HickoryResolver::new()));

        let mut mirrors = MirrorResolver::new(resolver.clone());
        if let Some(host) = self.discovery_host {
            mirrors = mirrors.with_discovery_host(host);
        }

        let factory = HttpStreamFactory::new(resolver, tls_connector()?).with_max_idle_per_group(
            self.max_idle_per_host.unwrap_or(DEFAULT_MAX_IDLE_PER_GROUP),
        );
        let session = Session::from_factory(factory).with_timeout(self.timeout);

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(RadioBrowser {
            mirrors,
            session,
            format,
            user_agent: user_agent.into(),
            pinned,
            gateway: Arc::new(OnceCell::new()),
        })
    }
}
