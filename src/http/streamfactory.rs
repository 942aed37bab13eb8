use crate::base::neterror::NetError;
use crate::dns::HostResolver;
use crate::socket::connectjob::ConnectJob;
use boring::ssl::SslConnector;
use bytes::Bytes;
use dashmap::DashMap;
use http::{Request, Response};
use http_body_util::Empty;
use hyper::body::Incoming;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use url::Url;

/// Default number of idle keep-alive connections kept per origin.
pub const DEFAULT_MAX_IDLE_PER_GROUP: usize = 6;

/// Identifies a connection group (scheme, host, port).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupId {
    scheme: String,
    host: String,
    port: u16,
}

impl GroupId {
    pub fn from_url(url: &Url) -> Option<Self> {
        Some(GroupId {
            scheme: url.scheme().to_string(),
            host: url.host_str()?.to_string(),
            port: url.port_or_known_default()?,
        })
    }
}

/// Wraps one HTTP/1.1 client connection.
/// Equivalent to net::HttpStream.
pub struct HttpStream {
    group: GroupId,
    sender: http1::SendRequest<Empty<Bytes>>,
}

impl HttpStream {
    pub async fn send_request(
        &mut self,
        req: Request<Empty<Bytes>>,
    ) -> Result<Response<Incoming>, NetError> {
        self.sender.send_request(req).await.map_err(|e| {
            tracing::debug!(error = %e, "request failed on connection");
            if e.is_timeout() {
                NetError::ConnectionTimedOut
            } else if e.is_parse() {
                NetError::InvalidHttpResponse
            } else {
                NetError::ConnectionClosed
            }
        })
    }

    pub fn group(&self) -> &GroupId {
        &self.group
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Waits until the connection can take another request.
    async fn ready(&mut self) -> bool {
        self.sender.ready().await.is_ok()
    }
}

/// Hands out HTTP streams, reusing idle keep-alive connections per origin.
pub struct HttpStreamFactory {
    resolver: Arc<dyn HostResolver>,
    tls: SslConnector,
    idle: DashMap<GroupId, Vec<HttpStream>>,
    max_idle_per_group: usize,
}

impl HttpStreamFactory {
    pub fn new(resolver: Arc<dyn HostResolver>, tls: SslConnector) -> Self {
        Self {
            resolver,
            tls,
            idle: DashMap::new(),
            max_idle_per_group: DEFAULT_MAX_IDLE_PER_GROUP,
        }
    }

    pub fn with_max_idle_per_group(mut self, max: usize) -> Self {
        self.max_idle_per_group = max;
        self
    }

    pub async fn request_stream(&self, url: &Url) -> Result<HttpStream, NetError> {
        let group = GroupId::from_url(url).ok_or(NetError::InvalidUrl)?;

        // 1. Reuse an idle connection if one is still usable
        while let Some(mut stream) = self.take_idle(&group) {
            if stream.ready().await {
                tracing::debug!(host = %group.host, "reusing idle connection");
                return Ok(stream);
            }
        }

        // 2. Connect
        let socket = ConnectJob::connect(url, self.resolver.as_ref(), &self.tls).await?;
        if socket.alpn_protocol().is_some_and(|proto| proto != b"http/1.1") {
            return Err(NetError::SslProtocolError);
        }
        tracing::debug!(
            host = %group.host,
            peer = ?socket.peer_addr().ok(),
            tls = socket.is_ssl(),
            "new connection"
        );

        // 3. Handshake (HTTP/1.1 only)
        let io = TokioIo::new(socket);
        let (sender, conn) = http1::handshake(io).await.map_err(|e| {
            tracing::debug!(error = %e, "http1 handshake failed");
            NetError::ConnectionFailed
        })?;

        // 4. Spawn the connection driver
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "connection closed with error");
            }
        });

        Ok(HttpStream { group, sender })
    }

    /// Returns a stream whose response has been fully read.
    pub fn release(&self, stream: HttpStream) {
        if stream.is_closed() {
            return;
        }
        let mut idle = self.idle.entry(stream.group.clone()).or_default();
        if idle.len() < self.max_idle_per_group {
            idle.push(stream);
        }
    }

    /// Number of idle connections across all origins.
    pub fn idle_count(&self) -> usize {
        self.idle.iter().map(|group| group.len()).sum()
    }

    /// Drops every idle connection.
    pub fn close_idle(&self) {
        self.idle.clear();
    }

    fn take_idle(&self, group: &GroupId) -> Option<HttpStream> {
        self.idle.get_mut(group)?.pop()
    }
}
