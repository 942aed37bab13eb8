use crate::base::neterror::NetError;
use crate::dns::{HostResolver, Name};
use crate::socket::client::SocketType;
use boring::ssl::{SslConnector, SslMethod, SslVerifyMode};
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpStream;
use url::{Host, Url};

/// Builds the TLS connector shared by every connection of a session.
///
/// Peer verification is on and ALPN only offers `http/1.1`, the protocol
/// the stream factory speaks.
pub fn tls_connector() -> Result<SslConnector, NetError> {
    let mut builder =
        SslConnector::builder(SslMethod::tls()).map_err(|_| NetError::SslProtocolError)?;
    builder
        .set_alpn_protos(b"\x08http/1.1")
        .map_err(|_| NetError::SslProtocolError)?;
    builder.set_verify(SslVerifyMode::PEER);
    Ok(builder.build())
}

/// Manages the connection process: DNS -> TCP -> SSL.
/// Roughly equivalent to net::ConnectJob.
pub struct ConnectJob;

impl ConnectJob {
    pub async fn connect(
        url: &Url,
        resolver: &dyn HostResolver,
        tls: &SslConnector,
    ) -> Result<SocketType, NetError> {
        let use_tls = match url.scheme() {
            "https" => true,
            "http" => false,
            _ => return Err(NetError::DisallowedUrlScheme),
        };
        let host = url.host().ok_or(NetError::InvalidUrl)?;
        let port = url.port_or_known_default().ok_or(NetError::InvalidUrl)?;

        // 1. DNS Resolution (IP literals skip the resolver)
        let (addrs, peer, is_domain): (Vec<SocketAddr>, String, bool) = match host {
            Host::Ipv4(ip) => (vec![SocketAddr::new(IpAddr::V4(ip), port)], ip.to_string(), false),
            Host::Ipv6(ip) => (vec![SocketAddr::new(IpAddr::V6(ip), port)], ip.to_string(), false),
            Host::Domain(domain) => {
                let addrs = resolver
                    .resolve(Name::new(domain))
                    .await?
                    .map(|addr| SocketAddr::new(addr.ip(), port))
                    .collect();
                (addrs, domain.to_string(), true)
            }
        };

        // 2. TCP Connect, first address that answers wins
        let mut last_error = NetError::NameNotResolved;
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect(addr).await {
                Ok(s) => {
                    tracing::debug!(%addr, "tcp connected");
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    tracing::debug!(%addr, error = %e, "tcp connect failed");
                    last_error = NetError::from(e);
                }
            }
        }
        let stream = stream.ok_or(last_error)?;

        if !use_tls {
            return Ok(SocketType::Tcp(stream));
        }

        // 3. SSL Handshake
        let mut config = tls.configure().map_err(|_| NetError::SslProtocolError)?;
        // Per RFC 6066, SNI MUST NOT be set for raw IP addresses.
        config.set_use_server_name_indication(is_domain);
        let tls_stream = tokio_boring::connect(config, &peer, stream).await.map_err(|e| {
            tracing::debug!(host = %peer, error = ?e, "SSL handshake failed");
            NetError::SslProtocolError
        })?;
        Ok(SocketType::Ssl(tls_stream))
    }
}
