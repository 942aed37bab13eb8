//! Long-lived HTTP session shared by every request of one client.

use crate::base::neterror::NetError;
use crate::dns::HostResolver;
use crate::http::response::HttpResponse;
use crate::http::streamfactory::HttpStreamFactory;
use crate::socket::connectjob::tls_connector;
use bytes::Bytes;
use http::header::HOST;
use http::{HeaderMap, HeaderValue, Method, Request};
use http_body_util::{BodyExt, Empty};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Pooled HTTP/1.1 session.
///
/// Cloning is cheap and clones share the same connection pool.
#[derive(Clone)]
pub struct Session {
    factory: Arc<HttpStreamFactory>,
    timeout: Option<Duration>,
}

impl Session {
    pub fn new(resolver: Arc<dyn HostResolver>) -> Result<Self, NetError> {
        Ok(Self::from_factory(HttpStreamFactory::new(resolver, tls_connector()?)))
    }

    pub fn from_factory(factory: HttpStreamFactory) -> Self {
        Self {
            factory: Arc::new(factory),
            timeout: None,
        }
    }

    /// Bounds every request, connection setup included.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends a GET request and reads the whole response.
    pub async fn get(&self, url: &Url, headers: HeaderMap) -> Result<HttpResponse, NetError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.execute(url, headers))
                .await
                .map_err(|_| NetError::ConnectionTimedOut)?,
            None => self.execute(url, headers).await,
        }
    }

    /// Number of idle pooled connections.
    pub fn idle_connections(&self) -> usize {
        self.factory.idle_count()
    }

    /// Releases every idle connection. In-flight requests are unaffected.
    pub fn close(&self) {
        self.factory.close_idle();
    }

    async fn execute(&self, url: &Url, headers: HeaderMap) -> Result<HttpResponse, NetError> {
        let req = build_request(url, headers)?;
        let mut stream = self.factory.request_stream(url).await?;

        tracing::debug!(url = %url, "sending request");
        let resp = stream.send_request(req).await?;
        let (parts, body) = resp.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|_| NetError::HttpBodyError)?
            .to_bytes();

        tracing::debug!(url = %url, status = parts.status.as_u16(), len = body.len(), "response received");
        self.factory.release(stream);

        Ok(HttpResponse::new(parts.status, parts.version, parts.headers, body))
    }
}

/// Builds an origin-form GET request for an HTTP/1.1 connection.
fn build_request(url: &Url, headers: HeaderMap) -> Result<Request<Empty<Bytes>>, NetError> {
    let target = match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    };
    let host = match url.port() {
        Some(port) => format!("{}:{}", url.host_str().ok_or(NetError::InvalidUrl)?, port),
        None => url.host_str().ok_or(NetError::InvalidUrl)?.to_string(),
    };

    let mut req = Request::builder()
        .method(Method::GET)
        .uri(target)
        .body(Empty::<Bytes>::new())
        .map_err(|_| NetError::InvalidUrl)?;

    let host = HeaderValue::from_str(&host).map_err(|_| NetError::InvalidUrl)?;
    req.headers_mut().insert(HOST, host);
    req.headers_mut().extend(headers);
    Ok(req)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::USER_AGENT;

    #[test]
    fn test_build_request_origin_form() {
        let url = Url::parse("https://de1.api.radio-browser.info/json/tags/?order=name").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("radiobrowser/dev"));

        let req = build_request(&url, headers).unwrap();
        assert_eq!(req.method(), Method::GET);
        assert_eq!(req.uri(), "/json/tags/?order=name");
        assert_eq!(req.headers()[HOST], "de1.api.radio-browser.info");
        assert_eq!(req.headers()[USER_AGENT], "radiobrowser/dev");
    }

    #[test]
    fn test_build_request_keeps_explicit_port() {
        let url = Url::parse("http://127.0.0.1:8080/xml/codecs/").unwrap();
        let req = build_request(&url, HeaderMap::new()).unwrap();
        assert_eq!(req.uri(), "/xml/codecs/");
        assert_eq!(req.headers()[HOST], "127.0.0.1:8080");
    }

    #[tokio::test]
    async fn test_keep_alive_connection_is_reused() {
        use crate::dns::HickoryResolver;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = accepted.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    while let Ok(n) = socket.read(&mut buf).await {
                        if n == 0 {
                            break;
                        }
                        let response = "HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n[]";
                        if socket.write_all(response.as_bytes()).await.is_err() {
                            break;
                        }
                    }
                });
            }
        });

        let session = Session::new(Arc::new(HickoryResolver::new())).unwrap();
        let url = Url::parse(&format!("http://{}/json/codecs/", addr)).unwrap();

        for _ in 0..3 {
            let resp = session.get(&url, HeaderMap::new()).await.unwrap();
            assert_eq!(resp.bytes().as_ref(), b"[]");
        }
        assert_eq!(accepted.load(Ordering::SeqCst), 1);
        assert_eq!(session.idle_connections(), 1);

        session.close();
        assert_eq!(session.idle_connections(), 0);
    }
}
