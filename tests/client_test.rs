//! Tests for the RadioBrowser facade.

use radiobrowser::dns::{Addrs, Name, Resolve, Resolving, ReverseResolve, Reversing};
use radiobrowser::query::{ListOptions, SearchQuery, StationsOptions};
use radiobrowser::{Error, NetError, RadioBrowser, ResponseFormat};

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Answers every lookup for one mirror and counts forward queries.
struct CountingResolver {
    forward_calls: AtomicUsize,
    mirror: Option<&'static str>,
}

impl CountingResolver {
    fn new(mirror: Option<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            forward_calls: AtomicUsize::new(0),
            mirror,
        })
    }

    fn forward_calls(&self) -> usize {
        self.forward_calls.load(Ordering::SeqCst)
    }
}

impl Resolve for CountingResolver {
    fn resolve(&self, _name: Name) -> Resolving {
        self.forward_calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), 0);
            Ok(Box::new(vec![addr].into_iter()) as Addrs)
        })
    }
}

impl ReverseResolve for CountingResolver {
    fn reverse(&self, addr: IpAddr) -> Reversing {
        let result = self
            .mirror
            .map(Name::new)
            .ok_or_else(|| NetError::address_not_reversed(addr, "NXDOMAIN"));
        Box::pin(async move { result })
    }
}

async fn spawn_server(body: &'static str) -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            if let Ok((mut socket, _)) = listener.accept().await {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let head = String::from_utf8_lossy(&buf[..n]).into_owned();
                    let line = head.lines().next().unwrap_or_default().to_string();
                    let _ = tx.send(line);

                    let response = format!(
                        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                });
            }
        }
    });

    (format!("http://{}", addr), rx)
}

async fn pinned_client(format: ResponseFormat) -> (RadioBrowser, mpsc::UnboundedReceiver<String>) {
    let body = match format {
        ResponseFormat::Json => "[]",
        ResponseFormat::Xml => "<result/>",
    };
    let (base_url, requests) = spawn_server(body).await;
    let client = RadioBrowser::builder()
        .format(format)
        .base_url(base_url)
        .build()
        .unwrap();
    client.init().await.unwrap();
    (client, requests)
}

#[tokio::test]
async fn test_operations_require_init() {
    let client = RadioBrowser::builder()
        .resolver(CountingResolver::new(Some("de1.test")))
        .build()
        .unwrap();
    let opts = ListOptions::default;

    assert_eq!(client.countries(None, opts()).await, Err(Error::NotInitialized));
    assert_eq!(client.country_codes(None, opts()).await, Err(Error::NotInitialized));
    assert_eq!(client.codecs(None, opts()).await, Err(Error::NotInitialized));
    assert_eq!(client.languages(None, opts()).await, Err(Error::NotInitialized));
    assert_eq!(client.tags(Some("jazz"), opts()).await, Err(Error::NotInitialized));
    assert_eq!(
        client.stations(StationsOptions::default()).await,
        Err(Error::NotInitialized)
    );
    assert_eq!(
        client.search(&SearchQuery::new().name("x")).await,
        Err(Error::NotInitialized)
    );
    assert_eq!(
        client.search_by_uuid(["a", "b"]).await,
        Err(Error::NotInitialized)
    );
    assert_eq!(client.vote_for_station("abc").await, Err(Error::NotInitialized));
}

#[tokio::test]
async fn test_states_checks_init_before_arguments() {
    let client = RadioBrowser::builder()
        .resolver(CountingResolver::new(Some("de1.test")))
        .build()
        .unwrap();

    let err = client
        .states(None, Some("Germany"), ListOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, Error::NotInitialized);
}

#[tokio::test]
async fn test_states_country_requires_search() {
    let (client, mut requests) = pinned_client(ResponseFormat::Json).await;

    for search in [None, Some("")] {
        let err = client
            .states(search, Some("Germany"), ListOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, Error::RequiredMissing("search"));
    }
    assert!(requests.try_recv().is_err());
}

#[tokio::test]
async fn test_list_paths() {
    let (client, mut requests) = pinned_client(ResponseFormat::Json).await;
    let opts = ListOptions::default;

    client.countries(Some("Germany"), opts()).await.unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /json/countries/Germany?order=name&reverse=false&hidebroken=false HTTP/1.1"
    );

    client.country_codes(None, opts()).await.unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /json/countrycodes/?order=name&reverse=false&hidebroken=false HTTP/1.1"
    );

    // Empty keyword is the same as none
    client.codecs(Some(""), opts()).await.unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /json/codecs/?order=name&reverse=false&hidebroken=false HTTP/1.1"
    );

    client
        .languages(None, opts().order("stationcount").reverse(true))
        .await
        .unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /json/languages/?order=stationcount&reverse=true&hidebroken=false HTTP/1.1"
    );

    client.tags(Some("jazz"), opts().hidebroken(true)).await.unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /json/tags/jazz?order=name&reverse=false&hidebroken=true HTTP/1.1"
    );
}

#[tokio::test]
async fn test_states_paths() {
    let (client, mut requests) = pinned_client(ResponseFormat::Json).await;
    let opts = ListOptions::default;

    client.states(Some("Berlin"), Some("Germany"), opts()).await.unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /json/states/Germany/Berlin?order=name&reverse=false&hidebroken=false&country=Germany HTTP/1.1"
    );

    client.states(Some("Berlin"), None, opts()).await.unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /json/states/Berlin?order=name&reverse=false&hidebroken=false HTTP/1.1"
    );

    client.states(None, None, opts()).await.unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /json/states/?order=name&reverse=false&hidebroken=false HTTP/1.1"
    );
}

#[tokio::test]
async fn test_states_empty_country_is_absent() {
    let (client, mut requests) = pinned_client(ResponseFormat::Json).await;
    let opts = ListOptions::default;

    client.states(Some("Berlin"), Some(""), opts()).await.unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /json/states/Berlin?order=name&reverse=false&hidebroken=false HTTP/1.1"
    );

    // No country filter, so no keyword is required
    client.states(None, Some(""), opts()).await.unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /json/states/?order=name&reverse=false&hidebroken=false HTTP/1.1"
    );
}

#[tokio::test]
async fn test_keyword_slash_stays_in_one_segment() {
    let (client, mut requests) = pinned_client(ResponseFormat::Json).await;

    client
        .tags(Some("drum/bass"), ListOptions::default())
        .await
        .unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /json/tags/drum%2Fbass?order=name&reverse=false&hidebroken=false HTTP/1.1"
    );

    client
        .states(Some("Baden/Württemberg"), Some("Germany"), ListOptions::default())
        .await
        .unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /json/states/Germany/Baden%2FW%C3%BCrttemberg?order=name&reverse=false&hidebroken=false&country=Germany HTTP/1.1"
    );
}

#[tokio::test]
async fn test_station_paths() {
    let (client, mut requests) = pinned_client(ResponseFormat::Json).await;

    client.stations(StationsOptions::default()).await.unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /json/stations/?order=name&reverse=false&offset=0&limit=100000 HTTP/1.1"
    );

    let query = SearchQuery::new().name("Radio Record").limit(2);
    client.search(&query).await.unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /json/stations/search?name=Radio+Record&limit=2 HTTP/1.1"
    );

    client.search_by_uuid(["a-1", "b-2"]).await.unwrap();
    assert_eq!(
        requests.recv().await.unwrap(),
        "GET /json/stations/byuuid?uuids=a-1%2Cb-2 HTTP/1.1"
    );

    client.vote_for_station("a-1").await.unwrap();
    assert_eq!(requests.recv().await.unwrap(), "GET /json/vote/a-1 HTTP/1.1");
}

#[tokio::test]
async fn test_xml_format_returns_text() {
    let (client, mut requests) = pinned_client(ResponseFormat::Xml).await;

    let resp = client.codecs(None, ListOptions::default()).await.unwrap();
    assert_eq!(resp.as_text(), Some("<result/>"));
    assert!(requests.recv().await.unwrap().starts_with("GET /xml/codecs/"));
}

#[tokio::test]
async fn test_concurrent_init_discovers_once() {
    let resolver = CountingResolver::new(Some("de1.test"));
    let client = RadioBrowser::builder()
        .resolver(resolver.clone())
        .build()
        .unwrap();

    let other = client.clone();
    let (a, b, c) = tokio::join!(client.init(), other.init(), client.init());
    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(resolver.forward_calls(), 1);

    // Later calls are no-ops
    client.init().await.unwrap();
    assert_eq!(resolver.forward_calls(), 1);
    assert_eq!(
        client.base_url().map(|u| u.as_str()),
        Some("https://de1.test")
    );
}

#[tokio::test]
async fn test_failed_init_can_be_retried() {
    let resolver = CountingResolver::new(None);
    let client = RadioBrowser::builder()
        .resolver(resolver.clone())
        .build()
        .unwrap();

    assert_eq!(client.init().await, Err(Error::NoHostFound));
    assert!(!client.is_initialized());

    assert_eq!(client.init().await, Err(Error::NoHostFound));
    assert_eq!(resolver.forward_calls(), 2);
}

#[tokio::test]
async fn test_discover_mirrors_does_not_change_selection() {
    let resolver = CountingResolver::new(Some("de1.test"));
    let client = RadioBrowser::builder()
        .resolver(resolver.clone())
        .build()
        .unwrap();

    let mirrors = client.discover_mirrors().await.unwrap();
    assert_eq!(mirrors.as_slice(), ["de1.test"]);
    assert!(!client.is_initialized());
}

#[test]
fn test_unsupported_format_at_build() {
    let err = RadioBrowser::builder().format_name("csv").build().unwrap_err();
    assert_eq!(err, Error::UnsupportedFormat("csv".to_string()));
}
