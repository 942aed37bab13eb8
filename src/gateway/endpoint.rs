use crate::base::error::Error;
use crate::base::neterror::NetError;
use crate::gateway::format::ResponseFormat;
use crate::gateway::params::QueryParameters;
use crate::http::Session;
use crate::mirror::BaseUrl;
use http::header::{CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderValue};
use url::Url;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "radiobrowser/dev";

/// A decoded endpoint response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Parsed JSON: an array of objects for list endpoints, an object otherwise.
    Json(serde_json::Value),
    /// The XML body exactly as received.
    Xml(String),
}

impl ApiResponse {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::Xml(_) => None,
        }
    }

    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::Xml(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ApiResponse::Xml(text) => Some(text),
            ApiResponse::Json(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            ApiResponse::Xml(text) => Some(text),
            ApiResponse::Json(_) => None,
        }
    }

    /// Deserializes a JSON response into `T`.
    ///
    /// XML responses fail with [`NetError::JsonParseError`].
    #[cfg(feature = "json")]
    pub fn deserialize<T: serde::de::DeserializeOwned>(self) -> Result<T, NetError> {
        match self {
            ApiResponse::Json(value) => {
                serde_json::from_value(value).map_err(|_| NetError::JsonParseError)
            }
            ApiResponse::Xml(_) => Err(NetError::JsonParseError),
        }
    }
}

/// Issues requests against one selected mirror.
///
/// Holds the mirror origin, the response format and the HTTP session for
/// the lifetime of the client.
#[derive(Clone)]
pub struct EndpointGateway {
    base_url: BaseUrl,
    format: ResponseFormat,
    session: Session,
    headers: HeaderMap,
}

impl EndpointGateway {
    pub fn new(
        base_url: BaseUrl,
        format: ResponseFormat,
        session: Session,
        user_agent: &str,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(format.content_type()));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).map_err(|_| NetError::InvalidHeaderValue)?,
        );

        Ok(Self {
            base_url,
            format,
            session,
            headers,
        })
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Composes `{base}/{format}/{endpoint}?{params}`.
    ///
    /// Every `/`-separated segment of `endpoint` is percent-encoded; an
    /// empty trailing segment keeps the trailing slash.
    pub fn request_url(&self, endpoint: &str, params: &QueryParameters) -> Result<Url, Error> {
        let segments: Vec<&str> = endpoint.split('/').collect();
        self.request_url_at(&segments, params)
    }

    /// Like [`request_url`](Self::request_url) with the path given as
    /// segments. A `/` inside a segment is encoded as `%2F`.
    pub fn request_url_at(&self, segments: &[&str], params: &QueryParameters) -> Result<Url, Error> {
        let mut url = self.base_url.to_url()?;
        {
            let mut path = url.path_segments_mut().map_err(|_| NetError::InvalidUrl)?;
            path.pop_if_empty();
            path.push(self.format.as_str());
            path.extend(segments);
        }
        params.append_to(&mut url);
        Ok(url)
    }

    /// Sends a GET for `endpoint` and decodes the body per the response format.
    ///
    /// Transport failures and non-2xx statuses are returned as [`Error::Net`];
    /// nothing is retried.
    pub async fn issue_request(
        &self,
        endpoint: &str,
        params: &QueryParameters,
    ) -> Result<ApiResponse, Error> {
        let url = self.request_url(endpoint, params)?;
        self.send(url).await
    }

    /// Sends a GET for the path `segments`, keeping each one a single segment.
    pub async fn issue_request_at(
        &self,
        segments: &[&str],
        params: &QueryParameters,
    ) -> Result<ApiResponse, Error> {
        let url = self.request_url_at(segments, params)?;
        self.send(url).await
    }

    async fn send(&self, url: Url) -> Result<ApiResponse, Error> {
        tracing::debug!(url = %url, format = %self.format, "issuing request");

        let resp = self
            .session
            .get(&url, self.headers.clone())
            .await?
            .error_for_status()?;

        let decoded = match self.format {
            ResponseFormat::Json => ApiResponse::Json(resp.json()?),
            ResponseFormat::Xml => ApiResponse::Xml(resp.text()?),
        };
        Ok(decoded)
    }
}

impl std::fmt::Debug for EndpointGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointGateway")
            .field("base_url", &self.base_url)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}
