//! HTTP Response with a fully buffered body.

use crate::base::neterror::NetError;
use bytes::Bytes;
use http::{HeaderMap, StatusCode, Version};

/// HTTP Response whose body has been read to the end.
///
/// Reading the whole body up front lets the connection go back to the
/// pool before the caller decodes anything.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
}

impl HttpResponse {
    pub fn new(status: StatusCode, version: Version, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            version,
            headers,
            body,
        }
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the HTTP version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Get a reference to the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Fails with [`NetError::HttpStatus`] unless the status is 2xx.
    pub fn error_for_status(self) -> Result<Self, NetError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(NetError::HttpStatus {
                code: self.status.as_u16(),
            })
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Body as UTF-8 text.
    pub fn text(self) -> Result<String, NetError> {
        String::from_utf8(self.body.to_vec()).map_err(|_| NetError::InvalidUtf8)
    }

    /// Body deserialized as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, NetError> {
        serde_json::from_slice(&self.body).map_err(|_| NetError::JsonParseError)
    }
}
