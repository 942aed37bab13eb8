//! Client-level error taxonomy.

use crate::base::neterror::NetError;
use thiserror::Error;

/// Errors returned by the mirror resolver, the endpoint gateway and the
/// [`RadioBrowser`](crate::client::RadioBrowser) facade.
///
/// Network and DNS failures are carried unchanged in [`Error::Net`].
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// Discovery produced no mirror host names.
    #[error("No radio-browser mirror could be discovered")]
    NoHostFound,

    /// A request was issued before a mirror was selected.
    #[error("Client is not initialized, call init() first")]
    NotInitialized,

    /// The response format is neither json nor xml.
    #[error("Unsupported response format `{0}`, only json and xml are supported")]
    UnsupportedFormat(String),

    /// A parameter was given without the parameter it depends on.
    #[error("Required parameter missing: {0}")]
    RequiredMissing(&'static str),

    #[error(transparent)]
    Net(#[from] NetError),
}

impl Error {
    /// Returns the wrapped transport error, if any.
    pub fn as_net(&self) -> Option<&NetError> {
        match self {
            Error::Net(e) => Some(e),
            _ => None,
        }
    }
}
