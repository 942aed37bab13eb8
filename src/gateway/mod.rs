//! Endpoint gateway: composes request URLs against the selected mirror,
//! sends them through the shared session and decodes the responses.

mod endpoint;
mod format;
mod params;

pub use endpoint::{ApiResponse, EndpointGateway, DEFAULT_USER_AGENT};
pub use format::ResponseFormat;
pub use params::{ParamValue, QueryParameters};
