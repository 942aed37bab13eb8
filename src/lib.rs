//! # radiobrowser
//!
//! An async client for the community radio-browser API.
//!
//! The API is served by a set of mirrors. `radiobrowser` finds them through
//! DNS: every address of `all.api.radio-browser.info` is reverse-resolved
//! to a mirror host name, and one mirror is picked at random for the
//! lifetime of the client.
//!
//! ## Features
//!
//! - **Mirror Discovery**: concurrent PTR lookups through hickory-resolver
//! - **Connection Pooling**: HTTP/1.1 keep-alive per mirror over BoringSSL
//! - **Formats**: JSON (decoded) or XML (raw text)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use radiobrowser::{RadioBrowser, query::SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), radiobrowser::Error> {
//!     let client = RadioBrowser::new()?;
//!     client.init().await?;
//!     println!("Mirror: {}", client.base_url().unwrap());
//!
//!     let stations = client
//!         .search(&SearchQuery::new().name("Radio Record").limit(2))
//!         .await?;
//!     println!("{:?}", stations);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`dns`] - Forward and reverse resolution
//! - [`mirror`] - Mirror discovery and selection
//! - [`gateway`] - Endpoint URL composition and response decoding
//! - [`http`] - Pooled HTTP/1.1 session
//! - [`socket`] - TCP and TLS connection setup
//! - [`client`] - The [`RadioBrowser`] facade
//! - [`query`] - Options for list, station and search queries

pub mod base;
pub mod client;
pub mod dns;
pub mod gateway;
pub mod http;
pub mod mirror;
pub mod query;
pub mod socket;

pub use base::error::Error;
pub use base::neterror::NetError;
pub use client::{ClientBuilder, RadioBrowser};
pub use gateway::{ApiResponse, ResponseFormat};
pub use mirror::{BaseUrl, MirrorSet};
