//! Mirror discovery.
//!
//! - [`MirrorResolver`]: forward lookup of the discovery host, concurrent
//!   reverse lookups, random selection
//! - [`MirrorSet`]: sorted, duplicate-free host names of one pass
//! - [`BaseUrl`]: origin of the selected mirror

mod resolver;

pub use resolver::{BaseUrl, MirrorResolver, MirrorSet, DISCOVERY_HOST};
