//! DNS Resolution Module
//!
//! Provides pluggable forward and reverse DNS resolution:
//! - Async hickory-dns resolver (system configuration, PTR lookups)
//! - Hostname and address override mechanism
//!
//! # Architecture
//!
//! The `Resolve` trait turns a name into addresses and the `ReverseResolve`
//! trait turns an address back into its canonical name. Mirror discovery
//! needs both, expressed by the `HostResolver` supertrait, so any type that
//! implements the pair can be plugged into the client.
//!
//! # Example
//!
//! ```rust,ignore
//! use radiobrowser::dns::{Name, Resolve, HickoryResolver};
//!
//! let resolver = HickoryResolver::new();
//! let addrs = resolver.resolve(Name::new("all.api.radio-browser.info")).await?;
//! for addr in addrs {
//!     println!("Resolved: {}", addr);
//! }
//! ```

mod hickory;
mod resolve;

pub use hickory::HickoryResolver;
pub use resolve::{
    Addrs, DnsResolverWithOverrides, HostResolver, Name, Resolve, Resolving, ReverseResolve,
    Reversing,
};
