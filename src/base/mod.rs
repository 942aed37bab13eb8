//! Base types and error handling.
//!
//! - [`NetError`](neterror::NetError): transport and DNS error codes, modelled
//!   on Chromium's `net_error_list.h`
//! - [`Error`](error::Error): client-level errors (discovery, initialization,
//!   format and parameter validation)

pub mod error;
pub mod neterror;
