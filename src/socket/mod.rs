//! Socket handling mirroring Chromium's `net/socket/`:
//! - [`client`]: plain TCP or TLS stream behind one type
//! - [`connectjob`]: DNS → TCP → TLS connection flow

pub mod client;
pub mod connectjob;
