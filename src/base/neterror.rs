use std::net::IpAddr;
use thiserror::Error;

/// Transport and resolver failures.
///
/// Codes follow Chromium's `net_error_list.h` where an equivalent exists;
/// library-specific errors use the `-900` range.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    // Connection Errors
    #[error("Connection closed (TCP FIN)")]
    ConnectionClosed,
    #[error("Connection reset (TCP RST)")]
    ConnectionReset,
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection aborted")]
    ConnectionAborted,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Name not resolved: {domain}: {reason}")]
    NameNotResolvedFor { domain: String, reason: String },
    #[error("Internet disconnected")]
    InternetDisconnected,
    #[error("SSL protocol error")]
    SslProtocolError,
    #[error("Address invalid")]
    AddressInvalid,
    #[error("Address unreachable")]
    AddressUnreachable,
    #[error("Connection timed out")]
    ConnectionTimedOut,
    #[error("Name resolution failed")]
    NameResolutionFailed,

    // HTTP Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Disallowed URL scheme")]
    DisallowedUrlScheme,
    #[error("Invalid response")]
    InvalidResponse,
    #[error("Empty response")]
    EmptyResponse,
    #[error("Invalid HTTP response")]
    InvalidHttpResponse,

    // Library specific
    #[error("Reverse lookup failed for {addr}: {reason}")]
    AddressNotReversed { addr: IpAddr, reason: String },
    #[error("HTTP status {code}")]
    HttpStatus { code: u16 },
    #[error("Failed to read response body")]
    HttpBodyError,
    #[error("Response body is not valid UTF-8")]
    InvalidUtf8,
    #[error("Response body is not valid JSON")]
    JsonParseError,
    #[error("Invalid header value")]
    InvalidHeaderValue,

    #[error("Unknown error: {0}")]
    Unknown(i32),
}

impl NetError {
    /// Forward resolution failure for `domain`.
    pub fn name_not_resolved(domain: impl Into<String>, reason: impl ToString) -> Self {
        NetError::NameNotResolvedFor {
            domain: domain.into(),
            reason: reason.to_string(),
        }
    }

    /// Reverse (PTR) resolution failure for `addr`.
    pub fn address_not_reversed(addr: IpAddr, reason: impl ToString) -> Self {
        NetError::AddressNotReversed {
            addr,
            reason: reason.to_string(),
        }
    }

    /// Returns true for failures of a DNS lookup, forward or reverse.
    pub fn is_dns_error(&self) -> bool {
        matches!(
            self,
            NetError::NameNotResolved
                | NetError::NameNotResolvedFor { .. }
                | NetError::NameResolutionFailed
                | NetError::AddressNotReversed { .. }
        )
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::ConnectionClosed => -100,
            NetError::ConnectionReset => -101,
            NetError::ConnectionRefused => -102,
            NetError::ConnectionAborted => -103,
            NetError::ConnectionFailed => -104,
            NetError::NameNotResolved => -105,
            NetError::NameNotResolvedFor { .. } => -105,
            NetError::InternetDisconnected => -106,
            NetError::SslProtocolError => -107,
            NetError::AddressInvalid => -108,
            NetError::AddressUnreachable => -109,
            NetError::ConnectionTimedOut => -118,
            NetError::NameResolutionFailed => -137,

            NetError::InvalidUrl => -300,
            NetError::DisallowedUrlScheme => -301,
            NetError::InvalidResponse => -320,
            NetError::EmptyResponse => -324,
            NetError::InvalidHttpResponse => -370,

            NetError::AddressNotReversed { .. } => -910,
            NetError::HttpStatus { .. } => -911,
            NetError::HttpBodyError => -912,
            NetError::InvalidUtf8 => -913,
            NetError::JsonParseError => -914,
            NetError::InvalidHeaderValue => -915,
            NetError::Unknown(code) => *code,
        }
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -100 => NetError::ConnectionClosed,
            -101 => NetError::ConnectionReset,
            -102 => NetError::ConnectionRefused,
            -103 => NetError::ConnectionAborted,
            -104 => NetError::ConnectionFailed,
            -105 => NetError::NameNotResolved,
            -106 => NetError::InternetDisconnected,
            -107 => NetError::SslProtocolError,
            -108 => NetError::AddressInvalid,
            -109 => NetError::AddressUnreachable,
            -118 => NetError::ConnectionTimedOut,
            -137 => NetError::NameResolutionFailed,

            -300 => NetError::InvalidUrl,
            -301 => NetError::DisallowedUrlScheme,
            -320 => NetError::InvalidResponse,
            -324 => NetError::EmptyResponse,
            -370 => NetError::InvalidHttpResponse,

            -912 => NetError::HttpBodyError,
            -913 => NetError::InvalidUtf8,
            -914 => NetError::JsonParseError,
            -915 => NetError::InvalidHeaderValue,
            _ => NetError::Unknown(code),
        }
    }
}

impl From<std::io::Error> for NetError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::ConnectionRefused => NetError::ConnectionRefused,
            ErrorKind::ConnectionReset => NetError::ConnectionReset,
            ErrorKind::ConnectionAborted => NetError::ConnectionAborted,
            ErrorKind::TimedOut => NetError::ConnectionTimedOut,
            ErrorKind::AddrNotAvailable => NetError::AddressInvalid,
            ErrorKind::UnexpectedEof => NetError::ConnectionClosed,
            _ => NetError::ConnectionFailed,
        }
    }
}
