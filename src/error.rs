//! Error types shared across the crate.

use thiserror::Error;

/// Errors produced by the address utility functions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The input is not a numeric IPv4 or IPv6 address.
    #[error("invalid ip address: {0:?}")]
    InvalidAddress(String),
    /// The input does not have the shape of a dotted-decimal IPv4 address
    /// (exactly four octet tokens, each 0-255).
    #[error("malformed ipv4 address: {0:?}")]
    MalformedAddress(String),
    /// Prefix length outside the valid range for the address family.
    #[error("prefix length {0} is out of range")]
    InvalidPrefix(u8),
}

/// Errors produced by routing table operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RibError {
    /// A route for the same destination and netmask already exists.
    #[error("route already exists for {destination} netmask {netmask}")]
    DuplicateRoute {
        destination: String,
        netmask: String,
    },
    /// No route matched the given destination and netmask.
    #[error("no route for {destination} netmask {netmask}")]
    RouteNotFound {
        destination: String,
        netmask: String,
    },
    /// One of the supplied addresses was invalid or malformed.
    #[error(transparent)]
    Address(#[from] AddressError),
}
