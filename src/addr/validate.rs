//! Address validation and family detection.

use crate::error::AddressError;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::net::IpAddr;

/// IP address family tag.
///
/// Serializes as the integer family number (4 or 6).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// The numeric family tag (4 or 6).
    pub fn number(&self) -> u8 {
        match self {
            IpVersion::V4 => 4,
            IpVersion::V6 => 6,
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl Serialize for IpVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_u8(self.number())
    }
}

impl<'de> Deserialize<'de> for IpVersion {
    fn deserialize<D>(deserializer: D) -> Result<IpVersion, D::Error>
    where
        D: Deserializer<'de>,
    {
        match u8::deserialize(deserializer)? {
            4 => Ok(IpVersion::V4),
            6 => Ok(IpVersion::V6),
            other => Err(de::Error::custom(format!(
                "invalid ip version: {} (expected 4 or 6)",
                other
            ))),
        }
    }
}

/// Determine whether `addr` is a valid numeric IPv4 or IPv6 address and
/// report which family.
///
/// Only literal numeric addresses are accepted; hostnames always fail.
/// No resolver state or network traffic is involved.
///
/// # Examples
/// ```
/// use ip_rib::addr::{ip_version, IpVersion};
/// assert_eq!(ip_version("192.168.1.1").unwrap(), IpVersion::V4);
/// assert_eq!(ip_version("2001:db8::1").unwrap(), IpVersion::V6);
/// assert!(ip_version("not-an-ip").is_err());
/// ```
pub fn ip_version(addr: &str) -> Result<IpVersion, AddressError> {
    match addr.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => Ok(IpVersion::V4),
        Ok(IpAddr::V6(_)) => Ok(IpVersion::V6),
        Err(_) => Err(AddressError::InvalidAddress(addr.to_string())),
    }
}

/// Convenience check for "is this any valid numeric IP address".
pub fn is_valid_ip(addr: &str) -> bool {
    ip_version(addr).is_ok()
}
