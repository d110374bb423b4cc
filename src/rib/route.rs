//! Routing table entry model.

use crate::addr::{netmask_to_prefix, IpVersion};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single routing table entry.
///
/// All address fields are stored in canonical form (minimal decimal for
/// IPv4, fully expanded colon-hex for IPv6). For IPv6 routes the `netmask`
/// field holds the decimal prefix length (0-128) instead of a mask address.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Destination network address.
    pub destination: String,
    /// Dotted-decimal netmask (IPv4) or decimal prefix length (IPv6).
    pub netmask: String,
    /// Next-hop gateway address, same family as the destination.
    pub gateway: String,
    /// Outgoing interface name.
    pub iface: String,
    /// Route metric; lower is preferred by convention, unused by lookup.
    pub metric: u32,
    /// Address family of the route.
    pub version: IpVersion,
}

impl Route {
    /// Prefix length of this route's destination network.
    pub fn prefix(&self) -> u8 {
        match self.version {
            IpVersion::V4 => netmask_to_prefix(&self.netmask),
            IpVersion::V6 => self.netmask.parse::<u8>().unwrap_or(0),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} via {} dev {} metric {}",
            self.destination, self.netmask, self.gateway, self.iface, self.metric
        )
    }
}
