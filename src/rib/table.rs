//! Routing Information Base: an in-memory routing table over [`Route`]
//! entries, with exact-match queries and longest-prefix destination lookup.

use crate::addr::{
    format_ipv4, format_ipv6, ip_version, ipv4_network_address, ipv6_network_address,
    netmask_to_prefix, IpVersion, MAX_PREFIX_V6,
};
use crate::error::{AddressError, RibError};
use crate::rib::Route;
use itertools::Itertools;
use std::cmp::Reverse;

/// Netmask argument matching any mask in [`Rib::delete`] and [`Rib::find`].
pub const ANY_NETMASK: &str = "*";

/// In-memory routing table.
///
/// Every stored address is canonicalized on insert, so queries can compare
/// canonical strings directly regardless of how the caller formatted the
/// input.
#[derive(Debug, Default, Clone)]
pub struct Rib {
    routes: Vec<Route>,
}

/// Parse an IPv6 prefix length given in decimal.
fn parse_prefix(netmask: &str) -> Result<u8, AddressError> {
    let prefix = netmask
        .parse::<u8>()
        .map_err(|_| AddressError::InvalidAddress(netmask.to_string()))?;
    if prefix > MAX_PREFIX_V6 {
        return Err(AddressError::InvalidPrefix(prefix));
    }
    Ok(prefix)
}

/// Canonical netmask for a given family: dotted-decimal address for IPv4,
/// decimal prefix length for IPv6.
fn canonical_netmask(netmask: &str, version: IpVersion) -> Result<String, AddressError> {
    match version {
        IpVersion::V4 => format_ipv4(netmask),
        IpVersion::V6 => Ok(parse_prefix(netmask)?.to_string()),
    }
}

/// Canonical form of a host/network address for a given family.
fn canonical_address(addr: &str, version: IpVersion) -> Result<String, AddressError> {
    match version {
        IpVersion::V4 => format_ipv4(addr),
        IpVersion::V6 => format_ipv6(addr),
    }
}

impl Rib {
    /// Create a new empty routing table.
    pub fn new() -> Rib {
        Rib { routes: Vec::new() }
    }

    /// Number of routes in the table.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table holds no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// All routes, in insertion order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Routes sorted for display: IPv4 before IPv6, most specific prefix
    /// first, then by destination.
    pub fn routes_sorted(&self) -> Vec<&Route> {
        self.routes
            .iter()
            .sorted_by_key(|r| (r.version.number(), Reverse(r.prefix()), r.destination.clone()))
            .collect()
    }

    /// Add a new route.
    ///
    /// `destination` may be any address inside the destination network; it
    /// is converted to the network address before being stored. For IPv4
    /// routes `netmask` is a dotted-decimal mask, for IPv6 routes a decimal
    /// prefix length. The gateway must be a valid address of the same
    /// family as the destination.
    ///
    /// # Arguments
    /// * `destination` - destination address or network
    /// * `netmask` - netmask (IPv4) or prefix length (IPv6)
    /// * `gateway` - next-hop address
    /// * `iface` - outgoing interface name
    /// * `metric` - route metric
    ///
    /// # Returns
    /// * `Err(RibError::DuplicateRoute)` if a route for the same
    ///   destination network and netmask already exists
    pub fn add(
        &mut self,
        destination: &str,
        netmask: &str,
        gateway: &str,
        iface: &str,
        metric: u32,
    ) -> Result<(), RibError> {
        let version = ip_version(destination)?;
        let gateway_version = ip_version(gateway)?;
        if gateway_version != version {
            log::warn!(
                "gateway {} family {} does not match destination {} family {}",
                gateway,
                gateway_version,
                destination,
                version
            );
            return Err(AddressError::InvalidAddress(gateway.to_string()).into());
        }
        // Store the network address in canonical form, not the host
        // address the caller may have passed.
        let (netmask, destination) = match version {
            IpVersion::V4 => {
                let mask = format_ipv4(netmask)?;
                let network = ipv4_network_address(destination, &mask)?;
                (mask, network)
            }
            IpVersion::V6 => {
                let prefix = parse_prefix(netmask)?;
                let network = ipv6_network_address(destination, prefix)?;
                (prefix.to_string(), network)
            }
        };
        if self
            .routes
            .iter()
            .any(|r| r.version == version && r.destination == destination && r.netmask == netmask)
        {
            return Err(RibError::DuplicateRoute {
                destination,
                netmask,
            });
        }
        let route = Route {
            destination,
            netmask,
            gateway: canonical_address(gateway, version)?,
            iface: iface.to_string(),
            metric,
            version,
        };
        log::debug!("adding route: {}", route);
        self.routes.push(route);
        Ok(())
    }

    /// Delete the route for `destination` and `netmask`.
    ///
    /// A netmask of `"*"` matches any mask, removing the first route for
    /// the destination regardless of its mask.
    pub fn delete(&mut self, destination: &str, netmask: &str) -> Result<(), RibError> {
        let version = ip_version(destination)?;
        let destination = canonical_address(destination, version)?;
        let netmask = if netmask == ANY_NETMASK {
            None
        } else {
            Some(canonical_netmask(netmask, version)?)
        };
        let position = self.routes.iter().position(|r| {
            r.version == version
                && r.destination == destination
                && netmask.as_deref().map_or(true, |mask| r.netmask == mask)
        });
        match position {
            Some(index) => {
                let removed = self.routes.remove(index);
                log::info!("deleted route: {}", removed);
                Ok(())
            }
            None => Err(RibError::RouteNotFound {
                destination,
                netmask: netmask.unwrap_or_else(|| ANY_NETMASK.to_string()),
            }),
        }
    }

    /// Update the route for `destination` and `netmask` with a new netmask,
    /// gateway, interface and metric. The destination itself is unchanged.
    pub fn update(
        &mut self,
        destination: &str,
        netmask: &str,
        new_netmask: &str,
        new_gateway: &str,
        new_iface: &str,
        new_metric: u32,
    ) -> Result<(), RibError> {
        let version = ip_version(destination)?;
        let new_gateway_version = ip_version(new_gateway)?;
        if new_gateway_version != version {
            return Err(AddressError::InvalidAddress(new_gateway.to_string()).into());
        }
        let destination = canonical_address(destination, version)?;
        let netmask = canonical_netmask(netmask, version)?;
        let new_netmask = canonical_netmask(new_netmask, version)?;
        let new_gateway = canonical_address(new_gateway, version)?;
        let route = self
            .routes
            .iter_mut()
            .find(|r| {
                r.version == version && r.destination == destination && r.netmask == netmask
            })
            .ok_or(RibError::RouteNotFound {
                destination,
                netmask,
            })?;
        route.netmask = new_netmask;
        route.gateway = new_gateway;
        route.iface = new_iface.to_string();
        route.metric = new_metric;
        log::info!("updated route: {}", route);
        Ok(())
    }

    /// Remove every route from the table.
    pub fn clear(&mut self) {
        log::debug!("clearing routing table ({} routes)", self.routes.len());
        self.routes.clear();
    }

    /// Find the route whose destination network and netmask match exactly.
    ///
    /// A netmask of `"*"` matches any mask. Returns `Ok(None)` when no
    /// route matches.
    pub fn find(&self, destination: &str, netmask: &str) -> Result<Option<&Route>, RibError> {
        let version = ip_version(destination)?;
        let destination = canonical_address(destination, version)?;
        let netmask = if netmask == ANY_NETMASK {
            None
        } else {
            Some(canonical_netmask(netmask, version)?)
        };
        Ok(self.routes.iter().find(|r| {
            r.version == version
                && r.destination == destination
                && netmask.as_deref().map_or(true, |mask| r.netmask == mask)
        }))
    }

    /// Find the route to use for a destination address, using longest
    /// prefix match when several routes cover it.
    ///
    /// A default route (`0.0.0.0`/`0.0.0.0` or `::`/`0`) has prefix length
    /// zero and is therefore only selected when no more specific route
    /// matches. Returns `Ok(None)` when the table has no route for the
    /// destination.
    pub fn lookup(&self, destination: &str) -> Result<Option<&Route>, RibError> {
        let matched = match ip_version(destination)? {
            IpVersion::V4 => self.lookup_v4(destination)?,
            IpVersion::V6 => self.lookup_v6(destination)?,
        };
        match matched {
            Some(route) => log::debug!("route for {}: {}", destination, route),
            None => log::warn!("no route for {}", destination),
        }
        Ok(matched)
    }

    fn lookup_v4(&self, destination: &str) -> Result<Option<&Route>, RibError> {
        let mut best: Option<&Route> = None;
        for route in self.routes.iter().filter(|r| r.version == IpVersion::V4) {
            let network = ipv4_network_address(destination, &route.netmask)?;
            if network != route.destination {
                continue;
            }
            if best.map_or(true, |b| {
                netmask_to_prefix(&b.netmask) < netmask_to_prefix(&route.netmask)
            }) {
                best = Some(route);
            }
        }
        Ok(best)
    }

    fn lookup_v6(&self, destination: &str) -> Result<Option<&Route>, RibError> {
        let mut best: Option<&Route> = None;
        for route in self.routes.iter().filter(|r| r.version == IpVersion::V6) {
            let network = ipv6_network_address(destination, route.prefix())?;
            if network != route.destination {
                continue;
            }
            if best.map_or(true, |b| b.prefix() < route.prefix()) {
                best = Some(route);
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rib() -> Rib {
        let mut rib = Rib::new();
        rib.add("192.168.1.0", "255.255.255.0", "192.168.1.1", "eth0", 1)
            .expect("Failed to add /24 route");
        rib.add("192.168.0.0", "255.255.0.0", "192.168.0.1", "eth0", 5)
            .expect("Failed to add /16 route");
        rib.add("10.0.0.0", "255.0.0.0", "10.0.0.1", "eth1", 1)
            .expect("Failed to add /8 route");
        rib.add("2001:db8::", "64", "2001:db8::1", "eth2", 1)
            .expect("Failed to add v6 route");
        rib
    }

    #[test]
    fn test_add_stores_canonical_network_address() {
        let mut rib = Rib::new();
        rib.add("192.168.1.10", "255.255.255.0", "192.168.1.1", "eth0", 1)
            .expect("Failed to add route");
        let route = &rib.routes()[0];
        assert_eq!(route.destination, "192.168.1.0");
        assert_eq!(route.netmask, "255.255.255.0");
        assert_eq!(route.version, IpVersion::V4);
    }

    #[test]
    fn test_add_v6_stores_expanded_network_address() {
        let mut rib = Rib::new();
        rib.add("2001:db8::1428:57ab", "64", "2001:db8::1", "eth0", 1)
            .expect("Failed to add v6 route");
        let route = &rib.routes()[0];
        assert_eq!(
            route.destination,
            "2001:0db8:0000:0000:0000:0000:0000:0000"
        );
        assert_eq!(route.netmask, "64");
        assert_eq!(
            route.gateway,
            "2001:0db8:0000:0000:0000:0000:0000:0001"
        );
    }

    #[test]
    fn test_add_rejects_duplicates_across_formatting() {
        let mut rib = Rib::new();
        rib.add("192.168.1.0", "255.255.255.0", "192.168.1.1", "eth0", 1)
            .expect("Failed to add route");
        // Same network, different host address and gateway formatting.
        let err = rib
            .add("192.168.1.42", "255.255.255.0", "192.168.1.2", "eth1", 9)
            .unwrap_err();
        assert!(matches!(err, RibError::DuplicateRoute { .. }));
        assert_eq!(rib.len(), 1);
    }

    #[test]
    fn test_add_rejects_invalid_addresses() {
        let mut rib = Rib::new();
        assert!(rib
            .add("not-an-ip", "255.0.0.0", "10.0.0.1", "eth0", 1)
            .is_err());
        assert!(rib
            .add("10.0.0.0", "255.0.0.0", "hostname", "eth0", 1)
            .is_err());
        assert!(rib.is_empty());
    }

    #[test]
    fn test_add_rejects_family_mismatch() {
        let mut rib = Rib::new();
        let err = rib
            .add("10.0.0.0", "255.0.0.0", "2001:db8::1", "eth0", 1)
            .unwrap_err();
        assert!(matches!(
            err,
            RibError::Address(AddressError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_add_rejects_v6_prefix_out_of_range() {
        let mut rib = Rib::new();
        let err = rib
            .add("2001:db8::", "129", "2001:db8::1", "eth0", 1)
            .unwrap_err();
        assert!(matches!(
            err,
            RibError::Address(AddressError::InvalidPrefix(129))
        ));
    }

    #[test]
    fn test_delete_exact_and_wildcard() {
        let mut rib = sample_rib();
        rib.delete("192.168.1.0", "255.255.255.0")
            .expect("Failed to delete route");
        assert_eq!(rib.len(), 3);

        // Wildcard removes regardless of the mask.
        rib.delete("10.0.0.0", "*").expect("Failed to delete route");
        assert_eq!(rib.len(), 2);

        let err = rib.delete("10.0.0.0", "*").unwrap_err();
        assert!(matches!(err, RibError::RouteNotFound { .. }));
    }

    #[test]
    fn test_update() {
        let mut rib = sample_rib();
        rib.update(
            "192.168.1.0",
            "255.255.255.0",
            "255.255.255.0",
            "192.168.1.254",
            "eth3",
            7,
        )
        .expect("Failed to update route");
        let route = rib
            .find("192.168.1.0", "255.255.255.0")
            .expect("Lookup failed")
            .expect("Route should exist");
        assert_eq!(route.gateway, "192.168.1.254");
        assert_eq!(route.iface, "eth3");
        assert_eq!(route.metric, 7);
    }

    #[test]
    fn test_update_missing_route() {
        let mut rib = sample_rib();
        let err = rib
            .update(
                "172.16.0.0",
                "255.255.0.0",
                "255.255.0.0",
                "172.16.0.1",
                "eth0",
                1,
            )
            .unwrap_err();
        assert!(matches!(err, RibError::RouteNotFound { .. }));
    }

    #[test]
    fn test_find() {
        let rib = sample_rib();
        assert!(rib
            .find("192.168.1.0", "255.255.255.0")
            .expect("Lookup failed")
            .is_some());
        assert!(rib
            .find("192.168.1.0", "*")
            .expect("Lookup failed")
            .is_some());
        assert!(rib
            .find("172.16.0.0", "*")
            .expect("Lookup failed")
            .is_none());
        assert!(rib.find("garbage", "*").is_err());
    }

    #[test]
    fn test_lookup_longest_prefix_match() {
        let rib = sample_rib();
        // Covered by both the /24 and the /16; the /24 must win.
        let route = rib
            .lookup("192.168.1.77")
            .expect("Lookup failed")
            .expect("Route should match");
        assert_eq!(route.netmask, "255.255.255.0");

        // Only the /16 covers this one.
        let route = rib
            .lookup("192.168.2.1")
            .expect("Lookup failed")
            .expect("Route should match");
        assert_eq!(route.netmask, "255.255.0.0");
    }

    #[test]
    fn test_lookup_default_route_fallback() {
        let mut rib = sample_rib();
        assert!(rib.lookup("8.8.8.8").expect("Lookup failed").is_none());

        rib.add("0.0.0.0", "0.0.0.0", "192.168.1.1", "eth0", 10)
            .expect("Failed to add default route");
        let route = rib
            .lookup("8.8.8.8")
            .expect("Lookup failed")
            .expect("Default route should match");
        assert_eq!(route.destination, "0.0.0.0");

        // The default route must not shadow more specific matches.
        let route = rib
            .lookup("192.168.1.77")
            .expect("Lookup failed")
            .expect("Route should match");
        assert_eq!(route.netmask, "255.255.255.0");
    }

    #[test]
    fn test_lookup_v6() {
        let mut rib = sample_rib();
        let route = rib
            .lookup("2001:db8::42")
            .expect("Lookup failed")
            .expect("v6 route should match");
        assert_eq!(route.netmask, "64");

        assert!(rib.lookup("fe80::1").expect("Lookup failed").is_none());

        rib.add("::", "0", "2001:db8::1", "eth2", 10)
            .expect("Failed to add v6 default route");
        let route = rib
            .lookup("fe80::1")
            .expect("Lookup failed")
            .expect("v6 default route should match");
        assert_eq!(route.prefix(), 0);
    }

    #[test]
    fn test_lookup_invalid_destination() {
        let rib = sample_rib();
        assert!(rib.lookup("not-an-ip").is_err());
    }

    #[test]
    fn test_clear() {
        let mut rib = sample_rib();
        assert!(!rib.is_empty());
        rib.clear();
        assert!(rib.is_empty());
        assert_eq!(rib.len(), 0);
    }

    #[test]
    fn test_routes_sorted() {
        let mut rib = sample_rib();
        rib.add("0.0.0.0", "0.0.0.0", "192.168.1.1", "eth0", 10)
            .expect("Failed to add default route");
        let sorted = rib.routes_sorted();
        // v4 before v6, most specific prefix first.
        let prefixes: Vec<(u8, u8)> = sorted
            .iter()
            .map(|r| (r.version.number(), r.prefix()))
            .collect();
        assert_eq!(prefixes, vec![(4, 24), (4, 16), (4, 8), (4, 0), (6, 64)]);
    }
}
