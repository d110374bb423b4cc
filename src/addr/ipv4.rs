//! IPv4 string utilities: netmask conversion, network address derivation,
//! canonical formatting and comparison.

use crate::error::AddressError;
use std::cmp::Ordering;

/// Number of bits in an IPv4 address.
pub const MAX_PREFIX_V4: u8 = 32;

/// Parse a dotted-decimal address into its four octets.
///
/// Exactly four dot-separated decimal tokens are required, each in 0-255.
/// Leading zeros are accepted (`010` reads as 10).
fn parse_octets(addr: &str) -> Result<[u8; 4], AddressError> {
    let mut octets = [0u8; 4];
    let mut count = 0;
    for token in addr.split('.') {
        if count == 4 {
            return Err(AddressError::MalformedAddress(addr.to_string()));
        }
        octets[count] = token
            .parse::<u8>()
            .map_err(|_| AddressError::MalformedAddress(addr.to_string()))?;
        count += 1;
    }
    if count != 4 {
        return Err(AddressError::MalformedAddress(addr.to_string()));
    }
    Ok(octets)
}

/// Convert a dotted-decimal netmask into its CIDR prefix length
/// (e.g. `255.255.255.0` => 24).
///
/// The scan walks the four octets in order and stops at the first byte that
/// is not one of the eight canonical mask values (0x80, 0xC0, 0xE0, 0xF0,
/// 0xF8, 0xFC, 0xFE, 0xFF), returning the count accumulated so far. A zero
/// octet or an unparseable token also stops the scan. Malformed masks
/// therefore yield a truncated count rather than an error.
///
/// # Examples
/// ```
/// use ip_rib::addr::netmask_to_prefix;
/// assert_eq!(netmask_to_prefix("255.255.255.0"), 24);
/// assert_eq!(netmask_to_prefix("255.255.0.255"), 16);
/// ```
pub fn netmask_to_prefix(netmask: &str) -> u8 {
    let mut octets = [0u8; 4];
    for (slot, token) in octets.iter_mut().zip(netmask.split('.')) {
        *slot = token.parse::<u8>().unwrap_or(0);
    }
    let mut prefix = 0;
    for octet in octets {
        match octet {
            0x80 => prefix += 1,
            0xC0 => prefix += 2,
            0xE0 => prefix += 3,
            0xF0 => prefix += 4,
            0xF8 => prefix += 5,
            0xFC => prefix += 6,
            0xFE => prefix += 7,
            0xFF => prefix += 8,
            // Intentional: a non-contiguous-prefix byte (zero included)
            // halts the count here, even if later octets look valid.
            // Callers may rely on the truncated result for odd masks.
            _ => return prefix,
        }
    }
    prefix
}

/// Compute the network address for an address/netmask pair, as the
/// octet-wise AND of the two.
///
/// # Examples
/// ```
/// use ip_rib::addr::ipv4_network_address;
/// assert_eq!(
///     ipv4_network_address("192.168.1.10", "255.255.255.0").unwrap(),
///     "192.168.1.0"
/// );
/// ```
pub fn ipv4_network_address(addr: &str, netmask: &str) -> Result<String, AddressError> {
    let addr_octets = parse_octets(addr)?;
    let mask_octets = parse_octets(netmask)?;
    let network: Vec<String> = addr_octets
        .iter()
        .zip(mask_octets.iter())
        .map(|(a, m)| (a & m).to_string())
        .collect();
    Ok(network.join("."))
}

/// Rewrite an IPv4 address into minimal decimal form, dropping any leading
/// zeros (e.g. `010.008.000.001` => `10.8.0.1`).
pub fn format_ipv4(addr: &str) -> Result<String, AddressError> {
    let octets = parse_octets(addr)?;
    Ok(format!(
        "{}.{}.{}.{}",
        octets[0], octets[1], octets[2], octets[3]
    ))
}

/// Compare two IPv4 address strings irrespective of leading-zero formatting.
///
/// Both inputs are canonicalized and the canonical forms compared
/// lexicographically, so `Ordering::Equal` means the addresses are the same
/// and the ordering of unequal addresses follows their canonical text, not
/// their numeric value.
///
/// # Examples
/// ```
/// use ip_rib::addr::compare_ipv4;
/// use std::cmp::Ordering;
/// assert_eq!(
///     compare_ipv4("010.008.000.001", "10.8.0.1").unwrap(),
///     Ordering::Equal
/// );
/// ```
pub fn compare_ipv4(addr: &str, other: &str) -> Result<Ordering, AddressError> {
    let canonical = format_ipv4(addr)?;
    let other_canonical = format_ipv4(other)?;
    Ok(canonical.cmp(&other_canonical))
}
