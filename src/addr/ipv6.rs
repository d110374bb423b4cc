//! IPv6 string utilities: network address derivation, canonical (fully
//! expanded) formatting and comparison.

use crate::error::AddressError;
use std::cmp::Ordering;
use std::net::Ipv6Addr;

/// Number of bits in an IPv6 address.
pub const MAX_PREFIX_V6: u8 = 128;

/// Format 16 address bytes as eight colon-separated groups of four hex
/// digits, with no `::` compression.
fn expand(octets: &[u8; 16]) -> String {
    let groups: Vec<String> = octets
        .chunks(2)
        .map(|pair| format!("{:02x}{:02x}", pair[0], pair[1]))
        .collect();
    groups.join(":")
}

fn parse_ipv6(addr: &str) -> Result<Ipv6Addr, AddressError> {
    addr.parse::<Ipv6Addr>()
        .map_err(|_| AddressError::InvalidAddress(addr.to_string()))
}

/// Compute the network-portion address for an IPv6 address and prefix
/// length, emitting the fully expanded colon-hex form.
///
/// The derivation works at whole-byte granularity: the first
/// `prefix_len / 8` bytes of the address are kept and the remainder is
/// zero-filled. A prefix length that is not a multiple of 8 truncates to
/// the enclosing byte boundary instead of masking the boundary byte
/// bit-precisely.
///
/// # Examples
/// ```
/// use ip_rib::addr::ipv6_network_address;
/// assert_eq!(
///     ipv6_network_address("2001:db8::1", 64).unwrap(),
///     "2001:0db8:0000:0000:0000:0000:0000:0000"
/// );
/// ```
pub fn ipv6_network_address(addr: &str, prefix_len: u8) -> Result<String, AddressError> {
    if prefix_len > MAX_PREFIX_V6 {
        return Err(AddressError::InvalidPrefix(prefix_len));
    }
    let parsed = parse_ipv6(addr)?;
    let bytes = usize::from(prefix_len / 8);
    let mut network = [0u8; 16];
    network[..bytes].copy_from_slice(&parsed.octets()[..bytes]);
    Ok(expand(&network))
}

/// Rewrite an IPv6 address into the fully expanded colon-hex form
/// (e.g. `2001:0db8::1428:57ab` => `2001:0db8:0000:0000:0000:0000:1428:57ab`).
pub fn format_ipv6(addr: &str) -> Result<String, AddressError> {
    let parsed = parse_ipv6(addr)?;
    Ok(expand(&parsed.octets()))
}

/// Compare two IPv6 address strings irrespective of compression or hex-case
/// formatting differences, by canonicalizing both and comparing the
/// expanded forms lexicographically.
pub fn compare_ipv6(addr: &str, other: &str) -> Result<Ordering, AddressError> {
    let canonical = format_ipv6(addr)?;
    let other_canonical = format_ipv6(other)?;
    Ok(canonical.cmp(&other_canonical))
}
