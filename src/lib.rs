//! In-memory Routing Information Base (RIB) with the IPv4/IPv6 address
//! string utilities it is built on.
//!
//! The [`addr`] module exposes pure, stateless routines for validating,
//! normalizing and comparing address strings and for netmask/CIDR
//! arithmetic. The [`rib`] module layers a routing table on top of them:
//! routes are canonicalized on insert and resolved with longest prefix
//! match. Nothing is persisted and no network I/O is performed; logging
//! goes through the `log` facade and initialization is left to the
//! consuming application.

pub mod addr;
pub mod error;
pub mod rib;

// Re-export the main types at the crate root
pub use addr::{ip_version, is_valid_ip, IpVersion};
pub use error::{AddressError, RibError};
pub use rib::{Rib, Route};
