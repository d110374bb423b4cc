//! Routing Information Base.
//!
//! - [`route`] - the [`Route`] entry model
//! - [`table`] - the [`Rib`] table with add/delete/update/find/lookup

mod route;
mod table;

// Re-export public types
pub use route::Route;
pub use table::{Rib, ANY_NETMASK};
