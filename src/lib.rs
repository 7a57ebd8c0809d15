//! IPv4 and IPv6 addresses and CIDR networks as plain values.
//!
//! ```
//! use netaddr::{IpAddress, IpNetwork};
//!
//! let net: IpNetwork = "192.168.1.0/24".parse().unwrap();
//! assert_eq!(net.num_addresses(), 256);
//! assert!(net.contains("192.168.1.7".parse::<IpAddress>().unwrap()));
//! assert_eq!(net.hosts_iter().count(), 254);
//! ```

#[macro_use]
mod macros;

pub mod addr;
pub mod error;
pub mod hosts;
pub mod ipv4;
pub mod ipv6;
pub mod list;
pub mod network;
mod parser;

pub use addr::{IpAddress, IpVersion};
pub use error::{AddrParseError, Error, NetworkParseError, PrefixLenError, VersionMismatch};
pub use hosts::Hosts;
pub use ipv4::{Ipv4Address, Ipv4Network};
pub use ipv6::{Ipv6Address, Ipv6Network};
pub use list::IpNetworkList;
pub use network::IpNetwork;
