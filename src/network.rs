//! Version-tagged CIDR networks.

use crate::addr::{IpAddress, IpVersion};
use crate::error::{NetworkParseError, PrefixLenError, VersionMismatch};
use crate::hosts::Hosts;
use crate::ipv4::Ipv4Network;
use crate::ipv6::Ipv6Network;
use crate::parser;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// An IPv4 or IPv6 network.
///
/// Operations between networks (or a network and an address) of different
/// versions never fail; the predicates simply answer `false`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IpNetwork {
    V4(Ipv4Network),
    V6(Ipv6Network),
}

text_serde!(IpNetwork);

macro_rules! mirror {
    ($net:expr, $n:ident => $value:expr) => {
        match $net {
            IpNetwork::V4($n) => $value,
            IpNetwork::V6($n) => $value,
        }
    };
    (ip: $net:expr, $n:ident => $value:expr) => {
        match $net {
            IpNetwork::V4($n) => IpAddress::V4($value),
            IpNetwork::V6($n) => IpAddress::V6($value),
        }
    };
    (net: $net:expr, $n:ident => $value:expr) => {
        match $net {
            IpNetwork::V4($n) => IpNetwork::V4($value),
            IpNetwork::V6($n) => IpNetwork::V6($value),
        }
    };
}

impl IpNetwork {
    pub fn new(addr: IpAddress, prefix: u8) -> Result<Self, PrefixLenError> {
        match addr {
            IpAddress::V4(ip) => Ipv4Network::new(ip, prefix).map(IpNetwork::V4),
            IpAddress::V6(ip) => Ipv6Network::new(ip, prefix).map(IpNetwork::V6),
        }
    }

    pub fn version(&self) -> IpVersion {
        mirror!(self, n => n.version())
    }

    pub fn base(&self) -> IpAddress {
        mirror!(ip: self, n => n.base())
    }

    pub fn address(&self) -> IpAddress {
        mirror!(ip: self, n => n.address())
    }

    pub fn broadcast_address(&self) -> IpAddress {
        mirror!(ip: self, n => n.broadcast_address())
    }

    pub fn mask(&self) -> IpAddress {
        mirror!(ip: self, n => n.mask())
    }

    pub fn prefix(&self) -> u8 {
        mirror!(self, n => n.prefix())
    }

    pub fn host_prefix(&self) -> u8 {
        mirror!(self, n => n.host_prefix())
    }

    /// The total number of addresses, saturating at `u128::MAX` for `::/0`.
    pub fn num_addresses(&self) -> u128 {
        match self {
            IpNetwork::V4(n) => u128::from(n.num_addresses()),
            IpNetwork::V6(n) => n.num_addresses(),
        }
    }

    /// The total number of addresses, `None` for `::/0`.
    pub fn checked_num_addresses(&self) -> Option<u128> {
        match self {
            IpNetwork::V4(n) => Some(u128::from(n.num_addresses())),
            IpNetwork::V6(n) => n.checked_num_addresses(),
        }
    }

    pub fn trunc(&self) -> Self {
        mirror!(net: self, n => n.trunc())
    }

    pub fn supernet(&self) -> Option<Self> {
        match self {
            IpNetwork::V4(n) => n.supernet().map(IpNetwork::V4),
            IpNetwork::V6(n) => n.supernet().map(IpNetwork::V6),
        }
    }

    /// Inclusive bounds: network address to broadcast address.
    pub fn range(&self) -> (IpAddress, IpAddress) {
        (self.address(), self.broadcast_address())
    }

    pub fn contains(&self, ip: IpAddress) -> bool {
        match (self, ip) {
            (IpNetwork::V4(n), IpAddress::V4(ip)) => n.contains(ip),
            (IpNetwork::V6(n), IpAddress::V6(ip)) => n.contains(ip),
            _ => false,
        }
    }

    pub fn contains_network(&self, other: &IpNetwork) -> bool {
        match (self, other) {
            (IpNetwork::V4(a), IpNetwork::V4(b)) => a.contains_network(b),
            (IpNetwork::V6(a), IpNetwork::V6(b)) => a.contains_network(b),
            _ => false,
        }
    }

    /// `true` if this network is wholly contained in `other` or `other` is
    /// wholly contained in this network.
    pub fn overlaps(&self, other: &IpNetwork) -> bool {
        match (self, other) {
            (IpNetwork::V4(a), IpNetwork::V4(b)) => a.overlaps(b),
            (IpNetwork::V6(a), IpNetwork::V6(b)) => a.overlaps(b),
            _ => false,
        }
    }

    pub fn iter(&self) -> Hosts<IpAddress> {
        let (first, last) = mirror!(self, n => n.offsets(false));
        Hosts::new(self.address(), first, last)
    }

    /// Iterate over the usable hosts of this network.
    pub fn hosts_iter(&self) -> Hosts<IpAddress> {
        let (first, last) = mirror!(self, n => n.offsets(true));
        Hosts::new(self.address(), first, last)
    }

    /// The fewest networks exactly covering `first..=last`.
    pub fn summarize(first: IpAddress, last: IpAddress) -> Result<Vec<IpNetwork>, VersionMismatch> {
        let nets = match (first, last) {
            (IpAddress::V4(a), IpAddress::V4(b)) => Ipv4Network::summarize(a, b)
                .into_iter()
                .map(IpNetwork::V4)
                .collect(),
            (IpAddress::V6(a), IpAddress::V6(b)) => Ipv6Network::summarize(a, b)
                .into_iter()
                .map(IpNetwork::V6)
                .collect(),
            (a, b) => {
                return Err(VersionMismatch {
                    expected: a.version(),
                    found: b.version(),
                })
            }
        };
        Ok(nets)
    }
}

/// Splits `first..=last` into aligned blocks of a `width`-bit address space,
/// returned as `(start, prefix)` pairs in ascending order.
pub(crate) fn summarize_bits(first: u128, last: u128, width: u8) -> Vec<(u128, u8)> {
    let mut out = Vec::new();
    if first > last {
        return out;
    }
    let mut start = first;
    loop {
        let align = if start == 0 {
            u32::from(width)
        } else {
            start.trailing_zeros().min(u32::from(width))
        };
        let fit = match (last - start).checked_add(1) {
            Some(count) => 127 - count.leading_zeros(),
            None => 128,
        };
        let bits = align.min(fit);
        out.push((start, width - bits as u8));

        let span = if bits == 0 { 0 } else { u128::MAX >> (128 - bits) };
        let end = start + span;
        if end >= last {
            break;
        }
        start = end + 1;
    }
    log::debug!(
        "summarized {:#x}..={:#x} into {} blocks",
        first,
        last,
        out.len()
    );
    out
}

impl From<Ipv4Network> for IpNetwork {
    fn from(n: Ipv4Network) -> Self {
        IpNetwork::V4(n)
    }
}

impl From<Ipv6Network> for IpNetwork {
    fn from(n: Ipv6Network) -> Self {
        IpNetwork::V6(n)
    }
}

impl From<IpAddress> for IpNetwork {
    fn from(ip: IpAddress) -> Self {
        match ip {
            IpAddress::V4(ip) => IpNetwork::V4(Ipv4Network::from(ip)),
            IpAddress::V6(ip) => IpNetwork::V6(Ipv6Network::from(ip)),
        }
    }
}

impl Display for IpNetwork {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        mirror!(self, n => n.fmt(f))
    }
}

/// `address/prefix`. A missing prefix means a single-address network.
impl FromStr for IpNetwork {
    type Err = NetworkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = parser::split_network(s)?;
        let addr = addr.parse::<IpAddress>()?;
        let prefix = prefix.unwrap_or_else(|| addr.max_prefixlen());
        Ok(IpNetwork::new(addr, prefix)?)
    }
}
