//! IPv4 addresses and networks.

use crate::addr::IpVersion;
use crate::error::{AddrParseError, NetworkParseError, PrefixLenError};
use crate::hosts::Hosts;
use crate::network::summarize_bits;
use crate::parser;
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Number of bits in an IPv4 address.
pub const MAX_PREFIXLEN: u8 = 32;

/// An IPv4 address stored as a host-order `u32`.
///
/// Arithmetic wraps modulo 2^32.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ipv4Address(u32);

address_ops!(Ipv4Address, u32);
text_serde!(Ipv4Address);

impl Ipv4Address {
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Ipv4Address(u32::from_be_bytes([a, b, c, d]))
    }

    pub const fn from_u32(n: u32) -> Self {
        Ipv4Address(n)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }

    pub const fn octets(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub fn packed(&self) -> [u8; 4] {
        self.octets()
    }

    pub fn version(&self) -> IpVersion {
        IpVersion::V4
    }

    pub fn max_prefixlen(&self) -> u8 {
        MAX_PREFIXLEN
    }

    /// The mask with `prefix` leading one bits.
    pub fn netmask(prefix: u8) -> Result<Self, PrefixLenError> {
        if prefix > MAX_PREFIXLEN {
            return Err(PrefixLenError {
                prefix,
                max: MAX_PREFIXLEN,
            });
        }
        Ok(Ipv4Address(mask_bits(prefix)))
    }

    pub fn with_prefixlen(self, prefix: u8) -> Result<Ipv4Network, PrefixLenError> {
        Ipv4Network::new(self, prefix)
    }

    pub fn from_native(ip: Ipv4Addr) -> Self {
        Ipv4Address(u32::from(ip))
    }

    pub fn to_native(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.0)
    }

    pub fn into_native(self) -> Ipv4Addr {
        self.to_native()
    }
}

fn mask_bits(prefix: u8) -> u32 {
    u32::MAX
        .checked_shl(u32::from(MAX_PREFIXLEN - prefix))
        .unwrap_or(0)
}

impl From<Ipv4Addr> for Ipv4Address {
    fn from(ip: Ipv4Addr) -> Self {
        Ipv4Address::from_native(ip)
    }
}

impl From<Ipv4Address> for Ipv4Addr {
    fn from(ip: Ipv4Address) -> Self {
        ip.into_native()
    }
}

impl From<[u8; 4]> for Ipv4Address {
    fn from(octets: [u8; 4]) -> Self {
        Ipv4Address(u32::from_be_bytes(octets))
    }
}

impl Display for Ipv4Address {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let [a, b, c, d] = self.octets();
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

impl FromStr for Ipv4Address {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_ipv4(s).map(Ipv4Address)
    }
}

/// An IPv4 CIDR block: any address inside it plus a prefix length.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ipv4Network {
    addr: Ipv4Address,
    prefix: u8,
}

text_serde!(Ipv4Network);

impl Ipv4Network {
    pub fn new(addr: Ipv4Address, prefix: u8) -> Result<Self, PrefixLenError> {
        if prefix > MAX_PREFIXLEN {
            return Err(PrefixLenError {
                prefix,
                max: MAX_PREFIXLEN,
            });
        }
        Ok(Ipv4Network { addr, prefix })
    }

    pub fn version(&self) -> IpVersion {
        IpVersion::V4
    }

    pub fn base(&self) -> Ipv4Address {
        self.addr
    }

    pub fn address(&self) -> Ipv4Address {
        self.addr & self.mask()
    }

    pub fn broadcast_address(&self) -> Ipv4Address {
        self.address() | !self.mask()
    }

    pub fn mask(&self) -> Ipv4Address {
        Ipv4Address(mask_bits(self.prefix))
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn host_prefix(&self) -> u8 {
        MAX_PREFIXLEN - self.prefix
    }

    pub fn num_addresses(&self) -> u64 {
        1u64 << self.host_prefix()
    }

    /// The same block with its base reset to the network address.
    pub fn trunc(&self) -> Self {
        Ipv4Network {
            addr: self.address(),
            prefix: self.prefix,
        }
    }

    /// The enclosing block one bit shorter, `None` for `/0`.
    pub fn supernet(&self) -> Option<Self> {
        let prefix = self.prefix.checked_sub(1)?;
        Some(Ipv4Network {
            addr: self.addr & Ipv4Address(mask_bits(prefix)),
            prefix,
        })
    }

    pub fn range(&self) -> (Ipv4Address, Ipv4Address) {
        (self.address(), self.broadcast_address())
    }

    pub fn contains(&self, ip: Ipv4Address) -> bool {
        ip & self.mask() == self.address()
    }

    /// `true` if every address of `other` is inside this network.
    pub fn contains_network(&self, other: &Ipv4Network) -> bool {
        self.prefix <= other.prefix && self.contains(other.addr)
    }

    pub fn overlaps(&self, other: &Ipv4Network) -> bool {
        self.address() <= other.broadcast_address() && other.address() <= self.broadcast_address()
    }

    pub fn iter(&self) -> Hosts<Ipv4Address> {
        let (first, last) = self.offsets(false);
        Hosts::new(self.address(), first, last)
    }

    /// The usable hosts: the network and broadcast addresses are skipped
    /// unless the block is a /31 or /32.
    pub fn hosts_iter(&self) -> Hosts<Ipv4Address> {
        let (first, last) = self.offsets(true);
        Hosts::new(self.address(), first, last)
    }

    pub(crate) fn offsets(&self, usable: bool) -> (u128, u128) {
        let last = u128::from(!mask_bits(self.prefix));
        if usable && self.prefix < MAX_PREFIXLEN - 1 {
            (1, last - 1)
        } else {
            (0, last)
        }
    }

    pub fn summarize(first: Ipv4Address, last: Ipv4Address) -> Vec<Ipv4Network> {
        summarize_bits(u128::from(first.0), u128::from(last.0), MAX_PREFIXLEN)
            .into_iter()
            .map(|(start, prefix)| Ipv4Network {
                addr: Ipv4Address(start as u32),
                prefix,
            })
            .collect()
    }
}

impl From<Ipv4Address> for Ipv4Network {
    fn from(addr: Ipv4Address) -> Self {
        Ipv4Network {
            addr,
            prefix: MAX_PREFIXLEN,
        }
    }
}

impl PartialOrd for Ipv4Network {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ipv4Network {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address()
            .cmp(&other.address())
            .then(self.prefix.cmp(&other.prefix))
            .then(self.addr.cmp(&other.addr))
    }
}

impl Display for Ipv4Network {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.address(), self.prefix)
    }
}

impl FromStr for Ipv4Network {
    type Err = NetworkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = parser::split_network(s)?;
        let addr = addr.parse::<Ipv4Address>()?;
        Ok(Ipv4Network::new(addr, prefix.unwrap_or(MAX_PREFIXLEN))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn net(s: &str) -> Ipv4Network {
        s.parse().unwrap()
    }

    #[test]
    fn some_tests() {
        assert_eq!("0.0.0.0/0", net("0.0.0.0/0").to_string());
        assert_eq!("255.255.255.255/32", net("255.255.255.255").to_string());
        assert_eq!("127.0.0.0/8", net("127.1.2.3/8").to_string());
        assert_eq!(
            "10.0.0.0/33".parse::<Ipv4Network>(),
            Err(NetworkParseError::PrefixLen(PrefixLenError {
                prefix: 33,
                max: 32
            }))
        );
        assert_eq!(
            "10.0.0/8".parse::<Ipv4Network>(),
            Err(NetworkParseError::Addr(AddrParseError::SegmentCount {
                expected: 4,
                found: 3
            }))
        );
    }

    #[test]
    fn arithmetic() {
        assert_eq!(
            Ipv4Address::new(127, 0, 0, 1) + 1,
            Ipv4Address::new(127, 0, 0, 2)
        );
        assert_eq!(
            Ipv4Address::new(127, 0, 0, 255) + 1,
            Ipv4Address::new(127, 0, 1, 0)
        );
        assert_eq!(
            Ipv4Address::new(127, 0, 1, 0) - 1,
            Ipv4Address::new(127, 0, 0, 255)
        );
        assert_eq!(
            Ipv4Address::new(255, 255, 255, 255) + 1,
            Ipv4Address::new(0, 0, 0, 0)
        );
        assert_eq!(
            Ipv4Address::new(0, 0, 0, 0) - 1,
            Ipv4Address::new(255, 255, 255, 255)
        );
    }

    #[test]
    fn bitops() {
        let ip = Ipv4Address::new(127, 0, 0, 1);
        let mask = Ipv4Address::new(255, 255, 255, 0);

        assert_eq!(ip | mask, Ipv4Address::new(255, 255, 255, 1));
        assert_eq!(ip & mask, Ipv4Address::new(127, 0, 0, 0));
        assert_eq!(ip ^ mask, Ipv4Address::new(128, 255, 255, 1));
        assert_eq!(!mask, Ipv4Address::new(0, 0, 0, 255));
    }

    #[test]
    fn masks() {
        assert_eq!(Ipv4Address::netmask(0), Ok(Ipv4Address::new(0, 0, 0, 0)));
        assert_eq!(
            Ipv4Address::netmask(16),
            Ok(Ipv4Address::new(255, 255, 0, 0))
        );
        assert_eq!(
            Ipv4Address::netmask(32),
            Ok(Ipv4Address::new(255, 255, 255, 255))
        );
        assert_eq!(
            Ipv4Address::netmask(33),
            Err(PrefixLenError {
                prefix: 33,
                max: 32
            })
        );
    }

    #[test]
    fn derived_addresses() {
        let n = net("127.0.0.1/24");
        assert_eq!(n.base(), Ipv4Address::new(127, 0, 0, 1));
        assert_eq!(n.address(), Ipv4Address::new(127, 0, 0, 0));
        assert_eq!(n.broadcast_address(), Ipv4Address::new(127, 0, 0, 255));
        assert_eq!(n.mask(), Ipv4Address::new(255, 255, 255, 0));
        assert_eq!(n.host_prefix(), 8);
        assert_eq!(n.num_addresses(), 256);
        assert_eq!(net("0.0.0.0/0").num_addresses(), 1 << 32);
        assert_eq!(net("1.2.3.4/32").num_addresses(), 1);
    }

    #[test]
    fn contains_and_overlaps() {
        let n = net("127.0.0.1/24");
        assert!(n.contains(Ipv4Address::new(127, 0, 0, 25)));
        assert!(!n.contains(Ipv4Address::new(128, 0, 0, 25)));

        let wide = net("127.0.0.1/16");
        let other = net("128.0.0.1/16");
        assert!(n.overlaps(&n));
        assert!(n.overlaps(&wide));
        assert!(wide.overlaps(&n));
        assert!(!n.overlaps(&other));
        assert!(wide.contains_network(&n));
        assert!(!n.contains_network(&wide));
    }

    #[test]
    fn host_iteration() {
        let n = net("127.0.0.1/24");
        assert_eq!(n.iter().count() as u64, n.num_addresses());
        assert_eq!(n.iter().rev().count() as u64, n.num_addresses());
        assert_eq!(n.hosts_iter().count() as u64, n.num_addresses() - 2);
        assert_eq!(n.hosts_iter().next(), Some(Ipv4Address::new(127, 0, 0, 1)));
        assert_eq!(
            n.hosts_iter().next_back(),
            Some(Ipv4Address::new(127, 0, 0, 254))
        );

        let p2p: Vec<_> = net("10.0.0.0/31").hosts_iter().collect();
        assert_eq!(
            p2p,
            vec![Ipv4Address::new(10, 0, 0, 0), Ipv4Address::new(10, 0, 0, 1)]
        );
        let host: Vec<_> = net("10.0.0.7/32").hosts_iter().collect();
        assert_eq!(host, vec![Ipv4Address::new(10, 0, 0, 7)]);

        let all = net("0.0.0.0/0");
        assert_eq!(all.iter().count() as u64, 1 << 32);
        assert_eq!(all.hosts_iter().last(), Some(Ipv4Address::new(255, 255, 255, 254)));
    }

    #[test]
    fn summarize_range() {
        let blocks = Ipv4Network::summarize(
            Ipv4Address::new(10, 0, 0, 1),
            Ipv4Address::new(10, 0, 0, 10),
        );
        let text: Vec<_> = blocks.iter().map(|n| n.to_string()).collect();
        assert_eq!(
            text,
            vec!["10.0.0.1/32", "10.0.0.2/31", "10.0.0.4/30", "10.0.0.8/31", "10.0.0.10/32"]
        );
        assert_eq!(
            Ipv4Network::summarize(Ipv4Address::from(0u32), Ipv4Address::from(u32::MAX)),
            vec![net("0.0.0.0/0")]
        );
        assert!(Ipv4Network::summarize(Ipv4Address::from(2u32), Ipv4Address::from(1u32)).is_empty());
    }

    #[test]
    fn native() {
        let ip = Ipv4Address::new(192, 168, 1, 1);
        assert_eq!(ip.to_native(), Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(Ipv4Address::from_native(ip.into_native()), ip);
        assert_eq!(ip.packed(), [192, 168, 1, 1]);
    }

    #[quickcheck]
    fn convert_tests(xs: u32, ys: u8) -> bool {
        let n = Ipv4Network::new(Ipv4Address::from(xs), ys % 33).unwrap().trunc();
        n == net(&n.to_string())
    }

    #[quickcheck]
    fn check_text_round_trip(xs: u32) -> bool {
        let ip = Ipv4Address::from(xs);
        ip.to_string().parse::<Ipv4Address>() == Ok(ip)
            && ip.to_string() == Ipv4Addr::from(xs).to_string()
    }

    #[quickcheck]
    fn check_contains_ip(ip: u32, i: u8) -> bool {
        Ipv4Network::new(Ipv4Address::from(ip), i % 33)
            .unwrap()
            .contains(Ipv4Address::from(ip))
    }

    #[quickcheck]
    fn check_contains_cidr(ip: u32, i: u8) -> bool {
        let i = i % 32;
        let a0 = Ipv4Network::new(Ipv4Address::from(ip), i).unwrap();
        let a1 = Ipv4Network::new(Ipv4Address::from(ip), i + 1).unwrap();
        a0.contains_network(&a1) && !a1.contains_network(&a0) && a0.overlaps(&a1)
    }

    #[quickcheck]
    fn check_mask(i: u8) -> bool {
        let p = u32::from(i % 33);
        let m = Ipv4Address::netmask(i % 33).unwrap().to_u32();
        m.leading_ones() == p && m.count_ones() == p
    }

    #[quickcheck]
    fn check_to_range(ip: u32, i: u8) -> bool {
        let cidr = Ipv4Network::new(Ipv4Address::from(ip), i % 33).unwrap();
        let (from, to) = cidr.range();
        let count = u64::from(to.to_u32() - from.to_u32()) + 1;
        from <= to && count == cidr.num_addresses() && cidr.trunc().address() == from
    }
}
