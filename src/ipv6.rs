//! IPv6 addresses and networks.

use crate::addr::IpVersion;
use crate::error::{AddrParseError, NetworkParseError, PrefixLenError};
use crate::hosts::Hosts;
use crate::network::summarize_bits;
use crate::parser;
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::net::Ipv6Addr;
use std::str::FromStr;

/// Number of bits in an IPv6 address.
pub const MAX_PREFIXLEN: u8 = 128;

/// An IPv6 address stored as a host-order `u128`.
///
/// Arithmetic wraps modulo 2^128.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ipv6Address(u128);

address_ops!(Ipv6Address, u128);
text_serde!(Ipv6Address);

impl Ipv6Address {
    #[allow(clippy::too_many_arguments)]
    pub const fn new(a: u16, b: u16, c: u16, d: u16, e: u16, f: u16, g: u16, h: u16) -> Self {
        Ipv6Address(
            (a as u128) << 112
                | (b as u128) << 96
                | (c as u128) << 80
                | (d as u128) << 64
                | (e as u128) << 48
                | (f as u128) << 32
                | (g as u128) << 16
                | h as u128,
        )
    }

    pub const fn from_u128(n: u128) -> Self {
        Ipv6Address(n)
    }

    pub const fn to_u128(self) -> u128 {
        self.0
    }

    pub fn segments(&self) -> [u16; 8] {
        let mut out = [0u16; 8];
        for (i, seg) in out.iter_mut().enumerate() {
            *seg = (self.0 >> (112 - 16 * i)) as u16;
        }
        out
    }

    pub const fn octets(&self) -> [u8; 16] {
        self.0.to_be_bytes()
    }

    pub fn packed(&self) -> [u8; 16] {
        self.octets()
    }

    pub fn version(&self) -> IpVersion {
        IpVersion::V6
    }

    pub fn max_prefixlen(&self) -> u8 {
        MAX_PREFIXLEN
    }

    pub fn netmask(prefix: u8) -> Result<Self, PrefixLenError> {
        if prefix > MAX_PREFIXLEN {
            return Err(PrefixLenError {
                prefix,
                max: MAX_PREFIXLEN,
            });
        }
        Ok(Ipv6Address(mask_bits(prefix)))
    }

    pub fn with_prefixlen(self, prefix: u8) -> Result<Ipv6Network, PrefixLenError> {
        Ipv6Network::new(self, prefix)
    }

    pub fn from_native(ip: Ipv6Addr) -> Self {
        Ipv6Address(u128::from(ip))
    }

    pub fn to_native(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.0)
    }

    pub fn into_native(self) -> Ipv6Addr {
        self.to_native()
    }
}

fn mask_bits(prefix: u8) -> u128 {
    u128::MAX
        .checked_shl(u32::from(MAX_PREFIXLEN - prefix))
        .unwrap_or(0)
}

impl From<Ipv6Addr> for Ipv6Address {
    fn from(ip: Ipv6Addr) -> Self {
        Ipv6Address::from_native(ip)
    }
}

impl From<Ipv6Address> for Ipv6Addr {
    fn from(ip: Ipv6Address) -> Self {
        ip.into_native()
    }
}

impl From<[u8; 16]> for Ipv6Address {
    fn from(octets: [u8; 16]) -> Self {
        Ipv6Address(u128::from_be_bytes(octets))
    }
}

impl From<[u16; 8]> for Ipv6Address {
    fn from(segments: [u16; 8]) -> Self {
        let [a, b, c, d, e, f, g, h] = segments;
        Ipv6Address::new(a, b, c, d, e, f, g, h)
    }
}

/// Lowercase hex groups with the first longest run of two or more zero
/// groups written as `::`.
impl Display for Ipv6Address {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let segments = self.segments();

        let (mut start, mut len) = (0, 0);
        let mut run = 0;
        for (i, &seg) in segments.iter().enumerate() {
            if seg == 0 {
                run += 1;
                if run > len {
                    start = i + 1 - run;
                    len = run;
                }
            } else {
                run = 0;
            }
        }

        fn groups(f: &mut Formatter, chunk: &[u16]) -> fmt::Result {
            if let Some((first, tail)) = chunk.split_first() {
                write!(f, "{:x}", first)?;
                for seg in tail {
                    write!(f, ":{:x}", seg)?;
                }
            }
            Ok(())
        }

        if len > 1 {
            groups(f, &segments[..start])?;
            f.write_str("::")?;
            groups(f, &segments[start + len..])
        } else {
            groups(f, &segments)
        }
    }
}

impl FromStr for Ipv6Address {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_ipv6(s).map(Ipv6Address)
    }
}

/// An IPv6 CIDR block: any address inside it plus a prefix length.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ipv6Network {
    addr: Ipv6Address,
    prefix: u8,
}

text_serde!(Ipv6Network);

impl Ipv6Network {
    pub fn new(addr: Ipv6Address, prefix: u8) -> Result<Self, PrefixLenError> {
        if prefix > MAX_PREFIXLEN {
            return Err(PrefixLenError {
                prefix,
                max: MAX_PREFIXLEN,
            });
        }
        Ok(Ipv6Network { addr, prefix })
    }

    pub fn version(&self) -> IpVersion {
        IpVersion::V6
    }

    pub fn base(&self) -> Ipv6Address {
        self.addr
    }

    pub fn address(&self) -> Ipv6Address {
        self.addr & self.mask()
    }

    /// The last address of the block. IPv6 has no broadcast; the name is
    /// kept for symmetry with IPv4.
    pub fn broadcast_address(&self) -> Ipv6Address {
        self.address() | !self.mask()
    }

    pub fn mask(&self) -> Ipv6Address {
        Ipv6Address(mask_bits(self.prefix))
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn host_prefix(&self) -> u8 {
        MAX_PREFIXLEN - self.prefix
    }

    /// Saturates at `u128::MAX` for `::/0`.
    pub fn num_addresses(&self) -> u128 {
        self.checked_num_addresses().unwrap_or(u128::MAX)
    }

    /// `None` for `::/0`, whose 2^128 addresses do not fit.
    pub fn checked_num_addresses(&self) -> Option<u128> {
        1u128.checked_shl(u32::from(self.host_prefix()))
    }

    pub fn trunc(&self) -> Self {
        Ipv6Network {
            addr: self.address(),
            prefix: self.prefix,
        }
    }

    pub fn supernet(&self) -> Option<Self> {
        let prefix = self.prefix.checked_sub(1)?;
        Some(Ipv6Network {
            addr: self.addr & Ipv6Address(mask_bits(prefix)),
            prefix,
        })
    }

    pub fn range(&self) -> (Ipv6Address, Ipv6Address) {
        (self.address(), self.broadcast_address())
    }

    pub fn contains(&self, ip: Ipv6Address) -> bool {
        ip & self.mask() == self.address()
    }

    pub fn contains_network(&self, other: &Ipv6Network) -> bool {
        self.prefix <= other.prefix && self.contains(other.addr)
    }

    pub fn overlaps(&self, other: &Ipv6Network) -> bool {
        self.address() <= other.broadcast_address() && other.address() <= self.broadcast_address()
    }

    pub fn iter(&self) -> Hosts<Ipv6Address> {
        let (first, last) = self.offsets(false);
        Hosts::new(self.address(), first, last)
    }

    /// Every address but the subnet-router anycast (network) address.
    /// /127 and /128 keep all of theirs.
    pub fn hosts_iter(&self) -> Hosts<Ipv6Address> {
        let (first, last) = self.offsets(true);
        Hosts::new(self.address(), first, last)
    }

    pub(crate) fn offsets(&self, usable: bool) -> (u128, u128) {
        let last = !mask_bits(self.prefix);
        if usable && self.prefix < MAX_PREFIXLEN - 1 {
            (1, last)
        } else {
            (0, last)
        }
    }

    pub fn summarize(first: Ipv6Address, last: Ipv6Address) -> Vec<Ipv6Network> {
        summarize_bits(first.0, last.0, MAX_PREFIXLEN)
            .into_iter()
            .map(|(start, prefix)| Ipv6Network {
                addr: Ipv6Address(start),
                prefix,
            })
            .collect()
    }
}

impl From<Ipv6Address> for Ipv6Network {
    fn from(addr: Ipv6Address) -> Self {
        Ipv6Network {
            addr,
            prefix: MAX_PREFIXLEN,
        }
    }
}

impl PartialOrd for Ipv6Network {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ipv6Network {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address()
            .cmp(&other.address())
            .then(self.prefix.cmp(&other.prefix))
            .then(self.addr.cmp(&other.addr))
    }
}

impl Display for Ipv6Network {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.address(), self.prefix)
    }
}

impl FromStr for Ipv6Network {
    type Err = NetworkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = parser::split_network(s)?;
        let addr = addr.parse::<Ipv6Address>()?;
        Ok(Ipv6Network::new(addr, prefix.unwrap_or(MAX_PREFIXLEN))?)
    }
}
