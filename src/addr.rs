//! Version-tagged IP addresses.

use crate::error::{AddrParseError, PrefixLenError, VersionMismatch};
use crate::hosts::Address;
use crate::ipv4::{self, Ipv4Address};
use crate::ipv6::{self, Ipv6Address};
use crate::network::IpNetwork;
use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};
use std::net::IpAddr;
use std::ops::{Add, BitAnd, BitOr, BitXor, Not, Sub};
use std::str::FromStr;

/// The version of an IP address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Address width in bits: `32` or `128`.
    pub fn max_prefixlen(self) -> u8 {
        match self {
            IpVersion::V4 => ipv4::MAX_PREFIXLEN,
            IpVersion::V6 => ipv6::MAX_PREFIXLEN,
        }
    }
}

impl Display for IpVersion {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            IpVersion::V4 => f.write_str("IPv4"),
            IpVersion::V6 => f.write_str("IPv6"),
        }
    }
}

/// An IPv4 or IPv6 address.
///
/// Ordering is numeric within a version and every IPv4 address sorts
/// before every IPv6 address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IpAddress {
    V4(Ipv4Address),
    V6(Ipv6Address),
}

text_serde!(IpAddress);

macro_rules! mirror {
    ($addr:expr, $ip:ident => $value:expr) => {
        match $addr {
            IpAddress::V4($ip) => $value,
            IpAddress::V6($ip) => $value,
        }
    };
}

impl IpAddress {
    pub fn version(&self) -> IpVersion {
        mirror!(self, ip => ip.version())
    }

    pub fn is_ipv4(&self) -> bool {
        matches!(self, IpAddress::V4(_))
    }

    pub fn is_ipv6(&self) -> bool {
        matches!(self, IpAddress::V6(_))
    }

    /// The total number of bits in the address: `32` for IPv4, `128` for IPv6.
    pub fn max_prefixlen(&self) -> u8 {
        self.version().max_prefixlen()
    }

    /// The mask of `version` with `prefix` leading one bits, `None` when the
    /// prefix is longer than the address.
    pub fn netmask(version: IpVersion, prefix: u8) -> Option<IpAddress> {
        match version {
            IpVersion::V4 => Ipv4Address::netmask(prefix).ok().map(IpAddress::V4),
            IpVersion::V6 => Ipv6Address::netmask(prefix).ok().map(IpAddress::V6),
        }
    }

    /// The network of length `prefix` around this address.
    pub fn with_prefixlen(self, prefix: u8) -> Result<IpNetwork, PrefixLenError> {
        IpNetwork::new(self, prefix)
    }

    /// The address bytes, most significant first: 4 for IPv4, 16 for IPv6.
    pub fn packed(&self) -> Vec<u8> {
        mirror!(self, ip => ip.packed().to_vec())
    }

    /// The numeric value, widened to 128 bits for IPv4.
    pub fn to_u128(&self) -> u128 {
        match self {
            IpAddress::V4(ip) => u128::from(ip.to_u32()),
            IpAddress::V6(ip) => ip.to_u128(),
        }
    }

    pub fn from_native(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(ip) => IpAddress::V4(Ipv4Address::from_native(ip)),
            IpAddr::V6(ip) => IpAddress::V6(Ipv6Address::from_native(ip)),
        }
    }

    pub fn to_native(&self) -> IpAddr {
        match self {
            IpAddress::V4(ip) => IpAddr::V4(ip.to_native()),
            IpAddress::V6(ip) => IpAddr::V6(ip.to_native()),
        }
    }

    pub fn into_native(self) -> IpAddr {
        self.to_native()
    }
}

impl Address for IpAddress {
    fn offset(self, n: u128) -> Self {
        mirror!(self, ip => ip.offset(n).into())
    }
}

impl From<Ipv4Address> for IpAddress {
    fn from(ip: Ipv4Address) -> Self {
        IpAddress::V4(ip)
    }
}

impl From<Ipv6Address> for IpAddress {
    fn from(ip: Ipv6Address) -> Self {
        IpAddress::V6(ip)
    }
}

impl From<u32> for IpAddress {
    fn from(n: u32) -> Self {
        IpAddress::V4(Ipv4Address::from(n))
    }
}

impl From<u128> for IpAddress {
    fn from(n: u128) -> Self {
        IpAddress::V6(Ipv6Address::from(n))
    }
}

impl From<IpAddr> for IpAddress {
    fn from(ip: IpAddr) -> Self {
        IpAddress::from_native(ip)
    }
}

impl From<IpAddress> for IpAddr {
    fn from(ip: IpAddress) -> Self {
        ip.into_native()
    }
}

impl TryFrom<IpAddress> for Ipv4Address {
    type Error = VersionMismatch;

    fn try_from(ip: IpAddress) -> Result<Self, Self::Error> {
        match ip {
            IpAddress::V4(ip) => Ok(ip),
            IpAddress::V6(_) => Err(VersionMismatch {
                expected: IpVersion::V4,
                found: IpVersion::V6,
            }),
        }
    }
}

impl TryFrom<IpAddress> for Ipv6Address {
    type Error = VersionMismatch;

    fn try_from(ip: IpAddress) -> Result<Self, Self::Error> {
        match ip {
            IpAddress::V6(ip) => Ok(ip),
            IpAddress::V4(_) => Err(VersionMismatch {
                expected: IpVersion::V6,
                found: IpVersion::V4,
            }),
        }
    }
}

impl TryFrom<IpAddr> for Ipv4Address {
    type Error = VersionMismatch;

    fn try_from(ip: IpAddr) -> Result<Self, Self::Error> {
        Ipv4Address::try_from(IpAddress::from_native(ip))
    }
}

impl TryFrom<IpAddr> for Ipv6Address {
    type Error = VersionMismatch;

    fn try_from(ip: IpAddr) -> Result<Self, Self::Error> {
        Ipv6Address::try_from(IpAddress::from_native(ip))
    }
}

/// Wrapping offset. IPv4 addresses use the low 32 bits of `rhs`.
impl Add<u128> for IpAddress {
    type Output = Self;

    fn add(self, rhs: u128) -> Self {
        match self {
            IpAddress::V4(ip) => IpAddress::V4(ip + rhs as u32),
            IpAddress::V6(ip) => IpAddress::V6(ip + rhs),
        }
    }
}

impl Sub<u128> for IpAddress {
    type Output = Self;

    fn sub(self, rhs: u128) -> Self {
        match self {
            IpAddress::V4(ip) => IpAddress::V4(ip - rhs as u32),
            IpAddress::V6(ip) => IpAddress::V6(ip - rhs),
        }
    }
}

impl BitAnd for IpAddress {
    type Output = Option<Self>;

    fn bitand(self, rhs: Self) -> Option<Self> {
        match (self, rhs) {
            (IpAddress::V4(l), IpAddress::V4(r)) => Some(IpAddress::V4(l & r)),
            (IpAddress::V6(l), IpAddress::V6(r)) => Some(IpAddress::V6(l & r)),
            _ => None,
        }
    }
}

impl BitOr for IpAddress {
    type Output = Option<Self>;

    fn bitor(self, rhs: Self) -> Option<Self> {
        match (self, rhs) {
            (IpAddress::V4(l), IpAddress::V4(r)) => Some(IpAddress::V4(l | r)),
            (IpAddress::V6(l), IpAddress::V6(r)) => Some(IpAddress::V6(l | r)),
            _ => None,
        }
    }
}

impl BitXor for IpAddress {
    type Output = Option<Self>;

    fn bitxor(self, rhs: Self) -> Option<Self> {
        match (self, rhs) {
            (IpAddress::V4(l), IpAddress::V4(r)) => Some(IpAddress::V4(l ^ r)),
            (IpAddress::V6(l), IpAddress::V6(r)) => Some(IpAddress::V6(l ^ r)),
            _ => None,
        }
    }
}

impl Not for IpAddress {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            IpAddress::V4(ip) => IpAddress::V4(!ip),
            IpAddress::V6(ip) => IpAddress::V6(!ip),
        }
    }
}

impl Display for IpAddress {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        mirror!(self, ip => ip.fmt(f))
    }
}

/// Text containing a `:` is read as IPv6, anything else as IPv4.
impl FromStr for IpAddress {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(':') {
            s.parse().map(IpAddress::V6)
        } else {
            s.parse().map(IpAddress::V4)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn ip(s: &str) -> IpAddress {
        s.parse().unwrap()
    }

    #[test]
    fn version() {
        assert_eq!(ip("127.0.0.1").version(), IpVersion::V4);
        assert_eq!(ip("2001:db8:0:0:0:ff00:42:8329").version(), IpVersion::V6);
        assert_eq!(ip("::1").max_prefixlen(), 128);
        assert_eq!(ip("0.0.0.0").max_prefixlen(), 32);
    }

    #[test]
    fn packed() {
        assert_eq!(ip("127.0.0.1").packed(), vec![127, 0, 0, 1]);
        assert_eq!(
            ip("2001:db8:0:0:0:ff00:42:8329").packed(),
            vec![
                0x20, 0x01, 0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x42,
                0x83, 0x29
            ]
        );
    }

    #[test]
    fn convert() {
        assert_eq!(
            ip("127.0.0.1"),
            IpAddress::V4(Ipv4Address::new(127, 0, 0, 1))
        );
        assert_eq!(
            ip("2001:db8:0:0:0:ff00:42:8329"),
            IpAddress::V6(Ipv6Address::new(0x2001, 0x0db8, 0, 0, 0, 0xff00, 0x42, 0x8329))
        );
        assert_eq!(IpAddress::from(0x7f00_0001u32), ip("127.0.0.1"));
        assert_eq!(IpAddress::from(1u128), ip("::1"));
        assert_eq!(ip("10.1.2.3").to_u128(), 0x0a01_0203);
        assert_eq!(
            Ipv4Address::try_from(ip("::1")),
            Err(VersionMismatch {
                expected: IpVersion::V4,
                found: IpVersion::V6
            })
        );
        assert_eq!(
            Ipv6Address::try_from(ip("::1")),
            Ok(Ipv6Address::from(1u128))
        );
    }

    #[test]
    fn ordering() {
        assert!(ip("127.0.0.2") > ip("127.0.0.1"));
        assert!(ip("127.0.0.2") != ip("127.0.0.1"));
        assert!(ip("255.255.255.255") < ip("::"));
        let mut all = vec![ip("::2"), ip("10.0.0.1"), ip("::1"), ip("1.0.0.0")];
        all.sort();
        assert_eq!(
            all,
            vec![ip("1.0.0.0"), ip("10.0.0.1"), ip("::1"), ip("::2")]
        );
    }

    #[test]
    fn bitops() {
        let addr = ip("127.0.0.1");
        let mask = ip("255.255.0.0");

        assert_eq!(addr | mask, Some(ip("255.255.0.1")));
        assert_eq!(addr & mask, Some(ip("127.0.0.0")));
        assert_eq!(addr ^ mask, Some(ip("128.255.0.1")));
        assert_eq!(!mask, ip("0.0.255.255"));
        assert_eq!(addr & ip("::1"), None);
        assert_eq!(addr | ip("::1"), None);
        assert_eq!(addr ^ ip("::1"), None);
    }

    #[test]
    fn offsets() {
        assert_eq!(ip("10.0.0.255") + 1, ip("10.0.1.0"));
        assert_eq!(ip("10.0.1.0") - 1, ip("10.0.0.255"));
        assert_eq!(ip("255.255.255.255") + 1, ip("0.0.0.0"));
        assert_eq!(ip("::ffff:ffff") + 1, ip("::1:0:0"));
        assert_eq!(ip("::") - 1, ip("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff"));
    }

    #[test]
    fn netmask() {
        assert_eq!(IpAddress::netmask(IpVersion::V4, 16), Some(ip("255.255.0.0")));
        assert_eq!(IpAddress::netmask(IpVersion::V6, 16), Some(ip("ffff::")));
        assert_eq!(IpAddress::netmask(IpVersion::V4, 33), None);
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<IpAddress>(), Err(AddrParseError::Empty));
        assert_eq!(
            "1.2.3.400".parse::<IpAddress>(),
            Err(AddrParseError::Octet("400".to_owned()))
        );
        assert_eq!(
            "1::g".parse::<IpAddress>(),
            Err(AddrParseError::Malformed("1::g".to_owned()))
        );
    }

    #[quickcheck]
    fn check_native_round_trip(v4: u32, v6: u128) -> bool {
        let a = IpAddress::from(v4);
        let b = IpAddress::from(v6);
        IpAddress::from_native(a.to_native()) == a
            && IpAddress::from_native(b.into_native()) == b
            && a.to_native() == IpAddr::from(std::net::Ipv4Addr::from(v4))
    }

    #[quickcheck]
    fn check_integer_round_trip(v4: u32, v6: u128) -> bool {
        IpAddress::from(v4).to_u128() == u128::from(v4) && IpAddress::from(v6).to_u128() == v6
    }

    #[quickcheck]
    fn check_text_round_trip(v4: u32, v6: u128) -> bool {
        [IpAddress::from(v4), IpAddress::from(v6)]
            .iter()
            .all(|a| a.to_string().parse::<IpAddress>() == Ok(*a))
    }
}
