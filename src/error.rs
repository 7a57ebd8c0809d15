//! Error types for address and network construction.

use crate::addr::IpVersion;
use thiserror::Error;

/// Crate-level error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Addr(#[from] AddrParseError),

    #[error(transparent)]
    Network(#[from] NetworkParseError),

    #[error(transparent)]
    PrefixLen(#[from] PrefixLenError),

    #[error(transparent)]
    Version(#[from] VersionMismatch),
}

/// Malformed address text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddrParseError {
    /// Nothing to parse.
    #[error("empty address")]
    Empty,

    /// An IPv4 octet that is not a decimal number in `0..=255`.
    #[error("invalid IPv4 octet `{0}`")]
    Octet(String),

    /// An IPv6 group that is not one to four hex digits.
    #[error("invalid IPv6 group `{0}`")]
    Group(String),

    /// Wrong number of octets or groups.
    #[error("expected {expected} segments, found {found}")]
    SegmentCount { expected: usize, found: usize },

    /// More than one `::` in an IPv6 address.
    #[error("`::` may appear only once")]
    MultipleCompression,

    /// Bad separators or stray characters.
    #[error("malformed address `{0}`")]
    Malformed(String),
}

/// A prefix length larger than the address width.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("prefix length {prefix} exceeds maximum {max}")]
pub struct PrefixLenError {
    pub prefix: u8,
    pub max: u8,
}

/// Malformed `address/prefix` text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkParseError {
    #[error(transparent)]
    Addr(#[from] AddrParseError),

    /// The part after `/` is not a decimal number.
    #[error("invalid prefix length `{0}`")]
    Prefix(String),

    #[error(transparent)]
    PrefixLen(#[from] PrefixLenError),
}

/// Two operands of different IP versions where one version was required.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("expected {expected} operand, found {found}")]
pub struct VersionMismatch {
    pub expected: IpVersion,
    pub found: IpVersion,
}
