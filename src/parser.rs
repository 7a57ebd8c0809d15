//! Text parsing for addresses and `address/prefix` networks.
//!
//! IPv4 is four dotted decimal octets. IPv6 is eight colon separated hex
//! groups, at most one `::` run, and optionally a dotted IPv4 suffix standing
//! for the last two groups (`::ffff:192.0.2.1`).

use crate::error::{AddrParseError, NetworkParseError};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref OCTET: Regex = Regex::new(r"^(0|[1-9][0-9]{0,2})$").expect("octet pattern");
    static ref GROUP: Regex = Regex::new(r"^[0-9a-fA-F]{1,4}$").expect("group pattern");
    static ref PREFIX: Regex = Regex::new(r"^[0-9]{1,3}$").expect("prefix pattern");
    static ref V6_CHARS: Regex = Regex::new(r"^[0-9a-fA-F:.]+$").expect("charset pattern");
}

const V4_OCTETS: usize = 4;
const V6_GROUPS: usize = 8;

pub(crate) fn parse_ipv4(s: &str) -> Result<u32, AddrParseError> {
    let r = ipv4(s);
    if let Err(ref e) = r {
        log::trace!("rejected IPv4 address {:?}: {}", s, e);
    }
    r
}

pub(crate) fn parse_ipv6(s: &str) -> Result<u128, AddrParseError> {
    let r = ipv6(s);
    if let Err(ref e) = r {
        log::trace!("rejected IPv6 address {:?}: {}", s, e);
    }
    r
}

/// Splits `address/prefix` into its halves. A missing prefix is `None`.
pub(crate) fn split_network(s: &str) -> Result<(&str, Option<u8>), NetworkParseError> {
    let mut parts = s.splitn(2, '/');
    let addr = parts.next().unwrap_or_default();
    match parts.next() {
        None => Ok((addr, None)),
        Some(p) if PREFIX.is_match(p) => p
            .parse::<u8>()
            .map(|n| (addr, Some(n)))
            .map_err(|_| NetworkParseError::Prefix(p.to_owned())),
        Some(p) => {
            log::trace!("rejected prefix {:?} in {:?}", p, s);
            Err(NetworkParseError::Prefix(p.to_owned()))
        }
    }
}

fn ipv4(s: &str) -> Result<u32, AddrParseError> {
    if s.is_empty() {
        return Err(AddrParseError::Empty);
    }
    let segments: Vec<&str> = s.split('.').collect();
    if segments.len() != V4_OCTETS {
        return Err(AddrParseError::SegmentCount {
            expected: V4_OCTETS,
            found: segments.len(),
        });
    }
    segments.iter().try_fold(0u32, |acc, seg| {
        let octet = octet(seg)?;
        Ok((acc << 8) | u32::from(octet))
    })
}

fn octet(seg: &str) -> Result<u8, AddrParseError> {
    if !OCTET.is_match(seg) {
        return Err(AddrParseError::Octet(seg.to_owned()));
    }
    seg.parse::<u8>()
        .map_err(|_| AddrParseError::Octet(seg.to_owned()))
}

fn ipv6(s: &str) -> Result<u128, AddrParseError> {
    if s.is_empty() {
        return Err(AddrParseError::Empty);
    }
    if !V6_CHARS.is_match(s) || s.contains(":::") {
        return Err(AddrParseError::Malformed(s.to_owned()));
    }

    let groups = match s.matches("::").count() {
        0 => {
            let groups = groups(s, true)?;
            if groups.len() != V6_GROUPS {
                return Err(AddrParseError::SegmentCount {
                    expected: V6_GROUPS,
                    found: groups.len(),
                });
            }
            groups
        }
        1 => {
            let mut halves = s.splitn(2, "::");
            let head = groups(halves.next().unwrap_or_default(), false)?;
            let tail = groups(halves.next().unwrap_or_default(), true)?;
            // `::` stands for at least one zero group
            if head.len() + tail.len() >= V6_GROUPS {
                return Err(AddrParseError::SegmentCount {
                    expected: V6_GROUPS,
                    found: head.len() + tail.len() + 1,
                });
            }
            let mut all = head;
            all.resize(V6_GROUPS - tail.len(), 0);
            all.extend(tail);
            all
        }
        _ => return Err(AddrParseError::MultipleCompression),
    };

    Ok(groups
        .iter()
        .fold(0u128, |acc, &g| (acc << 16) | u128::from(g)))
}

/// Parses one `::`-free run of groups. Only the trailing run may end with
/// an embedded IPv4 address.
fn groups(part: &str, trailing: bool) -> Result<Vec<u16>, AddrParseError> {
    let mut out = Vec::with_capacity(V6_GROUPS);
    if part.is_empty() {
        return Ok(out);
    }
    let pieces: Vec<&str> = part.split(':').collect();
    let last = pieces.len() - 1;
    for (i, piece) in pieces.iter().enumerate() {
        if piece.is_empty() {
            return Err(AddrParseError::Malformed(part.to_owned()));
        }
        if piece.contains('.') {
            if !trailing || i != last {
                return Err(AddrParseError::Malformed(part.to_owned()));
            }
            let v4 = ipv4(piece)?;
            out.push((v4 >> 16) as u16);
            out.push(v4 as u16);
        } else if GROUP.is_match(piece) {
            let g = u16::from_str_radix(piece, 16)
                .map_err(|_| AddrParseError::Group((*piece).to_owned()))?;
            out.push(g);
        } else {
            return Err(AddrParseError::Group((*piece).to_owned()));
        }
    }
    Ok(out)
}
