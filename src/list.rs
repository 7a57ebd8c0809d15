use crate::addr::IpAddress;
use crate::error::VersionMismatch;
use crate::network::IpNetwork;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::iter::FromIterator;

/// A set of networks kept in its smallest CIDR form.
///
/// Inserting a network drops anything it covers, and two sibling blocks of
/// the same length are merged into their supernet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IpNetworkList {
    inner: BTreeMap<IpAddress, IpNetwork>,
}

impl Display for IpNetworkList {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for v in self.inner.values() {
            writeln!(f, "{}", v)?;
        }
        Ok(())
    }
}

impl IpNetworkList {
    pub fn new() -> Self {
        IpNetworkList {
            inner: BTreeMap::new(),
        }
    }

    /// The list covering exactly `first..=last`.
    pub fn from_range(first: IpAddress, last: IpAddress) -> Result<Self, VersionMismatch> {
        Ok(IpNetwork::summarize(first, last)?.into_iter().collect())
    }

    pub fn insert(&mut self, cidr: IpNetwork) {
        let mut cidr = cidr.trunc();
        loop {
            let mut rem = Vec::new();
            for (&k, v) in self.inner.iter() {
                if v.contains_network(&cidr) {
                    return;
                }
                if cidr.contains_network(v) {
                    rem.push(k);
                }
            }
            for k in rem {
                self.inner.remove(&k);
            }
            if let Some(parent) = cidr.supernet() {
                let pair = if parent.address() == cidr.address() {
                    cidr.address() + (1u128 << cidr.host_prefix())
                } else {
                    parent.address()
                };
                if let Some(v) = self.inner.get(&pair) {
                    if v.prefix() == cidr.prefix() {
                        log::debug!("merging {} and {} into {}", cidr, v, parent);
                        self.inner.remove(&pair);
                        cidr = parent;
                        continue;
                    }
                }
            }
            self.inner.insert(cidr.address(), cidr);
            break;
        }
    }

    /// `true` if some network of the list contains `ip`.
    pub fn contains(&self, ip: IpAddress) -> bool {
        self.inner
            .range(..=ip)
            .next_back()
            .map_or(false, |(_, v)| v.contains(ip))
    }

    pub fn iter(&self) -> impl Iterator<Item = &IpNetwork> + '_ {
        self.inner.values()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl FromIterator<IpNetwork> for IpNetworkList {
    fn from_iter<I: IntoIterator<Item = IpNetwork>>(iter: I) -> Self {
        let mut list = IpNetworkList::new();
        list.extend(iter);
        list
    }
}

impl Extend<IpNetwork> for IpNetworkList {
    fn extend<I: IntoIterator<Item = IpNetwork>>(&mut self, iter: I) {
        for cidr in iter {
            self.insert(cidr);
        }
    }
}

impl IntoIterator for IpNetworkList {
    type Item = IpNetwork;
    type IntoIter = std::collections::btree_map::IntoValues<IpAddress, IpNetwork>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_values()
    }
}
