use std::iter::FusedIterator;

/// An address that can be stepped by an offset within its own width.
pub trait Address: Copy {
    /// `self + n`, wrapping at the address width.
    fn offset(self, n: u128) -> Self;
}

/// Lazy, double ended iterator over a contiguous block of addresses.
///
/// The state is the block's first address plus two inclusive offsets from
/// it. `next` walks `front` up, `next_back` walks `back` down, and the
/// iterator is finished for good once they have met.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "HostsState<A>"))]
pub struct Hosts<A> {
    base: A,
    front: u128,
    back: u128,
    done: bool,
}

/// Unchecked wire form of [`Hosts`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct HostsState<A> {
    base: A,
    front: u128,
    back: u128,
    done: bool,
}

#[cfg(feature = "serde")]
impl<A> std::convert::TryFrom<HostsState<A>> for Hosts<A> {
    type Error = String;

    fn try_from(s: HostsState<A>) -> Result<Self, String> {
        if !s.done && s.front > s.back {
            return Err(format!(
                "unfinished host iterator with front {} past back {}",
                s.front, s.back
            ));
        }
        Ok(Hosts {
            base: s.base,
            front: s.front,
            back: s.back,
            done: s.done,
        })
    }
}

impl<A: Address> Hosts<A> {
    /// Addresses `base + first ..= base + last`. Empty when `first > last`.
    pub(crate) fn new(base: A, first: u128, last: u128) -> Self {
        Hosts {
            base,
            front: first,
            back: last,
            done: first > last,
        }
    }

    /// Number of addresses not yet produced, or `None` when it is 2^128.
    pub fn remaining(&self) -> Option<u128> {
        if self.done {
            Some(0)
        } else {
            (self.back - self.front).checked_add(1)
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.done
    }
}

impl<A: Address> Iterator for Hosts<A> {
    type Item = A;

    fn next(&mut self) -> Option<A> {
        if self.done {
            return None;
        }
        let ip = self.base.offset(self.front);
        if self.front == self.back {
            self.done = true;
        } else {
            self.front += 1;
        }
        Some(ip)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining() {
            Some(n) if n <= usize::MAX as u128 => (n as usize, Some(n as usize)),
            _ => (usize::MAX, None),
        }
    }

    fn nth(&mut self, n: usize) -> Option<A> {
        if self.done {
            return None;
        }
        let n = n as u128;
        if n > self.back - self.front {
            self.done = true;
            return None;
        }
        self.front += n;
        self.next()
    }

    /// Saturates at `usize::MAX`.
    fn count(self) -> usize {
        self.size_hint().0
    }

    fn last(mut self) -> Option<A> {
        self.next_back()
    }
}

impl<A: Address> DoubleEndedIterator for Hosts<A> {
    fn next_back(&mut self) -> Option<A> {
        if self.done {
            return None;
        }
        let ip = self.base.offset(self.back);
        if self.front == self.back {
            self.done = true;
        } else {
            self.back -= 1;
        }
        Some(ip)
    }

    fn nth_back(&mut self, n: usize) -> Option<A> {
        if self.done {
            return None;
        }
        let n = n as u128;
        if n > self.back - self.front {
            self.done = true;
            return None;
        }
        self.back -= n;
        self.next_back()
    }
}

impl<A: Address> FusedIterator for Hosts<A> {}
