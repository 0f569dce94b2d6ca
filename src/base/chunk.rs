use super::{Bytes, Range};
use std::fmt::{self, Debug};
use std::ops::Deref;

/// A window of input the parser works on: bytes blocked by the previous
/// write followed by the bytes of the current one.
pub struct Chunk<'b> {
    data: &'b [u8],
    last: bool,
}

impl<'b> Chunk<'b> {
    #[inline]
    pub fn new(data: &'b [u8]) -> Self {
        Chunk { data, last: false }
    }

    #[inline]
    pub fn last(data: &'b [u8]) -> Self {
        Chunk { data, last: true }
    }

    #[inline]
    pub fn last_empty() -> Self {
        Chunk {
            data: &[],
            last: true,
        }
    }

    #[inline]
    pub fn is_last(&self) -> bool {
        self.last
    }

    #[inline]
    pub fn slice(&self, range: Range) -> Bytes<'b> {
        Bytes::from(&self.data[range.start..range.end])
    }

    #[inline]
    pub fn opt_slice(&self, range: Option<Range>) -> Option<Bytes<'b>> {
        range.map(|range| self.slice(range))
    }
}

impl Deref for Chunk<'_> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.data
    }
}

impl Debug for Chunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("data", &Bytes::from(self.data))
            .field("last", &self.last)
            .finish()
    }
}
