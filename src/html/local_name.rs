use crate::base::{Bytes, Chunk, Range};

/// LocalName is used for the comparison of tag names. HTML tag names
/// are ASCII case-insensitive, so the comparison ignores ASCII case
/// while the original bytes are kept intact.
#[derive(Clone, Debug)]
pub struct LocalName<'i>(Bytes<'i>);

impl<'i> LocalName<'i> {
    #[inline]
    pub fn new(input: &Chunk<'i>, range: Range) -> Self {
        LocalName(input.slice(range))
    }

    #[inline]
    pub fn from_str_without_replacements(
        string: &'i str,
        encoding: &'static encoding_rs::Encoding,
    ) -> Option<Self> {
        Bytes::from_str_without_replacements(string, encoding).map(LocalName)
    }

    #[inline]
    pub fn into_owned(self) -> LocalName<'static> {
        LocalName(self.0.into_owned())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn is_one_of(&self, names: &[&[u8]]) -> bool {
        names.iter().any(|&n| self.0.eq_ignore_ascii_case(n))
    }
}

impl PartialEq for LocalName<'_> {
    #[inline]
    fn eq(&self, other: &LocalName<'_>) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for LocalName<'_> {}
