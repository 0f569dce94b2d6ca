use encoding_rs::Encoding;
use thiserror::Error;

/// An error that occurs when an invalid encoding is provided in the [`Settings`].
///
/// [`Settings`]: ../struct.Settings.html
#[derive(Error, Debug, Eq, PartialEq, Copy, Clone)]
pub enum EncodingError {
    /// The provided value doesn't match any of the [labels specified in the standard].
    ///
    /// [labels specified in the standard]: https://encoding.spec.whatwg.org/#names-and-labels
    #[error("Unknown character encoding has been provided.")]
    UnknownEncoding,

    /// The provided label is for one of the non-ASCII-compatible encodings (`UTF-16LE`,
    /// `UTF-16BE`, `ISO-2022-JP` and `replacement`). These encodings are not supported.
    #[error("Expected ASCII-compatible encoding.")]
    NonAsciiCompatibleEncoding,
}

/// A charset encoding that can be used to represent HTML markup.
///
/// The tokenizer works on bytes and relies on `<`, `>`, quotes and
/// whitespace having their ASCII values, so only ASCII-compatible
/// encodings are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsciiCompatibleEncoding(&'static Encoding);

impl AsciiCompatibleEncoding {
    /// Returns `None` if the encoding is not ASCII-compatible (e.g. UTF-16).
    #[must_use]
    pub fn new(encoding: &'static Encoding) -> Option<Self> {
        encoding.is_ascii_compatible().then_some(Self(encoding))
    }

    /// Resolves an encoding label (e.g. `"utf-8"`, `"windows-1251"`).
    pub fn for_label(label: &str) -> Result<Self, EncodingError> {
        let encoding = Encoding::for_label_no_replacement(label.as_bytes())
            .ok_or(EncodingError::UnknownEncoding)?;

        Self::new(encoding).ok_or(EncodingError::NonAsciiCompatibleEncoding)
    }

    /// Convenience constructor for UTF-8.
    #[must_use]
    pub fn utf_8() -> Self {
        Self(encoding_rs::UTF_8)
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl From<AsciiCompatibleEncoding> for &'static Encoding {
    #[inline]
    fn from(ascii_enc: AsciiCompatibleEncoding) -> &'static Encoding {
        ascii_enc.0
    }
}

impl TryFrom<&'static Encoding> for AsciiCompatibleEncoding {
    type Error = EncodingError;

    #[inline]
    fn try_from(enc: &'static Encoding) -> Result<Self, EncodingError> {
        Self::new(enc).ok_or(EncodingError::NonAsciiCompatibleEncoding)
    }
}
