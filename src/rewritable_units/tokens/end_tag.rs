use super::Token;
use crate::base::Bytes;
use crate::rewritable_units::element::tag_name_bytes_from_str;
use crate::rewritable_units::{Mutations, TagNameError};
use encoding_rs::Encoding;
use std::fmt::{self, Debug};

/// An HTML end tag rewritable unit.
///
/// End tags are exposed to the end tag handlers of the matched [`Element`].
///
/// [`Element`]: struct.Element.html
pub struct EndTag<'i> {
    name: Bytes<'i>,
    raw: Option<Bytes<'i>>,
    encoding: &'static Encoding,
    pub(crate) mutations: Mutations,
    propagation_stopped: bool,
}

impl<'i> EndTag<'i> {
    #[inline]
    pub(super) fn new_token(
        name: Bytes<'i>,
        raw: Bytes<'i>,
        encoding: &'static Encoding,
    ) -> Token<'i> {
        Token::EndTag(EndTag {
            name,
            raw: Some(raw),
            encoding,
            mutations: Mutations::new(encoding),
            propagation_stopped: false,
        })
    }

    /// Returns the name of the tag, lowercased.
    #[inline]
    pub fn name(&self) -> String {
        self.name.as_lowercase_string(self.encoding)
    }

    /// Returns the name of the tag, preserving its case.
    #[inline]
    pub fn name_preserve_case(&self) -> String {
        self.name.as_string(self.encoding)
    }

    /// Sets the name of the tag.
    #[inline]
    pub fn set_name(&mut self, name: &str) -> Result<(), TagNameError> {
        let name = tag_name_bytes_from_str(name, self.encoding)?;

        self.set_name_raw(name);

        Ok(())
    }

    #[inline]
    pub(crate) fn set_name_raw(&mut self, name: Bytes<'static>) {
        self.name = name;
        self.raw = None;
    }

    #[inline]
    fn raw(&self) -> Option<&Bytes<'_>> {
        self.raw.as_ref()
    }

    #[inline]
    fn serialize_from_parts(&self, output_handler: &mut dyn FnMut(&[u8])) {
        output_handler(b"</");
        output_handler(&self.name);
        output_handler(b">");
    }
}

inject_mutation_api!(EndTag, "end tag");
impl_serialize!(EndTag);
impl_stop_propagation!(EndTag<'_>);

impl Debug for EndTag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndTag")
            .field("name", &self.name())
            .finish()
    }
}
