use super::{Attribute, AttributeNameError, Attributes, Serialize, Token};
use crate::base::Bytes;
use crate::rewritable_units::Mutations;
use encoding_rs::Encoding;
use std::fmt::{self, Debug};

pub struct StartTag<'i> {
    name: Bytes<'i>,
    attributes: Attributes<'i>,
    self_closing: bool,
    raw: Option<Bytes<'i>>,
    encoding: &'static Encoding,
    pub(crate) mutations: Mutations,
}

impl<'i> StartTag<'i> {
    #[inline]
    pub(super) fn new_token(
        name: Bytes<'i>,
        attributes: Attributes<'i>,
        self_closing: bool,
        raw: Bytes<'i>,
        encoding: &'static Encoding,
    ) -> Token<'i> {
        Token::StartTag(StartTag {
            name,
            attributes,
            self_closing,
            raw: Some(raw),
            encoding,
            mutations: Mutations::new(encoding),
        })
    }

    #[inline]
    pub(crate) fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    #[inline]
    pub fn name(&self) -> String {
        self.name.as_lowercase_string(self.encoding)
    }

    #[inline]
    pub fn name_preserve_case(&self) -> String {
        self.name.as_string(self.encoding)
    }

    #[inline]
    pub(crate) fn set_name(&mut self, name: Bytes<'static>) {
        self.name = name;
        self.raw = None;
    }

    #[inline]
    pub fn attributes(&self) -> &[Attribute<'i>] {
        &self.attributes
    }

    #[inline]
    pub(crate) fn set_attribute(
        &mut self,
        name: &str,
        value: &str,
    ) -> Result<(), AttributeNameError> {
        self.attributes.set_attribute(name, value)?;
        self.raw = None;

        Ok(())
    }

    #[inline]
    pub(crate) fn remove_attribute(&mut self, name: &str) -> bool {
        let removed = self.attributes.remove_attribute(name);

        if removed {
            self.raw = None;
        }

        removed
    }

    #[inline]
    pub fn self_closing(&self) -> bool {
        self.self_closing
    }

    #[inline]
    fn raw(&self) -> Option<&Bytes<'_>> {
        self.raw.as_ref()
    }

    #[inline]
    fn serialize_from_parts(&self, output_handler: &mut dyn FnMut(&[u8])) {
        output_handler(b"<");
        output_handler(&self.name);

        if !self.attributes.is_empty() {
            output_handler(b" ");

            self.attributes.to_bytes(output_handler);

            // NOTE: without the space the slash would become
            // a part of an unquoted attribute value.
            if self.self_closing {
                output_handler(b" ");
            }
        }

        if self.self_closing {
            output_handler(b"/>");
        } else {
            output_handler(b">");
        }
    }
}

impl_serialize!(StartTag);

impl Debug for StartTag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartTag")
            .field("name", &self.name())
            .field("attributes", &self.attributes())
            .field("self_closing", &self.self_closing)
            .finish()
    }
}
