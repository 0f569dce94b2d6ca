use crate::base::{Bytes, Chunk};
use crate::html::escape_double_quotes_only;
use crate::parser::AttributeOutline;
use crate::rewritable_units::Serialize;
use encoding_rs::Encoding;
use std::fmt::{self, Debug};
use std::ops::Deref;
use thiserror::Error;

/// An error that occurs when invalid value is provided for the attribute name.
#[derive(Error, Debug, Eq, PartialEq, Copy, Clone)]
pub enum AttributeNameError {
    /// The provided value is empty.
    #[error("Attribute name can't be empty.")]
    Empty,

    /// The provided value contains a character that is forbidden by the HTML grammar in attribute
    /// names (e.g. `'='`).
    #[error("`{0}` character is forbidden in the attribute name")]
    ForbiddenCharacter(char),

    /// The provided value contains a character that can't be represented in the document's
    /// [`encoding`].
    ///
    /// [`encoding`]: ../struct.Settings.html#structfield.encoding
    #[error("The attribute name contains a character that can't be represented in the document's character encoding.")]
    UnencodableCharacter,
}

/// An attribute of an [`Element`].
///
/// This is an immutable representation of an attribute. To modify element's attributes use
/// approriate [`Element`]'s methods.
///
/// [`Element`]: struct.Element.html
pub struct Attribute<'i> {
    name: Bytes<'i>,
    value: Bytes<'i>,
    raw: Option<Bytes<'i>>,
    encoding: &'static Encoding,
}

impl<'i> Attribute<'i> {
    fn name_from_str(
        name: &str,
        encoding: &'static Encoding,
    ) -> Result<Bytes<'static>, AttributeNameError> {
        if name.is_empty() {
            Err(AttributeNameError::Empty)
        } else if let Some(ch) = name.chars().find(|&ch| {
            matches!(ch, ' ' | '\n' | '\r' | '\t' | '\x0C' | '/' | '>' | '=')
        }) {
            Err(AttributeNameError::ForbiddenCharacter(ch))
        } else {
            // NOTE: if character can't be represented in the given
            // encoding then encoding_rs replaces it with a numeric
            // character reference. Character references are not
            // supported in attribute names, so we need to bail.
            Bytes::from_str_without_replacements(name, encoding)
                .map(Bytes::into_owned)
                .ok_or(AttributeNameError::UnencodableCharacter)
        }
    }

    /// Returns the name of the attribute, lowercased.
    #[inline]
    #[must_use]
    pub fn name(&self) -> String {
        self.name.as_lowercase_string(self.encoding)
    }

    /// Returns the name of the attribute, preserving its case.
    #[inline]
    #[must_use]
    pub fn name_preserve_case(&self) -> String {
        self.name.as_string(self.encoding)
    }

    /// Returns the value of the attribute.
    #[inline]
    #[must_use]
    pub fn value(&self) -> String {
        self.value.as_string(self.encoding)
    }

    #[inline]
    fn set_value(&mut self, value: &str) {
        self.value = Bytes::from_str(value, self.encoding).into_owned();
        self.raw = None;
    }
}

impl Serialize for Attribute<'_> {
    #[inline]
    fn to_bytes(&self, output_handler: &mut dyn FnMut(&[u8])) {
        match self.raw.as_ref() {
            Some(raw) => output_handler(raw),
            None => {
                output_handler(&self.name);
                output_handler(b"=\"");
                escape_double_quotes_only(&self.value, &mut |c| output_handler(c));
                output_handler(b"\"");
            }
        }
    }
}

impl Debug for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name())
            .field("value", &self.value())
            .finish()
    }
}

/// Attributes of a start tag in the order of their appearance.
pub(crate) struct Attributes<'i> {
    items: Vec<Attribute<'i>>,
    encoding: &'static Encoding,
}

impl<'i> Attributes<'i> {
    pub fn new(
        input: &'i Chunk<'i>,
        outlines: &[AttributeOutline],
        encoding: &'static Encoding,
    ) -> Self {
        let mut items: Vec<Attribute<'i>> = Vec::with_capacity(outlines.len());

        for outline in outlines {
            let name = input.slice(outline.name);

            // NOTE: browsers ignore duplicate attributes, the first one wins.
            if items.iter().any(|a| a.name.eq_ignore_ascii_case(&name)) {
                continue;
            }

            items.push(Attribute {
                name,
                value: input.slice(outline.value),
                raw: Some(input.slice(outline.raw_range)),
                encoding,
            });
        }

        Attributes { items, encoding }
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), AttributeNameError> {
        let name = Attribute::name_from_str(&name.to_ascii_lowercase(), self.encoding)?;

        match self
            .items
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(&name))
        {
            Some(attr) => attr.set_value(value),
            None => self.items.push(Attribute {
                name,
                value: Bytes::from_str(value, self.encoding).into_owned(),
                raw: None,
                encoding: self.encoding,
            }),
        }

        Ok(())
    }

    /// Returns `true` if the attribute was present.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let Some(name) = Bytes::from_str_without_replacements(name, self.encoding) else {
            return false;
        };

        let len = self.items.len();

        self.items.retain(|a| !a.name.eq_ignore_ascii_case(&name));

        len != self.items.len()
    }
}

impl<'i> Deref for Attributes<'i> {
    type Target = [Attribute<'i>];

    #[inline]
    fn deref(&self) -> &[Attribute<'i>] {
        &self.items
    }
}

impl Serialize for Attributes<'_> {
    #[inline]
    fn to_bytes(&self, output_handler: &mut dyn FnMut(&[u8])) {
        for (i, attr) in self.items.iter().enumerate() {
            if i > 0 {
                output_handler(b" ");
            }

            attr.to_bytes(output_handler);
        }
    }
}
