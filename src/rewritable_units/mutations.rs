use crate::base::Bytes;
use crate::html::escape_body_text;
use encoding_rs::Encoding;

/// The type of inserted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// HTML content type. The rewriter will insert the content as is.
    Html,
    /// Text content type. The rewriter will HTML-escape the content before insertion:
    ///     - `<` will be replaced with `&lt;`
    ///     - `>` will be replaced with `&gt;`
    ///     - `&` will be replaced with `&amp;`
    Text,
}

#[inline]
pub(crate) fn content_to_bytes(
    content: &str,
    content_type: ContentType,
    encoding: &'static Encoding,
    output_handler: &mut dyn FnMut(&[u8]),
) {
    match content_type {
        ContentType::Html => output_handler(&Bytes::from_str(content, encoding)),
        ContentType::Text => escape_body_text(content, &mut |chunk| {
            output_handler(&Bytes::from_str(chunk, encoding));
        }),
    }
}

/// Content inserted around a token and the token's replacement.
pub(crate) struct Mutations {
    pub content_before: Vec<u8>,
    pub replacement: Vec<u8>,
    pub content_after: Vec<u8>,
    pub removed: bool,
    encoding: &'static Encoding,
}

impl Mutations {
    #[inline]
    pub fn new(encoding: &'static Encoding) -> Self {
        Mutations {
            content_before: Vec::default(),
            replacement: Vec::default(),
            content_after: Vec::default(),
            removed: false,
            encoding,
        }
    }

    #[inline]
    pub fn before(&mut self, content: &str, content_type: ContentType) {
        content_to_bytes(content, content_type, self.encoding, &mut |c| {
            self.content_before.extend_from_slice(c);
        });
    }

    #[inline]
    pub fn after(&mut self, content: &str, content_type: ContentType) {
        let mut pos = 0;

        content_to_bytes(content, content_type, self.encoding, &mut |c| {
            self.content_after.splice(pos..pos, c.iter().copied());

            pos += c.len();
        });
    }

    #[inline]
    pub fn replace(&mut self, content: &str, content_type: ContentType) {
        let mut replacement = Vec::default();

        content_to_bytes(content, content_type, self.encoding, &mut |c| {
            replacement.extend_from_slice(c);
        });

        self.replacement = replacement;
        self.remove();
    }

    #[inline]
    pub fn remove(&mut self) {
        self.removed = true;
    }

    #[inline]
    pub fn removed(&self) -> bool {
        self.removed
    }
}

macro_rules! inject_mutation_api {
    ($Token:ident, $doc_name:literal) => {
        impl $Token<'_> {
            #[doc = concat!("Inserts `content` before the ", $doc_name, ".")]
            ///
            /// Consequent calls to the method append `content` to the previously inserted content.
            #[inline]
            pub fn before(
                &mut self,
                content: &str,
                content_type: crate::rewritable_units::ContentType,
            ) {
                self.mutations.before(content, content_type);
            }

            #[doc = concat!("Inserts `content` after the ", $doc_name, ".")]
            ///
            /// Consequent calls to the method prepend `content` to the previously inserted content.
            #[inline]
            pub fn after(
                &mut self,
                content: &str,
                content_type: crate::rewritable_units::ContentType,
            ) {
                self.mutations.after(content, content_type);
            }

            #[doc = concat!("Replaces the ", $doc_name, " with the `content`.")]
            ///
            /// Consequent calls to the method overwrite previous replacement content.
            #[inline]
            pub fn replace(
                &mut self,
                content: &str,
                content_type: crate::rewritable_units::ContentType,
            ) {
                self.mutations.replace(content, content_type);
            }

            #[doc = concat!("Removes the ", $doc_name, ".")]
            #[inline]
            pub fn remove(&mut self) {
                self.mutations.remove();
            }

            #[doc = concat!("Returns `true` if the ", $doc_name, " has been replaced or removed.")]
            #[inline]
            pub fn removed(&self) -> bool {
                self.mutations.removed()
            }
        }
    };
}
