use super::Token;
use crate::base::Bytes;
use crate::html::TextType;
use crate::rewritable_units::Mutations;
use encoding_rs::Encoding;
use std::any::Any;
use std::fmt::{self, Debug};

/// An HTML text rewritable unit.
///
/// The rewriter doesn't buffer text nodes, so a single text node can be
/// delivered to the handlers as a sequence of chunks. The boundaries of the
/// chunks depend on how the input was split into writes, so handlers should
/// never rely on them. The last chunk of a text node is reported by
/// [`last_in_text_node`] and may be empty.
///
/// # Example
///
/// ```
/// use html_rewriter::{rewrite_str, text, RewriteStrSettings};
///
/// let mut greeting = String::new();
///
/// rewrite_str(
///     "<div>Hello <span>world</span></div>",
///     RewriteStrSettings {
///         element_content_handlers: vec![text!("div", |t| {
///             greeting += t.as_str();
///
///             if t.last_in_text_node() {
///                 greeting += "|";
///             }
///
///             Ok(())
///         })],
///         ..RewriteStrSettings::new()
///     },
/// )
/// .unwrap();
///
/// assert_eq!(greeting, "Hello |world|");
/// ```
///
/// [`last_in_text_node`]: #method.last_in_text_node
pub struct TextChunk<'i> {
    text: &'i str,
    text_type: TextType,
    last_in_text_node: bool,
    encoding: &'static Encoding,
    mutations: Mutations,
    user_data: Box<dyn Any>,
    propagation_stopped: bool,
}

impl<'i> TextChunk<'i> {
    #[inline]
    pub(super) fn new_token(
        text: &'i str,
        text_type: TextType,
        last_in_text_node: bool,
        encoding: &'static Encoding,
    ) -> Token<'i> {
        Token::TextChunk(TextChunk {
            text,
            text_type,
            last_in_text_node,
            encoding,
            mutations: Mutations::new(encoding),
            user_data: Box::new(()),
            propagation_stopped: false,
        })
    }

    /// Returns the textual content of the chunk.
    ///
    /// Character references are not decoded.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.text
    }

    /// Returns the type of the text in the chunk.
    ///
    /// The type of the text depends on the surrounding context, e.g. text inside `<script>`
    /// element is never escaped.
    #[inline]
    pub fn text_type(&self) -> TextType {
        self.text_type
    }

    /// Returns `true` if the chunk is the last one in the text node.
    #[inline]
    pub fn last_in_text_node(&self) -> bool {
        self.last_in_text_node
    }

    #[inline]
    fn raw(&self) -> Option<&Bytes<'_>> {
        None
    }

    #[inline]
    fn serialize_from_parts(&self, output_handler: &mut dyn FnMut(&[u8])) {
        if !self.text.is_empty() {
            output_handler(&Bytes::from_str(self.text, self.encoding));
        }
    }
}

inject_mutation_api!(TextChunk, "text chunk");
impl_serialize!(TextChunk);
impl_user_data!(TextChunk<'_>);
impl_stop_propagation!(TextChunk<'_>);

impl Debug for TextChunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextChunk")
            .field("text", &self.as_str())
            .field("text_type", &self.text_type)
            .field("last_in_text_node", &self.last_in_text_node)
            .finish()
    }
}
