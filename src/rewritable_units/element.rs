use super::{Attribute, AttributeNameError, ContentType, EndTag, Mutations, StartTag};
use crate::base::Bytes;
use crate::rewriter::{EndTagHandler, RewritingError};
use encoding_rs::Encoding;
use std::any::Any;
use std::fmt::{self, Debug};
use thiserror::Error;

/// An error that occurs when invalid value is provided for the tag name.
#[derive(Error, Debug, Eq, PartialEq, Copy, Clone)]
pub enum TagNameError {
    /// The provided value is empty.
    #[error("Tag name can't be empty.")]
    Empty,

    /// The first character of the provided value is not an ASCII alphabetical character.
    #[error("First character of the tag name should be an ASCII alphabetical character.")]
    InvalidFirstCharacter,

    /// The provided value contains a character that is forbidden by the HTML grammar in tag names
    /// (e.g. `'>'`).
    #[error("`{0}` character is forbidden in the tag name")]
    ForbiddenCharacter(char),

    /// The provided value contains a character that can't be represented in the document's
    /// [`encoding`].
    ///
    /// [`encoding`]: ../struct.Settings.html#structfield.encoding
    #[error("The tag name contains a character that can't be represented in the document's character encoding.")]
    UnencodableCharacter,
}

pub(crate) fn tag_name_bytes_from_str(
    name: &str,
    encoding: &'static Encoding,
) -> Result<Bytes<'static>, TagNameError> {
    match name.chars().next() {
        Some(ch) if !ch.is_ascii_alphabetic() => Err(TagNameError::InvalidFirstCharacter),
        Some(_) => {
            if let Some(ch) = name
                .chars()
                .find(|&ch| matches!(ch, ' ' | '\n' | '\r' | '\t' | '\x0C' | '/' | '>'))
            {
                Err(TagNameError::ForbiddenCharacter(ch))
            } else {
                // NOTE: if character can't be represented in the given
                // encoding then encoding_rs replaces it with a numeric
                // character reference. Character references are not
                // supported in tag names, so we need to bail.
                Bytes::from_str_without_replacements(name, encoding)
                    .map(Bytes::into_owned)
                    .ok_or(TagNameError::UnencodableCharacter)
            }
        }
        None => Err(TagNameError::Empty),
    }
}

/// An HTML element rewritable unit.
///
/// Exposes API for examination and modification of a parsed HTML element.
/// The element is only available during the handler call: its start tag
/// has already been parsed, but neither its content nor its end tag.
pub struct Element<'r, 't> {
    start_tag: &'r mut StartTag<'t>,
    end_tag_mutations: Option<Mutations>,
    modified_end_tag_name: Option<Bytes<'static>>,
    end_tag_handlers: Vec<EndTagHandler<'static>>,
    can_have_content: bool,
    should_remove_content: bool,
    removed_with_content: bool,
    propagation_stopped: bool,
    encoding: &'static Encoding,
    user_data: Box<dyn Any>,
}

impl<'r, 't> Element<'r, 't> {
    pub(crate) fn new(start_tag: &'r mut StartTag<'t>, can_have_content: bool) -> Self {
        let encoding = start_tag.encoding();

        Element {
            start_tag,
            end_tag_mutations: None,
            modified_end_tag_name: None,
            end_tag_handlers: Vec::new(),
            can_have_content,
            should_remove_content: false,
            removed_with_content: false,
            propagation_stopped: false,
            encoding,
            user_data: Box::new(()),
        }
    }

    #[inline]
    fn end_tag_mutations_mut(&mut self) -> &mut Mutations {
        let encoding = self.encoding;

        self.end_tag_mutations
            .get_or_insert_with(|| Mutations::new(encoding))
    }

    /// Returns the tag name of the element, lowercased.
    #[inline]
    pub fn tag_name(&self) -> String {
        self.start_tag.name()
    }

    /// Returns the tag name of the element, preserving its case.
    #[inline]
    pub fn tag_name_preserve_case(&self) -> String {
        self.start_tag.name_preserve_case()
    }

    /// Sets the tag name of the element. The end tag of the element, if any,
    /// is renamed as well.
    #[inline]
    pub fn set_tag_name(&mut self, name: &str) -> Result<(), TagNameError> {
        let name = tag_name_bytes_from_str(name, self.encoding)?;

        if self.can_have_content {
            self.modified_end_tag_name = Some(name.clone());
        }

        self.start_tag.set_name(name);

        Ok(())
    }

    /// Whether the start tag is written as `<tag/>`.
    #[inline]
    pub fn is_self_closing(&self) -> bool {
        self.start_tag.self_closing()
    }

    /// Returns `true` if the element can have content, i.e. it is neither
    /// a [void element] nor a self-closing tag.
    ///
    /// [void element]: https://html.spec.whatwg.org/multipage/syntax.html#void-elements
    #[inline]
    pub fn can_have_content(&self) -> bool {
        self.can_have_content
    }

    #[inline]
    pub fn attributes(&self) -> &[Attribute<'t>] {
        self.start_tag.attributes()
    }

    /// Returns the value of the attribute with the `name`.
    ///
    /// Returns `None` if the element doesn't have the attribute.
    #[inline]
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();

        self.attributes()
            .iter()
            .find(|attr| attr.name() == name)
            .map(Attribute::value)
    }

    #[inline]
    pub fn has_attribute(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();

        self.attributes().iter().any(|attr| attr.name() == name)
    }

    /// Sets `value` of the attribute with the `name`.
    ///
    /// If the element doesn't have the attribute, it is appended to the
    /// list of the element's attributes.
    #[inline]
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), AttributeNameError> {
        self.start_tag.set_attribute(name, value)
    }

    #[inline]
    pub fn remove_attribute(&mut self, name: &str) {
        self.start_tag.remove_attribute(name);
    }

    /// Inserts `content` before the element.
    ///
    /// Consequent calls to the method append `content` to the previously inserted content.
    #[inline]
    pub fn before(&mut self, content: &str, content_type: ContentType) {
        self.start_tag.mutations.before(content, content_type);
    }

    /// Inserts `content` after the element.
    ///
    /// Consequent calls to the method prepend `content` to the previously inserted content.
    #[inline]
    pub fn after(&mut self, content: &str, content_type: ContentType) {
        if self.can_have_content {
            self.end_tag_mutations_mut().after(content, content_type);
        } else {
            self.start_tag.mutations.after(content, content_type);
        }
    }

    /// Prepends `content` to the element's inner content, i.e. inserts content right after
    /// the element's start tag.
    ///
    /// Consequent calls to the method prepend `content` to the previously inserted content.
    /// The method is a no-op for elements that can't have content and for removed elements.
    #[inline]
    pub fn prepend(&mut self, content: &str, content_type: ContentType) {
        if self.can_have_content && !self.removed_with_content {
            self.start_tag.mutations.after(content, content_type);
        }
    }

    /// Appends `content` to the element's inner content, i.e. inserts content right before
    /// the element's end tag.
    ///
    /// Consequent calls to the method append `content` to the previously inserted content.
    /// The method is a no-op for elements that can't have content and for removed elements.
    #[inline]
    pub fn append(&mut self, content: &str, content_type: ContentType) {
        if self.can_have_content && !self.removed_with_content {
            self.end_tag_mutations_mut().before(content, content_type);
        }
    }

    /// Replaces inner content of the element with `content`.
    ///
    /// Consequent calls to the method overwrite previously inserted content.
    /// The method is a no-op for elements that can't have content and for removed elements.
    #[inline]
    pub fn set_inner_content(&mut self, content: &str, content_type: ContentType) {
        if self.can_have_content && !self.removed_with_content {
            self.start_tag.mutations.content_after.clear();
            self.start_tag.mutations.after(content, content_type);
            self.end_tag_mutations_mut().content_before.clear();
            self.should_remove_content = true;
        }
    }

    /// Replaces the element and its inner content with `content`.
    ///
    /// Consequent calls to the method overwrite previously inserted content.
    #[inline]
    pub fn replace(&mut self, content: &str, content_type: ContentType) {
        self.start_tag.mutations.replace(content, content_type);
        self.remove_content();
    }

    /// Removes the element and its inner content.
    #[inline]
    pub fn remove(&mut self) {
        self.start_tag.mutations.remove();
        self.remove_content();
    }

    /// Removes the element, but keeps its content. I.e. remove start and end tags of the element.
    #[inline]
    pub fn remove_and_keep_content(&mut self) {
        self.start_tag.mutations.remove();

        if self.can_have_content {
            self.end_tag_mutations_mut().remove();
        }
    }

    /// Returns `true` if the element has been removed or replaced with some content.
    #[inline]
    pub fn removed(&self) -> bool {
        self.start_tag.mutations.removed()
    }

    fn remove_content(&mut self) {
        if self.can_have_content {
            self.start_tag.mutations.content_after.clear();

            let end_tag_mutations = self.end_tag_mutations_mut();

            end_tag_mutations.content_before.clear();
            end_tag_mutations.remove();

            self.should_remove_content = true;
            self.removed_with_content = true;
        }
    }

    #[inline]
    pub(crate) fn should_remove_content(&self) -> bool {
        self.should_remove_content
    }

    /// Returns the handlers that will be invoked for the element's end tag
    /// in the order they are stored, or `None` if the element can't have
    /// an end tag.
    ///
    /// # Example
    ///
    /// ```
    /// use html_rewriter::html_content::{ContentType, EndTag};
    /// use html_rewriter::{element, rewrite_str, HandlerResult, RewriteStrSettings};
    ///
    /// let html = rewrite_str(
    ///     "<span>Hi</span>",
    ///     RewriteStrSettings {
    ///         element_content_handlers: vec![element!("span", |el| {
    ///             if let Some(handlers) = el.end_tag_handlers() {
    ///                 handlers.push(Box::new(|end: &mut EndTag<'_>| -> HandlerResult {
    ///                     end.after("!", ContentType::Text);
    ///                     Ok(())
    ///                 }));
    ///             }
    ///
    ///             Ok(())
    ///         })],
    ///         ..RewriteStrSettings::new()
    ///     },
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(html, "<span>Hi</span>!");
    /// ```
    #[inline]
    pub fn end_tag_handlers(&mut self) -> Option<&mut Vec<EndTagHandler<'static>>> {
        if self.can_have_content {
            Some(&mut self.end_tag_handlers)
        } else {
            None
        }
    }

    pub(crate) fn into_pending_end_tag(self) -> Option<PendingEndTag> {
        if self.end_tag_mutations.is_none()
            && self.modified_end_tag_name.is_none()
            && self.end_tag_handlers.is_empty()
        {
            return None;
        }

        Some(PendingEndTag {
            mutations: self.end_tag_mutations,
            modified_name: self.modified_end_tag_name,
            handlers: self.end_tag_handlers,
        })
    }
}

impl_user_data!(Element<'_, '_>);
impl_stop_propagation!(Element<'_, '_>);

impl Debug for Element<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag_name", &self.tag_name())
            .field("attributes", &self.attributes())
            .finish()
    }
}

/// Changes requested by the element handlers for the element's end tag.
pub(crate) struct PendingEndTag {
    mutations: Option<Mutations>,
    modified_name: Option<Bytes<'static>>,
    handlers: Vec<EndTagHandler<'static>>,
}

impl PendingEndTag {
    pub fn apply(self, end_tag: &mut EndTag<'_>) -> Result<(), RewritingError> {
        if let Some(name) = self.modified_name {
            end_tag.set_name_raw(name);
        }

        if let Some(mutations) = self.mutations {
            end_tag.mutations = mutations;
        }

        for handler in self.handlers {
            handler(end_tag).map_err(RewritingError::ContentHandlerError)?;

            if end_tag.propagation_stopped() {
                break;
            }
        }

        Ok(())
    }

    /// Emits the content inserted around the end tag for an element that
    /// was closed without one.
    pub fn content_without_end_tag(&self, output_handler: &mut dyn FnMut(&[u8])) {
        if let Some(mutations) = &self.mutations {
            for content in [&mutations.content_before, &mutations.content_after] {
                if !content.is_empty() {
                    output_handler(content);
                }
            }
        }
    }
}
