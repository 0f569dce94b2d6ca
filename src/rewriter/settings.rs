use crate::base::AsciiCompatibleEncoding;
use crate::rewritable_units::{
    Comment, Doctype, DocumentEnd, DocumentStart, Element, EndTag, TextChunk,
};
use crate::selectors_vm::Selector;
use std::borrow::Cow;
use std::error::Error;

/// The result of a content handler. An error returned by a handler stops
/// the rewriting and is returned from [`HtmlRewriter::write`] or
/// [`HtmlRewriter::end`] wrapped in [`RewritingError::ContentHandlerError`].
///
/// [`HtmlRewriter::write`]: ../struct.HtmlRewriter.html#method.write
/// [`HtmlRewriter::end`]: ../struct.HtmlRewriter.html#method.end
/// [`RewritingError::ContentHandlerError`]: ../enum.RewritingError.html#variant.ContentHandlerError
pub type HandlerResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Handler for the [document type declaration].
///
/// [document type declaration]: https://developer.mozilla.org/en-US/docs/Glossary/Doctype
pub type DoctypeHandler<'h> = Box<dyn FnMut(&mut Doctype<'_>) -> HandlerResult + 'h>;
/// Handler for HTML comments.
pub type CommentHandler<'h> = Box<dyn FnMut(&mut Comment<'_>) -> HandlerResult + 'h>;
/// Handler for text chunks present the HTML.
pub type TextHandler<'h> = Box<dyn FnMut(&mut TextChunk<'_>) -> HandlerResult + 'h>;
/// Handler for elements matched by a selector.
pub type ElementHandler<'h> = Box<dyn FnMut(&mut Element<'_, '_>) -> HandlerResult + 'h>;
/// Handler for an end tag.
pub type EndTagHandler<'h> = Box<dyn FnOnce(&mut EndTag<'_>) -> HandlerResult + 'h>;
/// Handler for the start of the document, invoked before any content is produced.
pub type StartHandler<'h> = Box<dyn FnOnce(&mut DocumentStart<'_>) -> HandlerResult + 'h>;
/// Handler for the end of the document.
pub type EndHandler<'h> = Box<dyn FnOnce(&mut DocumentEnd<'_>) -> HandlerResult + 'h>;

/// Specifies element content handlers associated with a selector.
#[derive(Default)]
pub struct ElementContentHandlers<'h> {
    pub(super) element: Option<ElementHandler<'h>>,
    pub(super) comments: Option<CommentHandler<'h>>,
    pub(super) text: Option<TextHandler<'h>>,
}

impl<'h> ElementContentHandlers<'h> {
    /// Sets a handler for elements matched by a selector.
    #[inline]
    pub fn element(
        mut self,
        handler: impl FnMut(&mut Element<'_, '_>) -> HandlerResult + 'h,
    ) -> Self {
        self.element = Some(Box::new(handler));

        self
    }

    /// Sets a handler for HTML comments in the inner content of elements matched by a selector.
    #[inline]
    pub fn comments(mut self, handler: impl FnMut(&mut Comment<'_>) -> HandlerResult + 'h) -> Self {
        self.comments = Some(Box::new(handler));

        self
    }

    /// Sets a handler for text chunks in the inner content of elements matched by a selector.
    #[inline]
    pub fn text(mut self, handler: impl FnMut(&mut TextChunk<'_>) -> HandlerResult + 'h) -> Self {
        self.text = Some(Box::new(handler));

        self
    }
}

/// Specifies document-level content handlers.
///
/// Some content can't be captured by CSS selectors as it lays outside of content of any
/// of the HTML elements. Document-level handlers allow capture such a content:
///
/// ```html
/// <!doctype html>
/// <!--
///     I can't be captured with a selector, but I can be
///     captured with a document-level comment handler
/// -->
/// <html>
/// <!-- I can be captured with a selector -->
/// </html>
/// ```
#[derive(Default)]
pub struct DocumentContentHandlers<'h> {
    pub(super) doctype: Option<DoctypeHandler<'h>>,
    pub(super) comments: Option<CommentHandler<'h>>,
    pub(super) text: Option<TextHandler<'h>>,
    pub(super) start: Option<StartHandler<'h>>,
    pub(super) end: Option<EndHandler<'h>>,
}

impl<'h> DocumentContentHandlers<'h> {
    /// Sets a handler for the [document type declaration].
    ///
    /// [document type declaration]: https://developer.mozilla.org/en-US/docs/Glossary/Doctype
    #[inline]
    pub fn doctype(mut self, handler: impl FnMut(&mut Doctype<'_>) -> HandlerResult + 'h) -> Self {
        self.doctype = Some(Box::new(handler));

        self
    }

    /// Sets a handler for all HTML comments present in the input HTML markup.
    #[inline]
    pub fn comments(mut self, handler: impl FnMut(&mut Comment<'_>) -> HandlerResult + 'h) -> Self {
        self.comments = Some(Box::new(handler));

        self
    }

    /// Sets a handler for all text chunks present in the input HTML markup.
    #[inline]
    pub fn text(mut self, handler: impl FnMut(&mut TextChunk<'_>) -> HandlerResult + 'h) -> Self {
        self.text = Some(Box::new(handler));

        self
    }

    /// Sets a handler for the start of the document.
    ///
    /// The handler is ignored if it's registered after the rewriter has started.
    #[inline]
    pub fn start(
        mut self,
        handler: impl FnOnce(&mut DocumentStart<'_>) -> HandlerResult + 'h,
    ) -> Self {
        self.start = Some(Box::new(handler));

        self
    }

    /// Sets a handler for the end of the document.
    #[inline]
    pub fn end(mut self, handler: impl FnOnce(&mut DocumentEnd<'_>) -> HandlerResult + 'h) -> Self {
        self.end = Some(Box::new(handler));

        self
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __element_content_handler {
    ($selector:expr, $handler_name:ident, $handler:expr) => {
        (
            ::std::borrow::Cow::Owned($selector.parse::<$crate::Selector>().unwrap()),
            $crate::ElementContentHandlers::default().$handler_name($handler),
        )
    };
}

/// A convenience macro to construct a rewriting handler for elements that can be matched by the
/// specified CSS selector.
///
/// # Example
/// ```
/// use html_rewriter::{rewrite_str, element, RewriteStrSettings};
///
/// let html = rewrite_str(
///     r#"<span id="foo"></span>"#,
///     RewriteStrSettings {
///         element_content_handlers: vec![
///             element!("#foo", |el| {
///                 el.set_attribute("class", "bar").unwrap();
///                 Ok(())
///             })
///         ],
///         ..RewriteStrSettings::new()
///     }
/// ).unwrap();
///
/// assert_eq!(html, r#"<span id="foo" class="bar"></span>"#);
/// ```
///
/// # Panics
///
/// Panics if the selector is invalid.
#[macro_export]
macro_rules! element {
    ($selector:expr, $handler:expr) => {
        $crate::__element_content_handler!($selector, element, $handler)
    };
}

/// A convenience macro to construct a rewriting handler for the text chunks in the inner content
/// of elements that can be matched by the specified CSS selector.
///
/// # Panics
///
/// Panics if the selector is invalid.
#[macro_export]
macro_rules! text {
    ($selector:expr, $handler:expr) => {
        $crate::__element_content_handler!($selector, text, $handler)
    };
}

/// A convenience macro to construct a rewriting handler for HTML comments in the inner content of
/// elements that can be matched by the specified CSS selector.
///
/// # Example
/// ```
/// use html_rewriter::{rewrite_str, comments, RewriteStrSettings};
///
/// let html = rewrite_str(
///     r#"<span><!-- 42 --></span>"#,
///     RewriteStrSettings {
///         element_content_handlers: vec![
///             comments!("span", |c| {
///                 c.set_text("Hello!").unwrap();
///                 Ok(())
///             })
///         ],
///         ..RewriteStrSettings::new()
///     }
/// ).unwrap();
///
/// assert_eq!(html, r#"<span><!--Hello!--></span>"#);
/// ```
///
/// # Panics
///
/// Panics if the selector is invalid.
#[macro_export]
macro_rules! comments {
    ($selector:expr, $handler:expr) => {
        $crate::__element_content_handler!($selector, comments, $handler)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __document_content_handler {
    ($handler_name:ident, $handler:expr) => {
        $crate::DocumentContentHandlers::default().$handler_name($handler)
    };
}

/// A convenience macro to construct a rewriting handler for the [document type declaration].
///
/// [document type declaration]: https://developer.mozilla.org/en-US/docs/Glossary/Doctype
#[macro_export]
macro_rules! doctype {
    ($handler:expr) => {
        $crate::__document_content_handler!(doctype, $handler)
    };
}

/// A convenience macro to construct a rewriting handler for all text chunks in the HTML document.
#[macro_export]
macro_rules! doc_text {
    ($handler:expr) => {
        $crate::__document_content_handler!(text, $handler)
    };
}

/// A convenience macro to construct a rewriting handler for all HTML comments in the HTML document.
#[macro_export]
macro_rules! doc_comments {
    ($handler:expr) => {
        $crate::__document_content_handler!(comments, $handler)
    };
}

/// A convenience macro to construct a handler for the start of the document.
#[macro_export]
macro_rules! start {
    ($handler:expr) => {
        $crate::__document_content_handler!(start, $handler)
    };
}

/// A convenience macro to construct a handler for the end of the document.
#[macro_export]
macro_rules! end {
    ($handler:expr) => {
        $crate::__document_content_handler!(end, $handler)
    };
}

/// Specifies the memory settings for [`HtmlRewriter`].
///
/// [`HtmlRewriter`]: struct.HtmlRewriter.html
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySettings {
    /// Specifies the number of bytes that should be preallocated on [`HtmlRewriter`] instantiation
    /// for the internal parsing buffer.
    ///
    /// In some cases (e.g. when rewriter encounters a start tag represented by two or more input
    /// chunks) the rewriter needs to buffer input content.
    ///
    /// Internal parsing buffer is used in such situations. Larger values of the setting decrease
    /// the number of reallocations, at the cost of the rewriter memory footprint.
    ///
    /// ### Default
    ///
    /// `1024` bytes.
    ///
    /// [`HtmlRewriter`]: struct.HtmlRewriter.html
    pub preallocated_parsing_buffer_size: usize,

    /// Sets a hard limit in bytes on the amount of memory that can be used by the parsing buffer.
    ///
    /// Exceeding the limit causes a [`MemoryLimitExceeded`] error during rewriting.
    ///
    /// ### Default
    ///
    /// [`std::usize::MAX`] (i.e. no limit).
    ///
    /// [`MemoryLimitExceeded`]: errors/enum.RewritingError.html#variant.MemoryLimitExceeded
    /// [`std::usize::MAX`]: https://doc.rust-lang.org/std/usize/constant.MAX.html
    pub max_allowed_memory_usage: usize,
}

impl Default for MemorySettings {
    #[inline]
    fn default() -> Self {
        MemorySettings {
            preallocated_parsing_buffer_size: 1024,
            max_allowed_memory_usage: usize::MAX,
        }
    }
}

/// Specifies settings for [`HtmlRewriter`].
///
/// [`HtmlRewriter`]: struct.HtmlRewriter.html
pub struct Settings<'h, 's> {
    /// Specifies CSS selectors and rewriting handlers for elements and their inner content.
    ///
    /// ### Hint
    ///
    /// [`element`], [`comments`] and [`text`] convenience macros can be used to construct a
    /// `(Selector, ElementContentHandlers)` tuple.
    ///
    /// ### Default
    ///
    /// An empty [`Vec`].
    ///
    /// [`element`]: macro.element.html
    /// [`comments`]: macro.comments.html
    /// [`text`]: macro.text.html
    pub element_content_handlers: Vec<(Cow<'s, Selector>, ElementContentHandlers<'h>)>,

    /// Specifies rewriting handlers for the content without associating it to a particular
    /// CSS selector.
    ///
    /// ### Hint
    ///
    /// [`doctype`], [`doc_comments`], [`doc_text`], [`start`] and [`end`] convenience macros
    /// can be used to construct a [`DocumentContentHandlers`] instance.
    ///
    /// ### Default
    ///
    /// An empty [`Vec`].
    ///
    /// [`doctype`]: macro.doctype.html
    /// [`doc_comments`]: macro.doc_comments.html
    /// [`doc_text`]: macro.doc_text.html
    /// [`start`]: macro.start.html
    /// [`end`]: macro.end.html
    pub document_content_handlers: Vec<DocumentContentHandlers<'h>>,

    /// Specifies the [character encoding] for the input and the output of the rewriter.
    ///
    /// Can be a [label] for any of the web-compatible encodings with an exception for `UTF-16LE`,
    /// `UTF-16BE`, `ISO-2022-JP` and `replacement` (these non-ASCII-compatible encodings
    /// are not supported).
    ///
    /// ### Default
    ///
    /// `"utf-8"`
    ///
    /// [character encoding]: https://developer.mozilla.org/en-US/docs/Web/API/Encoding_API/Encodings
    /// [label]: https://encoding.spec.whatwg.org/#names-and-labels
    pub encoding: AsciiCompatibleEncoding,

    /// Specifies the memory settings.
    pub memory_settings: MemorySettings,

    /// If set to `true` the rewriter fails with [`TokenizeError::MalformedByteSequence`] on
    /// text that is not valid in the document's encoding, instead of replacing it with
    /// `U+FFFD` in the text seen by the handlers.
    ///
    /// ### Default
    ///
    /// `false`
    ///
    /// [`TokenizeError::MalformedByteSequence`]: errors/enum.TokenizeError.html
    pub strict: bool,

    /// The number of bytes the rewriter accumulates before passing them to the output sink.
    /// The accumulated bytes are also flushed at the end of every `write` and `end` call.
    ///
    /// ### Default
    ///
    /// `1024` bytes.
    pub output_buffer_capacity: usize,
}

impl Default for Settings<'_, '_> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Settings<'_, '_> {
    /// Creates [`Settings`] for non-streaming HTML rewriting. Equivalent to [`Default`].
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Settings {
            element_content_handlers: vec![],
            document_content_handlers: vec![],
            encoding: AsciiCompatibleEncoding::utf_8(),
            memory_settings: MemorySettings::default(),
            strict: false,
            output_buffer_capacity: 1024,
        }
    }
}

impl<'h, 's> From<RewriteStrSettings<'h, 's>> for Settings<'h, 's> {
    #[inline]
    fn from(settings: RewriteStrSettings<'h, 's>) -> Self {
        Settings {
            element_content_handlers: settings.element_content_handlers,
            document_content_handlers: settings.document_content_handlers,
            strict: settings.strict,
            ..Settings::new()
        }
    }
}

/// Specifies settings for the [`rewrite_str`] function.
///
/// [`rewrite_str`]: fn.rewrite_str.html
pub struct RewriteStrSettings<'h, 's> {
    /// See [`Settings::element_content_handlers`](Settings::element_content_handlers).
    pub element_content_handlers: Vec<(Cow<'s, Selector>, ElementContentHandlers<'h>)>,

    /// See [`Settings::document_content_handlers`](Settings::document_content_handlers).
    pub document_content_handlers: Vec<DocumentContentHandlers<'h>>,

    /// See [`Settings::strict`](Settings::strict).
    pub strict: bool,
}

impl Default for RewriteStrSettings<'_, '_> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteStrSettings<'_, '_> {
    /// Creates [`RewriteStrSettings`]. Equivalent to [`Default`].
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        RewriteStrSettings {
            element_content_handlers: vec![],
            document_content_handlers: vec![],
            strict: false,
        }
    }
}
