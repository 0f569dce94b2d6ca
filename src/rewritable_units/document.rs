use super::mutations::content_to_bytes;
use super::ContentType;
use encoding_rs::Encoding;

/// A rewritable unit that represents the start of the document.
///
/// Document start handlers are invoked once, when the rewriter starts
/// streaming and before any input has been processed.
pub struct DocumentStart<'a> {
    output_handler: &'a mut dyn FnMut(&[u8]),
    encoding: &'static Encoding,
}

impl<'a> DocumentStart<'a> {
    pub(crate) fn new(output_handler: &'a mut dyn FnMut(&[u8]), encoding: &'static Encoding) -> Self {
        DocumentStart {
            output_handler,
            encoding,
        }
    }

    /// Inserts `content` before the document's markup.
    ///
    /// Consequent calls to the method append `content` to the previously inserted content.
    ///
    /// # Example
    ///
    /// ```
    /// use html_rewriter::{rewrite_str, start, ContentType, RewriteStrSettings};
    ///
    /// let html = rewrite_str(
    ///     "<html></html>",
    ///     RewriteStrSettings {
    ///         document_content_handlers: vec![start!(|start| {
    ///             start.before("<!doctype html>", ContentType::Html);
    ///             Ok(())
    ///         })],
    ///         ..RewriteStrSettings::new()
    ///     },
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(html, "<!doctype html><html></html>");
    /// ```
    #[inline]
    pub fn before(&mut self, content: &str, content_type: ContentType) {
        content_to_bytes(content, content_type, self.encoding, &mut *self.output_handler);
    }
}

/// A rewritable unit that represents the end of the document.
///
/// This exposes the [append](#method.append) function that can be used to append content at the
/// end of the document. The content will only be appended after the rewriter has finished processing
/// the final chunk.
pub struct DocumentEnd<'a> {
    output_handler: &'a mut dyn FnMut(&[u8]),
    encoding: &'static Encoding,
}

impl<'a> DocumentEnd<'a> {
    pub(crate) fn new(output_handler: &'a mut dyn FnMut(&[u8]), encoding: &'static Encoding) -> Self {
        DocumentEnd {
            output_handler,
            encoding,
        }
    }

    /// Appends `content` at the end of the document.
    ///
    /// Subsequent calls to this method append `content` to the previously inserted content.
    ///
    /// # Example
    ///
    /// ```
    /// use html_rewriter::{end, rewrite_str, ContentType, RewriteStrSettings};
    ///
    /// let html = rewrite_str(
    ///     r#"<div id="foo"><!-- content --></div><img>"#,
    ///     RewriteStrSettings {
    ///         document_content_handlers: vec![end!(|end| {
    ///             end.append("<bar>", ContentType::Html);
    ///             end.append("<baz>", ContentType::Text);
    ///             Ok(())
    ///         })],
    ///         ..RewriteStrSettings::new()
    ///     },
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(html, r#"<div id="foo"><!-- content --></div><img><bar>&lt;baz&gt;"#);
    /// ```
    #[inline]
    pub fn append(&mut self, content: &str, content_type: ContentType) {
        content_to_bytes(content, content_type, self.encoding, &mut *self.output_handler);
    }
}
