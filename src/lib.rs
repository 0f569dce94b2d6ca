//! ***html_rewriter*** is a streaming HTML rewriter with a CSS selector-based API.
//!
//! The input is tokenized as it arrives, matched against the registered
//! selectors and passed to the content handlers. Everything that isn't
//! touched by the handlers is passed through to the output byte for byte,
//! so only the bytes of a single incomplete tag, comment or doctype are
//! buffered between the writes.
//!
//! # Example
//! ```
//! use html_rewriter::{element, HtmlRewriter, Settings};
//!
//! let mut output = vec![];
//!
//! let mut rewriter = HtmlRewriter::new(
//!     Settings {
//!         element_content_handlers: vec![
//!             element!("img[src]", |el| {
//!                 el.set_attribute("loading", "lazy")?;
//!
//!                 Ok(())
//!             })
//!         ],
//!         ..Settings::new()
//!     },
//!     |c: &[u8]| output.extend_from_slice(c)
//! );
//!
//! rewriter.write(b"<p><img src=/a.png></p>").unwrap();
//! rewriter.end().unwrap();
//!
//! drop(rewriter);
//!
//! assert_eq!(
//!     String::from_utf8(output).unwrap(),
//!     r#"<p><img src=/a.png loading="lazy"></p>"#
//! );
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::module_inception)]

#[macro_use]
mod debug_trace;

mod base;
mod html;
mod memory;
mod parser;
mod rewritable_units;
mod rewriter;
mod selectors_vm;
mod transform_stream;

pub use self::rewriter::{
    rewrite_str, CommentHandler, DoctypeHandler, DocumentContentHandlers, ElementContentHandlers,
    ElementHandler, EndHandler, EndTagHandler, HandlerResult, HtmlRewriter, MemorySettings,
    RewriteStrSettings, Settings, StartHandler, TextHandler,
};

pub use self::base::AsciiCompatibleEncoding;
pub use self::rewritable_units::ContentType;
pub use self::selectors_vm::{Selector, SelectorError};
pub use self::transform_stream::{OutputSink, OutputSinkError};

/// Error types.
pub mod errors {
    pub use super::base::EncodingError;
    pub use super::memory::MemoryLimitExceededError;
    pub use super::rewritable_units::{
        AttributeNameError, CommentTextError, TagNameError,
    };
    pub use super::rewriter::{InvalidStateError, RewritingError, TokenizeError};
    pub use super::selectors_vm::SelectorError;
    pub use super::transform_stream::OutputSinkError;
}

pub use self::errors::{InvalidStateError, RewritingError};

/// HTML content descriptors that can be produced and modified by a rewriter.
pub mod html_content {
    pub use super::html::TextType;
    pub use super::rewritable_units::{
        Attribute, Comment, ContentType, Doctype, DocumentEnd, DocumentStart, Element, EndTag,
        StartTag, TextChunk, UserData,
    };
}

#[cfg(test)]
mod test_utils {
    use encoding_rs::*;

    pub static ASCII_COMPATIBLE_ENCODINGS: [&Encoding; 36] = [
        &BIG5_INIT,
        &EUC_JP_INIT,
        &EUC_KR_INIT,
        &GB18030_INIT,
        &GBK_INIT,
        &IBM866_INIT,
        &ISO_8859_2_INIT,
        &ISO_8859_3_INIT,
        &ISO_8859_4_INIT,
        &ISO_8859_5_INIT,
        &ISO_8859_6_INIT,
        &ISO_8859_7_INIT,
        &ISO_8859_8_I_INIT,
        &ISO_8859_8_INIT,
        &ISO_8859_10_INIT,
        &ISO_8859_13_INIT,
        &ISO_8859_14_INIT,
        &ISO_8859_15_INIT,
        &ISO_8859_16_INIT,
        &KOI8_R_INIT,
        &KOI8_U_INIT,
        &MACINTOSH_INIT,
        &SHIFT_JIS_INIT,
        &UTF_8_INIT,
        &WINDOWS_874_INIT,
        &WINDOWS_1250_INIT,
        &WINDOWS_1251_INIT,
        &WINDOWS_1252_INIT,
        &WINDOWS_1253_INIT,
        &WINDOWS_1254_INIT,
        &WINDOWS_1255_INIT,
        &WINDOWS_1256_INIT,
        &WINDOWS_1257_INIT,
        &WINDOWS_1258_INIT,
        &X_MAC_CYRILLIC_INIT,
        &X_USER_DEFINED_INIT,
    ];

    /// Accumulates the rewriter output and decodes it from the document encoding.
    pub struct Output {
        bytes: Vec<u8>,
        encoding: &'static Encoding,
    }

    impl Output {
        pub fn new(encoding: &'static Encoding) -> Self {
            Output {
                bytes: Vec::default(),
                encoding,
            }
        }

        pub fn push(&mut self, chunk: &[u8]) {
            assert!(!chunk.is_empty(), "Empty chunk has been passed to the output sink");

            self.bytes.extend_from_slice(chunk);
        }
    }

    impl From<Output> for String {
        fn from(output: Output) -> String {
            output
                .encoding
                .decode_without_bom_handling(&output.bytes)
                .0
                .into_owned()
        }
    }
}
