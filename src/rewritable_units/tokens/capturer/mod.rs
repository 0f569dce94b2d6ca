mod text_decoder;
mod lexeme_capture;

use self::text_decoder::TextDecoder;
use self::lexeme_capture::{capture, Capture};
use super::{TextChunk, Token};
use crate::parser::{Lexeme, TokenOutline};
use crate::rewriter::RewritingError;
use bitflags::bitflags;
use encoding_rs::Encoding;

bitflags! {
    /// Lexemes that should be converted into tokens and passed to the handlers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TokenCaptureFlags: u8 {
        const TEXT = 0b0000_0001;
        const COMMENTS = 0b0000_0010;
        const NEXT_START_TAG = 0b0000_0100;
        const NEXT_END_TAG = 0b0000_1000;
        const DOCTYPES = 0b0001_0000;
    }
}

#[derive(Debug)]
pub enum TokenCapturerEvent<'i> {
    LexemeConsumed,
    TokenProduced(Box<Token<'i>>),
}

pub struct TokenCapturer {
    encoding: &'static Encoding,
    text_decoder: TextDecoder,
    capture_flags: TokenCaptureFlags,
    strict: bool,
}

impl TokenCapturer {
    pub fn new(capture_flags: TokenCaptureFlags, encoding: &'static Encoding, strict: bool) -> Self {
        TokenCapturer {
            encoding,
            text_decoder: TextDecoder::new(encoding, strict),
            capture_flags,
            strict,
        }
    }

    #[inline]
    pub fn set_capture_flags(&mut self, flags: TokenCaptureFlags) {
        self.capture_flags = flags;
    }

    /// Converts the lexeme into tokens if it's captured. `LexemeConsumed` is
    /// reported before any token produced from the lexeme, so the raw bytes
    /// that precede the lexeme can be flushed first.
    pub fn feed<'i>(
        &mut self,
        lexeme: &Lexeme<'i>,
        mut event_handler: impl FnMut(TokenCapturerEvent<'_>) -> Result<(), RewritingError>,
    ) -> Result<(), RewritingError> {
        let encoding = self.encoding;

        match capture(lexeme, &mut self.capture_flags, encoding) {
            Capture::Token(token) => {
                event_handler(TokenCapturerEvent::LexemeConsumed)?;
                event_handler(TokenCapturerEvent::TokenProduced(token))
            }
            Capture::Text {
                text_type,
                last_in_text_node,
            } => {
                event_handler(TokenCapturerEvent::LexemeConsumed)?;

                self.text_decoder.feed_text(
                    &lexeme.raw(),
                    last_in_text_node,
                    &mut |text: &str, last: bool| {
                        event_handler(TokenCapturerEvent::TokenProduced(Box::new(
                            TextChunk::new_token(text, text_type, last, encoding),
                        )))
                    },
                )
            }
            Capture::Skip => match *lexeme.token_outline() {
                // NOTE: in the strict mode the text is validated even if
                // there are no handlers for it.
                TokenOutline::Text {
                    last_in_text_node, ..
                } if self.strict => {
                    self.text_decoder.feed_text(
                        &lexeme.raw(),
                        last_in_text_node,
                        &mut |_: &str, _: bool| Ok(()),
                    )
                }
                // NOTE: the text is not captured anymore, so the bytes
                // pending in the decoder will never be reported.
                TokenOutline::Text { .. } => {
                    self.text_decoder.reset();

                    Ok(())
                }
                _ => Ok(()),
            },
        }
    }
}
