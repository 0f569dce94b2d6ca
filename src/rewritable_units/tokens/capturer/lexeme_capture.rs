use super::TokenCaptureFlags;
use crate::html::TextType;
use crate::parser::{Lexeme, TokenOutline};
use crate::rewritable_units::{Attributes, Comment, Doctype, EndTag, StartTag, Token};
use encoding_rs::Encoding;

pub(crate) enum Capture<'l> {
    Token(Box<Token<'l>>),
    // NOTE: text is decoded by the capturer, since a character can be split
    // between two text lexemes.
    Text {
        text_type: TextType,
        last_in_text_node: bool,
    },
    Skip,
}

impl TokenCaptureFlags {
    /// Tag flags are one-shot: they are cleared once the tag they were set for is seen.
    #[inline]
    fn take(&mut self, flag: TokenCaptureFlags) -> bool {
        let is_set = self.contains(flag);

        self.remove(flag);

        is_set
    }
}

pub(crate) fn capture<'l>(
    lexeme: &'l Lexeme<'_>,
    flags: &mut TokenCaptureFlags,
    encoding: &'static Encoding,
) -> Capture<'l> {
    let token = match *lexeme.token_outline() {
        TokenOutline::Text {
            text_type,
            last_in_text_node,
        } => {
            return if flags.contains(TokenCaptureFlags::TEXT) {
                Capture::Text {
                    text_type,
                    last_in_text_node,
                }
            } else {
                Capture::Skip
            };
        }
        TokenOutline::StartTag {
            name,
            ref attributes,
            self_closing,
        } if flags.take(TokenCaptureFlags::NEXT_START_TAG) => StartTag::new_token(
            lexeme.part(name),
            Attributes::new(lexeme.input(), attributes, encoding),
            self_closing,
            lexeme.raw(),
            encoding,
        ),
        TokenOutline::EndTag { name } if flags.take(TokenCaptureFlags::NEXT_END_TAG) => {
            EndTag::new_token(lexeme.part(name), lexeme.raw(), encoding)
        }
        TokenOutline::Comment(text) if flags.contains(TokenCaptureFlags::COMMENTS) => {
            Comment::new_token(lexeme.part(text), lexeme.raw(), encoding)
        }
        TokenOutline::Doctype {
            name,
            public_id,
            system_id,
            force_quirks,
        } if flags.contains(TokenCaptureFlags::DOCTYPES) => Doctype::new_token(
            lexeme.opt_part(name),
            lexeme.opt_part(public_id),
            lexeme.opt_part(system_id),
            force_quirks,
            lexeme.raw(),
            encoding,
        ),
        _ => return Capture::Skip,
    };

    Capture::Token(Box::new(token))
}
