use crate::base::{Bytes, Chunk, Range};
use crate::html::TextType;
use std::fmt::{self, Debug, Write};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AttributeOutline {
    pub name: Range,
    pub value: Range,
    pub raw_range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutline {
    Text {
        text_type: TextType,
        last_in_text_node: bool,
    },

    Comment(Range),

    StartTag {
        name: Range,
        attributes: Vec<AttributeOutline>,
        self_closing: bool,
    },

    EndTag {
        name: Range,
    },

    Doctype {
        name: Option<Range>,
        public_id: Option<Range>,
        system_id: Option<Range>,
        force_quirks: bool,
    },

    Eof,
}

/// Token outline accompanied by the input window it points into.
pub struct Lexeme<'i> {
    input: &'i Chunk<'i>,
    raw_range: Range,
    token_outline: TokenOutline,
}

impl<'i> Lexeme<'i> {
    #[inline]
    pub fn new(input: &'i Chunk<'i>, token_outline: TokenOutline, raw_range: Range) -> Self {
        Lexeme {
            input,
            raw_range,
            token_outline,
        }
    }

    #[inline]
    pub fn input(&self) -> &'i Chunk<'i> {
        self.input
    }

    #[inline]
    pub fn token_outline(&self) -> &TokenOutline {
        &self.token_outline
    }

    #[inline]
    pub fn raw_range(&self) -> Range {
        self.raw_range
    }

    #[inline]
    pub fn part(&self, range: Range) -> Bytes<'i> {
        self.input.slice(range)
    }

    #[inline]
    pub fn opt_part(&self, range: Option<Range>) -> Option<Bytes<'i>> {
        self.input.opt_slice(range)
    }

    #[inline]
    pub fn raw(&self) -> Bytes<'i> {
        self.input.slice(self.raw_range)
    }
}

impl Debug for Lexeme<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("Lexeme");
        let mut pretty_raw = String::new();

        write!(
            pretty_raw,
            "|{}|{}|{}|",
            self.raw_range.start,
            self.raw().as_debug_string(),
            self.raw_range.end
        )?;

        builder
            .field("raw", &format_args!("`{pretty_raw}`"))
            .field("token_outline", &self.token_outline)
            .finish()
    }
}
