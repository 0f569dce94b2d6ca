use super::outputs::{AttributeOutline, TokenOutline};
use crate::base::{Chunk, Range};
use crate::html::is_html_whitespace;
use memchr::{memchr, memchr2};

/// Result of an attempt to lex markup that starts with a `<`.
#[derive(Debug, PartialEq, Eq)]
pub enum ScanResult {
    Complete { outline: TokenOutline, end: usize },
    /// The `<` starts no markup and should be treated as text.
    NotMarkup,
    /// The markup may continue in the next chunk.
    Incomplete,
}

use ScanResult::*;

const DOCTYPE: &[u8] = b"<!doctype";

#[inline]
fn skip_whitespace(input: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end && is_html_whitespace(input[pos]) {
        pos += 1;
    }

    pos
}

#[inline]
fn find_name_end(input: &[u8], mut pos: usize, extra_delimiter: u8) -> usize {
    while pos < input.len() {
        let ch = input[pos];

        if is_html_whitespace(ch) || ch == b'/' || ch == b'>' || ch == extra_delimiter {
            break;
        }

        pos += 1;
    }

    pos
}

/// Checks whether `input[start..]` is a (possibly ASCII case-insensitive)
/// prefix of `pattern`, which means more bytes are needed to decide.
#[inline]
fn is_partial_match(input: &[u8], start: usize, pattern: &[u8]) -> bool {
    let available = &input[start..];

    available.len() < pattern.len() && available.eq_ignore_ascii_case(&pattern[..available.len()])
}

pub fn scan_markup(input: &Chunk<'_>, start: usize) -> ScanResult {
    debug_assert_eq!(input.get(start), Some(&b'<'));

    let eof = input.is_last();

    let Some(&next) = input.get(start + 1) else {
        return Incomplete;
    };

    match next {
        ch if ch.is_ascii_alphabetic() => scan_tag(input, start, false),
        b'/' => match input.get(start + 2) {
            Some(ch) if ch.is_ascii_alphabetic() => scan_tag(input, start, true),
            Some(b'>') => NotMarkup,
            Some(_) => scan_bogus_comment(input, start, start + 2),
            None => Incomplete,
        },
        b'!' => {
            if input[start..].starts_with(b"<!--") {
                scan_comment(input, start)
            } else if input.len() - start >= DOCTYPE.len()
                && input[start..start + DOCTYPE.len()].eq_ignore_ascii_case(DOCTYPE)
            {
                scan_doctype(input, start)
            } else if !eof
                && (is_partial_match(input, start, b"<!--") || is_partial_match(input, start, DOCTYPE))
            {
                Incomplete
            } else {
                scan_bogus_comment(input, start, start + 2)
            }
        }
        b'?' => scan_bogus_comment(input, start, start + 1),
        _ => NotMarkup,
    }
}

/// Looks for the end tag that closes raw text content, e.g. `</script>`
/// for text inside a `<script>` element.
pub fn scan_appropriate_end_tag(
    input: &Chunk<'_>,
    start: usize,
    end_tag_name: &[u8],
) -> ScanResult {
    let name_start = start + 2;
    let name_end = name_start + end_tag_name.len();

    if input.len() <= name_end {
        let available = &input[start..];
        let mut pattern = b"</".to_vec();

        pattern.extend_from_slice(end_tag_name);

        let is_prefix = available.len() <= pattern.len()
            && available.eq_ignore_ascii_case(&pattern[..available.len()]);

        return if is_prefix { Incomplete } else { NotMarkup };
    }

    let is_appropriate = input[start + 1] == b'/'
        && input[name_start..name_end].eq_ignore_ascii_case(end_tag_name)
        && (matches!(input[name_end], b'/' | b'>') || is_html_whitespace(input[name_end]));

    if is_appropriate {
        scan_tag(input, start, true)
    } else {
        NotMarkup
    }
}

fn scan_tag(input: &Chunk<'_>, start: usize, is_end_tag: bool) -> ScanResult {
    let name_start = start + if is_end_tag { 2 } else { 1 };
    let name_end = find_name_end(input, name_start, b'>');
    let name = Range::new(name_start, name_end);
    let mut attributes = Vec::new();
    let mut self_closing = false;
    let mut pos = name_end;

    let end = loop {
        pos = skip_whitespace(input, pos, input.len());

        let Some(&ch) = input.get(pos) else {
            return Incomplete;
        };

        match ch {
            b'>' => break pos + 1,
            b'/' => match input.get(pos + 1) {
                Some(b'>') => {
                    self_closing = true;
                    break pos + 2;
                }
                Some(_) => pos += 1,
                None => return Incomplete,
            },
            _ => match scan_attribute(input, pos) {
                Some(attribute) => {
                    pos = attribute.raw_range.end;
                    attributes.push(attribute);
                }
                None => return Incomplete,
            },
        }
    };

    let outline = if is_end_tag {
        TokenOutline::EndTag { name }
    } else {
        TokenOutline::StartTag {
            name,
            attributes,
            self_closing,
        }
    };

    Complete { outline, end }
}

fn scan_attribute(input: &[u8], start: usize) -> Option<AttributeOutline> {
    // NOTE: `=` is allowed as the first character of the attribute name.
    let name_end = find_name_end(input, start + 1, b'=');

    if name_end == input.len() {
        return None;
    }

    let name = Range::new(start, name_end);
    let after_name = skip_whitespace(input, name_end, input.len());

    if after_name == input.len() {
        return None;
    }

    if input[after_name] != b'=' {
        return Some(AttributeOutline {
            name,
            value: Range::new(name_end, name_end),
            raw_range: name,
        });
    }

    let value_start = skip_whitespace(input, after_name + 1, input.len());

    let (value, raw_end) = match *input.get(value_start)? {
        quote @ (b'"' | b'\'') => {
            let closing_quote = value_start + 1 + memchr(quote, &input[value_start + 1..])?;

            (
                Range::new(value_start + 1, closing_quote),
                closing_quote + 1,
            )
        }
        b'>' => (Range::new(value_start, value_start), value_start),
        _ => {
            let mut value_end = value_start;

            while value_end < input.len()
                && input[value_end] != b'>'
                && !is_html_whitespace(input[value_end])
            {
                value_end += 1;
            }

            if value_end == input.len() {
                return None;
            }

            (Range::new(value_start, value_end), value_end)
        }
    };

    Some(AttributeOutline {
        name,
        value,
        raw_range: Range::new(start, raw_end),
    })
}

fn scan_comment(input: &Chunk<'_>, start: usize) -> ScanResult {
    let text_start = start + 4;
    let rest = &input[text_start..];

    // NOTE: abrupt closing of empty comments: `<!-->` and `<!--->`.
    if rest.starts_with(b">") {
        return complete_comment(text_start, text_start, text_start + 1);
    } else if rest.starts_with(b"->") {
        return complete_comment(text_start, text_start, text_start + 2);
    }

    let mut pos = text_start;

    while let Some(offset) = memchr(b'-', &input[pos..]) {
        let dash = pos + offset;

        if input[dash..].starts_with(b"-->") {
            return complete_comment(text_start, dash, dash + 3);
        } else if input[dash..].starts_with(b"--!>") {
            return complete_comment(text_start, dash, dash + 4);
        }

        pos = dash + 1;
    }

    if input.is_last() {
        complete_comment(text_start, input.len(), input.len())
    } else {
        Incomplete
    }
}

#[inline]
fn complete_comment(text_start: usize, text_end: usize, end: usize) -> ScanResult {
    Complete {
        outline: TokenOutline::Comment(Range::new(text_start, text_end)),
        end,
    }
}

fn scan_bogus_comment(input: &Chunk<'_>, start: usize, text_start: usize) -> ScanResult {
    debug_assert!(text_start > start);

    match memchr(b'>', &input[text_start..]) {
        Some(offset) => complete_comment(text_start, text_start + offset, text_start + offset + 1),
        None if input.is_last() => complete_comment(text_start, input.len(), input.len()),
        None => Incomplete,
    }
}

fn scan_doctype(input: &Chunk<'_>, start: usize) -> ScanResult {
    let content_start = start + DOCTYPE.len();

    let (content_end, end, unterminated) = match memchr(b'>', &input[content_start..]) {
        Some(offset) => (
            content_start + offset,
            content_start + offset + 1,
            false,
        ),
        None if input.is_last() => (input.len(), input.len(), true),
        None => return Incomplete,
    };

    let mut doctype = DoctypeOutline::parse(input, content_start, content_end);

    doctype.force_quirks |= unterminated;

    Complete {
        outline: TokenOutline::Doctype {
            name: doctype.name,
            public_id: doctype.public_id,
            system_id: doctype.system_id,
            force_quirks: doctype.force_quirks,
        },
        end,
    }
}

#[derive(Default)]
struct DoctypeOutline {
    name: Option<Range>,
    public_id: Option<Range>,
    system_id: Option<Range>,
    force_quirks: bool,
}

impl DoctypeOutline {
    fn parse(input: &[u8], start: usize, end: usize) -> Self {
        let mut doctype = DoctypeOutline::default();
        let mut pos = skip_whitespace(input, start, end);

        if pos == end {
            doctype.force_quirks = true;
            return doctype;
        }

        let name_end = (pos..end)
            .find(|&i| is_html_whitespace(input[i]))
            .unwrap_or(end);

        doctype.name = Some(Range::new(pos, name_end));
        pos = skip_whitespace(input, name_end, end);

        if pos == end {
            return doctype;
        }

        let keyword = &input[pos..end.min(pos + 6)];

        if keyword.eq_ignore_ascii_case(b"public") {
            pos = doctype.parse_identifier(input, pos + 6, end, true);

            if doctype.force_quirks {
                return doctype;
            }

            pos = skip_whitespace(input, pos, end);

            if pos < end && matches!(input[pos], b'"' | b'\'') {
                doctype.parse_identifier(input, pos, end, false);
            }
        } else if keyword.eq_ignore_ascii_case(b"system") {
            doctype.parse_identifier(input, pos + 6, end, false);
        } else {
            doctype.force_quirks = true;
        }

        doctype
    }

    fn parse_identifier(&mut self, input: &[u8], start: usize, end: usize, public: bool) -> usize {
        let pos = skip_whitespace(input, start, end);

        let Some(&quote @ (b'"' | b'\'')) = input[..end].get(pos) else {
            self.force_quirks = true;
            return end;
        };

        let id_start = pos + 1;

        let (id, next) = match memchr2(quote, b'>', &input[id_start..end]) {
            Some(offset) => (Range::new(id_start, id_start + offset), id_start + offset + 1),
            None => {
                self.force_quirks = true;
                (Range::new(id_start, end), end)
            }
        };

        if public {
            self.public_id = Some(id);
        } else {
            self.system_id = Some(id);
        }

        next
    }
}
