mod lexer;
mod outputs;
mod tree_builder_simulator;

use self::lexer::{scan_appropriate_end_tag, scan_markup, ScanResult};
use self::tree_builder_simulator::TreeBuilderSimulator;
use crate::base::{Chunk, Range};
use crate::html::{LocalName, TextType};
use crate::rewriter::RewritingError;
use memchr::memchr;

pub use self::outputs::{AttributeOutline, Lexeme, TokenOutline};

pub trait LexemeSink {
    fn handle_lexeme(&mut self, lexeme: &Lexeme<'_>) -> Result<(), RewritingError>;
}

/// Incremental HTML tokenizer.
///
/// Every call to [`parse`](Parser::parse) consumes the input window and
/// returns the number of trailing bytes that form an incomplete lexical unit.
/// Those bytes must be prepended to the next window: the parser restarts the
/// unit from its first byte.
#[derive(Debug)]
pub struct Parser {
    text_type: TextType,
    appropriate_end_tag_name: Vec<u8>,
    text_run_open: bool,
    tree_builder_simulator: TreeBuilderSimulator,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            text_type: TextType::Data,
            appropriate_end_tag_name: Vec::new(),
            text_run_open: false,
            tree_builder_simulator: TreeBuilderSimulator::default(),
        }
    }

    pub fn parse(
        &mut self,
        input: &Chunk<'_>,
        sink: &mut impl LexemeSink,
    ) -> Result<usize, RewritingError> {
        let mut text_start = 0;
        let mut search_pos = 0;

        loop {
            let markup_start = if self.text_type == TextType::PlainText {
                None
            } else {
                memchr(b'<', &input[search_pos..]).map(|offset| search_pos + offset)
            };

            let Some(markup_start) = markup_start else {
                let text = Range::new(text_start, input.len());

                self.emit_text(input, text, input.is_last(), sink)?;
                break;
            };

            let scan_result = if self.text_type.ends_with_appropriate_end_tag() {
                scan_appropriate_end_tag(input, markup_start, &self.appropriate_end_tag_name)
            } else {
                scan_markup(input, markup_start)
            };

            match scan_result {
                ScanResult::Complete { outline, end } => {
                    self.emit_text(input, Range::new(text_start, markup_start), true, sink)?;
                    self.adjust_text_type(input, &outline);

                    let lexeme = Lexeme::new(input, outline, Range::new(markup_start, end));

                    trace!(@lexeme lexeme);

                    sink.handle_lexeme(&lexeme)?;

                    text_start = end;
                    search_pos = end;
                }
                ScanResult::NotMarkup => search_pos = markup_start + 1,
                ScanResult::Incomplete if input.is_last() => {
                    // NOTE: markup that is left unterminated at the end of
                    // the input is emitted as text together with everything
                    // that follows it.
                    let text = Range::new(text_start, input.len());

                    self.emit_text(input, text, true, sink)?;
                    break;
                }
                ScanResult::Incomplete => {
                    self.emit_text(input, Range::new(text_start, markup_start), false, sink)?;

                    return Ok(input.len() - markup_start);
                }
            }
        }

        if input.is_last() {
            let eof = Lexeme::new(
                input,
                TokenOutline::Eof,
                Range::new(input.len(), input.len()),
            );

            trace!(@lexeme eof);

            sink.handle_lexeme(&eof)?;
        }

        Ok(0)
    }

    fn emit_text(
        &mut self,
        input: &Chunk<'_>,
        range: Range,
        last_in_text_node: bool,
        sink: &mut impl LexemeSink,
    ) -> Result<(), RewritingError> {
        // NOTE: an empty text lexeme is produced only to finish a text run
        // that was interrupted by the end of the previous chunk.
        if range.is_empty() && !(last_in_text_node && self.text_run_open) {
            return Ok(());
        }

        let lexeme = Lexeme::new(
            input,
            TokenOutline::Text {
                text_type: self.text_type,
                last_in_text_node,
            },
            range,
        );

        trace!(@lexeme lexeme);

        self.text_run_open = !last_in_text_node;

        sink.handle_lexeme(&lexeme)
    }

    fn adjust_text_type(&mut self, input: &Chunk<'_>, outline: &TokenOutline) {
        match *outline {
            TokenOutline::StartTag {
                name, self_closing, ..
            } => {
                let local_name = LocalName::new(input, name);

                if let Some(text_type) = self
                    .tree_builder_simulator
                    .get_feedback_for_start_tag(&local_name, self_closing)
                {
                    self.text_type = text_type;
                    self.appropriate_end_tag_name = local_name.as_bytes().to_ascii_lowercase();
                }
            }
            TokenOutline::EndTag { name } => {
                // NOTE: in raw text modes the only end tag the lexer
                // recognises is the one that finishes raw text.
                self.text_type = TextType::Data;

                self.tree_builder_simulator
                    .get_feedback_for_end_tag(&LocalName::new(input, name));
            }
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct LexemeCollector(Vec<String>);

    impl LexemeSink for LexemeCollector {
        fn handle_lexeme(&mut self, lexeme: &Lexeme<'_>) -> Result<(), RewritingError> {
            let raw = lexeme.raw().as_debug_string();

            self.0.push(match lexeme.token_outline() {
                TokenOutline::Text {
                    last_in_text_node, ..
                } => format!("Text({raw:?}, {last_in_text_node})"),
                TokenOutline::Comment(_) => format!("Comment({raw:?})"),
                TokenOutline::StartTag { .. } => format!("StartTag({raw:?})"),
                TokenOutline::EndTag { .. } => format!("EndTag({raw:?})"),
                TokenOutline::Doctype { .. } => format!("Doctype({raw:?})"),
                TokenOutline::Eof => "Eof".into(),
            });

            Ok(())
        }
    }

    fn parse_chunks(chunks: &[&str]) -> (Vec<String>, Vec<usize>) {
        let mut parser = Parser::new();
        let mut collector = LexemeCollector::default();
        let mut blocked = Vec::new();
        let mut carried = Vec::new();

        for (i, chunk) in chunks.iter().enumerate() {
            let mut data = std::mem::take(&mut carried);

            data.extend_from_slice(chunk.as_bytes());

            let input = if i == chunks.len() - 1 {
                Chunk::last(&data)
            } else {
                Chunk::new(&data)
            };

            let blocked_byte_count = parser.parse(&input, &mut collector).unwrap();

            carried = data[data.len() - blocked_byte_count..].to_vec();
            blocked.push(blocked_byte_count);
        }

        (collector.0, blocked)
    }

    #[test]
    fn whole_document() {
        let (lexemes, _) =
            parse_chunks(&["<!doctype html><!-- c --><p class=x>Hello &amp; bye</p>"]);

        assert_eq!(
            lexemes,
            [
                r#"Doctype("<!doctype html>")"#,
                r#"Comment("<!-- c -->")"#,
                r#"StartTag("<p class=x>")"#,
                r#"Text("Hello &amp; bye", true)"#,
                r#"EndTag("</p>")"#,
                "Eof",
            ]
        );
    }

    #[test]
    fn blocked_bytes_are_relexed() {
        let (lexemes, blocked) = parse_chunks(&["abc<di", "v>x", ""]);

        assert_eq!(blocked, [3, 0, 0]);
        assert_eq!(
            lexemes,
            [
                r#"Text("abc", false)"#,
                r#"Text("", true)"#,
                r#"StartTag("<div>")"#,
                r#"Text("x", false)"#,
                r#"Text("", true)"#,
                "Eof",
            ]
        );
    }

    #[test]
    fn lt_that_is_not_markup_continues_text() {
        let (lexemes, _) = parse_chunks(&["a < b <", "= c"]);

        assert_eq!(
            lexemes,
            [
                r#"Text("a < b ", false)"#,
                r#"Text("<= c", true)"#,
                "Eof",
            ]
        );
    }

    #[test]
    fn raw_text() {
        let (lexemes, _) = parse_chunks(&["<script>if (a<b) { x = '</div>' }</scr", "ipt>"]);

        assert_eq!(
            lexemes,
            [
                r#"StartTag("<script>")"#,
                r#"Text("if (a<b) { x = '</div>' }", false)"#,
                r#"Text("", true)"#,
                r#"EndTag("</script>")"#,
                "Eof",
            ]
        );
    }

    #[test]
    fn self_closing_script_doesnt_switch_text_type() {
        let (lexemes, _) = parse_chunks(&["<script/><b>"]);

        assert_eq!(
            lexemes,
            [r#"StartTag("<script/>")"#, r#"StartTag("<b>")"#, "Eof"]
        );
    }

    #[test]
    fn plaintext() {
        let (lexemes, _) = parse_chunks(&["<plaintext><b>", "</plaintext>"]);

        assert_eq!(
            lexemes,
            [
                r#"StartTag("<plaintext>")"#,
                r#"Text("<b>", false)"#,
                r#"Text("</plaintext>", true)"#,
                "Eof",
            ]
        );
    }

    #[test]
    fn unterminated_markup_at_end_of_input() {
        let (lexemes, _) = parse_chunks(&["text<div class=", "\"foo"]);

        assert_eq!(
            lexemes,
            [
                r#"Text("text", false)"#,
                r#"Text("<div class=\"foo", true)"#,
                "Eof",
            ]
        );

        let (lexemes, _) = parse_chunks(&["<!-- never", " closed"]);

        assert_eq!(lexemes, [r#"Comment("<!-- never closed")"#, "Eof"]);
    }
}
