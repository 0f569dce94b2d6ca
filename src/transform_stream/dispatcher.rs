use super::output_buffer::{OutputBuffer, OutputSink};
use crate::base::{Chunk, Range};
use crate::html::LocalName;
use crate::parser::{AttributeOutline, Lexeme, LexemeSink, TokenOutline};
use crate::rewritable_units::{Serialize, Token, TokenCaptureFlags, TokenCapturer, TokenCapturerEvent};
use crate::rewriter::RewritingError;
use encoding_rs::Encoding;

/// Start tag details required for the selector matching.
pub struct AuxStartTagInfo<'i> {
    pub input: &'i Chunk<'i>,
    pub attributes: &'i [AttributeOutline],
    pub self_closing: bool,
}

pub trait TransformController: Sized {
    /// Capture flags for the content outside of tag handling: used when the
    /// stream starts and when handlers are added mid-stream.
    fn capture_flags(&self) -> TokenCaptureFlags;

    fn handle_start(
        &mut self,
        output_handler: &mut dyn FnMut(&[u8]),
    ) -> Result<(), RewritingError>;

    fn handle_start_tag(
        &mut self,
        name: LocalName<'_>,
        aux_info: AuxStartTagInfo<'_>,
    ) -> TokenCaptureFlags;

    /// Content of the elements that are closed implicitly by the end tag
    /// goes to the `output_handler`.
    fn handle_end_tag(
        &mut self,
        name: LocalName<'_>,
        output_handler: &mut dyn FnMut(&[u8]),
    ) -> TokenCaptureFlags;

    fn handle_token(&mut self, token: &mut Token<'_>) -> Result<(), RewritingError>;

    fn handle_end(&mut self, output_handler: &mut dyn FnMut(&[u8]))
        -> Result<(), RewritingError>;

    fn should_emit_content(&self) -> bool;
}

pub struct Dispatcher<C, O>
where
    C: TransformController,
    O: OutputSink,
{
    transform_controller: C,
    output: OutputBuffer<O>,
    last_consumed_lexeme_end: usize,
    token_capturer: TokenCapturer,
}

impl<C, O> Dispatcher<C, O>
where
    C: TransformController,
    O: OutputSink,
{
    pub fn new(
        transform_controller: C,
        output_sink: O,
        output_buffer_capacity: usize,
        encoding: &'static Encoding,
        strict: bool,
    ) -> Self {
        let initial_capture_flags = transform_controller.capture_flags();

        Dispatcher {
            transform_controller,
            output: OutputBuffer::new(output_sink, output_buffer_capacity),
            last_consumed_lexeme_end: 0,
            token_capturer: TokenCapturer::new(initial_capture_flags, encoding, strict),
        }
    }

    pub fn start(&mut self) -> Result<(), RewritingError> {
        let output = &mut self.output;

        self.transform_controller
            .handle_start(&mut |c| output.write(c))?;

        self.output.flush()
    }

    #[inline]
    pub fn transform_controller_mut(&mut self) -> &mut C {
        &mut self.transform_controller
    }

    #[inline]
    pub fn refresh_capture_flags(&mut self) {
        self.token_capturer
            .set_capture_flags(self.transform_controller.capture_flags());
    }

    pub fn flush_remaining_input(
        &mut self,
        input: &Chunk<'_>,
        blocked_byte_count: usize,
    ) -> Result<(), RewritingError> {
        self.flush_raw_input(input, input.len() - blocked_byte_count);
        self.last_consumed_lexeme_end = 0;

        self.output.flush()
    }

    /// Passes the input that hasn't been consumed by the token capturer
    /// through as is.
    #[inline]
    fn flush_raw_input(&mut self, input: &Chunk<'_>, end: usize) {
        if end > self.last_consumed_lexeme_end {
            let chunk = input.slice(Range::new(self.last_consumed_lexeme_end, end));

            self.output.write(&chunk);
            self.last_consumed_lexeme_end = end;
        }
    }

    fn try_produce_token_from_lexeme(&mut self, lexeme: &Lexeme<'_>) -> Result<(), RewritingError> {
        let transform_controller = &mut self.transform_controller;
        let output = &mut self.output;
        let lexeme_range = lexeme.raw_range();
        let last_consumed_lexeme_end = self.last_consumed_lexeme_end;
        let mut lexeme_consumed = false;

        self.token_capturer.feed(lexeme, |event| {
            match event {
                TokenCapturerEvent::LexemeConsumed => {
                    let chunk = lexeme
                        .input()
                        .slice(Range::new(last_consumed_lexeme_end, lexeme_range.start));

                    lexeme_consumed = true;

                    if !chunk.is_empty() {
                        output.write(&chunk);
                    }
                }
                TokenCapturerEvent::TokenProduced(mut token) => {
                    transform_controller.handle_token(&mut token)?;
                    token.to_bytes(&mut |c| output.write(c));
                }
            }

            Ok(())
        })?;

        if lexeme_consumed {
            self.last_consumed_lexeme_end = lexeme_range.end;
        }

        Ok(())
    }

    /// Drops the lexeme from the output. The content of removed elements
    /// is never captured nor emitted.
    #[inline]
    fn skip_lexeme(&mut self, lexeme: &Lexeme<'_>) {
        let lexeme_range = lexeme.raw_range();

        self.flush_raw_input(lexeme.input(), lexeme_range.start);
        self.last_consumed_lexeme_end = lexeme_range.end;
    }

    #[inline]
    fn consume_lexeme(&mut self, lexeme: &Lexeme<'_>, emit: bool) -> Result<(), RewritingError> {
        if emit {
            self.try_produce_token_from_lexeme(lexeme)
        } else {
            self.skip_lexeme(lexeme);

            Ok(())
        }
    }
}

impl<C, O> LexemeSink for Dispatcher<C, O>
where
    C: TransformController,
    O: OutputSink,
{
    fn handle_lexeme(&mut self, lexeme: &Lexeme<'_>) -> Result<(), RewritingError> {
        let input = lexeme.input();

        match *lexeme.token_outline() {
            TokenOutline::StartTag {
                name,
                ref attributes,
                self_closing,
            } => {
                // NOTE: the start tag of an element is emitted even if the
                // element removes its own content.
                let emit = self.transform_controller.should_emit_content();

                let capture_flags = self.transform_controller.handle_start_tag(
                    LocalName::new(input, name),
                    AuxStartTagInfo {
                        input,
                        attributes,
                        self_closing,
                    },
                );

                self.token_capturer.set_capture_flags(capture_flags);
                self.consume_lexeme(lexeme, emit)?;
            }
            TokenOutline::EndTag { name } => {
                self.flush_raw_input(input, lexeme.raw_range().start);

                let output = &mut self.output;

                let capture_flags = self
                    .transform_controller
                    .handle_end_tag(LocalName::new(input, name), &mut |c| output.write(c));

                // NOTE: the end tag of an element with removed content is
                // emitted, so the decision is made after the element is popped.
                let emit = self.transform_controller.should_emit_content();

                self.token_capturer.set_capture_flags(capture_flags);
                self.consume_lexeme(lexeme, emit)?;
            }
            TokenOutline::Eof => {
                self.flush_raw_input(input, lexeme.raw_range().start);

                let output = &mut self.output;

                self.transform_controller
                    .handle_end(&mut |c| output.write(c))?;
            }
            _ => {
                let emit = self.transform_controller.should_emit_content();

                self.consume_lexeme(lexeme, emit)?;
            }
        }

        self.output.flush_if_full()
    }
}
