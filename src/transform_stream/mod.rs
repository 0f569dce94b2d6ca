mod dispatcher;
mod output_buffer;

use self::dispatcher::Dispatcher;
use crate::base::Chunk;
use crate::memory::{Arena, SharedMemoryLimiter};
use crate::parser::Parser;
use crate::rewriter::RewritingError;
use encoding_rs::Encoding;

pub use self::dispatcher::{AuxStartTagInfo, TransformController};
pub use self::output_buffer::{OutputSink, OutputSinkError};

pub struct TransformStreamSettings<C, O>
where
    C: TransformController,
    O: OutputSink,
{
    pub transform_controller: C,
    pub output_sink: O,
    pub preallocated_parsing_buffer_size: usize,
    pub memory_limiter: SharedMemoryLimiter,
    pub encoding: &'static Encoding,
    pub strict: bool,
    pub output_buffer_capacity: usize,
}

/// Drives the parser over the written chunks and carries the bytes of an
/// incomplete lexical unit over to the next write.
pub struct TransformStream<C, O>
where
    C: TransformController,
    O: OutputSink,
{
    dispatcher: Dispatcher<C, O>,
    parser: Parser,
    carried_over: Arena,
}

/// Returns the number of trailing bytes that can't be parsed until more
/// input arrives.
fn parse_chunk<C, O>(
    parser: &mut Parser,
    dispatcher: &mut Dispatcher<C, O>,
    chunk: &Chunk<'_>,
) -> Result<usize, RewritingError>
where
    C: TransformController,
    O: OutputSink,
{
    trace!(@chunk chunk);

    let blocked_byte_count = parser.parse(chunk, dispatcher)?;

    dispatcher.flush_remaining_input(chunk, blocked_byte_count)?;

    Ok(blocked_byte_count)
}

impl<C, O> TransformStream<C, O>
where
    C: TransformController,
    O: OutputSink,
{
    pub fn new(settings: TransformStreamSettings<C, O>) -> Self {
        TransformStream {
            dispatcher: Dispatcher::new(
                settings.transform_controller,
                settings.output_sink,
                settings.output_buffer_capacity,
                settings.encoding,
                settings.strict,
            ),
            parser: Parser::new(),
            carried_over: Arena::new(
                settings.memory_limiter,
                settings.preallocated_parsing_buffer_size,
            ),
        }
    }

    #[inline]
    pub fn start(&mut self) -> Result<(), RewritingError> {
        self.dispatcher.start()
    }

    pub fn write(&mut self, data: &[u8]) -> Result<(), RewritingError> {
        trace!(@write data);

        let has_carried_over_bytes = !self.carried_over.is_empty();

        if has_carried_over_bytes {
            self.carried_over.push(data)?;
        }

        let blocked_byte_count = {
            let window = if has_carried_over_bytes {
                self.carried_over.bytes()
            } else {
                data
            };

            parse_chunk(&mut self.parser, &mut self.dispatcher, &Chunk::new(window))?
        };

        if has_carried_over_bytes {
            self.carried_over.keep_last(blocked_byte_count);
        } else if blocked_byte_count > 0 {
            self.carried_over
                .replace_with(&data[data.len() - blocked_byte_count..])?;
        }

        trace!(@buffer self.carried_over);

        Ok(())
    }

    pub fn end(&mut self) -> Result<(), RewritingError> {
        trace!(@end);

        let chunk = if self.carried_over.is_empty() {
            Chunk::last_empty()
        } else {
            Chunk::last(self.carried_over.bytes())
        };

        parse_chunk(&mut self.parser, &mut self.dispatcher, &chunk)?;
        self.carried_over.clear();

        Ok(())
    }

    #[inline]
    pub fn transform_controller_mut(&mut self) -> &mut C {
        self.dispatcher.transform_controller_mut()
    }

    /// Must be called after the controller's handlers have been changed
    /// between writes.
    #[inline]
    pub fn refresh_capture_flags(&mut self) {
        self.dispatcher.refresh_capture_flags();
    }
}
