use crate::rewriter::RewritingError;
use std::error::Error as StdError;
use thiserror::Error;

/// An error returned by an [`OutputSink`] that can't accept a chunk.
///
/// The rewriter stops and the error is returned from the call that produced the chunk.
#[derive(Error, Debug)]
#[error("The output sink rejected a chunk: {0}")]
pub struct OutputSinkError(pub Box<dyn StdError + Send + Sync>);

/// Defines an interface for the [`HtmlRewriter`]'s output.
///
/// Implemented for [`Fn`] and [`FnMut`].
///
/// [`HtmlRewriter`]: struct.HtmlRewriter.html
/// [`Fn`]: https://doc.rust-lang.org/std/ops/trait.Fn.html
/// [`FnMut`]: https://doc.rust-lang.org/std/ops/trait.FnMut.html
pub trait OutputSink {
    /// Function that gets called when the rewriter produces a chunk of output.
    ///
    /// Chunks are never empty.
    fn handle_chunk(&mut self, chunk: &[u8]) -> Result<(), OutputSinkError>;
}

impl<F: FnMut(&[u8])> OutputSink for F {
    #[inline]
    fn handle_chunk(&mut self, chunk: &[u8]) -> Result<(), OutputSinkError> {
        self(chunk);

        Ok(())
    }
}

/// Accumulates the output of a streaming step and passes it to the sink in
/// chunks of at least `capacity` bytes (except for the final one).
pub struct OutputBuffer<O: OutputSink> {
    sink: O,
    buffer: Vec<u8>,
    capacity: usize,
}

impl<O: OutputSink> OutputBuffer<O> {
    pub fn new(sink: O, capacity: usize) -> Self {
        OutputBuffer {
            sink,
            buffer: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn write(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    #[inline]
    pub fn flush_if_full(&mut self) -> Result<(), RewritingError> {
        if self.buffer.len() >= self.capacity {
            self.flush()?;
        }

        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), RewritingError> {
        if !self.buffer.is_empty() {
            trace!(@output self.buffer);

            let result = self.sink.handle_chunk(&self.buffer);

            self.buffer.clear();
            result?;
        }

        Ok(())
    }
}
