use crate::memory::MemoryLimitExceededError;
use crate::transform_stream::OutputSinkError;
use std::error::Error as StdError;
use thiserror::Error;

/// An error that occurs when the input can't be tokenized.
#[derive(Error, Debug, Eq, PartialEq, Copy, Clone)]
pub enum TokenizeError {
    /// The text contains a byte sequence that is not valid in the document's encoding.
    ///
    /// Only reported if [`Settings::strict`] is enabled.
    ///
    /// [`Settings::strict`]: ../struct.Settings.html#structfield.strict
    #[error("The input contains a malformed byte sequence.")]
    MalformedByteSequence,
}

/// An error that occurs when the [`HtmlRewriter`] is used in a wrong state.
///
/// [`HtmlRewriter`]: ../struct.HtmlRewriter.html
#[derive(Error, Debug, Eq, PartialEq, Copy, Clone)]
pub enum InvalidStateError {
    /// The rewriter has already finished processing the input.
    #[error("The rewriter has already been ended.")]
    Ended,

    /// The rewriter has been freed.
    #[error("The rewriter has been freed.")]
    Freed,

    /// One of the previous calls to the rewriter has failed. The output produced
    /// before the failure may be incomplete.
    #[error("The rewriter has been poisoned by a previous error.")]
    Poisoned,
}

/// A fatal error that occurs during HTML rewriting.
///
/// Once the rewriter has returned an error, all the subsequent calls to
/// [`write`] and [`end`] fail with [`InvalidStateError::Poisoned`].
///
/// [`write`]: ../struct.HtmlRewriter.html#method.write
/// [`end`]: ../struct.HtmlRewriter.html#method.end
#[derive(Error, Debug)]
pub enum RewritingError {
    /// See [`MemoryLimitExceededError`].
    ///
    /// [`MemoryLimitExceededError`]: struct.MemoryLimitExceededError.html
    #[error("{0}")]
    MemoryLimitExceeded(#[from] MemoryLimitExceededError),

    /// An error returned by one of the content handlers.
    #[error("{0}")]
    ContentHandlerError(Box<dyn StdError + Send + Sync>),

    /// See [`OutputSinkError`].
    ///
    /// [`OutputSinkError`]: ../struct.OutputSinkError.html
    #[error("{0}")]
    OutputSink(#[from] OutputSinkError),

    /// See [`TokenizeError`].
    ///
    /// [`TokenizeError`]: enum.TokenizeError.html
    #[error("{0}")]
    Tokenize(#[from] TokenizeError),

    /// See [`InvalidStateError`].
    ///
    /// [`InvalidStateError`]: enum.InvalidStateError.html
    #[error("{0}")]
    InvalidState(#[from] InvalidStateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            RewritingError::from(InvalidStateError::Ended).to_string(),
            "The rewriter has already been ended."
        );

        assert_eq!(
            RewritingError::ContentHandlerError("Boom".into()).to_string(),
            "Boom"
        );

        assert_eq!(
            RewritingError::from(MemoryLimitExceededError).to_string(),
            "The memory limit has been exceeded."
        );
    }
}
