use cssparser::{BasicParseErrorKind, ParseError, ParseErrorKind};
use thiserror::Error;

/// An error that occurs if an incorrect value is passed as a CSS selector.
#[derive(Error, Debug, Eq, PartialEq, Copy, Clone)]
pub enum SelectorError {
    /// Unexpected token in the selector.
    #[error("Unexpected token in the selector.")]
    UnexpectedToken,

    /// Unexpected end of the selector.
    #[error("Unexpected end of the selector.")]
    UnexpectedEnd,

    /// Missing attribute name in the attribute selector.
    #[error("Missing attribute name in the attribute selector.")]
    MissingAttributeName,

    /// The selector is empty.
    #[error("The selector is empty.")]
    EmptySelector,

    /// Dangling combinator in the selector (e.g. `div >`).
    #[error("Dangling combinator in the selector.")]
    DanglingCombinator,

    /// Unexpected token in the attribute selector.
    #[error("Unexpected token in the attribute selector.")]
    UnexpectedTokenInAttributeSelector,

    /// Pseudo classes and pseudo elements are not supported.
    #[error("Pseudo classes and elements are unsupported in selectors.")]
    UnsupportedPseudoClassOrElement,

    /// Selectors with explicit namespaces are not supported.
    #[error("Selectors with explicit namespaces are not supported.")]
    NamespacedSelector,

    /// Invalid or unescaped class name in the selector.
    #[error("Invalid or unescaped class name in the selector.")]
    InvalidClassName,

    /// Invalid or unescaped ID in the selector.
    #[error("Invalid or unescaped ID in the selector.")]
    InvalidId,

    /// Only the descendant and child combinators are supported.
    #[error("Unsupported combinator `{0}` in the selector.")]
    UnsupportedCombinator(char),
}

impl From<ParseError<'_, SelectorError>> for SelectorError {
    fn from(err: ParseError<'_, SelectorError>) -> Self {
        match err.kind {
            ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => SelectorError::UnexpectedEnd,
            ParseErrorKind::Basic(_) => SelectorError::UnexpectedToken,
            ParseErrorKind::Custom(err) => err,
        }
    }
}
