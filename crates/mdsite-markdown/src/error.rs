//! Parse error type.

/// Error returned when markdown input is malformed.
///
/// The parser performs no recovery: a construct that needs a terminator and
/// runs into the end of its text stops the whole parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// End of input reached while a construct was still open.
    #[error("unexpected end of input in {construct} (byte offset {offset})")]
    UnexpectedEnd {
        /// Name of the open construct (e.g. "inline code", "link target").
        construct: &'static str,
        /// Byte offset into the text being parsed where input ran out.
        offset: usize,
    },
}
