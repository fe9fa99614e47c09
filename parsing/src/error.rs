use thiserror::Error;

/// Syntax error raised while splitting an SDDL string.
///
/// Every variant borrows the offending fragment from the input so callers can
/// report it without the lexer allocating.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LexError<'a> {
    /// Input that is neither a field marker nor part of the current field.
    #[error("unexpected input `{0}`")]
    UnexpectedInput(&'a str),

    /// A field marker repeated or placed before a field it must follow.
    #[error("field `{0}` is duplicated or out of order")]
    MisorderedField(&'a str),

    /// An owner or group marker with no SID after it.
    #[error("field `{0}` has no value")]
    EmptyField(&'a str),

    /// An ACE clause whose closing parenthesis is missing.
    #[error("unterminated ACE clause `{0}`")]
    UnterminatedClause(&'a str),

    /// ACL control text that is not a known control token.
    #[error("unknown ACL control token `{0}`")]
    UnknownControlToken(&'a str),

    /// An ACE clause with fewer than the six mandatory subfields.
    #[error("ACE clause `{0}` has fewer than 6 subfields")]
    TooFewSubfields(&'a str),
}

impl<'a> LexError<'a> {
    /// The input fragment the error refers to.
    #[inline]
    #[must_use]
    pub const fn fragment(&self) -> &'a str {
        match *self {
            Self::UnexpectedInput(s)
            | Self::MisorderedField(s)
            | Self::EmptyField(s)
            | Self::UnterminatedClause(s)
            | Self::UnknownControlToken(s)
            | Self::TooFewSubfields(s) => s,
        }
    }
}
