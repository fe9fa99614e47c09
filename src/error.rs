use alloc::string::{String, ToString};
use core::fmt::{self, Display};

use parsing::LexError;
use thiserror::Error;

/// Kind of a [`DecodeError`], the stable part of the error contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Top-level structure violated.
    MalformedSddl,
    /// ACE clause with the wrong subfields.
    MalformedAce,
    /// Unrecognized ACE type tag.
    UnknownAceType,
    /// SID token that is neither an alias nor a canonical SID.
    UnknownSidFormat,
    /// Domain SID malformed where a domain-relative alias needed it.
    InvalidDomainSid,
}

impl ErrorKind {
    /// Name of the kind, as serialized.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedSddl => "MalformedSddl",
            Self::MalformedAce => "MalformedAce",
            Self::UnknownAceType => "UnknownAceType",
            Self::UnknownSidFormat => "UnknownSidFormat",
            Self::InvalidDomainSid => "InvalidDomainSid",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by [`decode`](crate::decode) and the component parsers.
///
/// Every variant owns the raw fragment of input that caused it. Callers
/// should match on [`DecodeError::kind`] and show [`DecodeError::fragment`];
/// the `Display` text is for humans and may change.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Top-level structure violated: unknown, misordered or empty fields,
    /// unknown control tokens, unterminated clauses.
    #[error("malformed SDDL at `{fragment}`: {reason}")]
    MalformedSddl {
        /// Offending input.
        fragment: String,
        /// Short description of the violation.
        reason: &'static str,
    },

    /// ACE clause with too few, too many or invalid subfields.
    #[error("malformed ACE `{fragment}`: {reason}")]
    MalformedAce {
        /// Offending clause or subfield.
        fragment: String,
        /// Short description of the violation.
        reason: &'static str,
    },

    /// ACE type tag not in the known set.
    #[error("unknown ACE type `{0}`")]
    UnknownAceType(String),

    /// SID token that is neither a known alias nor a canonical `S-1-…` SID.
    #[error("unknown SID format `{0}`")]
    UnknownSidFormat(String),

    /// Domain SID required by a domain-relative alias is not a valid SID.
    #[error("invalid domain SID `{0}`")]
    InvalidDomainSid(String),
}

impl DecodeError {
    pub(crate) fn malformed_ace(fragment: &str, reason: &'static str) -> Self {
        Self::MalformedAce {
            fragment: fragment.to_string(),
            reason,
        }
    }

    /// Kind of the error.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedSddl { .. } => ErrorKind::MalformedSddl,
            Self::MalformedAce { .. } => ErrorKind::MalformedAce,
            Self::UnknownAceType(_) => ErrorKind::UnknownAceType,
            Self::UnknownSidFormat(_) => ErrorKind::UnknownSidFormat,
            Self::InvalidDomainSid(_) => ErrorKind::InvalidDomainSid,
        }
    }

    /// Raw input fragment the error refers to.
    #[inline]
    #[must_use]
    pub fn fragment(&self) -> &str {
        match self {
            Self::MalformedSddl { fragment, .. } | Self::MalformedAce { fragment, .. } => fragment,
            Self::UnknownAceType(fragment)
            | Self::UnknownSidFormat(fragment)
            | Self::InvalidDomainSid(fragment) => fragment,
        }
    }
}

impl From<LexError<'_>> for DecodeError {
    fn from(value: LexError<'_>) -> Self {
        let fragment = value.fragment().to_string();
        match value {
            LexError::TooFewSubfields(_) => Self::MalformedAce {
                fragment,
                reason: "fewer than 6 subfields",
            },
            LexError::UnexpectedInput(_) => Self::MalformedSddl {
                fragment,
                reason: "unexpected input",
            },
            LexError::MisorderedField(_) => Self::MalformedSddl {
                fragment,
                reason: "field duplicated or out of order",
            },
            LexError::EmptyField(_) => Self::MalformedSddl {
                fragment,
                reason: "field has no value",
            },
            LexError::UnterminatedClause(_) => Self::MalformedSddl {
                fragment,
                reason: "unterminated ACE clause",
            },
            LexError::UnknownControlToken(_) => Self::MalformedSddl {
                fragment,
                reason: "unknown ACL control token",
            },
        }
    }
}
