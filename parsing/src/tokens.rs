//! Fixed-width token helpers shared by the flag and rights subfields.

use core::iter::FusedIterator;

/// Iterator over the 2-character tokens of a subfield.
///
/// A trailing odd character is yielded on its own rather than dropped.
#[derive(Debug, Clone)]
pub struct Pairs<'a> {
    rest: &'a str,
}

/// Splits `s` into consecutive 2-character tokens (`"CIOI"` → `"CI"`, `"OI"`).
#[inline]
#[must_use]
pub const fn pairs(s: &str) -> Pairs<'_> {
    Pairs { rest: s }
}

impl<'a> Iterator for Pairs<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let end = self
            .rest
            .char_indices()
            .nth(2)
            .map_or(self.rest.len(), |(i, _)| i);
        let (head, tail) = self.rest.split_at(end);
        self.rest = tail;
        Some(head)
    }
}

impl FusedIterator for Pairs<'_> {}

/// Control token found between an ACL marker and its first ACE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlToken {
    /// `P`: the ACL is protected from inheritance.
    Protected,
    /// `AR`: auto-inheritance is required.
    AutoInheritRequired,
    /// `AI`: the ACL was auto-inherited.
    AutoInherited,
    /// `NO`: the ACL comes from an untrusted source.
    Untrusted,
    /// `NO_ACCESS_CONTROL`: the ACL is present but null.
    NullAcl,
}

impl ControlToken {
    // Longest first so `NO_ACCESS_CONTROL` wins over `NO`.
    const BY_LENGTH: [Self; 5] = [
        Self::NullAcl,
        Self::AutoInheritRequired,
        Self::AutoInherited,
        Self::Untrusted,
        Self::Protected,
    ];

    /// SDDL spelling of the token.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Protected => "P",
            Self::AutoInheritRequired => "AR",
            Self::AutoInherited => "AI",
            Self::Untrusted => "NO",
            Self::NullAcl => "NO_ACCESS_CONTROL",
        }
    }

    /// Recognizes the token `s` starts with, if any.
    #[inline]
    #[must_use]
    pub fn at_start(s: &str) -> Option<Self> {
        Self::BY_LENGTH
            .into_iter()
            .find(|token| s.starts_with(token.as_str()))
    }
}

/// Iterator over the control tokens of an ACL field.
///
/// Stops at the first unrecognized character; [`crate::parse_descriptor`]
/// only hands out control strings made entirely of known tokens.
#[derive(Debug, Clone)]
pub struct ControlTokens<'a> {
    pub(crate) rest: &'a str,
}

impl Iterator for ControlTokens<'_> {
    type Item = ControlToken;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let token = ControlToken::at_start(self.rest)?;
        self.rest = self.rest.get(token.as_str().len()..).unwrap_or_default();
        Some(token)
    }
}
