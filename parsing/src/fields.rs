//! Top-level SDDL lexer.
//!
//! An SDDL string is a sequence of up to four fields, each introduced by a
//! two-character marker and always in this order:
//!
//! ```text
//! O:<sid> G:<sid> D:<control>(<ace>)(<ace>)… S:<control>(<ace>)…
//! ```
//!
//! The lexer is a single left-to-right scan that only slices the input: it
//! validates structure (markers, order, control tokens, balanced clauses) and
//! leaves SID and ACE interpretation to the caller.

use core::iter::FusedIterator;

use crate::tokens::{ControlToken, ControlTokens};
use crate::LexError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum FieldMarker {
    Owner,
    Group,
    Dacl,
    Sacl,
}

impl FieldMarker {
    const fn tag(self) -> &'static str {
        match self {
            Self::Owner => "O:",
            Self::Group => "G:",
            Self::Dacl => "D:",
            Self::Sacl => "S:",
        }
    }

    fn at_start(s: &str) -> Option<Self> {
        match s.as_bytes() {
            [b'O', b':', ..] => Some(Self::Owner),
            [b'G', b':', ..] => Some(Self::Group),
            [b'D', b':', ..] => Some(Self::Dacl),
            [b'S', b':', ..] => Some(Self::Sacl),
            _ => None,
        }
    }

    /// Byte offset of the first marker in `s`.
    fn find(s: &str) -> Option<usize> {
        s.as_bytes()
            .windows(2)
            .position(|w| matches!(w, [b'O' | b'G' | b'D' | b'S', b':']))
    }
}

/// Borrowed view of an ACL field (`D:` or `S:` body).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAcl<'a> {
    control: &'a str,
    clauses: &'a str,
}

impl<'a> RawAcl<'a> {
    /// Control tokens exactly as written before the first clause (`"PAI"`).
    #[inline]
    #[must_use]
    pub const fn control(&self) -> &'a str {
        self.control
    }

    /// Iterates the recognized control tokens.
    #[inline]
    #[must_use]
    pub const fn control_tokens(&self) -> ControlTokens<'a> {
        ControlTokens { rest: self.control }
    }

    /// `true` when the field reads `NO_ACCESS_CONTROL`.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.control_tokens().any(|t| t == ControlToken::NullAcl)
    }

    /// Iterates the ACE clause bodies, parentheses stripped, in source order.
    #[inline]
    #[must_use]
    pub const fn clauses(&self) -> AceClauses<'a> {
        AceClauses { rest: self.clauses }
    }
}

/// Iterator over the bodies of the ACE clauses of a [`RawAcl`].
#[derive(Debug, Clone)]
pub struct AceClauses<'a> {
    rest: &'a str,
}

impl<'a> Iterator for AceClauses<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let end = clause_end(self.rest)?;
        let (clause, rest) = self.rest.split_at(end);
        self.rest = rest;
        clause.strip_prefix('(')?.strip_suffix(')')
    }
}

impl FusedIterator for AceClauses<'_> {}

/// Fields of an SDDL string, each borrowed from the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawFields<'a> {
    /// Owner SID token (`O:`).
    pub owner: Option<&'a str>,
    /// Group SID token (`G:`).
    pub group: Option<&'a str>,
    /// Discretionary ACL (`D:`).
    pub dacl: Option<RawAcl<'a>>,
    /// System ACL (`S:`).
    pub sacl: Option<RawAcl<'a>>,
}

/// Byte offset just past the `)` matching the `(` that starts `s`.
///
/// Parentheses inside double-quoted strings are literal text.
fn clause_end(s: &str) -> Option<usize> {
    if !s.starts_with('(') {
        return None;
    }
    let mut depth = 0usize;
    let mut quoted = false;
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'"' => quoted = !quoted,
            b'(' if !quoted => depth += 1,
            b')' if !quoted => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits a SID value from the rest of the input at the next field marker.
fn split_value(s: &str) -> (&str, &str) {
    FieldMarker::find(s).map_or((s, ""), |at| s.split_at(at))
}

fn lex_acl(body: &str) -> Result<(RawAcl<'_>, &str), LexError<'_>> {
    let mut rest = body;
    while !rest.is_empty() && !rest.starts_with('(') && FieldMarker::at_start(rest).is_none() {
        let token = ControlToken::at_start(rest).ok_or_else(|| {
            LexError::UnknownControlToken(rest.find('(').map_or(rest, |at| rest.split_at(at).0))
        })?;
        rest = rest.get(token.as_str().len()..).unwrap_or_default();
    }
    let control = body.split_at(body.len() - rest.len()).0;

    let clauses_start = rest;
    while rest.starts_with('(') {
        let end = clause_end(rest).ok_or(LexError::UnterminatedClause(rest))?;
        rest = rest.split_at(end).1;
    }
    let clauses = clauses_start.split_at(clauses_start.len() - rest.len()).0;

    if !rest.is_empty() && FieldMarker::at_start(rest).is_none() {
        return Err(LexError::UnexpectedInput(rest));
    }
    let acl = RawAcl { control, clauses };
    if acl.is_null() && !clauses.is_empty() {
        return Err(LexError::UnexpectedInput(clauses));
    }
    Ok((acl, rest))
}

/// Splits an SDDL string into its top-level fields.
///
/// Fields are individually optional but must follow the `O:`, `G:`, `D:`,
/// `S:` order. Surrounding ASCII whitespace is ignored and an empty input
/// yields empty [`RawFields`].
///
/// # Errors
/// A [`LexError`] naming the first fragment that breaks the structure:
/// unknown or misordered markers, empty owner/group values, unknown control
/// tokens, unterminated clauses, or stray text between clauses.
///
/// # Examples
/// ```rust
/// let fields = win_sddl_parsing::parse_descriptor("O:BAG:SYD:P(A;;GA;;;BA)").unwrap();
/// assert_eq!(fields.owner, Some("BA"));
/// assert_eq!(fields.group, Some("SY"));
/// let dacl = fields.dacl.unwrap();
/// assert_eq!(dacl.control(), "P");
/// assert_eq!(dacl.clauses().collect::<Vec<_>>(), ["A;;GA;;;BA"]);
/// assert!(fields.sacl.is_none());
/// ```
#[inline]
pub fn parse_descriptor(input: &str) -> Result<RawFields<'_>, LexError<'_>> {
    let mut fields = RawFields::default();
    let mut last: Option<FieldMarker> = None;
    let mut rest = input.trim_matches(|c: char| c.is_ascii_whitespace());

    while !rest.is_empty() {
        let marker = FieldMarker::at_start(rest).ok_or(LexError::UnexpectedInput(rest))?;
        if last.is_some_and(|previous| previous >= marker) {
            return Err(LexError::MisorderedField(marker.tag()));
        }
        last = Some(marker);
        let body = rest.get(marker.tag().len()..).unwrap_or_default();

        rest = match marker {
            FieldMarker::Owner | FieldMarker::Group => {
                let (value, tail) = split_value(body);
                if value.is_empty() {
                    return Err(LexError::EmptyField(marker.tag()));
                }
                if marker == FieldMarker::Owner {
                    fields.owner = Some(value);
                } else {
                    fields.group = Some(value);
                }
                tail
            }
            FieldMarker::Dacl | FieldMarker::Sacl => {
                let (acl, tail) = lex_acl(body)?;
                if marker == FieldMarker::Dacl {
                    fields.dacl = Some(acl);
                } else {
                    fields.sacl = Some(acl);
                }
                tail
            }
        };
    }
    Ok(fields)
}
