use crate::LexError;

/// Subfields of one ACE clause, borrowed from the input.
///
/// `type;flags;rights;object_guid;inherited_object_guid;trustee[;extra]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAce<'a> {
    /// ACE type tag (`A`, `OA`, `XA`, …).
    pub ace_type: &'a str,
    /// Concatenated ACE flag tokens.
    pub flags: &'a str,
    /// Concatenated right tokens or a numeric literal.
    pub rights: &'a str,
    /// Object type GUID, empty when absent.
    pub object_type: &'a str,
    /// Inherited object type GUID, empty when absent.
    pub inherited_object_type: &'a str,
    /// Trustee SID token.
    pub trustee: &'a str,
    /// Everything after the sixth `;`, verbatim.
    pub extra: Option<&'a str>,
}

/// Type tag of a clause body, read without splitting the other subfields.
#[inline]
#[must_use]
pub fn ace_type_tag(clause: &str) -> &str {
    clause.split_once(';').map_or(clause, |(tag, _)| tag)
}

/// Splits an ACE clause body (parentheses already stripped).
///
/// The seventh subfield, when present, keeps any `;` it contains.
///
/// # Errors
/// [`LexError::TooFewSubfields`] if the clause has fewer than six subfields.
///
/// # Examples
/// ```rust
/// let ace = win_sddl_parsing::split_ace("OA;CI;RP;bf967aba-0de6-11d0-a285-00aa003049e2;;AU").unwrap();
/// assert_eq!(ace.ace_type, "OA");
/// assert_eq!(ace.object_type, "bf967aba-0de6-11d0-a285-00aa003049e2");
/// assert_eq!(ace.inherited_object_type, "");
/// assert_eq!(ace.extra, None);
/// ```
#[inline]
pub fn split_ace(clause: &str) -> Result<RawAce<'_>, LexError<'_>> {
    let mut parts = clause.splitn(7, ';');
    let mut field = || parts.next().ok_or(LexError::TooFewSubfields(clause));
    let ace_type = field()?;
    let flags = field()?;
    let rights = field()?;
    let object_type = field()?;
    let inherited_object_type = field()?;
    let trustee = field()?;
    Ok(RawAce {
        ace_type,
        flags,
        rights,
        object_type,
        inherited_object_type,
        trustee,
        extra: parts.next(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;

    #[test]
    fn six_subfields() {
        let ace = split_ace("A;CIOI;GA;;;BA").unwrap();
        assert_eq!(
            ace,
            RawAce {
                ace_type: "A",
                flags: "CIOI",
                rights: "GA",
                object_type: "",
                inherited_object_type: "",
                trustee: "BA",
                extra: None,
            }
        );
    }

    #[test]
    fn seventh_subfield_keeps_separators() {
        let ace = split_ace(r#"XA;;FX;;;S-1-1-0;(@User.Dept == "a;b")"#).unwrap();
        assert_eq!(ace.trustee, "S-1-1-0");
        assert_eq!(ace.extra, Some(r#"(@User.Dept == "a;b")"#));
    }

    #[test]
    fn empty_seventh_subfield() {
        assert_eq!(split_ace("XA;;FX;;;WD;").unwrap().extra, Some(""));
    }

    #[test]
    fn too_few() {
        assert_eq!(
            split_ace("A;;GA;;BA"),
            Err(LexError::TooFewSubfields("A;;GA;;BA"))
        );
        assert_eq!(split_ace(""), Err(LexError::TooFewSubfields("")));
    }

    #[test]
    fn type_tag() {
        assert_eq!(ace_type_tag("ZZ;;GA;;;BA"), "ZZ");
        assert_eq!(ace_type_tag("ZZ"), "ZZ");
    }
}
