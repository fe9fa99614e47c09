use bitflags::bitflags;

use crate::unrecognized::UnrecognizedTokens;

bitflags! {
    /// ACE header flags.
    ///
    /// Bits follow `ACE_HEADER.AceFlags` except `TRUST_PROTECTED_FILTER`,
    /// which shares `0x40` with `SUCCESSFUL_ACCESS` on the wire (it is only
    /// meaningful on access filter ACEs) and is moved to `0x100` here so both
    /// can be told apart.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct AceFlagBits: u16 {
        /// `OI`
        const OBJECT_INHERIT = 0x01;
        /// `CI`
        const CONTAINER_INHERIT = 0x02;
        /// `NP`
        const NO_PROPAGATE_INHERIT = 0x04;
        /// `IO`
        const INHERIT_ONLY = 0x08;
        /// `ID`
        const INHERITED = 0x10;
        /// `CR`
        const CRITICAL = 0x20;
        /// `SA`
        const SUCCESSFUL_ACCESS = 0x40;
        /// `FA`
        const FAILED_ACCESS = 0x80;
        /// `TP`
        const TRUST_PROTECTED_FILTER = 0x100;
    }
}

impl Default for AceFlagBits {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl AceFlagBits {
    /// Flag spelled by a 2-character SDDL token.
    #[inline]
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "OI" => Self::OBJECT_INHERIT,
            "CI" => Self::CONTAINER_INHERIT,
            "NP" => Self::NO_PROPAGATE_INHERIT,
            "IO" => Self::INHERIT_ONLY,
            "ID" => Self::INHERITED,
            "CR" => Self::CRITICAL,
            "SA" => Self::SUCCESSFUL_ACCESS,
            "FA" => Self::FAILED_ACCESS,
            "TP" => Self::TRUST_PROTECTED_FILTER,
            _ => return None,
        })
    }
}

/// Decoded ACE flags subfield.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AceFlags {
    flags: AceFlagBits,
    unrecognized: UnrecognizedTokens,
}

impl AceFlags {
    /// Named flags.
    #[inline]
    #[must_use]
    pub const fn flags(&self) -> AceFlagBits {
        self.flags
    }

    /// Tokens that are not ACE flags.
    #[inline]
    #[must_use]
    pub const fn unrecognized(&self) -> &UnrecognizedTokens {
        &self.unrecognized
    }

    /// `true` if every flag of `other` is set.
    #[inline]
    #[must_use]
    pub const fn contains(&self, other: AceFlagBits) -> bool {
        self.flags.contains(other)
    }
}

impl From<AceFlagBits> for AceFlags {
    #[inline]
    fn from(flags: AceFlagBits) -> Self {
        Self {
            flags,
            unrecognized: UnrecognizedTokens::new(),
        }
    }
}

impl<'a> Extend<&'a str> for AceFlags {
    #[inline]
    fn extend<T: IntoIterator<Item = &'a str>>(&mut self, iter: T) {
        for token in iter {
            match AceFlagBits::from_token(token) {
                Some(flag) => self.flags |= flag,
                None => self.unrecognized.insert(token),
            }
        }
    }
}

impl<'a> FromIterator<&'a str> for AceFlags {
    #[inline]
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut flags = Self::default();
        flags.extend(iter);
        flags
    }
}

/// Accumulates ACE flag tokens (`"CI"`, `"OI"`, …) into [`AceFlags`].
///
/// Never fails; unknown tokens are kept in [`AceFlags::unrecognized`].
///
/// # Examples
/// ```rust
/// use win_sddl::{AceFlagBits, decode_ace_flags};
///
/// let flags = decode_ace_flags(["CI", "OI"]);
/// assert_eq!(flags.flags(), AceFlagBits::CONTAINER_INHERIT | AceFlagBits::OBJECT_INHERIT);
/// ```
#[inline]
pub fn decode_ace_flags<'a, I>(tokens: I) -> AceFlags
where
    I: IntoIterator<Item = &'a str>,
{
    tokens.into_iter().collect()
}
