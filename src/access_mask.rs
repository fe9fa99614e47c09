//! Access masks: the rights subfield of an ACE.
//!
//! Source: https://learn.microsoft.com/openspecs/windows_protocols/ms-dtyp/7a53f60e-e730-4dfe-bbe9-b21b62eb790b

use bitflags::bitflags;

use crate::unrecognized::UnrecognizedTokens;

bitflags! {
    /// Named access rights, in ascending bit order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct AccessRights: u32 {
        /// `CC`
        const CREATE_CHILD = 0x0000_0001;
        /// `DC`
        const DELETE_CHILD = 0x0000_0002;
        /// `LC`
        const LIST_CHILDREN = 0x0000_0004;
        /// `SW`
        const SELF_WRITE = 0x0000_0008;
        /// `RP`
        const READ_PROPERTY = 0x0000_0010;
        /// `WP`
        const WRITE_PROPERTY = 0x0000_0020;
        /// `DT`
        const DELETE_TREE = 0x0000_0040;
        /// `LO`
        const LIST_OBJECT = 0x0000_0080;
        /// `CR`
        const CONTROL_ACCESS = 0x0000_0100;
        /// `SD`
        const DELETE = 0x0001_0000;
        /// `RC`
        const READ_CONTROL = 0x0002_0000;
        /// `WD`
        const WRITE_DAC = 0x0004_0000;
        /// `WO`
        const WRITE_OWNER = 0x0008_0000;
        /// Implied by the file rights.
        const SYNCHRONIZE = 0x0010_0000;
        /// No SDDL token.
        const ACCESS_SYSTEM_SECURITY = 0x0100_0000;
        /// No SDDL token.
        const MAXIMUM_ALLOWED = 0x0200_0000;
        /// `GA`
        const GENERIC_ALL = 0x1000_0000;
        /// `GX`
        const GENERIC_EXECUTE = 0x2000_0000;
        /// `GW`
        const GENERIC_WRITE = 0x4000_0000;
        /// `GR`
        const GENERIC_READ = 0x8000_0000;
    }
}

impl Default for AccessRights {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

bitflags! {
    /// Mandatory label policy: how the mask of an `ML` ACE reads.
    ///
    /// These bits overlap [`AccessRights::CREATE_CHILD`] and its neighbours.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct MandatoryPolicy: u32 {
        /// `NW`
        const NO_WRITE_UP = 0x0000_0001;
        /// `NR`
        const NO_READ_UP = 0x0000_0002;
        /// `NX`
        const NO_EXECUTE_UP = 0x0000_0004;
    }
}

const FILE_ALL_ACCESS: u32 = 0x001F_01FF;
const FILE_GENERIC_READ: u32 = 0x0012_0089;
const FILE_GENERIC_WRITE: u32 = 0x0012_0116;
const FILE_GENERIC_EXECUTE: u32 = 0x0012_00A0;
const KEY_ALL_ACCESS: u32 = 0x000F_003F;
const KEY_READ: u32 = 0x0002_0019;
const KEY_WRITE: u32 = 0x0002_0006;
const KEY_EXECUTE: u32 = 0x0002_0019;

const RIGHT_TOKENS: [(&str, u32); 28] = [
    ("GA", AccessRights::GENERIC_ALL.bits()),
    ("GR", AccessRights::GENERIC_READ.bits()),
    ("GW", AccessRights::GENERIC_WRITE.bits()),
    ("GX", AccessRights::GENERIC_EXECUTE.bits()),
    ("RC", AccessRights::READ_CONTROL.bits()),
    ("SD", AccessRights::DELETE.bits()),
    ("WD", AccessRights::WRITE_DAC.bits()),
    ("WO", AccessRights::WRITE_OWNER.bits()),
    ("RP", AccessRights::READ_PROPERTY.bits()),
    ("WP", AccessRights::WRITE_PROPERTY.bits()),
    ("CC", AccessRights::CREATE_CHILD.bits()),
    ("DC", AccessRights::DELETE_CHILD.bits()),
    ("LC", AccessRights::LIST_CHILDREN.bits()),
    ("SW", AccessRights::SELF_WRITE.bits()),
    ("LO", AccessRights::LIST_OBJECT.bits()),
    ("DT", AccessRights::DELETE_TREE.bits()),
    ("CR", AccessRights::CONTROL_ACCESS.bits()),
    ("FA", FILE_ALL_ACCESS),
    ("FR", FILE_GENERIC_READ),
    ("FW", FILE_GENERIC_WRITE),
    ("FX", FILE_GENERIC_EXECUTE),
    ("KA", KEY_ALL_ACCESS),
    ("KR", KEY_READ),
    ("KW", KEY_WRITE),
    ("KX", KEY_EXECUTE),
    ("NW", MandatoryPolicy::NO_WRITE_UP.bits()),
    ("NR", MandatoryPolicy::NO_READ_UP.bits()),
    ("NX", MandatoryPolicy::NO_EXECUTE_UP.bits()),
];

/// Bits of a right token, `None` if the token is unknown.
#[inline]
#[must_use]
pub fn right_token_bits(token: &str) -> Option<u32> {
    RIGHT_TOKENS
        .iter()
        .find_map(|&(name, bits)| (name == token).then_some(bits))
}

/// Decoded access mask.
///
/// Bits outside [`AccessRights`] are kept in [`residual`](Self::residual)
/// and unknown tokens in [`unrecognized`](Self::unrecognized), so nothing
/// from the source text is lost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AccessMask {
    rights: AccessRights,
    residual: u32,
    unrecognized: UnrecognizedTokens,
}

impl AccessMask {
    /// Mask written as a numeric literal: the whole value is residual and
    /// the named set stays empty.
    #[inline]
    #[must_use]
    pub const fn from_numeric(value: u32) -> Self {
        Self {
            rights: AccessRights::empty(),
            residual: value,
            unrecognized: UnrecognizedTokens::new(),
        }
    }

    /// Named rights.
    #[inline]
    #[must_use]
    pub const fn rights(&self) -> AccessRights {
        self.rights
    }

    /// Raw bits with no name.
    #[inline]
    #[must_use]
    pub const fn residual(&self) -> u32 {
        self.residual
    }

    /// Tokens not found in the rights table.
    #[inline]
    #[must_use]
    pub const fn unrecognized(&self) -> &UnrecognizedTokens {
        &self.unrecognized
    }

    /// The full 32-bit mask.
    #[inline]
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.rights.bits() | self.residual
    }

    /// The mask read as a mandatory label policy, with the bits that are
    /// not policy bits.
    #[inline]
    #[must_use]
    pub const fn mandatory_policy(&self) -> (MandatoryPolicy, u32) {
        let bits = self.bits();
        (
            MandatoryPolicy::from_bits_truncate(bits),
            bits & !MandatoryPolicy::all().bits(),
        )
    }

    fn add_token(&mut self, token: &str) {
        match right_token_bits(token) {
            Some(bits) => {
                self.rights |= AccessRights::from_bits_truncate(bits);
                self.residual |= bits & !AccessRights::all().bits();
            }
            None => self.unrecognized.insert(token),
        }
    }
}

impl<'a> Extend<&'a str> for AccessMask {
    #[inline]
    fn extend<T: IntoIterator<Item = &'a str>>(&mut self, iter: T) {
        for token in iter {
            self.add_token(token);
        }
    }
}

impl<'a> FromIterator<&'a str> for AccessMask {
    #[inline]
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut mask = Self::default();
        mask.extend(iter);
        mask
    }
}

/// Accumulates right tokens (`"GA"`, `"RP"`, …) into an [`AccessMask`].
///
/// Never fails: unknown tokens land in [`AccessMask::unrecognized`].
/// Token order and repetition do not matter.
///
/// # Examples
/// ```rust
/// use win_sddl::{AccessRights, decode_mask};
///
/// let mask = decode_mask(["RP", "WP", "ZZ"]);
/// assert_eq!(mask.rights(), AccessRights::READ_PROPERTY | AccessRights::WRITE_PROPERTY);
/// assert!(mask.unrecognized().contains("ZZ"));
/// ```
#[inline]
pub fn decode_mask<'a, I>(tokens: I) -> AccessMask
where
    I: IntoIterator<Item = &'a str>,
{
    tokens.into_iter().collect()
}

/// Parses a numeric rights subfield (`0x1F01FF` or `2032127`).
///
/// Returns `None` when `s` is not written as a number at all, so the caller
/// falls back to token decoding, and `Some(None)` when the number is not a
/// valid `u32`.
pub(crate) fn numeric_literal(s: &str) -> Option<Option<u32>> {
    if !s.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(None);
    }
    Some(u32::from_str_radix(digits, radix).ok())
}
