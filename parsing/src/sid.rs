use core::fmt::{self, Display};
use core::str::FromStr;

use arrayvec::ArrayVec;
use thiserror::Error;

/// Revision accepted in the textual form (`S-1-…`).
pub const SID_REVISION: u8 = 1;
/// Minimum sub-authority count of a valid SID.
pub const MIN_SUBAUTHORITY_COUNT: u8 = 1;
/// Maximum sub-authority count of a valid SID.
pub const MAX_SUBAUTHORITY_COUNT: u8 = 15;

const MAX_IDENTIFIER_AUTHORITY: u64 = 0xFFFF_FFFF_FFFF;

/// Sub-authority storage, bounded by [`MAX_SUBAUTHORITY_COUNT`].
pub type SubAuthorities = ArrayVec<u32, { MAX_SUBAUTHORITY_COUNT as usize }>;

/// Components of a textual SID (`S-1-<authority>-<sub>-…`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SidComponents {
    /// The 48-bit identifier authority value.
    pub identifier_authority: u64,
    /// The SID sub-authority values.
    pub sub_authority: SubAuthorities,
}

/// Error type returned when parsing a SID string fails due to an invalid format.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSidFormat;

impl Display for InvalidSidFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid format for Sid")
    }
}

impl SidComponents {
    /// Builds components from an authority and a sub-authority slice.
    ///
    /// # Errors
    /// [`InvalidSidFormat`] if the authority exceeds 48 bits or the slice
    /// length is outside `1..=15`.
    #[inline]
    pub fn new(identifier_authority: u64, sub_authority: &[u32]) -> Result<Self, InvalidSidFormat> {
        if identifier_authority > MAX_IDENTIFIER_AUTHORITY
            || sub_authority.len() < MIN_SUBAUTHORITY_COUNT as usize
        {
            return Err(InvalidSidFormat);
        }
        let sub_authority =
            SubAuthorities::try_from(sub_authority).map_err(|_| InvalidSidFormat)?;
        Ok(Self {
            identifier_authority,
            sub_authority,
        })
    }

    /// Returns a copy of `self` with `rid` appended as the last sub-authority.
    ///
    /// # Errors
    /// [`InvalidSidFormat`] if `self` already holds the maximum number of
    /// sub-authorities.
    #[inline]
    pub fn with_rid(&self, rid: u32) -> Result<Self, InvalidSidFormat> {
        let mut sub_authority = self.sub_authority.clone();
        sub_authority.try_push(rid).map_err(|_| InvalidSidFormat)?;
        Ok(Self {
            identifier_authority: self.identifier_authority,
            sub_authority,
        })
    }

    /// If `self` is `prefix` followed by exactly one more sub-authority,
    /// returns that trailing value (the RID).
    #[inline]
    #[must_use]
    pub fn rid_relative_to(&self, prefix: &Self) -> Option<u32> {
        if self.identifier_authority != prefix.identifier_authority {
            return None;
        }
        let (last, head) = self.sub_authority.split_last()?;
        (head == prefix.sub_authority.as_slice()).then_some(*last)
    }
}

fn parse_authority(s: &str) -> Result<u64, InvalidSidFormat> {
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(InvalidSidFormat);
    }
    let value = u64::from_str_radix(digits, radix).map_err(|_| InvalidSidFormat)?;
    if value > MAX_IDENTIFIER_AUTHORITY {
        return Err(InvalidSidFormat);
    }
    Ok(value)
}

impl FromStr for SidComponents {
    type Err = InvalidSidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut s_cmp = s.split('-');
        if !s_cmp
            .next()
            .is_some_and(|head| head.eq_ignore_ascii_case("s"))
        {
            return Err(InvalidSidFormat);
        }
        let revision = s_cmp
            .next()
            .ok_or(InvalidSidFormat)?
            .parse::<u8>()
            .map_err(|_| InvalidSidFormat)?;
        if revision != SID_REVISION {
            return Err(InvalidSidFormat);
        }

        let identifier_authority = s_cmp
            .next()
            .ok_or(InvalidSidFormat)
            .and_then(parse_authority)?;
        let mut sub_authority = SubAuthorities::new();
        for item in s_cmp {
            // `u32::from_str` accepts a leading `+`, the SID grammar does not.
            if item.is_empty() || !item.bytes().all(|b| b.is_ascii_digit()) {
                return Err(InvalidSidFormat);
            }
            let item = item.parse::<u32>().map_err(|_| InvalidSidFormat)?;
            sub_authority.try_push(item).map_err(|_| InvalidSidFormat)?;
        }
        if sub_authority.is_empty() {
            return Err(InvalidSidFormat);
        }

        Ok(Self {
            identifier_authority,
            sub_authority,
        })
    }
}

impl Display for SidComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{SID_REVISION}")?;

        // Identifier Authority: print as decimal if fits in u32, else as hex
        if self.identifier_authority <= u64::from(u32::MAX) {
            write!(f, "-{}", self.identifier_authority)?;
        } else {
            write!(f, "-0x{:X}", self.identifier_authority)?;
        }

        for sub_auth in &self.sub_authority {
            write!(f, "-{sub_auth}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    extern crate std;
    use super::*;
    use proptest::prelude::*;
    use std::string::ToString;
    use std::vec::Vec;
    use yare::parameterized;

    #[parameterized(
        everyone = { "S-1-1-0", 1, &[0] },
        administrators = { "S-1-5-32-544", 5, &[32, 544] },
        lowercase_head = { "s-1-5-18", 5, &[18] },
        hex_authority = { "S-1-0x1000000000-7", 0x10_0000_0000, &[7] },
        domain = { "S-1-5-21-2623811015-3361044348-30300820-1013", 5, &[21, 2_623_811_015, 3_361_044_348, 30_300_820, 1013] },
    )]
    fn parses_valid(input: &str, authority: u64, subs: &[u32]) {
        let parsed: SidComponents = input.parse().unwrap();
        assert_eq!(parsed.identifier_authority, authority, "authority of {input}");
        assert_eq!(parsed.sub_authority.as_slice(), subs, "sub-authorities of {input}");
    }

    #[parameterized(
        empty = { "" },
        no_subauthority = { "S-1-5" },
        revision_two = { "S-2-5-18" },
        not_numeric = { "S-1-5-x" },
        plus_sign = { "S-1-5-+18" },
        trailing_dash = { "S-1-5-18-" },
        alias = { "BA" },
        authority_too_large = { "S-1-281474976710656-1" },
        sub_authority_overflow = { "S-1-5-4294967296" },
        sixteen_sub_authorities = { "S-1-5-1-2-3-4-5-6-7-8-9-10-11-12-13-14-15-16" },
    )]
    fn rejects_invalid(input: &str) {
        assert_eq!(input.parse::<SidComponents>(), Err(InvalidSidFormat), "{input} should be rejected");
    }

    #[test]
    fn display_drops_leading_zeros_and_uppercases_head() {
        let parsed: SidComponents = "s-1-5-21-030300820-0500".parse().unwrap();
        assert_eq!(parsed.to_string(), "S-1-5-21-30300820-500");
    }

    #[test]
    fn display_large_authority_as_hex() {
        let parsed = SidComponents::new(0x1234_5678_9A, &[1]).unwrap();
        assert_eq!(parsed.to_string(), "S-1-0x123456789A-1");
    }

    #[test]
    fn with_rid_stops_at_fifteen() {
        let full = SidComponents::new(5, &[1; 15]).unwrap();
        assert_eq!(full.with_rid(512), Err(InvalidSidFormat));
        let domain = SidComponents::new(5, &[21, 1, 2, 3]).unwrap();
        assert_eq!(domain.with_rid(512).unwrap().to_string(), "S-1-5-21-1-2-3-512");
    }

    #[test]
    fn rid_relative_to_domain() {
        let domain: SidComponents = "S-1-5-21-1-2-3".parse().unwrap();
        let admins: SidComponents = "S-1-5-21-1-2-3-512".parse().unwrap();
        let other: SidComponents = "S-1-5-21-1-2-4-512".parse().unwrap();
        assert_eq!(admins.rid_relative_to(&domain), Some(512));
        assert_eq!(other.rid_relative_to(&domain), None);
        assert_eq!(domain.rid_relative_to(&domain), None);
    }

    prop_compose! {
        fn arb_components()
            (authority in 0u64..=0xFFFF_FFFF_FFFF,
             subs in proptest::collection::vec(any::<u32>(), 1..=15))
            -> SidComponents {
            SidComponents::new(authority, &subs).unwrap()
        }
    }

    proptest! {
        #[test]
        fn display_round_trip(components in arb_components()) {
            let text = components.to_string();
            prop_assert!(text.starts_with("S-1-"), "Display does not start with S-1-: {}", text);
            prop_assert_eq!(text.parse::<SidComponents>().unwrap(), components);
        }

        #[test]
        fn never_panics(input in ".*") {
            let _ = input.parse::<SidComponents>();
        }

        #[test]
        fn dash_count_matches(components in arb_components()) {
            let text = components.to_string();
            let dashes = text.matches('-').count();
            let subs: Vec<u32> = components.sub_authority.to_vec();
            prop_assert_eq!(dashes, subs.len() + 2);
        }
    }
}
