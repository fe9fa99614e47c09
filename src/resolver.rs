//! SID token resolution.
//!
//! A token is either a two-letter alias from [`WELL_KNOWN_SIDS`](crate::well_known::WELL_KNOWN_SIDS)
//! or a canonical `S-1-…` string. Domain-relative aliases are expanded
//! against the domain SID given to the resolver.

use alloc::string::ToString;

use parsing::SidComponents;

use crate::error::DecodeError;
use crate::sid::SecurityIdentifier;
use crate::well_known::{self, WellKnownSid, WellKnownSidKind};

/// Resolves SID tokens against one domain SID.
///
/// The domain SID is parsed once. A malformed domain SID only matters when a
/// domain-relative alias is met; universal aliases and canonical SIDs resolve
/// without it.
#[derive(Debug, Clone)]
pub struct SidResolver<'d> {
    domain_text: &'d str,
    domain: Option<SidComponents>,
}

impl<'d> SidResolver<'d> {
    /// Creates a resolver for `domain_sid` (e.g. `S-1-5-21-1-2-3`).
    #[inline]
    #[must_use]
    pub fn new(domain_sid: &'d str) -> Self {
        Self {
            domain_text: domain_sid,
            domain: domain_sid.trim().parse().ok(),
        }
    }

    /// Resolves `token` to a [`SecurityIdentifier`].
    ///
    /// # Errors
    /// - [`DecodeError::UnknownSidFormat`] if `token` is neither a known alias
    ///   nor a canonical SID.
    /// - [`DecodeError::InvalidDomainSid`] if `token` is a domain-relative
    ///   alias and the domain SID is malformed (or has no room left for the RID).
    #[inline]
    pub fn resolve(&self, token: &str) -> Result<SecurityIdentifier, DecodeError> {
        if let Some(entry) = well_known::lookup_alias(token) {
            return self.expand(entry);
        }
        let components: SidComponents = token
            .parse()
            .map_err(|_| DecodeError::UnknownSidFormat(token.to_string()))?;
        Ok(SecurityIdentifier::new(&components, self.reverse_lookup(&components)))
    }

    fn expand(&self, entry: &'static WellKnownSid) -> Result<SecurityIdentifier, DecodeError> {
        let components = match entry.kind() {
            WellKnownSidKind::Universal {
                identifier_authority,
                sub_authority,
            } => SidComponents::new(identifier_authority, sub_authority)
                .map_err(|_| DecodeError::UnknownSidFormat(entry.alias().to_string()))?,
            WellKnownSidKind::DomainRelative { rid } => self
                .domain
                .as_ref()
                .and_then(|domain| domain.with_rid(rid).ok())
                .ok_or_else(|| DecodeError::InvalidDomainSid(self.domain_text.to_string()))?,
        };
        Ok(SecurityIdentifier::new(&components, Some(entry)))
    }

    fn reverse_lookup(&self, sid: &SidComponents) -> Option<&'static WellKnownSid> {
        well_known::lookup_universal(sid).or_else(|| {
            self.domain
                .as_ref()
                .and_then(|domain| sid.rid_relative_to(domain))
                .and_then(well_known::lookup_domain_rid)
        })
    }
}

/// Resolves one SID token against `domain_sid`.
///
/// Convenience for a single lookup; [`decode`](crate::decode) keeps one
/// [`SidResolver`] for the whole descriptor.
///
/// # Errors
/// See [`SidResolver::resolve`].
///
/// # Examples
/// ```rust
/// let admins = win_sddl::resolve("DA", "S-1-5-21-1-2-3").unwrap();
/// assert_eq!(admins.canonical(), "S-1-5-21-1-2-3-512");
/// assert_eq!(admins.well_known_name(), Some("Domain Admins"));
/// ```
#[inline]
pub fn resolve(token: &str, domain_sid: &str) -> Result<SecurityIdentifier, DecodeError> {
    SidResolver::new(domain_sid).resolve(token)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use alloc::format;
    use alloc::string::String;
    use proptest::prelude::*;
    use yare::parameterized;

    const DOMAIN: &str = "S-1-5-21-1-2-3";

    #[parameterized(
        everyone = { "WD", "S-1-1-0", "Everyone" },
        system = { "SY", "S-1-5-18", "Local System" },
        builtin_admins = { "BA", "S-1-5-32-544", "Administrators" },
        user_mode_drivers = { "UD", "S-1-5-84-0-0-0-0-0", "User Mode Drivers" },
        app_packages = { "AC", "S-1-15-2-1", "All Application Packages" },
        low_integrity = { "LW", "S-1-16-4096", "Low Mandatory Level" },
        domain_admins = { "DA", "S-1-5-21-1-2-3-512", "Domain Admins" },
        local_admin = { "LA", "S-1-5-21-1-2-3-500", "Administrator" },
        read_only_dcs = { "RO", "S-1-5-21-1-2-3-498", "Enterprise Read-only Domain Controllers" },
    )]
    fn aliases(alias: &str, canonical: &str, name: &str) {
        let sid = resolve(alias, DOMAIN).unwrap();
        assert_eq!(sid.canonical(), canonical);
        assert_eq!(sid.well_known_name(), Some(name));
        assert_eq!(sid.alias(), Some(alias));
    }

    #[test]
    fn canonical_sid_reverse_lookup() {
        let sid = resolve("S-1-5-32-544", DOMAIN).unwrap();
        assert_eq!(sid.well_known_name(), Some("Administrators"));

        let sid = resolve("S-1-5-21-1-2-3-512", DOMAIN).unwrap();
        assert_eq!(sid.well_known_name(), Some("Domain Admins"));

        let sid = resolve("S-1-5-21-9-9-9-512", DOMAIN).unwrap();
        assert_eq!(sid.canonical(), "S-1-5-21-9-9-9-512");
        assert_eq!(sid.well_known_name(), None, "other domain");

        let sid = resolve("s-1-5-0032-0544", DOMAIN).unwrap();
        assert_eq!(sid.canonical(), "S-1-5-32-544", "canonicalized");
    }

    #[test]
    fn unknown_token() {
        for token in ["ZZ", "ba", "", "S-1", "S-2-5-32", "Administrators"] {
            let err = resolve(token, DOMAIN).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnknownSidFormat, "{token}");
            assert_eq!(err.fragment(), token);
        }
    }

    #[test]
    fn invalid_domain_only_hurts_domain_aliases() {
        assert_eq!(resolve("WD", "garbage").unwrap().canonical(), "S-1-1-0");
        assert_eq!(resolve("S-1-5-18", "").unwrap().canonical(), "S-1-5-18");

        let err = resolve("DA", "garbage").unwrap_err();
        assert_eq!(err, DecodeError::InvalidDomainSid("garbage".into()));
    }

    #[test]
    fn full_domain_cannot_take_rid() {
        let full = "S-1-5-1-2-3-4-5-6-7-8-9-10-11-12-13-14-15";
        assert_eq!(resolve("DA", full).unwrap_err().kind(), ErrorKind::InvalidDomainSid);

        let room_for_one = "S-1-5-1-2-3-4-5-6-7-8-9-10-11-12-13-14";
        assert_eq!(
            resolve("DA", room_for_one).unwrap().canonical(),
            "S-1-5-1-2-3-4-5-6-7-8-9-10-11-12-13-14-512"
        );
    }

    fn arb_domain() -> impl Strategy<Value = String> {
        prop::collection::vec(any::<u32>(), 1..=14).prop_map(|subs| {
            let mut s = String::from("S-1-5");
            for sub in subs {
                s.push_str(&format!("-{sub}"));
            }
            s
        })
    }

    proptest! {
        #[test]
        fn universal_aliases_ignore_domain(domain in arb_domain()) {
            for entry in well_known::WELL_KNOWN_SIDS.iter().filter(|e| !e.is_domain_relative()) {
                let with = resolve(entry.alias(), &domain).unwrap();
                let without = resolve(entry.alias(), "").unwrap();
                prop_assert_eq!(with, without);
            }
        }

        #[test]
        fn domain_aliases_append_rid(domain in arb_domain()) {
            for entry in well_known::WELL_KNOWN_SIDS.iter() {
                if let WellKnownSidKind::DomainRelative { rid } = entry.kind() {
                    let sid = resolve(entry.alias(), &domain).unwrap();
                    prop_assert_eq!(sid.canonical(), format!("{domain}-{rid}"));
                }
            }
        }
    }
}
