use alloc::vec::Vec;

use parsing::{RawAcl, parse_descriptor};
use tracing::{debug, trace};

use crate::ace::parse_ace_with;
use crate::acl::{AccessControlList, AclKind};
use crate::control_flags::ControlFlags;
use crate::error::DecodeError;
use crate::resolver::SidResolver;
use crate::sid::SecurityIdentifier;

/// A decoded security descriptor.
///
/// Absent fields stay `None`: a missing `O:` is not an error, and a missing
/// `D:` is different from an empty one (see [`ControlFlags::DACL_PRESENT`]).
/// A `NO_ACCESS_CONTROL` ACL is present but `None` (a null ACL).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SecurityDescriptor {
    owner: Option<SecurityIdentifier>,
    group: Option<SecurityIdentifier>,
    flags: ControlFlags,
    dacl: Option<AccessControlList>,
    sacl: Option<AccessControlList>,
}

impl SecurityDescriptor {
    /// Same as [`decode`].
    ///
    /// # Errors
    /// See [`decode`].
    #[inline]
    pub fn from_sddl(sddl: &str, domain_sid: &str) -> Result<Self, DecodeError> {
        decode(sddl, domain_sid)
    }

    /// Owner (`O:`).
    #[inline]
    #[must_use]
    pub const fn owner(&self) -> Option<&SecurityIdentifier> {
        self.owner.as_ref()
    }

    /// Primary group (`G:`).
    #[inline]
    #[must_use]
    pub const fn group(&self) -> Option<&SecurityIdentifier> {
        self.group.as_ref()
    }

    /// Control flags.
    #[inline]
    #[must_use]
    pub const fn flags(&self) -> ControlFlags {
        self.flags
    }

    /// Discretionary ACL (`D:`).
    #[inline]
    #[must_use]
    pub const fn dacl(&self) -> Option<&AccessControlList> {
        self.dacl.as_ref()
    }

    /// System ACL (`S:`).
    #[inline]
    #[must_use]
    pub const fn sacl(&self) -> Option<&AccessControlList> {
        self.sacl.as_ref()
    }
}

fn decode_acl(
    kind: AclKind,
    raw: RawAcl<'_>,
    resolver: &SidResolver<'_>,
    flags: &mut ControlFlags,
) -> Result<Option<AccessControlList>, DecodeError> {
    *flags |= ControlFlags::present(kind);
    for token in raw.control_tokens() {
        *flags |= ControlFlags::from_control_token(kind, token);
    }
    if raw.is_null() {
        trace!(event = "Decode", phase = "NullAcl", acl = kind.marker());
        return Ok(None);
    }
    let ace_list = raw
        .clauses()
        .enumerate()
        .map(|(index, clause)| {
            let ace = parse_ace_with(clause, resolver)?;
            trace!(
                event = "Decode",
                phase = "Ace",
                acl = kind.marker(),
                index,
                ace_type = ace.ace_type().tag(),
                trustee = ace.sid().canonical()
            );
            Ok(ace)
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;
    Ok(Some(AccessControlList::new(raw.control(), ace_list)))
}

fn decode_fields(sddl: &str, resolver: &SidResolver<'_>) -> Result<SecurityDescriptor, DecodeError> {
    let fields = parse_descriptor(sddl)?;
    let owner = fields.owner.map(|token| resolver.resolve(token)).transpose()?;
    let group = fields.group.map(|token| resolver.resolve(token)).transpose()?;

    let mut flags = ControlFlags::empty();
    let dacl = match fields.dacl {
        Some(raw) => decode_acl(AclKind::Discretionary, raw, resolver, &mut flags)?,
        None => None,
    };
    let sacl = match fields.sacl {
        Some(raw) => decode_acl(AclKind::System, raw, resolver, &mut flags)?,
        None => None,
    };

    Ok(SecurityDescriptor {
        owner,
        group,
        flags,
        dacl,
        sacl,
    })
}

/// Decodes an SDDL string into a [`SecurityDescriptor`].
///
/// `domain_sid` expands domain-relative aliases such as `DA`; it is only
/// validated when such an alias appears. An empty (or blank) `sddl` yields a
/// descriptor with every field absent.
///
/// # Errors
/// The first [`DecodeError`] met; no partial descriptor is returned.
///
/// # Examples
/// ```rust
/// use win_sddl::{ControlFlags, decode};
///
/// let sd = decode("O:BAG:BAD:P(A;;GA;;;BA)", "S-1-5-21-1-2-3").unwrap();
/// assert_eq!(sd.owner().unwrap().well_known_name(), Some("Administrators"));
/// assert!(sd.flags().contains(ControlFlags::DACL_PRESENT | ControlFlags::DACL_PROTECTED));
/// assert_eq!(sd.dacl().unwrap().len(), 1);
/// ```
#[inline]
pub fn decode(sddl: &str, domain_sid: &str) -> Result<SecurityDescriptor, DecodeError> {
    debug!(event = "Decode", phase = "Start", len = sddl.len());
    let resolver = SidResolver::new(domain_sid);
    let result = decode_fields(sddl, &resolver);
    match &result {
        Ok(sd) => debug!(
            event = "Decode",
            phase = "Result",
            flags = sd.flags.bits(),
            dacl_aces = sd.dacl.as_ref().map_or(0, AccessControlList::len),
            sacl_aces = sd.sacl.as_ref().map_or(0, AccessControlList::len)
        ),
        Err(err) => debug!(
            event = "Decode",
            phase = "Error",
            kind = err.kind().as_str(),
            fragment = err.fragment()
        ),
    }
    result
}
