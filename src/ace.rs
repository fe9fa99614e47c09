//! Access control entries.
//!
//! One variant of [`Ace`] per ACE type, so every consumer has to handle a
//! new type explicitly. The field layout of each variant is shared through
//! [`BasicAce`], [`ObjectAce`], [`CallbackAce`], [`CallbackObjectAce`] and
//! [`ResourceAttributeAce`].

use alloc::string::{String, ToString};

use parsing::{ace_type_tag, pairs, split_ace};
use uuid::Uuid;

use crate::access_mask::{self, AccessMask, decode_mask};
use crate::ace_flags::{AceFlags, decode_ace_flags};
use crate::error::DecodeError;
use crate::resolver::SidResolver;
use crate::sid::SecurityIdentifier;

/// ACE type, as tagged in SDDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AceType {
    /// `A`
    AccessAllowed,
    /// `D`
    AccessDenied,
    /// `AU`
    SystemAudit,
    /// `AL`
    SystemAlarm,
    /// `OA`
    AccessAllowedObject,
    /// `OD`
    AccessDeniedObject,
    /// `OU`
    SystemAuditObject,
    /// `OL`
    SystemAlarmObject,
    /// `XA`
    AccessAllowedCallback,
    /// `XD`
    AccessDeniedCallback,
    /// `XU`
    SystemAuditCallback,
    /// `ZA`
    AccessAllowedCallbackObject,
    /// `ML`
    SystemMandatoryLabel,
    /// `TL`
    SystemProcessTrustLabel,
    /// `RA`
    SystemResourceAttribute,
    /// `SP`
    SystemScopedPolicyId,
}

/// Subfield layout shared by several ACE types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AceShape {
    /// Header and trustee.
    Basic,
    /// Plus object type GUIDs.
    Object,
    /// Plus a conditional expression.
    Callback,
    /// Plus object type GUIDs and a conditional expression.
    CallbackObject,
    /// Plus a resource attribute.
    ResourceAttribute,
}

impl AceShape {
    const fn has_object_types(self) -> bool {
        matches!(self, Self::Object | Self::CallbackObject)
    }

    const fn has_extra_field(self) -> bool {
        matches!(
            self,
            Self::Callback | Self::CallbackObject | Self::ResourceAttribute
        )
    }
}

impl AceType {
    const ALL: [Self; 16] = [
        Self::AccessAllowed,
        Self::AccessDenied,
        Self::SystemAudit,
        Self::SystemAlarm,
        Self::AccessAllowedObject,
        Self::AccessDeniedObject,
        Self::SystemAuditObject,
        Self::SystemAlarmObject,
        Self::AccessAllowedCallback,
        Self::AccessDeniedCallback,
        Self::SystemAuditCallback,
        Self::AccessAllowedCallbackObject,
        Self::SystemMandatoryLabel,
        Self::SystemProcessTrustLabel,
        Self::SystemResourceAttribute,
        Self::SystemScopedPolicyId,
    ];

    /// Type for an SDDL tag, `None` if the tag is unknown.
    #[inline]
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.tag() == tag)
    }

    /// SDDL tag (`"OA"`).
    #[inline]
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::AccessAllowed => "A",
            Self::AccessDenied => "D",
            Self::SystemAudit => "AU",
            Self::SystemAlarm => "AL",
            Self::AccessAllowedObject => "OA",
            Self::AccessDeniedObject => "OD",
            Self::SystemAuditObject => "OU",
            Self::SystemAlarmObject => "OL",
            Self::AccessAllowedCallback => "XA",
            Self::AccessDeniedCallback => "XD",
            Self::SystemAuditCallback => "XU",
            Self::AccessAllowedCallbackObject => "ZA",
            Self::SystemMandatoryLabel => "ML",
            Self::SystemProcessTrustLabel => "TL",
            Self::SystemResourceAttribute => "RA",
            Self::SystemScopedPolicyId => "SP",
        }
    }

    /// MS-DTYP structure name (`"ACCESS_ALLOWED_OBJECT_ACE"`).
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AccessAllowed => "ACCESS_ALLOWED_ACE",
            Self::AccessDenied => "ACCESS_DENIED_ACE",
            Self::SystemAudit => "SYSTEM_AUDIT_ACE",
            Self::SystemAlarm => "SYSTEM_ALARM_ACE",
            Self::AccessAllowedObject => "ACCESS_ALLOWED_OBJECT_ACE",
            Self::AccessDeniedObject => "ACCESS_DENIED_OBJECT_ACE",
            Self::SystemAuditObject => "SYSTEM_AUDIT_OBJECT_ACE",
            Self::SystemAlarmObject => "SYSTEM_ALARM_OBJECT_ACE",
            Self::AccessAllowedCallback => "ACCESS_ALLOWED_CALLBACK_ACE",
            Self::AccessDeniedCallback => "ACCESS_DENIED_CALLBACK_ACE",
            Self::SystemAuditCallback => "SYSTEM_AUDIT_CALLBACK_ACE",
            Self::AccessAllowedCallbackObject => "ACCESS_ALLOWED_CALLBACK_OBJECT_ACE",
            Self::SystemMandatoryLabel => "SYSTEM_MANDATORY_LABEL_ACE",
            Self::SystemProcessTrustLabel => "SYSTEM_PROCESS_TRUST_LABEL_ACE",
            Self::SystemResourceAttribute => "SYSTEM_RESOURCE_ATTRIBUTE_ACE",
            Self::SystemScopedPolicyId => "SYSTEM_SCOPED_POLICY_ID_ACE",
        }
    }

    /// Subfield layout of the type.
    #[inline]
    #[must_use]
    pub const fn shape(self) -> AceShape {
        match self {
            Self::AccessAllowed
            | Self::AccessDenied
            | Self::SystemAudit
            | Self::SystemAlarm
            | Self::SystemMandatoryLabel
            | Self::SystemProcessTrustLabel
            | Self::SystemScopedPolicyId => AceShape::Basic,
            Self::AccessAllowedObject
            | Self::AccessDeniedObject
            | Self::SystemAuditObject
            | Self::SystemAlarmObject => AceShape::Object,
            Self::AccessAllowedCallback | Self::AccessDeniedCallback | Self::SystemAuditCallback => {
                AceShape::Callback
            }
            Self::AccessAllowedCallbackObject => AceShape::CallbackObject,
            Self::SystemResourceAttribute => AceShape::ResourceAttribute,
        }
    }
}

/// Flags and rights common to every ACE.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AceHeader {
    /// Inheritance and audit flags.
    pub ace_flags: AceFlags,
    /// Access rights.
    pub mask: AccessMask,
}

/// ACE with a header and a trustee only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BasicAce {
    /// Flags and rights.
    pub header: AceHeader,
    /// Trustee.
    pub sid: SecurityIdentifier,
}

/// ACE restricted to an object type and/or inherited by an object type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectAce {
    /// Flags and rights.
    pub header: AceHeader,
    /// Trustee.
    pub sid: SecurityIdentifier,
    /// Object, property set or extended right the ACE applies to.
    pub object_type: Option<Uuid>,
    /// Object type that inherits the ACE.
    pub inherited_object_type: Option<Uuid>,
}

/// ACE guarded by a conditional expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackAce {
    /// Flags and rights.
    pub header: AceHeader,
    /// Trustee.
    pub sid: SecurityIdentifier,
    /// Conditional expression, verbatim.
    pub condition: String,
}

/// Object ACE guarded by a conditional expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackObjectAce {
    /// Flags and rights.
    pub header: AceHeader,
    /// Trustee.
    pub sid: SecurityIdentifier,
    /// Object, property set or extended right the ACE applies to.
    pub object_type: Option<Uuid>,
    /// Object type that inherits the ACE.
    pub inherited_object_type: Option<Uuid>,
    /// Conditional expression, verbatim.
    pub condition: String,
}

/// Resource attribute ACE.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceAttributeAce {
    /// Flags and rights.
    pub header: AceHeader,
    /// Trustee.
    pub sid: SecurityIdentifier,
    /// Attribute definition, verbatim.
    pub attribute: String,
}

/// An access control entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Ace {
    AccessAllowed(BasicAce),
    AccessDenied(BasicAce),
    SystemAudit(BasicAce),
    SystemAlarm(BasicAce),
    AccessAllowedObject(ObjectAce),
    AccessDeniedObject(ObjectAce),
    SystemAuditObject(ObjectAce),
    SystemAlarmObject(ObjectAce),
    AccessAllowedCallback(CallbackAce),
    AccessDeniedCallback(CallbackAce),
    SystemAuditCallback(CallbackAce),
    AccessAllowedCallbackObject(CallbackObjectAce),
    SystemMandatoryLabel(BasicAce),
    SystemProcessTrustLabel(BasicAce),
    SystemResourceAttribute(ResourceAttributeAce),
    SystemScopedPolicyId(BasicAce),
}

impl Ace {
    /// Type of the entry.
    #[inline]
    #[must_use]
    pub const fn ace_type(&self) -> AceType {
        match self {
            Self::AccessAllowed(_) => AceType::AccessAllowed,
            Self::AccessDenied(_) => AceType::AccessDenied,
            Self::SystemAudit(_) => AceType::SystemAudit,
            Self::SystemAlarm(_) => AceType::SystemAlarm,
            Self::AccessAllowedObject(_) => AceType::AccessAllowedObject,
            Self::AccessDeniedObject(_) => AceType::AccessDeniedObject,
            Self::SystemAuditObject(_) => AceType::SystemAuditObject,
            Self::SystemAlarmObject(_) => AceType::SystemAlarmObject,
            Self::AccessAllowedCallback(_) => AceType::AccessAllowedCallback,
            Self::AccessDeniedCallback(_) => AceType::AccessDeniedCallback,
            Self::SystemAuditCallback(_) => AceType::SystemAuditCallback,
            Self::AccessAllowedCallbackObject(_) => AceType::AccessAllowedCallbackObject,
            Self::SystemMandatoryLabel(_) => AceType::SystemMandatoryLabel,
            Self::SystemProcessTrustLabel(_) => AceType::SystemProcessTrustLabel,
            Self::SystemResourceAttribute(_) => AceType::SystemResourceAttribute,
            Self::SystemScopedPolicyId(_) => AceType::SystemScopedPolicyId,
        }
    }

    /// Flags and rights.
    #[inline]
    #[must_use]
    pub const fn header(&self) -> &AceHeader {
        match self {
            Self::AccessAllowed(ace)
            | Self::AccessDenied(ace)
            | Self::SystemAudit(ace)
            | Self::SystemAlarm(ace)
            | Self::SystemMandatoryLabel(ace)
            | Self::SystemProcessTrustLabel(ace)
            | Self::SystemScopedPolicyId(ace) => &ace.header,
            Self::AccessAllowedObject(ace)
            | Self::AccessDeniedObject(ace)
            | Self::SystemAuditObject(ace)
            | Self::SystemAlarmObject(ace) => &ace.header,
            Self::AccessAllowedCallback(ace)
            | Self::AccessDeniedCallback(ace)
            | Self::SystemAuditCallback(ace) => &ace.header,
            Self::AccessAllowedCallbackObject(ace) => &ace.header,
            Self::SystemResourceAttribute(ace) => &ace.header,
        }
    }

    /// Trustee.
    #[inline]
    #[must_use]
    pub const fn sid(&self) -> &SecurityIdentifier {
        match self {
            Self::AccessAllowed(ace)
            | Self::AccessDenied(ace)
            | Self::SystemAudit(ace)
            | Self::SystemAlarm(ace)
            | Self::SystemMandatoryLabel(ace)
            | Self::SystemProcessTrustLabel(ace)
            | Self::SystemScopedPolicyId(ace) => &ace.sid,
            Self::AccessAllowedObject(ace)
            | Self::AccessDeniedObject(ace)
            | Self::SystemAuditObject(ace)
            | Self::SystemAlarmObject(ace) => &ace.sid,
            Self::AccessAllowedCallback(ace)
            | Self::AccessDeniedCallback(ace)
            | Self::SystemAuditCallback(ace) => &ace.sid,
            Self::AccessAllowedCallbackObject(ace) => &ace.sid,
            Self::SystemResourceAttribute(ace) => &ace.sid,
        }
    }

    /// Object type GUID, for the object variants.
    #[inline]
    #[must_use]
    pub const fn object_type(&self) -> Option<&Uuid> {
        match self {
            Self::AccessAllowedObject(ace)
            | Self::AccessDeniedObject(ace)
            | Self::SystemAuditObject(ace)
            | Self::SystemAlarmObject(ace) => ace.object_type.as_ref(),
            Self::AccessAllowedCallbackObject(ace) => ace.object_type.as_ref(),
            _ => None,
        }
    }

    /// Conditional expression, for the callback variants.
    #[inline]
    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        match self {
            Self::AccessAllowedCallback(ace)
            | Self::AccessDeniedCallback(ace)
            | Self::SystemAuditCallback(ace) => Some(&ace.condition),
            Self::AccessAllowedCallbackObject(ace) => Some(&ace.condition),
            _ => None,
        }
    }
}

fn parse_guid(field: &str) -> Result<Option<Uuid>, DecodeError> {
    if field.is_empty() {
        return Ok(None);
    }
    Uuid::try_parse(field)
        .map(Some)
        .map_err(|_| DecodeError::malformed_ace(field, "invalid object type GUID"))
}

fn parse_rights(field: &str) -> Result<AccessMask, DecodeError> {
    match access_mask::numeric_literal(field) {
        Some(Some(value)) => Ok(AccessMask::from_numeric(value)),
        Some(None) => Err(DecodeError::malformed_ace(
            field,
            "numeric access mask is not a 32-bit value",
        )),
        None => Ok(decode_mask(pairs(field))),
    }
}

fn strip_parens(clause: &str) -> &str {
    clause
        .strip_prefix('(')
        .and_then(|body| body.strip_suffix(')'))
        .unwrap_or(clause)
}

/// Parses one ACE clause (with or without its parentheses), resolving the
/// trustee against `domain_sid`.
///
/// # Errors
/// - [`DecodeError::UnknownAceType`] if the type tag is unknown; checked first.
/// - [`DecodeError::MalformedAce`] on a wrong subfield count, a GUID on a
///   non-object type, an invalid GUID or an oversized numeric mask.
/// - Any error of [`SidResolver::resolve`] for the trustee.
///
/// # Examples
/// ```rust
/// use win_sddl::{AccessRights, AceType, parse_ace};
///
/// let ace = parse_ace("(A;;GA;;;BA)", "S-1-5-21-1-2-3").unwrap();
/// assert_eq!(ace.ace_type(), AceType::AccessAllowed);
/// assert_eq!(ace.header().mask.rights(), AccessRights::GENERIC_ALL);
/// assert_eq!(ace.sid().canonical(), "S-1-5-32-544");
/// ```
#[inline]
pub fn parse_ace(clause: &str, domain_sid: &str) -> Result<Ace, DecodeError> {
    parse_ace_with(strip_parens(clause), &SidResolver::new(domain_sid))
}

/// [`parse_ace`] for a clause body, with an existing resolver.
pub(crate) fn parse_ace_with(clause: &str, resolver: &SidResolver<'_>) -> Result<Ace, DecodeError> {
    let tag = ace_type_tag(clause);
    let ace_type =
        AceType::from_tag(tag).ok_or_else(|| DecodeError::UnknownAceType(tag.to_string()))?;
    let raw = split_ace(clause)?;
    let shape = ace_type.shape();

    let extra = match (shape.has_extra_field(), raw.extra) {
        (true, Some(extra)) => extra.to_string(),
        (true, None) => {
            return Err(DecodeError::malformed_ace(clause, "missing seventh subfield"));
        }
        (false, Some(_)) => return Err(DecodeError::malformed_ace(clause, "too many subfields")),
        (false, None) => String::new(),
    };
    if !shape.has_object_types()
        && !(raw.object_type.is_empty() && raw.inherited_object_type.is_empty())
    {
        return Err(DecodeError::malformed_ace(
            clause,
            "object type GUID on a non-object ACE",
        ));
    }

    let header = AceHeader {
        ace_flags: decode_ace_flags(pairs(raw.flags)),
        mask: parse_rights(raw.rights)?,
    };
    let object_type = parse_guid(raw.object_type)?;
    let inherited_object_type = parse_guid(raw.inherited_object_type)?;
    let sid = resolver.resolve(raw.trustee)?;

    Ok(assemble(ace_type, header, sid, object_type, inherited_object_type, extra))
}

fn assemble(
    ace_type: AceType,
    header: AceHeader,
    sid: SecurityIdentifier,
    object_type: Option<Uuid>,
    inherited_object_type: Option<Uuid>,
    extra: String,
) -> Ace {
    let basic = |header, sid| BasicAce { header, sid };
    let object = |header, sid| ObjectAce {
        header,
        sid,
        object_type,
        inherited_object_type,
    };
    match ace_type {
        AceType::AccessAllowed => Ace::AccessAllowed(basic(header, sid)),
        AceType::AccessDenied => Ace::AccessDenied(basic(header, sid)),
        AceType::SystemAudit => Ace::SystemAudit(basic(header, sid)),
        AceType::SystemAlarm => Ace::SystemAlarm(basic(header, sid)),
        AceType::SystemMandatoryLabel => Ace::SystemMandatoryLabel(basic(header, sid)),
        AceType::SystemProcessTrustLabel => Ace::SystemProcessTrustLabel(basic(header, sid)),
        AceType::SystemScopedPolicyId => Ace::SystemScopedPolicyId(basic(header, sid)),
        AceType::AccessAllowedObject => Ace::AccessAllowedObject(object(header, sid)),
        AceType::AccessDeniedObject => Ace::AccessDeniedObject(object(header, sid)),
        AceType::SystemAuditObject => Ace::SystemAuditObject(object(header, sid)),
        AceType::SystemAlarmObject => Ace::SystemAlarmObject(object(header, sid)),
        AceType::AccessAllowedCallback => Ace::AccessAllowedCallback(CallbackAce {
            header,
            sid,
            condition: extra,
        }),
        AceType::AccessDeniedCallback => Ace::AccessDeniedCallback(CallbackAce {
            header,
            sid,
            condition: extra,
        }),
        AceType::SystemAuditCallback => Ace::SystemAuditCallback(CallbackAce {
            header,
            sid,
            condition: extra,
        }),
        AceType::AccessAllowedCallbackObject => {
            Ace::AccessAllowedCallbackObject(CallbackObjectAce {
                header,
                sid,
                object_type,
                inherited_object_type,
                condition: extra,
            })
        }
        AceType::SystemResourceAttribute => Ace::SystemResourceAttribute(ResourceAttributeAce {
            header,
            sid,
            attribute: extra,
        }),
    }
}
