//! `Serialize` impls producing the JSON shape consumed by front ends.
//!
//! ```text
//! SID  = { "sid": "S-1-…", "well-known-name": string|null }
//! ACE  = { "<MS-DTYP ACE name>": { "header": {...}, "sid": SID, ... } }
//! ACL  = { "control": string, "ace_list": [ACE…] }
//! SD   = { "owner", "group", "flags", "dacl", "sacl" }
//! ```
//!
//! Flag sets serialize as name lists. Bits without a name follow as one
//! `"0x%08X"` string, then unrecognized tokens verbatim. The mask of a
//! `SYSTEM_MANDATORY_LABEL_ACE` is named after its policy bits
//! (`NO_WRITE_UP`, …) instead of the access rights sharing those bits.

use core::fmt::{self, Display};

use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::access_mask::AccessMask;
use crate::ace::{
    Ace, AceHeader, BasicAce, CallbackAce, CallbackObjectAce, ObjectAce, ResourceAttributeAce,
};
use crate::ace_flags::AceFlags;
use crate::acl::AccessControlList;
use crate::control_flags::ControlFlags;
use crate::descriptor::SecurityDescriptor;
use crate::error::{DecodeError, ErrorKind};
use crate::sid::SecurityIdentifier;
use crate::unrecognized::UnrecognizedTokens;

/// Serializes a `Display` value as a string.
struct Displayed<T>(T);

impl<T: Display> Serialize for Displayed<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

struct Residual(u32);

impl Display for Residual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

fn guid(value: Option<&Uuid>) -> Option<Displayed<&Uuid>> {
    value.map(Displayed)
}

// Every named flag is a single bit, so `named_bits.count_ones()` is the
// number of names.
fn serialize_flag_list<'a, S, I>(
    serializer: S,
    (names, named_bits): (I, u32),
    residual: u32,
    unrecognized: &UnrecognizedTokens,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    I: Iterator<Item = &'a str>,
{
    let named = usize::try_from(named_bits.count_ones()).unwrap_or_default();
    let len = named + usize::from(residual != 0) + unrecognized.len();
    let mut seq = serializer.serialize_seq(Some(len))?;
    for name in names {
        seq.serialize_element(name)?;
    }
    if residual != 0 {
        seq.serialize_element(&Displayed(Residual(residual)))?;
    }
    for token in unrecognized.iter() {
        seq.serialize_element(token)?;
    }
    seq.end()
}

impl Serialize for SecurityIdentifier {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("SecurityIdentifier", 2)?;
        state.serialize_field("sid", self.canonical())?;
        state.serialize_field("well-known-name", &self.well_known_name())?;
        state.end()
    }
}

impl Serialize for AccessMask {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_flag_list(
            serializer,
            (
                self.rights().iter_names().map(|(name, _)| name),
                self.rights().bits(),
            ),
            self.residual(),
            self.unrecognized(),
        )
    }
}

/// Mask of an `ML` ACE, named after the mandatory label policy.
struct MandatoryMask<'a>(&'a AccessMask);

impl Serialize for MandatoryMask<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let (policy, rest) = self.0.mandatory_policy();
        serialize_flag_list(
            serializer,
            (policy.iter_names().map(|(name, _)| name), policy.bits()),
            rest,
            self.0.unrecognized(),
        )
    }
}

impl Serialize for AceFlags {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_flag_list(
            serializer,
            (
                self.flags().iter_names().map(|(name, _)| name),
                u32::from(self.flags().bits()),
            ),
            0,
            self.unrecognized(),
        )
    }
}

impl Serialize for ControlFlags {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.names())
    }
}

impl Serialize for AceHeader {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("AceHeader", 2)?;
        state.serialize_field("ace_flags", &self.ace_flags)?;
        state.serialize_field("mask", &self.mask)?;
        state.end()
    }
}

struct MandatoryLabelAce<'a>(&'a BasicAce);

impl Serialize for MandatoryLabelAce<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        struct Header<'a>(&'a AceHeader);

        impl Serialize for Header<'_> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                let mut state = serializer.serialize_struct("AceHeader", 2)?;
                state.serialize_field("ace_flags", &self.0.ace_flags)?;
                state.serialize_field("mask", &MandatoryMask(&self.0.mask))?;
                state.end()
            }
        }

        let mut state = serializer.serialize_struct("BasicAce", 2)?;
        state.serialize_field("header", &Header(&self.0.header))?;
        state.serialize_field("sid", &self.0.sid)?;
        state.end()
    }
}

impl Serialize for BasicAce {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("BasicAce", 2)?;
        state.serialize_field("header", &self.header)?;
        state.serialize_field("sid", &self.sid)?;
        state.end()
    }
}

impl Serialize for ObjectAce {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ObjectAce", 4)?;
        state.serialize_field("header", &self.header)?;
        state.serialize_field("sid", &self.sid)?;
        state.serialize_field("object_type", &guid(self.object_type.as_ref()))?;
        state.serialize_field(
            "inherited_object_type",
            &guid(self.inherited_object_type.as_ref()),
        )?;
        state.end()
    }
}

impl Serialize for CallbackAce {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("CallbackAce", 3)?;
        state.serialize_field("header", &self.header)?;
        state.serialize_field("sid", &self.sid)?;
        state.serialize_field("condition", &self.condition)?;
        state.end()
    }
}

impl Serialize for CallbackObjectAce {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("CallbackObjectAce", 5)?;
        state.serialize_field("header", &self.header)?;
        state.serialize_field("sid", &self.sid)?;
        state.serialize_field("object_type", &guid(self.object_type.as_ref()))?;
        state.serialize_field(
            "inherited_object_type",
            &guid(self.inherited_object_type.as_ref()),
        )?;
        state.serialize_field("condition", &self.condition)?;
        state.end()
    }
}

impl Serialize for ResourceAttributeAce {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ResourceAttributeAce", 3)?;
        state.serialize_field("header", &self.header)?;
        state.serialize_field("sid", &self.sid)?;
        state.serialize_field("attribute", &self.attribute)?;
        state.end()
    }
}

impl Serialize for Ace {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let name = self.ace_type().name();
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::AccessAllowed(ace)
            | Self::AccessDenied(ace)
            | Self::SystemAudit(ace)
            | Self::SystemAlarm(ace)
            | Self::SystemProcessTrustLabel(ace)
            | Self::SystemScopedPolicyId(ace) => map.serialize_entry(name, ace)?,
            Self::SystemMandatoryLabel(ace) => {
                map.serialize_entry(name, &MandatoryLabelAce(ace))?;
            }
            Self::AccessAllowedObject(ace)
            | Self::AccessDeniedObject(ace)
            | Self::SystemAuditObject(ace)
            | Self::SystemAlarmObject(ace) => map.serialize_entry(name, ace)?,
            Self::AccessAllowedCallback(ace)
            | Self::AccessDeniedCallback(ace)
            | Self::SystemAuditCallback(ace) => map.serialize_entry(name, ace)?,
            Self::AccessAllowedCallbackObject(ace) => map.serialize_entry(name, ace)?,
            Self::SystemResourceAttribute(ace) => map.serialize_entry(name, ace)?,
        }
        map.end()
    }
}

impl Serialize for AccessControlList {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("AccessControlList", 2)?;
        state.serialize_field("control", self.control())?;
        state.serialize_field("ace_list", self.ace_list())?;
        state.end()
    }
}

impl Serialize for SecurityDescriptor {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("SecurityDescriptor", 5)?;
        state.serialize_field("owner", &self.owner())?;
        state.serialize_field("group", &self.group())?;
        state.serialize_field("flags", &self.flags())?;
        state.serialize_field("dacl", &self.dacl())?;
        state.serialize_field("sacl", &self.sacl())?;
        state.end()
    }
}

impl Serialize for ErrorKind {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for DecodeError {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("DecodeError", 3)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("fragment", self.fragment())?;
        state.serialize_field("message", &Displayed(self))?;
        state.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;
    use crate::access_mask::decode_mask;
    use crate::resolver::resolve;
    use serde_test::{Token, assert_ser_tokens};

    #[test]
    fn sid_tokens() {
        let sid = resolve("WD", "").unwrap();
        assert_ser_tokens(
            &sid,
            &[
                Token::Struct {
                    name: "SecurityIdentifier",
                    len: 2,
                },
                Token::Str("sid"),
                Token::Str("S-1-1-0"),
                Token::Str("well-known-name"),
                Token::Some,
                Token::Str("Everyone"),
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn unnamed_sid_tokens() {
        let sid = resolve("S-1-5-21-7-7-7-1001", "").unwrap();
        assert_ser_tokens(
            &sid,
            &[
                Token::Struct {
                    name: "SecurityIdentifier",
                    len: 2,
                },
                Token::Str("sid"),
                Token::Str("S-1-5-21-7-7-7-1001"),
                Token::Str("well-known-name"),
                Token::None,
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn mask_tokens() {
        let mask = decode_mask(["WP", "RP", "ZZ"]);
        assert_ser_tokens(
            &mask,
            &[
                Token::Seq { len: Some(3) },
                Token::Str("READ_PROPERTY"),
                Token::Str("WRITE_PROPERTY"),
                Token::Str("ZZ"),
                Token::SeqEnd,
            ],
        );
    }

    #[test]
    fn mandatory_mask_tokens() {
        let mask = AccessMask::from_numeric(0x0001_0003);
        assert_ser_tokens(
            &MandatoryMask(&mask),
            &[
                Token::Seq { len: Some(3) },
                Token::Str("NO_WRITE_UP"),
                Token::Str("NO_READ_UP"),
                Token::Str("0x00010000"),
                Token::SeqEnd,
            ],
        );
    }

    #[test]
    fn residual_tokens() {
        let mask = AccessMask::from_numeric(0x1F_01FF);
        assert_ser_tokens(
            &mask,
            &[
                Token::Seq { len: Some(1) },
                Token::Str("0x001F01FF"),
                Token::SeqEnd,
            ],
        );
    }

    #[test]
    fn control_flag_tokens() {
        let flags = ControlFlags::SACL_PRESENT | ControlFlags::DACL_PRESENT;
        assert_ser_tokens(
            &flags,
            &[
                Token::Seq { len: None },
                Token::Str("DiscretionaryAclPresent"),
                Token::Str("SystemAclPresent"),
                Token::SeqEnd,
            ],
        );
    }
}
