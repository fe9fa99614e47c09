//! Security descriptor control flags (`SECURITY_DESCRIPTOR_CONTROL`).

use bitflags::bitflags;
use parsing::ControlToken;

use crate::acl::AclKind;

bitflags! {
    /// The 16 control bits of a security descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct ControlFlags: u16 {
        /// Owner came from a default mechanism.
        const OWNER_DEFAULTED = 0x0001;
        /// Group came from a default mechanism.
        const GROUP_DEFAULTED = 0x0002;
        /// A DACL is present (possibly null).
        const DACL_PRESENT = 0x0004;
        /// DACL came from a default mechanism.
        const DACL_DEFAULTED = 0x0008;
        /// A SACL is present (possibly null).
        const SACL_PRESENT = 0x0010;
        /// SACL came from a default mechanism.
        const SACL_DEFAULTED = 0x0020;
        /// `NO`: the ACL comes from an untrusted source.
        const DACL_UNTRUSTED = 0x0040;
        /// Server security.
        const SERVER_SECURITY = 0x0080;
        /// `AR` on the DACL.
        const DACL_AUTO_INHERIT_REQ = 0x0100;
        /// `AR` on the SACL.
        const SACL_AUTO_INHERIT_REQ = 0x0200;
        /// `AI` on the DACL.
        const DACL_AUTO_INHERITED = 0x0400;
        /// `AI` on the SACL.
        const SACL_AUTO_INHERITED = 0x0800;
        /// `P` on the DACL.
        const DACL_PROTECTED = 0x1000;
        /// `P` on the SACL.
        const SACL_PROTECTED = 0x2000;
        /// Resource manager control bits are valid.
        const RM_CONTROL_VALID = 0x4000;
        /// Self-relative layout.
        const SELF_RELATIVE = 0x8000;
    }
}

impl Default for ControlFlags {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

const NAMES: [(ControlFlags, &str); 16] = [
    (ControlFlags::OWNER_DEFAULTED, "OwnerDefaulted"),
    (ControlFlags::GROUP_DEFAULTED, "GroupDefaulted"),
    (ControlFlags::DACL_PRESENT, "DiscretionaryAclPresent"),
    (ControlFlags::DACL_DEFAULTED, "DiscretionaryAclDefaulted"),
    (ControlFlags::SACL_PRESENT, "SystemAclPresent"),
    (ControlFlags::SACL_DEFAULTED, "SystemAclDefaulted"),
    (ControlFlags::DACL_UNTRUSTED, "DiscretionaryAclUntrusted"),
    (ControlFlags::SERVER_SECURITY, "ServerSecurity"),
    (ControlFlags::DACL_AUTO_INHERIT_REQ, "DiscretionaryAclAutoInheritRequired"),
    (ControlFlags::SACL_AUTO_INHERIT_REQ, "SystemAclAutoInheritRequired"),
    (ControlFlags::DACL_AUTO_INHERITED, "DiscretionaryAclAutoInherited"),
    (ControlFlags::SACL_AUTO_INHERITED, "SystemAclAutoInherited"),
    (ControlFlags::DACL_PROTECTED, "DiscretionaryAclProtected"),
    (ControlFlags::SACL_PROTECTED, "SystemAclProtected"),
    (ControlFlags::RM_CONTROL_VALID, "RMControlValid"),
    (ControlFlags::SELF_RELATIVE, "SelfRelative"),
];

impl ControlFlags {
    /// `*Present` bit of the given ACL.
    #[inline]
    #[must_use]
    pub const fn present(kind: AclKind) -> Self {
        match kind {
            AclKind::Discretionary => Self::DACL_PRESENT,
            AclKind::System => Self::SACL_PRESENT,
        }
    }

    /// Bits set by one control token of the given ACL.
    ///
    /// `NO` always maps to [`DACL_UNTRUSTED`](Self::DACL_UNTRUSTED), the
    /// only untrusted bit there is. `NO_ACCESS_CONTROL` sets nothing by
    /// itself; the ACL is still present.
    #[inline]
    #[must_use]
    pub const fn from_control_token(kind: AclKind, token: ControlToken) -> Self {
        match (kind, token) {
            (AclKind::Discretionary, ControlToken::Protected) => Self::DACL_PROTECTED,
            (AclKind::System, ControlToken::Protected) => Self::SACL_PROTECTED,
            (AclKind::Discretionary, ControlToken::AutoInheritRequired) => {
                Self::DACL_AUTO_INHERIT_REQ
            }
            (AclKind::System, ControlToken::AutoInheritRequired) => Self::SACL_AUTO_INHERIT_REQ,
            (AclKind::Discretionary, ControlToken::AutoInherited) => Self::DACL_AUTO_INHERITED,
            (AclKind::System, ControlToken::AutoInherited) => Self::SACL_AUTO_INHERITED,
            (_, ControlToken::Untrusted) => Self::DACL_UNTRUSTED,
            (_, ControlToken::NullAcl) => Self::empty(),
        }
    }

    /// CamelCase names of the set bits, in ascending bit order.
    #[inline]
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        NAMES
            .into_iter()
            .filter(move |&(flag, _)| self.contains(flag))
            .map(|(_, name)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn names_ascending() {
        let flags = ControlFlags::DACL_PROTECTED | ControlFlags::DACL_PRESENT;
        assert_eq!(
            flags.names().collect::<Vec<_>>(),
            ["DiscretionaryAclPresent", "DiscretionaryAclProtected"]
        );
        assert_eq!(ControlFlags::all().names().count(), 16);
    }

    #[test]
    fn tokens_depend_on_acl() {
        assert_eq!(
            ControlFlags::from_control_token(AclKind::System, ControlToken::Protected),
            ControlFlags::SACL_PROTECTED
        );
        assert_eq!(
            ControlFlags::from_control_token(AclKind::System, ControlToken::Untrusted),
            ControlFlags::DACL_UNTRUSTED
        );
        assert!(ControlFlags::from_control_token(AclKind::Discretionary, ControlToken::NullAcl).is_empty());
    }
}
