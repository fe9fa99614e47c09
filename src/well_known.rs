//! Well-known SID aliases of SDDL
//!
//! Source: https://learn.microsoft.com/windows/win32/secauthz/sid-strings
//!
//! Each two-letter alias stands either for a fixed SID that is the same on
//! every machine, or for a relative identifier (RID) appended to the domain
//! SID the caller supplies. The table is static and never mutated.

use parsing::SidComponents;

const WORLD_AUTHORITY: u64 = 1;
const CREATOR_AUTHORITY: u64 = 3;
const NT_AUTHORITY: u64 = 5;
const APP_PACKAGE_AUTHORITY: u64 = 15;
const MANDATORY_LABEL_AUTHORITY: u64 = 16;
const AUTHENTICATION_AUTHORITY: u64 = 18;

/// What an alias expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownSidKind {
    /// A SID independent of any domain.
    Universal {
        /// Identifier authority of the SID.
        identifier_authority: u64,
        /// Sub-authorities of the SID.
        sub_authority: &'static [u32],
    },
    /// `<domain SID>-<rid>`.
    DomainRelative {
        /// Relative identifier appended to the domain SID.
        rid: u32,
    },
}

/// One entry of the SID table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WellKnownSid {
    alias: &'static str,
    name: &'static str,
    kind: WellKnownSidKind,
}

impl WellKnownSid {
    const fn universal(
        alias: &'static str,
        name: &'static str,
        identifier_authority: u64,
        sub_authority: &'static [u32],
    ) -> Self {
        Self {
            alias,
            name,
            kind: WellKnownSidKind::Universal {
                identifier_authority,
                sub_authority,
            },
        }
    }

    const fn domain(alias: &'static str, name: &'static str, rid: u32) -> Self {
        Self {
            alias,
            name,
            kind: WellKnownSidKind::DomainRelative { rid },
        }
    }

    /// SDDL alias (`"BA"`).
    #[inline]
    #[must_use]
    pub const fn alias(&self) -> &'static str {
        self.alias
    }

    /// Display name (`"Administrators"`).
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// How the alias expands.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> WellKnownSidKind {
        self.kind
    }

    /// `true` if the alias needs a domain SID to expand.
    #[inline]
    #[must_use]
    pub const fn is_domain_relative(&self) -> bool {
        matches!(self.kind, WellKnownSidKind::DomainRelative { .. })
    }

    fn matches_universal(&self, sid: &SidComponents) -> bool {
        match self.kind {
            WellKnownSidKind::Universal {
                identifier_authority,
                sub_authority,
            } => {
                identifier_authority == sid.identifier_authority
                    && sub_authority == sid.sub_authority.as_slice()
            }
            WellKnownSidKind::DomainRelative { .. } => false,
        }
    }
}

/// Every alias known to the decoder.
pub static WELL_KNOWN_SIDS: [WellKnownSid; 68] = [
    // ---- Basic Authorities ----
    WellKnownSid::universal("WD", "Everyone", WORLD_AUTHORITY, &[0]),
    WellKnownSid::universal("CO", "Creator Owner", CREATOR_AUTHORITY, &[0]),
    WellKnownSid::universal("CG", "Creator Group", CREATOR_AUTHORITY, &[1]),
    WellKnownSid::universal("OW", "Owner Rights", CREATOR_AUTHORITY, &[4]),
    // ---- NT Authority (S-1-5) ----
    WellKnownSid::universal("NU", "Network", NT_AUTHORITY, &[2]),
    WellKnownSid::universal("IU", "Interactive", NT_AUTHORITY, &[4]),
    WellKnownSid::universal("SU", "Service", NT_AUTHORITY, &[6]),
    WellKnownSid::universal("AN", "Anonymous Logon", NT_AUTHORITY, &[7]),
    WellKnownSid::universal("ED", "Enterprise Domain Controllers", NT_AUTHORITY, &[9]),
    WellKnownSid::universal("PS", "Principal Self", NT_AUTHORITY, &[10]),
    WellKnownSid::universal("AU", "Authenticated Users", NT_AUTHORITY, &[11]),
    WellKnownSid::universal("RC", "Restricted Code", NT_AUTHORITY, &[12]),
    WellKnownSid::universal("SY", "Local System", NT_AUTHORITY, &[18]),
    WellKnownSid::universal("LS", "Local Service", NT_AUTHORITY, &[19]),
    WellKnownSid::universal("NS", "Network Service", NT_AUTHORITY, &[20]),
    WellKnownSid::universal("WR", "Write Restricted Code", NT_AUTHORITY, &[33]),
    WellKnownSid::universal("UD", "User Mode Drivers", NT_AUTHORITY, &[84, 0, 0, 0, 0, 0]),
    // ---- BUILTIN Domain (S-1-5-32) ----
    WellKnownSid::universal("BA", "Administrators", NT_AUTHORITY, &[32, 544]),
    WellKnownSid::universal("BU", "Users", NT_AUTHORITY, &[32, 545]),
    WellKnownSid::universal("BG", "Guests", NT_AUTHORITY, &[32, 546]),
    WellKnownSid::universal("PU", "Power Users", NT_AUTHORITY, &[32, 547]),
    WellKnownSid::universal("AO", "Account Operators", NT_AUTHORITY, &[32, 548]),
    WellKnownSid::universal("SO", "Server Operators", NT_AUTHORITY, &[32, 549]),
    WellKnownSid::universal("PO", "Print Operators", NT_AUTHORITY, &[32, 550]),
    WellKnownSid::universal("BO", "Backup Operators", NT_AUTHORITY, &[32, 551]),
    WellKnownSid::universal("RE", "Replicator", NT_AUTHORITY, &[32, 552]),
    WellKnownSid::universal("RU", "Pre-Windows 2000 Compatible Access", NT_AUTHORITY, &[32, 554]),
    WellKnownSid::universal("RD", "Remote Desktop Users", NT_AUTHORITY, &[32, 555]),
    WellKnownSid::universal("NO", "Network Configuration Operators", NT_AUTHORITY, &[32, 556]),
    WellKnownSid::universal("MU", "Performance Monitor Users", NT_AUTHORITY, &[32, 558]),
    WellKnownSid::universal("LU", "Performance Log Users", NT_AUTHORITY, &[32, 559]),
    WellKnownSid::universal("IS", "IIS_IUSRS", NT_AUTHORITY, &[32, 568]),
    WellKnownSid::universal("CY", "Cryptographic Operators", NT_AUTHORITY, &[32, 569]),
    WellKnownSid::universal("ER", "Event Log Readers", NT_AUTHORITY, &[32, 573]),
    WellKnownSid::universal("CD", "Certificate Service DCOM Access", NT_AUTHORITY, &[32, 574]),
    WellKnownSid::universal("RA", "RDS Remote Access Servers", NT_AUTHORITY, &[32, 575]),
    WellKnownSid::universal("ES", "RDS Endpoint Servers", NT_AUTHORITY, &[32, 576]),
    WellKnownSid::universal("MS", "RDS Management Servers", NT_AUTHORITY, &[32, 577]),
    WellKnownSid::universal("HA", "Hyper-V Administrators", NT_AUTHORITY, &[32, 578]),
    WellKnownSid::universal("AA", "Access Control Assistance Operators", NT_AUTHORITY, &[32, 579]),
    WellKnownSid::universal("RM", "Remote Management Users", NT_AUTHORITY, &[32, 580]),
    WellKnownSid::universal("HO", "User Mode Hardware Operators", NT_AUTHORITY, &[32, 584]),
    WellKnownSid::universal("SH", "OpenSSH Users", NT_AUTHORITY, &[32, 585]),
    // ---- Application packages, integrity levels, authentication ----
    WellKnownSid::universal("AC", "All Application Packages", APP_PACKAGE_AUTHORITY, &[2, 1]),
    WellKnownSid::universal("LW", "Low Mandatory Level", MANDATORY_LABEL_AUTHORITY, &[4096]),
    WellKnownSid::universal("ME", "Medium Mandatory Level", MANDATORY_LABEL_AUTHORITY, &[8192]),
    WellKnownSid::universal("MP", "Medium Plus Mandatory Level", MANDATORY_LABEL_AUTHORITY, &[8448]),
    WellKnownSid::universal("HI", "High Mandatory Level", MANDATORY_LABEL_AUTHORITY, &[12288]),
    WellKnownSid::universal("SI", "System Mandatory Level", MANDATORY_LABEL_AUTHORITY, &[16384]),
    WellKnownSid::universal("AS", "Authentication Authority Asserted Identity", AUTHENTICATION_AUTHORITY, &[1]),
    WellKnownSid::universal("SS", "Service Asserted Identity", AUTHENTICATION_AUTHORITY, &[2]),
    // ---- Domain relative (<domain>-RID) ----
    WellKnownSid::domain("RO", "Enterprise Read-only Domain Controllers", 498),
    WellKnownSid::domain("LA", "Administrator", 500),
    WellKnownSid::domain("LG", "Guest", 501),
    WellKnownSid::domain("DA", "Domain Admins", 512),
    WellKnownSid::domain("DU", "Domain Users", 513),
    WellKnownSid::domain("DG", "Domain Guests", 514),
    WellKnownSid::domain("DC", "Domain Computers", 515),
    WellKnownSid::domain("DD", "Domain Controllers", 516),
    WellKnownSid::domain("CA", "Cert Publishers", 517),
    WellKnownSid::domain("SA", "Schema Admins", 518),
    WellKnownSid::domain("EA", "Enterprise Admins", 519),
    WellKnownSid::domain("PA", "Group Policy Creator Owners", 520),
    WellKnownSid::domain("CN", "Cloneable Domain Controllers", 522),
    WellKnownSid::domain("AP", "Protected Users", 525),
    WellKnownSid::domain("KA", "Key Admins", 526),
    WellKnownSid::domain("EK", "Enterprise Key Admins", 527),
    WellKnownSid::domain("RS", "RAS and IAS Servers", 553),
];

/// Looks up a two-letter alias.
#[inline]
#[must_use]
pub fn lookup_alias(alias: &str) -> Option<&'static WellKnownSid> {
    WELL_KNOWN_SIDS.iter().find(|entry| entry.alias == alias)
}

/// Finds the universal alias whose SID equals `sid`.
#[inline]
#[must_use]
pub fn lookup_universal(sid: &SidComponents) -> Option<&'static WellKnownSid> {
    WELL_KNOWN_SIDS
        .iter()
        .find(|entry| entry.matches_universal(sid))
}

/// Finds the domain-relative alias with the given RID.
#[inline]
#[must_use]
pub fn lookup_domain_rid(rid: u32) -> Option<&'static WellKnownSid> {
    WELL_KNOWN_SIDS
        .iter()
        .find(|entry| entry.kind == WellKnownSidKind::DomainRelative { rid })
}
