#![allow(clippy::unwrap_used, clippy::panic, reason = "Panics are not an issue in test")]

use proptest::prelude::*;
use win_sddl::{
    AccessRights, Ace, AceFlagBits, AceType, ControlFlags, ErrorKind, decode, resolve,
};
use yare::parameterized;

const DOMAIN: &str = "S-1-5-21-1-2-3";

#[test]
fn protected_dacl_for_builtin_admins() {
    let sd = decode("O:BAG:BAD:P(A;;GA;;;BA)", DOMAIN).unwrap();

    let owner = sd.owner().unwrap();
    assert_eq!(owner.canonical(), "S-1-5-32-544");
    assert_eq!(owner.well_known_name(), Some("Administrators"));
    assert_eq!(sd.group().unwrap().canonical(), "S-1-5-32-544");

    assert!(sd.flags().contains(ControlFlags::DACL_PRESENT));
    assert!(sd.flags().contains(ControlFlags::DACL_PROTECTED));
    assert!(sd.sacl().is_none());

    let dacl = sd.dacl().unwrap();
    assert_eq!(dacl.len(), 1);
    let Ace::AccessAllowed(ace) = &dacl.ace_list()[0] else {
        panic!("expected an allowed ACE, got {:?}", dacl.ace_list()[0]);
    };
    assert!(ace.header.mask.rights().contains(AccessRights::GENERIC_ALL));
}

#[test]
fn empty_sddl_is_an_absent_descriptor() {
    let sd = decode("", DOMAIN).unwrap();
    assert!(sd.owner().is_none());
    assert!(sd.group().is_none());
    assert!(sd.flags().is_empty());
    assert!(sd.dacl().is_none());
    assert!(sd.sacl().is_none());
}

#[test]
fn sacl_only() {
    let sd = decode("S:(AU;FA;GR;;;WD)", DOMAIN).unwrap();
    assert!(sd.dacl().is_none());
    assert!(!sd.flags().contains(ControlFlags::DACL_PRESENT));
    assert!(sd.flags().contains(ControlFlags::SACL_PRESENT));

    let ace = &sd.sacl().unwrap().ace_list()[0];
    assert_eq!(ace.ace_type(), AceType::SystemAudit);
    assert!(ace.header().ace_flags.contains(AceFlagBits::FAILED_ACCESS));
    assert_eq!(ace.sid().canonical(), "S-1-1-0");
    assert_eq!(ace.sid().well_known_name(), Some("Everyone"));
}

#[test]
fn unknown_ace_type() {
    let err = decode("D:(ZZ;;GA;;;BA)", DOMAIN).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownAceType);
    assert_eq!(err.fragment(), "ZZ");
}

#[test]
fn ace_order_is_preserved() {
    let sd = decode(
        "D:(D;;GA;;;AN)(A;;GR;;;WD)(A;;GA;;;SY)(D;;GW;;;WD)",
        DOMAIN,
    )
    .unwrap();
    let listed: Vec<_> = sd
        .dacl()
        .unwrap()
        .iter()
        .map(|ace| (ace.ace_type().tag(), ace.sid().alias().unwrap()))
        .collect();
    assert_eq!(
        listed,
        [("D", "AN"), ("A", "WD"), ("A", "SY"), ("D", "WD")]
    );
}

#[test]
fn duplicate_aces_are_kept() {
    let sd = decode("D:(A;;GA;;;BA)(A;;GA;;;BA)", DOMAIN).unwrap();
    assert_eq!(sd.dacl().unwrap().len(), 2);
}

// Examples from MS-DTYP 2.5.1.4 and common Windows defaults.
#[test]
fn file_system_default() {
    let sd = decode(
        "O:BAG:SYD:PAI(A;OICI;FA;;;SY)(A;OICI;FA;;;BA)(A;OICIIO;GA;;;CO)(A;OICI;0x1200a9;;;BU)",
        DOMAIN,
    )
    .unwrap();
    assert_eq!(sd.group().unwrap().well_known_name(), Some("Local System"));
    assert_eq!(
        sd.flags(),
        ControlFlags::DACL_PRESENT | ControlFlags::DACL_PROTECTED | ControlFlags::DACL_AUTO_INHERITED
    );
    let dacl = sd.dacl().unwrap();
    assert_eq!(dacl.control(), "PAI");
    assert_eq!(dacl.ace_list()[0].header().mask.bits(), 0x001F_01FF);
    assert!(
        dacl.ace_list()[2]
            .header()
            .ace_flags
            .contains(AceFlagBits::INHERIT_ONLY)
    );
    let numeric = &dacl.ace_list()[3].header().mask;
    assert!(numeric.rights().is_empty());
    assert_eq!(numeric.residual(), 0x0012_00A9);
}

#[test]
fn directory_service_object_aces() {
    let sd = decode(
        "O:DAG:DAD:(A;;RPWPCCDCLCSWRCWDWOGA;;;S-1-0-0)\
         (OA;CIIO;RP;4c164200-20c0-11d0-a768-00aa006e0529;4828cc14-1437-45bc-9b07-ad6f015e5f28;RU)",
        DOMAIN,
    )
    .unwrap();
    assert_eq!(sd.owner().unwrap().canonical(), "S-1-5-21-1-2-3-512");
    let dacl = sd.dacl().unwrap();

    let first = &dacl.ace_list()[0];
    assert_eq!(first.sid().canonical(), "S-1-0-0");
    assert_eq!(first.sid().well_known_name(), None);
    assert!(first.header().mask.rights().contains(
        AccessRights::READ_PROPERTY
            | AccessRights::WRITE_PROPERTY
            | AccessRights::WRITE_OWNER
            | AccessRights::GENERIC_ALL
    ));

    let Ace::AccessAllowedObject(object) = &dacl.ace_list()[1] else {
        panic!("expected an object ACE");
    };
    assert_eq!(
        object.object_type.unwrap().to_string(),
        "4c164200-20c0-11d0-a768-00aa006e0529"
    );
    assert_eq!(
        object.inherited_object_type.unwrap().to_string(),
        "4828cc14-1437-45bc-9b07-ad6f015e5f28"
    );
    assert_eq!(
        object.sid.well_known_name(),
        Some("Pre-Windows 2000 Compatible Access")
    );
}

#[test]
fn conditional_ace() {
    let sd = decode(
        r#"D:(XA;;FX;;;AU;(@User.Title == "PM" && (@User.Division == "Finance" || @User.Division == "Sales")))"#,
        DOMAIN,
    )
    .unwrap();
    let ace = &sd.dacl().unwrap().ace_list()[0];
    assert_eq!(ace.ace_type(), AceType::AccessAllowedCallback);
    assert_eq!(
        ace.condition(),
        Some(r#"(@User.Title == "PM" && (@User.Division == "Finance" || @User.Division == "Sales"))"#)
    );
}

#[test]
fn mandatory_label_in_sacl() {
    let sd = decode("S:(ML;;NW;;;LW)", DOMAIN).unwrap();
    let ace = &sd.sacl().unwrap().ace_list()[0];
    assert_eq!(ace.ace_type(), AceType::SystemMandatoryLabel);
    assert_eq!(ace.header().mask.bits(), 0x1);
    assert_eq!(ace.sid().canonical(), "S-1-16-4096");
}

#[test]
fn null_dacl_and_untrusted() {
    let sd = decode("O:SYD:NO_ACCESS_CONTROLS:NO(AU;SA;GA;;;WD)", DOMAIN).unwrap();
    assert!(sd.dacl().is_none());
    assert!(sd.flags().contains(ControlFlags::DACL_PRESENT | ControlFlags::SACL_PRESENT));
    assert!(sd.flags().contains(ControlFlags::DACL_UNTRUSTED));
    assert_eq!(sd.sacl().unwrap().len(), 1);
}

#[test]
fn unknown_tokens_are_kept() {
    let sd = decode("D:(A;CIQQ;GAZZ;;;BA)", DOMAIN).unwrap();
    let header = sd.dacl().unwrap().ace_list()[0].header().clone();
    assert!(header.ace_flags.unrecognized().contains("QQ"));
    assert!(header.mask.unrecognized().contains("ZZ"));
    assert_eq!(header.mask.rights(), AccessRights::GENERIC_ALL);
}

#[parameterized(
    misordered = { "G:BAO:BA", ErrorKind::MalformedSddl, "O:" },
    duplicated = { "D:D:", ErrorKind::MalformedSddl, "D:" },
    unknown_marker = { "X:BA", ErrorKind::MalformedSddl, "X:BA" },
    empty_owner = { "O:G:BA", ErrorKind::MalformedSddl, "O:" },
    unterminated = { "D:(A;;GA;;;BA", ErrorKind::MalformedSddl, "(A;;GA;;;BA" },
    junk_between_clauses = { "D:(A;;GA;;;BA)x(A;;GA;;;BA)", ErrorKind::MalformedSddl, "x(A;;GA;;;BA)" },
    unknown_control = { "D:PX(A;;GA;;;BA)", ErrorKind::MalformedSddl, "X" },
    too_few_subfields = { "D:(A;;GA;;BA)", ErrorKind::MalformedAce, "A;;GA;;BA" },
    signed_hex_mask = { "D:(A;;0x+5;;;BA)", ErrorKind::MalformedAce, "0x+5" },
    mask_overflow = { "D:(A;;4294967296;;;BA)", ErrorKind::MalformedAce, "4294967296" },
    unknown_owner = { "O:QQ", ErrorKind::UnknownSidFormat, "QQ" },
    unknown_trustee = { "D:(A;;GA;;;S-1-x)", ErrorKind::UnknownSidFormat, "S-1-x" },
    domain_alias_bad_domain = { "O:DA", ErrorKind::InvalidDomainSid, "not-a-sid" },
)]
fn rejects(sddl: &str, kind: ErrorKind, fragment: &str) {
    let domain = if kind == ErrorKind::InvalidDomainSid { "not-a-sid" } else { DOMAIN };
    let err = decode(sddl, domain).unwrap_err();
    assert_eq!(err.kind(), kind, "{err}");
    assert_eq!(err.fragment(), fragment);
}

#[test]
fn universal_aliases_need_no_domain() {
    let sd = decode("O:SYG:WDD:(A;;GA;;;BA)", "").unwrap();
    assert_eq!(sd.owner().unwrap().canonical(), "S-1-5-18");
}

static ACE_TAGS: [&str; 5] = ["A", "D", "AU", "OA", "XA"];
static ACE_FLAGS: [&str; 4] = ["", "CI", "OICI", "ID"];
static RIGHTS: [&str; 6] = ["GA", "GR", "RPWP", "FA", "0x1F01FF", "CCDC"];
static TRUSTEES: [&str; 6] = ["BA", "WD", "DA", "SY", "S-1-5-21-9-9-9-1000", "DU"];

fn arb_clause() -> impl Strategy<Value = String> {
    (
        prop::sample::select(&ACE_TAGS[..]),
        prop::sample::select(&ACE_FLAGS[..]),
        prop::sample::select(&RIGHTS[..]),
        prop::sample::select(&TRUSTEES[..]),
    )
        .prop_map(|(tag, flags, rights, trustee)| {
            let extra = if tag == "XA" { ";(@User.x == 1)" } else { "" };
            format!("({tag};{flags};{rights};;;{trustee}{extra})")
        })
}

/// An SDDL string and the number of DACL entries it holds.
fn arb_sddl() -> impl Strategy<Value = (String, Option<usize>)> {
    (
        prop::option::of(prop::sample::select(&TRUSTEES[..])),
        prop::option::of(prop::collection::vec(arb_clause(), 0..5)),
        prop::option::of(prop::collection::vec(arb_clause(), 0..3)),
    )
        .prop_map(|(owner, dacl, sacl)| {
            let mut sddl = String::new();
            if let Some(owner) = owner {
                sddl.push_str(&format!("O:{owner}"));
            }
            if let Some(dacl) = &dacl {
                sddl.push_str("D:P");
                sddl.push_str(&dacl.concat());
            }
            if let Some(sacl) = sacl {
                sddl.push_str("S:");
                sddl.push_str(&sacl.concat());
            }
            (sddl, dacl.map(|clauses| clauses.len()))
        })
}

proptest! {
    #[test]
    fn generated_descriptors_decode((sddl, dacl_len) in arb_sddl()) {
        let sd = decode(&sddl, DOMAIN).unwrap();
        prop_assert_eq!(sd.dacl().map(|acl| acl.len()), dacl_len);
        prop_assert_eq!(sd.flags().contains(ControlFlags::DACL_PROTECTED), dacl_len.is_some());
    }

    #[test]
    fn decoding_is_deterministic((sddl, _) in arb_sddl()) {
        prop_assert_eq!(decode(&sddl, DOMAIN), decode(&sddl, DOMAIN));
    }

    #[test]
    fn never_panics(sddl in "\\PC{0,64}") {
        let _ = decode(&sddl, DOMAIN);
    }

    #[test]
    fn domain_alias_tracks_domain(subs in prop::collection::vec(any::<u32>(), 1..=14)) {
        let domain = subs.iter().fold(String::from("S-1-5"), |acc, sub| format!("{acc}-{sub}"));
        let sid = resolve("DU", &domain).unwrap();
        prop_assert_eq!(sid.canonical(), format!("{domain}-513"));
    }
}
