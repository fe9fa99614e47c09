//! # SDDL decoding for Rust
//!
//! Turns a Security Descriptor Definition Language (SDDL) string into a
//! structured [`SecurityDescriptor`]: owner and group SIDs, control flags,
//! and the discretionary and system ACLs with their entries in source order.
//!
//! The crate provides:
//! - [`decode`]: the entry point, `(sddl, domain_sid) -> SecurityDescriptor`.
//! - [`resolve`] / [`SidResolver`]: SID tokens (two-letter aliases such as
//!   `BA`, or canonical `S-1-…` strings) to [`SecurityIdentifier`]s, with the
//!   well-known name when one applies. Domain-relative aliases such as `DA`
//!   are expanded against the caller's domain SID.
//! - [`parse_ace`]: one ACE clause to an [`Ace`].
//! - [`decode_mask`] / [`decode_ace_flags`]: 2-character token runs to
//!   [`AccessMask`] / [`AceFlags`]. Nothing is dropped: bits and tokens
//!   without a name are kept next to the named set.
//!
//! The lexing layer lives in the allocation-free `win-sddl-parsing` crate.
//!
//! ## Errors
//! Every failure is a [`DecodeError`] carrying the offending fragment of
//! input. Match on [`DecodeError::kind`], not on the message.
//!
//! ## Examples
//! ```rust
//! use win_sddl::{Ace, AccessRights, ControlFlags, decode};
//!
//! let sd = decode("O:BAG:BAD:P(A;;GA;;;BA)", "S-1-5-21-1-2-3").unwrap();
//! assert_eq!(sd.owner().unwrap().canonical(), "S-1-5-32-544");
//! assert!(sd.flags().contains(ControlFlags::DACL_PROTECTED));
//!
//! let dacl = sd.dacl().unwrap();
//! let Ace::AccessAllowed(ace) = &dacl.ace_list()[0] else { unreachable!() };
//! assert_eq!(ace.header.mask.rights(), AccessRights::GENERIC_ALL);
//! ```
//!
//! ## Features
//! - `std` (default): use `std`; without it the crate is `no_std` + `alloc`.
//! - `serde` (default): `Serialize` for the decoded model (JSON shape of the
//!   `sddlinfo` tool).
//! - `cli`: builds the `sddlinfo` binary.

#![warn(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod access_mask;
mod ace;
mod ace_flags;
mod acl;
mod control_flags;
mod descriptor;
mod error;
mod resolver;
#[cfg(feature = "serde")]
mod serde_impl;
mod sid;
mod unrecognized;
pub mod well_known;

pub use access_mask::{AccessMask, AccessRights, MandatoryPolicy, decode_mask, right_token_bits};
pub use ace::{
    Ace, AceHeader, AceShape, AceType, BasicAce, CallbackAce, CallbackObjectAce, ObjectAce,
    ResourceAttributeAce, parse_ace,
};
pub use ace_flags::{AceFlagBits, AceFlags, decode_ace_flags};
pub use acl::{AccessControlList, AclKind};
pub use control_flags::ControlFlags;
pub use descriptor::{SecurityDescriptor, decode};
pub use error::{DecodeError, ErrorKind};
pub use resolver::{SidResolver, resolve};
pub use sid::SecurityIdentifier;
pub use unrecognized::UnrecognizedTokens;

/// Canonical SID syntax, re-exported from the lexing crate.
pub use parsing::{InvalidSidFormat, SidComponents};
