//! Allocation-free SDDL lexing shared by the `win-sddl` crate.
//!
//! This crate only slices text: SID syntax ([`SidComponents`]), the
//! top-level field layout ([`parse_descriptor`]), ACE clause subfields
//! ([`split_ace`]) and 2-character token runs ([`pairs`]). Meaning is
//! assigned by `win-sddl`.
#![cfg_attr(not(feature = "std"), no_std)]

mod ace;
mod error;
mod fields;
mod sid;
mod tokens;

pub use ace::{RawAce, ace_type_tag, split_ace};
pub use error::LexError;
pub use fields::{AceClauses, RawAcl, RawFields, parse_descriptor};
pub use sid::{
    InvalidSidFormat, MAX_SUBAUTHORITY_COUNT, MIN_SUBAUTHORITY_COUNT, SID_REVISION,
    SidComponents, SubAuthorities,
};
pub use tokens::{ControlToken, ControlTokens, Pairs, pairs};
