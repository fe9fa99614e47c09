use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::slice;

use delegate::delegate;

use crate::ace::Ace;

/// Which of the two ACLs of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclKind {
    /// `D:`, the discretionary ACL.
    Discretionary,
    /// `S:`, the system ACL.
    System,
}

impl AclKind {
    /// SDDL field marker without the colon.
    #[inline]
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Discretionary => "D",
            Self::System => "S",
        }
    }
}

/// An access control list.
///
/// ACEs keep the order they were written in; evaluation depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessControlList {
    control: String,
    ace_list: Vec<Ace>,
}

impl AccessControlList {
    pub(crate) fn new(control: &str, ace_list: Vec<Ace>) -> Self {
        Self {
            control: control.to_string(),
            ace_list,
        }
    }

    /// Control tokens exactly as written (`"PAI"`), empty if none.
    #[inline]
    #[must_use]
    pub fn control(&self) -> &str {
        &self.control
    }

    /// Entries in source order.
    #[inline]
    #[must_use]
    pub fn ace_list(&self) -> &[Ace] {
        &self.ace_list
    }

    delegate! {
        to self.ace_list {
            /// Number of entries.
            #[inline]
            #[must_use]
            pub fn len(&self) -> usize;
            /// `true` for an empty (not null) ACL.
            #[inline]
            #[must_use]
            pub fn is_empty(&self) -> bool;
            /// Iterates the entries in source order.
            #[inline]
            pub fn iter(&self) -> slice::Iter<'_, Ace>;
        }
    }
}

impl<'a> IntoIterator for &'a AccessControlList {
    type Item = &'a Ace;
    type IntoIter = slice::Iter<'a, Ace>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.ace_list.iter()
    }
}
