use alloc::collections::BTreeSet;
use alloc::collections::btree_set;
use alloc::string::{String, ToString};

use delegate::delegate;

/// Tokens a decoder did not recognize, kept verbatim.
///
/// Sorted and deduplicated so that decoding stays order independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UnrecognizedTokens {
    tokens: BTreeSet<String>,
}

impl UnrecognizedTokens {
    /// Creates an empty set.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tokens: BTreeSet::new(),
        }
    }

    pub(crate) fn insert(&mut self, token: &str) {
        if !self.tokens.contains(token) {
            self.tokens.insert(token.to_string());
        }
    }

    delegate! {
        to self.tokens {
            /// Number of distinct tokens.
            #[inline]
            #[must_use]
            pub fn len(&self) -> usize;
            /// `true` when every token was recognized.
            #[inline]
            #[must_use]
            pub fn is_empty(&self) -> bool;
            /// `true` if `token` was seen.
            #[inline]
            #[must_use]
            pub fn contains(&self, token: &str) -> bool;
        }
    }

    /// Tokens in ascending order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a UnrecognizedTokens {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
