use alloc::string::{String, ToString};
use core::fmt::{self, Display};

use parsing::SidComponents;

use crate::well_known::WellKnownSid;

/// A resolved security identifier: canonical `S-1-…` text plus the
/// well-known entry it matched, if any.
///
/// Built by [`SidResolver`](crate::SidResolver); immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecurityIdentifier {
    canonical: String,
    well_known: Option<&'static WellKnownSid>,
}

impl SecurityIdentifier {
    pub(crate) fn new(components: &SidComponents, well_known: Option<&'static WellKnownSid>) -> Self {
        Self {
            canonical: components.to_string(),
            well_known,
        }
    }

    /// Canonical text form, e.g. `S-1-5-32-544`.
    #[inline]
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Table entry matching this SID.
    #[inline]
    #[must_use]
    pub const fn well_known(&self) -> Option<&'static WellKnownSid> {
        self.well_known
    }

    /// Display name of the matching table entry, e.g. `Administrators`.
    #[inline]
    #[must_use]
    pub fn well_known_name(&self) -> Option<&'static str> {
        self.well_known.map(WellKnownSid::name)
    }

    /// SDDL alias of the matching table entry, e.g. `BA`.
    #[inline]
    #[must_use]
    pub fn alias(&self) -> Option<&'static str> {
        self.well_known.map(WellKnownSid::alias)
    }
}

impl Display for SecurityIdentifier {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl AsRef<str> for SecurityIdentifier {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}
