//! Named digital-net families.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Digital-net family identifier.
///
/// Each family has a display name, a storage abbreviation (used as the
/// binary file stem and the relational `netname` key) and a construction
/// label.
///
/// # Examples
///
/// ```rust
/// use qmc_core::NetFamily;
///
/// let family: NetFamily = "nxlw".parse().unwrap();
/// assert_eq!(family, NetFamily::NxLowWafom);
/// assert_eq!(family.name(), "NX_LowWAFOM");
/// assert_eq!(NetFamily::from_index(1), Some(NetFamily::Sobol));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NetFamily {
    /// Niederreiter-Xing nets.
    NiederreiterXing,
    /// Sobol nets derived from a seed table.
    Sobol,
    /// Precomputed Sobol nets from the legacy tables.
    OldSobol,
    /// Niederreiter-Xing nets selected for low WAFOM.
    NxLowWafom,
    /// Sobol nets selected for low WAFOM.
    SobolLowWafom,
}

impl NetFamily {
    /// All families in index order.
    pub const ALL: [NetFamily; 5] = [
        NetFamily::NiederreiterXing,
        NetFamily::Sobol,
        NetFamily::OldSobol,
        NetFamily::NxLowWafom,
        NetFamily::SobolLowWafom,
    ];

    /// Family at `index` in [`NetFamily::ALL`].
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Position of this family in [`NetFamily::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            NetFamily::NiederreiterXing => "NX",
            NetFamily::Sobol => "Sobol",
            NetFamily::OldSobol => "Old_Sobol",
            NetFamily::NxLowWafom => "NX_LowWAFOM",
            NetFamily::SobolLowWafom => "Sobol_LowWAFOM",
        }
    }

    /// Storage key used for file names and relational lookups.
    pub fn abbreviation(self) -> &'static str {
        match self {
            NetFamily::NiederreiterXing => "nx",
            NetFamily::Sobol => "sobolbase",
            NetFamily::OldSobol => "oldso",
            NetFamily::NxLowWafom => "nxlw",
            NetFamily::SobolLowWafom => "solw",
        }
    }

    /// Human-readable construction description.
    pub fn construction(self) -> &'static str {
        match self {
            NetFamily::NiederreiterXing => "Niederreiter-Xing",
            NetFamily::Sobol => "Sobol",
            NetFamily::OldSobol => "Old Sobol",
            NetFamily::NxLowWafom => "NX+LowWAFOM, CV = (max(CV) + min(CV))/2",
            NetFamily::SobolLowWafom => "Sobol+LowWAFOM, CV = (max(CV) + min(CV))/2",
        }
    }

    /// Whether the family is stored as a Sobol seed table rather than as
    /// precomputed matrices.
    #[inline]
    pub fn is_seeded(self) -> bool {
        matches!(self, NetFamily::Sobol)
    }
}

impl fmt::Display for NetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a family name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unknown digital net family: {0}")]
pub struct UnknownFamily(pub String);

impl FromStr for NetFamily {
    type Err = UnknownFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(s) || f.abbreviation().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFamily(s.to_string()))
    }
}
