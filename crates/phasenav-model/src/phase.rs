//! Phases and structure versions

use crate::error::ModelError;
use crate::text::{fold_key, prefixed_name, split_order_prefix};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a construction project
///
/// Each phase owns its own default navigation and its own folder in the
/// external store (`"01 - Kalkylskede"`, `"02 - Produktion"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Estimation and tendering
    #[default]
    Kalkylskede,
    /// Production on site
    Produktion,
    /// Closeout and handover
    Avslut,
    /// Warranty and aftercare
    Eftermarknad,
}

impl Phase {
    /// All phases in lifecycle order
    pub const ALL: [Phase; 4] = [
        Phase::Kalkylskede,
        Phase::Produktion,
        Phase::Avslut,
        Phase::Eftermarknad,
    ];

    /// Stable lower-case identifier
    #[inline]
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Kalkylskede => "kalkylskede",
            Self::Produktion => "produktion",
            Self::Avslut => "avslut",
            Self::Eftermarknad => "eftermarknad",
        }
    }

    /// Display title
    #[inline]
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Kalkylskede => "Kalkylskede",
            Self::Produktion => "Produktion",
            Self::Avslut => "Avslut",
            Self::Eftermarknad => "Eftermarknad",
        }
    }

    /// 1-based folder number
    #[inline]
    #[must_use]
    pub fn number(self) -> u32 {
        match self {
            Self::Kalkylskede => 1,
            Self::Produktion => 2,
            Self::Avslut => 3,
            Self::Eftermarknad => 4,
        }
    }

    /// Folder name in the external store, e.g. `"01 - Kalkylskede"`
    #[must_use]
    pub fn folder_name(self) -> String {
        prefixed_name(self.number(), self.title())
    }

    /// Phase for a folder number
    #[must_use]
    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.number() == number)
    }

    /// Fuzzy lookup by title or id
    ///
    /// Case, diacritics and punctuation are ignored.
    #[must_use]
    pub fn from_title(title: &str) -> Option<Self> {
        let key = fold_key(title);
        if key.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|p| fold_key(p.title()) == key || p.id() == key)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Phase {
    type Err = ModelError;

    /// Accepts an id, a title or a full folder name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(phase) = Self::from_title(s) {
            return Ok(phase);
        }
        split_order_prefix(s)
            .and_then(|(_, title)| Self::from_title(title))
            .ok_or_else(|| ModelError::UnknownPhase(s.to_string()))
    }
}

/// Named, immutable snapshot of the default layout
///
/// Unknown version strings resolve to [`StructureVersion::V1`]; parsing a
/// version never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum StructureVersion {
    /// Original layout
    #[default]
    V1,
    /// Layout with the risk section
    V2,
}

impl StructureVersion {
    /// Numeric schema version stored on documents
    #[inline]
    #[must_use]
    pub fn number(self) -> u32 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }

    /// Stable string form
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }

    /// Parse leniently, falling back to V1
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        match fold_key(s).as_str() {
            "v2" | "2" => Self::V2,
            _ => Self::V1,
        }
    }

    /// Version for a stored numeric schema version, falling back to V1
    #[inline]
    #[must_use]
    pub fn from_number(n: u32) -> Self {
        if n == 2 {
            Self::V2
        } else {
            Self::V1
        }
    }
}

impl fmt::Display for StructureVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StructureVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StructureVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&raw))
    }
}

/// Caller-held per-project flag selecting the structure version
///
/// Projects created before a layout change keep resolving through the
/// version they were created with until explicitly migrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStructureFlag {
    /// Pinned version, `None` for legacy projects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_version: Option<StructureVersion>,
}

impl ProjectStructureFlag {
    /// Flag pinned to a version
    #[inline]
    #[must_use]
    pub fn pinned(version: StructureVersion) -> Self {
        Self {
            structure_version: Some(version),
        }
    }

    /// Version to resolve through
    #[inline]
    #[must_use]
    pub fn version(self) -> StructureVersion {
        self.structure_version.unwrap_or_default()
    }
}
