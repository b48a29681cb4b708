//! Legacy section id migration
//!
//! Stored documents written by older releases use renamed or differently
//! spelled section ids. Matching is fuzzy: ids and names are compared
//! through [`fold_key`] after stripping any `"NN - "` prefix.

use phasenav_model::text::{fold_key, strip_order_prefix};
use phasenav_structure::{known_section_ids, section_title, REQUEST_SECTION_ID};
use std::collections::HashMap;

const DEFAULT_ALIASES: &[(&str, &[&str])] = &[
    ("oversikt", &["overview", "start", "projektoversikt", "hem"]),
    (
        REQUEST_SECTION_ID,
        &[
            "forfragan",
            "forfragningar",
            "forfragningshandlingar",
            "requestdocuments",
            "inkomnahandlingar",
        ],
    ),
    ("kalkyl", &["kalkylering", "kalkyler", "calculation"]),
    ("risker", &["riskochmojligheter", "riskermojligheter", "risk"]),
    ("anbud", &["anbudsinlamning", "tender", "anbudet"]),
    ("moten", &["mote", "motesprotokoll", "meetings", "protokoll"]),
    ("kvalitet", &["kvalitetmiljo", "kma", "kvalitetochmiljo"]),
    ("servicearenden", &["service", "serviceanmalningar"]),
];

/// Lookup table from fuzzy legacy keys to canonical section ids
#[derive(Debug, Clone)]
pub struct LegacyAliases {
    by_key: HashMap<String, &'static str>,
}

impl LegacyAliases {
    /// Table with the built-in aliases
    #[must_use]
    pub fn new() -> Self {
        let mut aliases = Self {
            by_key: HashMap::new(),
        };
        for canonical in known_section_ids() {
            aliases.register_canonical(canonical);
        }
        for (canonical, variants) in DEFAULT_ALIASES {
            for variant in *variants {
                aliases.insert(variant, canonical);
            }
        }
        aliases
    }

    /// Register an extra alias
    #[inline]
    pub fn insert(&mut self, alias: &str, canonical: &'static str) {
        let key = fold_key(alias);
        if !key.is_empty() {
            self.by_key.insert(key, canonical);
        }
    }

    fn register_canonical(&mut self, canonical: &'static str) {
        self.insert(canonical, canonical);
        if let Some(title) = section_title(canonical) {
            self.insert(title, canonical);
        }
    }

    /// Canonical id for a stored section id/name pair
    ///
    /// The id is tried before the name. Returns `None` when neither
    /// resembles a known section.
    #[must_use]
    pub fn canonical_id(&self, id: &str, name: &str) -> Option<&'static str> {
        [id, strip_order_prefix(id), strip_order_prefix(name)]
            .into_iter()
            .map(fold_key)
            .filter(|k| !k.is_empty())
            .find_map(|k| self.by_key.get(&k).copied())
    }
}

impl Default for LegacyAliases {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasenav_model::{Phase, StructureVersion};
    use phasenav_structure::StructureDefinition;

    #[test]
    fn canonical_ids_map_to_themselves() {
        let aliases = LegacyAliases::new();
        assert_eq!(aliases.canonical_id("kalkyl", ""), Some("kalkyl"));
        assert_eq!(aliases.canonical_id("oversikt", "01 - Översikt"), Some("oversikt"));
    }

    #[test]
    fn every_known_section_maps_to_itself_in_any_case() {
        let aliases = LegacyAliases::new();
        for phase in Phase::ALL {
            for version in [StructureVersion::V1, StructureVersion::V2] {
                let def = StructureDefinition::new(phase, version);
                for id in def.section_ids() {
                    assert_eq!(aliases.canonical_id(&id.to_uppercase(), ""), Some(*id), "{phase} {version}");
                    let title = section_title(id).unwrap_or_default();
                    assert_eq!(aliases.canonical_id("x", title), Some(*id), "{title}");
                }
            }
        }
        assert_eq!(aliases.canonical_id("Tidplan", "02 - Tidplan"), Some("tidplan"));
    }

    #[test]
    fn case_and_punctuation_variants_collapse() {
        let aliases = LegacyAliases::new();
        for variant in [
            "Förfrågningsunderlag",
            "forfragnings-underlag",
            "FORFRAGNINGSUNDERLAG",
            "förfrågnings_underlag",
            "Förfrågan",
            "request-documents",
        ] {
            assert_eq!(
                aliases.canonical_id(variant, ""),
                Some(REQUEST_SECTION_ID),
                "{variant}"
            );
        }
    }

    #[test]
    fn name_is_used_when_id_is_unknown() {
        let aliases = LegacyAliases::new();
        assert_eq!(
            aliases.canonical_id("section-7f3a", "05 - Mötesprotokoll"),
            Some("moten")
        );
    }

    #[test]
    fn unrelated_sections_are_not_migrated() {
        let aliases = LegacyAliases::new();
        assert_eq!(aliases.canonical_id("egna-dokument", "Egna dokument"), None);
        assert_eq!(aliases.canonical_id("", ""), None);
    }

    #[test]
    fn custom_alias() {
        let mut aliases = LegacyAliases::new();
        aliases.insert("Ekonomiuppföljning", "ekonomi");
        assert_eq!(aliases.canonical_id("ekonomi-uppfoljning", ""), Some("ekonomi"));
    }
}
