//! Default navigation builders

use crate::catalog::{self, ItemDef, RESERVED_REQUEST_FOLDER, REQUEST_SECTION_ID};
use phasenav_model::text::prefixed_name;
use phasenav_model::{Item, NavigationDocument, Phase, Section, StructureVersion};

/// Canonical default layout for one phase at one structure version
///
/// Pure and deterministic; never fails. The version is always chosen by
/// the caller (usually from a per-project flag), never inferred here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StructureDefinition {
    phase: Phase,
    version: StructureVersion,
}

impl StructureDefinition {
    /// Definition for a phase and version
    #[inline]
    #[must_use]
    pub fn new(phase: Phase, version: StructureVersion) -> Self {
        Self { phase, version }
    }

    /// Phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Structure version
    #[inline]
    #[must_use]
    pub fn version(&self) -> StructureVersion {
        self.version
    }

    /// Section ids in version-defined order
    #[inline]
    #[must_use]
    pub fn section_ids(&self) -> &'static [&'static str] {
        catalog::section_order(self.phase, self.version)
    }

    /// Whether an id is a section of this definition
    #[must_use]
    pub fn contains_section(&self, id: &str) -> bool {
        self.section_ids().contains(&id)
    }

    /// 1-based order of a section
    #[must_use]
    pub fn section_order(&self, id: &str) -> Option<u32> {
        self.section_ids()
            .iter()
            .position(|s| *s == id)
            .and_then(|p| u32::try_from(p + 1).ok())
    }

    /// Build a single default section
    #[must_use]
    pub fn section(&self, id: &str) -> Option<Section> {
        let order = self.section_order(id)?;
        let def = catalog::section_def(id)?;
        let items = build_items(catalog::section_items(self.phase, id), self.version, true);
        Some(Section::new(def.id, prefixed_name(order, def.title), def.icon, order).with_items(items))
    }

    /// Build the full default navigation
    #[must_use]
    pub fn navigation(&self) -> NavigationDocument {
        let sections = self
            .section_ids()
            .iter()
            .filter_map(|id| self.section(id))
            .collect();

        NavigationDocument {
            phase: self.phase,
            sections,
            schema_version: self.version.number(),
            version: 0,
            is_default: true,
            updated_at: None,
            updated_by: None,
        }
    }

    /// Folder names users may neither rename nor delete
    ///
    /// Every section folder plus the reserved request-documents sub-folder
    /// when the phase has that section.
    #[must_use]
    pub fn locked_folder_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .section_ids()
            .iter()
            .filter_map(|id| self.section(id))
            .map(|s| s.name)
            .collect();
        if self.contains_section(REQUEST_SECTION_ID) {
            names.push(RESERVED_REQUEST_FOLDER.to_string());
        }
        names
    }
}

fn build_items(defs: &[ItemDef], version: StructureVersion, prefixed: bool) -> Vec<Item> {
    defs.iter()
        .filter(|d| d.since <= version)
        .zip(1u32..)
        .map(|(def, order)| {
            let name = if prefixed {
                prefixed_name(order, def.title)
            } else {
                def.title.to_string()
            };
            Item::new(def.id, name, def.component, order)
                .with_items(build_items(def.children, version, false))
        })
        .collect()
}

/// Canonical default navigation for a phase and version
#[inline]
#[must_use]
pub fn build_navigation(phase: Phase, version: StructureVersion) -> NavigationDocument {
    StructureDefinition::new(phase, version).navigation()
}

/// Locked folder names for a phase and version
#[inline]
#[must_use]
pub fn build_locked_folder_names(phase: Phase, version: StructureVersion) -> Vec<String> {
    StructureDefinition::new(phase, version).locked_folder_names()
}

/// Ordered section ids of a phase and version
#[inline]
#[must_use]
pub fn section_ids(phase: Phase, version: StructureVersion) -> &'static [&'static str] {
    StructureDefinition::new(phase, version).section_ids()
}

/// Default section of a phase and version, `None` when the id is unknown there
#[inline]
#[must_use]
pub fn default_section(phase: Phase, version: StructureVersion, id: &str) -> Option<Section> {
    StructureDefinition::new(phase, version).section(id)
}

/// Every known section id, across all phases and versions
pub fn known_section_ids() -> impl Iterator<Item = &'static str> {
    catalog::SECTIONS.iter().map(|d| d.id)
}

/// Display title of a known section id, in any phase or version
#[must_use]
pub fn section_title(id: &str) -> Option<&'static str> {
    catalog::section_def(id).map(|d| d.title)
}

/// Whether a folder name is the reserved request-documents sub-folder
#[must_use]
pub fn is_reserved_folder(name: &str) -> bool {
    phasenav_model::text::fold_key(name) == phasenav_model::text::fold_key(RESERVED_REQUEST_FOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn all_definitions() -> Vec<StructureDefinition> {
        Phase::ALL
            .into_iter()
            .flat_map(|p| {
                [StructureVersion::V1, StructureVersion::V2]
                    .into_iter()
                    .map(move |v| StructureDefinition::new(p, v))
            })
            .collect()
    }

    #[test]
    fn kalkylskede_v1_layout() {
        let nav = build_navigation(Phase::Kalkylskede, StructureVersion::V1);
        let names: Vec<_> = nav.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "01 - Översikt",
                "02 - Förfrågningsunderlag",
                "03 - Kalkyl",
                "04 - Anbud",
                "05 - Möten"
            ]
        );
        assert!(nav.is_default);
        assert_eq!(nav.schema_version, 1);
    }

    #[test]
    fn v2_inserts_risk_section_and_shifts_later_orders() {
        let nav = build_navigation(Phase::Kalkylskede, StructureVersion::V2);
        assert_eq!(nav.section("risker").map(|s| s.order), Some(4));
        assert_eq!(nav.section("anbud").map(|s| s.name.as_str()), Some("05 - Anbud"));
        assert_eq!(nav.schema_version, 2);

        let v1 = build_navigation(Phase::Kalkylskede, StructureVersion::V1);
        assert!(v1.section("risker").is_none());
    }

    #[test]
    fn nested_items_respect_version() {
        let v1 = StructureDefinition::new(Phase::Kalkylskede, StructureVersion::V1)
            .section("kalkyl")
            .unwrap();
        let v2 = StructureDefinition::new(Phase::Kalkylskede, StructureVersion::V2)
            .section("kalkyl")
            .unwrap();

        let basis_v1 = v1.find_item("01-kalkylunderlag").unwrap();
        let basis_v2 = v2.find_item("01-kalkylunderlag").unwrap();
        assert_eq!(basis_v1.items.len(), 2);
        assert_eq!(basis_v2.items.len(), 3);
        assert!(basis_v2.find("mangdforteckning").is_some());
    }

    #[test]
    fn item_names_are_prefixed_by_order() {
        let kalkyl = StructureDefinition::new(Phase::Kalkylskede, StructureVersion::V1)
            .section("kalkyl")
            .unwrap();
        let offers = kalkyl.find_item("02-offerter").unwrap();
        assert_eq!(offers.name, "02 - Offerter");
        assert_eq!(offers.order, 2);
        assert_eq!(offers.component, "OfferList");
    }

    #[test]
    fn request_section_is_empty_with_locked_reserved_folder() {
        let def = StructureDefinition::new(Phase::Kalkylskede, StructureVersion::V2);
        assert!(def.section(REQUEST_SECTION_ID).unwrap().items.is_empty());

        let locked = def.locked_folder_names();
        assert!(locked.contains(&RESERVED_REQUEST_FOLDER.to_string()));
        assert!(locked.contains(&"04 - Risker & möjligheter".to_string()));
        assert!(is_reserved_folder("00 - Frågor och Svar"));

        let produktion = build_locked_folder_names(Phase::Produktion, StructureVersion::V1);
        assert!(!produktion.contains(&RESERVED_REQUEST_FOLDER.to_string()));
    }

    #[test]
    fn unknown_section_is_none() {
        let def = StructureDefinition::new(Phase::Avslut, StructureVersion::V1);
        assert!(def.section("kalkyl").is_none());
        assert_eq!(section_title("kalkyl"), Some("Kalkyl"));
        assert_eq!(section_title("nope"), None);
        assert!(default_section(Phase::Kalkylskede, StructureVersion::V1, "risker").is_none());
        assert_eq!(
            default_section(Phase::Kalkylskede, StructureVersion::V2, "risker").map(|s| s.order),
            section_ids(Phase::Kalkylskede, StructureVersion::V2)
                .iter()
                .position(|id| *id == "risker")
                .map(|i| i as u32 + 1)
        );
    }

    #[test]
    fn orders_and_prefixes_match_id_order_everywhere() {
        for def in all_definitions() {
            let nav = def.navigation();
            let ids: Vec<_> = nav.sections.iter().map(|s| s.id.as_str()).collect();
            assert_eq!(ids, def.section_ids());
            for (i, section) in nav.sections.iter().enumerate() {
                let expected = u32::try_from(i + 1).unwrap();
                assert_eq!(section.order, expected);
                assert!(section.name.starts_with(&format!("{expected:02} - ")));
            }
        }
    }

    proptest! {
        #[test]
        fn builds_are_deterministic(phase_idx in 0usize..4, v2 in any::<bool>()) {
            let version = if v2 { StructureVersion::V2 } else { StructureVersion::V1 };
            let phase = Phase::ALL[phase_idx];
            prop_assert_eq!(build_navigation(phase, version), build_navigation(phase, version));
        }
    }
}
