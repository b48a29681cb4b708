//! Static section and item tables
//!
//! Item ids carry their original ordering prefix and are never renamed,
//! even when a later version shifts their position.

use phasenav_model::{Phase, StructureVersion};

/// Section id of the user-organised request documents space
pub const REQUEST_SECTION_ID: &str = "forfragningsunderlag";

/// The single system-reserved sub-folder of the request documents section
pub const RESERVED_REQUEST_FOLDER: &str = "00 - Frågor och svar";

#[derive(Debug, Clone, Copy)]
pub(crate) struct SectionDef {
    pub(crate) id: &'static str,
    pub(crate) title: &'static str,
    pub(crate) icon: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ItemDef {
    pub(crate) id: &'static str,
    pub(crate) title: &'static str,
    pub(crate) component: &'static str,
    /// First version containing this item
    pub(crate) since: StructureVersion,
    pub(crate) children: &'static [ItemDef],
}

const fn item(id: &'static str, title: &'static str, component: &'static str) -> ItemDef {
    ItemDef {
        id,
        title,
        component,
        since: StructureVersion::V1,
        children: &[],
    }
}

const fn item_since(
    id: &'static str,
    title: &'static str,
    component: &'static str,
    since: StructureVersion,
) -> ItemDef {
    ItemDef {
        id,
        title,
        component,
        since,
        children: &[],
    }
}

const fn group(
    id: &'static str,
    title: &'static str,
    component: &'static str,
    children: &'static [ItemDef],
) -> ItemDef {
    ItemDef {
        id,
        title,
        component,
        since: StructureVersion::V1,
        children,
    }
}

pub(crate) const SECTIONS: &[SectionDef] = &[
    SectionDef { id: "oversikt", title: "Översikt", icon: "home" },
    SectionDef { id: REQUEST_SECTION_ID, title: "Förfrågningsunderlag", icon: "inbox" },
    SectionDef { id: "kalkyl", title: "Kalkyl", icon: "calculator" },
    SectionDef { id: "risker", title: "Risker & möjligheter", icon: "alert-triangle" },
    SectionDef { id: "anbud", title: "Anbud", icon: "send" },
    SectionDef { id: "moten", title: "Möten", icon: "users" },
    SectionDef { id: "tidplan", title: "Tidplan", icon: "calendar" },
    SectionDef { id: "ekonomi", title: "Ekonomi", icon: "wallet" },
    SectionDef { id: "kvalitet", title: "Kvalitet & miljö", icon: "shield-check" },
    SectionDef { id: "slutbesiktning", title: "Slutbesiktning", icon: "clipboard-check" },
    SectionDef { id: "relationshandlingar", title: "Relationshandlingar", icon: "archive" },
    SectionDef { id: "erfarenheter", title: "Erfarenhetsåterföring", icon: "lightbulb" },
    SectionDef { id: "garanti", title: "Garanti", icon: "badge-check" },
    SectionDef { id: "servicearenden", title: "Serviceärenden", icon: "wrench" },
];

const KALKYL_V1: &[&str] = &["oversikt", REQUEST_SECTION_ID, "kalkyl", "anbud", "moten"];
const KALKYL_V2: &[&str] = &["oversikt", REQUEST_SECTION_ID, "kalkyl", "risker", "anbud", "moten"];
const PRODUKTION: &[&str] = &["oversikt", "tidplan", "ekonomi", "kvalitet", "moten"];
const AVSLUT: &[&str] = &["oversikt", "slutbesiktning", "relationshandlingar", "erfarenheter"];
const EFTERMARKNAD: &[&str] = &["oversikt", "garanti", "servicearenden"];

/// Ordered section ids for a phase and version
pub(crate) fn section_order(phase: Phase, version: StructureVersion) -> &'static [&'static str] {
    match (phase, version) {
        (Phase::Kalkylskede, StructureVersion::V1) => KALKYL_V1,
        (Phase::Kalkylskede, StructureVersion::V2) => KALKYL_V2,
        (Phase::Produktion, _) => PRODUKTION,
        (Phase::Avslut, _) => AVSLUT,
        (Phase::Eftermarknad, _) => EFTERMARKNAD,
    }
}

pub(crate) fn section_def(id: &str) -> Option<&'static SectionDef> {
    SECTIONS.iter().find(|s| s.id == id)
}

const OVERSIKT_ITEMS: &[ItemDef] = &[
    item("01-projektinfo", "Projektinformation", "ProjectInfoView"),
    item("02-organisation", "Organisation", "OrganisationView"),
    item("03-tidsplan", "Tidsplan", "ScheduleView"),
    item("04-status", "Status", "StatusBoard"),
];

const KALKYL_ITEMS: &[ItemDef] = &[
    group(
        "01-kalkylunderlag",
        "Kalkylunderlag",
        "CalculationBasis",
        &[
            item("byggdelar", "Byggdelar", "BuildingPartsTable"),
            item("installationer", "Installationer", "InstallationsTable"),
            item_since("mangdforteckning", "Mängdförteckning", "QuantityTakeoff", StructureVersion::V2),
        ],
    ),
    item("02-offerter", "Offerter", "OfferList"),
    item("03-kalkylanteckningar", "Kalkylanteckningar", "CalculationNotes"),
];

const RISKER_ITEMS: &[ItemDef] = &[
    item("01-riskregister", "Riskregister", "RiskRegister"),
    item("02-mojligheter", "Möjligheter", "OpportunityList"),
];

const ANBUD_ITEMS: &[ItemDef] = &[
    item("01-anbudsdokument", "Anbudsdokument", "TenderDocuments"),
    item("02-forbehall", "Förbehåll", "ReservationList"),
    item("03-inlamnat-anbud", "Inlämnat anbud", "SubmittedTender"),
];

const KALKYL_MOTEN_ITEMS: &[ItemDef] = &[
    item("01-startmote", "Startmöte", "MeetingView"),
    item("02-kalkylgenomgang", "Kalkylgenomgång", "MeetingView"),
];

const PRODUKTION_MOTEN_ITEMS: &[ItemDef] = &[
    item("01-byggmoten", "Byggmöten", "MeetingView"),
    item("02-ue-moten", "UE-möten", "MeetingView"),
    item("03-skyddsronder", "Skyddsronder", "SafetyRoundView"),
];

const TIDPLAN_ITEMS: &[ItemDef] = &[
    item("01-huvudtidplan", "Huvudtidplan", "ScheduleView"),
    item("02-veckoplanering", "Veckoplanering", "WeeklyPlanner"),
];

const EKONOMI_ITEMS: &[ItemDef] = &[
    item("01-prognos", "Prognos", "ForecastView"),
    item("02-atgarder", "ÄTA-arbeten", "ChangeOrderList"),
    item("03-fakturor", "Fakturor", "InvoiceList"),
];

const KVALITET_ITEMS: &[ItemDef] = &[
    item("01-egenkontroller", "Egenkontroller", "SelfInspectionList"),
    item("02-avvikelser", "Avvikelser", "DeviationList"),
    item("03-miljo", "Miljö", "EnvironmentView"),
];

const SLUTBESIKTNING_ITEMS: &[ItemDef] = &[
    item("01-besiktningsprotokoll", "Besiktningsprotokoll", "InspectionReport"),
    item("02-anmarkningar", "Anmärkningar", "RemarkList"),
];

const RELATIONSHANDLINGAR_ITEMS: &[ItemDef] = &[
    item("01-ritningar", "Ritningar", "DrawingBrowser"),
    item("02-drift-och-underhall", "Drift och underhåll", "ManualBrowser"),
];

const ERFARENHETER_ITEMS: &[ItemDef] = &[item("01-lardomar", "Lärdomar", "LessonsLearned")];

const GARANTI_ITEMS: &[ItemDef] = &[
    item("01-garantibesiktning", "Garantibesiktning", "InspectionReport"),
    item("02-garantiarenden", "Garantiärenden", "WarrantyCaseList"),
];

const SERVICEARENDEN_ITEMS: &[ItemDef] = &[item("01-arenden", "Ärenden", "ServiceCaseList")];

/// Item definitions for a section within a phase
///
/// The request documents section deliberately has none.
pub(crate) fn section_items(phase: Phase, section_id: &str) -> &'static [ItemDef] {
    match (phase, section_id) {
        (_, "oversikt") => OVERSIKT_ITEMS,
        (Phase::Kalkylskede, "kalkyl") => KALKYL_ITEMS,
        (Phase::Kalkylskede, "risker") => RISKER_ITEMS,
        (Phase::Kalkylskede, "anbud") => ANBUD_ITEMS,
        (Phase::Kalkylskede, "moten") => KALKYL_MOTEN_ITEMS,
        (Phase::Produktion, "moten") => PRODUKTION_MOTEN_ITEMS,
        (Phase::Produktion, "tidplan") => TIDPLAN_ITEMS,
        (Phase::Produktion, "ekonomi") => EKONOMI_ITEMS,
        (Phase::Produktion, "kvalitet") => KVALITET_ITEMS,
        (Phase::Avslut, "slutbesiktning") => SLUTBESIKTNING_ITEMS,
        (Phase::Avslut, "relationshandlingar") => RELATIONSHANDLINGAR_ITEMS,
        (Phase::Avslut, "erfarenheter") => ERFARENHETER_ITEMS,
        (Phase::Eftermarknad, "garanti") => GARANTI_ITEMS,
        (Phase::Eftermarknad, "servicearenden") => SERVICEARENDEN_ITEMS,
        _ => &[],
    }
}
