//! Project function vocabulary
//!
//! Folders directly inside a project are "functions". They are recognised
//! by keyword, first match wins, so more specific vocabularies come first.

use phasenav_model::text::fold_key;
use serde::{Deserialize, Serialize};

/// Named sub-entity of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectFunction {
    Requests,
    Drawings,
    Meetings,
    QualityControl,
    Calculation,
    Offers,
    Contracts,
    Economy,
    Schedule,
    Photos,
    Environment,
    Documents,
    /// No keyword matched
    Generic,
}

const VOCABULARY: &[(ProjectFunction, &[&str])] = &[
    (ProjectFunction::Requests, &["forfragan", "forfragning", "fragorochsvar", "request"]),
    (ProjectFunction::Drawings, &["ritning", "drawing", "cad", "bygghandling"]),
    (ProjectFunction::Meetings, &["mote", "protokoll", "meeting"]),
    (
        ProjectFunction::QualityControl,
        &["kvalitet", "egenkontroll", "kma", "besiktning", "quality"],
    ),
    (ProjectFunction::Calculation, &["kalkyl", "calculation"]),
    (ProjectFunction::Offers, &["offert", "anbud", "tender"]),
    (ProjectFunction::Contracts, &["avtal", "kontrakt", "contract"]),
    (ProjectFunction::Economy, &["ekonomi", "faktur", "budget", "economy"]),
    (ProjectFunction::Schedule, &["tidplan", "tidsplan", "schedule"]),
    (ProjectFunction::Photos, &["foto", "bild", "photo"]),
    (ProjectFunction::Environment, &["miljo", "environment"]),
    (ProjectFunction::Documents, &["dokument", "handling", "document"]),
];

impl ProjectFunction {
    /// Icon name for the function
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Requests => "inbox",
            Self::Drawings => "ruler",
            Self::Meetings => "users",
            Self::QualityControl => "shield-check",
            Self::Calculation => "calculator",
            Self::Offers => "tag",
            Self::Contracts => "file-signature",
            Self::Economy => "wallet",
            Self::Schedule => "calendar",
            Self::Photos => "camera",
            Self::Environment => "leaf",
            Self::Documents => "file-text",
            Self::Generic => "folder",
        }
    }
}

/// Classify a project child folder by keyword
#[must_use]
pub fn classify_function(name: &str) -> ProjectFunction {
    let key = fold_key(name);
    if key.is_empty() {
        return ProjectFunction::Generic;
    }
    VOCABULARY
        .iter()
        .find(|(_, words)| words.iter().any(|w| key.contains(w)))
        .map_or(ProjectFunction::Generic, |(f, _)| *f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(classify_function("Ritningar"), ProjectFunction::Drawings);
        assert_eq!(classify_function("02 - Mötesprotokoll"), ProjectFunction::Meetings);
        assert_eq!(classify_function("Förfrågningsunderlag"), ProjectFunction::Requests);
        assert_eq!(classify_function("KMA"), ProjectFunction::QualityControl);
        assert_eq!(classify_function("Offerter UE"), ProjectFunction::Offers);
        assert_eq!(classify_function("Foton från bygget"), ProjectFunction::Photos);
    }

    #[test]
    fn specific_vocabulary_wins_over_documents() {
        assert_eq!(classify_function("Kvalitetsdokument"), ProjectFunction::QualityControl);
        assert_eq!(classify_function("Ritningshandlingar"), ProjectFunction::Drawings);
        assert_eq!(classify_function("Övriga dokument"), ProjectFunction::Documents);
    }

    #[test]
    fn fallback_is_generic() {
        assert_eq!(classify_function("Blandat"), ProjectFunction::Generic);
        assert_eq!(classify_function(""), ProjectFunction::Generic);
        assert_eq!(ProjectFunction::Generic.icon(), "folder");
    }
}
