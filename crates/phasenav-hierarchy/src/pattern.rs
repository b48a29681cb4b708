//! Name-pattern predicates
//!
//! The external store has no notion of phases or projects; both are
//! recognised from folder naming conventions only.

use once_cell::sync::Lazy;
use phasenav_model::Phase;
use regex::Regex;

/// `"01 - Kalkylskede"`
static ORDERED_FOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<num>\d{2})\s*-\s*(?P<title>\S.*)$").expect("ordered folder pattern is valid")
});

/// `"226-01 Opus"`, `"P1042 Kontorshus"`
static PROJECT_FOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<number>[A-Za-z0-9]+(?:[-.][A-Za-z0-9]+)*)\s+(?P<title>[^\s-].*)$")
        .expect("project folder pattern is valid")
});

/// Result of classifying a folder name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameClass {
    /// Phase root folder
    Phase(Phase),
    /// Project folder with its number and title
    Project {
        /// Leading project number, e.g. `"825-10"`
        number: String,
        /// Remainder of the name
        title: String,
    },
    /// Any other usable folder name
    Container,
    /// Empty or unusable name
    Malformed,
}

/// Classify a folder name
///
/// Rules, in order: malformed names, phase folders (`"NN - <known phase>"`),
/// other ordered folders (containers), project folders, everything else.
#[must_use]
pub fn classify_name(name: &str) -> NameClass {
    let name = name.trim();
    if is_malformed(name) {
        return NameClass::Malformed;
    }

    if let Some(caps) = ORDERED_FOLDER.captures(name) {
        return match Phase::from_title(&caps["title"]) {
            Some(phase) => NameClass::Phase(phase),
            None => NameClass::Container,
        };
    }

    if let Some((number, title)) = project_parts(name) {
        return NameClass::Project {
            number: number.to_string(),
            title: title.to_string(),
        };
    }

    NameClass::Container
}

/// Whether a name looks like a project folder
#[must_use]
pub fn is_project_name(name: &str) -> bool {
    matches!(classify_name(name), NameClass::Project { .. })
}

/// Phase named by a phase folder, if any
#[must_use]
pub fn phase_of(name: &str) -> Option<Phase> {
    match classify_name(name) {
        NameClass::Phase(phase) => Some(phase),
        _ => None,
    }
}

fn project_parts(name: &str) -> Option<(&str, &str)> {
    let caps = PROJECT_FOLDER.captures(name)?;
    let number = caps.name("number")?;
    let title = caps.name("title")?;
    if !number.as_str().chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((number.as_str(), title.as_str().trim_end()))
}

fn is_malformed(name: &str) -> bool {
    name.is_empty() || name.chars().any(|c| c.is_control() || c == '/' || c == '\\')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn phase_folders() {
        assert_eq!(classify_name("01 - Kalkylskede"), NameClass::Phase(Phase::Kalkylskede));
        assert_eq!(classify_name("02-Produktion"), NameClass::Phase(Phase::Produktion));
        assert_eq!(classify_name(" 04 - eftermarknad "), NameClass::Phase(Phase::Eftermarknad));
    }

    #[test]
    fn ordered_non_phase_folders_are_containers() {
        assert_eq!(classify_name("02 - Offerter"), NameClass::Container);
        assert_eq!(classify_name("07 - Övrigt"), NameClass::Container);
    }

    #[test]
    fn project_folders() {
        assert_eq!(
            classify_name("226-01 Opus"),
            NameClass::Project {
                number: "226-01".to_string(),
                title: "Opus".to_string()
            }
        );
        assert_eq!(
            classify_name("825-10 Projektnamn"),
            NameClass::Project {
                number: "825-10".to_string(),
                title: "Projektnamn".to_string()
            }
        );
        assert!(is_project_name("P1042 Kontorshus Väst"));
        assert!(is_project_name("12.3 Skola"));
    }

    #[test]
    fn non_projects() {
        assert!(!is_project_name("Ritningar"));
        assert!(!is_project_name("226-01"));
        assert!(!is_project_name("226-01Opus"));
        assert!(!is_project_name("Gamla ritningar"));
        assert!(!is_project_name("226 - Opus"));
    }

    #[test]
    fn malformed_names() {
        assert_eq!(classify_name(""), NameClass::Malformed);
        assert_eq!(classify_name("   "), NameClass::Malformed);
        assert_eq!(classify_name("a/b"), NameClass::Malformed);
        assert_eq!(classify_name("bad\u{0007}name"), NameClass::Malformed);
    }

    #[test]
    fn phase_of_helper() {
        assert_eq!(phase_of("03 - Avslut"), Some(Phase::Avslut));
        assert_eq!(phase_of("Avslut"), None);
    }

    proptest! {
        #[test]
        fn single_token_is_never_a_project(name in "[^\\s]{1,30}") {
            prop_assert!(!is_project_name(&name));
        }

        #[test]
        fn numbered_two_token_names_are_projects(
            number in "[0-9]{3}-[0-9]{2}",
            title in "[A-Za-zÅÄÖåäö]{2,12}",
        ) {
            let name = format!("{number} {title}");
            prop_assert_eq!(
                classify_name(&name),
                NameClass::Project { number, title }
            );
        }
    }
}
