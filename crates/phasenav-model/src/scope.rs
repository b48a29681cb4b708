//! Storage scopes
//!
//! Every persisted document lives under an explicit scope key. The two
//! layers never share a scope: navigation is per (company, phase) and
//! overrides are per (company, project, section).

use crate::error::ModelError;
use crate::phase::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scope of a company-level navigation document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavigationScope {
    pub company: String,
    pub phase: Phase,
}

/// Scope of a section override document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverrideScope {
    pub company: String,
    pub project: String,
    pub section: String,
}

impl OverrideScope {
    /// Create scope, rejecting empty components
    ///
    /// # Errors
    /// Returns [`ModelError::EmptyScope`] naming the first empty component
    pub fn new(
        company: impl Into<String>,
        project: impl Into<String>,
        section: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let scope = Self {
            company: company.into(),
            project: project.into(),
            section: section.into(),
        };
        if scope.company.trim().is_empty() {
            return Err(ModelError::EmptyScope("company"));
        }
        if scope.project.trim().is_empty() {
            return Err(ModelError::EmptyScope("project"));
        }
        if scope.section.trim().is_empty() {
            return Err(ModelError::EmptyScope("section"));
        }
        Ok(scope)
    }

    /// Key used by flat key-value caches
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{}:{}:{}", self.company, self.project, self.section)
    }
}

/// Storage scope key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeKey {
    /// (company, phase)
    Navigation(NavigationScope),
    /// (company, project, section)
    SectionOverride(OverrideScope),
}

impl ScopeKey {
    /// Navigation scope
    #[must_use]
    pub fn navigation(company: impl Into<String>, phase: Phase) -> Self {
        Self::Navigation(NavigationScope {
            company: company.into(),
            phase,
        })
    }

    /// Section override scope
    #[must_use]
    pub fn section_override(
        company: impl Into<String>,
        project: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self::SectionOverride(OverrideScope {
            company: company.into(),
            project: project.into(),
            section: section.into(),
        })
    }

    /// Document path in the store
    #[must_use]
    pub fn storage_path(&self) -> String {
        match self {
            Self::Navigation(s) => format!("companies/{}/navigation/{}", s.company, s.phase),
            Self::SectionOverride(s) => format!(
                "companies/{}/projects/{}/sections/{}",
                s.company, s.project, s.section
            ),
        }
    }
}

impl From<OverrideScope> for ScopeKey {
    fn from(scope: OverrideScope) -> Self {
        Self::SectionOverride(scope)
    }
}

impl From<NavigationScope> for ScopeKey {
    fn from(scope: NavigationScope) -> Self {
        Self::Navigation(scope)
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_scope_rejects_empty_parts() {
        assert_eq!(
            OverrideScope::new("acme", " ", "kalkyl"),
            Err(ModelError::EmptyScope("project"))
        );
        assert!(OverrideScope::new("acme", "825-10", "kalkyl").is_ok());
    }

    #[test]
    fn storage_paths() {
        assert_eq!(
            ScopeKey::navigation("acme", Phase::Kalkylskede).storage_path(),
            "companies/acme/navigation/kalkylskede"
        );
        let scope = OverrideScope::new("acme", "825-10", "kalkyl").unwrap();
        assert_eq!(scope.cache_key(), "acme:825-10:kalkyl");
        assert_eq!(
            ScopeKey::from(scope).to_string(),
            "companies/acme/projects/825-10/sections/kalkyl"
        );
    }
}
