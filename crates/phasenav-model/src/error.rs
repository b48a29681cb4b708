//! Error types for the data model

/// Errors raised while parsing model values from text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Text does not name a known phase
    #[error("unknown phase: '{0}'")]
    UnknownPhase(String),

    /// Scope component is empty
    #[error("empty scope component: {0}")]
    EmptyScope(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_phase_display() {
        let err = ModelError::UnknownPhase("planering".to_string());
        assert_eq!(err.to_string(), "unknown phase: 'planering'");
    }
}
