use std::fmt;

/// Route registration error
///
/// Returned by `Router::register` (and the `AppBuilder` registration methods).
/// Registration is all-or-nothing: on error the route table is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// A route with identical pattern text is already registered
    DuplicateRoute {
        /// The pattern text that was registered twice
        pattern: String,
    },
    /// The pattern text could not be compiled
    InvalidPattern {
        /// The offending pattern text
        pattern: String,
        /// What is wrong with it
        reason: String,
    },
}

impl RegisterError {
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            RegisterError::DuplicateRoute { pattern }
            | RegisterError::InvalidPattern { pattern, .. } => pattern,
        }
    }
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::DuplicateRoute { pattern } => {
                write!(f, "route '{pattern}' is already registered")
            }
            RegisterError::InvalidPattern { pattern, reason } => {
                write!(f, "invalid route pattern '{pattern}': {reason}")
            }
        }
    }
}

impl std::error::Error for RegisterError {}
