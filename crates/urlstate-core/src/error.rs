use std::fmt;

use thiserror::Error;

/// Why a single parameter was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// The value is not numeric at all.
    NotANumber,
    /// The value is numeric but outside the accepted domain.
    OutOfRange,
    /// The value is not one of the permitted literals.
    NotAllowed,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotANumber => "not a number",
            Self::OutOfRange => "out of range",
            Self::NotAllowed => "not allowed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub key: String,
    pub value: String,
    pub kind: IssueKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?} ({})", self.key, self.value, self.kind)
    }
}

/// One or more rejected query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid query parameters: {}", join(.issues))]
pub struct ValidationError {
    issues: Vec<ValidationIssue>,
}

impl ValidationError {
    #[must_use]
    pub fn single(key: impl Into<String>, value: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            issues: vec![ValidationIssue {
                key: key.into(),
                value: value.into(),
                kind,
            }],
        }
    }

    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Offending keys, in the order they were reported.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.key.as_str()).collect()
    }

    #[must_use]
    pub fn kind_of(&self, key: &str) -> Option<IssueKind> {
        self.issues.iter().find(|i| i.key == key).map(|i| i.kind)
    }

    pub fn merge(&mut self, other: ValidationError) {
        self.issues.extend(other.issues);
    }
}

fn join(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
