//! Schema violations reported by the six-key validator

use crate::Category;
use std::fmt;

/// What is wrong with a single category key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    /// The key is absent
    Missing,
    /// The key is present but its value is not an array
    NotAnArray,
    /// The array holds a non-string item at this position
    NonStringItem {
        /// Zero-based position of the first offending item
        index: usize,
    },
}

/// A problem found under one category key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyProblem {
    /// The category whose key failed validation
    pub category: Category,
    /// What went wrong
    pub kind: ProblemKind,
}

impl KeyProblem {
    /// Create a new key problem
    pub fn new(category: Category, kind: ProblemKind) -> Self {
        Self { category, kind }
    }
}

impl fmt::Display for KeyProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ProblemKind::Missing => write!(f, "'{}' is missing", self.category),
            ProblemKind::NotAnArray => write!(f, "'{}' is not an array", self.category),
            ProblemKind::NonStringItem { index } => {
                write!(f, "'{}' item {} is not a string", self.category, index)
            }
        }
    }
}

/// Why a JSON value is not a valid categorized result
///
/// Validation never stops at the first bad key: every failing category is
/// listed so the diagnostic shows the whole picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    /// The top-level value is not a JSON object
    NotAnObject,
    /// One or more category keys failed validation
    InvalidKeys(Vec<KeyProblem>),
}

impl SchemaViolation {
    /// Categories that failed validation, in display order
    pub fn failed_categories(&self) -> Vec<Category> {
        match self {
            SchemaViolation::NotAnObject => Category::ALL.to_vec(),
            SchemaViolation::InvalidKeys(problems) => {
                problems.iter().map(|p| p.category).collect()
            }
        }
    }

    /// True if any key is missing outright
    pub fn has_missing_keys(&self) -> bool {
        match self {
            SchemaViolation::NotAnObject => true,
            SchemaViolation::InvalidKeys(problems) => problems
                .iter()
                .any(|p| p.kind == ProblemKind::Missing),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaViolation::NotAnObject => f.write_str("expected a JSON object"),
            SchemaViolation::InvalidKeys(problems) => {
                f.write_str("invalid keys: ")?;
                for (i, problem) in problems.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}", problem)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SchemaViolation {}
