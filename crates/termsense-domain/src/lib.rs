//! Termsense Domain Layer
//!
//! This crate holds the result model shared by every other Termsense crate and
//! the trait interfaces the analysis layer depends upon.
//!
//! ## Key Concepts
//!
//! - **Category**: one of the six fixed summary sections
//! - **CategorizedResult**: a summary with all six sections, each a list of strings
//! - **SchemaViolation**: why an arbitrary JSON value is not a valid summary
//! - **LlmProvider**: the seam between analysis logic and a completion backend
//!
//! ## Architecture
//!
//! - Pure data and validation only; no I/O
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod result;
pub mod schema;
pub mod traits;

// Re-exports for convenience
pub use category::Category;
pub use result::CategorizedResult;
pub use schema::{KeyProblem, ProblemKind, SchemaViolation};
pub use traits::LlmProvider;
