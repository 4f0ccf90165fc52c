//! The canonicalization engine: rewrites a parsed equation into the canonical form `P = 0`,
//! where `P` carries no `Div`-connected elements and all like monomials are merged.
//!
//! [`normalizer`] drives the state machine over a single [`canon_core::Equation`]; [`pipeline`]
//! chains validation, parsing, and normalization for raw formula text.

pub mod kind;
pub mod normalizer;
pub mod pipeline;

pub use normalizer::{canonicalize, Normalizer, State};
pub use pipeline::canonicalize_formula;
