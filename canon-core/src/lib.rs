//! The algebraic data model behind equation canonicalization.
//!
//! An equation such as `x^2 + 3.5xy + y = y^2 - xy + y` is represented as two
//! [`TermSeq`]s split at the equals sign. A [`TermSeq`] is a flat, ordered list of
//! connector-tagged operands rather than a precedence tree: `Plus` / `Minus` connectors delimit
//! additive terms, while `Mul` / `Div` connectors extend the term started by the closest additive
//! connector to their left (the *run-grouping* invariant). Each operand is either a [`Monomial`]
//! (a numeric factor times variables raised to integer powers) or a nested [`TermSeq`] for a
//! parenthesized group.
//!
//! All arithmetic in this crate is pure: every operation returns a freshly built value and never
//! mutates its operands. Like terms are merged by a linear scan over *standalone* terms only;
//! operands buried inside a `Mul` / `Div` run are never merge targets.

pub mod equation;
pub mod error;
pub mod monomial;
pub mod seq;

pub use equation::Equation;
pub use error::ArithmeticError;
pub use monomial::Monomial;
pub use seq::{Connector, Operand, Term, TermSeq};

/// The tolerance used when comparing monomial factors.
pub const TOLERANCE: f64 = 1e-4;

/// Returns true if the two factors are equal within [`TOLERANCE`].
pub fn factor_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}
