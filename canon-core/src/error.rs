use std::{error::Error, fmt};

/// Errors raised by monomial and term-sequence arithmetic.
///
/// These indicate contract violations between the rewrite rules rather than bad user input: by
/// the time arithmetic runs, the formula has already passed validation. The normalizer catches
/// them at the per-formula boundary and surfaces a single diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    /// Addition or subtraction was attempted on monomials with different variable-power
    /// signatures. The caller must verify likeness before combining.
    MismatchedTerms,

    /// A division had a nested term-sequence as its denominator. Only monomial denominators are
    /// supported.
    NonMonomialDenominator,

    /// A division by a monomial with a zero factor. Unlike the other variants, this one points at
    /// a broken invariant upstream rather than an unsupported input shape.
    ZeroDenominator,
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArithmeticError::MismatchedTerms => {
                write!(f, "cannot combine terms with different variables")
            },
            ArithmeticError::NonMonomialDenominator => {
                write!(f, "only monomial denominators are supported")
            },
            ArithmeticError::ZeroDenominator => write!(f, "division by a zero monomial"),
        }
    }
}

impl Error for ArithmeticError {}
