use canon_attrs::ErrorKind;
use canon_core::ArithmeticError;
use canon_error::ErrorKind;

/// An arithmetic operation failed while rewriting the equation. The offending formula is
/// rejected; the failure never crosses into the next formula.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot canonicalize this equation: {}", cause),
    labels = ["while rewriting this equation"],
)]
pub struct NormalizationError {
    /// The arithmetic failure that stopped the rewrite.
    pub cause: ArithmeticError,
}
