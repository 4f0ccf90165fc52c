use ariadne::Fmt;
use canon_attrs::ErrorKind;
use canon_error::{ErrorKind, EXPR};

/// The formula contains nothing but whitespace.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "the formula is empty",
    labels = ["add an equation here"],
    help = format!("a formula looks like {}", "x^2 + 3.5xy = y".fg(EXPR)),
)]
pub struct EmptyFormula;

/// A decimal point without a digit on both sides.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "misplaced decimal point",
    labels = ["a decimal point must sit between two digits"],
)]
pub struct MisplacedDot;

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "misplaced opening parenthesis",
    labels = ["a group cannot start here"],
    help = "a group can follow the start of a side, an operator, or a literal, and must contain a term",
)]
pub struct MisplacedOpenParen;

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "misplaced closing parenthesis",
    labels = ["a group cannot end here"],
)]
pub struct MisplacedCloseParen;

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "misplaced equals sign",
    labels = ["both sides of `=` must start and end with a term"],
)]
pub struct MisplacedEquals;

/// More than one `=` in the formula. Reported at the second and every later occurrence.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "too many equals signs",
    labels = ["this `=` is not the first one in the formula"],
    help = "an equation has exactly one `=`",
)]
pub struct DuplicateEquals;

/// A `+` or `-` in a position where no term can start or end.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("misplaced `{}` sign", op),
    labels = ["expected a term to follow this sign"],
)]
pub struct MisplacedSign {
    /// The sign that was misplaced.
    pub op: char,
}

/// A `*` or `/` that does not sit between two terms.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("misplaced `{}` operator", op),
    labels = ["this operator must sit between two terms"],
)]
pub struct MisplacedFactorOp {
    /// The operator that was misplaced.
    pub op: char,
}

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "misplaced exponent",
    labels = ["`^` must follow a variable or group and be followed by an integer"],
)]
pub struct MisplacedExponent;

/// A character outside the formula grammar.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid character: `{}`", ch),
    labels = ["this character cannot appear in a formula"],
    help = format!("formulas are built from {}", "letters, digits, and `. ^ + - * / ( ) =`".fg(EXPR)),
)]
pub struct InvalidCharacter {
    /// The offending character.
    pub ch: char,
}

/// Opening and closing parentheses do not pair up.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unbalanced brackets",
    labels = ["every `(` on a side must be matched by a `)` on the same side"],
)]
pub struct UnbalancedBrackets;

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing equals sign",
    labels = ["an equation needs a `=` between its two sides"],
)]
pub struct MissingEquals;
