use ariadne::Fmt;
use canon_attrs::ErrorKind;
use canon_error::{ErrorKind, EXPR};

/// A closing parenthesis with no open group to close.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected closing parenthesis",
    labels = ["this parenthesis does not close anything"],
)]
pub struct UnexpectedCloseParen;

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this parenthesis is not closed"],
    help = "add a closing parenthesis `)` somewhere after this",
)]
pub struct UnclosedParenthesis;

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "too many equals signs",
    labels = ["this `=` is not the first one in the formula"],
)]
pub struct DuplicateEquals;

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing equals sign",
    labels = ["an equation needs a `=` between its two sides"],
)]
pub struct MissingEquals;

/// A literal that cannot be converted into a monomial, such as one with a malformed factor or a
/// non-integer exponent.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid literal: `{}`", literal),
    labels = ["this literal cannot be read as a factor and variable powers"],
    help = format!("a literal looks like {}", "3.5xy^2".fg(EXPR)),
)]
pub struct InvalidLiteral {
    /// The text of the literal.
    pub literal: String,
}

/// A character outside the formula grammar reached the tree-builder.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unexpected symbol: `{}`", ch),
    labels = ["this character cannot appear in a formula"],
)]
pub struct UnexpectedSymbol {
    /// The offending character.
    pub ch: char,
}
