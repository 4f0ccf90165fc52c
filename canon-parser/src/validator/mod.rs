pub mod kind;

use crate::tokenizer::{tokenize_complete, Token, TokenKind};
use canon_error::Error;

/// Scans the formula left to right and checks the adjacency rule of every token against its
/// non-whitespace neighbors, collecting all violations rather than stopping at the first.
///
/// The scan also tracks the bracket depth and the number of `=` signs: brackets must balance
/// within each side of the equation, and the formula must contain exactly one `=`. An empty (or
/// all-whitespace) formula short-circuits with a single violation.
pub fn validate(source: &str) -> Result<(), Vec<Error>> {
    let tokens = tokenize_complete(source);
    let tokens = tokens
        .iter()
        .filter(|token| !token.is_whitespace())
        .collect::<Vec<&Token>>();

    if tokens.is_empty() {
        return Err(vec![Error::spanned(0..source.len(), kind::EmptyFormula)]);
    }

    let mut errors = Vec::new();
    let mut eq_count = 0;
    let mut depth = 0i32;

    for (index, token) in tokens.iter().enumerate() {
        let prev = index.checked_sub(1).map(|prev| tokens[prev].kind);
        let next = tokens.get(index + 1).map(|next| next.kind);
        let span = token.span.clone();

        let prev_word = prev.is_some_and(TokenKind::is_word);
        let next_word = next.is_some_and(TokenKind::is_word);

        match token.kind {
            TokenKind::Dot => {
                if prev != Some(TokenKind::Int) || next != Some(TokenKind::Int) {
                    errors.push(Error::spanned(span, kind::MisplacedDot));
                }
            },
            TokenKind::OpenParen => {
                let prev_ok = match prev {
                    None | Some(TokenKind::Eq) => true,
                    Some(kind) => kind.is_word() || kind.is_operator(),
                };
                let next_ok = matches!(
                    next,
                    Some(
                        TokenKind::Name
                            | TokenKind::Int
                            | TokenKind::OpenParen
                            | TokenKind::Add
                            | TokenKind::Sub,
                    ),
                );
                if !prev_ok || !next_ok {
                    errors.push(Error::spanned(span, kind::MisplacedOpenParen));
                }
                depth += 1;
            },
            TokenKind::CloseParen => {
                let prev_ok = prev_word || prev == Some(TokenKind::CloseParen);
                let next_ok = match next {
                    None | Some(TokenKind::Eq) => true,
                    Some(kind) => kind.is_word() || kind.is_operator(),
                };
                if !prev_ok || !next_ok {
                    errors.push(Error::spanned(span, kind::MisplacedCloseParen));
                }
                depth -= 1;
            },
            TokenKind::Eq => {
                eq_count += 1;
                if eq_count > 1 {
                    errors.push(Error::spanned(span.clone(), kind::DuplicateEquals));
                } else {
                    let prev_ok = prev_word || prev == Some(TokenKind::CloseParen);
                    let next_ok = next_word || next == Some(TokenKind::OpenParen);
                    if !prev_ok || !next_ok {
                        errors.push(Error::spanned(span.clone(), kind::MisplacedEquals));
                    }
                }
                // brackets opened on the left side cannot close on the right side
                if depth != 0 {
                    errors.push(Error::spanned(span, kind::UnbalancedBrackets));
                    depth = 0;
                }
            },
            TokenKind::Add | TokenKind::Sub => {
                // a leading sign is a unary prefix and is always accepted
                let prev_ok = prev.is_none() || prev_word || prev == Some(TokenKind::CloseParen);
                let next_ok = next_word || next == Some(TokenKind::OpenParen);
                if !prev_ok || !next_ok {
                    let op = if token.kind == TokenKind::Add { '+' } else { '-' };
                    errors.push(Error::spanned(span, kind::MisplacedSign { op }));
                }
            },
            TokenKind::Mul | TokenKind::Div => {
                let prev_ok = prev_word || prev == Some(TokenKind::CloseParen);
                let next_ok = next_word || next == Some(TokenKind::OpenParen);
                if !prev_ok || !next_ok {
                    let op = if token.kind == TokenKind::Mul { '*' } else { '/' };
                    errors.push(Error::spanned(span, kind::MisplacedFactorOp { op }));
                }
            },
            TokenKind::Exp => {
                let prev_ok = prev_word || prev == Some(TokenKind::CloseParen);
                if !prev_ok || next != Some(TokenKind::Int) {
                    errors.push(Error::spanned(span, kind::MisplacedExponent));
                }
            },
            TokenKind::Symbol => {
                let ch = token.lexeme.chars().next().unwrap_or('?');
                errors.push(Error::spanned(span, kind::InvalidCharacter { ch }));
            },
            TokenKind::Whitespace | TokenKind::Name | TokenKind::Int => {},
        }
    }

    if eq_count == 0 {
        errors.push(Error::spanned(0..source.len(), kind::MissingEquals));
    }
    if depth != 0 {
        errors.push(Error::spanned(0..source.len(), kind::UnbalancedBrackets));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Asserts that validation failed and that each reported kind matches the expected list, in
    /// order.
    fn assert_violations<const N: usize>(input: &str, expected: [&str; N]) {
        let errors = validate(input).unwrap_err();
        let found = errors
            .iter()
            .map(|error| {
                let kind = format!("{:?}", error.kind);
                kind.split_whitespace().next().unwrap().to_owned()
            })
            .collect::<Vec<_>>();
        assert_eq!(found, expected);
    }

    #[test]
    fn accepts_simple_equation() {
        assert!(validate("a+b=c").is_ok());
    }

    #[test]
    fn accepts_groups_and_unary_signs() {
        assert!(validate("-(a + b)x + b=c + m").is_ok());
    }

    #[test]
    fn accepts_decimals_and_exponents() {
        assert!(validate("+1.1(a + b)x ^ 3 + b = c^7 + l").is_ok());
    }

    #[test]
    fn rejects_two_equals_signs() {
        assert_violations("a+b=c=b", ["DuplicateEquals"]);
    }

    #[test]
    fn rejects_extra_closing_bracket() {
        assert_violations("a + (b - v)) = c", ["UnbalancedBrackets"]);
    }

    #[test]
    fn rejects_unclosed_bracket() {
        assert_violations("a + (b - v = c", ["UnbalancedBrackets"]);
    }

    #[test]
    fn rejects_leading_division() {
        assert_violations("/a + (b - v) = c", ["MisplacedFactorOp"]);
    }

    #[test]
    fn rejects_double_decimal_point() {
        assert_violations("-1..234a + (b - v) = c", ["MisplacedDot", "MisplacedDot"]);
    }

    #[test]
    fn rejects_missing_equals() {
        assert_violations("a + b", ["MissingEquals"]);
    }

    #[test]
    fn rejects_empty_formula() {
        assert_violations("   ", ["EmptyFormula"]);
    }

    #[test]
    fn rejects_foreign_characters() {
        // the stray `$` also breaks the adjacency rules of its neighbors
        assert_violations(
            "a + $ = c",
            ["MisplacedSign", "InvalidCharacter", "MisplacedEquals"],
        );
    }

    #[test]
    fn rejects_exponent_on_a_non_integer() {
        assert_violations("x^y = c", ["MisplacedExponent"]);
    }

    #[test]
    fn collects_multiple_violations() {
        assert_violations("* = ", ["MisplacedFactorOp", "MisplacedEquals"]);
    }
}
