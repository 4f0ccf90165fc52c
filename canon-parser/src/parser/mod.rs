pub mod kind;
pub mod literal;

use crate::tokenizer::{tokenize_complete, Token, TokenKind};
use canon_core::{Connector, Equation, Operand, TermSeq};
use canon_error::Error;
use std::{mem, ops::Range};

/// A single-pass tree-builder for equations.
///
/// The builder walks the token stream once, left to right, with no grammar recursion: a stack of
/// open groups replaces the call stack, a pending literal buffer collects the characters of the
/// current monomial, and a tracked connector records the sign read before the current term.
/// Parsing is intended to run on validated input but stays best-effort on anything else:
/// unexpected states produce an [`Error`] rather than a panic.
pub struct Parser<'source> {
    source: &'source str,
    tokens: Box<[Token<'source>]>,
}

impl<'source> Parser<'source> {
    /// Creates a new parser for the given formula.
    pub fn new(source: &'source str) -> Self {
        Self { source, tokens: tokenize_complete(source) }
    }

    /// Parses the formula into an equation split at the `=` sign.
    pub fn parse(&self) -> Result<Equation, Error> {
        Builder::default().build(self.source, &self.tokens)
    }
}

/// The mutable state of one parse.
#[derive(Default)]
struct Builder {
    /// Groups opened by `(` and not yet closed, oldest first. Each entry holds the suspended
    /// sequence, the connector the finished group will be attached with, and the span of the
    /// opening parenthesis.
    stack: Vec<(TermSeq, Connector, Range<usize>)>,

    /// The sequence currently being appended to.
    current: TermSeq,

    /// The connector to attach the next operand with.
    connector: Connector,

    /// The characters of the literal currently being collected.
    literal: String,

    /// The source region covered by the pending literal.
    literal_span: Option<Range<usize>>,

    /// The pending literal started right after a closing parenthesis, so it multiplies the group
    /// instead of starting a new term.
    implicit_mul: bool,

    /// The previous non-whitespace token was a closing parenthesis.
    after_close: bool,

    /// The left-hand side, once the `=` sign has been seen.
    left: Option<TermSeq>,
}

impl Builder {
    fn build(mut self, source: &str, tokens: &[Token]) -> Result<Equation, Error> {
        for token in tokens.iter().filter(|token| !token.is_whitespace()) {
            match token.kind {
                TokenKind::Name | TokenKind::Int | TokenKind::Dot | TokenKind::Exp => {
                    if self.literal.is_empty() {
                        self.implicit_mul = self.after_close;
                        self.literal_span = Some(token.span.clone());
                    } else if let Some(span) = &mut self.literal_span {
                        span.end = token.span.end;
                    }
                    self.literal.push_str(token.lexeme);
                },
                TokenKind::OpenParen => {
                    let implicit = !self.literal.is_empty() || self.after_close;
                    self.flush()?;
                    let connector = if implicit {
                        Connector::Mul
                    } else {
                        mem::take(&mut self.connector)
                    };
                    let parent = mem::take(&mut self.current);
                    self.stack.push((parent, connector, token.span.clone()));
                    self.connector = Connector::Plus;
                    self.after_close = false;
                },
                TokenKind::CloseParen => {
                    self.flush()?;
                    let Some((parent, connector, _)) = self.stack.pop() else {
                        return Err(Error::spanned(token.span.clone(), kind::UnexpectedCloseParen));
                    };
                    let group = mem::replace(&mut self.current, parent);
                    self.current.include(connector, Operand::Seq(group));
                    self.connector = Connector::Plus;
                    self.after_close = true;
                },
                TokenKind::Add | TokenKind::Sub | TokenKind::Mul | TokenKind::Div => {
                    self.flush()?;
                    self.connector = match token.kind {
                        TokenKind::Add => Connector::Plus,
                        TokenKind::Sub => Connector::Minus,
                        TokenKind::Mul => Connector::Mul,
                        _ => Connector::Div,
                    };
                    self.after_close = false;
                },
                TokenKind::Eq => {
                    self.flush()?;
                    if self.left.is_some() {
                        return Err(Error::spanned(token.span.clone(), kind::DuplicateEquals));
                    }
                    if let Some((_, _, span)) = self.stack.pop() {
                        return Err(Error::spanned(span, kind::UnclosedParenthesis));
                    }
                    self.left = Some(mem::take(&mut self.current));
                    self.connector = Connector::Plus;
                    self.after_close = false;
                },
                TokenKind::Symbol => {
                    let ch = token.lexeme.chars().next().unwrap_or('?');
                    return Err(Error::spanned(token.span.clone(), kind::UnexpectedSymbol { ch }));
                },
                TokenKind::Whitespace => {},
            }
        }

        self.flush()?;
        if let Some((_, _, span)) = self.stack.pop() {
            return Err(Error::spanned(span, kind::UnclosedParenthesis));
        }
        let Some(left) = self.left.take() else {
            return Err(Error::spanned(0..source.len(), kind::MissingEquals));
        };
        Ok(Equation::new(left, self.current))
    }

    /// Converts the pending literal, if any, into a monomial and appends it to the current
    /// sequence, then resets the tracked connector.
    fn flush(&mut self) -> Result<(), Error> {
        if self.literal.is_empty() {
            return Ok(());
        }

        let span = self.literal_span.take().unwrap_or_default();
        let monomial = literal::to_monomial(&self.literal)
            .map_err(|kind| Error::spanned(span, kind))?;
        let connector = if self.implicit_mul {
            Connector::Mul
        } else {
            mem::take(&mut self.connector)
        };
        self.current.include(connector, Operand::Monomial(monomial));

        self.literal.clear();
        self.connector = Connector::Plus;
        self.implicit_mul = false;
        Ok(())
    }
}
