//! Turns formula text into a [`canon_core::Equation`].
//!
//! The pipeline through this crate has three stages. The [`tokenizer`] splits the source into
//! spanned tokens. The [`validator`] checks the adjacency rules of the grammar against the token
//! stream and collects every violation. The [`parser`] then builds the two term sequences of the
//! equation in a single left-to-right pass, with no recursive-descent grammar: a stack of open
//! groups stands in for the call stack.

pub mod parser;
pub mod tokenizer;
pub mod validator;

pub use parser::Parser;
pub use validator::validate;
