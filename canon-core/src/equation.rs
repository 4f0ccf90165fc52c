use crate::seq::TermSeq;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An equation: two term sequences split at the equals sign.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Equation {
    pub left: TermSeq,
    pub right: TermSeq,
}

impl Equation {
    pub fn new(left: TermSeq, right: TermSeq) -> Self {
        Self { left, right }
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.left, self.right)
    }
}
