use crate::{error::ArithmeticError, monomial::Monomial};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The connector that joins an element to the sequence before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Connector {
    #[default]
    Plus,
    Minus,
    Mul,
    Div,
}

impl Connector {
    /// Returns true for the additive connectors `Plus` and `Minus`, which start a new term.
    /// `Mul` and `Div` extend the term to their left instead.
    pub fn is_additive(self) -> bool {
        matches!(self, Connector::Plus | Connector::Minus)
    }

    /// Swaps `Plus` and `Minus`; the multiplicative connectors are unchanged.
    pub fn flip(self) -> Connector {
        match self {
            Connector::Plus => Connector::Minus,
            Connector::Minus => Connector::Plus,
            other => other,
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ch = match self {
            Connector::Plus => '+',
            Connector::Minus => '-',
            Connector::Mul => '*',
            Connector::Div => '/',
        };
        write!(f, "{}", ch)
    }
}

/// An operand in a term sequence: either a bare monomial or a nested sub-sequence standing for a
/// parenthesized group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operand {
    Monomial(Monomial),
    Seq(TermSeq),
}

impl Operand {
    /// Structural equality. Monomials compare factors only when `check_factor` is set; nested
    /// sequences always compare deeply, factors included.
    pub fn is_equal(&self, other: &Operand, check_factor: bool) -> bool {
        match (self, other) {
            (Operand::Monomial(lhs), Operand::Monomial(rhs)) => lhs.is_equal(rhs, check_factor),
            (Operand::Seq(lhs), Operand::Seq(rhs)) => lhs.is_equal(rhs),
            _ => false,
        }
    }

    /// Applies the operation named by `connector` to the two operands.
    pub fn calc(&self, connector: Connector, other: &Operand) -> Result<Operand, ArithmeticError> {
        match connector {
            Connector::Plus => self.add(other),
            Connector::Minus => self.sub(other),
            Connector::Mul => self.mul(other),
            Connector::Div => self.div(other),
        }
    }

    pub fn add(&self, other: &Operand) -> Result<Operand, ArithmeticError> {
        match (self, other) {
            (Operand::Monomial(lhs), Operand::Monomial(rhs)) => {
                Ok(Operand::Monomial(lhs.add(rhs)?))
            },
            // a bare monomial can only absorb a like monomial
            (Operand::Monomial(_), Operand::Seq(_)) => Err(ArithmeticError::MismatchedTerms),
            (Operand::Seq(lhs), _) => Ok(Operand::Seq(lhs.add(other)?)),
        }
    }

    pub fn sub(&self, other: &Operand) -> Result<Operand, ArithmeticError> {
        match (self, other) {
            (Operand::Monomial(lhs), Operand::Monomial(rhs)) => {
                Ok(Operand::Monomial(lhs.sub(rhs)?))
            },
            (Operand::Monomial(_), Operand::Seq(_)) => Err(ArithmeticError::MismatchedTerms),
            (Operand::Seq(lhs), _) => Ok(Operand::Seq(lhs.sub(other)?)),
        }
    }

    /// Multiplication commutes, so a monomial times a sequence delegates to the sequence.
    pub fn mul(&self, other: &Operand) -> Result<Operand, ArithmeticError> {
        match (self, other) {
            (Operand::Monomial(lhs), Operand::Monomial(rhs)) => {
                Ok(Operand::Monomial(lhs.mul(rhs)))
            },
            (Operand::Monomial(_), Operand::Seq(rhs)) => Ok(Operand::Seq(rhs.mul(self)?)),
            (Operand::Seq(lhs), _) => Ok(Operand::Seq(lhs.mul(other)?)),
        }
    }

    pub fn div(&self, other: &Operand) -> Result<Operand, ArithmeticError> {
        let Operand::Monomial(denominator) = other else {
            return Err(ArithmeticError::NonMonomialDenominator);
        };
        match self {
            Operand::Monomial(lhs) => Ok(Operand::Monomial(lhs.div(denominator)?)),
            Operand::Seq(lhs) => Ok(Operand::Seq(lhs.div(denominator)?)),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Monomial(monomial) => write!(f, "{}", monomial),
            Operand::Seq(seq) => write!(f, "({})", seq),
        }
    }
}

/// A polynomial fragment: an ordered list of connector-tagged operands denoting a sum of terms.
///
/// A *term* is the maximal run starting at a `Plus` / `Minus`-connected element and continuing
/// through all immediately following `Mul` / `Div`-connected elements; see [`TermSeq::terms`].
/// Every arithmetic operation builds a new sequence and preserves this grouping.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TermSeq {
    elements: Vec<(Connector, Operand)>,
}

impl TermSeq {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sequence holding a single element.
    pub fn of(connector: Connector, operand: Operand) -> Self {
        let mut seq = Self::new();
        seq.include(connector, operand);
        seq
    }

    /// Appends an element to the sequence.
    pub fn include(&mut self, connector: Connector, operand: Operand) {
        self.elements.push((connector, operand));
    }

    /// The raw elements of the sequence, in order.
    pub fn elements(&self) -> &[(Connector, Operand)] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates over the additive terms of the sequence, applying the run-grouping invariant:
    /// each item is one `Plus` / `Minus`-connected head operand together with its trailing slice
    /// of `Mul` / `Div`-connected elements.
    pub fn terms(&self) -> Terms {
        Terms { elements: &self.elements, index: 0 }
    }

    /// Structural equality: same length, element-wise equal connectors and operands, with
    /// monomial factors always compared.
    pub fn is_equal(&self, other: &TermSeq) -> bool {
        self.elements.len() == other.elements.len()
            && self
                .elements
                .iter()
                .zip(&other.elements)
                .all(|((lc, lo), (rc, ro))| lc == rc && lo.is_equal(ro, true))
    }

    /// Adds an operand to this sequence, merging like monomials into standalone terms.
    pub fn add(&self, other: &Operand) -> Result<TermSeq, ArithmeticError> {
        self.combine(Connector::Plus, other)
    }

    /// Subtracts an operand from this sequence. Subtracting a sequence structurally equal to
    /// this one short-circuits to the zero sequence.
    pub fn sub(&self, other: &Operand) -> Result<TermSeq, ArithmeticError> {
        if let Operand::Seq(seq) = other {
            if self.is_equal(seq) {
                return Ok(TermSeq::of(Connector::Plus, Operand::Monomial(Monomial::zero())));
            }
        }
        self.combine(Connector::Minus, other)
    }

    /// Multiplies every term of the sequence by `operand`.
    ///
    /// `Mul`-connected run elements are evaluated into the term's head eagerly. `Div`-connected
    /// elements are different: if one equals `operand` it cancels (the `(.../x)*x → ...`
    /// simplification, one occurrence at most), and any that remain are kept as explicit run
    /// elements so the denominator-clearing scan can still find them.
    pub fn mul(&self, operand: &Operand) -> Result<TermSeq, ArithmeticError> {
        let mut result = TermSeq::new();
        for term in self.terms() {
            let mut head = term.head.clone();
            let mut divisors: Vec<(Connector, Operand)> = Vec::new();
            let mut cancelled = false;
            for (connector, element) in term.run {
                match connector {
                    Connector::Div if !cancelled && element.is_equal(operand, true) => {
                        cancelled = true;
                    },
                    Connector::Div => divisors.push((Connector::Div, element.clone())),
                    _ => head = head.calc(*connector, element)?,
                }
            }
            if !cancelled {
                head = head.calc(Connector::Mul, operand)?;
            }

            if divisors.is_empty() {
                result.absorb(term.connector, &head)?;
            } else {
                result.include(term.connector, head);
                result.elements.extend(divisors);
            }
        }
        Ok(result)
    }

    /// Divides every term of the sequence by a monomial denominator: the head is divided and the
    /// trailing run is folded into it.
    pub fn div(&self, denominator: &Monomial) -> Result<TermSeq, ArithmeticError> {
        let denominator = Operand::Monomial(denominator.clone());
        let mut result = TermSeq::new();
        for term in self.terms() {
            let mut folded = term.head.calc(Connector::Div, &denominator)?;
            for (connector, element) in term.run {
                folded = folded.calc(*connector, element)?;
            }
            result.absorb(term.connector, &folded)?;
        }
        Ok(result)
    }

    /// Combines an operand into a copy of this sequence with the given sign. Sequence operands
    /// are walked term by term; each term is fully evaluated by folding its trailing run, then
    /// absorbed with its sign (flipped when subtracting).
    fn combine(&self, sign: Connector, other: &Operand) -> Result<TermSeq, ArithmeticError> {
        let mut result = self.clone();
        match other {
            Operand::Monomial(monomial) => result.fold_monomial(sign, monomial),
            Operand::Seq(seq) => {
                for term in seq.terms() {
                    let connector = if sign == Connector::Minus {
                        term.connector.flip()
                    } else {
                        term.connector
                    };
                    let folded = term.fold()?;
                    result.absorb(connector, &folded)?;
                }
            },
        }
        Ok(result)
    }

    /// Folds a fully evaluated operand into the sequence as an additive term.
    fn absorb(&mut self, connector: Connector, operand: &Operand) -> Result<(), ArithmeticError> {
        match operand {
            Operand::Monomial(monomial) => self.fold_monomial(connector, monomial),
            Operand::Seq(_) => *self = self.combine(connector, operand)?,
        }
        Ok(())
    }

    /// Folds a single signed monomial into the sequence.
    ///
    /// Every *standalone* like term already present (additive connector, not followed by a
    /// `Mul` / `Div` element) is removed and accumulated into the incoming monomial in
    /// signed-factor space. The accumulated term is re-inserted with the connector matching the
    /// sign of its factor, or dropped entirely when the factor cancels to zero. Operands inside
    /// runs or nested sub-sequences are never merge targets.
    fn fold_monomial(&mut self, connector: Connector, monomial: &Monomial) {
        let mut acc = if connector == Connector::Minus { monomial.neg() } else { monomial.clone() };

        let mut index = 0;
        while index < self.elements.len() {
            let standalone = self.elements[index].0.is_additive()
                && self
                    .elements
                    .get(index + 1)
                    .map_or(true, |(next, _)| next.is_additive());
            let merged = match &self.elements[index] {
                (conn, Operand::Monomial(existing)) if standalone && existing.is_like(&acc) => {
                    Some(if *conn == Connector::Minus { -existing.factor } else { existing.factor })
                },
                _ => None,
            };

            if let Some(signed_factor) = merged {
                acc.factor += signed_factor;
                self.elements.remove(index);
            } else {
                index += 1;
            }
        }

        if acc.is_zero() {
            return;
        }
        if acc.factor < 0.0 {
            self.include(Connector::Minus, Operand::Monomial(acc.neg()));
        } else {
            self.include(Connector::Plus, Operand::Monomial(acc));
        }
    }
}

impl fmt::Display for TermSeq {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.elements.is_empty() {
            return f.write_str("0");
        }
        for (index, (connector, operand)) in self.elements.iter().enumerate() {
            if index != 0 || *connector != Connector::Plus {
                write!(f, "{}", connector)?;
            }
            match operand {
                Operand::Monomial(monomial) => write!(f, "{}", monomial)?,
                Operand::Seq(seq) => write!(f, "({})", seq)?,
            }
        }
        Ok(())
    }
}

/// One additive term of a sequence: its sign connector, its head operand, and the trailing run of
/// `Mul` / `Div`-connected elements.
#[derive(Debug, Clone, Copy)]
pub struct Term<'a> {
    pub connector: Connector,
    pub head: &'a Operand,
    pub run: &'a [(Connector, Operand)],
}

impl Term<'_> {
    /// Evaluates the term's trailing run into its head, producing a single operand.
    pub fn fold(&self) -> Result<Operand, ArithmeticError> {
        let mut acc = self.head.clone();
        for (connector, operand) in self.run {
            acc = acc.calc(*connector, operand)?;
        }
        Ok(acc)
    }
}

/// Iterator over the additive terms of a [`TermSeq`].
pub struct Terms<'a> {
    elements: &'a [(Connector, Operand)],
    index: usize,
}

impl<'a> Iterator for Terms<'a> {
    type Item = Term<'a>;

    fn next(&mut self) -> Option<Term<'a>> {
        let (connector, head) = self.elements.get(self.index)?;
        let start = self.index + 1;
        let mut end = start;
        while end < self.elements.len() && !self.elements[end].0.is_additive() {
            end += 1;
        }
        self.index = end;
        Some(Term { connector: *connector, head, run: &self.elements[start..end] })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;

    fn var(factor: f64, powers: impl IntoIterator<Item = (char, i32)>) -> Operand {
        Operand::Monomial(Monomial::with_powers(factor, powers))
    }

    fn seq(elements: impl IntoIterator<Item = (Connector, Operand)>) -> TermSeq {
        let mut seq = TermSeq::new();
        for (connector, operand) in elements {
            seq.include(connector, operand);
        }
        seq
    }

    #[test]
    fn terms_group_multiplicative_runs() {
        // x * y + z is two terms: the run [*y] belongs to x
        let seq = seq([
            (Connector::Plus, var(1.0, [('x', 1)])),
            (Connector::Mul, var(1.0, [('y', 1)])),
            (Connector::Plus, var(1.0, [('z', 1)])),
        ]);
        let terms: Vec<_> = seq.terms().collect();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].run.len(), 1);
        assert_eq!(terms[1].run.len(), 0);
    }

    #[test]
    fn add_merges_standalone_like_terms() {
        let base = seq([(Connector::Plus, var(2.0, [('x', 1)]))]);
        let result = base.add(&var(3.0, [('x', 1)])).unwrap();
        assert_eq!(result.len(), 1);
        let (connector, Operand::Monomial(merged)) = &result.elements()[0] else {
            panic!("expected a monomial element");
        };
        assert_eq!(*connector, Connector::Plus);
        assert_float_absolute_eq!(merged.factor, 5.0, 1e-4);
    }

    #[test]
    fn sub_accumulates_in_signed_space() {
        // 2x - 5x = -3x, rendered with a minus connector and a positive factor
        let base = seq([(Connector::Plus, var(2.0, [('x', 1)]))]);
        let result = base.sub(&var(5.0, [('x', 1)])).unwrap();
        assert_eq!(result.to_string(), "-3x");
    }

    #[test]
    fn merge_order_does_not_matter() {
        let base = seq([(Connector::Plus, var(1.0, [('x', 1)]))]);
        let m1 = var(2.5, [('x', 1)]);
        let m2 = var(-4.0, [('x', 1)]);
        let one_way = base.add(&m1).unwrap().add(&m2).unwrap();
        let other_way = base.add(&m2).unwrap().add(&m1).unwrap();
        assert!(one_way.is_equal(&other_way));
    }

    #[test]
    fn cancelling_terms_leave_an_empty_seq() {
        let base = seq([(Connector::Plus, var(5.0, [('x', 1)]))]);
        let result = base.sub(&var(5.0, [('x', 1)])).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.to_string(), "0");
    }

    #[test]
    fn run_elements_are_not_merge_targets() {
        // (x * y) + x, plus another x: only the standalone x merges
        let base = seq([
            (Connector::Plus, var(1.0, [('x', 1)])),
            (Connector::Mul, var(1.0, [('y', 1)])),
            (Connector::Plus, var(1.0, [('x', 1)])),
        ]);
        let result = base.add(&var(1.0, [('x', 1)])).unwrap();
        assert_eq!(result.len(), 3);
        let (_, Operand::Monomial(merged)) = &result.elements()[2] else {
            panic!("expected a monomial element");
        };
        assert_float_absolute_eq!(merged.factor, 2.0, 1e-4);
    }

    #[test]
    fn add_folds_each_term_of_a_seq_operand() {
        // x + (x * y - z) = x + xy - z
        let base = seq([(Connector::Plus, var(1.0, [('x', 1)]))]);
        let addend = seq([
            (Connector::Plus, var(1.0, [('x', 1)])),
            (Connector::Mul, var(1.0, [('y', 1)])),
            (Connector::Minus, var(1.0, [('z', 1)])),
        ]);
        let result = base.add(&Operand::Seq(addend)).unwrap();
        assert_eq!(result.to_string(), "x+xy-z");
    }

    #[test]
    fn sub_flips_the_signs_of_a_seq_operand() {
        // x - (y - z) = x - y + z
        let base = seq([(Connector::Plus, var(1.0, [('x', 1)]))]);
        let subtrahend = seq([
            (Connector::Plus, var(1.0, [('y', 1)])),
            (Connector::Minus, var(1.0, [('z', 1)])),
        ]);
        let result = base.sub(&Operand::Seq(subtrahend)).unwrap();
        assert_eq!(result.to_string(), "x-y+z");
    }

    #[test]
    fn sub_of_equal_seqs_is_zero() {
        let base = seq([
            (Connector::Plus, var(1.0, [('x', 1)])),
            (Connector::Minus, var(2.0, [('y', 1)])),
        ]);
        let result = base.sub(&Operand::Seq(base.clone())).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.to_string(), "0");
    }

    #[test]
    fn mul_cancels_a_matching_divisor() {
        // (x + y / x) * x = x^2 + y
        let base = seq([
            (Connector::Plus, var(1.0, [('x', 1)])),
            (Connector::Plus, var(1.0, [('y', 1)])),
            (Connector::Div, var(1.0, [('x', 1)])),
        ]);
        let result = base.mul(&var(1.0, [('x', 1)])).unwrap();
        assert_eq!(result.to_string(), "x^2+y");
    }

    #[test]
    fn mul_keeps_unmatched_divisors_in_the_run() {
        // (x / y) * z = xz / y, with the divisor still explicit
        let base = seq([
            (Connector::Plus, var(1.0, [('x', 1)])),
            (Connector::Div, var(1.0, [('y', 1)])),
        ]);
        let result = base.mul(&var(1.0, [('z', 1)])).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.elements()[1].0, Connector::Div);
        assert_eq!(result.to_string(), "xz/y");
    }

    #[test]
    fn mul_cancels_a_nested_seq_divisor() {
        // (x / (a + b)) * (a + b) = x
        let group = seq([
            (Connector::Plus, var(1.0, [('a', 1)])),
            (Connector::Plus, var(1.0, [('b', 1)])),
        ]);
        let base = seq([
            (Connector::Plus, var(1.0, [('x', 1)])),
            (Connector::Div, Operand::Seq(group.clone())),
        ]);
        let result = base.mul(&Operand::Seq(group)).unwrap();
        assert_eq!(result.to_string(), "x");
    }

    #[test]
    fn mul_distributes_a_seq_operand() {
        // (a + b) * x = ax + bx
        let base = seq([
            (Connector::Plus, var(1.0, [('a', 1)])),
            (Connector::Plus, var(1.0, [('b', 1)])),
        ]);
        let result = base.mul(&var(1.0, [('x', 1)])).unwrap();
        assert_eq!(result.to_string(), "ax+bx");
    }

    #[test]
    fn div_folds_runs_before_dividing() {
        // (4x * y + 2z) / 2z = 2xy/z + 1
        let base = seq([
            (Connector::Plus, var(4.0, [('x', 1)])),
            (Connector::Mul, var(1.0, [('y', 1)])),
            (Connector::Plus, var(2.0, [('z', 1)])),
        ]);
        let result = base.div(&Monomial::with_powers(2.0, [('z', 1)])).unwrap();
        assert_eq!(result.to_string(), "2xy/z+1");
    }

    #[test]
    fn div_by_seq_is_rejected() {
        let base = seq([(Connector::Plus, var(1.0, [('x', 1)]))]);
        let group = Operand::Seq(seq([(Connector::Plus, var(1.0, [('y', 1)]))]));
        assert_eq!(
            Operand::Seq(base).div(&group),
            Err(ArithmeticError::NonMonomialDenominator),
        );
    }

    #[test]
    fn display_parenthesizes_nested_seqs() {
        let group = seq([
            (Connector::Plus, var(1.0, [('a', 1)])),
            (Connector::Plus, var(1.0, [('b', 1)])),
        ]);
        let outer = seq([
            (Connector::Plus, var(1.0, [('x', 1)])),
            (Connector::Div, Operand::Seq(group)),
        ]);
        assert_eq!(outer.to_string(), "x/(a+b)");
    }
}
