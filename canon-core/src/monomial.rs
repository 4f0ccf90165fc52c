use crate::{error::ArithmeticError, factor_eq};
use std::{collections::BTreeMap, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single multiplicative term: a numeric factor times a set of variables raised to integer
/// powers, such as `3.5xy^2`.
///
/// A negative power encodes division by that variable, so `x/y` folds into the single monomial
/// `{factor: 1, powers: {x: 1, y: -1}}`. A variable never appears with power 0; powers that
/// cancel to 0 are removed as they are combined.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Monomial {
    /// The numeric factor of the monomial.
    pub factor: f64,

    /// Maps each variable symbol to its (non-zero) integer power.
    powers: BTreeMap<char, i32>,
}

impl Monomial {
    /// Creates a monomial with the given factor and no variables.
    pub fn new(factor: f64) -> Self {
        Self { factor, powers: BTreeMap::new() }
    }

    /// The identity monomial, `1`.
    pub fn one() -> Self {
        Self::new(1.0)
    }

    /// The zero monomial.
    pub fn zero() -> Self {
        Self::new(0.0)
    }

    /// Creates a monomial from a factor and a list of `(variable, power)` pairs. Powers given for
    /// the same variable accumulate; variables whose power sums to 0 are dropped.
    pub fn with_powers(factor: f64, powers: impl IntoIterator<Item = (char, i32)>) -> Self {
        let mut monomial = Self::new(factor);
        for (var, power) in powers {
            monomial.insert_power(var, power);
        }
        monomial
    }

    /// The variable-power map of this monomial.
    pub fn powers(&self) -> &BTreeMap<char, i32> {
        &self.powers
    }

    /// Adds `power` to the exponent of `var`, removing the variable entirely if the result is 0.
    pub fn insert_power(&mut self, var: char, power: i32) {
        let combined = self.powers.get(&var).copied().unwrap_or(0) + power;
        if combined == 0 {
            self.powers.remove(&var);
        } else {
            self.powers.insert(var, combined);
        }
    }

    /// Returns true if this monomial's factor is zero within tolerance.
    pub fn is_zero(&self) -> bool {
        factor_eq(self.factor, 0.0)
    }

    /// Returns true if the two monomials are *like terms*: identical variable-power signatures,
    /// regardless of factor.
    pub fn is_like(&self, other: &Monomial) -> bool {
        self.powers == other.powers
    }

    /// Returns true if the two monomials are like terms and, when `check_factor` is set, their
    /// factors are also equal within tolerance.
    pub fn is_equal(&self, other: &Monomial, check_factor: bool) -> bool {
        self.is_like(other) && (!check_factor || factor_eq(self.factor, other.factor))
    }

    /// Returns this monomial with its factor negated.
    pub fn neg(&self) -> Monomial {
        Monomial { factor: -self.factor, powers: self.powers.clone() }
    }

    /// Adds another monomial to this one. The two must be like terms; anything else is a contract
    /// violation on the caller's part.
    pub fn add(&self, other: &Monomial) -> Result<Monomial, ArithmeticError> {
        if !self.is_like(other) {
            return Err(ArithmeticError::MismatchedTerms);
        }
        Ok(Monomial { factor: self.factor + other.factor, powers: self.powers.clone() })
    }

    /// Subtracts another monomial from this one. The two must be like terms.
    pub fn sub(&self, other: &Monomial) -> Result<Monomial, ArithmeticError> {
        if !self.is_like(other) {
            return Err(ArithmeticError::MismatchedTerms);
        }
        Ok(Monomial { factor: self.factor - other.factor, powers: self.powers.clone() })
    }

    /// Multiplies two monomials: factors multiply, powers add per variable. A variable whose
    /// powers cancel to 0 is dropped.
    pub fn mul(&self, other: &Monomial) -> Monomial {
        let mut result = self.clone();
        result.factor = self.factor * other.factor;
        for (&var, &power) in &other.powers {
            result.insert_power(var, power);
        }
        result
    }

    /// Divides this monomial by another: factors divide, powers subtract per variable, with
    /// negative powers representing a remaining denominator.
    pub fn div(&self, other: &Monomial) -> Result<Monomial, ArithmeticError> {
        if other.is_zero() {
            return Err(ArithmeticError::ZeroDenominator);
        }
        if self.is_equal(other, true) {
            return Ok(Monomial::one());
        }

        let mut result = self.clone();
        result.factor = self.factor / other.factor;
        for (&var, &power) in &other.powers {
            result.insert_power(var, -power);
        }
        Ok(result)
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut numer = String::new();
        let mut denom = String::new();
        for (&var, &power) in &self.powers {
            let side = if power > 0 { &mut numer } else { &mut denom };
            side.push(var);
            let power = power.abs();
            if power != 1 {
                side.push('^');
                side.push_str(&power.to_string());
            }
        }

        if numer.is_empty() || !factor_eq(self.factor, 1.0) {
            write!(f, "{}", FmtFactor(self.factor))?;
        }
        f.write_str(&numer)?;
        if !denom.is_empty() {
            write!(f, "/{}", denom)?;
        }
        Ok(())
    }
}

/// Formats a factor the way the canonical form is printed: rounded to two decimal places, with no
/// trailing decimal point for whole values.
struct FmtFactor(f64);

impl fmt::Display for FmtFactor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rounded = (self.0 * 100.0).round() / 100.0;
        if rounded == rounded.trunc() {
            write!(f, "{}", rounded as i64)
        } else {
            write!(f, "{}", rounded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;

    #[test]
    fn mul_merges_powers() {
        // 3xy^3 * 4yb = 12bxy^4
        let lhs = Monomial::with_powers(3.0, [('x', 1), ('y', 3)]);
        let rhs = Monomial::with_powers(4.0, [('y', 1), ('b', 1)]);
        let result = lhs.mul(&rhs);

        assert_float_absolute_eq!(result.factor, 12.0, 1e-4);
        assert_eq!(result.powers().len(), 3);
        assert_eq!(result.powers()[&'y'], 4);
        assert_eq!(result.powers()[&'b'], 1);
    }

    #[test]
    fn div_cancels_variables() {
        // 8xy^3 / 4ybx = 2y^2
        let lhs = Monomial::with_powers(8.0, [('x', 1), ('y', 3)]);
        let rhs = Monomial::with_powers(4.0, [('y', 1), ('b', 1), ('x', 1)]);
        let result = lhs.div(&rhs).unwrap();

        assert_float_absolute_eq!(result.factor, 2.0, 1e-4);
        assert_eq!(result.powers().len(), 2);
        assert_eq!(result.powers()[&'y'], 2);
        assert_eq!(result.powers()[&'b'], -1);
    }

    #[test]
    fn div_produces_negative_powers() {
        // x / y = xy^-1
        let lhs = Monomial::with_powers(1.0, [('x', 1)]);
        let rhs = Monomial::with_powers(1.0, [('y', 1)]);
        let result = lhs.div(&rhs).unwrap();
        assert_eq!(result.powers()[&'y'], -1);
        assert_eq!(result.to_string(), "x/y");
    }

    #[test]
    fn div_by_equal_is_one() {
        let lhs = Monomial::with_powers(4.0, [('x', 2)]);
        let result = lhs.div(&lhs.clone()).unwrap();
        assert!(result.powers().is_empty());
        assert_float_absolute_eq!(result.factor, 1.0, 1e-4);
    }

    #[test]
    fn div_by_zero_is_an_error() {
        let lhs = Monomial::with_powers(4.0, [('x', 2)]);
        assert_eq!(lhs.div(&Monomial::zero()), Err(ArithmeticError::ZeroDenominator));
    }

    #[test]
    fn add_requires_like_terms() {
        // 8cd^2b + 4d^2cb = 12bcd^2
        let lhs = Monomial::with_powers(8.0, [('c', 1), ('d', 2), ('b', 1)]);
        let rhs = Monomial::with_powers(4.0, [('d', 2), ('c', 1), ('b', 1)]);
        let result = lhs.add(&rhs).unwrap();
        assert_float_absolute_eq!(result.factor, 12.0, 1e-4);
        assert_eq!(result.powers()[&'d'], 2);

        let unlike = Monomial::with_powers(4.0, [('d', 1), ('c', 1), ('b', 1)]);
        assert_eq!(lhs.add(&unlike), Err(ArithmeticError::MismatchedTerms));
    }

    #[test]
    fn sub_requires_like_terms() {
        // 8xy - 4yx = 4xy
        let lhs = Monomial::with_powers(8.0, [('x', 1), ('y', 1)]);
        let rhs = Monomial::with_powers(4.0, [('y', 1), ('x', 1)]);
        let result = lhs.sub(&rhs).unwrap();
        assert_float_absolute_eq!(result.factor, 4.0, 1e-4);

        let unlike = Monomial::with_powers(10.0, [('x', 1), ('y', 2)]);
        assert_eq!(lhs.sub(&unlike), Err(ArithmeticError::MismatchedTerms));
    }

    #[test]
    fn zero_powers_are_dropped() {
        let mut monomial = Monomial::with_powers(2.0, [('x', 2)]);
        monomial.insert_power('x', -2);
        assert!(monomial.powers().is_empty());
    }

    #[test]
    fn display_elides_unit_factor_only_with_variables() {
        assert_eq!(Monomial::with_powers(1.0, [('x', 2), ('y', 1)]).to_string(), "x^2y");
        assert_eq!(Monomial::with_powers(4.5, [('x', 1), ('y', 1)]).to_string(), "4.5xy");
        assert_eq!(Monomial::with_powers(1.0, [('y', -2)]).to_string(), "1/y^2");
        assert_eq!(Monomial::new(1.0).to_string(), "1");
        assert_eq!(Monomial::zero().to_string(), "0");
    }
}
