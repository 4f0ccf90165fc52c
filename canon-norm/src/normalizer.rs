use canon_core::{ArithmeticError, Connector, Equation, Monomial, Operand, TermSeq};

/// The states of the canonicalization pass, in the order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Multiply both sides by the identity monomial, establishing normalized copies.
    Start,

    /// Repeatedly multiply both sides by every `Div`-connected operand found on either side,
    /// until a scan finds none.
    ClearingDenominators,

    /// Move the right side onto the left: `left := left - right`, `right := 0`.
    Subtracting,

    Done,
}

/// Drives one equation through the canonicalization state machine.
#[derive(Debug)]
pub struct Normalizer {
    equation: Equation,
    state: State,
}

impl Normalizer {
    pub fn new(equation: Equation) -> Self {
        Self { equation, state: State::Start }
    }

    /// The state the machine is currently in.
    pub fn state(&self) -> State {
        self.state
    }

    /// Runs the machine to completion and returns the canonical equation.
    pub fn run(mut self) -> Result<Equation, ArithmeticError> {
        while self.state != State::Done {
            self.step()?;
        }
        Ok(self.equation)
    }

    /// Advances the machine by one step. `ClearingDenominators` steps once per scan, so the state
    /// only moves on when a scan comes up empty; termination is guaranteed because multiplication
    /// cancels each divisor it is given rather than re-introducing it.
    pub fn step(&mut self) -> Result<(), ArithmeticError> {
        match self.state {
            State::Start => {
                let one = Operand::Monomial(Monomial::one());
                self.equation.left = self.equation.left.mul(&one)?;
                self.equation.right = self.equation.right.mul(&one)?;
                self.state = State::ClearingDenominators;
            },
            State::ClearingDenominators => {
                let mut divisors = Vec::new();
                collect_divisors(&mut divisors, &self.equation.left);
                collect_divisors(&mut divisors, &self.equation.right);
                if divisors.is_empty() {
                    self.state = State::Subtracting;
                }
                for divisor in &divisors {
                    self.equation.left = self.equation.left.mul(divisor)?;
                    self.equation.right = self.equation.right.mul(divisor)?;
                }
            },
            State::Subtracting => {
                let right = Operand::Seq(self.equation.right.clone());
                self.equation.left = self.equation.left.sub(&right)?;
                self.equation.right =
                    TermSeq::of(Connector::Plus, Operand::Monomial(Monomial::zero()));
                self.state = State::Done;
            },
            State::Done => {},
        }
        Ok(())
    }
}

/// Collects every `Div`-connected operand on the given side, descending into nested groups that
/// are not themselves divisors.
fn collect_divisors(divisors: &mut Vec<Operand>, seq: &TermSeq) {
    for (connector, operand) in seq.elements() {
        if *connector == Connector::Div {
            divisors.push(operand.clone());
        } else if let Operand::Seq(nested) = operand {
            collect_divisors(divisors, nested);
        }
    }
}

/// Canonicalizes a parsed equation into the form `P = 0`.
pub fn canonicalize(equation: Equation) -> Result<Equation, ArithmeticError> {
    Normalizer::new(equation).run()
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn visits_every_state_in_order() {
        let equation = Equation::new(
            seq([(Connector::Plus, var(1.0, [('x', 1)]))]),
            seq([(Connector::Plus, var(1.0, [('y', 1)]))]),
        );
        let mut normalizer = Normalizer::new(equation);
        assert_eq!(normalizer.state(), State::Start);
        normalizer.step().unwrap();
        assert_eq!(normalizer.state(), State::ClearingDenominators);
        normalizer.step().unwrap();
        assert_eq!(normalizer.state(), State::Subtracting);
        normalizer.step().unwrap();
        assert_eq!(normalizer.state(), State::Done);
    }

    #[test]
    fn clearing_loops_until_no_divisors_remain() {
        // x / y = z: one round of clearing multiplies both sides by y
        let equation = Equation::new(
            seq([
                (Connector::Plus, var(1.0, [('x', 1)])),
                (Connector::Div, var(1.0, [('y', 1)])),
            ]),
            seq([(Connector::Plus, var(1.0, [('z', 1)]))]),
        );
        let canonical = canonicalize(equation).unwrap();
        assert_eq!(canonical.to_string(), "x-yz = 0");
        assert!(canonical
            .left
            .elements()
            .iter()
            .all(|(connector, _)| *connector != Connector::Div));
    }

    #[test]
    fn divisors_are_found_inside_nested_groups() {
        // x + (y / z) = 0: the divisor sits one group deep
        let equation = Equation::new(
            seq([
                (Connector::Plus, var(1.0, [('x', 1)])),
                (
                    Connector::Plus,
                    Operand::Seq(seq([
                        (Connector::Plus, var(1.0, [('y', 1)])),
                        (Connector::Div, var(1.0, [('z', 1)])),
                    ])),
                ),
            ]),
            seq([(Connector::Plus, var(0.0, []))]),
        );
        let mut divisors = Vec::new();
        collect_divisors(&mut divisors, &equation.left);
        assert_eq!(divisors, vec![var(1.0, [('z', 1)])]);
    }

    #[test]
    fn right_side_becomes_the_zero_monomial() {
        let equation = Equation::new(
            seq([(Connector::Plus, var(2.0, [('x', 1)]))]),
            seq([(Connector::Plus, var(5.0, [('x', 1)]))]),
        );
        let canonical = canonicalize(equation).unwrap();
        assert_eq!(canonical.to_string(), "-3x = 0");
        assert_eq!(canonical.right, seq([(Connector::Plus, var(0.0, []))]));
    }
}
