use super::kind::InvalidLiteral;
use canon_core::Monomial;

/// Converts the text of a literal (a run of digits, letters, `.` and `^`) into a monomial.
///
/// Digits and decimal points accumulate into a numeric buffer. A letter flushes the buffer: as
/// the monomial's factor when no variable has been seen yet, or as the pending variable's
/// exponent when the buffer followed a `^`. Each letter then becomes the pending variable with a
/// default power of 1. A repeated variable accumulates its exponents, and a variable whose
/// exponents sum to 0 is dropped. At most one numeric factor is supported per literal; the factor
/// defaults to 1 when none appears.
pub fn to_monomial(literal: &str) -> Result<Monomial, InvalidLiteral> {
    let mut monomial = Monomial::one();
    let mut num = String::new();
    let mut exponent = false;
    let mut pending = None;

    for ch in literal.chars() {
        match ch {
            '^' => exponent = true,
            '.' => num.push(ch),
            ch if ch.is_ascii_digit() => num.push(ch),
            ch if ch.is_ascii_alphabetic() => {
                flush(&mut monomial, pending, exponent, &num)
                    .map_err(|()| error(literal))?;
                exponent = false;
                num.clear();
                pending = Some(ch);
            },
            _ => return Err(error(literal)),
        }
    }
    flush(&mut monomial, pending, exponent, &num).map_err(|()| error(literal))?;

    Ok(monomial)
}

/// Applies the numeric buffer to the monomial: an exponent for the pending variable, or the
/// factor when no variable has started yet. A digit run after a variable without a `^` is
/// ignored, matching the literal grammar where only `^` introduces an exponent.
fn flush(monomial: &mut Monomial, pending: Option<char>, exponent: bool, num: &str) -> Result<(), ()> {
    match pending {
        Some(var) => {
            let power = if exponent && !num.is_empty() {
                num.parse::<i32>().map_err(|_| ())?
            } else {
                1
            };
            monomial.insert_power(var, power);
        },
        None if !num.is_empty() => monomial.factor = num.parse::<f64>().map_err(|_| ())?,
        None => {},
    }
    Ok(())
}

fn error(literal: &str) -> InvalidLiteral {
    InvalidLiteral { literal: literal.to_owned() }
}
