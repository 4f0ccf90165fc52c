use crate::{kind::NormalizationError, normalizer::canonicalize};
use canon_error::Error;
use canon_parser::{parser::Parser, validator::validate};

/// Runs one formula through the full pipeline: validate, parse, canonicalize, render.
///
/// Validation failures carry every violation found; parse and normalization failures carry a
/// single error. The stages run strictly in sequence and the parser is never entered on a
/// formula that failed validation.
pub fn canonicalize_formula(source: &str) -> Result<String, Vec<Error>> {
    validate(source)?;
    let equation = Parser::new(source).parse().map_err(|error| vec![error])?;
    let canonical = canonicalize(equation).map_err(|cause| {
        vec![Error::spanned(0..source.len(), NormalizationError { cause })]
    })?;
    Ok(canonical.to_string())
}
