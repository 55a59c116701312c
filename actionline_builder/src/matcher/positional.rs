use crate::api::ActionSpec;
use crate::matcher::token::*;
use crate::model::Value;
use crate::parser::ParseError;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The outcome of positional binding: the bound arguments in declaration order, and whatever tokens were not bound.
#[derive(Debug)]
pub(crate) struct PositionalMatches {
    pub values: Vec<(String, Value)>,
    pub leftover: Vec<String>,
}

/// Bind the option matcher's `remainder` to the positional arguments of `spec`.
///
/// Before the `--` terminator, option-like tokens go straight to the leftover.
/// After it, every token is a positional candidate.
/// Candidates are bound to arguments left to right; those beyond the declared arguments are appended to the leftover.
/// Under-supply is not an error here.
pub(crate) fn bind_positionals(
    spec: &ActionSpec,
    remainder: Vec<String>,
) -> Result<PositionalMatches, ParseError> {
    let (maybe_positionals, positional_only) = split_terminator(&remainder);
    let (mut leftover, mut candidates): (Vec<&String>, Vec<&String>) = maybe_positionals
        .iter()
        .partition(|token| is_option(token));
    candidates.extend(positional_only);

    let arguments = spec.arguments();
    let mut values = Vec::with_capacity(arguments.len().min(candidates.len()));

    for (token, argument) in candidates.iter().zip(arguments) {
        let value = argument.mapper().map(token)?;

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Argument '{}' bound to {value:?}.", argument.name());
        }

        values.push((argument.name().to_string(), value));
    }

    if candidates.len() > arguments.len() {
        leftover.extend(&candidates[arguments.len()..]);
    }

    Ok(PositionalMatches {
        values,
        leftover: leftover.into_iter().cloned().collect(),
    })
}
