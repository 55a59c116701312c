use thiserror::Error;

use crate::api::InvalidConversion;

/// A mistake in the declaration of actions or options.
/// Raised while building, before any Cli token is parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A short form must be exactly one (non-dash) character.
    #[error("Config error: short form '{0}' should be at most of one character.")]
    MalformedShort(String),

    /// A long form may not start with a dash, nor contain `=` or whitespace.
    #[error("Config error: long form '{0}' is malformed.")]
    MalformedLong(String),

    /// An option was declared with neither a short nor a long form.
    #[error("Config error: an option requires a short or a long form.")]
    MissingName,

    /// Two parameters of the same action share a name.
    #[error("Config error: cannot duplicate the parameter '{0}'.")]
    DuplicateParameter(String),

    /// Two options of the same action share a short form.
    #[error("Config error: cannot duplicate the short option '-{0}'.")]
    DuplicateShortOption(char),

    /// Two options of the same action share a long form.
    #[error("Config error: cannot duplicate the long option '--{0}'.")]
    DuplicateLongOption(String),

    /// A required positional argument follows an optional one.
    #[error("Config error: required argument '{0}' cannot follow an optional argument.")]
    RequiredAfterOptional(String),

    /// An action name could never be selected from a command line (ex: empty, or starting with a dash).
    #[error("Config error: action name '{0}' is malformed.")]
    MalformedAction(String),

    /// A second default action was registered.
    #[error("Config error: there could be at most one default action.")]
    DuplicateDefault,
}

/// A failure to parse or dispatch a command line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The command line could not be split into tokens.
    #[error("Parse error: cannot split the command line '{0}'.")]
    InvalidInput(String),

    /// The first positional token names no action, and there is no default action.
    #[error("Parse error: no such action '{0}'.")]
    UnknownAction(String),

    /// There are no positional tokens, and there is no default action.
    #[error("Parse error: no action specified.")]
    NoAction,

    /// A value-taking option is missing its value.
    #[error("Parse error: option '{0}' needs an argument.")]
    MissingOptionValue(String),

    /// A value was attached to an option that takes none.
    #[error("Parse error: option '{0}' does not take arguments.")]
    UnexpectedOptionValue(String),

    /// An at-most-once option was specified more than once.
    #[error("Parse error: option '{0}' should be specified at most once.")]
    DuplicateKey(String),

    /// Tokens remain for an action that is not variadic.
    #[error("Parse error: too many arguments: {}.", .0.join(" "))]
    TooManyArguments(Vec<String>),

    /// A required positional argument was not supplied.
    #[error("Parse error: missing argument '{0}'.")]
    MissingArgument(String),

    /// A mapper rejected its token.
    #[error("Parse error: {0}")]
    InvalidConversion(#[from] InvalidConversion),
}
