use std::collections::HashSet;

use crate::api::capture::Mapper;
use crate::api::option::OptionSpec;
use crate::matcher::{bind_positionals, match_options};
use crate::model::Arguments;
use crate::parser::{ConfigError, ParseError};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A declared positional argument.
#[derive(Debug, Clone)]
pub(crate) struct ArgumentSpec {
    name: String,
    mapper: Mapper,
    required: bool,
}

impl ArgumentSpec {
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub(crate) fn required(&self) -> bool {
        self.required
    }
}

#[derive(Debug, Clone)]
enum ParameterClass {
    Arg(ArgumentSpec),
    Opt(String, OptionSpec),
}

/// A parameter of an action: either a positional argument or a keyword option.
pub struct Parameter {
    class: ParameterClass,
}

impl Parameter {
    /// Create a required positional argument, mapped through `mapper`.
    ///
    /// ### Example
    /// ```
    /// # use actionline_builder as actionline;
    /// use actionline::{ActionSpec, Mapper, Parameter};
    ///
    /// let spec = ActionSpec::new()
    ///     .add(Parameter::argument("a", Mapper::parse::<i32>()))
    ///     .add(Parameter::argument("b", Mapper::identity()));
    /// let arguments = spec.parse(&["33", "77"]).unwrap();
    ///
    /// assert_eq!(arguments.argument::<i32>("a"), Some(&33));
    /// assert_eq!(arguments.argument::<String>("b").unwrap(), "77");
    /// ```
    pub fn argument(name: impl Into<String>, mapper: Mapper) -> Self {
        Self {
            class: ParameterClass::Arg(ArgumentSpec {
                name: name.into(),
                mapper,
                required: true,
            }),
        }
    }

    /// Create a positional argument which may be left unsupplied.
    /// Optional arguments must follow all required arguments.
    pub fn optional_argument(name: impl Into<String>, mapper: Mapper) -> Self {
        Self {
            class: ParameterClass::Arg(ArgumentSpec {
                name: name.into(),
                mapper,
                required: false,
            }),
        }
    }

    /// Create a keyword option.
    ///
    /// ### Example
    /// ```
    /// # use actionline_builder as actionline;
    /// use actionline::{ActionSpec, Mapper, OptionSpec, Parameter};
    ///
    /// let spec = ActionSpec::new()
    ///     .add(Parameter::option("verbose", OptionSpec::count("v", None).unwrap()))
    ///     .add(Parameter::option("count", OptionSpec::key("c", None, Mapper::parse::<u32>()).unwrap()));
    /// let arguments = spec.parse(&["-vvvvvvc32"]).unwrap();
    ///
    /// assert_eq!(arguments.count("verbose"), 6);
    /// assert_eq!(arguments.option::<u32>("count"), Some(&32));
    /// ```
    pub fn option(name: impl Into<String>, option: OptionSpec) -> Self {
        Self {
            class: ParameterClass::Opt(name.into(), option),
        }
    }
}

/// The declaration of an action: its ordered positional arguments, its options, and whether it is variadic.
///
/// An `ActionSpec` is immutable once registered; parsing never changes it.
#[derive(Debug, Clone, Default)]
pub struct ActionSpec {
    about: Option<String>,
    arguments: Vec<ArgumentSpec>,
    options: Vec<(String, OptionSpec)>,
    variadic: bool,
}

impl ActionSpec {
    /// Create an action without parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Document the action for the usage message.
    /// If repeated, only the final description applies.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Add an argument/option to the action.
    ///
    /// The order of argument parameters corresponds to their positional order during parsing.
    /// The order of option parameters does not affect parsing.
    pub fn add(mut self, parameter: Parameter) -> Self {
        match parameter.class {
            ParameterClass::Arg(argument) => self.arguments.push(argument),
            ParameterClass::Opt(name, option) => self.options.push((name, option)),
        }

        self
    }

    /// Make the action variadic: unconsumed trailing tokens are handed to the action instead of being rejected.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Whether the action accepts unconsumed trailing tokens.
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub(crate) fn about_message(&self) -> Option<&str> {
        self.about.as_deref()
    }

    pub(crate) fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    pub(crate) fn options(&self) -> &[(String, OptionSpec)] {
        &self.options
    }

    pub(crate) fn option_by_short(&self, short: char) -> Option<(&str, &OptionSpec)> {
        self.options
            .iter()
            .find(|(_, option)| option.short() == Some(short))
            .map(|(name, option)| (name.as_str(), option))
    }

    pub(crate) fn option_by_long(&self, long: &str) -> Option<(&str, &OptionSpec)> {
        self.options
            .iter()
            .find(|(_, option)| option.long() == Some(long))
            .map(|(name, option)| (name.as_str(), option))
    }

    /// Validate the declaration: parameter names, short forms and long forms are unique,
    /// and required arguments precede optional ones.
    pub fn check(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        let mut shorts = HashSet::new();
        let mut longs = HashSet::new();
        let mut optional_seen = false;

        for argument in &self.arguments {
            if !names.insert(argument.name()) {
                return Err(ConfigError::DuplicateParameter(argument.name().to_string()));
            }

            if argument.required() && optional_seen {
                return Err(ConfigError::RequiredAfterOptional(
                    argument.name().to_string(),
                ));
            }

            optional_seen |= !argument.required();
        }

        for (name, option) in &self.options {
            if !names.insert(name.as_str()) {
                return Err(ConfigError::DuplicateParameter(name.clone()));
            }

            if let Some(short) = option.short() {
                if !shorts.insert(short) {
                    return Err(ConfigError::DuplicateShortOption(short));
                }
            }

            if let Some(long) = option.long() {
                if !longs.insert(long) {
                    return Err(ConfigError::DuplicateLongOption(long.to_string()));
                }
            }
        }

        Ok(())
    }

    /// Parse `tokens` against this action: options first, then positional arguments.
    ///
    /// Unconsumed tokens are kept in [`Arguments::rest`] regardless of [`ActionSpec::is_variadic`];
    /// rejecting them (and unsupplied required arguments) is left to the dispatcher.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Arguments, ParseError> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        let option_matches = match_options(self, &tokens)?;
        let positional_matches = bind_positionals(self, option_matches.remainder)?;

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Bound {} option(s), {} positional(s), leftover: {:?}.",
                option_matches.values.len(),
                positional_matches.values.len(),
                positional_matches.leftover
            );
        }

        Ok(Arguments::new(
            option_matches.values,
            positional_matches.values,
            positional_matches.leftover,
        ))
    }
}
