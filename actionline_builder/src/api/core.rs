use std::collections::BTreeMap;

use crate::api::ActionSpec;
use crate::model::Arguments;
use crate::parser::{Action, ActionRegistry, ConfigError, ConsoleInterface, UserInterface};

/// The action registration builder.
///
/// Each action is registered under a name, which selects it from the command line.
/// At most one default action may be registered, which is selected when no action name is given.
///
/// ### Example
/// ```
/// # use actionline_builder as actionline;
/// use actionline::{ActionSpec, CommandLine, Mapper, OptionSpec, Parameter};
///
/// let registry = CommandLine::new("program")
///     .action(
///         "greet",
///         ActionSpec::new()
///             .add(Parameter::option("shout", OptionSpec::flag("s", "shout").unwrap()))
///             .add(Parameter::argument("name", Mapper::identity())),
///         |arguments| {
///             let greeting = format!("hello {}", arguments.argument::<String>("name").unwrap());
///             if arguments.flag("shout") {
///                 greeting.to_uppercase()
///             } else {
///                 greeting
///             }
///         },
///     )
///     .default_action(ActionSpec::new(), |_| "nothing to do".to_string())
///     .build();
///
/// assert_eq!(registry.execute("greet --shout world").unwrap(), "HELLO WORLD");
/// assert_eq!(registry.execute("").unwrap(), "nothing to do");
/// ```
pub struct CommandLine<R> {
    program: String,
    actions: BTreeMap<String, Action<R>>,
    default: Option<Action<R>>,
    deferred_error: Option<ConfigError>,
}

impl<R> CommandLine<R> {
    /// Create an action registration builder.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            actions: BTreeMap::default(),
            default: None,
            deferred_error: None,
        }
    }

    /// Register an action under `name`.
    /// If repeated for the same `name`, only the final action will be registered.
    ///
    /// The action name may not be empty, start with a dash, nor contain whitespace.
    pub fn action(
        mut self,
        name: impl Into<String>,
        spec: ActionSpec,
        body: impl Fn(Arguments) -> R + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();

        if name.is_empty() || name.starts_with('-') || name.contains(char::is_whitespace) {
            self.deferred_error
                .replace(ConfigError::MalformedAction(name.clone()));
        }

        if let Err(error) = spec.check() {
            self.deferred_error.replace(error);
        }

        self.actions.insert(name, Action::new(spec, body));
        self
    }

    /// Register the default action, selected when the command line names no registered action.
    /// There may be at most one default action.
    ///
    /// ### Example
    /// ```
    /// # use actionline_builder as actionline;
    /// use actionline::{ActionSpec, CommandLine, ConfigError};
    ///
    /// let result = CommandLine::new("program")
    ///     .default_action(ActionSpec::new(), |_| 1)
    ///     .default_action(ActionSpec::new(), |_| 2)
    ///     .build_registry();
    ///
    /// assert_eq!(result.err(), Some(ConfigError::DuplicateDefault));
    /// ```
    pub fn default_action(
        mut self,
        spec: ActionSpec,
        body: impl Fn(Arguments) -> R + Send + Sync + 'static,
    ) -> Self {
        if self.default.is_some() {
            self.deferred_error.replace(ConfigError::DuplicateDefault);
        }

        if let Err(error) = spec.check() {
            self.deferred_error.replace(error);
        }

        self.default.replace(Action::new(spec, body));
        self
    }

    fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<ActionRegistry<R>, ConfigError> {
        if let Some(error) = self.deferred_error {
            return Err(error);
        }

        Ok(ActionRegistry::new(
            self.program,
            self.actions,
            self.default,
            user_interface,
        ))
    }

    /// Build the action registry as a Result.
    /// This finalizes the configuration and checks for errors (ex: a repeated parameter name).
    pub fn build_registry(self) -> Result<ActionRegistry<R>, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the action registry.
    /// This finalizes the configuration and checks for errors (ex: a repeated parameter name).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> ActionRegistry<R> {
        match self.build_registry() {
            Ok(registry) => registry,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}
