use std::collections::BTreeMap;
use std::env;

use crate::api::ActionSpec;
use crate::model::Arguments;
use crate::parser::base::*;
use crate::parser::interface::UserInterface;
use crate::parser::printer::{ActionUsage, Printer};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

type ActionBody<R> = dyn Fn(Arguments) -> R + Send + Sync;

/// A registered action: its declaration and its body.
pub(crate) struct Action<R> {
    spec: ActionSpec,
    body: Box<ActionBody<R>>,
}

impl<R> Action<R> {
    pub(crate) fn new(
        spec: ActionSpec,
        body: impl Fn(Arguments) -> R + Send + Sync + 'static,
    ) -> Self {
        Self {
            spec,
            body: Box::new(body),
        }
    }

    fn invoke(&self, tokens: &[String]) -> Result<R, ParseError> {
        let arguments = self.spec.parse(tokens)?;

        if !arguments.rest().is_empty() && !self.spec.is_variadic() {
            return Err(ParseError::TooManyArguments(arguments.rest().to_vec()));
        }

        // Binding is left to right, so everything past the bound positionals went unsupplied.
        if let Some(missing) = self
            .spec
            .arguments()
            .iter()
            .skip(arguments.positionals().len())
            .find(|argument| argument.required())
        {
            return Err(ParseError::MissingArgument(missing.name().to_string()));
        }

        Ok((self.body)(arguments))
    }
}

/// The input to [`ActionRegistry::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandInput {
    /// A single string, split into tokens with POSIX shell quoting rules.
    CommandLine(String),
    /// Pre-split tokens, used as is.
    Tokens(Vec<String>),
}

impl CommandInput {
    fn into_tokens(self) -> Result<Vec<String>, ParseError> {
        match self {
            CommandInput::CommandLine(line) => match shlex::split(&line) {
                Some(tokens) => Ok(tokens),
                None => Err(ParseError::InvalidInput(line)),
            },
            CommandInput::Tokens(tokens) => Ok(tokens),
        }
    }
}

impl From<&str> for CommandInput {
    fn from(value: &str) -> Self {
        CommandInput::CommandLine(value.to_string())
    }
}

impl From<String> for CommandInput {
    fn from(value: String) -> Self {
        CommandInput::CommandLine(value)
    }
}

impl From<Vec<String>> for CommandInput {
    fn from(value: Vec<String>) -> Self {
        CommandInput::Tokens(value)
    }
}

impl From<Vec<&str>> for CommandInput {
    fn from(value: Vec<&str>) -> Self {
        CommandInput::Tokens(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[String]> for CommandInput {
    fn from(value: &[String]) -> Self {
        CommandInput::Tokens(value.to_vec())
    }
}

impl From<&[&str]> for CommandInput {
    fn from(value: &[&str]) -> Self {
        CommandInput::Tokens(value.iter().map(|t| t.to_string()).collect())
    }
}

/// The configured set of actions.
/// Built via `CommandLine::build` or `CommandLine::build_registry`.
///
/// The registry is immutable; executing it concurrently from many threads is safe.
pub struct ActionRegistry<R> {
    actions: BTreeMap<String, Action<R>>,
    default: Option<Action<R>>,
    printer: Printer,
    user_interface: Box<dyn UserInterface>,
}

impl<R> std::fmt::Debug for ActionRegistry<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("default", &self.default.is_some())
            .finish()
    }
}

impl<R> ActionRegistry<R> {
    pub(crate) fn new(
        program: impl Into<String>,
        actions: BTreeMap<String, Action<R>>,
        default: Option<Action<R>>,
        user_interface: Box<dyn UserInterface>,
    ) -> Self {
        let mut usages: Vec<ActionUsage> = actions
            .iter()
            .map(|(name, action)| ActionUsage::new(Some(name), &action.spec))
            .collect();

        if let Some(action) = &default {
            usages.push(ActionUsage::new(None, &action.spec));
        }

        Self {
            actions,
            default,
            printer: Printer::terminal(program, usages),
            user_interface,
        }
    }

    /// Execute the action selected by `input`.
    ///
    /// The action is selected by the first token which does not start with a dash.
    /// When that token names a registered action, it is removed and the named action is selected.
    /// Otherwise, the default action is selected (keeping all tokens).
    /// The remaining tokens are then matched against the action's options and bound to its positional arguments, before invoking the action body.
    ///
    /// ### Example
    /// ```
    /// # use actionline_builder as actionline;
    /// use actionline::{ActionSpec, CommandLine, Mapper, OptionSpec, Parameter, ParseError};
    ///
    /// let registry = CommandLine::new("program")
    ///     .action(
    ///         "add",
    ///         ActionSpec::new()
    ///             .add(Parameter::argument("a", Mapper::parse::<i64>()))
    ///             .add(Parameter::argument("b", Mapper::parse::<i64>())),
    ///         |arguments| arguments.argument::<i64>("a").unwrap() + arguments.argument::<i64>("b").unwrap(),
    ///     )
    ///     .build();
    ///
    /// assert_eq!(registry.execute("add 1 2"), Ok(3));
    /// assert_eq!(registry.execute(vec!["add", "1", "2"]), Ok(3));
    /// assert_eq!(registry.execute("add 1 2 3"), Err(ParseError::TooManyArguments(vec!["3".to_string()])));
    /// assert_eq!(registry.execute("sub 1 2"), Err(ParseError::UnknownAction("sub".to_string())));
    /// ```
    pub fn execute(&self, input: impl Into<CommandInput>) -> Result<R, ParseError> {
        let mut tokens = input.into().into_tokens()?;
        let action = self.select(&mut tokens)?;
        action.invoke(&tokens)
    }

    /// Execute the action selected by `input`, reporting any error to the user.
    ///
    /// On error, the error is printed (along with the usage text, when no action could be selected) and `Err(1)` is returned.
    pub fn run_tokens(&self, input: impl Into<CommandInput>) -> Result<R, i32> {
        match self.execute(input) {
            Ok(value) => Ok(value),
            Err(error) => {
                let print_usage = matches!(
                    error,
                    ParseError::NoAction | ParseError::UnknownAction(_)
                );
                self.user_interface.print_error(error);

                if print_usage {
                    self.printer.print_usage(self.user_interface.as_ref());
                }

                Err(1)
            }
        }
    }

    /// Execute the action selected by the program's command line arguments (`std::env::args`, skipping the program name).
    ///
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn run(&self) -> R {
        let command_input: Vec<String> = env::args().skip(1).collect();

        match self.run_tokens(command_input) {
            Ok(value) => value,
            Err(exit_code) => {
                std::process::exit(exit_code);
            }
        }
    }

    /// The usage text, wrapped to the terminal width.
    pub fn usage(&self) -> String {
        self.printer.render().join("\n")
    }

    fn select(&self, tokens: &mut Vec<String>) -> Result<&Action<R>, ParseError> {
        // The first token not starting with a dash, even if empty.
        let first_positional = tokens.iter().position(|t| !t.starts_with('-'));

        if let Some(index) = first_positional {
            if let Some(action) = self.actions.get(&tokens[index]) {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Selected action '{}' at offset {index}.", tokens[index]);
                }

                tokens.remove(index);
                return Ok(action);
            }
        }

        match (&self.default, first_positional) {
            (Some(action), _) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Selected the default action, tokens: {tokens:?}.");
                }

                Ok(action)
            }
            (None, Some(index)) if !tokens[index].is_empty() => {
                Err(ParseError::UnknownAction(tokens[index].clone()))
            }
            (None, _) => Err(ParseError::NoAction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Mapper, OptionSpec, Parameter};
    use crate::parser::util::InMemoryInterface;
    use crate::test::{assert_contains, tokens};
    use rstest::rstest;

    fn registry(with_default: bool) -> (ActionRegistry<String>, InMemoryInterface) {
        let mut actions = BTreeMap::default();
        actions.insert(
            "install".to_string(),
            Action::new(
                ActionSpec::new()
                    .add(Parameter::option(
                        "verbose",
                        OptionSpec::count("v", "verbose").unwrap(),
                    ))
                    .add(Parameter::argument("package", Mapper::identity())),
                |arguments: Arguments| {
                    format!(
                        "install {} {}",
                        arguments.argument::<String>("package").unwrap(),
                        arguments.count("verbose")
                    )
                },
            ),
        );
        actions.insert(
            "echo".to_string(),
            Action::new(ActionSpec::new().variadic(), |arguments: Arguments| {
                arguments.rest().join(",")
            }),
        );
        let default = if with_default {
            Some(Action::new(
                ActionSpec::new()
                    .add(Parameter::option(
                        "quiet",
                        OptionSpec::flag("q", None).unwrap(),
                    ))
                    .add(Parameter::optional_argument("first", Mapper::identity())),
                |arguments: Arguments| {
                    format!(
                        "default {:?} {}",
                        arguments.argument::<String>("first"),
                        arguments.flag("quiet")
                    )
                },
            ))
        } else {
            None
        };
        let interface = InMemoryInterface::default();
        let registry = ActionRegistry::new("program", actions, default, Box::new(interface.clone()));
        (registry, interface)
    }

    #[rstest]
    #[case(CommandInput::from("a 'b c' \"d\\\"e\""), vec!["a", "b c", "d\"e"])]
    #[case(CommandInput::from("".to_string()), vec![])]
    #[case(CommandInput::from(vec!["a b", "c"]), vec!["a b", "c"])]
    #[case(CommandInput::from(tokens(&["a b", "'c"])), vec!["a b", "'c"])]
    #[case(CommandInput::from(["x", "y"].as_slice()), vec!["x", "y"])]
    #[case(CommandInput::from(tokens(&["x"]).as_slice()), vec!["x"])]
    fn command_input(#[case] input: CommandInput, #[case] expected: Vec<&str>) {
        assert_eq!(input.into_tokens().unwrap(), tokens(&expected));
    }

    #[test]
    fn command_input_unbalanced() {
        assert_eq!(
            CommandInput::from("install 'abc").into_tokens().unwrap_err(),
            ParseError::InvalidInput("install 'abc".to_string())
        );
    }

    #[rstest]
    #[case("install numpy", "install numpy 0")]
    #[case("-v install numpy", "install numpy 1")]
    #[case("-vv install numpy", "install numpy 2")]
    #[case("install -- numpy", "install numpy 0")]
    #[case("echo", "")]
    #[case("echo a -b -- -c", "-b,a,-c")]
    #[case("echo echo", "echo")]
    fn execute(#[case] input: &str, #[case] expected: &str) {
        // Setup
        let (registry, interface) = registry(false);

        // Execute
        let result = registry.execute(input).unwrap();

        // Verify
        assert_eq!(result, expected);
        assert_eq!(interface.consume(), (None, None));
    }

    #[rstest]
    #[case("", "default None false")]
    #[case("-q", "default None true")]
    #[case("numpy", "default Some(\"numpy\") false")]
    #[case("-q -- x", "default Some(\"x\") true")]
    #[case("install numpy", "install numpy 0")]
    fn execute_default(#[case] input: &str, #[case] expected: &str) {
        let (registry, _) = registry(true);
        assert_eq!(registry.execute(input).unwrap(), expected);
    }

    #[rstest]
    #[case(vec![], ParseError::NoAction)]
    #[case(vec!["-v"], ParseError::NoAction)]
    #[case(vec!["", "install"], ParseError::NoAction)]
    #[case(vec!["remove"], ParseError::UnknownAction("remove".to_string()))]
    #[case(vec!["-v", "remove", "install"], ParseError::UnknownAction("remove".to_string()))]
    #[case(vec!["install"], ParseError::MissingArgument("package".to_string()))]
    #[case(vec!["install", "a", "b"], ParseError::TooManyArguments(tokens(&["b"])))]
    #[case(vec!["install", "-t", "a"], ParseError::TooManyArguments(tokens(&["-t"])))]
    #[case(vec!["-t", "--", "install"], ParseError::TooManyArguments(tokens(&["-t"])))]
    #[case(vec!["install", "--verbose=1", "a"], ParseError::UnexpectedOptionValue("--verbose".to_string()))]
    fn execute_error(#[case] input: Vec<&str>, #[case] expected: ParseError) {
        let (registry, _) = registry(false);
        assert_eq!(registry.execute(input).unwrap_err(), expected);
    }

    #[test]
    fn execute_default_too_many() {
        let (registry, _) = registry(true);
        assert_matches!(
            registry.execute("a b"),
            Err(ParseError::TooManyArguments(leftover)) if leftover == tokens(&["b"])
        );
    }

    #[test]
    fn run_tokens() {
        // Setup
        let (registry, interface) = registry(false);

        // Execute
        let result = registry.run_tokens("install numpy");

        // Verify
        assert_eq!(result, Ok("install numpy 0".to_string()));
        assert_eq!(interface.consume(), (None, None));
    }

    #[test]
    fn run_tokens_error() {
        // Setup
        let (registry, interface) = registry(false);

        // Execute
        let result = registry.run_tokens("install a b");

        // Verify
        assert_eq!(result, Err(1));
        let (message, error) = interface.consume();
        assert_eq!(message, None);
        assert_eq!(error.unwrap(), "Parse error: too many arguments: b.");
    }

    #[rstest]
    #[case(vec![], "Parse error: no action specified.")]
    #[case(vec!["remove"], "Parse error: no such action 'remove'.")]
    fn run_tokens_usage(#[case] input: Vec<&str>, #[case] expected: &str) {
        // Setup
        let (registry, interface) = registry(false);

        // Execute
        let result = registry.run_tokens(input);

        // Verify
        assert_eq!(result, Err(1));
        let (message, error) = interface.consume();
        assert_eq!(error.unwrap(), expected);
        let message = message.unwrap();
        assert_contains!(message, "usage: program ACTION [...]");
        assert_contains!(message, "install");
        assert_contains!(message, "[-v] PACKAGE");
        assert_contains!(message, "echo");
    }

    #[test]
    fn usage() {
        let (registry, _) = registry(true);
        let usage = registry.usage();
        assert!(usage.starts_with("usage: program ACTION [...]"));
        assert_contains!(usage, "(default)");
        assert_contains!(usage, "[-q] [FIRST]");
    }

    #[test]
    fn execute_concurrent() {
        // Setup
        let (registry, _) = registry(false);

        // Execute
        let results: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let registry = &registry;
                    scope.spawn(move || {
                        registry
                            .execute(format!("install package{i} {}", "-v ".repeat(i)))
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        // Verify
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result, &format!("install package{i} {i}"));
        }
    }
}
