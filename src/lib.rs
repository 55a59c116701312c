//! `actionline` is an action based command line parser and dispatcher for Rust.
//!
//! Many Cli programs are a collection of *actions* (ex: `git commit`, `cargo build`, `pip install`).
//! `actionline` is built around that paradigm:
//! * *Action paradigm*:
//! The user registers named actions, each with a declaration of what it accepts and a body to run.
//! The command line selects one action by name, or falls back to a default action.
//! * *Argument vs. option paradigm*:
//! Each action declares positional *arguments* and keyword *options*.
//! Arguments are bound positionally on the Cli, while options are specified via `--..` or `-..` syntax.
//! * *Type mapped argument parsing*:
//! Every argument and option value is converted by a [`Mapper`] (ex: `u32` via [`std::str::FromStr`]).
//! The user reads back typed values, without calling any `&str -> T` conversion functions directly.
//! * *Forgiving matching*:
//! Unknown options are never an error while matching; they are left over for the action to either accept (variadic actions) or reject.
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/greeter.rs")]
//! ```
//!
//! Which generates the following Cli program:
//! ```console
//! $ greeter hello world
//! Hello, world!
//!
//! $ greeter -s hello world
//! HELLO, WORLD!
//!
//! $ greeter
//! Nobody to greet.
//!
//! $ greeter hello world again
//! Parse error: too many arguments: again.
//! ```
//!
//! # Actions
//! Configure `actionline` by starting with a [`CommandLine`] and registering actions.
//! Each action is declared with an [`ActionSpec`], which in turn is made of [`Parameter`]s.
//! There are two classes of parameters: [`Parameter::argument`] (or [`Parameter::optional_argument`]) and [`Parameter::option`].
//!
//! The action is selected by the first token which does not start with a dash.
//! When that token names a registered action, it is removed from the tokens and the action runs against the rest.
//! Otherwise, the default action (if any) runs against all the tokens.
//!
//! # Options
//! Options come in three kinds (see [`OptionKind`]):
//! * Flags (ex: `-q`), which bind `true`.
//! * Counters (ex: `-vvv`), which bind the number of occurrences.
//! * Keys (ex: `-c 32`, `-c32`, `--count 32`, `--count=32`), which bind a mapped value, and may be specified at most once.
//!
//! Short options may be clustered (ex: `-vvc32`), and a bare `--` ends option matching: everything after it is positional.
//!
//! ```
//! use actionline::{ActionSpec, CommandLine, Mapper, OptionSpec, Parameter};
//!
//! let registry = CommandLine::new("program")
//!     .action(
//!         "run",
//!         ActionSpec::new()
//!             .add(Parameter::option("verbose", OptionSpec::count("v", None).unwrap()))
//!             .add(Parameter::option("count", OptionSpec::key("c", None, Mapper::parse::<u32>()).unwrap()))
//!             .variadic(),
//!         |arguments| {
//!             (
//!                 arguments.count("verbose"),
//!                 arguments.option::<u32>("count").copied(),
//!                 arguments.rest().to_vec(),
//!             )
//!         },
//!     )
//!     .build();
//!
//! let (verbose, count, rest) = registry.execute("run -vvvvvvc32 -- -v").unwrap();
//! assert_eq!(verbose, 6);
//! assert_eq!(count, Some(32));
//! assert_eq!(rest, vec!["-v".to_string()]);
//! ```
//!
//! # Logging
//! Enable the `tracing_debug` feature to emit [`tracing`](https://docs.rs/tracing) debug events while matching and dispatching.
pub use actionline_builder::*;
