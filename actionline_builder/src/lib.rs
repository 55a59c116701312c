//! Builder module for `actionline`.
//! See the `actionline` crate root for full details.
#![deny(missing_docs)]
mod api;
mod matcher;
mod model;
mod parser;

pub use api::*;
pub use model::*;
pub use parser::{ActionRegistry, CommandInput, ConfigError, ParseError};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
