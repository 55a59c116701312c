mod option;
mod positional;
mod token;

pub(crate) use option::*;
pub(crate) use positional::*;
