use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::model::{readable_type_name, Value};

type MapFn = dyn Fn(&str) -> Result<Value, InvalidConversion> + Send + Sync;

/// Maps a raw Cli token to a typed [`Value`].
///
/// Mappers are used for positional arguments and for the values of key options.
/// They are cheap to clone and may be shared across threads.
///
/// ### Example
/// ```
/// # use actionline_builder as actionline;
/// use actionline::Mapper;
///
/// let mapper = Mapper::parse::<u32>();
/// assert_eq!(mapper.map("32").unwrap().downcast_ref::<u32>(), Some(&32));
/// assert!(mapper.map("thirty-two").is_err());
/// ```
#[derive(Clone)]
pub struct Mapper {
    type_name: &'static str,
    map: Arc<MapFn>,
}

impl Mapper {
    /// A mapper that keeps the token as a `String`.
    pub fn identity() -> Self {
        Self::parse::<String>()
    }

    /// A mapper driven by [`std::str::FromStr`] for `T`.
    pub fn parse<T>() -> Self
    where
        T: FromStr + std::fmt::Debug + Send + Sync + 'static,
    {
        let type_name = readable_type_name::<T>();
        Self {
            type_name,
            map: Arc::new(move |token: &str| {
                T::from_str(token)
                    .map(Value::new)
                    .map_err(|_| InvalidConversion::InvalidConversion {
                        token: token.to_string(),
                        type_name,
                    })
            }),
        }
    }

    /// A mapper driven by an arbitrary function.
    /// When the function rejects a token, its error message is carried into [`InvalidConversion::Rejected`].
    ///
    /// ### Example
    /// ```
    /// # use actionline_builder as actionline;
    /// use actionline::Mapper;
    ///
    /// let even = Mapper::from_fn(|token| match token.parse::<u32>() {
    ///     Ok(n) if n % 2 == 0 => Ok(n),
    ///     _ => Err("not an even number"),
    /// });
    /// assert_eq!(even.map("4").unwrap().downcast_ref::<u32>(), Some(&4));
    /// assert!(even.map("3").is_err());
    /// ```
    pub fn from_fn<T, E, F>(function: F) -> Self
    where
        T: std::fmt::Debug + Send + Sync + 'static,
        E: std::fmt::Display,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        Self {
            type_name: readable_type_name::<T>(),
            map: Arc::new(move |token: &str| {
                function(token)
                    .map(Value::new)
                    .map_err(|error| InvalidConversion::Rejected {
                        token: token.to_string(),
                        message: error.to_string(),
                    })
            }),
        }
    }

    /// Map the `token`.
    pub fn map(&self, token: &str) -> Result<Value, InvalidConversion> {
        (self.map)(token)
    }

    /// The name of the type this mapper produces.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Debug for Mapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mapper[{}]", self.type_name)
    }
}

/// The ways a [`Mapper`] may reject a token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidConversion {
    /// The token does not parse as the target type.
    #[error("'{token}' cannot convert to {type_name}.")]
    InvalidConversion {
        /// The offending token.
        token: String,
        /// The target type.
        type_name: &'static str,
    },
    /// A custom mapping function refused the token.
    #[error("'{token}' is rejected: {message}.")]
    Rejected {
        /// The offending token.
        token: String,
        /// The reason given by the mapping function.
        message: String,
    },
}
