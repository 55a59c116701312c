use crate::api::capture::Mapper;
use crate::model::Value;
use crate::parser::{ConfigError, ParseError};

/// The accumulation behaviour of an option.
#[derive(Debug, Clone)]
pub enum OptionKind {
    /// Like `-q`, `--quiet`: takes no value, binds `true` (as `bool`).
    Flag,
    /// Like `-v`, `--verbose`: takes no value, binds the number of occurrences (as `usize`).
    Count,
    /// Like `-c32`, `--count=32`: takes a value, mapped once and specified at most once.
    Key(Mapper),
}

/// A declared option: its names and how its occurrences accumulate.
///
/// At least one of the short or long forms is set.
/// When only one name is given and it is longer than one character, it is treated as the long form.
///
/// ### Example
/// ```
/// # use actionline_builder as actionline;
/// use actionline::{Mapper, OptionSpec};
///
/// let count = OptionSpec::key("c", "count", Mapper::parse::<u32>()).unwrap();
/// assert_eq!(count.short(), Some('c'));
/// assert_eq!(count.long(), Some("count"));
///
/// // A lone multi-character name is a long form.
/// let long = OptionSpec::flag("quiet", None).unwrap();
/// assert_eq!(long.short(), None);
/// assert_eq!(long.long(), Some("quiet"));
///
/// // But a multi-character short form is malformed.
/// assert!(OptionSpec::flag("qq", "quiet").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct OptionSpec {
    short: Option<char>,
    long: Option<String>,
    kind: OptionKind,
}

impl OptionSpec {
    /// Create an option of the given `kind`.
    /// Empty names count as absent.
    pub fn new<'n>(
        kind: OptionKind,
        short: impl Into<Option<&'n str>>,
        long: impl Into<Option<&'n str>>,
    ) -> Result<Self, ConfigError> {
        let mut short = short.into().filter(|s| !s.is_empty());
        let mut long = long.into().filter(|l| !l.is_empty());

        if long.is_none() {
            if let Some(s) = short {
                if s.chars().count() > 1 {
                    long = Some(s);
                    short = None;
                }
            }
        }

        let short = match short {
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c != '-' => Some(c),
                    _ => return Err(ConfigError::MalformedShort(s.to_string())),
                }
            }
            None => None,
        };

        if let Some(l) = long {
            if l.starts_with('-') || l.contains('=') || l.contains(char::is_whitespace) {
                return Err(ConfigError::MalformedLong(l.to_string()));
            }
        }

        if short.is_none() && long.is_none() {
            return Err(ConfigError::MissingName);
        }

        Ok(Self {
            short,
            long: long.map(str::to_string),
            kind,
        })
    }

    /// Create a flag option: any occurrence binds `true`.
    pub fn flag<'n>(
        short: impl Into<Option<&'n str>>,
        long: impl Into<Option<&'n str>>,
    ) -> Result<Self, ConfigError> {
        Self::new(OptionKind::Flag, short, long)
    }

    /// Create a counter option: binds the number of occurrences.
    pub fn count<'n>(
        short: impl Into<Option<&'n str>>,
        long: impl Into<Option<&'n str>>,
    ) -> Result<Self, ConfigError> {
        Self::new(OptionKind::Count, short, long)
    }

    /// Create a key option: takes a value through `mapper`, and may be specified at most once.
    pub fn key<'n>(
        short: impl Into<Option<&'n str>>,
        long: impl Into<Option<&'n str>>,
        mapper: Mapper,
    ) -> Result<Self, ConfigError> {
        Self::new(OptionKind::Key(mapper), short, long)
    }

    /// Create an option whose names derive from the parameter `name`.
    /// The short form is the first character of `name`, and the long form is `name` with `_` replaced by `-`.
    ///
    /// ### Example
    /// ```
    /// # use actionline_builder as actionline;
    /// use actionline::{OptionKind, OptionSpec};
    ///
    /// let option = OptionSpec::derived("follow_symlinks", OptionKind::Flag).unwrap();
    /// assert_eq!(option.short(), Some('f'));
    /// assert_eq!(option.long(), Some("follow-symlinks"));
    /// ```
    pub fn derived(name: &str, kind: OptionKind) -> Result<Self, ConfigError> {
        let long = name.replace('_', "-");
        let short = name.chars().next().map(|c| c.to_string());
        Self::new(kind, short.as_deref(), long.as_str())
    }

    /// The short form (`-S`), if any.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// The long form (`--LONG`), if any.
    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// The accumulation behaviour.
    pub fn kind(&self) -> &OptionKind {
        &self.kind
    }

    /// Whether an occurrence of this option requires a value.
    pub fn takes_value(&self) -> bool {
        matches!(self.kind, OptionKind::Key(_))
    }

    /// The Cli rendering of this option, preferring the long form (ex: `--count` or `-c`).
    pub(crate) fn display_name(&self) -> String {
        match (&self.long, &self.short) {
            (Some(l), _) => format!("--{l}"),
            (None, Some(s)) => format!("-{s}"),
            (None, None) => unreachable!("internal error - an option must have a name"),
        }
    }

    /// Fold one occurrence of this option into its previously bound value.
    ///
    /// `old` is the value from the previous occurrence, if any.
    /// `raw` is the token value taken from the Cli; it is only present for key options.
    /// A key value is converted before the at-most-once rule is checked.
    pub fn accumulate(&self, old: Option<&Value>, raw: Option<&str>) -> Result<Value, ParseError> {
        match &self.kind {
            OptionKind::Flag => Ok(Value::new(true)),
            OptionKind::Count => {
                let previous = old.and_then(|v| v.downcast_ref::<usize>()).copied();
                Ok(Value::new(previous.unwrap_or(0) + 1))
            }
            OptionKind::Key(mapper) => {
                let value = match raw {
                    Some(raw) => mapper.map(raw)?,
                    None => return Err(ParseError::MissingOptionValue(self.display_name())),
                };

                if old.is_some() {
                    return Err(ParseError::DuplicateKey(self.display_name()));
                }

                Ok(value)
            }
        }
    }
}

impl std::fmt::Display for OptionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let class_name = match &self.kind {
            OptionKind::Flag => "Flag",
            OptionKind::Count => "Count",
            OptionKind::Key(_) => "Key",
        };
        let mut attributes = Vec::default();

        if let Some(s) = &self.short {
            attributes.push(format!("'{s}'"));
        }

        if let Some(l) = &self.long {
            attributes.push(format!("'{l}'"));
        }

        if let OptionKind::Key(mapper) = &self.kind {
            attributes.push(format!("type={}", mapper.type_name()));
        }

        write!(f, "{class_name}({})", attributes.join(", "))
    }
}
