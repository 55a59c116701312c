use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Object safe view over a mapped value, keeping its `Debug` rendering available after erasure.
trait ErasedValue: Any + std::fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T> ErasedValue for T
where
    T: Any + std::fmt::Debug + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A type-erased value produced by a [`Mapper`](crate::Mapper) or an option's accumulation.
///
/// Cloning a `Value` is cheap; the underlying value is shared.
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn ErasedValue>,
    type_name: &'static str,
}

impl Value {
    /// Wrap a concrete value.
    pub fn new<T>(value: T) -> Self
    where
        T: Any + std::fmt::Debug + Send + Sync,
    {
        Self {
            inner: Arc::new(value),
            type_name: readable_type_name::<T>(),
        }
    }

    /// Borrow the value as `T`, if that is what it holds.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.erased().downcast_ref::<T>()
    }

    /// Whether the value holds a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.erased().is::<T>()
    }

    // Dispatch through the trait object, not the blanket impl on the `Arc` itself.
    fn erased(&self) -> &dyn Any {
        (*self.inner).as_any()
    }

    /// The name of the held type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.inner)
    }
}

/// The values bound for a single action invocation.
///
/// Options are keyed by their parameter name; positionals keep their declaration order.
/// Options that never occurred on the Cli are absent: defaults are the action body's concern.
///
/// ### Example
/// ```
/// # use actionline_builder as actionline;
/// use actionline::{ActionSpec, Mapper, OptionSpec, Parameter};
///
/// let spec = ActionSpec::new()
///     .add(Parameter::argument("target", Mapper::identity()))
///     .add(Parameter::option("verbose", OptionSpec::count("v", "verbose").unwrap()));
/// let arguments = spec.parse(&["-vv", "release"]).unwrap();
///
/// assert_eq!(arguments.count("verbose"), 2);
/// assert_eq!(arguments.argument::<String>("target").unwrap(), "release");
/// assert!(arguments.rest().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    options: BTreeMap<String, Value>,
    positionals: Vec<(String, Value)>,
    rest: Vec<String>,
}

impl Arguments {
    pub(crate) fn new(
        options: BTreeMap<String, Value>,
        positionals: Vec<(String, Value)>,
        rest: Vec<String>,
    ) -> Self {
        Self {
            options,
            positionals,
            rest,
        }
    }

    /// The bound value of option `name`, if it occurred and holds a `T`.
    pub fn option<T: Any>(&self, name: &str) -> Option<&T> {
        self.options.get(name).and_then(|value| value.downcast_ref())
    }

    /// Whether the flag option `name` occurred.
    pub fn flag(&self, name: &str) -> bool {
        self.option::<bool>(name).copied().unwrap_or(false)
    }

    /// The number of occurrences of the counter option `name` (`0` when absent).
    pub fn count(&self, name: &str) -> usize {
        self.option::<usize>(name).copied().unwrap_or(0)
    }

    /// The bound value of positional argument `name`, if it was supplied and holds a `T`.
    pub fn argument<T: Any>(&self, name: &str) -> Option<&T> {
        self.positionals
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, value)| value.downcast_ref())
    }

    /// The bound value of the positional argument at `index`, if it was supplied and holds a `T`.
    pub fn argument_at<T: Any>(&self, index: usize) -> Option<&T> {
        self.positionals
            .get(index)
            .and_then(|(_, value)| value.downcast_ref())
    }

    /// Whether an option or positional argument called `name` was bound.
    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name) || self.positionals.iter().any(|(n, _)| n == name)
    }

    /// The bound options, keyed by parameter name.
    pub fn options(&self) -> &BTreeMap<String, Value> {
        &self.options
    }

    /// The bound positional arguments, in declaration order.
    pub fn positionals(&self) -> &[(String, Value)] {
        &self.positionals
    }

    /// The unconsumed trailing tokens.
    /// Only ever non-empty for a variadic action once dispatched.
    pub fn rest(&self) -> &[String] {
        &self.rest
    }
}

/// The type name of `T` without its module path (`alloc::string::String` reads as `String`).
/// Generic types keep their full name.
pub(crate) fn readable_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();

    if full.contains('<') {
        full
    } else {
        full.rsplit("::").next().unwrap_or(full)
    }
}
