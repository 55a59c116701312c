mod capture;
mod core;
mod option;
mod parameter;

pub use self::core::*;
pub use capture::*;
pub use option::*;
pub use parameter::*;
