mod problem;
pub use crate::problem::Problem;

mod config;
pub use crate::config::{Config, RaisePolicy};

mod rational;
pub use crate::rational::{Parsed, Rational, RoundingMode};

mod number;
pub use crate::number::{Kind, Number};
