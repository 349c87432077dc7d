// We need to refer to these types in the documentation
#[allow(unused_imports)]
use crate::{Number, Rational};
use crate::number::Kind;

/// Problems when constructing, converting, parsing or doing arithmetic with
/// a [`Rational`] or any other [`Number`]
///
/// Out of range floating point conversion is not a Problem: it is only
/// logged as a warning and the result saturates.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Problem {
    /// Tried to divide by Zero, also arises if attempting to make a fraction with a zero
    /// denominator or raising zero to a negative power
    #[error("divided by 0")]
    DivideByZero,
    /// A value of one kind can't be coerced into the other kind
    #[error("{from} can't be coerced into {to}")]
    TypeError { from: Kind, to: Kind },
    /// The operation isn't defined for values of this kind
    #[error("undefined operation {operation} for {kind}")]
    Unsupported { operation: &'static str, kind: Kind },
    /// The text was not a valid rational literal
    #[error("invalid value for convert(): {0:?}")]
    InvalidLiteral(String),
    /// A rounding precision must be an integer
    #[error("rounding precision is not an integer")]
    PrecisionNotInteger,
    /// The integer exponent was too large to compute
    #[error("exponent is too large")]
    ExponentTooLarge,
    /// The integer was outside the range for the chosen type
    #[error("integer out of range")]
    OutOfRange,
    /// The rational was not an integer
    #[error("rational is not an integer")]
    NotAnInteger,
    /// Tried to convert a floating point NaN, which has no equivalent
    #[error("can't convert NaN into Rational")]
    NotANumber,
    /// Tried to convert a floating point Infinity which has no equivalent
    #[error("can't convert Infinity into Rational")]
    Infinity,
}
