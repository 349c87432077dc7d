use crate::{Number, Problem, Rational};
use num::BigInt;

/// How values are canonicalized when they enter the numeric tower
///
/// The default is the legacy behaviour: a rational whose denominator
/// reduces to one stays a [`Rational`].
///
/// # Example
///
/// ```
/// use rationalist::{Config, Number, Rational};
/// let legacy = Config::default();
/// let demoting = Config::demoting();
/// let four = Rational::new(4);
/// assert!(matches!(legacy.finish(four.clone()), Number::Rational(_)));
/// assert!(matches!(demoting.finish(four), Number::Integer(_)));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Integral results collapse to [`Number::Integer`]
    pub auto_demote_integral: bool,
}

impl Config {
    /// A configuration which demotes integral results to integers
    pub fn demoting() -> Self {
        Self {
            auto_demote_integral: true,
        }
    }

    /// Canonicalize `num/den` and finish it into the numeric tower
    pub fn canonicalize(&self, num: BigInt, den: BigInt) -> Result<Number, Problem> {
        Ok(self.finish(Rational::from_bigints(num, den)?))
    }

    /// Wrap an already canonical value, demoting it if configured to
    pub fn finish(&self, r: Rational) -> Number {
        if self.auto_demote_integral && r.is_integer() {
            Number::Integer(r.numerator())
        } else {
            Number::Rational(r)
        }
    }
}

/// Whether a failed conversion is reported or quietly becomes `None`
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RaisePolicy {
    /// Propagate the [`Problem`]
    #[default]
    Raise,
    /// Return `None` instead of failing
    Quiet,
}

impl RaisePolicy {
    /// Apply this policy to the outcome of a conversion
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::{Problem, RaisePolicy};
    /// let failed: Result<u8, Problem> = Err(Problem::DivideByZero);
    /// assert_eq!(RaisePolicy::Quiet.apply(failed.clone()), Ok(None));
    /// assert_eq!(RaisePolicy::Raise.apply(failed), Err(Problem::DivideByZero));
    /// ```
    pub fn apply<T>(self, outcome: Result<T, Problem>) -> Result<Option<T>, Problem> {
        match (self, outcome) {
            (_, Ok(value)) => Ok(Some(value)),
            (RaisePolicy::Raise, Err(problem)) => Err(problem),
            (RaisePolicy::Quiet, Err(_)) => Ok(None),
        }
    }
}
