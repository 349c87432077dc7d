use crate::{Number, Problem, Rational};
use num::{BigInt, BigUint, Integer, ToPrimitive, Zero};

/// How a value between two integers picks one of them
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Nearest, ties away from zero
    #[default]
    HalfUp,
    /// Nearest, ties to the even neighbour
    HalfEven,
    /// Nearest, ties toward zero
    HalfDown,
    /// Toward negative infinity
    Floor,
    /// Toward positive infinity
    Ceiling,
    /// The value must already be an integer
    Unnecessary,
}

use RoundingMode::*;

impl Rational {
    /// Round to an integer
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::{Rational, RoundingMode};
    /// use num::BigInt;
    /// let seven_halves = Rational::fraction(7, 2).unwrap();
    /// let five_halves = Rational::fraction(5, 2).unwrap();
    /// assert_eq!(seven_halves.round(RoundingMode::HalfEven).unwrap(), BigInt::from(4));
    /// assert_eq!(five_halves.round(RoundingMode::HalfEven).unwrap(), BigInt::from(2));
    /// assert_eq!(five_halves.round(RoundingMode::HalfUp).unwrap(), BigInt::from(3));
    /// assert!(five_halves.round(RoundingMode::Unnecessary).is_err());
    /// ```
    pub fn round(&self, mode: RoundingMode) -> Result<BigInt, Problem> {
        match mode {
            HalfUp | HalfEven | HalfDown => Ok(self.round_half(mode)),
            Floor => Ok(self.floor()),
            Ceiling => Ok(self.ceil()),
            Unnecessary => self.to_integer().ok_or(Problem::NotAnInteger),
        }
    }

    // Rounds the magnitude as (2n + d) / 2d, then restores the sign
    fn round_half(&self, mode: RoundingMode) -> BigInt {
        let twice_den: BigUint = &self.denominator << 1;
        let mut twice: BigUint = (&self.numerator << 1) + &self.denominator;
        let quotient = match mode {
            HalfDown => {
                twice -= 1_u32;
                twice / &twice_den
            }
            HalfEven => {
                let (mut q, r) = twice.div_rem(&twice_den);
                if r.is_zero() && q.is_odd() {
                    q -= 1_u32;
                }
                q
            }
            _ => twice / &twice_den,
        };
        BigInt::from_biguint(self.sign, quotient)
    }

    // Scale by 10^digits, round with `f`, and scale back
    fn round_scaled<F>(&self, digits: i64, f: F) -> Result<Number, Problem>
    where
        F: Fn(&Rational) -> Result<BigInt, Problem>,
    {
        let magnitude = u32::try_from(digits.unsigned_abs()).map_err(|_| Problem::ExponentTooLarge)?;
        let scale = Rational::from_bigint(BigInt::from(10).pow(magnitude));
        let scale = if digits < 0 {
            scale.checked_inverse()?
        } else {
            scale
        };
        let whole = f(&(self * &scale))?;
        let answer = Rational::from_bigint(whole).checked_div(&scale)?;
        if digits < 1 {
            Ok(Number::Integer(answer.trunc()))
        } else {
            Ok(Number::Rational(answer))
        }
    }

    /// Round to `digits` decimal places
    ///
    /// With `digits <= 0` the answer is an integer, rounded to a multiple
    /// of `10^-digits`, otherwise it is a Rational.
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::{Number, Rational, RoundingMode};
    /// let r = Rational::fraction(31, 8).unwrap();
    /// let rounded = r.round_to(2, RoundingMode::HalfUp).unwrap();
    /// assert_eq!(rounded, Number::Rational(Rational::fraction(97, 25).unwrap()));
    /// let big = Rational::new(1234);
    /// let hundreds = big.round_to(-2, RoundingMode::HalfUp).unwrap();
    /// assert_eq!(hundreds, Number::Integer(1200.into()));
    /// ```
    pub fn round_to(&self, digits: i64, mode: RoundingMode) -> Result<Number, Problem> {
        self.round_scaled(digits, |r| r.round(mode))
    }

    pub fn floor_to(&self, digits: i64) -> Result<Number, Problem> {
        self.round_to(digits, Floor)
    }

    pub fn ceil_to(&self, digits: i64) -> Result<Number, Problem> {
        self.round_to(digits, Ceiling)
    }

    /// Truncate toward zero at `digits` decimal places
    pub fn truncate_to(&self, digits: i64) -> Result<Number, Problem> {
        self.round_scaled(digits, |r| Ok(r.trunc()))
    }

    /// Round with an optional precision taken from the numeric tower
    ///
    /// Without a precision this rounds to an integer. A precision must be an
    /// integer.
    pub fn round_with(&self, digits: Option<&Number>, mode: RoundingMode) -> Result<Number, Problem> {
        match digits {
            None => Ok(Number::Integer(self.round(mode)?)),
            Some(Number::Integer(n)) => {
                let digits = n.to_i64().ok_or(Problem::ExponentTooLarge)?;
                self.round_to(digits, mode)
            }
            Some(_) => Err(Problem::PrecisionNotInteger),
        }
    }
}
