use crate::Problem;
use num::bigint::Sign::{self, *};
use num::{BigInt, BigUint};
use num::{One, Zero};
use std::sync::LazyLock;

mod arith;
mod compare;
mod convert;
mod parse;
mod round;

pub use parse::Parsed;
pub use round::RoundingMode;

/// Ratio of two integers in canonical form
///
/// This type is functionally a [`Sign`] with a ratio between two [`BigUint`]
/// (the numerator and denominator). A Rational is always canonical: the
/// denominator is positive and shares no factor with the numerator, and
/// zero is always `0/1`. Values are never mutated, every operation makes a
/// new one.
///
/// The "ordinary" floating point numbers are rationals, but when converted
/// the exact rational may not be what you intuitively expected. It's obvious
/// that one third isn't represented exactly as an f64, but not everybody
/// will realise that 0.3 isn't either.
///
/// # Examples
///
/// Parsing a rational from a simple fraction
/// ```
/// use rationalist::Rational;
/// let half: Rational = "9/18".parse().unwrap();
/// assert_eq!(half.to_string(), "1/2");
/// ```
///
/// Parsing a decimal fraction
/// ```
/// use rationalist::Rational;
/// let point_two_five: Rational = "0.25".parse().unwrap();
/// assert_eq!(point_two_five, Rational::fraction(1, 4).unwrap());
/// ```
///
/// Converting a 64-bit floating point number
/// ```
/// use rationalist::Rational;
/// let r: Rational = 0.3_f64.try_into().unwrap();
/// assert!(r != Rational::fraction(3, 10).unwrap());
/// ```
///
/// Simple arithmetic
/// ```
/// use rationalist::Rational;
/// let quarter = Rational::fraction(1, 4).unwrap();
/// let eighteen = Rational::new(18);
/// let two = Rational::one() + Rational::one();
/// let sixteen = eighteen - two;
/// let four = quarter * sixteen;
/// assert_eq!(four, Rational::new(4));
/// ```
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "(BigInt, BigInt)", into = "(BigInt, BigInt)")]
pub struct Rational {
    sign: Sign,
    numerator: BigUint,
    denominator: BigUint,
}

static ONE: LazyLock<BigUint> = LazyLock::new(BigUint::one);
static TEN: LazyLock<BigUint> = LazyLock::new(|| BigUint::from(10_u32));

impl Rational {
    /// Zero, the additive identity
    pub fn zero() -> Self {
        Self {
            sign: NoSign,
            numerator: BigUint::ZERO,
            denominator: BigUint::one(),
        }
    }

    /// One, the multiplicative identity
    pub fn one() -> Self {
        Self {
            sign: Plus,
            numerator: BigUint::one(),
            denominator: BigUint::one(),
        }
    }

    /// The Rational corresponding to the provided [`i64`]
    pub fn new(n: i64) -> Self {
        Self::from_bigint(BigInt::from(n))
    }

    /// The Rational corresponding to the provided [`BigInt`], over one
    pub fn from_bigint(n: BigInt) -> Self {
        let (sign, numerator) = n.into_parts();
        Self::raw(sign, numerator, BigUint::one())
    }

    /// The Rational `n/d` for machine integers
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::{Problem, Rational};
    /// let r = Rational::fraction(6, -4).unwrap();
    /// assert_eq!(r.to_string(), "-3/2");
    /// assert_eq!(Rational::fraction(1, 0), Err(Problem::DivideByZero));
    /// ```
    pub fn fraction(n: i64, d: i64) -> Result<Self, Problem> {
        Self::from_bigints(BigInt::from(n), BigInt::from(d))
    }

    /// Canonicalize the fraction `n/d`
    ///
    /// A negative denominator moves its sign onto the numerator, then both
    /// are divided by their greatest common divisor.
    pub fn from_bigints(n: BigInt, d: BigInt) -> Result<Self, Problem> {
        let (dsign, denominator) = d.into_parts();
        if dsign == NoSign {
            return Err(Problem::DivideByZero);
        }
        let (nsign, numerator) = n.into_parts();
        let sign = if dsign == Minus { -nsign } else { nsign };
        Ok(Self::reduce(sign, numerator, denominator))
    }

    fn reduce(sign: Sign, numerator: BigUint, denominator: BigUint) -> Self {
        if sign == NoSign {
            return Self::zero();
        }
        if denominator == *ONE {
            return Self::raw(sign, numerator, denominator);
        }
        let divisor = num::Integer::gcd(&numerator, &denominator);
        if divisor == *ONE {
            Self::raw(sign, numerator, denominator)
        } else {
            Self::raw(sign, numerator / &divisor, denominator / &divisor)
        }
    }

    // Callers guarantee a reduced pair with a non-zero denominator
    fn raw(sign: Sign, numerator: BigUint, denominator: BigUint) -> Self {
        debug_assert!(!denominator.is_zero());
        let sign = if numerator.is_zero() { NoSign } else { sign };
        Self {
            sign,
            numerator,
            denominator,
        }
    }

    /// The numerator, carrying the sign of this value
    pub fn numerator(&self) -> BigInt {
        BigInt::from_biguint(self.sign, self.numerator.clone())
    }

    /// The denominator, always positive
    pub fn denominator(&self) -> &BigUint {
        &self.denominator
    }

    /// The [`Sign`] of this value
    pub fn sign(&self) -> Sign {
        self.sign
    }

    /// -1, 0 or 1 according to the sign of this value
    pub fn signum(&self) -> i32 {
        match self.sign {
            Minus => -1,
            NoSign => 0,
            Plus => 1,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.sign == NoSign
    }

    pub fn is_negative(&self) -> bool {
        self.sign == Minus
    }

    pub fn is_positive(&self) -> bool {
        self.sign == Plus
    }

    /// Checks if the value is an integer
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::Rational;
    /// assert!(Rational::new(5).is_integer());
    /// assert!(Rational::fraction(16, 4).unwrap().is_integer());
    /// assert!(!Rational::fraction(5, 4).unwrap().is_integer());
    /// ```
    pub fn is_integer(&self) -> bool {
        self.denominator == *ONE
    }

    /// Either the corresponding [`BigInt`] or None if this value is not an integer
    pub fn to_integer(&self) -> Option<BigInt> {
        self.is_integer().then(|| self.numerator())
    }

    /// The inverse of this Rational, zero has none
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::Rational;
    /// let five = Rational::new(5);
    /// let a_fifth = Rational::fraction(1, 5).unwrap();
    /// assert_eq!(five.checked_inverse().unwrap(), a_fifth);
    /// assert_eq!(a_fifth.checked_inverse().unwrap(), five);
    /// assert!(Rational::zero().checked_inverse().is_err());
    /// ```
    pub fn checked_inverse(&self) -> Result<Self, Problem> {
        if self.is_zero() {
            return Err(Problem::DivideByZero);
        }
        Ok(Self::raw(
            self.sign,
            self.denominator.clone(),
            self.numerator.clone(),
        ))
    }

    /// The fractional part of this Rational
    ///
    /// If the rational was negative, this fraction will also be negative
    ///
    /// # Examples
    ///
    /// ```
    /// use rationalist::Rational;
    /// let approx_pi = Rational::fraction(22, 7).unwrap();
    /// let a_seventh = Rational::fraction(1, 7).unwrap();
    /// assert_eq!(approx_pi.fract(), a_seventh);
    /// ```
    ///
    /// ```
    /// use rationalist::Rational;
    /// let backward = Rational::fraction(-53, 9).unwrap();
    /// let fract = Rational::fraction(-8, 9).unwrap();
    /// assert_eq!(backward.fract(), fract);
    /// ```
    pub fn fract(&self) -> Self {
        if self.is_integer() {
            return Self::zero();
        }
        let n = &self.numerator % &self.denominator;
        Self::raw(self.sign, n, self.denominator.clone())
    }

    /// The `(N/D)` form used when inspecting a value
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::Rational;
    /// let r = Rational::fraction(-3, 6).unwrap();
    /// assert_eq!(r.inspect(), "(-1/2)");
    /// ```
    pub fn inspect(&self) -> String {
        format!("({self})")
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Rational {
        Rational::new(n)
    }
}

impl From<BigInt> for Rational {
    fn from(n: BigInt) -> Rational {
        Rational::from_bigint(n)
    }
}

impl From<Rational> for (BigInt, BigInt) {
    fn from(r: Rational) -> (BigInt, BigInt) {
        let denominator = BigInt::from(r.denominator);
        (BigInt::from_biguint(r.sign, r.numerator), denominator)
    }
}

/// A serialized pair is trusted to be reduced, but its denominator
/// may be negative
impl TryFrom<(BigInt, BigInt)> for Rational {
    type Error = Problem;

    fn try_from((n, d): (BigInt, BigInt)) -> Result<Rational, Problem> {
        let (dsign, denominator) = d.into_parts();
        let (nsign, numerator) = n.into_parts();
        match dsign {
            NoSign => Err(Problem::DivideByZero),
            Minus => Ok(Rational::raw(-nsign, numerator, denominator)),
            Plus => Ok(Rational::raw(nsign, numerator, denominator)),
        }
    }
}

use core::fmt;

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sign == Minus {
            f.write_str("-")?;
        } else if f.sign_plus() {
            f.write_str("+")?;
        }
        if f.alternate() {
            let whole = &self.numerator / &self.denominator;
            write!(f, "{whole}")?;
            let mut digits = f.precision().unwrap_or(1000);
            if digits == 0 {
                return Ok(());
            }
            f.write_str(".")?;
            let round = &whole * &self.denominator;
            let mut left = &self.numerator - &round;
            loop {
                left *= &*TEN;
                let digit = &left / &self.denominator;
                write!(f, "{digit}")?;
                left -= digit * &self.denominator;
                digits -= 1;
                if left.is_zero() || digits == 0 {
                    break;
                }
            }
            Ok(())
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let many: Rational = "12345".parse().unwrap();
        assert_eq!(format!("{many}"), "12345/1");
        let five: Rational = "5".parse().unwrap();
        let third: Rational = "1/3".parse().unwrap();
        assert_eq!(format!("{}", five * third), "5/3");
        let minus: Rational = "-7/4".parse().unwrap();
        assert_eq!(format!("{minus}"), "-7/4");
        assert_eq!(format!("{:?}", minus), "(-7/4)");
    }

    #[test]
    fn decimal_display() {
        let eighth = Rational::fraction(-1, 8).unwrap();
        assert_eq!(format!("{eighth:#}"), "-0.125");
        let third = Rational::fraction(1, 3).unwrap();
        assert_eq!(format!("{third:#.5}"), "0.33333");
        assert_eq!(format!("{:#}", Rational::new(3)), "3.0");
    }

    #[test]
    fn decimal_without_places() {
        let third = Rational::fraction(1, 3).unwrap();
        assert_eq!(format!("{third:#.0}"), "0");
        let minus = Rational::fraction(-7, 4).unwrap();
        assert_eq!(format!("{minus:#.0}"), "-1");
        assert_eq!(format!("{minus:#.1}"), "-1.7");
        assert_eq!(format!("{:#.0}", crate::Number::Rational(minus)), "-1");
    }

    #[test]
    fn canonical() {
        let r = Rational::fraction(6, -4).unwrap();
        assert_eq!(r.numerator(), BigInt::from(-3));
        assert_eq!(*r.denominator(), BigUint::from(2_u32));
        let zero = Rational::fraction(0, -17).unwrap();
        assert_eq!(zero, Rational::zero());
        assert_eq!(*zero.denominator(), BigUint::one());
        assert_eq!(zero.sign(), NoSign);
    }

    #[test]
    fn reduced_matches_divided() {
        for (n, d) in [(12, 18), (-100, 75), (7, 13), (1 << 40, 1 << 20), (-9, -27)] {
            let g = num::Integer::gcd(&n, &d);
            let reduced = Rational::fraction(n, d).unwrap();
            let divided = Rational::fraction(n / g, d / g).unwrap();
            assert_eq!(reduced, divided);
            let gcd = num::Integer::gcd(&reduced.numerator(), &BigInt::from(reduced.denominator().clone()));
            assert!(gcd.is_one());
        }
    }

    #[test]
    fn divide_by_zero() {
        let err = Rational::fraction(1, 0).unwrap_err();
        assert_eq!(err, Problem::DivideByZero);
        let err = Rational::from_bigints(BigInt::from(0), BigInt::from(0)).unwrap_err();
        assert_eq!(err, Problem::DivideByZero);
    }

    #[test]
    fn fract() {
        let seventy_ninths = Rational::fraction(70, 9).unwrap();
        assert_eq!(seventy_ninths.fract(), Rational::fraction(7, 9).unwrap());
        assert_eq!(
            (-seventy_ninths).fract(),
            Rational::fraction(-7, 9).unwrap()
        );
        let six = Rational::new(6);
        assert_eq!(six.fract(), Rational::zero());
    }

    #[test]
    fn serialized_pair() {
        let r = Rational::fraction(-22, 7).unwrap();
        let text = serde_json::to_string(&r).unwrap();
        let back: Rational = serde_json::from_str(&text).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn load_negative_denominator() {
        let pair = (BigInt::from(3), BigInt::from(-4));
        let text = serde_json::to_string(&pair).unwrap();
        let r: Rational = serde_json::from_str(&text).unwrap();
        assert_eq!(r, Rational::fraction(-3, 4).unwrap());
        let pair = (BigInt::from(3), BigInt::from(0));
        let text = serde_json::to_string(&pair).unwrap();
        assert!(serde_json::from_str::<Rational>(&text).is_err());
    }

    #[test]
    fn inverse() {
        let minus_two = Rational::new(-2);
        let minus_half = Rational::fraction(-1, 2).unwrap();
        assert_eq!(minus_two.checked_inverse().unwrap(), minus_half);
    }
}
