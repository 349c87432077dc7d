use crate::{Problem, Rational};
use num::bigint::Sign::{self, *};
use num::{BigInt, BigUint, Integer, ToPrimitive};
use num::{One, Zero};

// Product of two machine words, None if it overflows
pub(super) fn imul(a: i64, b: i64) -> Option<i64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    if a == 1 {
        return Some(b);
    }
    if b == 1 {
        return Some(a);
    }
    a.checked_mul(b)
}

impl Rational {
    // Numerator and denominator as machine words, when both fit
    pub(super) fn small(&self) -> Option<(i64, i64)> {
        let n = self.numerator.to_i64()?;
        let d = self.denominator.to_i64()?;
        match self.sign {
            Minus => Some((-n, d)),
            _ => Some((n, d)),
        }
    }

    // Already reduced with d > 0
    fn from_small(n: i64, d: i64) -> Self {
        debug_assert!(d > 0);
        let sign = match n.signum() {
            -1 => Minus,
            0 => NoSign,
            _ => Plus,
        };
        Self::raw(
            sign,
            BigUint::from(n.unsigned_abs()),
            BigUint::from(d.unsigned_abs()),
        )
    }

    // Two stage gcd keeps the intermediates no larger than they need to be:
    // with g = gcd(ad, bd) and c = an*(bd/g) +/- bn*(ad/g), only gcd(c, g)
    // can still divide the result.
    fn add_sub(&self, other: &Self, plus: bool) -> Self {
        if let (Some((an, ad)), Some((bn, bd))) = (self.small(), other.small()) {
            if let Some(answer) = Self::add_sub_small(an, ad, bn, bd, plus) {
                return answer;
            }
        }
        let ad = &self.denominator;
        let bd = &other.denominator;
        let g = ad.gcd(bd);
        let a = self.numerator() * BigInt::from(bd / &g);
        let b = other.numerator() * BigInt::from(ad / &g);
        let c = if plus { a + b } else { a - b };
        let (sign, c) = c.into_parts();
        if sign == NoSign {
            return Self::zero();
        }
        let g2 = c.gcd(&g);
        let numerator = c / &g2;
        let denominator = (ad / &g) * (bd / &g2);
        Self::raw(sign, numerator, denominator)
    }

    fn add_sub_small(an: i64, ad: i64, bn: i64, bd: i64, plus: bool) -> Option<Self> {
        let g = ad.gcd(&bd);
        let a = imul(an, bd / g)?;
        let b = imul(bn, ad / g)?;
        let c = if plus {
            a.checked_add(b)?
        } else {
            a.checked_sub(b)?
        };
        if c == 0 {
            return Some(Self::zero());
        }
        let g2 = c.gcd(&g);
        let d = imul(ad / g, bd / g2)?;
        Some(Self::from_small(c / g2, d))
    }

    // Cross reduce before multiplying, so the product is already canonical
    fn times(&self, sign: Sign, numerator: &BigUint, denominator: &BigUint) -> Self {
        let sign = self.sign * sign;
        if sign == NoSign {
            return Self::zero();
        }
        if let (Some(an), Some(ad), Some(bn), Some(bd)) = (
            self.numerator.to_i64(),
            self.denominator.to_i64(),
            numerator.to_i64(),
            denominator.to_i64(),
        ) {
            let g1 = an.gcd(&bd);
            let g2 = ad.gcd(&bn);
            if let (Some(n), Some(d)) = (imul(an / g1, bn / g2), imul(ad / g2, bd / g1)) {
                let n = if sign == Minus { -n } else { n };
                return Self::from_small(n, d);
            }
        }
        let g1 = self.numerator.gcd(denominator);
        let g2 = self.denominator.gcd(numerator);
        let n = (&self.numerator / &g1) * (numerator / &g2);
        let d = (&self.denominator / &g2) * (denominator / &g1);
        Self::raw(sign, n, d)
    }

    /// Divide by another Rational, failing if it is zero
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::{Problem, Rational};
    /// let three = Rational::new(3);
    /// let six = Rational::new(6);
    /// assert_eq!(three.checked_div(&six), Rational::fraction(1, 2));
    /// assert_eq!(three.checked_div(&Rational::zero()), Err(Problem::DivideByZero));
    /// ```
    pub fn checked_div(&self, other: &Self) -> Result<Self, Problem> {
        if other.is_zero() {
            return Err(Problem::DivideByZero);
        }
        Ok(self.times(other.sign, &other.denominator, &other.numerator))
    }

    /// Integer exponentiation
    ///
    /// Zero to the power zero is one. Zero to a negative power fails.
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::Rational;
    /// let two_thirds = Rational::fraction(2, 3).unwrap();
    /// let cubed = two_thirds.powi(&(-3).into()).unwrap();
    /// assert_eq!(cubed, Rational::fraction(27, 8).unwrap());
    /// ```
    pub fn powi(&self, exp: &BigInt) -> Result<Self, Problem> {
        if exp.is_zero() {
            return Ok(Self::one());
        }
        if self.is_integer() {
            // Plus or minus one exactly
            if self.numerator.is_one() {
                if self.sign == Minus && exp.is_odd() {
                    return Ok(Self::new(-1));
                }
                return Ok(Self::one());
            }
            if self.is_zero() {
                if exp.sign() == Minus {
                    return Err(Problem::DivideByZero);
                }
                return Ok(Self::zero());
            }
        }
        let e = exp.magnitude().to_u32().ok_or(Problem::ExponentTooLarge)?;
        let sign = if self.sign == Minus && exp.is_odd() {
            Minus
        } else {
            Plus
        };
        let numerator = self.numerator.pow(e);
        let denominator = self.denominator.pow(e);
        match exp.sign() {
            Minus => Ok(Self::raw(sign, denominator, numerator)),
            _ => Ok(Self::raw(sign, numerator, denominator)),
        }
    }

    /// Floored quotient, the integer `floor(self / other)`
    pub fn idiv(&self, other: &Self) -> Result<BigInt, Problem> {
        Ok(self.checked_div(other)?.floor())
    }

    /// Floored modulo, `self - other * floor(self / other)`
    ///
    /// The result has the sign of `other`
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::Rational;
    /// let a = Rational::fraction(7, 2).unwrap();
    /// let b = Rational::new(-2);
    /// assert_eq!(a.modulo(&b).unwrap(), Rational::fraction(-1, 2).unwrap());
    /// assert_eq!(a.remainder(&b).unwrap(), Rational::fraction(3, 2).unwrap());
    /// ```
    pub fn modulo(&self, other: &Self) -> Result<Self, Problem> {
        Ok(self.divmod(other)?.1)
    }

    /// Truncated remainder, `self - other * truncate(self / other)`
    ///
    /// The result has the sign of `self`
    pub fn remainder(&self, other: &Self) -> Result<Self, Problem> {
        let q = self.checked_div(other)?.trunc();
        Ok(self - &(other * &Self::from_bigint(q)))
    }

    /// Both the floored quotient and the modulo
    pub fn divmod(&self, other: &Self) -> Result<(BigInt, Self), Problem> {
        let q = self.idiv(other)?;
        let m = self - &(other * &Self::from_bigint(q.clone()));
        Ok((q, m))
    }

    /// The absolute value
    pub fn abs(&self) -> Self {
        if self.sign == Minus {
            -self
        } else {
            self.clone()
        }
    }
}

use core::ops::*;

impl Add<&Rational> for &Rational {
    type Output = Rational;

    fn add(self, other: &Rational) -> Rational {
        self.add_sub(other, true)
    }
}

impl Add for Rational {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.add_sub(&other, true)
    }
}

impl Sub<&Rational> for &Rational {
    type Output = Rational;

    fn sub(self, other: &Rational) -> Rational {
        self.add_sub(other, false)
    }
}

impl Sub for Rational {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.add_sub(&other, false)
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            sign: -self.sign,
            ..self.clone()
        }
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            sign: -self.sign,
            ..self
        }
    }
}

impl Mul<&Rational> for &Rational {
    type Output = Rational;

    fn mul(self, other: &Rational) -> Rational {
        self.times(other.sign, &other.numerator, &other.denominator)
    }
}

impl Mul for Rational {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        &self * &other
    }
}

impl MulAssign<&Rational> for Rational {
    fn mul_assign(&mut self, other: &Rational) {
        *self = &*self * other;
    }
}

/// # Panics
///
/// Dividing by zero panics, like integer division.
/// Use [`Rational::checked_div`] to handle it instead.
impl Div<&Rational> for &Rational {
    type Output = Rational;

    fn div(self, other: &Rational) -> Rational {
        match self.checked_div(other) {
            Ok(answer) => answer,
            Err(_) => panic!("attempt to divide a Rational by zero"),
        }
    }
}

impl Div for Rational {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        &self / &other
    }
}

/// Truncated remainder, like the primitive integers
///
/// # Panics
///
/// If the divisor is zero
impl Rem<&Rational> for &Rational {
    type Output = Rational;

    fn rem(self, other: &Rational) -> Rational {
        match self.remainder(other) {
            Ok(answer) => answer,
            Err(_) => panic!("attempt to calculate the remainder with a divisor of zero"),
        }
    }
}

impl Rem for Rational {
    type Output = Self;

    fn rem(self, other: Self) -> Self {
        &self % &other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> Rational {
        Rational::fraction(n, d).unwrap()
    }

    #[test]
    fn half_plus_third() {
        assert_eq!(r(1, 2) + r(1, 3), r(5, 6));
        assert_eq!(&r(1, 2) - &r(1, 3), r(1, 6));
    }

    #[test]
    fn half_plus_one_times_two() {
        let two = Rational::new(2);
        let half = two.checked_inverse().unwrap();
        let sum = half + Rational::one();
        assert_eq!(sum * two, Rational::new(3));
    }

    #[test]
    fn parse_fractions() {
        let third: Rational = "1/3".parse().unwrap();
        let minus_four: Rational = "-4".parse().unwrap();
        let twelve: Rational = "12/20".parse().unwrap();
        let answer = third + minus_four * twelve;
        let expected: Rational = "-31/15".parse().unwrap();
        assert_eq!(answer, expected);
    }

    #[test]
    /// See e.g. https://discussions.apple.com/thread/252474975
    /// Apple calculator is not trustworthy if you are a programmer
    fn overflow_to_big() {
        let big: Rational = "288230376151711743".parse().unwrap();
        let small: Rational = "45".parse().unwrap();
        let expected: Rational = "12970366926827028435".parse().unwrap();
        assert_eq!(big * small, expected);
    }

    #[test]
    fn big_add_stays_reduced() {
        let max = Rational::new(i64::MAX);
        let a = &max / &Rational::new(3);
        let b = Rational::fraction(i64::MAX - 1, 6).unwrap();
        let sum = &a + &b;
        let expected = Rational::from_bigints(
            BigInt::from(i64::MAX) * 2 + BigInt::from(i64::MAX - 1),
            BigInt::from(6),
        )
        .unwrap();
        assert_eq!(sum, expected);
        let g = sum.numerator().magnitude().gcd(sum.denominator());
        assert!(g.is_one());
    }

    #[test]
    fn min_machine_word() {
        let a = Rational::new(i64::MIN);
        let b = Rational::new(-1);
        let sum = &a + &b;
        assert_eq!(sum.numerator(), BigInt::from(i64::MIN) - 1);
        let product = &a * &b;
        assert_eq!(product.numerator(), -BigInt::from(i64::MIN));
    }

    #[test]
    fn identities() {
        let values = [r(3, 7), r(-5, 2), Rational::new(9), r(1, 1_000_003)];
        for a in &values {
            assert_eq!(a - a, Rational::zero());
            assert_eq!(a.powi(&BigInt::zero()).unwrap(), Rational::one());
            assert_eq!(a * &a.checked_inverse().unwrap(), Rational::one());
            for b in &values {
                assert_eq!(a + b, b + a);
                assert_eq!(&(a / b) * b, a.clone());
            }
        }
    }

    #[test]
    fn three_divided_by_six() {
        let three = Rational::new(3);
        let six = Rational::new(6);
        assert_eq!(three / six, r(1, 2));
        assert_eq!(r(-3, 4) / r(-9, 8), r(2, 3));
        assert_eq!(r(3, 4) / r(-9, 8), r(-2, 3));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(
            Rational::one().checked_div(&Rational::zero()),
            Err(Problem::DivideByZero)
        );
        assert_eq!(
            r(1, 2).idiv(&Rational::zero()),
            Err(Problem::DivideByZero)
        );
        assert_eq!(
            r(1, 2).modulo(&Rational::zero()),
            Err(Problem::DivideByZero)
        );
        assert_eq!(
            r(1, 2).remainder(&Rational::zero()),
            Err(Problem::DivideByZero)
        );
        assert!(r(1, 2).divmod(&Rational::zero()).is_err());
    }

    #[test]
    #[should_panic]
    fn divide_operator_panics() {
        let _ = Rational::one() / Rational::zero();
    }

    #[test]
    fn power() {
        let one_two_five = Rational::new(5).powi(&BigInt::from(-3));
        assert_eq!(one_two_five, Rational::fraction(1, 125));
        let more = Rational::new(7).powi(&BigInt::from(11)).unwrap();
        assert_eq!(more, Rational::new(1_977_326_743));
        let minus = r(-2, 3).powi(&BigInt::from(3)).unwrap();
        assert_eq!(minus, r(-8, 27));
        let flipped = r(-2, 3).powi(&BigInt::from(-2)).unwrap();
        assert_eq!(flipped, r(9, 4));
    }

    #[test]
    fn power_special_bases() {
        let zero = Rational::zero();
        assert_eq!(zero.powi(&BigInt::zero()).unwrap(), Rational::one());
        assert_eq!(zero.powi(&BigInt::from(5)).unwrap(), zero);
        assert_eq!(zero.powi(&BigInt::from(-1)), Err(Problem::DivideByZero));
        let minus_one = Rational::new(-1);
        let huge = BigInt::from(u64::MAX) * 4 + 1;
        assert_eq!(minus_one.powi(&huge).unwrap(), minus_one);
        assert_eq!(Rational::one().powi(&-huge).unwrap(), Rational::one());
        assert_eq!(
            Rational::new(2).powi(&BigInt::from(u64::MAX)),
            Err(Problem::ExponentTooLarge)
        );
    }

    #[test]
    fn floor_division() {
        let a = r(7, 2);
        let b = r(2, 3);
        assert_eq!(a.idiv(&b).unwrap(), BigInt::from(5));
        assert_eq!(a.modulo(&b).unwrap(), r(1, 6));
        assert_eq!((-&a).idiv(&b).unwrap(), BigInt::from(-6));
        assert_eq!((-&a).modulo(&b).unwrap(), r(1, 2));
        assert_eq!((-&a).remainder(&b).unwrap(), r(-1, 6));
        let (q, m) = (-&a).divmod(&b).unwrap();
        assert_eq!(q, BigInt::from(-6));
        assert_eq!(m, r(1, 2));
        assert_eq!(&(-&a) % &b, r(-1, 6));
    }

    #[test]
    fn abs() {
        assert_eq!(r(-3, 4).abs(), r(3, 4));
        assert_eq!(r(3, 4).abs(), r(3, 4));
        assert_eq!(Rational::zero().abs(), Rational::zero());
    }

    #[test]
    fn machine_word_product() {
        assert_eq!(imul(0, i64::MAX), Some(0));
        assert_eq!(imul(1, i64::MIN), Some(i64::MIN));
        assert_eq!(imul(i64::MIN, 1), Some(i64::MIN));
        assert_eq!(imul(i64::MAX, 2), None);
        assert_eq!(imul(-3, 7), Some(-21));
    }
}
