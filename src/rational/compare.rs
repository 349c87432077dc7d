use super::arith::imul;
use crate::Rational;
use num::bigint::Sign::*;
use num::BigInt;
use std::cmp::Ordering::{self, *};
use std::hash::{DefaultHasher, Hash, Hasher};

impl Rational {
    /// Three way comparison
    ///
    /// Integers compare their numerators, anything else cross multiplies.
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::Rational;
    /// use std::cmp::Ordering;
    /// let third = Rational::fraction(1, 3).unwrap();
    /// let quarter = Rational::fraction(1, 4).unwrap();
    /// assert_eq!(third.compare(&quarter), Ordering::Greater);
    /// ```
    pub fn compare(&self, other: &Self) -> Ordering {
        match self.sign.cmp(&other.sign) {
            Less => return Less,
            Greater => return Greater,
            Equal => (),
        }
        if self.sign == NoSign {
            return Equal;
        }
        if self.is_integer() && other.is_integer() {
            return self.numerator().cmp(&other.numerator());
        }
        if let (Some((an, ad)), Some((bn, bd))) = (self.small(), other.small()) {
            if let (Some(left), Some(right)) = (imul(an, bd), imul(bn, ad)) {
                return left.cmp(&right);
            }
        }
        let left = &self.numerator * &other.denominator;
        let right = &other.numerator * &self.denominator;
        match self.sign {
            Minus => right.cmp(&left),
            _ => left.cmp(&right),
        }
    }

    /// Compare with an integer without building a Rational from it
    pub fn compare_integer(&self, other: &BigInt) -> Ordering {
        if self.is_integer() {
            return self.numerator().cmp(other);
        }
        self.compare(&Rational::from_bigint(other.clone()))
    }

    /// The hash of the numerator combined with the hash of the denominator
    pub fn hash_code(&self) -> u64 {
        let mut numerator = DefaultHasher::new();
        self.numerator().hash(&mut numerator);
        let mut denominator = DefaultHasher::new();
        self.denominator.hash(&mut denominator);
        numerator.finish() ^ denominator.finish()
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Hash for Rational {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl PartialEq<BigInt> for Rational {
    fn eq(&self, other: &BigInt) -> bool {
        self.is_integer() && self.numerator() == *other
    }
}

impl PartialOrd<BigInt> for Rational {
    fn partial_cmp(&self, other: &BigInt) -> Option<Ordering> {
        Some(self.compare_integer(other))
    }
}

/// Floating point comparison converts this value to a float first
impl PartialEq<f64> for Rational {
    fn eq(&self, other: &f64) -> bool {
        self.to_f64() == *other
    }
}

impl PartialOrd<f64> for Rational {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.to_f64().partial_cmp(other)
    }
}
