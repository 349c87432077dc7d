use crate::{Problem, Rational};
use num::bigint::Sign::*;
use num::{BigInt, BigUint, Integer, One, ToPrimitive};

// Components longer than this are shifted down before dividing, so a
// shifted component is always below 2^1023 and converts to a finite f64
const SAFE_BITS: u64 = 1022;
const MAX_EXP: i64 = 1023;
const MIN_EXP: i64 = -1022;

fn signed(n: Rational, neg: bool) -> Rational {
    if neg {
        -n
    } else {
        n
    }
}

// f * 2^e without overflowing in the scale factor itself
fn ldexp(f: f64, e: i64) -> f64 {
    let half = (e / 2) as i32;
    let rest = (e - e / 2) as i32;
    f * 2f64.powi(half) * 2f64.powi(rest)
}

fn big_to_f64(n: &BigUint) -> f64 {
    n.to_f64().unwrap_or(f64::INFINITY)
}

impl Rational {
    /// The nearest [`f64`], computed without materializing huge intermediates
    ///
    /// Values beyond the range of `f64` log a warning and saturate to
    /// [`f64::MAX`], values too small to represent become zero.
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::Rational;
    /// let r = Rational::fraction(-3, 8).unwrap();
    /// assert_eq!(r.to_f64(), -0.375);
    /// ```
    pub fn to_f64(&self) -> f64 {
        if self.sign == NoSign {
            return 0.0;
        }
        let mut numerator = self.numerator.clone();
        let mut denominator = self.denominator.clone();

        let nl = numerator.bits() - 1;
        let dl = denominator.bits() - 1;

        let mut ne: i64 = 0;
        if nl > SAFE_BITS {
            ne = (nl - SAFE_BITS) as i64;
            numerator >>= ne as u64;
        }
        let mut de: i64 = 0;
        if dl > SAFE_BITS {
            de = (dl - SAFE_BITS) as i64;
            denominator >>= de as u64;
        }

        let e = ne - de;
        if !(MIN_EXP..=MAX_EXP).contains(&e) {
            log::warn!("out of Float range");
            let saturated = if e > 0 { f64::MAX } else { 0.0 };
            return if self.sign == Minus {
                -saturated
            } else {
                saturated
            };
        }

        let mut f = big_to_f64(&numerator) / big_to_f64(&denominator);
        if self.sign == Minus {
            f = -f;
        }
        let f = ldexp(f, e);
        if f.is_infinite() || f.is_nan() {
            log::warn!("out of Float range");
        }
        f
    }

    /// Divide, producing a float
    pub fn fdiv(&self, other: &Self) -> f64 {
        self.to_f64() / other.to_f64()
    }

    /// The largest integer no greater than this value
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::Rational;
    /// use num::BigInt;
    /// let r = Rational::fraction(-7, 2).unwrap();
    /// assert_eq!(r.floor(), BigInt::from(-4));
    /// assert_eq!(r.ceil(), BigInt::from(-3));
    /// assert_eq!(r.trunc(), BigInt::from(-3));
    /// ```
    pub fn floor(&self) -> BigInt {
        self.numerator()
            .div_floor(&BigInt::from(self.denominator.clone()))
    }

    /// The smallest integer no less than this value
    pub fn ceil(&self) -> BigInt {
        -(-self.numerator()).div_floor(&BigInt::from(self.denominator.clone()))
    }

    /// The integer part of this Rational, rounding toward zero
    pub fn trunc(&self) -> BigInt {
        let whole = &self.numerator / &self.denominator;
        BigInt::from_biguint(self.sign, whole)
    }

    /// The simplest rational within `|epsilon|` of this value
    ///
    /// Of all the rationals in `[self - |epsilon|, self + |epsilon|]` the
    /// one with the smallest denominator is chosen. A zero epsilon gives
    /// back this value.
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::Rational;
    /// let pi: Rational = "3.14159265".parse().unwrap();
    /// let epsilon = Rational::fraction(1, 1000).unwrap();
    /// assert_eq!(pi.rationalize(&epsilon), Rational::fraction(201, 64).unwrap());
    /// ```
    pub fn rationalize(&self, epsilon: &Rational) -> Rational {
        if self.sign == Minus {
            return -self.abs().rationalize(epsilon);
        }
        let epsilon = epsilon.abs();
        let a = self - &epsilon;
        let b = self + &epsilon;
        if a == b {
            return self.clone();
        }
        simplest_between(a, b)
    }
}

// Walk the continued fraction expansions of both bounds until they differ
fn simplest_between(mut a: Rational, mut b: Rational) -> Rational {
    let one = BigInt::one();
    let (mut p0, mut p1) = (BigInt::ZERO, one.clone());
    let (mut q0, mut q1) = (one.clone(), BigInt::ZERO);
    loop {
        let c = a.ceil();
        if Rational::from_bigint(c.clone()) < b {
            let p = &c * &p1 + p0;
            let q = &c * &q1 + q0;
            return Rational::from_bigints(p, q).unwrap_or_default();
        }
        let k = &c - &one;
        let p2 = &k * &p1 + &p0;
        let q2 = &k * &q1 + &q0;
        let whole = Rational::from_bigint(k);
        // Both differences are positive, a <= c and b >= c
        let t = (&b - &whole).checked_inverse().unwrap_or_default();
        b = (&a - &whole).checked_inverse().unwrap_or_default();
        a = t;
        p0 = p1;
        q0 = q1;
        p1 = p2;
        q1 = q2;
    }
}

impl TryFrom<f32> for Rational {
    type Error = Problem;

    fn try_from(n: f32) -> Result<Rational, Self::Error> {
        const NEG_BITS: u32 = 0x8000_0000;
        const EXP_BITS: u32 = 0x7f80_0000;
        const SIG_BITS: u32 = 0x007f_ffff;
        debug_assert_eq!(NEG_BITS + EXP_BITS + SIG_BITS, u32::MAX);

        let bits = n.to_bits();
        let neg = (bits & NEG_BITS) == NEG_BITS;
        let exp = (bits & EXP_BITS) >> EXP_BITS.trailing_zeros();
        let sig = bits & SIG_BITS;
        match exp {
            0 => {
                if sig == 0 {
                    Ok(Rational::zero())
                } else {
                    let numerator: BigInt = sig.into();
                    let denominator = BigInt::one() << 149;
                    Ok(signed(
                        Rational::from_bigints(numerator, denominator)?,
                        neg,
                    ))
                }
            }
            1..=150 => {
                let n = SIG_BITS + 1 + sig;
                let numerator: BigInt = n.into();
                let denominator = BigInt::one() << (150 - exp);
                Ok(signed(
                    Rational::from_bigints(numerator, denominator)?,
                    neg,
                ))
            }
            151..=254 => {
                let n = SIG_BITS + 1 + sig;
                let mut big: BigInt = n.into();
                big <<= exp - 150;
                Ok(signed(Rational::from_bigint(big), neg))
            }
            255 => {
                if sig == 0 {
                    Err(Problem::Infinity)
                } else {
                    Err(Problem::NotANumber)
                }
            }
            _ => unreachable!(),
        }
    }
}

impl TryFrom<f64> for Rational {
    type Error = Problem;

    fn try_from(n: f64) -> Result<Rational, Self::Error> {
        const NEG_BITS: u64 = 0x8000_0000_0000_0000;
        const EXP_BITS: u64 = 0x7ff0_0000_0000_0000;
        const SIG_BITS: u64 = 0x000f_ffff_ffff_ffff;
        debug_assert_eq!(NEG_BITS + EXP_BITS + SIG_BITS, u64::MAX);

        let bits = n.to_bits();
        let neg = (bits & NEG_BITS) == NEG_BITS;
        let exp = (bits & EXP_BITS) >> EXP_BITS.trailing_zeros();
        let sig = bits & SIG_BITS;
        match exp {
            0 => {
                if sig == 0 {
                    Ok(Rational::zero())
                } else {
                    let numerator: BigInt = sig.into();
                    let denominator = BigInt::one() << 1074;
                    Ok(signed(
                        Rational::from_bigints(numerator, denominator)?,
                        neg,
                    ))
                }
            }
            1..=1075 => {
                let n = SIG_BITS + 1 + sig;
                let numerator: BigInt = n.into();
                let denominator = BigInt::one() << (1075 - exp);
                Ok(signed(
                    Rational::from_bigints(numerator, denominator)?,
                    neg,
                ))
            }
            1076..=2046 => {
                let n = SIG_BITS + 1 + sig;
                let mut big: BigInt = n.into();
                big <<= exp - 1075;
                Ok(signed(Rational::from_bigint(big), neg))
            }
            2047 => {
                if sig == 0 {
                    Err(Problem::Infinity)
                } else {
                    Err(Problem::NotANumber)
                }
            }
            _ => unreachable!(),
        }
    }
}

impl TryFrom<&Rational> for i64 {
    type Error = Problem;

    fn try_from(r: &Rational) -> Result<i64, Problem> {
        let n = r.to_integer().ok_or(Problem::NotAnInteger)?;
        n.to_i64().ok_or(Problem::OutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> Rational {
        Rational::fraction(n, d).unwrap()
    }

    #[test]
    fn zero() {
        let f: f32 = 0.0;
        let d: f64 = 0.0;
        let a: Rational = f.try_into().unwrap();
        let b: Rational = d.try_into().unwrap();
        let zero = Rational::zero();
        assert_eq!(a, zero);
        assert_eq!(b, zero);
        assert_eq!(zero.to_f64(), 0.0);
    }

    #[test]
    fn half_from_float() {
        let half = 0.5_f32;
        let correct = r(1, 2);
        let answer: Rational = half.try_into().unwrap();
        assert_eq!(answer, correct);
        let half = -0.5_f64;
        let answer: Rational = half.try_into().unwrap();
        assert_eq!(answer, -correct);
    }

    #[test]
    fn repr_f32() {
        let f: f32 = 1.23456789;
        let a: Rational = f.try_into().unwrap();
        let correct = r(5178153, 4194304);
        assert_eq!(a, correct);
    }

    #[test]
    fn repr_f64() {
        let f: f64 = 1.23456789;
        let a: Rational = f.try_into().unwrap();
        let correct = r(5559999489367579, 4503599627370496);
        assert_eq!(a, correct);
        assert_eq!(a.to_f64(), f);
    }

    #[test]
    fn non_finite() {
        assert_eq!(Rational::try_from(f64::NAN), Err(Problem::NotANumber));
        assert_eq!(Rational::try_from(f64::INFINITY), Err(Problem::Infinity));
        assert_eq!(Rational::try_from(f32::NEG_INFINITY), Err(Problem::Infinity));
    }

    #[test]
    fn to_float() {
        assert_eq!(r(1, 3).to_f64(), 1.0 / 3.0);
        assert_eq!(r(-5, 4).to_f64(), -1.25);
        assert_eq!(Rational::new(1 << 60).to_f64(), 2f64.powi(60));
    }

    #[test]
    fn huge_but_bounded() {
        let huge = Rational::from_bigint((BigInt::one() << 5000) + 1);
        let f = huge.to_f64();
        assert!(f.is_finite());
        assert_eq!(f, f64::MAX);
        let tiny = huge.checked_inverse().unwrap();
        assert_eq!(tiny.to_f64(), 0.0);
        assert_eq!((-&huge).to_f64(), -f64::MAX);
    }

    #[test]
    fn huge_ratio_in_range() {
        // Both parts are enormous but the ratio is modest
        let n = (BigInt::one() << 3000) * 3;
        let d = (BigInt::one() << 2999) + 1;
        let a = Rational::from_bigints(n, d).unwrap();
        assert!((a.to_f64() - 6.0).abs() < 1e-9);
        let max = Rational::try_from(f64::MAX).unwrap();
        assert_eq!(max.to_f64(), f64::MAX);
        let min = Rational::try_from(f64::MIN_POSITIVE).unwrap();
        assert_eq!(min.to_f64(), f64::MIN_POSITIVE);
    }

    #[test]
    fn full_width_components() {
        // Both parts are 1024 bits, one more than a finite f64 can hold
        let n = (BigInt::one() << 1024) - 1;
        let d = (BigInt::one() << 1024) - 3;
        let near_one = Rational::from_bigints(n, d).unwrap();
        assert!((near_one.to_f64() - 1.0).abs() < 1e-9);
        let top = Rational::from_bigint((BigInt::one() << 1023) + 1);
        assert_eq!(top.to_f64(), 2f64.powi(1023));
        assert_eq!(top.checked_inverse().unwrap().to_f64(), 2f64.powi(-1023));
    }

    mod warnings {
        use std::cell::RefCell;

        thread_local! {
            static SEEN: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
        }

        // Keeps each test thread's warnings apart
        struct Recorder;

        impl log::Log for Recorder {
            fn enabled(&self, metadata: &log::Metadata) -> bool {
                metadata.level() <= log::Level::Warn
            }

            fn log(&self, record: &log::Record) {
                if self.enabled(record.metadata()) {
                    SEEN.with(|seen| seen.borrow_mut().push(record.args().to_string()));
                }
            }

            fn flush(&self) {}
        }

        static RECORDER: Recorder = Recorder;

        /// Run `f` and return what it produced with the warnings it logged
        pub(super) fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
            // Another test may have installed it already
            let _ = log::set_logger(&RECORDER);
            log::set_max_level(log::LevelFilter::Warn);
            SEEN.with(|seen| seen.borrow_mut().clear());
            let answer = f();
            (answer, SEEN.with(|seen| seen.take()))
        }
    }

    #[test]
    fn warns_only_out_of_range() {
        let huge = Rational::from_bigint((BigInt::one() << 5000) + 1);
        let (f, seen) = warnings::capture(|| huge.to_f64());
        assert_eq!(f, f64::MAX);
        assert_eq!(seen, ["out of Float range"]);

        let tiny = huge.checked_inverse().unwrap();
        let (f, seen) = warnings::capture(|| tiny.to_f64());
        assert_eq!(f, 0.0);
        assert_eq!(seen, ["out of Float range"]);

        let n = (BigInt::one() << 3000) * 3;
        let d = (BigInt::one() << 2999) + 1;
        let modest = Rational::from_bigints(n, d).unwrap();
        let (f, seen) = warnings::capture(|| modest.to_f64());
        assert!((f - 6.0).abs() < 1e-9);
        assert!(seen.is_empty(), "{seen:?}");

        let n = (BigInt::one() << 1024) - 1;
        let d = (BigInt::one() << 1024) - 3;
        let near_one = Rational::from_bigints(n, d).unwrap();
        let (f, seen) = warnings::capture(|| near_one.to_f64());
        assert!(f.is_finite());
        assert!(seen.is_empty(), "{seen:?}");
    }

    #[test]
    fn integer_conversions() {
        assert_eq!(r(7, 2).floor(), BigInt::from(3));
        assert_eq!(r(7, 2).ceil(), BigInt::from(4));
        assert_eq!(r(7, 2).trunc(), BigInt::from(3));
        assert_eq!(r(-7, 2).floor(), BigInt::from(-4));
        assert_eq!(r(-7, 2).ceil(), BigInt::from(-3));
        assert_eq!(r(-7, 2).trunc(), BigInt::from(-3));
        assert_eq!(Rational::new(-6).floor(), BigInt::from(-6));
        assert_eq!(Rational::new(-6).ceil(), BigInt::from(-6));
    }

    #[test]
    fn primitive() {
        let fraction = Rational::new(172) / Rational::new(9);
        assert_eq!(i64::try_from(&fraction), Err(Problem::NotAnInteger));
        let int = i64::try_from(&Rational::from_bigint(fraction.trunc())).unwrap();
        assert_eq!(int, 19);
        let big = Rational::from_bigint(BigInt::from(i64::MAX) + 1);
        assert_eq!(i64::try_from(&big), Err(Problem::OutOfRange));
    }

    #[test]
    fn fdiv() {
        assert_eq!(r(1, 2).fdiv(&r(1, 4)), 2.0);
    }

    #[test]
    fn rationalize() {
        let x = r(3, 10);
        let epsilon = r(1, 100);
        assert_eq!(x.rationalize(&epsilon), r(3, 10));
        let x = r(333, 1000);
        assert_eq!(x.rationalize(&epsilon), r(1, 3));
        assert_eq!((-&x).rationalize(&epsilon), r(-1, 3));
        assert_eq!(x.rationalize(&-&epsilon), r(1, 3));
        assert_eq!(x.rationalize(&Rational::zero()), x);
        assert_eq!(Rational::zero().rationalize(&epsilon), Rational::zero());
        assert_eq!(r(5, 2).rationalize(&r(1, 2)), Rational::new(2));
    }

    #[test]
    fn rationalize_is_within_bounds() {
        let x: Rational = "3.14159265358979".parse().unwrap();
        for d in [10, 100, 10_000, 1_000_000] {
            let epsilon = r(1, d);
            let answer = x.rationalize(&epsilon);
            assert!(answer >= &x - &epsilon);
            assert!(answer <= &x + &epsilon);
        }
    }
}
