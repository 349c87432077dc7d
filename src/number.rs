use crate::{Config, Problem, RaisePolicy, Rational};
use num::complex::Complex64;
use num::{BigInt, Integer, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;


/// The kinds of value in the numeric tower
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Integer,
    Float,
    Rational,
    Complex,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Integer => "Integer",
            Kind::Float => "Float",
            Kind::Rational => "Rational",
            Kind::Complex => "Complex",
        };
        f.write_str(name)
    }
}

/// A value in the numeric tower
///
/// Operations between two different kinds first coerce both operands to
/// a common kind and then redispatch. Integers become rationals with
/// denominator one. Floats drag exact values down to floating point, which
/// loses precision. A complex value with an exactly zero imaginary part
/// takes part through its real component, anything else promotes the
/// other operand to complex.
///
/// Equality is numeric, so `Integer(2)` equals `Rational(2/1)` and
/// `Float(2.0)`.
///
/// # Example
///
/// ```
/// use rationalist::{Config, Number, Rational};
/// let cfg = Config::default();
/// let one = Number::Integer(1.into());
/// let half = Number::Rational(Rational::fraction(1, 2).unwrap());
/// let sum = one.add(&half, &cfg).unwrap();
/// assert_eq!(sum, Number::Rational(Rational::fraction(3, 2).unwrap()));
/// let float = half.add(&Number::Float(0.25), &cfg).unwrap();
/// assert!(matches!(float, Number::Float(f) if f == 0.75));
/// ```
#[derive(Clone, Debug)]
pub enum Number {
    Integer(BigInt),
    Float(f64),
    Rational(Rational),
    Complex(Complex64),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    IDiv,
    Modulo,
    Remainder,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Op {
    fn name(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Pow => "**",
            Op::IDiv => "div",
            Op::Modulo => "%",
            Op::Remainder => "remainder",
        }
    }
}

// Two operands after coercion, always of the same kind
#[derive(Clone, Debug)]
enum Pair {
    Integers(BigInt, BigInt),
    Floats(f64, f64),
    Rationals(Rational, Rational),
    Complexes(Complex64, Complex64),
}

impl Pair {
    fn kind(&self) -> Kind {
        match self {
            Pair::Integers(..) => Kind::Integer,
            Pair::Floats(..) => Kind::Float,
            Pair::Rationals(..) => Kind::Rational,
            Pair::Complexes(..) => Kind::Complex,
        }
    }

    fn into_numbers(self) -> (Number, Number) {
        match self {
            Pair::Integers(a, b) => (Number::Integer(a), Number::Integer(b)),
            Pair::Floats(a, b) => (Number::Float(a), Number::Float(b)),
            Pair::Rationals(a, b) => (Number::Rational(a), Number::Rational(b)),
            Pair::Complexes(a, b) => (Number::Complex(a), Number::Complex(b)),
        }
    }
}

fn float(n: &BigInt) -> f64 {
    Rational::from_bigint(n.clone()).to_f64()
}

// Negative bases with a fractional exponent have a complex answer
fn pow_float(base: f64, exp: f64) -> Number {
    if base < 0.0 && exp.fract() != 0.0 {
        Number::Complex(Complex64::new(base, 0.0).powc(Complex64::new(exp, 0.0)))
    } else {
        Number::Float(base.powf(exp))
    }
}

fn floor_integer(f: f64) -> Result<Number, Problem> {
    Ok(Number::Integer(Rational::try_from(f.floor())?.trunc()))
}

fn integer_op(op: Op, a: BigInt, b: BigInt, cfg: &Config) -> Result<Number, Problem> {
    let zero_divisor = matches!(op, Op::IDiv | Op::Modulo | Op::Remainder) && b.is_zero();
    if zero_divisor {
        return Err(Problem::DivideByZero);
    }
    Ok(match op {
        Op::Add => Number::Integer(a + b),
        Op::Sub => Number::Integer(a - b),
        Op::Mul => Number::Integer(a * b),
        Op::Div => cfg.canonicalize(a, b)?,
        Op::Pow => {
            let power = Rational::from_bigint(a).powi(&b)?;
            if b.is_negative() {
                cfg.finish(power)
            } else {
                Number::Integer(power.numerator())
            }
        }
        Op::IDiv => Number::Integer(a.div_floor(&b)),
        Op::Modulo => Number::Integer(a.mod_floor(&b)),
        Op::Remainder => Number::Integer(a % b),
    })
}

fn rational_op(op: Op, a: Rational, b: Rational, cfg: &Config) -> Result<Number, Problem> {
    Ok(match op {
        Op::Add => cfg.finish(a + b),
        Op::Sub => cfg.finish(a - b),
        Op::Mul => cfg.finish(a * b),
        Op::Div => cfg.finish(a.checked_div(&b)?),
        Op::Pow => match b.to_integer() {
            Some(exp) => cfg.finish(a.powi(&exp)?),
            None => pow_float(a.to_f64(), b.to_f64()),
        },
        Op::IDiv => Number::Integer(a.idiv(&b)?),
        Op::Modulo => cfg.finish(a.modulo(&b)?),
        Op::Remainder => cfg.finish(a.remainder(&b)?),
    })
}

fn float_op(op: Op, a: f64, b: f64) -> Result<Number, Problem> {
    let zero_divisor = matches!(op, Op::IDiv | Op::Modulo | Op::Remainder) && b == 0.0;
    if zero_divisor {
        return Err(Problem::DivideByZero);
    }
    Ok(match op {
        Op::Add => Number::Float(a + b),
        Op::Sub => Number::Float(a - b),
        Op::Mul => Number::Float(a * b),
        Op::Div => Number::Float(a / b),
        Op::Pow => pow_float(a, b),
        Op::IDiv => floor_integer(a / b)?,
        Op::Modulo => {
            let m = a % b;
            if m != 0.0 && (m < 0.0) != (b < 0.0) {
                Number::Float(m + b)
            } else {
                Number::Float(m)
            }
        }
        Op::Remainder => Number::Float(a % b),
    })
}

fn complex_op(op: Op, a: Complex64, b: Complex64) -> Result<Number, Problem> {
    Ok(Number::Complex(match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Div => a / b,
        Op::Pow => a.powc(b),
        Op::IDiv | Op::Modulo | Op::Remainder => {
            return Err(Problem::Unsupported {
                operation: op.name(),
                kind: Kind::Complex,
            })
        }
    }))
}

impl Number {
    pub fn kind(&self) -> Kind {
        match self {
            Number::Integer(_) => Kind::Integer,
            Number::Float(_) => Kind::Float,
            Number::Rational(_) => Kind::Rational,
            Number::Complex(_) => Kind::Complex,
        }
    }

    fn to_f64(&self) -> Option<f64> {
        match self {
            Number::Integer(n) => Some(float(n)),
            Number::Float(f) => Some(*f),
            Number::Rational(r) => Some(r.to_f64()),
            Number::Complex(_) => None,
        }
    }

    fn to_complex(&self) -> Complex64 {
        match self {
            Number::Complex(c) => *c,
            real => Complex64::new(real.to_f64().unwrap_or_default(), 0.0),
        }
    }

    // The pairwise coercion table
    fn pair(&self, other: &Number) -> Pair {
        use Number::*;
        match (self, other) {
            (Integer(a), Integer(b)) => Pair::Integers(a.clone(), b.clone()),
            (Rational(a), Rational(b)) => Pair::Rationals(a.clone(), b.clone()),
            (Rational(a), Integer(b)) => {
                Pair::Rationals(a.clone(), crate::Rational::from_bigint(b.clone()))
            }
            (Integer(a), Rational(b)) => {
                Pair::Rationals(crate::Rational::from_bigint(a.clone()), b.clone())
            }
            (Complex(a), _) if a.im == 0.0 => Float(a.re).pair(other),
            (_, Complex(b)) if b.im == 0.0 => self.pair(&Float(b.re)),
            (Complex(_), _) | (_, Complex(_)) => {
                Pair::Complexes(self.to_complex(), other.to_complex())
            }
            (a, b) => Pair::Floats(
                a.to_f64().unwrap_or_default(),
                b.to_f64().unwrap_or_default(),
            ),
        }
    }

    /// Coerce both operands to a common kind, as `(self, other)`
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::{Kind, Number, Rational};
    /// let half = Number::Rational(Rational::fraction(1, 2).unwrap());
    /// let (a, b) = Number::Integer(3.into()).coerce(&half);
    /// assert_eq!((a.kind(), b.kind()), (Kind::Rational, Kind::Rational));
    /// ```
    pub fn coerce(&self, other: &Number) -> (Number, Number) {
        self.pair(other).into_numbers()
    }

    fn binary(&self, op: Op, other: &Number, cfg: &Config) -> Result<Number, Problem> {
        let pair = self.pair(other);
        if pair.kind() != self.kind() || pair.kind() != other.kind() {
            log::trace!(
                "{} {op} {} redispatched as {}",
                self.kind(),
                other.kind(),
                pair.kind()
            );
        }
        match pair {
            Pair::Integers(a, b) => integer_op(op, a, b, cfg),
            Pair::Floats(a, b) => float_op(op, a, b),
            Pair::Rationals(a, b) => rational_op(op, a, b, cfg),
            Pair::Complexes(a, b) => complex_op(op, a, b),
        }
    }

    pub fn add(&self, other: &Number, cfg: &Config) -> Result<Number, Problem> {
        self.binary(Op::Add, other, cfg)
    }

    pub fn sub(&self, other: &Number, cfg: &Config) -> Result<Number, Problem> {
        self.binary(Op::Sub, other, cfg)
    }

    pub fn mul(&self, other: &Number, cfg: &Config) -> Result<Number, Problem> {
        self.binary(Op::Mul, other, cfg)
    }

    /// Division, dividing two integers gives an exact rational
    pub fn div(&self, other: &Number, cfg: &Config) -> Result<Number, Problem> {
        self.binary(Op::Div, other, cfg)
    }

    /// Exponentiation
    ///
    /// An integral exponent on an exact base stays exact. Any other
    /// exponent converts the base to floating point, and a negative base
    /// with a fractional exponent gives a complex answer.
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::{Config, Number, Rational};
    /// let cfg = Config::default();
    /// let base = Number::Rational(Rational::fraction(2, 3).unwrap());
    /// let squared = base.pow(&Number::Integer(2.into()), &cfg).unwrap();
    /// assert_eq!(squared, Number::Rational(Rational::fraction(4, 9).unwrap()));
    /// let four = Number::Rational(Rational::new(4));
    /// let root = four.pow(&Number::Rational(Rational::fraction(1, 2).unwrap()), &cfg).unwrap();
    /// assert!(matches!(root, Number::Float(f) if f == 2.0));
    /// ```
    pub fn pow(&self, other: &Number, cfg: &Config) -> Result<Number, Problem> {
        self.binary(Op::Pow, other, cfg)
    }

    /// Floored division, the answer is always an integer
    pub fn idiv(&self, other: &Number, cfg: &Config) -> Result<Number, Problem> {
        self.binary(Op::IDiv, other, cfg)
    }

    /// Floored modulo, with the sign of `other`
    pub fn modulo(&self, other: &Number, cfg: &Config) -> Result<Number, Problem> {
        self.binary(Op::Modulo, other, cfg)
    }

    /// Truncated remainder, with the sign of `self`
    pub fn remainder(&self, other: &Number, cfg: &Config) -> Result<Number, Problem> {
        self.binary(Op::Remainder, other, cfg)
    }

    pub fn divmod(&self, other: &Number, cfg: &Config) -> Result<(Number, Number), Problem> {
        Ok((self.idiv(other, cfg)?, self.modulo(other, cfg)?))
    }

    /// Three way comparison
    ///
    /// `None` when either side is NaN. Complex values have no ordering.
    pub fn compare(&self, other: &Number) -> Result<Option<Ordering>, Problem> {
        match (self, other) {
            (Number::Rational(a), Number::Integer(b)) => return Ok(Some(a.compare_integer(b))),
            (Number::Integer(a), Number::Rational(b)) => {
                return Ok(Some(b.compare_integer(a).reverse()))
            }
            _ => (),
        }
        match self.pair(other) {
            Pair::Integers(a, b) => Ok(Some(a.cmp(&b))),
            Pair::Floats(a, b) => Ok(a.partial_cmp(&b)),
            Pair::Rationals(a, b) => Ok(Some(a.compare(&b))),
            Pair::Complexes(..) => Err(Problem::Unsupported {
                operation: "<=>",
                kind: Kind::Complex,
            }),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match self.pair(other) {
            Pair::Integers(a, b) => a == b,
            Pair::Floats(a, b) => a == b,
            Pair::Rationals(a, b) => a == b,
            Pair::Complexes(a, b) => a == b,
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Number {
        Number::Integer(n.into())
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Number {
        Number::Integer(n)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Number {
        Number::Float(f)
    }
}

impl From<Rational> for Number {
    fn from(r: Rational) -> Number {
        Number::Rational(r)
    }
}

impl From<Complex64> for Number {
    fn from(c: Complex64) -> Number {
        Number::Complex(c)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(n) => fmt::Display::fmt(n, f),
            Number::Float(x) if f.precision().is_some() => fmt::Display::fmt(x, f),
            Number::Float(x) => write!(f, "{x:?}"),
            Number::Rational(r) => fmt::Display::fmt(r, f),
            Number::Complex(c) => {
                let sign = if c.im.is_sign_negative() { '-' } else { '+' };
                write!(f, "{:?}{sign}{:?}i", c.re, c.im.abs())
            }
        }
    }
}

/// Exact conversion of any real value
///
/// Floats convert exactly, a complex value only when its imaginary part is
/// exactly zero.
impl TryFrom<&Number> for Rational {
    type Error = Problem;

    fn try_from(n: &Number) -> Result<Rational, Problem> {
        match n {
            Number::Integer(n) => Ok(Rational::from_bigint(n.clone())),
            Number::Float(f) => Rational::try_from(*f),
            Number::Rational(r) => Ok(r.clone()),
            Number::Complex(c) if c.im == 0.0 => Rational::try_from(c.re),
            Number::Complex(_) => Err(Problem::TypeError {
                from: Kind::Complex,
                to: Kind::Rational,
            }),
        }
    }
}

impl Rational {
    /// Build a rational from values of any kind, dividing by `den` if given
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::{Config, Number, RaisePolicy, Rational};
    /// let cfg = Config::default();
    /// let half = Number::Float(0.5);
    /// let three = Number::Integer(3.into());
    /// let sixth = Rational::convert(&half, Some(&three), &cfg, RaisePolicy::Raise).unwrap();
    /// assert_eq!(sixth, Some(Number::Rational(Rational::fraction(1, 6).unwrap())));
    /// let zero = Number::Integer(0.into());
    /// let none = Rational::convert(&three, Some(&zero), &cfg, RaisePolicy::Quiet).unwrap();
    /// assert_eq!(none, None);
    /// ```
    pub fn convert(
        num: &Number,
        den: Option<&Number>,
        cfg: &Config,
        policy: RaisePolicy,
    ) -> Result<Option<Number>, Problem> {
        let exact = || -> Result<Number, Problem> {
            let n = Rational::try_from(num)?;
            match den {
                None => Ok(cfg.finish(n)),
                Some(den) => Ok(cfg.finish(n.checked_div(&Rational::try_from(den)?)?)),
            }
        };
        policy.apply(exact())
    }

    /// Coerce `other` to a kind shared with this value, as `(self, other)`
    pub fn coerce(&self, other: &Number) -> (Number, Number) {
        Number::Rational(self.clone()).coerce(other)
    }

    /// [`rationalize`](Rational::rationalize) with an optional epsilon of any real kind
    ///
    /// Without an epsilon this value is returned unchanged.
    pub fn rationalize_with(&self, epsilon: Option<&Number>) -> Result<Rational, Problem> {
        match epsilon {
            None => Ok(self.clone()),
            Some(e) => Ok(self.rationalize(&Rational::try_from(e)?)),
        }
    }
}
