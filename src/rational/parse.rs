use crate::{Config, Number, Problem, RaisePolicy, Rational};
use num::BigInt;

/// A number read from the front of some text, and the text left after it
#[derive(Clone, Debug, PartialEq)]
pub struct Parsed<'a> {
    pub value: Number,
    pub rest: &'a str,
}

// Digits with single underscores between them, e.g. 1_000
fn digits(s: &str) -> Option<(&str, &str)> {
    let bytes = s.as_bytes();
    if !bytes.first()?.is_ascii_digit() {
        return None;
    }
    let mut end = 1;
    loop {
        match bytes.get(end) {
            Some(b) if b.is_ascii_digit() => end += 1,
            Some(b'_') if bytes.get(end + 1).is_some_and(u8::is_ascii_digit) => end += 2,
            _ => break,
        }
    }
    Some(s.split_at(end))
}

fn integer(digits: &str) -> BigInt {
    let clean: String = digits.chars().filter(|c| *c != '_').collect();
    // Only ever given digits
    BigInt::parse_bytes(clean.as_bytes(), 10).unwrap_or_default()
}

// Very large exponents fall back to a float
#[derive(Clone, Debug, PartialEq)]
enum Value {
    Exact(Rational),
    Inexact(f64),
}

impl Value {
    fn negate(self) -> Self {
        match self {
            Value::Exact(r) => Value::Exact(-r),
            Value::Inexact(f) => Value::Inexact(-f),
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            Value::Exact(r) => r.is_zero(),
            Value::Inexact(f) => *f == 0.0,
        }
    }

    fn divide(self, other: Value) -> Result<Self, Problem> {
        use Value::*;
        match (self, other) {
            (Exact(a), Exact(b)) => Ok(Exact(a.checked_div(&b)?)),
            (Exact(a), Inexact(b)) => Ok(Inexact(a.to_f64() / b)),
            (Inexact(a), Exact(b)) => Ok(Inexact(a / b.to_f64())),
            (Inexact(a), Inexact(b)) => Ok(Inexact(a / b)),
        }
    }

    fn finish(self, cfg: &Config) -> Number {
        match self {
            Value::Exact(r) => cfg.finish(r),
            Value::Inexact(f) => Number::Float(f),
        }
    }
}

// digits ["." digits] [("e" | "E") [sign] digits], without a sign
fn unsigned(s: &str) -> Option<(Value, &str)> {
    let (whole, mut rest) = digits(s)?;
    let mut value = Rational::from_bigint(integer(whole));

    if let Some((fraction, after)) = rest.strip_prefix('.').and_then(digits) {
        let places = fraction.chars().filter(char::is_ascii_digit).count();
        let scale = BigInt::from(10).pow(places as u32);
        let numerator = value.numerator() * &scale + integer(fraction);
        value = Rational::from_bigints(numerator, scale).ok()?;
        rest = after;
    }

    if let Some(after) = rest.strip_prefix(['e', 'E']) {
        let (negative, after) = match after.as_bytes().first() {
            Some(b'-') => (true, &after[1..]),
            Some(b'+') => (false, &after[1..]),
            _ => (false, after),
        };
        if let Some((exponent, after)) = digits(after) {
            rest = after;
            let exponent = integer(exponent);
            return Some((scientific(value, negative, &exponent), rest));
        }
    }

    Some((Value::Exact(value), rest))
}

// Beyond this a power of ten costs too much to build, and is far outside
// the range of a float anyway
const EXACT_EXPONENT_LIMIT: u32 = 10_000;

fn scientific(value: Rational, negative: bool, exponent: &BigInt) -> Value {
    let places = u32::try_from(exponent)
        .ok()
        .filter(|places| *places <= EXACT_EXPONENT_LIMIT);
    let Some(places) = places else {
        return if negative || value.is_zero() {
            Value::Inexact(0.0)
        } else {
            Value::Inexact(f64::INFINITY)
        };
    };
    let scale = Rational::from_bigint(BigInt::from(10).pow(places));
    if negative {
        Value::Exact(&value / &scale)
    } else {
        Value::Exact(&value * &scale)
    }
}

impl Rational {
    /// Read a number from the front of `text`
    ///
    /// The grammar is `[sign] digits ["." digits] [("e"|"E") [sign] digits]
    /// ["/" denominator]` after optional leading whitespace, where the
    /// denominator has the same form without a sign. Whatever follows is
    /// returned as the rest.
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::{Config, Number, Rational};
    /// let parsed = Rational::parse_partial("1.5/2 apples", &Config::default()).unwrap();
    /// assert_eq!(parsed.value, Number::Rational(Rational::fraction(3, 4).unwrap()));
    /// assert_eq!(parsed.rest, " apples");
    /// ```
    pub fn parse_partial<'a>(text: &'a str, cfg: &Config) -> Result<Parsed<'a>, Problem> {
        let invalid = || Problem::InvalidLiteral(text.to_owned());
        let s = text.trim_start_matches(|c: char| c.is_ascii_whitespace());
        let (negative, s) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (mut value, mut rest) = unsigned(s).ok_or_else(invalid)?;
        if negative {
            value = value.negate();
        }
        if let Some((denominator, after)) = rest.strip_prefix('/').and_then(unsigned) {
            if denominator.is_zero() {
                return Err(Problem::DivideByZero);
            }
            value = value.divide(denominator)?;
            rest = after;
        }
        Ok(Parsed {
            value: value.finish(cfg),
            rest,
        })
    }

    /// Parse the whole of `text`, apart from trailing whitespace
    ///
    /// Any failure, including a zero denominator, is an
    /// [`InvalidLiteral`](Problem::InvalidLiteral) unless the policy is
    /// [`RaisePolicy::Quiet`].
    ///
    /// # Example
    ///
    /// ```
    /// use rationalist::{Config, Number, Problem, RaisePolicy, Rational};
    /// let cfg = Config::default();
    /// let parsed = Rational::parse("2e2", &cfg, RaisePolicy::Raise).unwrap();
    /// assert_eq!(parsed, Some(Number::Rational(Rational::new(200))));
    /// let zero = Rational::parse("1/0", &cfg, RaisePolicy::Raise);
    /// assert!(matches!(zero, Err(Problem::InvalidLiteral(_))));
    /// assert_eq!(Rational::parse("1/0", &cfg, RaisePolicy::Quiet), Ok(None));
    /// ```
    pub fn parse(text: &str, cfg: &Config, policy: RaisePolicy) -> Result<Option<Number>, Problem> {
        let strict = match Self::parse_partial(text, cfg) {
            Ok(parsed) if parsed.rest.trim().is_empty() => Ok(parsed.value),
            _ => Err(Problem::InvalidLiteral(text.to_owned())),
        };
        policy.apply(strict)
    }
}

impl std::str::FromStr for Rational {
    type Err = Problem;

    fn from_str(s: &str) -> Result<Self, Problem> {
        match Self::parse(s, &Config::default(), RaisePolicy::Raise)? {
            Some(value) => Rational::try_from(&value),
            None => Err(Problem::InvalidLiteral(s.to_owned())),
        }
    }
}
