//! Exact rational arithmetic.

use approx::relative_eq;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Div, Mul, Neg, Sub},
};
use thiserror::Error;

/// The most fractional digits [`ExactFraction::from_f64()`] will look for
/// when reading a float as a decimal.
pub const DECIMAL_DIGITS: u32 = 9;

/// The largest denominator [`ExactFraction::from_f64()`] will produce for a
/// float which isn't a short decimal.
pub const MAX_DENOMINATOR: i128 = 1_000_000_000;

/// Floats bigger than `2^53` can't tell neighbouring integers apart, so they
/// are never turned into fractions.
const MAX_MAGNITUDE: f64 = 9_007_199_254_740_992.0;

/// How far (relatively) a convergent may be from the float it approximates.
const TOLERANCE: f64 = 4.0 * f64::EPSILON;

/// An arbitrary precision rational number.
///
/// Fractions are always stored in lowest terms with a positive denominator,
/// so two fractions are equal exactly when their numerators and
/// denominators are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExactFraction(BigRational);

/// Things that can go wrong when creating or dividing an [`ExactFraction`].
#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum FractionError {
    #[error("attempted to divide by zero")]
    DivisionByZero,
    #[error("{value} can't be represented as an exact fraction")]
    NotRepresentable { value: f64 },
}

impl ExactFraction {
    /// Create the fraction `numerator / denominator`, reduced to lowest terms.
    pub fn new<N, D>(numerator: N, denominator: D) -> Result<Self, FractionError>
    where
        N: Into<BigInt>,
        D: Into<BigInt>,
    {
        let denominator = denominator.into();

        if denominator.is_zero() {
            return Err(FractionError::DivisionByZero);
        }

        Ok(ExactFraction(BigRational::new(numerator.into(), denominator)))
    }

    pub fn from_integer<N: Into<BigInt>>(value: N) -> Self {
        ExactFraction(BigRational::from_integer(value.into()))
    }

    pub fn zero() -> Self { ExactFraction(BigRational::zero()) }

    pub fn one() -> Self { ExactFraction(BigRational::one()) }

    /// Convert a float to a fraction.
    ///
    /// The float is first read as a decimal with at most [`DECIMAL_DIGITS`]
    /// fractional digits, taking the shortest one which converts back to
    /// exactly `value`. That means anything typed as `2234567.123456789` or
    /// `0.000000001` comes back as the decimal that was typed.
    ///
    /// Floats which aren't short decimals (`1/3`, or `0.1 + 0.2` with its
    /// rounding error) are rounded to the first convergent of their
    /// continued fraction within a few ulps, with a denominator of at most
    /// [`MAX_DENOMINATOR`].
    ///
    /// Non-finite values, values larger than `2^53` and values which need
    /// more precision than that are [`FractionError::NotRepresentable`].
    pub fn from_f64(value: f64) -> Result<Self, FractionError> {
        let not_representable = FractionError::NotRepresentable { value };

        if !value.is_finite() || value.abs() > MAX_MAGNITUDE {
            return Err(not_representable);
        }

        from_decimal(value)
            .or_else(|| from_convergents(value))
            .ok_or(not_representable)
    }

    pub fn numerator(&self) -> &BigInt { self.0.numer() }

    /// The denominator, which is always positive.
    pub fn denominator(&self) -> &BigInt { self.0.denom() }

    pub fn is_zero(&self) -> bool { self.0.is_zero() }

    pub fn is_negative(&self) -> bool { self.0.is_negative() }

    pub fn is_integer(&self) -> bool { self.0.is_integer() }

    /// `-1`, `0` or `1` depending on the fraction's sign.
    pub fn signum(&self) -> i32 {
        if self.is_zero() {
            0
        } else if self.is_negative() {
            -1
        } else {
            1
        }
    }

    /// The closest `f64`, saturating to infinity for enormous values.
    pub fn to_f64(&self) -> f64 {
        match self.0.to_f64() {
            Some(value) => value,
            None if self.is_negative() => f64::NEG_INFINITY,
            None => f64::INFINITY,
        }
    }

    /// Divide one fraction by another.
    pub fn checked_div(&self, rhs: &Self) -> Result<Self, FractionError> {
        Ok(self * &rhs.recip()?)
    }

    /// Get `1/self`.
    pub fn recip(&self) -> Result<Self, FractionError> {
        if self.is_zero() {
            Err(FractionError::DivisionByZero)
        } else {
            Ok(ExactFraction(self.0.recip()))
        }
    }

    /// Is this fraction's square root also a fraction?
    pub fn is_perfect_square(&self) -> bool { self.sqrt().is_some() }

    /// The exact square root, if [`ExactFraction::is_perfect_square()`].
    pub fn sqrt(&self) -> Option<Self> {
        if self.is_negative() {
            return None;
        }

        let numerator = exact_sqrt(self.numerator())?;
        let denominator = exact_sqrt(self.denominator())?;

        // the roots of two coprime numbers are coprime, so no need to reduce
        Some(ExactFraction(BigRational::new_raw(numerator, denominator)))
    }
}

/// Read `value` as the shortest decimal with up to [`DECIMAL_DIGITS`]
/// fractional digits which parses back to exactly `value`.
fn from_decimal(value: f64) -> Option<ExactFraction> {
    let mut scale: i64 = 1;

    for _ in 0..=DECIMAL_DIGITS {
        let scaled = (value * scale as f64).round();

        if scaled.abs() > MAX_MAGNITUDE {
            return None;
        }
        // both operands are exact, so this is the nearest float to the decimal
        if scaled / scale as f64 == value {
            return ExactFraction::new(scaled as i64, scale).ok();
        }

        scale *= 10;
    }

    None
}

/// Walk the continued fraction expansion of `value`, accepting the first
/// convergent within [`TOLERANCE`].
fn from_convergents(value: f64) -> Option<ExactFraction> {
    let target = value.abs();
    let mut remainder = target;
    // the previous two convergents, h/k
    let (mut h_prev, mut h) = (0_i128, 1_i128);
    let (mut k_prev, mut k) = (1_i128, 0_i128);

    loop {
        let whole = remainder.floor();
        let term = whole as i128;

        let h_next = next_convergent(term, h, h_prev)?;
        let k_next = next_convergent(term, k, k_prev)?;
        if k_next > MAX_DENOMINATOR {
            return None;
        }

        h_prev = h;
        h = h_next;
        k_prev = k;
        k = k_next;

        let approximation = h as f64 / k as f64;

        if relative_eq!(
            approximation,
            target,
            epsilon = 0.0,
            max_relative = TOLERANCE
        ) {
            let numerator = if value < 0.0 { -h } else { h };
            return ExactFraction::new(numerator, k).ok();
        }

        let fractional_part = remainder - whole;
        if fractional_part == 0.0 {
            return None;
        }
        remainder = 1.0 / fractional_part;
    }
}

fn next_convergent(term: i128, current: i128, previous: i128) -> Option<i128> {
    term.checked_mul(current)?.checked_add(previous)
}

fn exact_sqrt(n: &BigInt) -> Option<BigInt> {
    let root = n.sqrt();

    if &root * &root == *n {
        Some(root)
    } else {
        None
    }
}

impl From<i32> for ExactFraction {
    fn from(value: i32) -> Self { ExactFraction::from_integer(value) }
}

impl From<i64> for ExactFraction {
    fn from(value: i64) -> Self { ExactFraction::from_integer(value) }
}

impl From<BigInt> for ExactFraction {
    fn from(value: BigInt) -> Self { ExactFraction::from_integer(value) }
}

impl Display for ExactFraction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator())
        } else {
            write!(f, "{}/{}", self.numerator(), self.denominator())
        }
    }
}

// Dividing by zero panics, the same as it does for integers. Use
// ExactFraction::checked_div() to avoid that.

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident) => {
        impl $trait for ExactFraction {
            type Output = ExactFraction;

            fn $method(self, rhs: ExactFraction) -> ExactFraction {
                ExactFraction($trait::$method(self.0, rhs.0))
            }
        }

        impl<'b> $trait<&'b ExactFraction> for ExactFraction {
            type Output = ExactFraction;

            fn $method(self, rhs: &'b ExactFraction) -> ExactFraction {
                ExactFraction($trait::$method(self.0, &rhs.0))
            }
        }

        impl<'a, 'b> $trait<&'b ExactFraction> for &'a ExactFraction {
            type Output = ExactFraction;

            fn $method(self, rhs: &'b ExactFraction) -> ExactFraction {
                ExactFraction($trait::$method(&self.0, &rhs.0))
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(Mul, mul);
impl_binary_op!(Div, div);

impl Neg for ExactFraction {
    type Output = ExactFraction;

    fn neg(self) -> ExactFraction { ExactFraction(-self.0) }
}

impl<'a> Neg for &'a ExactFraction {
    type Output = ExactFraction;

    fn neg(self) -> ExactFraction { ExactFraction(-&self.0) }
}
