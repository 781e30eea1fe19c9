//! Presenting equations and their solutions to a human.

use crate::{
    algebra::CoefficientMap,
    fraction::ExactFraction,
    solve::{Root, Solution},
};
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use std::fmt::{self, Display, Formatter};

/// How exact, non-integer roots should be written.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NumberStyle {
    /// Use a decimal when it is exact (`0.25`), otherwise a fraction (`1/3`).
    Auto,
    /// Always write decimals, rounding when necessary.
    Decimal,
    /// Always write fractions.
    Fraction,
}

impl Default for NumberStyle {
    fn default() -> Self { NumberStyle::Auto }
}

/// Decides how each [`Root`] gets displayed.
///
/// Roots which aren't exact are always written as decimals rounded to
/// `precision` fractional digits.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DisplayPolicy {
    pub style: NumberStyle,
    pub precision: usize,
}

impl DisplayPolicy {
    pub const DEFAULT_PRECISION: usize = 6;

    pub fn new(style: NumberStyle, precision: usize) -> Self {
        DisplayPolicy { style, precision }
    }

    pub fn format_root(&self, root: &Root) -> String {
        match *root {
            Root::Exact(ref fraction) => self.format_exact(fraction),
            Root::Irrational(value) | Root::Approximate(value) => {
                self.format_decimal(value)
            },
        }
    }

    /// Format each of the solution's roots, in order.
    pub fn format_solution(&self, solution: &Solution) -> Vec<String> {
        solution
            .roots()
            .iter()
            .map(|root| self.format_root(root))
            .collect()
    }

    fn format_exact(&self, fraction: &ExactFraction) -> String {
        if fraction.is_integer() {
            return fraction.to_string();
        }

        match self.style {
            NumberStyle::Fraction => fraction.to_string(),
            NumberStyle::Decimal => exact_decimal(fraction)
                .unwrap_or_else(|| self.format_decimal(fraction.to_f64())),
            NumberStyle::Auto => {
                exact_decimal(fraction).unwrap_or_else(|| fraction.to_string())
            },
        }
    }

    fn format_decimal(&self, value: f64) -> String {
        let rounded = format!("{:.*}", self.precision, value);

        let trimmed = if rounded.contains('.') {
            rounded.trim_end_matches('0').trim_end_matches('.')
        } else {
            rounded.as_str()
        };

        if trimmed == "-0" {
            String::from("0")
        } else {
            trimmed.to_string()
        }
    }
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        DisplayPolicy::new(NumberStyle::default(), DisplayPolicy::DEFAULT_PRECISION)
    }
}

/// Write a fraction as a decimal, if its expansion terminates.
fn exact_decimal(fraction: &ExactFraction) -> Option<String> {
    let two = BigInt::from(2);
    let five = BigInt::from(5);
    let mut remaining = fraction.denominator().clone();
    let mut twos = 0;
    let mut fives = 0;

    while (&remaining % &two).is_zero() {
        remaining /= &two;
        twos += 1;
    }
    while (&remaining % &five).is_zero() {
        remaining /= &five;
        fives += 1;
    }

    if !remaining.is_one() {
        return None;
    }

    let digits: u32 = std::cmp::max(twos, fives);
    let scale = BigInt::from(10).pow(digits);
    let scaled = fraction.numerator() * (&scale / fraction.denominator());

    let sign = if scaled.is_negative() { "-" } else { "" };
    let magnitude = scaled.abs();

    Some(format!(
        "{}{}.{:0>width$}",
        sign,
        &magnitude / &scale,
        (&magnitude % &scale).to_string(),
        width = digits as usize
    ))
}

/// Displays a [`CoefficientMap`] as `a * X^0 + b * X^1 + c * X^2 = 0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ReducedForm<'a> {
    coefficients: &'a CoefficientMap,
    variable: char,
}

impl<'a> ReducedForm<'a> {
    /// Equations without a variable are written in terms of `X`.
    pub fn new(coefficients: &'a CoefficientMap, variable: Option<char>) -> Self {
        ReducedForm {
            coefficients,
            variable: variable.unwrap_or('X'),
        }
    }
}

impl<'a> Display for ReducedForm<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.coefficients.is_zero() {
            return write!(f, "0 * {}^0 = 0", self.variable);
        }

        for (i, (power, coefficient)) in self.coefficients.iter().enumerate() {
            let sign = match (i, coefficient < 0.0) {
                (0, true) => "-",
                (0, false) => "",
                (_, true) => " - ",
                (_, false) => " + ",
            };

            write!(
                f,
                "{}{} * {}^{}",
                sign,
                coefficient.abs(),
                self.variable,
                power
            )?;
        }

        write!(f, " = 0")
    }
}
