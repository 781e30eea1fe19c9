use approx::abs_diff_eq;
use std::{
    collections::BTreeMap,
    iter::FromIterator,
};

/// How small a sum may be, relative to the largest value that went into it,
/// before it's treated as rounding noise (e.g. `0.1 + 0.2 - 0.3`).
pub const CANCELLATION_TOLERANCE: f64 = 64.0 * f64::EPSILON;

/// A single `coefficient * x^power` term.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Term {
    pub coefficient: f64,
    pub power: u32,
}

impl Term {
    pub const fn new(coefficient: f64, power: u32) -> Self {
        Term { coefficient, power }
    }

    pub const fn constant(value: f64) -> Self { Term::new(value, 0) }
}

/// A polynomial in canonical form, stored as a mapping from each power to its
/// (non-zero) coefficient.
#[derive(Debug, Default, Clone)]
pub struct CoefficientMap {
    coefficients: BTreeMap<u32, f64>,
    /// The largest magnitude ever added to each power.
    magnitudes: BTreeMap<u32, f64>,
}

impl CoefficientMap {
    pub fn new() -> Self { CoefficientMap::default() }

    /// The coefficient for a particular power, `0.0` if it isn't present.
    pub fn coefficient(&self, power: u32) -> f64 {
        self.coefficients.get(&power).copied().unwrap_or(0.0)
    }

    /// Add `coefficient` to the term for `power`.
    ///
    /// The term is dropped when the result is zero, or so close to zero
    /// compared with the values that were summed that the difference is
    /// only rounding error. A coefficient which is merely tiny (`1e-11`) is
    /// kept.
    pub fn accumulate(&mut self, power: u32, coefficient: f64) {
        let magnitude = self.magnitudes.entry(power).or_insert(0.0);
        *magnitude = magnitude.max(coefficient.abs());
        let scale = *magnitude;

        let total = self.coefficient(power) + coefficient;

        if is_negligible(total, scale) {
            self.coefficients.remove(&power);
        } else {
            self.coefficients.insert(power, total);
        }
    }

    /// The highest power with a non-zero coefficient.
    pub fn degree(&self) -> u32 {
        self.coefficients.keys().next_back().copied().unwrap_or(0)
    }

    /// Are all the coefficients zero (i.e. the polynomial is `0`)?
    pub fn is_zero(&self) -> bool { self.coefficients.is_empty() }

    pub fn len(&self) -> usize { self.coefficients.len() }

    pub fn is_empty(&self) -> bool { self.coefficients.is_empty() }

    /// Iterate over the `(power, coefficient)` pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.coefficients.iter().map(|(&power, &coeff)| (power, coeff))
    }

    /// Turn the polynomial back into a list of [`Term`]s.
    pub fn terms(&self) -> Vec<Term> {
        self.iter()
            .map(|(power, coefficient)| Term::new(coefficient, power))
            .collect()
    }

    /// Evaluate the polynomial at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.iter()
            .map(|(power, coefficient)| coefficient * x.powf(f64::from(power)))
            .sum()
    }
}

/// Two maps are equal when they hold the same coefficients, regardless of
/// how they were summed.
impl PartialEq for CoefficientMap {
    fn eq(&self, other: &CoefficientMap) -> bool {
        self.coefficients == other.coefficients
    }
}

impl FromIterator<Term> for CoefficientMap {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        let mut map = CoefficientMap::new();

        for term in iter {
            map.accumulate(term.power, term.coefficient);
        }

        map
    }
}

/// Is `value` indistinguishable from zero, given it was calculated from
/// numbers no bigger than `scale`?
pub(crate) fn is_negligible(value: f64, scale: f64) -> bool {
    abs_diff_eq!(value, 0.0, epsilon = scale * CANCELLATION_TOLERANCE)
}
