use crate::{
    algebra::{is_negligible, CoefficientMap, MAX_DEGREE},
    fraction::{ExactFraction, FractionError},
};
use arrayvec::ArrayVec;
use std::cmp::Ordering;
use thiserror::Error;

/// Solve the polynomial equation `coefficients = 0`.
///
/// The `degree` is the one calculated by [`crate::reduce()`]. If the leading
/// coefficient turns out to be zero the equation is solved as if it had a
/// lower degree (i.e. `0*x^2 + 2*x + 1 = 0` is treated as linear).
///
/// Coefficients are converted to [`ExactFraction`]s so the roots can be
/// calculated exactly. If a coefficient needs more precision than
/// [`ExactFraction::from_f64()`] allows we fall back to floating point and
/// the roots are reported as [`Root::Approximate`].
pub fn solve(
    coefficients: &CoefficientMap,
    degree: u32,
) -> Result<Solution, SolveError> {
    if degree > MAX_DEGREE {
        return Err(SolveError::UnsupportedDegree { degree });
    }

    let actual = coefficients.degree();
    if actual > degree {
        return Err(SolveError::InconsistentDegree {
            expected: degree,
            actual,
        });
    }
    if actual < degree {
        tracing::debug!(
            degree,
            actual,
            "The leading coefficient is zero, demoting the equation"
        );
    }

    let a = coefficients.coefficient(2);
    let b = coefficients.coefficient(1);
    let c = coefficients.coefficient(0);

    match exact_coefficients(a, b, c) {
        Ok((a, b, c)) => match solve_exactly(a, b, c, actual) {
            Ok(solution) => return Ok(solution),
            Err(e) => tracing::debug!(
                error = %e,
                "Unable to solve exactly, falling back to floating point"
            ),
        },
        Err(e) => tracing::debug!(
            error = %e,
            "The coefficients can't be represented as fractions"
        ),
    }

    Ok(solve_approximately(a, b, c, actual))
}

fn exact_coefficients(
    a: f64,
    b: f64,
    c: f64,
) -> Result<(ExactFraction, ExactFraction, ExactFraction), FractionError> {
    Ok((
        ExactFraction::from_f64(a)?,
        ExactFraction::from_f64(b)?,
        ExactFraction::from_f64(c)?,
    ))
}

/// Solve `a*x^2 + b*x + c = 0` using exact arithmetic.
fn solve_exactly(
    a: ExactFraction,
    b: ExactFraction,
    c: ExactFraction,
    degree: u32,
) -> Result<Solution, FractionError> {
    match degree {
        0 => Ok(constant(c.is_zero())),
        1 => {
            let root = (-c).checked_div(&b)?;
            Ok(Solution::Unique(Root::Exact(root)))
        },
        _ => {
            let discriminant = &b * &b - ExactFraction::from(4) * &a * &c;
            let two_a = &a + &a;
            let minus_b = -&b;

            tracing::debug!(%discriminant, "Calculated the discriminant");

            match discriminant.cmp(&ExactFraction::zero()) {
                Ordering::Less => Ok(Solution::NoSolution),
                Ordering::Equal => {
                    let root = minus_b.checked_div(&two_a)?;
                    Ok(Solution::Repeated(Root::Exact(root)))
                },
                Ordering::Greater => match discriminant.sqrt() {
                    Some(sqrt) => {
                        let first = (&minus_b - &sqrt).checked_div(&two_a)?;
                        let second = (&minus_b + &sqrt).checked_div(&two_a)?;

                        Ok(Solution::two_distinct(
                            Root::Exact(first),
                            Root::Exact(second),
                        ))
                    },
                    None => {
                        let (first, second) = quadratic_roots(
                            a.to_f64(),
                            b.to_f64(),
                            c.to_f64(),
                            discriminant.to_f64(),
                        );

                        Ok(Solution::two_distinct(
                            Root::Irrational(first),
                            Root::Irrational(second),
                        ))
                    },
                },
            }
        },
    }
}

/// Solve `a*x^2 + b*x + c = 0` using plain floating point arithmetic.
fn solve_approximately(a: f64, b: f64, c: f64, degree: u32) -> Solution {
    match degree {
        // the map never stores a zero coefficient
        0 => constant(c == 0.0),
        1 => Solution::Unique(Root::Approximate(-c / b)),
        _ => {
            let discriminant = b * b - 4.0 * a * c;
            let scale = (b * b).max((4.0 * a * c).abs());
            tracing::debug!(discriminant, "Calculated the discriminant");

            if is_negligible(discriminant, scale) {
                Solution::Repeated(Root::Approximate(-b / (2.0 * a)))
            } else if discriminant < 0.0 {
                Solution::NoSolution
            } else {
                let (first, second) = quadratic_roots(a, b, c, discriminant);
                Solution::two_distinct(
                    Root::Approximate(first),
                    Root::Approximate(second),
                )
            }
        },
    }
}

fn constant(is_always_true: bool) -> Solution {
    if is_always_true {
        Solution::AllReals
    } else {
        Solution::NoSolution
    }
}

/// The two roots of a quadratic with a positive discriminant.
///
/// The textbook `(-b ± √Δ) / 2a` loses precision when `b*b` is much larger
/// than `4ac` because one of the roots subtracts two nearly-equal numbers.
/// Instead we calculate the root without cancellation and use `x1 * x2 = c/a`
/// to get the other.
fn quadratic_roots(a: f64, b: f64, c: f64, discriminant: f64) -> (f64, f64) {
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());

    (q / a, c / q)
}

/// The result of solving an equation.
#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    /// The equation is never true (including when it only has complex
    /// roots).
    NoSolution,
    /// The equation holds for every real number (e.g. `5 = 5`).
    AllReals,
    /// A linear equation's single root.
    Unique(Root),
    /// A quadratic's two real roots, in ascending order.
    TwoDistinct(Root, Root),
    /// A quadratic with a zero discriminant.
    Repeated(Root),
}

impl Solution {
    fn two_distinct(first: Root, second: Root) -> Self {
        if second.cmp_value(&first) == Ordering::Less {
            Solution::TwoDistinct(second, first)
        } else {
            Solution::TwoDistinct(first, second)
        }
    }

    /// All the roots, in ascending order.
    pub fn roots(&self) -> ArrayVec<[Root; 2]> {
        let mut roots = ArrayVec::new();

        match self {
            Solution::NoSolution | Solution::AllReals => {},
            Solution::Unique(root) | Solution::Repeated(root) => {
                roots.push(root.clone())
            },
            Solution::TwoDistinct(first, second) => {
                roots.push(first.clone());
                roots.push(second.clone());
            },
        }

        roots
    }

    /// Were all the roots calculated exactly?
    pub fn is_exact(&self) -> bool { self.roots().iter().all(Root::is_exact) }
}

/// A root of the equation.
///
/// Exact and approximate values are kept apart so nobody accidentally
/// presents an approximation as if it were exact.
#[derive(Debug, Clone, PartialEq)]
pub enum Root {
    Exact(ExactFraction),
    /// The polynomial is known exactly, but its discriminant isn't a perfect
    /// square so the root is irrational.
    Irrational(f64),
    /// The polynomial's coefficients couldn't be represented exactly, so
    /// everything was done with floating point arithmetic.
    Approximate(f64),
}

impl Root {
    pub fn to_f64(&self) -> f64 {
        match *self {
            Root::Exact(ref fraction) => fraction.to_f64(),
            Root::Irrational(value) | Root::Approximate(value) => value,
        }
    }

    pub fn as_exact(&self) -> Option<&ExactFraction> {
        match self {
            Root::Exact(fraction) => Some(fraction),
            _ => None,
        }
    }

    pub fn is_exact(&self) -> bool { matches!(self, Root::Exact(_)) }

    fn cmp_value(&self, other: &Root) -> Ordering {
        match (self, other) {
            (Root::Exact(left), Root::Exact(right)) => left.cmp(right),
            _ => self
                .to_f64()
                .partial_cmp(&other.to_f64())
                .unwrap_or(Ordering::Equal),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error(
        "the polynomial degree is {degree}, only degrees up to 2 can be solved"
    )]
    UnsupportedDegree { degree: u32 },
    #[error("expected a polynomial of degree {expected}, found degree {actual}")]
    InconsistentDegree { expected: u32, actual: u32 },
}
