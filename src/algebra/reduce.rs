use crate::algebra::{CoefficientMap, Term};
use thiserror::Error;

/// The highest degree we know how to solve.
pub const MAX_DEGREE: u32 = 2;

/// Move everything to the left hand side of `left = right` and combine like
/// terms, giving the reduced polynomial and its degree.
pub fn reduce(
    left: &[Term],
    right: &[Term],
) -> Result<(CoefficientMap, u32), ReduceError> {
    let negated_right = right
        .iter()
        .map(|term| Term::new(-term.coefficient, term.power));
    let reduced: CoefficientMap =
        left.iter().copied().chain(negated_right).collect();
    let degree = reduced.degree();

    tracing::debug!(?reduced, degree, "Reduced the equation");

    if degree > MAX_DEGREE {
        return Err(ReduceError::UnsupportedDegree { degree, reduced });
    }

    Ok((reduced, degree))
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReduceError {
    /// The polynomial's degree is too high to solve. The reduced form is
    /// kept around so it can still be shown to the user.
    #[error("the polynomial degree is {degree}, only degrees up to 2 can be solved")]
    UnsupportedDegree {
        degree: u32,
        reduced: CoefficientMap,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::extract_terms;

    fn reduce_str(left: &str, right: &str) -> Result<(CoefficientMap, u32), ReduceError> {
        reduce(&extract_terms(left).unwrap(), &extract_terms(right).unwrap())
    }

    #[test]
    fn move_everything_to_the_left() {
        let (got, degree) =
            reduce_str("5 * X^0 + 4 * X^1 - 9.3 * X^2", "1 * X^0").unwrap();

        assert_eq!(degree, 2);
        assert_eq!(got.coefficient(0), 4.0);
        assert_eq!(got.coefficient(1), 4.0);
        assert_eq!(got.coefficient(2), -9.3);
    }

    #[test]
    fn like_terms_are_combined() {
        let (got, degree) = reduce_str("x + 2x + 3", "x^2 + 1").unwrap();

        assert_eq!(degree, 2);
        assert_eq!(got.terms(), vec![
            Term::new(2.0, 0),
            Term::new(3.0, 1),
            Term::new(-1.0, 2),
        ]);
    }

    #[test]
    fn everything_cancels_out() {
        let (got, degree) = reduce_str("x^2 + 3", "3 + x^2").unwrap();

        assert_eq!(degree, 0);
        assert!(got.is_zero());
        assert_eq!(got.coefficient(0), 0.0);
    }

    #[test]
    fn a_zero_leading_coefficient_lowers_the_degree() {
        let (got, degree) = reduce_str("0*x^2 + 2*x + 1", "0").unwrap();

        assert_eq!(degree, 1);
        assert_eq!(got.coefficient(2), 0.0);
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn cancelled_higher_powers_are_fine() {
        let (_, degree) = reduce_str("x^3 + x", "x^3").unwrap();

        assert_eq!(degree, 1);
    }

    #[test]
    fn degree_three_is_unsupported() {
        let got = reduce_str("x^3 + 1", "0").unwrap_err();

        let ReduceError::UnsupportedDegree { degree, reduced } = got;
        assert_eq!(degree, 3);
        assert_eq!(reduced.coefficient(3), 1.0);
        assert_eq!(reduced.coefficient(0), 1.0);
    }

    #[test]
    fn reduction_is_idempotent() {
        let (first, _) = reduce_str("4x^2 - 3.5x + 7", "2 - x").unwrap();

        let (second, _) = reduce(&first.terms(), &[]).unwrap();

        assert_eq!(second, first);
    }
}
