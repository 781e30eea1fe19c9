use crate::{
    algebra::{self, CoefficientMap, ParseError, Parser, ReduceError, Term},
    solve::{self, Solution, SolveError},
};
use std::str::FromStr;
use thiserror::Error;

/// A polynomial equation, `left = right`, in at most one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    left: Vec<Term>,
    right: Vec<Term>,
    variable: Option<char>,
}

impl Equation {
    pub fn left(&self) -> &[Term] { &self.left }

    pub fn right(&self) -> &[Term] { &self.right }

    /// The letter used as the unknown, if the equation mentions one.
    pub fn variable(&self) -> Option<char> { self.variable }

    /// Move everything to the left hand side, giving the reduced polynomial
    /// and its degree.
    pub fn reduce(&self) -> Result<(CoefficientMap, u32), ReduceError> {
        algebra::reduce(&self.left, &self.right)
    }

    pub fn solve(&self) -> Result<Solution, Error> {
        let (coefficients, degree) = self.reduce()?;
        let solution = solve::solve(&coefficients, degree)?;

        tracing::debug!(?solution, "Solved the equation");

        Ok(solution)
    }
}

impl FromStr for Equation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { parse_equation(s) }
}

/// Parse an equation like `"5 * X^0 + 4 * X^1 = 4 * X^0"`.
pub fn parse_equation(src: &str) -> Result<Equation, ParseError> {
    let parsed = Parser::new(src).equation()?;

    tracing::debug!(
        left = ?parsed.left,
        right = ?parsed.right,
        variable = ?parsed.variable,
        "Parsed the equation"
    );

    Ok(Equation {
        left: parsed.left,
        right: parsed.right,
        variable: parsed.variable,
    })
}

/// Parse, reduce and solve an equation in one go.
pub fn solve_equation(src: &str) -> Result<Solution, Error> {
    parse_equation(src)?.solve()
}

/// Anything that can go wrong while solving an equation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Reduce(#[from] ReduceError),
    #[error(transparent)]
    Solve(#[from] SolveError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fraction::ExactFraction, solve::Root};

    #[test]
    fn parse_from_a_string() {
        let got: Equation = "5 * X^0 + 4 * X^1 = 4 * X^0".parse().unwrap();

        assert_eq!(got.left(), &[Term::constant(5.0), Term::new(4.0, 1)]);
        assert_eq!(got.right(), &[Term::constant(4.0)]);
        assert_eq!(got.variable(), Some('X'));
    }

    #[test]
    fn solve_the_subject_linear_example() {
        let got = solve_equation("5 * X^0 + 4 * X^1 = 4 * X^0").unwrap();

        let should_be = ExactFraction::new(-1, 4).unwrap();
        assert_eq!(got, Solution::Unique(Root::Exact(should_be)));
    }

    #[test]
    fn tiny_coefficients_still_count() {
        let got = solve_equation("0.00000000001 * x = 1").unwrap();

        assert_ne!(got, Solution::NoSolution);
        assert_eq!(got.roots().len(), 1);
    }

    #[test]
    fn an_equation_without_a_variable_is_fine() {
        let equation = parse_equation("5 = 5").unwrap();

        assert_eq!(equation.variable(), None);
        assert_eq!(equation.solve().unwrap(), Solution::AllReals);
    }

    #[test]
    fn the_degree_is_checked_after_reducing() {
        let got = solve_equation("8 * X^0 - 6 * X^1 + 0 * X^2 - 5.6 * X^3 = 3 * X^0")
            .unwrap_err();

        match got {
            Error::Reduce(ReduceError::UnsupportedDegree { degree, .. }) => {
                assert_eq!(degree, 3)
            },
            other => panic!("Unexpected error: {:?}", other),
        }
    }

    #[test]
    fn parse_errors_are_propagated() {
        let got = solve_equation("x^2 + y = 0").unwrap_err();

        assert_eq!(
            got,
            Error::Parse(ParseError::MultipleVariables {
                first: 'x',
                second: 'y',
                index: 6,
            })
        );
        assert_eq!(
            got.to_string(),
            "the equation may only contain one variable, found both \"x\" and \"y\""
        );
    }

    #[test]
    fn an_equals_sign_is_required() {
        let got = solve_equation("x^2 + 1").unwrap_err();

        assert_eq!(got, Error::Parse(ParseError::MissingEquals));
    }
}
