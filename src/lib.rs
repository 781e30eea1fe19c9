//! Solve polynomial equations of degree 2 or lower using exact rational
//! arithmetic.
//!
//! ```rust
//! use computor::{solve_equation, ExactFraction, Root, Solution};
//!
//! let solution = solve_equation("x^2 - 5*x + 6 = 0").unwrap();
//!
//! let two = Root::Exact(ExactFraction::from(2));
//! let three = Root::Exact(ExactFraction::from(3));
//! assert_eq!(solution, Solution::TwoDistinct(two, three));
//! ```

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod algebra;
mod display;
mod equations;
mod fraction;
mod solve;

pub use algebra::{
    extract_terms, reduce, CoefficientMap, ParseError, ReduceError, Term,
    TokenKind,
};
pub use display::{DisplayPolicy, NumberStyle, ReducedForm};
pub use equations::{parse_equation, solve_equation, Equation, Error};
pub use fraction::{ExactFraction, FractionError, DECIMAL_DIGITS, MAX_DENOMINATOR};
pub use solve::{solve, Root, Solution, SolveError};
