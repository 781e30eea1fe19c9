//! Turning equation text into a reduced polynomial.

mod parse;
mod polynomial;
mod reduce;

pub(crate) use parse::Parser;
pub use parse::{extract_terms, ParseError, TokenKind};
pub use polynomial::{CoefficientMap, Term, CANCELLATION_TOLERANCE};
pub(crate) use polynomial::is_negligible;
pub use reduce::{reduce, ReduceError, MAX_DEGREE};
