use crate::algebra::Term;
use smol_str::SmolStr;
use std::{
    fmt::{self, Display, Formatter},
    iter::Peekable,
    ops::Range,
};
use thiserror::Error;

/// Extract the [`Term`]s from one side of an equation.
pub fn extract_terms(src: &str) -> Result<Vec<Term>, ParseError> {
    let mut parser = Parser::new(src);
    let terms = parser.side()?;
    parser.finish()?;

    Ok(terms)
}

/// The result of parsing a whole equation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedEquation {
    pub(crate) left: Vec<Term>,
    pub(crate) right: Vec<Term>,
    pub(crate) variable: Option<char>,
}

/// A simple recursive descent parser (`LL(1)`) for turning polynomial text
/// into a list of terms.
///
/// The grammar:
///
/// ```text
/// equation       := side "=" side
///
/// side           := signed_term "+" side
///                 | signed_term "-" side
///                 | signed_term
///
/// signed_term    := "-" term
///                 | "+" term
///                 | term
///
/// term           := NUMBER "*" VARIABLE power
///                 | NUMBER VARIABLE power
///                 | NUMBER
///                 | VARIABLE power
///
/// power          := "^" "-"? NUMBER
///                 | <empty>
/// ```
///
/// Every `VARIABLE` in the text must be the same letter.
#[derive(Debug, Clone)]
pub(crate) struct Parser<'a> {
    src: &'a str,
    tokens: Peekable<Tokens<'a>>,
    variable: Option<char>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Parser {
            src,
            tokens: Tokens::new(src).peekable(),
            variable: None,
        }
    }

    /// Parse a full `left = right` equation.
    pub(crate) fn equation(mut self) -> Result<ParsedEquation, ParseError> {
        let mut equals_signs = self.src.match_indices('=').map(|(ix, _)| ix);

        match (equals_signs.next(), equals_signs.next()) {
            (None, _) => return Err(ParseError::MissingEquals),
            (Some(_), Some(index)) => {
                return Err(ParseError::MultipleEquals { index })
            },
            (Some(_), None) => {},
        }

        let left = self.side()?;

        let equals = self.advance()?;
        if equals.kind != TokenKind::Equals {
            return Err(unexpected_token(
                equals,
                &[TokenKind::Plus, TokenKind::Minus, TokenKind::Equals],
            ));
        }

        let right = self.side()?;
        let variable = self.finish()?;

        Ok(ParsedEquation {
            left,
            right,
            variable,
        })
    }

    /// Make sure all the input was consumed, returning the variable symbol
    /// (if there was one).
    pub(crate) fn finish(mut self) -> Result<Option<char>, ParseError> {
        match self.tokens.next() {
            None => Ok(self.variable),
            Some(Ok(token)) => Err(unexpected_token(
                token,
                &[TokenKind::Plus, TokenKind::Minus],
            )),
            Some(Err(e)) => Err(e),
        }
    }

    pub(crate) fn side(&mut self) -> Result<Vec<Term>, ParseError> {
        let mut terms = vec![self.signed_term(1.0)?];

        loop {
            let sign = match self.peek() {
                Some(TokenKind::Plus) => 1.0,
                Some(TokenKind::Minus) => -1.0,
                _ => return Ok(terms),
            };
            // skip past the operator
            let _ = self.advance()?;

            terms.push(self.signed_term(sign)?);
        }
    }

    fn peek(&mut self) -> Option<TokenKind> {
        self.tokens
            .peek()
            .and_then(|result| result.as_ref().ok())
            .map(|tok| tok.kind)
    }

    fn advance(&mut self) -> Result<Token<'a>, ParseError> {
        match self.tokens.next() {
            Some(result) => result,
            None => Err(ParseError::UnexpectedEndOfInput {
                index: self.src.len(),
            }),
        }
    }

    fn signed_term(&mut self, sign: f64) -> Result<Term, ParseError> {
        let sign = match self.peek() {
            Some(TokenKind::Plus) => {
                let _ = self.advance()?;
                sign
            },
            Some(TokenKind::Minus) => {
                let _ = self.advance()?;
                -sign
            },
            _ => sign,
        };

        let Term { coefficient, power } = self.term()?;

        Ok(Term::new(sign * coefficient, power))
    }

    fn term(&mut self) -> Result<Term, ParseError> {
        match self.peek() {
            Some(TokenKind::Number) => {
                let coefficient = self.number()?;

                match self.peek() {
                    Some(TokenKind::Times) => {
                        let _ = self.advance()?;
                        Ok(Term::new(coefficient, self.variable_and_power()?))
                    },
                    // implicit multiplication, "3x"
                    Some(TokenKind::Variable) => {
                        Ok(Term::new(coefficient, self.variable_and_power()?))
                    },
                    _ => Ok(Term::constant(coefficient)),
                }
            },
            Some(TokenKind::Variable) => {
                Ok(Term::new(1.0, self.variable_and_power()?))
            },
            _ => {
                // we couldn't parse the term, return a nice error
                let token = self.advance()?;
                Err(unexpected_token(
                    token,
                    &[TokenKind::Number, TokenKind::Variable],
                ))
            },
        }
    }

    fn number(&mut self) -> Result<f64, ParseError> {
        let token = self.advance()?;
        debug_assert_eq!(token.kind, TokenKind::Number);

        parse_number(&token)
    }

    fn variable_and_power(&mut self) -> Result<u32, ParseError> {
        let token = self.advance()?;

        if token.kind != TokenKind::Variable {
            return Err(unexpected_token(token, &[TokenKind::Variable]));
        }
        self.check_variable(&token)?;

        if self.peek() == Some(TokenKind::Caret) {
            let _ = self.advance()?;
            self.exponent()
        } else {
            Ok(1)
        }
    }

    fn check_variable(&mut self, token: &Token<'a>) -> Result<(), ParseError> {
        let symbol = token.symbol();

        match self.variable {
            None => {
                self.variable = Some(symbol);
                Ok(())
            },
            Some(first) if first == symbol => Ok(()),
            Some(first) => Err(ParseError::MultipleVariables {
                first,
                second: symbol,
                index: token.span.start,
            }),
        }
    }

    fn exponent(&mut self) -> Result<u32, ParseError> {
        let minus = if self.peek() == Some(TokenKind::Minus) {
            Some(self.advance()?)
        } else {
            None
        };

        let token = self.advance()?;
        if token.kind != TokenKind::Number {
            return Err(unexpected_token(token, &[TokenKind::Number]));
        }

        let start = minus.as_ref().map_or(token.span.start, |m| m.span.start);
        let span = start..token.span.end;
        let exponent = SmolStr::new(&self.src[span.clone()]);
        let value = parse_number(&token)?;

        if minus.is_some() || value.fract() != 0.0 {
            Err(ParseError::NonPolynomial { exponent, span })
        } else if value > f64::from(u32::MAX) {
            Err(ParseError::ExponentOutOfRange { exponent, span })
        } else {
            Ok(value as u32)
        }
    }
}

fn parse_number(token: &Token<'_>) -> Result<f64, ParseError> {
    match token.text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseError::InvalidNumber {
            text: token.text.into(),
            span: token.span.clone(),
        }),
    }
}

fn unexpected_token(
    token: Token<'_>,
    expected: &'static [TokenKind],
) -> ParseError {
    ParseError::UnexpectedToken {
        found: token.kind,
        text: token.text.into(),
        span: token.span,
        expected,
    }
}

/// Possible errors that may occur while parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("invalid character {character:?}")]
    InvalidCharacter { character: char, index: usize },
    #[error("the equation ended unexpectedly")]
    UnexpectedEndOfInput { index: usize },
    #[error("unexpected \"{text}\", expected {}", one_of(.expected))]
    UnexpectedToken {
        found: TokenKind,
        text: SmolStr,
        span: Range<usize>,
        expected: &'static [TokenKind],
    },
    #[error("\"{text}\" isn't a valid number")]
    InvalidNumber { text: SmolStr, span: Range<usize> },
    #[error(
        "the equation may only contain one variable, found both \"{first}\" and \"{second}\""
    )]
    MultipleVariables {
        first: char,
        second: char,
        index: usize,
    },
    #[error("\"{exponent}\" isn't a non-negative whole number, so this isn't a polynomial")]
    NonPolynomial { exponent: SmolStr, span: Range<usize> },
    #[error("the exponent \"{exponent}\" is too large")]
    ExponentOutOfRange { exponent: SmolStr, span: Range<usize> },
    #[error("an equation must contain an \"=\" sign")]
    MissingEquals,
    #[error("an equation must contain exactly one \"=\" sign")]
    MultipleEquals { index: usize },
}

impl ParseError {
    /// The byte offset the error was detected at, if known.
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::InvalidCharacter { index, .. }
            | ParseError::UnexpectedEndOfInput { index }
            | ParseError::MultipleVariables { index, .. }
            | ParseError::MultipleEquals { index } => Some(*index),
            ParseError::UnexpectedToken { span, .. }
            | ParseError::InvalidNumber { span, .. }
            | ParseError::NonPolynomial { span, .. }
            | ParseError::ExponentOutOfRange { span, .. } => Some(span.start),
            ParseError::MissingEquals => None,
        }
    }
}

fn one_of(expected: &[TokenKind]) -> String {
    match expected {
        [] => String::from("nothing"),
        [only] => only.to_string(),
        [init @ .., last] => {
            let init: Vec<_> = init.iter().map(ToString::to_string).collect();
            format!("{} or {}", init.join(", "), last)
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Tokens<'a> {
    src: &'a str,
    cursor: usize,
}

impl<'a> Tokens<'a> {
    fn new(src: &'a str) -> Self { Tokens { src, cursor: 0 } }

    fn rest(&self) -> &'a str { &self.src[self.cursor..] }

    fn peek(&self) -> Option<char> { self.rest().chars().next() }

    fn peek_second(&self) -> Option<char> { self.rest().chars().nth(1) }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    fn chomp(&mut self, kind: TokenKind) -> Option<Result<Token<'a>, ParseError>> {
        let start = self.cursor;
        self.advance()?;
        let end = self.cursor;

        Some(Ok(Token::from_text(self.src, start..end, kind)))
    }

    fn skip_digits(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }

            self.advance();
        }
    }

    fn chomp_number(&mut self) -> Token<'a> {
        let start = self.cursor;
        self.skip_digits();

        if self.peek() == Some('.') {
            // skip past the decimal
            self.advance();
            self.skip_digits();
        }

        let end = self.cursor;

        Token::from_text(self.src, start..end, TokenKind::Number)
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            return match self.peek()? {
                space if space.is_whitespace() => {
                    self.advance();
                    continue;
                },
                '+' => self.chomp(TokenKind::Plus),
                // people often paste unicode minus signs and dashes
                '-' | '\u{2212}' | '\u{2013}' => self.chomp(TokenKind::Minus),
                '*' => self.chomp(TokenKind::Times),
                '^' => self.chomp(TokenKind::Caret),
                '=' => self.chomp(TokenKind::Equals),
                'a'..='z' | 'A'..='Z' => self.chomp(TokenKind::Variable),
                '0'..='9' => Some(Ok(self.chomp_number())),
                // a leading dot like ".5" is a number, a lone "." isn't
                '.' if self.peek_second().map_or(false, |c| c.is_ascii_digit()) => {
                    Some(Ok(self.chomp_number()))
                },
                other => {
                    let index = self.cursor;
                    self.advance();

                    Some(Err(ParseError::InvalidCharacter {
                        character: other,
                        index,
                    }))
                },
            };
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Token<'a> {
    text: &'a str,
    span: Range<usize>,
    kind: TokenKind,
}

impl<'a> Token<'a> {
    fn from_text(
        src: &'a str,
        span: Range<usize>,
        kind: TokenKind,
    ) -> Self {
        Token {
            text: &src[span.clone()],
            span,
            kind,
        }
    }

    /// The letter used by a [`TokenKind::Variable`] token.
    fn symbol(&self) -> char { self.text.chars().next().unwrap_or_default() }
}

/// The kinds of token that can appear in an equation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TokenKind {
    Number,
    Variable,
    Plus,
    Minus,
    Times,
    Caret,
    Equals,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number => write!(f, "a number"),
            TokenKind::Variable => write!(f, "a variable"),
            TokenKind::Plus => write!(f, "\"+\""),
            TokenKind::Minus => write!(f, "\"-\""),
            TokenKind::Times => write!(f, "\"*\""),
            TokenKind::Caret => write!(f, "\"^\""),
            TokenKind::Equals => write!(f, "\"=\""),
        }
    }
}


#[cfg(test)]
mod parser_tests {
    use super::*;

    macro_rules! terms_test {
        ($name:ident, $src:expr, [$(($coefficient:expr, $power:expr)),* $(,)?]) => {
            #[test]
            fn $name() {
                let got = extract_terms($src).unwrap();

                let should_be = vec![$(Term::new($coefficient, $power)),*];
                assert_eq!(got, should_be);
            }
        };
    }

    terms_test!(bare_number, "42", [(42.0, 0)]);
    terms_test!(bare_variable, "x", [(1.0, 1)]);
    terms_test!(negative_variable, "-x", [(-1.0, 1)]);
    terms_test!(explicit_plus, "+x^2", [(1.0, 2)]);
    terms_test!(decimal_coefficient, "4.5 * X^1", [(4.5, 1)]);
    terms_test!(leading_dot_coefficient, ".25x - .5", [(0.25, 1), (-0.5, 0)]);
    terms_test!(implicit_multiplication, "3x^2", [(3.0, 2)]);
    terms_test!(implicit_multiplication_with_space, "3 x", [(3.0, 1)]);
    terms_test!(power_of_zero, "5 * X^0", [(5.0, 0)]);
    terms_test!(
        subject_format,
        "5 * X^0 + 4 * X^1 - 9.3 * X^2",
        [(5.0, 0), (4.0, 1), (-9.3, 2)]
    );
    terms_test!(
        free_form,
        "x^2 - 5*x + 6",
        [(1.0, 2), (-5.0, 1), (6.0, 0)]
    );
    terms_test!(double_negative, "x - -3", [(1.0, 1), (3.0, 0)]);
    terms_test!(whitespace_is_ignored, "  2 *x ^ 2  ", [(2.0, 2)]);
    terms_test!(unicode_minus_sign, "x \u{2212} 1", [(1.0, 1), (-1.0, 0)]);
    terms_test!(
        higher_powers_are_extracted,
        "x^3 + x^7",
        [(1.0, 3), (1.0, 7)]
    );
    terms_test!(integral_decimal_exponent, "x^2.0", [(1.0, 2)]);

    #[test]
    fn negative_exponents_arent_polynomials() {
        let got = extract_terms("3 * x^-2").unwrap_err();

        assert_eq!(
            got,
            ParseError::NonPolynomial {
                exponent: "-2".into(),
                span: 6..8,
            }
        );
        assert_eq!(got.position(), Some(6));
    }

    #[test]
    fn fractional_exponents_arent_polynomials() {
        let got = extract_terms("x^0.5").unwrap_err();

        assert_eq!(
            got,
            ParseError::NonPolynomial {
                exponent: "0.5".into(),
                span: 2..5,
            }
        );
    }

    #[test]
    fn huge_exponents_are_rejected() {
        let got = extract_terms("x^99999999999").unwrap_err();

        assert!(matches!(got, ParseError::ExponentOutOfRange { .. }));
    }

    #[test]
    fn two_different_variables() {
        let got = extract_terms("x + y").unwrap_err();

        assert_eq!(
            got,
            ParseError::MultipleVariables {
                first: 'x',
                second: 'y',
                index: 4,
            }
        );
    }

    #[test]
    fn variables_are_case_sensitive() {
        let got = extract_terms("x^2 + X").unwrap_err();

        assert!(matches!(got, ParseError::MultipleVariables { .. }));
    }

    #[test]
    fn dangling_operator() {
        let got = extract_terms("x +").unwrap_err();

        assert_eq!(got, ParseError::UnexpectedEndOfInput { index: 3 });
    }

    #[test]
    fn times_must_be_followed_by_the_variable() {
        let got = extract_terms("3 * 4").unwrap_err();

        assert_eq!(
            got,
            ParseError::UnexpectedToken {
                found: TokenKind::Number,
                text: "4".into(),
                span: 4..5,
                expected: &[TokenKind::Variable],
            }
        );
    }

    #[test]
    fn terms_must_be_separated_by_an_operator() {
        let got = extract_terms("x^2 3").unwrap_err();

        assert!(matches!(
            got,
            ParseError::UnexpectedToken {
                found: TokenKind::Number,
                ..
            }
        ));
        assert_eq!(got.position(), Some(4));
    }

    #[test]
    fn a_side_cant_contain_equals() {
        let got = extract_terms("x = 2").unwrap_err();

        assert!(matches!(
            got,
            ParseError::UnexpectedToken {
                found: TokenKind::Equals,
                ..
            }
        ));
    }

    #[test]
    fn invalid_character() {
        let got = extract_terms("2 / x").unwrap_err();

        assert_eq!(
            got,
            ParseError::InvalidCharacter {
                character: '/',
                index: 2
            }
        );
    }

    #[test]
    fn the_variable_is_shared_between_sides() {
        let got = Parser::new("x^2 = y").equation().unwrap_err();

        assert_eq!(
            got,
            ParseError::MultipleVariables {
                first: 'x',
                second: 'y',
                index: 6,
            }
        );
    }

    #[test]
    fn parse_a_full_equation() {
        let got = Parser::new("x^2 - 5*x = -6").equation().unwrap();

        assert_eq!(got.left, vec![Term::new(1.0, 2), Term::new(-5.0, 1)]);
        assert_eq!(got.right, vec![Term::constant(-6.0)]);
        assert_eq!(got.variable, Some('x'));
    }

    #[test]
    fn equations_without_a_variable() {
        let got = Parser::new("5 = 5").equation().unwrap();

        assert_eq!(got.variable, None);
    }

    #[test]
    fn equations_need_an_equals_sign() {
        let got = Parser::new("x^2 + 1").equation().unwrap_err();

        assert_eq!(got, ParseError::MissingEquals);
        assert_eq!(got.position(), None);
    }

    #[test]
    fn equations_need_exactly_one_equals_sign() {
        let got = Parser::new("x = 1 = 2").equation().unwrap_err();

        assert_eq!(got, ParseError::MultipleEquals { index: 6 });
    }

    #[test]
    fn sides_cant_be_empty() {
        let got = Parser::new("= 5").equation().unwrap_err();

        assert!(matches!(
            got,
            ParseError::UnexpectedToken {
                found: TokenKind::Equals,
                ..
            }
        ));
    }

    #[test]
    fn error_messages_list_the_expected_tokens() {
        let got = extract_terms("*").unwrap_err();

        assert_eq!(
            got.to_string(),
            "unexpected \"*\", expected a number or a variable"
        );
    }
}
