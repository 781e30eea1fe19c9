//! Solve polynomial equations from the command line.
//!
//! ```text
//! $ computor "5 * X^0 + 4 * X^1 - 9.3 * X^2 = 1 * X^0"
//! Reduced form: 4 * X^0 + 4 * X^1 - 9.3 * X^2 = 0
//! Polynomial degree: 2
//! Discriminant is strictly positive, the two solutions are:
//! -0.475131
//! 0.905239
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use computor::{
    CoefficientMap, DisplayPolicy, Equation, NumberStyle, ParseError,
    ReduceError, ReducedForm, Root, Solution,
};
use std::io::{BufRead, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Solve polynomial equations of degree 2 or lower.
#[derive(Debug, Parser)]
#[command(name = "computor", version, about)]
struct Args {
    /// The equation to solve (e.g. "5 * X^0 + 4 * X^1 = 4 * X^0"). When
    /// omitted, equations are read from stdin, one per line.
    equation: Option<String>,
    /// How exact roots should be written.
    #[arg(long, value_enum, default_value_t = Style::Auto)]
    style: Style,
    /// Decimal places to use for roots which can't be written exactly.
    #[arg(long, default_value_t = DisplayPolicy::DEFAULT_PRECISION)]
    precision: usize,
    /// Print more log messages (repeat for even more).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Style {
    /// Decimals when they are exact, fractions otherwise.
    Auto,
    Decimal,
    Fraction,
}

impl From<Style> for NumberStyle {
    fn from(style: Style) -> NumberStyle {
        match style {
            Style::Auto => NumberStyle::Auto,
            Style::Decimal => NumberStyle::Decimal,
            Style::Fraction => NumberStyle::Fraction,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let policy = DisplayPolicy::new(args.style.into(), args.precision);

    let all_solved = match args.equation {
        Some(ref equation) => report(equation, &policy),
        None => {
            let stdin = std::io::stdin();
            let mut all_solved = true;

            for line in BufReader::new(stdin.lock()).lines() {
                let line = line.context("Unable to read from stdin")?;
                if line.trim().is_empty() {
                    continue;
                }

                all_solved &= report(&line, &policy);
                println!();
            }

            all_solved
        },
    };

    if !all_solved {
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

/// Solve an equation and print the results, returning `false` if it couldn't
/// be solved.
fn report(src: &str, policy: &DisplayPolicy) -> bool {
    tracing::info!(equation = src, "Solving");

    let equation: Equation = match src.parse() {
        Ok(equation) => equation,
        Err(e) => {
            print_parse_error(src, &e);
            return false;
        },
    };

    let (coefficients, degree) = match equation.reduce() {
        Ok(reduced) => reduced,
        Err(ReduceError::UnsupportedDegree { degree, reduced }) => {
            print_reduced_form(&reduced, equation.variable(), degree);
            println!(
                "The polynomial degree is strictly greater than 2, I can't solve."
            );
            return false;
        },
    };

    print_reduced_form(&coefficients, equation.variable(), degree);

    match computor::solve(&coefficients, degree) {
        Ok(solution) => {
            print_solution(&solution, coefficients.degree(), policy);
            true
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            false
        },
    }
}

fn print_reduced_form(
    coefficients: &CoefficientMap,
    variable: Option<char>,
    degree: u32,
) {
    println!("Reduced form: {}", ReducedForm::new(coefficients, variable));
    println!("Polynomial degree: {}", degree);
}

fn print_solution(solution: &Solution, degree: u32, policy: &DisplayPolicy) {
    let headline = match solution {
        Solution::AllReals => "Any real number is a solution.",
        Solution::NoSolution if degree == 2 => {
            "Discriminant is strictly negative, there is no real solution."
        },
        Solution::NoSolution => "No solution.",
        Solution::Unique(_) => "The solution is:",
        Solution::Repeated(_) => "Discriminant is zero, the solution is:",
        Solution::TwoDistinct(..) => {
            "Discriminant is strictly positive, the two solutions are:"
        },
    };
    println!("{}", headline);

    for root in solution.roots() {
        match root {
            Root::Approximate(_) => {
                println!("{} (approximate)", policy.format_root(&root))
            },
            _ => println!("{}", policy.format_root(&root)),
        }
    }
}

fn print_parse_error(src: &str, error: &ParseError) {
    eprintln!("Error: {}", error);

    if let Some(prefix) = error.position().and_then(|pos| src.get(..pos)) {
        let column = prefix.chars().count();
        eprintln!("    {}", src);
        eprintln!("    {}^", " ".repeat(column));
    }
}
