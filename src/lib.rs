#[macro_use]
extern crate log;

pub mod evaluate;
pub mod formula;
pub mod parser;
pub mod prelude;
pub mod report;
pub mod solver;


use std::path::Path;

use crate::{
    formula::{Assignment, Cnf, Model},
    parser::ParseOutcome,
    prelude::*,
    solver::{enumerator::Assignments, BruteForceSolver, Solver},
};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Failed to parse CNF"))]
    ParserError { source: parser::Error },
    #[snafu(display(
        "Formula has {} variables, but at most {} can be enumerated",
        count,
        Assignments::MAX_VARIABLES
    ))]
    TooManyVariables { count: usize },
}

/// Outcome of a single solve call.
#[derive(Debug)]
pub enum Solution {
    Sat(Model),
    Unsat,
}

impl Solution {
    pub fn is_sat(&self) -> bool {
        matches!(self, Solution::Sat(_))
    }

    /// The witness, aligned with the formula's sorted variables.
    /// Present only when the formula is satisfiable.
    pub fn satisfying_assignment(&self) -> Option<&Assignment> {
        match self {
            Solution::Sat(model) => Some(model.assignment()),
            Solution::Unsat => None,
        }
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            Solution::Sat(model) => Some(model),
            Solution::Unsat => None,
        }
    }
}

fn solve_outcome(outcome: ParseOutcome) -> Result<Solution, Error> {
    solve_cnf(outcome.into_cnf())
}

/// Decides satisfiability of an already parsed formula by exhaustive search.
pub fn solve_cnf(formula: Cnf) -> Result<Solution, Error> {
    let count = formula.num_variables();
    ensure!(count <= Assignments::MAX_VARIABLES, TooManyVariables { count });

    Ok(match BruteForceSolver::new(formula).solve() {
        Some(model) => Solution::Sat(model),
        None => Solution::Unsat,
    })
}

/// Decides satisfiability of a formula given as DIMACS CNF text.
///
/// A problem line that disagrees with the clause block does not fail the call:
/// the formula is replaced by the empty formula, so the result is satisfiable
/// with an empty witness.
pub fn solve(formula_text: &str) -> Result<Solution, Error> {
    solve_outcome(parser::parse_str(formula_text).context(ParserError)?)
}

/// Same as [`solve`], reading the DIMACS text from `path`.
pub fn solve_file(path: impl AsRef<Path>) -> Result<Solution, Error> {
    solve_outcome(parser::parse_file(path).context(ParserError)?)
}
