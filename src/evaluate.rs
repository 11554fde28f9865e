use crate::formula::{Assignment, Clause, Cnf, Literal, VariableSet};

/// Truth values looked up through the variable set they are aligned with.
#[derive(Clone, Copy)]
pub struct Valuation<'a> {
    variables: &'a VariableSet,
    assignment: &'a Assignment,
}

impl<'a> Valuation<'a> {
    /// # Panics
    ///
    /// Panics when the assignment is not aligned with `variables`.
    pub fn new(variables: &'a VariableSet, assignment: &'a Assignment) -> Self {
        assert_eq!(variables.len(), assignment.len());

        Valuation {
            variables,
            assignment,
        }
    }
}

pub trait Evaluate {
    fn evaluate(&self, valuation: Valuation<'_>) -> bool;
}

impl Evaluate for Literal {
    /// A literal over a variable outside the valuation is never satisfied.
    fn evaluate(&self, valuation: Valuation<'_>) -> bool {
        valuation
            .variables
            .position(self.variable())
            .and_then(|pos| valuation.assignment.get(pos))
            .map_or(false, |value| value == self.positive())
    }
}

impl Evaluate for Clause {
    fn evaluate(&self, valuation: Valuation<'_>) -> bool {
        self.iter().any(|literal| literal.evaluate(valuation))
    }
}

impl Evaluate for Cnf {
    fn evaluate(&self, valuation: Valuation<'_>) -> bool {
        self.clauses()
            .iter()
            .all(|clause| clause.evaluate(valuation))
    }
}

impl Cnf {
    /// Checks whether `assignment`, aligned with this formula's variables,
    /// satisfies every clause.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.evaluate(Valuation::new(self.variables(), assignment))
    }
}
