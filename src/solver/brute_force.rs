use crate::{
    evaluate::{Evaluate, Valuation},
    formula::{Cnf, Model},
};

use super::{enumerator::Assignments, Solver};

/// Exhaustive search over every assignment in enumeration order.
///
/// There is no propagation or pruning, so the worst case evaluates all `2^n`
/// assignments against every literal of the formula.
#[derive(Debug)]
pub struct BruteForceSolver {
    formula: Cnf,
}

impl Solver for BruteForceSolver {
    fn new(formula: Cnf) -> Self {
        BruteForceSolver { formula }
    }

    /// # Panics
    ///
    /// Panics when the formula has more than [`Assignments::MAX_VARIABLES`] variables.
    fn solve(self) -> Option<Model> {
        let num_variables = self.formula.num_variables();
        let mut assignments = Assignments::new(num_variables);
        debug!(
            "Searching {} assignments over {} variables ({} clauses, {} literals)",
            assignments.size_hint().0,
            num_variables,
            self.formula.clauses().len(),
            self.formula.num_literals()
        );

        let found = loop {
            let index = assignments.index();
            let assignment = match assignments.next() {
                Some(assignment) => assignment,
                None => break None,
            };

            let satisfied = self
                .formula
                .evaluate(Valuation::new(self.formula.variables(), &assignment));
            trace!("Assignment #{} satisfied: {}", index, satisfied);

            if satisfied {
                debug!("Found a satisfying assignment at index {}", index);
                break Some(assignment);
            }
        };

        if found.is_none() {
            debug!("All assignments exhausted");
        }

        found.map(|assignment| Model::new(self.formula, assignment))
    }
}
