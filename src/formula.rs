/*!
A module to represent conjunctive normal form formula.
*/

use std::{convert::TryFrom, fmt::Display, iter::FromIterator, num::NonZeroU32, str::FromStr};

use typed_index_collections::TiVec;

use crate::prelude::*;

#[derive(Debug, Snafu)]
pub enum VariableParseError {
    #[snafu(display("Failed to parse Variable ID"))]
    ParseIntError { source: std::num::ParseIntError },
    #[snafu(display(
        "Variable ID {} is out of range (must be within 1 to {})",
        num,
        Variable::MAX_VARIABLE_ID
    ))]
    RangeError { num: usize },
}

/// Newtype wrapper for variable ID.
/// Invariant: 0 < ID <= MAX_VARIABLE_ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(NonZeroU32);

impl Variable {
    pub const MAX_VARIABLE_ID: usize = std::u32::MAX as usize;

    /// Creates a variable from its DIMACS identifier.
    /// Returns `None` if the identifier is zero or out of range.
    pub fn new(id: usize) -> Option<Self> {
        let id = u32::try_from(id).ok()?;
        Some(Variable(NonZeroU32::new(id)?))
    }

    pub fn id(&self) -> u32 {
        self.0.get()
    }
}

impl FromStr for Variable {
    type Err = VariableParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num = s.parse::<usize>().context(ParseIntError)?;
        Variable::new(num).context(RangeError { num })
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    id: Variable,
    positive: bool,
}

impl Literal {
    pub fn new(id: Variable, positive: bool) -> Self {
        Literal { id, positive }
    }

    pub fn variable(&self) -> Variable {
        self.id
    }

    pub fn positive(&self) -> bool {
        self.positive
    }
}

impl FromStr for Literal {
    type Err = VariableParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (positive, id) = match s.strip_prefix('-') {
            Some(rest) => (false, rest.parse()?),
            None => (true, s.parse()?),
        };

        Ok(Literal { id, positive })
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", if self.positive { "" } else { "¬" }, self.id)
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            id: self.id,
            positive: !self.positive,
        }
    }
}

/// Disjunction of literals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(literals: Vec<Literal>) -> Self {
        Self { literals }
    }

    pub fn num_literals(&self) -> usize {
        self.literals.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Literal> + '_ {
        self.literals.iter().copied()
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;

        let mut iter = self.literals.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for literal in iter {
            write!(f, " ∨ {}", literal)?;
        }

        write!(f, ")")?;

        Ok(())
    }
}

/// Position of a variable inside a [`VariableSet`] and therefore inside an
/// [`Assignment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VariablePos(usize);

impl From<usize> for VariablePos {
    fn from(index: usize) -> Self {
        VariablePos(index)
    }
}

impl From<VariablePos> for usize {
    fn from(pos: VariablePos) -> Self {
        pos.0
    }
}

/// Distinct variables of a formula, sorted ascending.
///
/// The variable stored at position `i` is the one an [`Assignment`] describes at
/// position `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    variables: TiVec<VariablePos, Variable>,
}

impl VariableSet {
    pub fn from_clauses(clauses: &[Clause]) -> Self {
        let mut variables: Vec<Variable> = clauses
            .iter()
            .flat_map(|clause| clause.iter().map(|literal| literal.variable()))
            .collect();
        variables.sort_unstable();
        variables.dedup();

        VariableSet {
            variables: variables.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Returns the assignment position of `variable`, or `None` if the variable
    /// does not occur in the formula.
    pub fn position(&self, variable: Variable) -> Option<VariablePos> {
        self.variables
            .raw
            .binary_search(&variable)
            .ok()
            .map(VariablePos::from)
    }

    pub fn iter(&self) -> impl Iterator<Item = Variable> + '_ {
        self.variables.iter().copied()
    }
}

/// Formula representation in Conjunctive Normal Form
#[derive(Debug, Clone, Default)]
pub struct Cnf {
    clauses: Vec<Clause>,
    variables: VariableSet,
}

impl Cnf {
    pub fn new(clauses: Vec<Clause>) -> Self {
        let variables = VariableSet::from_clauses(&clauses);
        Cnf { clauses, variables }
    }

    /// The formula with no clauses, satisfied by every assignment.
    pub fn empty() -> Self {
        Default::default()
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn variables(&self) -> &VariableSet {
        &self.variables
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(Clause::num_literals).sum()
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CNF with {} variables (", self.num_variables())?;

        let mut iter = self.clauses.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for clause in iter {
            write!(f, " ∧ {}", clause)?;
        }

        write!(f, ")")?;

        Ok(())
    }
}

/// Truth values positionally aligned with a [`VariableSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    values: TiVec<VariablePos, bool>,
}

impl Assignment {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, pos: VariablePos) -> Option<bool> {
        self.values.get(pos).copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.values.raw
    }
}

impl From<Vec<bool>> for Assignment {
    fn from(values: Vec<bool>) -> Self {
        Assignment {
            values: values.into(),
        }
    }
}

impl FromIterator<bool> for Assignment {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Assignment {
            values: iter.into_iter().collect(),
        }
    }
}

/// Represents a satisfying assignment for a formula.
#[derive(Debug)]
pub struct Model {
    formula: Cnf,
    assignment: Assignment,
}

impl Model {
    /// Creates a new model from a formula and an assignment.
    ///
    /// # Panics
    ///
    /// Panics when the assignment length does not match the formula's variable count.
    pub fn new(formula: Cnf, assignment: Assignment) -> Self {
        assert!(assignment.len() == formula.num_variables());

        Model {
            formula,
            assignment,
        }
    }

    pub fn formula(&self) -> &Cnf {
        &self.formula
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn into_assignment(self) -> Assignment {
        self.assignment
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Model for {}\nAssignment:", self.formula)?;
        for (variable, &val) in self
            .formula
            .variables()
            .iter()
            .zip(self.assignment.as_slice())
        {
            write!(f, "\n  {}: {}", variable, val)?;
        }

        Ok(())
    }
}
