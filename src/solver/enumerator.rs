/*!
Deterministic enumeration of every assignment over `n` variables.

Index `k` maps to the assignment whose value at position `i` is bit `i` of `k`,
so index 0 is all-false and index `2^n - 1` is all-true.
*/

use std::convert::TryFrom;

use crate::formula::Assignment;

/// Returns the assignment with the given enumeration index.
///
/// # Panics
///
/// Panics when `num_variables` exceeds [`Assignments::MAX_VARIABLES`].
pub fn assignment_at(num_variables: usize, index: u64) -> Assignment {
    assert!(num_variables <= Assignments::MAX_VARIABLES);

    (0..num_variables)
        .map(|bit| (index >> bit) & 1 == 1)
        .collect()
}

/// Iterator over all `2^n` assignments in index order.
///
/// The iterator holds nothing but its position. A clone resumes from the same
/// index, and a new iterator always starts again at index 0.
#[derive(Debug, Clone)]
pub struct Assignments {
    num_variables: usize,
    next: u64,
    end: u64,
}

impl Assignments {
    /// Largest variable count whose search space fits the `u64` index.
    pub const MAX_VARIABLES: usize = 63;

    /// # Panics
    ///
    /// Panics when `num_variables` exceeds [`Assignments::MAX_VARIABLES`].
    pub fn new(num_variables: usize) -> Self {
        assert!(num_variables <= Self::MAX_VARIABLES);

        Assignments {
            num_variables,
            next: 0,
            end: 1 << num_variables,
        }
    }

    /// Index of the assignment the next call to `next()` yields.
    pub fn index(&self) -> u64 {
        self.next
    }

    fn remaining(&self) -> u64 {
        self.end - self.next
    }
}

impl Iterator for Assignments {
    type Item = Assignment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == self.end {
            return None;
        }

        let assignment = assignment_at(self.num_variables, self.next);
        self.next += 1;
        Some(assignment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let skip = (n as u64).min(self.remaining());
        self.next += skip;
        self.next()
    }
}
