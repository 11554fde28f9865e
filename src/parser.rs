use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use crate::formula::{Clause, Cnf, Literal, VariableParseError};
use crate::prelude::*;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("I/O error occurred while reading CNF file '{}'", path.display()))]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "Invalid literal '{}' found in clause starting at line {}: '{}'",
        token,
        line,
        clause
    ))]
    MalformedLiteral {
        line: usize,
        clause: String,
        token: String,
        source: VariableParseError,
    },
}

/// Counts declared by the problem line `p cnf <num_variables> <num_clauses>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub num_variables: usize,
    pub num_clauses: usize,
}

/// The declared header disagrees with what the clause block actually contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMismatch {
    pub header: Header,
    pub found_variables: usize,
    pub found_clauses: usize,
}

impl Display for HeaderMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "problem line declares {} variables and {} clauses, but {} variables and {} clauses were found",
            self.header.num_variables,
            self.header.num_clauses,
            self.found_variables,
            self.found_clauses
        )
    }
}

#[derive(Debug)]
pub enum ParseOutcome {
    Accepted(Cnf),
    /// The clause block parsed, but the problem line contradicts it.
    Rejected {
        formula: Cnf,
        mismatch: HeaderMismatch,
    },
}

impl ParseOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ParseOutcome::Accepted(_))
    }

    /// Returns the usable formula.
    ///
    /// A rejected parse yields the empty formula, which every assignment
    /// (including the empty one) satisfies.
    pub fn into_cnf(self) -> Cnf {
        match self {
            ParseOutcome::Accepted(cnf) => cnf,
            ParseOutcome::Rejected { mismatch, .. } => {
                warn!("Discarding formula, {}", mismatch);
                Cnf::empty()
            }
        }
    }
}

/// Classification of a single physical line.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Comment,
    Problem(Option<Header>),
    /// `%` terminates the clause data in SATLIB benchmark files.
    End,
    Data(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    let mut tokens = trimmed.split_whitespace();

    match tokens.next() {
        None => Line::Blank,
        Some("%") => Line::End,
        Some("p") => Line::Problem(parse_problem_line(tokens)),
        Some(first) if first.starts_with('c') => Line::Comment,
        Some(_) => Line::Data(trimmed),
    }
}

/// Parses the tokens following `p`. Only the CNF format is recognized.
fn parse_problem_line<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Header> {
    if tokens.next()? != "cnf" {
        return None;
    }

    let num_variables = tokens.next()?.parse().ok()?;
    let num_clauses = tokens.next()?.parse().ok()?;

    let trailing = tokens.count();
    if trailing > 0 {
        warn!("Ignoring {} trailing token(s) on the problem line", trailing);
    }

    Some(Header {
        num_variables,
        num_clauses,
    })
}

/// The clause block begins at the first data line led by a non-zero integer.
fn starts_clause_block(data: &str) -> bool {
    data.split_whitespace()
        .next()
        .and_then(|token| token.parse::<i64>().ok())
        .map_or(false, |num| num != 0)
}

/// One logical clause, possibly folded from several physical lines.
#[derive(Debug)]
struct PendingClause {
    line: usize,
    text: String,
}

impl PendingClause {
    fn new(line: usize) -> Self {
        PendingClause {
            line,
            text: String::new(),
        }
    }

    fn push(&mut self, data: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(data);
    }

    fn is_terminated(&self) -> bool {
        self.text.split_whitespace().last() == Some("0")
    }

    fn into_clause(self) -> Result<Clause, Error> {
        let mut tokens = self.text.split_whitespace().collect::<Vec<_>>();
        if tokens.last() == Some(&"0") {
            tokens.pop();
        }

        let mut literals = Vec::with_capacity(tokens.len());
        for token in tokens {
            literals.push(
                token
                    .parse::<Literal>()
                    .with_context(|| MalformedLiteral {
                        line: self.line,
                        clause: self.text.clone(),
                        token: token.to_owned(),
                    })?,
            );
        }

        Ok(Clause::new(literals))
    }
}

#[derive(Debug, Default)]
struct ClauseReader {
    header: Option<Header>,
    clauses: Vec<Clause>,
    pending: Option<PendingClause>,
    in_clause_block: bool,
}

impl ClauseReader {
    /// Consumes one physical line. Returns `false` once the clause data has ended.
    fn feed(&mut self, line_no: usize, line: &str) -> Result<bool, Error> {
        match classify(line) {
            Line::Blank | Line::Comment => {}
            Line::Problem(Some(header)) => {
                if self.header.is_none() {
                    self.header = Some(header);
                } else {
                    warn!("Ignoring repeated problem line at line {}", line_no);
                }
            }
            Line::Problem(None) => {
                warn!(
                    "Ignoring malformed problem line at line {}: '{}'",
                    line_no,
                    line.trim()
                );
            }
            Line::End => return Ok(false),
            Line::Data(data) => {
                if !self.in_clause_block {
                    if !starts_clause_block(data) {
                        debug!("Skipping line {} before the clause block", line_no);
                        return Ok(true);
                    }
                    self.in_clause_block = true;
                }

                if self.pending.is_none() && data == "0" {
                    warn!("Skipping empty clause at line {}", line_no);
                    return Ok(true);
                }

                let mut pending = self
                    .pending
                    .take()
                    .unwrap_or_else(|| PendingClause::new(line_no));
                pending.push(data);

                if pending.is_terminated() {
                    self.clauses.push(pending.into_clause()?);
                } else {
                    self.pending = Some(pending);
                }
            }
        }

        Ok(true)
    }

    fn finish(mut self) -> Result<(Option<Header>, Cnf), Error> {
        if let Some(pending) = self.pending.take() {
            warn!(
                "Clause starting at line {} is not terminated by 0, accepting it as is",
                pending.line
            );
            self.clauses.push(pending.into_clause()?);
        }

        Ok((self.header, Cnf::new(self.clauses)))
    }
}

fn validate(header: Option<Header>, formula: Cnf) -> ParseOutcome {
    let header = match header {
        Some(header) => header,
        None => return ParseOutcome::Accepted(formula),
    };

    let found_variables = formula.num_variables();
    let found_clauses = formula.clauses().len();

    if header.num_variables == found_variables && header.num_clauses == found_clauses {
        ParseOutcome::Accepted(formula)
    } else {
        ParseOutcome::Rejected {
            formula,
            mismatch: HeaderMismatch {
                header,
                found_variables,
                found_clauses,
            },
        }
    }
}

/// Parses CNF formula from DIMACS text
pub fn parse_str(text: &str) -> Result<ParseOutcome, Error> {
    let mut reader = ClauseReader::default();

    for (index, line) in text.lines().enumerate() {
        if !reader.feed(index + 1, line)? {
            break;
        }
    }

    let (header, formula) = reader.finish()?;
    debug!(
        "Parsed {} clauses over {} variables",
        formula.clauses().len(),
        formula.num_variables()
    );

    Ok(validate(header, formula))
}

/// Parses CNF formula from a file
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParseOutcome, Error> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).context(IoError {
        path: path.to_owned(),
    })?;

    parse_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(text: &str) -> Cnf {
        match parse_str(text).unwrap() {
            ParseOutcome::Accepted(cnf) => cnf,
            ParseOutcome::Rejected { mismatch, .. } => panic!("unexpected rejection: {}", mismatch),
        }
    }

    fn clause_ids(cnf: &Cnf) -> Vec<Vec<i64>> {
        cnf.clauses()
            .iter()
            .map(|clause| {
                clause
                    .iter()
                    .map(|literal| {
                        let id = i64::from(literal.variable().id());
                        if literal.positive() {
                            id
                        } else {
                            -id
                        }
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn classify_lines() {
        assert_eq!(classify("   "), Line::Blank);
        assert_eq!(classify("c a comment"), Line::Comment);
        assert_eq!(classify("c"), Line::Comment);
        assert_eq!(
            classify("p cnf 3 2"),
            Line::Problem(Some(Header {
                num_variables: 3,
                num_clauses: 2
            }))
        );
        assert_eq!(classify("p dnf 3 2"), Line::Problem(None));
        assert_eq!(classify("p cnf 3"), Line::Problem(None));
        assert_eq!(
            classify("p cnf 2 3 extra"),
            Line::Problem(Some(Header {
                num_variables: 2,
                num_clauses: 3
            }))
        );
        assert_eq!(classify("%"), Line::End);
        assert_eq!(classify("  1 -2 0 "), Line::Data("1 -2 0"));
    }

    #[test]
    fn basic() {
        let cnf = accepted("c whatever\np cnf 2 2\n1 2 0\n1 -2 0\n");
        assert_eq!(clause_ids(&cnf), vec![vec![1, 2], vec![1, -2]]);
        assert_eq!(cnf.num_variables(), 2);
    }

    #[test]
    fn split_clause_matches_single_line() {
        let split = accepted("1 2\n3 0");
        let single = accepted("1 2 3 0");
        assert_eq!(split.clauses(), single.clauses());
        assert_eq!(split.variables(), single.variables());
    }

    #[test]
    fn clause_split_across_many_lines() {
        let cnf = accepted("1\n-2\n\nc interleaved comment\n3\n-4 0\n5 0");
        assert_eq!(clause_ids(&cnf), vec![vec![1, -2, 3, -4], vec![5]]);
    }

    #[test]
    fn empty_input_is_empty_formula() {
        let cnf = accepted("");
        assert!(cnf.clauses().is_empty());
        assert!(cnf.variables().is_empty());

        let cnf = accepted("c only comments\n\n");
        assert!(cnf.clauses().is_empty());
    }

    #[test]
    fn header_with_zero_clauses_is_accepted() {
        assert!(parse_str("p cnf 0 0\n").unwrap().is_accepted());
    }

    #[test]
    fn preamble_before_clause_block_is_skipped() {
        let cnf = accepted("generated by some tool\n0\n1 -3 0\n");
        assert_eq!(clause_ids(&cnf), vec![vec![1, -3]]);
    }

    #[test]
    fn end_marker_stops_clause_data() {
        let cnf = accepted("p cnf 2 2\n1 2 0\n-1 0\n%\n0\n\n");
        assert_eq!(clause_ids(&cnf), vec![vec![1, 2], vec![-1]]);
    }

    #[test]
    fn unterminated_tail_is_kept() {
        let cnf = accepted("1 0\n2 -3");
        assert_eq!(clause_ids(&cnf), vec![vec![1], vec![2, -3]]);
    }

    #[test]
    fn crlf_line_endings() {
        let cnf = accepted("p cnf 2 1\r\n1 -2 0\r\n");
        assert_eq!(clause_ids(&cnf), vec![vec![1, -2]]);
    }

    #[test]
    fn variable_count_uses_distinct_variables() {
        // Identifiers 1 and 5 only, so two variables even though 5 is the largest.
        assert!(parse_str("p cnf 2 1\n1 -5 0").unwrap().is_accepted());
        assert!(!parse_str("p cnf 5 1\n1 -5 0").unwrap().is_accepted());
    }

    #[test]
    fn clause_count_mismatch_is_rejected() {
        match parse_str("p cnf 2 3\n1 0\n-1 0").unwrap() {
            ParseOutcome::Rejected { formula, mismatch } => {
                assert_eq!(formula.clauses().len(), 2);
                assert_eq!(mismatch.found_clauses, 2);
                assert_eq!(mismatch.found_variables, 1);
                assert_eq!(mismatch.header.num_clauses, 3);
            }
            outcome => panic!("expected rejection, got {:?}", outcome),
        }
    }

    #[test]
    fn rejected_outcome_yields_empty_formula() {
        let cnf = parse_str("p cnf 9 1\n1 2 0").unwrap().into_cnf();
        assert!(cnf.clauses().is_empty());
        assert!(cnf.variables().is_empty());
    }

    #[test]
    fn trailing_tokens_on_problem_line_still_validate() {
        match parse_str("p cnf 2 3 extra\n1 0\n-1 0").unwrap() {
            ParseOutcome::Rejected { mismatch, .. } => {
                assert_eq!(mismatch.header.num_variables, 2);
                assert_eq!(mismatch.header.num_clauses, 3);
            }
            outcome => panic!("expected rejection, got {:?}", outcome),
        }
        assert!(parse_str("p cnf 1 2 extra\n1 0\n-1 0").unwrap().is_accepted());
    }

    #[test]
    fn bare_zero_line_is_skipped() {
        let cnf = accepted("p cnf 1 1\n1 0\n0\n");
        assert_eq!(clause_ids(&cnf), vec![vec![1]]);

        // A lone 0 still terminates a clause folded from earlier lines.
        let cnf = accepted("1 2\n0\n-1 0");
        assert_eq!(clause_ids(&cnf), vec![vec![1, 2], vec![-1]]);
    }

    #[test]
    fn repeated_problem_line_keeps_the_first() {
        assert!(parse_str("p cnf 1 1\np cnf 7 7\n1 0").unwrap().is_accepted());
    }

    #[test]
    fn malformed_problem_line_is_ignored() {
        assert!(parse_str("p cnf two 1\n1 0").unwrap().is_accepted());
    }

    #[test]
    fn malformed_literal_names_the_line() {
        let err = parse_str("p cnf 2 2\n1 2 0\n1 x 0\n").unwrap_err();
        match &err {
            Error::MalformedLiteral {
                line, token, clause, ..
            } => {
                assert_eq!(*line, 3);
                assert_eq!(token, "x");
                assert_eq!(clause, "1 x 0");
            }
            err => panic!("unexpected error: {}", err),
        }
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn zero_inside_a_clause_is_malformed() {
        assert!(matches!(
            parse_str("1 0 2 0"),
            Err(Error::MalformedLiteral { line: 1, .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            parse_file("testcases/does-not-exist.cnf"),
            Err(Error::IoError { .. })
        ));
    }
}
