//! Structured CQL expressions, serialized to text in one place.

use std::fmt::{Display, Write};

use crate::search_query::SortOption;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `=`: word match, honours `*` masking.
    Matches,
    /// `==`: exact match.
    Exact,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Matches => "=",
            Relation::Exact => "==",
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CqlClause {
    pub index: String,
    pub relation: Relation,
    pub value: String,
}

impl CqlClause {
    pub fn new(index: impl Into<String>, relation: Relation, value: impl Into<String>) -> Self {
        Self { index: index.into(), relation, value: value.into() }
    }

    pub fn matches(index: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(index, Relation::Matches, value)
    }

    pub fn exact(index: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(index, Relation::Exact, value)
    }
}

impl Display for CqlClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}\"", self.index, self.relation.as_str())?;
        for c in self.value.chars() {
            if c == '"' || c == '\\' {
                f.write_char('\\')?;
            }
            f.write_char(c)?;
        }
        f.write_char('"')
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CqlExpr {
    /// `cql.allRecords=1`
    AllRecords,
    Clause(CqlClause),
    And(Vec<CqlExpr>),
    Or(Vec<CqlExpr>),
}

impl CqlExpr {
    /// Conjunction of `parts`. A lone compound part is returned as is, so
    /// the output never carries a redundant pair of parentheses.
    pub fn and(mut parts: Vec<CqlExpr>) -> CqlExpr {
        if parts.len() == 1 && parts[0].is_compound() {
            return parts.remove(0);
        }
        CqlExpr::And(parts)
    }

    pub fn or(parts: Vec<CqlExpr>) -> CqlExpr {
        CqlExpr::Or(parts)
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, CqlExpr::And(_) | CqlExpr::Or(_))
    }

    /// Adds `clause` to this expression with `and`.
    ///
    /// When the top-level conjunction already holds an exact-match clause on
    /// the same index, the new clause is placed right after it. Otherwise the
    /// whole expression becomes the left operand of a new conjunction.
    pub fn conjoin(self, clause: CqlClause) -> CqlExpr {
        match self {
            CqlExpr::And(mut parts) => {
                let same_index = parts.iter().position(|part| match part {
                    CqlExpr::Clause(c) => c.index == clause.index && c.relation == Relation::Exact,
                    _ => false,
                });
                match same_index {
                    Some(pos) => {
                        parts.insert(pos + 1, CqlExpr::Clause(clause));
                        CqlExpr::And(parts)
                    }
                    None => CqlExpr::And(vec![CqlExpr::And(parts), CqlExpr::Clause(clause)]),
                }
            }
            other => CqlExpr::And(vec![other, CqlExpr::Clause(clause)]),
        }
    }

    fn fmt_joined(f: &mut std::fmt::Formatter<'_>, parts: &[CqlExpr], op: &str) -> std::fmt::Result {
        f.write_char('(')?;
        if parts.is_empty() {
            Display::fmt(&CqlExpr::AllRecords, f)?;
        }
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                write!(f, " {op} ")?;
            }
            Display::fmt(part, f)?;
        }
        f.write_char(')')
    }
}

impl From<CqlClause> for CqlExpr {
    fn from(value: CqlClause) -> Self {
        CqlExpr::Clause(value)
    }
}

impl Display for CqlExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CqlExpr::AllRecords => f.write_str("cql.allRecords=1"),
            CqlExpr::Clause(clause) => Display::fmt(clause, f),
            CqlExpr::And(parts) => Self::fmt_joined(f, parts, "and"),
            CqlExpr::Or(parts) => Self::fmt_joined(f, parts, "or"),
        }
    }
}


/// A complete query: filter expression plus optional sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CqlQuery {
    pub expr: CqlExpr,
    pub sort: Option<SortOption>,
}

impl Display for CqlQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.expr, f)?;
        if let Some(sort) = &self.sort {
            write!(f, " sortby {}", sort.field)?;
            if sort.descending {
                f.write_str("/sort.descending")?;
            }
        }
        Ok(())
    }
}
