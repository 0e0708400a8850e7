//! Abstract syntax tree shared by the path-query front ends.
//!
//! The RPQ/CPQ/CQ surface languages are parsed elsewhere; front ends
//! lower their parse output into this closed set of operations, which the
//! evaluator matches on exhaustively. There is no open hierarchy and thus
//! no "unsupported operation" fallback to hit at runtime.

use std::fmt;

use crate::types::{LabelId, Predicate, VertexId};

/// A path expression over the database graph's labels.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum PathExpr {
    /// Select all edges matching a predicate.
    Edge(Predicate),
    /// Select the loop pair `(v, v)` for every vertex.
    Identity,
    /// Path concatenation: follow the left expression, then the right.
    Concat(Box<PathExpr>, Box<PathExpr>),
    /// Alternative: pairs matched by either side.
    Disjunction(Box<PathExpr>, Box<PathExpr>),
    /// Pairs matched by both sides.
    Intersection(Box<PathExpr>, Box<PathExpr>),
    /// One or more repetitions of the inner expression.
    Kleene(Box<PathExpr>),
}

impl PathExpr {
    /// Forward edge selection for `label`.
    pub fn edge(label: LabelId) -> Self {
        PathExpr::Edge(Predicate::forward(label))
    }

    /// Inverse edge selection for `label`.
    pub fn edge_inverse(label: LabelId) -> Self {
        PathExpr::Edge(Predicate::inverse(label))
    }

    /// Concatenation of `left` and `right`.
    pub fn concat(left: PathExpr, right: PathExpr) -> Self {
        PathExpr::Concat(Box::new(left), Box::new(right))
    }

    /// Disjunction of `left` and `right`.
    pub fn disjunction(left: PathExpr, right: PathExpr) -> Self {
        PathExpr::Disjunction(Box::new(left), Box::new(right))
    }

    /// Intersection of `left` and `right`.
    pub fn intersection(left: PathExpr, right: PathExpr) -> Self {
        PathExpr::Intersection(Box::new(left), Box::new(right))
    }

    /// Transitive closure of `inner`.
    pub fn kleene(inner: PathExpr) -> Self {
        PathExpr::Kleene(Box::new(inner))
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathExpr::Edge(predicate) => write!(f, "{predicate}"),
            PathExpr::Identity => write!(f, "id"),
            PathExpr::Concat(left, right) => write!(f, "({left}/{right})"),
            PathExpr::Disjunction(left, right) => write!(f, "({left}|{right})"),
            PathExpr::Intersection(left, right) => write!(f, "({left}&{right})"),
            PathExpr::Kleene(inner) => write!(f, "({inner})+"),
        }
    }
}

/// A query: a path expression with optional bound endpoints.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Query {
    /// Restrict results to this source vertex.
    pub source: Option<VertexId>,
    /// The path expression to evaluate.
    pub expr: PathExpr,
    /// Restrict results to this target vertex.
    pub target: Option<VertexId>,
}

impl Query {
    /// Query with both endpoints free.
    pub fn new(expr: PathExpr) -> Self {
        Self {
            source: None,
            expr,
            target: None,
        }
    }

    /// Binds the source endpoint.
    pub fn with_source(mut self, source: VertexId) -> Self {
        self.source = Some(source);
        self
    }

    /// Binds the target endpoint.
    pub fn with_target(mut self, target: VertexId) -> Self {
        self.target = Some(target);
        self
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            Some(source) => write!(f, "({source}, ")?,
            None => write!(f, "(*, ")?,
        }
        write!(f, "{}, ", self.expr)?;
        match self.target {
            Some(target) => write!(f, "{target})"),
            None => write!(f, "*)"),
        }
    }
}
