//! Recursive evaluation of path queries against a prepared database graph.

use std::sync::Arc;

use tracing::trace;

use crate::ast::{PathExpr, Query};
use crate::error::{QuiverError, Result};
use crate::graph::DatabaseGraph;
use crate::relation::Relation;

/// Evaluates queries against one prepared [`DatabaseGraph`].
///
/// The graph is installed once via [`Evaluator::prepare`] and reused
/// across queries, amortizing its construction cost. Evaluation never
/// mutates the graph, so the same `Arc` may back evaluators owned by
/// other threads; relations are never shared between evaluations.
#[derive(Debug, Default)]
pub struct Evaluator {
    graph: Option<Arc<DatabaseGraph>>,
}

impl Evaluator {
    /// Evaluator with no graph installed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the database graph queries will run against.
    pub fn prepare(&mut self, graph: Arc<DatabaseGraph>) {
        self.graph = Some(graph);
    }

    /// Evaluates `query` to its result relation.
    ///
    /// Bound endpoints are bounds-checked before any work; the AST is
    /// then evaluated bottom-up and the bound-source and bound-target
    /// restrictions applied to the final relation.
    pub fn evaluate(&self, query: &Query) -> Result<Relation> {
        let graph = self
            .graph
            .as_ref()
            .ok_or(QuiverError::InvalidState("evaluator has no prepared graph"))?;
        if let Some(source) = query.source {
            graph.check_vertex(source)?;
        }
        if let Some(target) = query.target {
            graph.check_vertex(target)?;
        }
        let mut result = eval_expr(graph, &query.expr)?;
        if let Some(source) = query.source {
            result = result.select_source(source);
        }
        if let Some(target) = query.target {
            result = result.select_target(target);
        }
        trace!(query = %query, pairs = result.len(), "query evaluated");
        Ok(result)
    }
}

fn eval_expr(graph: &DatabaseGraph, expr: &PathExpr) -> Result<Relation> {
    match expr {
        PathExpr::Edge(predicate) => graph.select_label(*predicate),
        PathExpr::Identity => Ok(graph.select_identity()),
        PathExpr::Concat(left, right) => {
            Ok(eval_expr(graph, left)?.join(&eval_expr(graph, right)?))
        }
        // plain union: duplicate pairs inside either operand persist
        PathExpr::Disjunction(left, right) => {
            Ok(eval_expr(graph, left)?.union(&eval_expr(graph, right)?))
        }
        PathExpr::Intersection(left, right) => {
            Ok(eval_expr(graph, left)?.intersection(&eval_expr(graph, right)?))
        }
        PathExpr::Kleene(inner) => Ok(eval_expr(graph, inner)?.transitive_closure()),
    }
}
