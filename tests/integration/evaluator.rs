#![allow(missing_docs)]

//! End-to-end evaluation against the 14-vertex sample graph.

use std::collections::BTreeSet;
use std::sync::{Arc, Once};

use quiver::{
    CardStat, DatabaseGraph, Evaluator, GraphBuilder, LabelId, PathExpr, Query, QuiverError,
    Relation, VertexId,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quiver=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .try_init();
    });
}

const LABEL_0: &[(u32, u32)] = &[
    (1, 0),
    (1, 3),
    (0, 6),
    (3, 8),
    (6, 9),
    (8, 10),
    (9, 11),
    (10, 12),
    (5, 13),
    (7, 7),
];

const LABEL_1: &[(u32, u32)] = &[(1, 2), (0, 2), (4, 5), (13, 7), (12, 13)];

/// 14 vertices, 2 labels, 15 distinct edges.
fn sample_graph() -> Arc<DatabaseGraph> {
    init_tracing();
    let mut builder = GraphBuilder::new(14, 2);
    for &(source, target) in LABEL_0 {
        builder
            .add_edge(VertexId(source), VertexId(target), LabelId(0))
            .expect("label 0 edge");
    }
    for &(source, target) in LABEL_1 {
        builder
            .add_edge(VertexId(source), VertexId(target), LabelId(1))
            .expect("label 1 edge");
    }
    Arc::new(builder.build())
}

fn prepared() -> Evaluator {
    let mut evaluator = Evaluator::new();
    evaluator.prepare(sample_graph());
    evaluator
}

fn pair_set(relation: &Relation) -> BTreeSet<(u32, u32)> {
    relation
        .pairs()
        .map(|pair| (pair.source.0, pair.target.0))
        .collect()
}

fn stat(distinct_sources: u64, pairs: u64, distinct_targets: u64) -> CardStat {
    CardStat {
        distinct_sources,
        pairs,
        distinct_targets,
    }
}

#[test]
fn sample_graph_totals() {
    let graph = sample_graph();
    assert_eq!(graph.vertex_count(), 14);
    assert_eq!(graph.label_count(), 2);
    assert_eq!(graph.edge_count(), 15);
    assert_eq!(graph.label_edge_count(LabelId(0)).unwrap(), 10);
    assert_eq!(graph.label_edge_count(LabelId(1)).unwrap(), 5);
}

#[test]
fn identity_yields_all_loops() {
    let evaluator = prepared();
    let result = evaluator.evaluate(&Query::new(PathExpr::Identity)).unwrap();
    assert_eq!(result.card_stat(), stat(14, 14, 14));
    let expected: BTreeSet<_> = (0..14).map(|v| (v, v)).collect();
    assert_eq!(pair_set(&result), expected);
}

#[test]
fn kleene_bound_to_source_one() {
    let evaluator = prepared();
    let query = Query::new(PathExpr::kleene(PathExpr::edge(LabelId(0)))).with_source(VertexId(1));
    let result = evaluator.evaluate(&query).unwrap();
    let expected: BTreeSet<_> = [0, 3, 6, 8, 9, 10, 11, 12]
        .into_iter()
        .map(|target| (1, target))
        .collect();
    assert_eq!(pair_set(&result), expected);
    assert_eq!(result.card_stat(), stat(1, 8, 8));
}

#[test]
fn intersection_with_concatenation_bound_to_source_one() {
    let evaluator = prepared();
    let expr = PathExpr::intersection(
        PathExpr::edge(LabelId(1)),
        PathExpr::concat(PathExpr::edge(LabelId(0)), PathExpr::edge(LabelId(1))),
    );
    let query = Query::new(expr).with_source(VertexId(1));
    let result = evaluator.evaluate(&query).unwrap();
    assert_eq!(pair_set(&result), BTreeSet::from([(1, 2)]));
    assert_eq!(result.card_stat(), stat(1, 1, 1));
}

#[test]
fn kleene_includes_self_loops() {
    let evaluator = prepared();
    let query = Query::new(PathExpr::kleene(PathExpr::edge(LabelId(0)))).with_source(VertexId(7));
    let result = evaluator.evaluate(&query).unwrap();
    assert_eq!(pair_set(&result), BTreeSet::from([(7, 7)]));
}

#[test]
fn inverse_edge_transposes_pairs() {
    let evaluator = prepared();
    let forward = evaluator
        .evaluate(&Query::new(PathExpr::edge(LabelId(1))))
        .unwrap();
    let inverse = evaluator
        .evaluate(&Query::new(PathExpr::edge_inverse(LabelId(1))))
        .unwrap();
    let transposed: BTreeSet<_> = forward
        .pairs()
        .map(|pair| (pair.target.0, pair.source.0))
        .collect();
    assert_eq!(pair_set(&inverse), transposed);
    assert_eq!(inverse.card_stat().pairs, forward.card_stat().pairs);
}

#[test]
fn bound_target_restricts_results() {
    let evaluator = prepared();
    let query = Query::new(PathExpr::edge(LabelId(1))).with_target(VertexId(2));
    let result = evaluator.evaluate(&query).unwrap();
    assert_eq!(pair_set(&result), BTreeSet::from([(0, 2), (1, 2)]));
    assert_eq!(result.card_stat(), stat(2, 2, 1));
}

#[test]
fn both_endpoints_bound() {
    let evaluator = prepared();
    let query = Query::new(PathExpr::kleene(PathExpr::edge(LabelId(0))))
        .with_source(VertexId(1))
        .with_target(VertexId(12));
    let result = evaluator.evaluate(&query).unwrap();
    assert_eq!(pair_set(&result), BTreeSet::from([(1, 12)]));
    assert_eq!(result.card_stat(), stat(1, 1, 1));
}

#[test]
fn disjunction_merges_labels() {
    let evaluator = prepared();
    let query = Query::new(PathExpr::disjunction(
        PathExpr::edge(LabelId(0)),
        PathExpr::edge(LabelId(1)),
    ));
    let result = evaluator.evaluate(&query).unwrap();
    // the label sets are disjoint, so every edge survives
    assert_eq!(result.card_stat().pairs, 15);
}

#[test]
fn concatenation_with_identity_is_a_no_op() {
    let evaluator = prepared();
    let plain = evaluator
        .evaluate(&Query::new(PathExpr::edge(LabelId(0))))
        .unwrap();
    let left = evaluator
        .evaluate(&Query::new(PathExpr::concat(
            PathExpr::Identity,
            PathExpr::edge(LabelId(0)),
        )))
        .unwrap();
    let right = evaluator
        .evaluate(&Query::new(PathExpr::concat(
            PathExpr::edge(LabelId(0)),
            PathExpr::Identity,
        )))
        .unwrap();
    assert_eq!(pair_set(&left), pair_set(&plain));
    assert_eq!(pair_set(&right), pair_set(&plain));
    assert_eq!(left.card_stat(), plain.card_stat());
    assert_eq!(right.card_stat(), plain.card_stat());
}

#[test]
fn out_of_bounds_queries_fail_fast() {
    let evaluator = prepared();
    let query = Query::new(PathExpr::edge(LabelId(2)));
    assert!(matches!(
        evaluator.evaluate(&query),
        Err(QuiverError::LabelOutOfBounds { label: 2, .. })
    ));
    let query = Query::new(PathExpr::Identity).with_source(VertexId(14));
    assert!(matches!(
        evaluator.evaluate(&query),
        Err(QuiverError::VertexOutOfBounds { vertex: 14, .. })
    ));
}

#[test]
fn evaluation_is_deterministic_across_runs() {
    let evaluator = prepared();
    let query = Query::new(PathExpr::kleene(PathExpr::disjunction(
        PathExpr::edge(LabelId(0)),
        PathExpr::edge(LabelId(1)),
    )));
    let first = evaluator.evaluate(&query).unwrap();
    let second = evaluator.evaluate(&query).unwrap();
    assert_eq!(first, second);
}
