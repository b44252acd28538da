//! Whole-graph properties checked over a synthetic catalog.

use std::collections::HashSet;

use kizuna_core::Item;
use kizuna_graph::{SimilarityGraph, SimilarityWeights};
use petgraph::algo::dijkstra;

const CATEGORIES: &[&str] = &[
    "Action", "Comedy", "Drama", "Fantasy", "Mecha", "Romance", "School", "Sci-Fi",
];
const KINDS: &[&str] = &["TV", "Movie", "OVA"];

/// Deterministic catalog with enough variety to produce a sparse graph.
fn catalog(n: usize) -> Vec<Item> {
    (0..n)
        .map(|i| {
            let categories: Vec<&str> = CATEGORIES
                .iter()
                .enumerate()
                .filter(|(c, _)| (i * 7 + c * 3) % 5 < 2)
                .map(|(_, name)| *name)
                .collect();
            Item::new(u32::try_from(i).unwrap(), format!("Title {i:03}"))
                .with_categories(categories)
                .with_kind(KINDS[i % KINDS.len()])
                .with_episodes(u32::try_from(1 + (i * 13) % 50).unwrap())
                .with_rating(5.0 + ((i * 17) % 50) as f32 / 10.0)
                .with_popularity(10_000 + ((i * 7919) % 90_000) as u64)
        })
        .collect()
}

fn edge_set(graph: &SimilarityGraph) -> HashSet<(String, String)> {
    graph
        .edges()
        .map(|e| {
            let (a, b) = (e.a.name().to_string(), e.b.name().to_string());
            if a < b {
                (a, b)
            } else {
                (b, a)
            }
        })
        .collect()
}

#[test]
fn test_threshold_monotonicity() {
    let weights = SimilarityWeights::default();
    let items = catalog(60);
    let loose = SimilarityGraph::build(items.clone(), 0.6, &weights).unwrap();
    let strict = SimilarityGraph::build(items, 0.8, &weights).unwrap();

    let loose_edges = edge_set(&loose);
    let strict_edges = edge_set(&strict);
    assert!(strict_edges.is_subset(&loose_edges));
    assert!(loose_edges.len() >= strict_edges.len());
}

#[test]
fn test_rebuild_matches_fresh_build() {
    let weights = SimilarityWeights::default();
    let items = catalog(40);
    let mut graph = SimilarityGraph::build(items.clone(), 0.5, &weights).unwrap();
    graph.rebuild(0.75, &weights).unwrap();
    let fresh = SimilarityGraph::build(items, 0.75, &weights).unwrap();
    assert_eq!(edge_set(&graph), edge_set(&fresh));
}

#[test]
fn test_edge_weights_are_distances() {
    let graph = SimilarityGraph::build(catalog(50), 0.6, &SimilarityWeights::default()).unwrap();
    for edge in graph.edges() {
        assert!(edge.weight > 0.0 && edge.weight <= 0.4 + 1e-12, "weight {}", edge.weight);
        assert_ne!(edge.a, edge.b);
    }
}

#[test]
fn test_bfs_paths_have_fewest_hops() {
    let graph = SimilarityGraph::build(catalog(50), 0.65, &SimilarityWeights::default()).unwrap();
    let pg = graph.to_petgraph();
    let names: Vec<&str> = graph.vertices().iter().map(|i| i.name()).collect();

    for (s, start) in names.iter().enumerate().take(10) {
        let hops = dijkstra(&pg, petgraph::graph::NodeIndex::new(s), None, |_| 1usize);
        for (t, end) in names.iter().enumerate() {
            let bfs = graph.find_path_bfs(start, end);
            let dfs = graph.find_path_dfs(start, end);
            match hops.get(&petgraph::graph::NodeIndex::new(t)) {
                Some(&shortest) => {
                    assert_eq!(bfs.len(), shortest + 1, "{start} -> {end}");
                    assert!(dfs.len() >= bfs.len());
                    assert_eq!(dfs.first().map(|i| i.name()), Some(*start));
                    assert_eq!(dfs.last().map(|i| i.name()), Some(*end));
                    assert!(graph.path_weight(&dfs).is_some());
                }
                None => {
                    assert!(bfs.is_empty());
                    assert!(dfs.is_empty());
                }
            }
        }
    }
}

#[test]
fn test_traversals_cover_the_same_component() {
    let graph = SimilarityGraph::build(catalog(50), 0.65, &SimilarityWeights::default()).unwrap();
    for item in graph.vertices().iter().take(10) {
        let bfs: HashSet<&str> = graph.bfs(item.name()).iter().map(|i| i.name()).collect();
        let dfs: HashSet<&str> = graph.dfs(item.name()).iter().map(|i| i.name()).collect();
        assert_eq!(bfs, dfs);
        assert!(bfs.contains(item.name()));
    }
}
