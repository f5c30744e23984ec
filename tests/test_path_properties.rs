/// Property checks on seeded random graphs
///
/// Costs are compared against the `pathfinding` crate's Dijkstra. Weights
/// are whole numbers so both sides sum exactly.

use navgraph::{
    dijkstra, AlgorithmError, CancellationToken, Edge, EngineConfig, Graph, PathRequest,
    PathService,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const SEEDS: u64 = 40;

struct RandomGraph {
    nodes: usize,
    edges: Vec<Edge>,
    /// (to, weight) per node, for the oracle
    adjacency: Vec<Vec<(usize, u64)>>,
}

fn name(i: usize) -> String {
    format!("N{}", i)
}

/// Directed graph without parallel edges or self-loops
fn random_graph(seed: u64) -> RandomGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let nodes = rng.gen_range(5..40);
    let target_edges = rng.gen_range(nodes..nodes * 4);

    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    let mut adjacency = vec![Vec::new(); nodes];

    while edges.len() < target_edges {
        let from = rng.gen_range(0..nodes);
        let to = rng.gen_range(0..nodes);
        if from == to || !seen.insert((from, to)) {
            continue;
        }
        let weight: u64 = rng.gen_range(1..20);
        edges.push(Edge::new(name(from), name(to), weight as f64));
        adjacency[from].push((to, weight));
    }

    RandomGraph {
        nodes,
        edges,
        adjacency,
    }
}

fn oracle_cost(graph: &RandomGraph, start: usize, end: usize) -> Option<u64> {
    pathfinding::prelude::dijkstra(
        &start,
        |&n| graph.adjacency[n].iter().copied(),
        |&n| n == end,
    )
    .map(|(_, cost)| cost)
}

fn hop_weight(edges: &[Edge], from: &str, to: &str) -> Option<f64> {
    edges
        .iter()
        .filter(|e| e.from == from && e.to == to)
        .map(|e| e.dist)
        .reduce(f64::min)
}

fn walk_cost(edges: &[Edge], path: &[String]) -> Option<f64> {
    path.windows(2)
        .map(|hop| hop_weight(edges, &hop[0], &hop[1]))
        .sum()
}

#[test]
fn test_optimal_cost_matches_oracle() {
    let cancel = CancellationToken::new();

    for seed in 0..SEEDS {
        let random = random_graph(seed);
        let graph = Graph::from_edges(random.edges.clone()).unwrap();
        let mut rng = StdRng::seed_from_u64(seed + 1000);

        for _ in 0..10 {
            let start = rng.gen_range(0..random.nodes);
            let end = rng.gen_range(0..random.nodes);
            if start == end {
                continue;
            }

            let ours = dijkstra(&graph, &name(start), &name(end), &cancel);
            match (oracle_cost(&random, start, end), ours) {
                (Some(expected), Ok(found)) => {
                    assert_eq!(found.cost, expected as f64, "seed {}", seed);
                    assert_eq!(found.path.first(), Some(&name(start)));
                    assert_eq!(found.path.last(), Some(&name(end)));
                    assert_eq!(walk_cost(&random.edges, &found.path), Some(found.cost));
                }
                (None, Err(AlgorithmError::PathNotFound { .. })) => {}
                (expected, found) => panic!(
                    "seed {}: oracle {:?} but solver returned {:?}",
                    seed, expected, found
                ),
            }
        }
    }
}

/// The alternative never ends with the optimal path's final hop and is
/// never cheaper than the optimal path
#[tokio::test]
async fn test_alternative_properties() {
    let service = PathService::new(EngineConfig::default());
    let mut checked = 0;

    for seed in 0..SEEDS {
        let random = random_graph(seed);
        let mut rng = StdRng::seed_from_u64(seed + 2000);

        for _ in 0..5 {
            let start = name(rng.gen_range(0..random.nodes));
            let end = name(rng.gen_range(0..random.nodes));
            if start == end {
                continue;
            }

            let response = match service
                .get_optimal_path(PathRequest::new(&start, &end, random.edges.clone()))
                .await
            {
                Ok(response) => response,
                Err(_) => continue,
            };

            let opt = &response.path_opt;
            let alt = &response.path_alt;
            assert_eq!(alt.first(), Some(&start));
            assert_eq!(alt.last(), Some(&end));

            let opt_hop = &opt[opt.len() - 2..];
            let alt_hop = &alt[alt.len() - 2..];
            assert_ne!(opt_hop, alt_hop, "seed {}: alternative reused final hop", seed);

            let opt_cost = walk_cost(&random.edges, opt).unwrap();
            let alt_cost = walk_cost(&random.edges, alt).unwrap();
            assert!(alt_cost >= opt_cost, "seed {}", seed);
            checked += 1;
        }
    }

    assert!(checked > 0);
}

#[test]
fn test_deterministic_paths() {
    let cancel = CancellationToken::new();

    for seed in 0..SEEDS {
        let random = random_graph(seed);
        let first = Graph::from_edges(random.edges.clone()).unwrap();
        let second = Graph::from_edges(random.edges.clone()).unwrap();

        let a = dijkstra(&first, &name(0), &name(random.nodes - 1), &cancel);
        let b = dijkstra(&second, &name(0), &name(random.nodes - 1), &cancel);
        assert_eq!(a, b, "seed {}", seed);
    }
}

#[test]
fn test_start_equals_end() {
    let cancel = CancellationToken::new();
    let random = random_graph(7);
    let graph = Graph::from_edges(random.edges).unwrap();

    let result = dijkstra(&graph, "N3", "N3", &cancel).unwrap();
    assert_eq!(result.path, vec!["N3"]);
    assert_eq!(result.cost, 0.0);
    assert!(result.last_edge.is_none());
}

#[test]
fn test_cancelled_before_start() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let random = random_graph(3);
    let first = random.edges[0].clone();
    let graph = Graph::from_edges(random.edges).unwrap();

    let result = dijkstra(&graph, &first.from, &first.to, &cancel);
    assert!(matches!(result, Err(AlgorithmError::Cancelled { expanded: 0 })));
}
