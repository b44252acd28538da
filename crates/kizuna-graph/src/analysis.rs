//! Whole-graph analysis backed by petgraph.

use petgraph::algo::connected_components;
use petgraph::dot::Dot;
use petgraph::graph::UnGraph;

use crate::graph::SimilarityGraph;

impl SimilarityGraph {
    /// Copy the graph into a petgraph `UnGraph` whose node weights are item
    /// names and whose edge weights are distances. Node indices follow vertex
    /// order.
    pub fn to_petgraph(&self) -> UnGraph<&str, f64> {
        let mut graph = UnGraph::with_capacity(self.vertices.len(), self.edges.len());
        let nodes: Vec<_> = self
            .vertices
            .iter()
            .map(|item| graph.add_node(item.name()))
            .collect();
        for edge in &self.edges {
            graph.add_edge(nodes[edge.a], nodes[edge.b], edge.weight);
        }
        graph
    }

    /// Number of connected components, counting isolated vertices.
    pub fn component_count(&self) -> usize {
        connected_components(&self.to_petgraph())
    }

    /// Graphviz rendering with weights rounded to three decimals.
    pub fn to_dot(&self) -> String {
        let graph = self
            .to_petgraph()
            .map(|_, name| *name, |_, weight| format!("{weight:.3}"));
        format!("{}", Dot::new(&graph))
    }
}

#[cfg(test)]
mod tests {
    use kizuna_core::Item;

    use super::*;

    fn graph() -> SimilarityGraph {
        let mut graph = SimilarityGraph::new();
        for name in ["Ping Pong", "Tatami Galaxy", "Kaiba", "Mononoke"] {
            graph.add_vertex(Item::new(0, name));
        }
        graph.add_edge("Ping Pong", "Tatami Galaxy", 0.2).unwrap();
        graph.add_edge("Kaiba", "Tatami Galaxy", 0.3).unwrap();
        graph
    }

    #[test]
    fn test_to_petgraph_preserves_shape() {
        let g = graph();
        let pg = g.to_petgraph();
        assert_eq!(pg.node_count(), 4);
        assert_eq!(pg.edge_count(), 2);
    }

    #[test]
    fn test_component_count() {
        assert_eq!(graph().component_count(), 2);
        assert_eq!(SimilarityGraph::new().component_count(), 0);
    }

    #[test]
    fn test_to_dot_mentions_names_and_weights() {
        let dot = graph().to_dot();
        assert!(dot.starts_with("graph {"));
        assert!(dot.contains("Ping Pong"));
        assert!(dot.contains("0.300"));
    }
}
