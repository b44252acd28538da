//! Undirected, weighted similarity graph.
//!
//! Vertices are catalog items keyed by name. Edges live in a flat list and
//! carry a distance (`1 - similarity`), so a smaller weight means two items
//! are more alike.
//!
//! There is no adjacency list: neighbor lookups scan the edge list, which
//! costs `O(E)` per query. That is fine for catalogs of a few thousand items.
//! Neighbors come back in edge insertion order, so traversals are
//! deterministic for a given edge list but neither alphabetical nor sorted by
//! weight.

use std::collections::{HashMap, HashSet, VecDeque};

use kizuna_core::Item;

use crate::error::{GraphError, GraphResult};
use crate::similarity::{similarity, SimilarityWeights};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Edge {
    pub(crate) a: usize,
    pub(crate) b: usize,
    pub(crate) weight: f64,
}

impl Edge {
    fn joins(&self, u: usize, v: usize) -> bool {
        (self.a == u && self.b == v) || (self.a == v && self.b == u)
    }

    fn touches(&self, v: usize) -> bool {
        self.a == v || self.b == v
    }

    /// The endpoint opposite `v`, if `v` is an endpoint.
    fn other(&self, v: usize) -> Option<usize> {
        if self.a == v {
            Some(self.b)
        } else if self.b == v {
            Some(self.a)
        } else {
            None
        }
    }
}

/// A borrowed view of one edge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeRef<'g> {
    pub a: &'g Item,
    pub b: &'g Item,
    pub weight: f64,
}

/// Frontier discipline for traversals and path searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// FIFO frontier. Paths found this way use the fewest edges.
    BreadthFirst,
    /// LIFO frontier. Paths found this way are just *a* path.
    DepthFirst,
}

impl Traversal {
    fn label(self) -> &'static str {
        match self {
            Self::BreadthFirst => "BFS",
            Self::DepthFirst => "DFS",
        }
    }
}

struct Frontier {
    order: Traversal,
    queue: VecDeque<usize>,
}

impl Frontier {
    fn new(order: Traversal, start: usize) -> Self {
        Self {
            order,
            queue: VecDeque::from([start]),
        }
    }

    fn push(&mut self, v: usize) {
        self.queue.push_back(v);
    }

    fn pop(&mut self) -> Option<usize> {
        match self.order {
            Traversal::BreadthFirst => self.queue.pop_front(),
            Traversal::DepthFirst => self.queue.pop_back(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimilarityGraph {
    pub(crate) vertices: Vec<Item>,
    pub(crate) edges: Vec<Edge>,
    mapping: HashMap<String, usize>,
}

impl SimilarityGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every item as a vertex, then connect the pairs whose similarity
    /// reaches `threshold`.
    pub fn build<I>(items: I, threshold: f64, weights: &SimilarityWeights) -> GraphResult<Self>
    where
        I: IntoIterator<Item = Item>,
    {
        let mut graph = Self::new();
        for item in items {
            graph.add_vertex(item);
        }
        graph.connect_similar(threshold, weights)?;
        Ok(graph)
    }

    // ---------------------------------------------------------------------
    // Vertices
    // ---------------------------------------------------------------------

    /// Insert a vertex. Inserting a name that is already present does
    /// nothing and returns `false`.
    pub fn add_vertex(&mut self, item: Item) -> bool {
        if self.mapping.contains_key(item.name()) {
            log::debug!("vertex already exists: {}", item.name());
            return false;
        }
        self.mapping
            .insert(item.name().to_string(), self.vertices.len());
        self.vertices.push(item);
        true
    }

    /// Remove a vertex together with every edge touching it.
    pub fn remove_vertex(&mut self, name: &str) -> GraphResult<()> {
        let v = self.require(name)?;

        self.vertices.remove(v);
        self.edges.retain(|e| !e.touches(v));
        for edge in &mut self.edges {
            if edge.a > v {
                edge.a -= 1;
            }
            if edge.b > v {
                edge.b -= 1;
            }
        }

        self.mapping.remove(name);
        for (i, item) in self.vertices.iter().enumerate().skip(v) {
            self.mapping.insert(item.name().to_string(), i);
        }
        Ok(())
    }

    pub fn contains_vertex(&self, name: &str) -> bool {
        self.mapping.contains_key(name)
    }

    pub fn vertex(&self, name: &str) -> Option<&Item> {
        self.mapping.get(name).map(|&v| &self.vertices[v])
    }

    pub fn vertices(&self) -> &[Item] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Items adjacent to `name`, in edge insertion order. Unknown names yield
    /// an empty list.
    pub fn neighbors(&self, name: &str) -> Vec<&Item> {
        match self.lookup(name) {
            Some(v) => self.neighbor_indices(v).map(|n| &self.vertices[n]).collect(),
            None => Vec::new(),
        }
    }

    /// Number of edges touching `name`; zero for unknown names.
    pub fn degree(&self, name: &str) -> usize {
        self.lookup(name)
            .map(|v| self.edges.iter().filter(|e| e.touches(v)).count())
            .unwrap_or(0)
    }

    /// Vertices with at least one edge.
    pub fn connected_vertex_count(&self) -> usize {
        let touched: HashSet<usize> = self.edges.iter().flat_map(|e| [e.a, e.b]).collect();
        touched.len()
    }

    // ---------------------------------------------------------------------
    // Edges
    // ---------------------------------------------------------------------

    pub fn add_edge(&mut self, u: &str, v: &str, weight: f64) -> GraphResult<()> {
        let (a, b) = (self.require(u)?, self.require(v)?);
        if a == b {
            log::warn!("refusing loop edge on {u}");
            return Err(GraphError::SelfLoop(u.to_string()));
        }
        if !(weight.is_finite() && weight > 0.0 && weight <= 1.0) {
            log::warn!("refusing edge {u} -- {v} with weight {weight}");
            return Err(GraphError::InvalidWeight(weight));
        }
        if self.edges.iter().any(|e| e.joins(a, b)) {
            log::warn!("edge already exists: {u} -- {v}");
            return Err(GraphError::DuplicateEdge {
                a: u.to_string(),
                b: v.to_string(),
            });
        }
        self.edges.push(Edge { a, b, weight });
        Ok(())
    }

    pub fn remove_edge(&mut self, u: &str, v: &str) -> GraphResult<()> {
        let (a, b) = (self.require(u)?, self.require(v)?);
        let before = self.edges.len();
        self.edges.retain(|e| !e.joins(a, b));
        if self.edges.len() == before {
            log::warn!("no edge to remove between {u} and {v}");
            return Err(GraphError::EdgeNotFound {
                a: u.to_string(),
                b: v.to_string(),
            });
        }
        Ok(())
    }

    pub fn contains_edge(&self, u: &str, v: &str) -> bool {
        match (self.mapping.get(u), self.mapping.get(v)) {
            (Some(&a), Some(&b)) => self.edges.iter().any(|e| e.joins(a, b)),
            _ => false,
        }
    }

    /// Distance between two adjacent items, or `None` if they share no edge.
    pub fn weight(&self, u: &str, v: &str) -> Option<f64> {
        let (a, b) = (*self.mapping.get(u)?, *self.mapping.get(v)?);
        self.edge_weight(a, b)
    }

    /// Sum of edge weights along `path`. `None` if two consecutive items are
    /// not adjacent.
    pub fn path_weight(&self, path: &[&Item]) -> Option<f64> {
        path.windows(2)
            .map(|pair| self.weight(pair[0].name(), pair[1].name()))
            .sum()
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_>> {
        self.edges.iter().map(|e| EdgeRef {
            a: &self.vertices[e.a],
            b: &self.vertices[e.b],
            weight: e.weight,
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn clear_edges(&mut self) {
        self.edges.clear();
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.mapping.clear();
    }

    // ---------------------------------------------------------------------
    // Construction from similarity
    // ---------------------------------------------------------------------

    /// Score every unordered pair of vertices and add an edge of weight
    /// `1 - similarity` when the similarity reaches `threshold`.
    ///
    /// Pairs with a perfect score would get a zero weight and are left
    /// unconnected. Existing edges are kept; call [`Self::rebuild`] to apply
    /// a different threshold from scratch. Returns the number of edges added.
    pub fn connect_similar(
        &mut self,
        threshold: f64,
        weights: &SimilarityWeights,
    ) -> GraphResult<usize> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(GraphError::InvalidThreshold(threshold));
        }
        weights.validate()?;

        let mut existing: HashSet<(usize, usize)> = self
            .edges
            .iter()
            .map(|e| (e.a.min(e.b), e.a.max(e.b)))
            .collect();

        let n = self.vertices.len();
        let mut added = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                let score = similarity(&self.vertices[i], &self.vertices[j], weights);
                if score < threshold {
                    continue;
                }
                let weight = 1.0 - score;
                if weight > 0.0 && existing.insert((i, j)) {
                    self.edges.push(Edge { a: i, b: j, weight });
                    added += 1;
                }
            }
        }

        log::info!(
            "connected {added} pairs among {n} vertices at threshold {threshold}"
        );
        Ok(added)
    }

    /// Drop every edge and reconnect at a new threshold. Arguments are
    /// checked before anything is dropped.
    pub fn rebuild(&mut self, threshold: f64, weights: &SimilarityWeights) -> GraphResult<usize> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(GraphError::InvalidThreshold(threshold));
        }
        weights.validate()?;
        self.clear_edges();
        self.connect_similar(threshold, weights)
    }

    // ---------------------------------------------------------------------
    // Traversal
    // ---------------------------------------------------------------------

    pub fn bfs(&self, start: &str) -> Vec<&Item> {
        self.traverse(start, Traversal::BreadthFirst)
    }

    pub fn dfs(&self, start: &str) -> Vec<&Item> {
        self.traverse(start, Traversal::DepthFirst)
    }

    /// Every vertex reachable from `start`, in visiting order.
    ///
    /// An empty graph or an unknown start logs a warning and yields an empty
    /// list.
    pub fn traverse(&self, start: &str, order: Traversal) -> Vec<&Item> {
        let Some(start) = self.traversal_start(start, order) else {
            return Vec::new();
        };

        let mut explored = vec![false; self.vertices.len()];
        let mut frontier = Frontier::new(order, start);
        let mut visited = Vec::new();
        explored[start] = true;

        while let Some(current) = frontier.pop() {
            visited.push(&self.vertices[current]);
            for next in self.neighbor_indices(current) {
                if !explored[next] {
                    explored[next] = true;
                    frontier.push(next);
                }
            }
        }
        visited
    }

    /// Path with the fewest edges from `start` to `end`, both included.
    pub fn find_path_bfs(&self, start: &str, end: &str) -> Vec<&Item> {
        self.find_path(start, end, Traversal::BreadthFirst)
    }

    /// Some path from `start` to `end`, both included. No length guarantee.
    pub fn find_path_dfs(&self, start: &str, end: &str) -> Vec<&Item> {
        self.find_path(start, end, Traversal::DepthFirst)
    }

    /// Run a traversal from `start` until `end` leaves the frontier, then walk
    /// parent links back. Empty when the two are disconnected or either is
    /// missing.
    pub fn find_path(&self, start: &str, end: &str, order: Traversal) -> Vec<&Item> {
        let Some(from) = self.traversal_start(start, order) else {
            return Vec::new();
        };
        let Some(to) = self.lookup(end) else {
            return Vec::new();
        };

        let mut explored = vec![false; self.vertices.len()];
        let mut parents: Vec<Option<usize>> = vec![None; self.vertices.len()];
        let mut frontier = Frontier::new(order, from);
        explored[from] = true;

        while let Some(current) = frontier.pop() {
            if current == to {
                return self.reconstruct(&parents, to);
            }
            for next in self.neighbor_indices(current) {
                if !explored[next] {
                    explored[next] = true;
                    parents[next] = Some(current);
                    frontier.push(next);
                }
            }
        }

        log::debug!("{} found no path from {start} to {end}", order.label());
        Vec::new()
    }

    fn reconstruct(&self, parents: &[Option<usize>], end: usize) -> Vec<&Item> {
        let mut path = vec![&self.vertices[end]];
        let mut cursor = end;
        while let Some(parent) = parents[cursor] {
            path.push(&self.vertices[parent]);
            cursor = parent;
        }
        path.reverse();
        path
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn lookup(&self, name: &str) -> Option<usize> {
        let found = self.mapping.get(name).copied();
        if found.is_none() {
            log::warn!("vertex not found: {name}");
        }
        found
    }

    fn require(&self, name: &str) -> GraphResult<usize> {
        self.lookup(name)
            .ok_or_else(|| GraphError::VertexNotFound(name.to_string()))
    }

    fn traversal_start(&self, start: &str, order: Traversal) -> Option<usize> {
        if self.vertices.is_empty() {
            log::warn!("{} requested on an empty graph", order.label());
            return None;
        }
        self.lookup(start)
    }

    fn neighbor_indices(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges.iter().filter_map(move |e| e.other(v))
    }

    fn edge_weight(&self, a: usize, b: usize) -> Option<f64> {
        self.edges.iter().find(|e| e.joins(a, b)).map(|e| e.weight)
    }
}
