use crate::graph::{Edge, Node};
use ahash::{AHashMap, AHashSet};

/// Adjacency view over a graph snapshot, built once per validation run.
pub(super) struct Topology<'a> {
    nodes: AHashMap<&'a str, &'a Node>,
    outgoing: AHashMap<&'a str, Vec<&'a str>>,
    incoming: AHashMap<&'a str, Vec<&'a str>>,
    connected: AHashSet<&'a str>,
}

impl<'a> Topology<'a> {
    pub(super) fn new(nodes: &'a [Node], edges: &'a [Edge]) -> Self {
        let mut outgoing: AHashMap<&str, Vec<&str>> = AHashMap::new();
        let mut incoming: AHashMap<&str, Vec<&str>> = AHashMap::new();
        let mut connected = AHashSet::new();
        for edge in edges {
            outgoing
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
            incoming
                .entry(edge.target.as_str())
                .or_default()
                .push(edge.source.as_str());
            connected.insert(edge.source.as_str());
            connected.insert(edge.target.as_str());
        }
        // First occurrence wins when ids are duplicated.
        let mut by_id = AHashMap::new();
        for node in nodes {
            by_id.entry(node.id.as_str()).or_insert(node);
        }

        Self {
            nodes: by_id,
            outgoing,
            incoming,
            connected,
        }
    }

    pub(super) fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// True when at least one edge starts or ends at `id`.
    pub(super) fn is_connected(&self, id: &str) -> bool {
        self.connected.contains(id)
    }

    pub(super) fn out_degree(&self, id: &str) -> usize {
        self.outgoing.get(id).map_or(0, Vec::len)
    }

    pub(super) fn in_degree(&self, id: &str) -> usize {
        self.incoming.get(id).map_or(0, Vec::len)
    }

    /// Every node with a path to an `end`/`forceEnd` node, ends included.
    ///
    /// Walks incoming edges back from the end nodes with an explicit stack, so long chains
    /// and cycles are handled in one pass over the graph.
    pub(super) fn reaching_end(&self) -> AHashSet<&'a str> {
        let mut stack: Vec<&'a str> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.node_type.is_end())
            .map(|(id, _)| *id)
            .collect();
        let mut visited = AHashSet::new();
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            stack.extend(self.incoming.get(id).into_iter().flatten().copied());
        }
        visited
    }
}
