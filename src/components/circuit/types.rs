use std::collections::HashSet;

use super::config::LayoutConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
	Normal,
	Hub,
}

impl NodeKind {
	pub fn degree_cap(self, layout: &LayoutConfig) -> usize {
		match self {
			Self::Normal => layout.normal_degree_cap,
			Self::Hub => layout.hub_degree_cap,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
	Power,
	Data,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub x: f64,
	pub y: f64,
	pub connections: Vec<usize>,
	pub active: bool,
	/// Phase offset of the breathing ring, in ms.
	pub pulse_delay: f64,
	pub kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	/// Index into the node arena of the same [`Circuit`].
	pub start: usize,
	/// Index into the node arena of the same [`Circuit`].
	pub end: usize,
	pub progress: f64,
	pub active: bool,
	pub speed: f64,
	/// Timestamp of the last progress advance, in ms.
	pub last_update: f64,
	pub kind: EdgeKind,
}

impl Edge {
	pub fn pulse_in_flight(&self) -> bool {
		self.active && self.progress > 0.0 && self.progress < 1.0
	}
}

/// One generation of the graph. Nodes own their positions; edges only
/// index into `nodes`, so replacing the whole value is the only way the
/// topology ever changes.
#[derive(Clone, Debug, Default)]
pub struct Circuit {
	pub(super) nodes: Vec<Node>,
	pub(super) edges: Vec<Edge>,
}

impl Circuit {
	/// Derives the edge list from each node's `connections`, keeping one
	/// edge per unordered pair. Connections that point outside the arena or
	/// back at their own node are ignored. `init` fills in the animation
	/// fields of each new edge.
	pub fn link(nodes: Vec<Node>, mut init: impl FnMut(usize, usize) -> Edge) -> Self {
		let mut seen = HashSet::new();
		let mut edges = Vec::new();

		for (i, node) in nodes.iter().enumerate() {
			for &j in &node.connections {
				if i == j || j >= nodes.len() {
					continue;
				}
				if seen.insert((i.min(j), i.max(j))) {
					edges.push(init(i, j));
				}
			}
		}

		Self { nodes, edges }
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(x: f64, y: f64, connections: Vec<usize>) -> Node {
		Node {
			x,
			y,
			connections,
			active: false,
			pulse_delay: 0.0,
			kind: NodeKind::Normal,
		}
	}

	fn idle(start: usize, end: usize) -> Edge {
		Edge {
			start,
			end,
			progress: 0.0,
			active: false,
			speed: 0.5,
			last_update: 0.0,
			kind: EdgeKind::Power,
		}
	}

	#[test]
	fn link_keeps_one_edge_per_pair() {
		let nodes = vec![
			node(0.0, 0.0, vec![1, 2]),
			node(100.0, 0.0, vec![0, 2]),
			node(0.0, 100.0, vec![1, 0]),
		];
		let circuit = Circuit::link(nodes, idle);

		let pairs: Vec<_> = circuit.edges().iter().map(|e| (e.start, e.end)).collect();
		assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
	}

	#[test]
	fn link_skips_self_and_dangling_connections() {
		let nodes = vec![node(0.0, 0.0, vec![0, 7]), node(80.0, 0.0, vec![])];
		let circuit = Circuit::link(nodes, idle);
		assert!(circuit.edges().is_empty());
		assert_eq!(circuit.nodes().len(), 2);
	}

	#[test]
	fn edges_keep_declaring_node_as_start() {
		let circuit = Circuit::link(vec![node(0.0, 0.0, vec![]), node(60.0, 0.0, vec![0])], idle);
		assert_eq!(circuit.edges().len(), 1);
		assert_eq!((circuit.edges()[0].start, circuit.edges()[0].end), (1, 0));
	}

	#[test]
	fn hub_cap_comes_from_layout() {
		let layout = crate::components::circuit::CircuitConfig::optimized().layout;
		assert_eq!(NodeKind::Normal.degree_cap(&layout), 2);
		assert_eq!(NodeKind::Hub.degree_cap(&layout), 4);
	}
}
