//! Procedural circuit layout: jittered grid placement followed by capped,
//! distance-banded nearest-neighbour linking.

use rand::Rng;

use super::config::{CircuitConfig, LayoutConfig};
use super::types::{Circuit, Edge, EdgeKind, Node, NodeKind};

/// `true` with probability `p`. Out-of-range and NaN values saturate
/// instead of panicking like `Rng::gen_bool`.
pub(super) fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
	rng.r#gen::<f64>() < p
}

/// Uniform sample in `[min, max)`, or `min` for an empty range.
pub(super) fn sample<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
	min + rng.r#gen::<f64>() * (max - min).max(0.0)
}

/// Builds a fresh circuit for a `width` × `height` canvas. A degenerate
/// size yields an empty circuit.
pub fn build<R: Rng + ?Sized>(width: f64, height: f64, config: &CircuitConfig, rng: &mut R) -> Circuit {
	let mut nodes = place_nodes(width, height, &config.layout, rng);
	connect(&mut nodes, &config.layout, rng);

	let layout = &config.layout;
	let motion = &config.motion;
	Circuit::link(nodes, |start, end| Edge {
		start,
		end,
		progress: 0.0,
		active: chance(rng, layout.initial_edge_activity),
		speed: sample(rng, motion.speed_min, motion.speed_max),
		last_update: 0.0,
		kind: if chance(rng, layout.data_edge_ratio) {
			EdgeKind::Data
		} else {
			EdgeKind::Power
		},
	})
}

fn place_nodes<R: Rng + ?Sized>(width: f64, height: f64, layout: &LayoutConfig, rng: &mut R) -> Vec<Node> {
	let cell = layout.cell_size;
	if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() && cell > 0.0) {
		return Vec::new();
	}
	let (cols, rows) = ((width / cell).ceil() as usize, (height / cell).ceil() as usize);

	let mut nodes = Vec::new();
	for col in 0..cols {
		for row in 0..rows {
			if !chance(rng, layout.node_probability) {
				continue;
			}
			let x = (col as f64 + 0.5) * cell + sample(rng, -layout.jitter, layout.jitter);
			let y = (row as f64 + 0.5) * cell + sample(rng, -layout.jitter, layout.jitter);
			nodes.push(Node {
				x,
				y,
				connections: Vec::new(),
				active: chance(rng, layout.initial_node_activity),
				pulse_delay: sample(rng, 0.0, layout.max_pulse_delay_ms),
				kind: if chance(rng, layout.hub_ratio) {
					NodeKind::Hub
				} else {
					NodeKind::Normal
				},
			});
		}
	}
	nodes
}

fn connect<R: Rng + ?Sized>(nodes: &mut [Node], layout: &LayoutConfig, rng: &mut R) {
	for i in 0..nodes.len() {
		let (x, y, cap) = (nodes[i].x, nodes[i].y, nodes[i].kind.degree_cap(layout));

		let mut candidates: Vec<(usize, f64)> = nodes
			.iter()
			.enumerate()
			.filter(|&(j, _)| j != i)
			.map(|(j, other)| (j, (other.x - x).hypot(other.y - y)))
			.filter(|&(_, d)| d > layout.min_link_distance && d < layout.max_link_distance)
			.collect();
		candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
		candidates.truncate(cap);

		nodes[i].connections = candidates
			.into_iter()
			.filter(|_| chance(rng, layout.link_probability))
			.map(|(j, _)| j)
			.collect();
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn assert_topology(circuit: &Circuit, layout: &LayoutConfig) {
		let mut pairs = HashSet::new();
		for edge in circuit.edges() {
			assert_ne!(edge.start, edge.end, "self edge");
			assert!(edge.start < circuit.nodes().len() && edge.end < circuit.nodes().len(), "dangling edge");
			assert!(
				pairs.insert((edge.start.min(edge.end), edge.start.max(edge.end))),
				"duplicate edge {}-{}",
				edge.start,
				edge.end
			);
		}
		for node in circuit.nodes() {
			assert!(node.connections.len() <= node.kind.degree_cap(layout));
		}
	}

	#[test]
	fn topology_invariants_hold_across_seeds() {
		for config in [CircuitConfig::optimized(), CircuitConfig::fluid()] {
			for seed in 0..200 {
				let mut rng = StdRng::seed_from_u64(seed);
				let circuit = build(1280.0, 720.0, &config, &mut rng);
				assert_topology(&circuit, &config.layout);
			}
		}
	}

	#[test]
	fn saturated_linking_respects_hub_and_normal_caps() {
		let mut config = CircuitConfig::optimized();
		config.layout.node_probability = 1.0;
		config.layout.link_probability = 1.0;
		config.layout.hub_ratio = 0.5;

		let mut rng = StdRng::seed_from_u64(7);
		let circuit = build(1000.0, 1000.0, &config, &mut rng);
		assert_topology(&circuit, &config.layout);

		// With every cell filled, every node has neighbours in the band.
		assert!(circuit.nodes().iter().any(|n| n.kind == NodeKind::Hub && n.connections.len() == 4));
		assert!(circuit.nodes().iter().any(|n| n.kind == NodeKind::Normal && n.connections.len() == 2));
	}

	#[test]
	fn connections_stay_inside_distance_band() {
		let config = CircuitConfig::optimized();
		let mut rng = StdRng::seed_from_u64(42);
		let circuit = build(1600.0, 900.0, &config, &mut rng);

		for node in circuit.nodes() {
			for &j in &node.connections {
				let other = &circuit.nodes()[j];
				let d = (other.x - node.x).hypot(other.y - node.y);
				assert!(d > 50.0 && d < 150.0, "distance {d} outside band");
			}
		}
	}

	#[test]
	fn nodes_sit_near_cell_centres() {
		let mut config = CircuitConfig::optimized();
		config.layout.node_probability = 1.0;
		let mut rng = StdRng::seed_from_u64(3);
		let circuit = build(400.0, 300.0, &config, &mut rng);

		assert_eq!(circuit.nodes().len(), 12);
		for node in circuit.nodes() {
			let dx = node.x.rem_euclid(100.0) - 50.0;
			let dy = node.y.rem_euclid(100.0) - 50.0;
			assert!(dx.abs() <= 15.0 && dy.abs() <= 15.0);
		}
	}

	#[test]
	fn scenario_800_by_600_node_count_band() {
		let mut config = CircuitConfig::optimized();
		config.layout.node_probability = 0.35;

		let runs = 500;
		let mut total = 0;
		for seed in 0..runs {
			let mut rng = StdRng::seed_from_u64(seed);
			let circuit = build(800.0, 600.0, &config, &mut rng);
			assert!(circuit.nodes().len() <= 48);
			assert_topology(&circuit, &config.layout);
			total += circuit.nodes().len();
		}

		// 48 cells × 0.35 = 16.8 expected nodes per run.
		let mean = total as f64 / runs as f64;
		assert!((14.0..=20.0).contains(&mean), "mean node count {mean}");
	}

	#[test]
	fn degenerate_sizes_build_empty_circuits() {
		let config = CircuitConfig::optimized();
		let mut rng = StdRng::seed_from_u64(1);
		for (w, h) in [(0.0, 600.0), (800.0, 0.0), (-5.0, 10.0), (f64::NAN, 100.0), (f64::INFINITY, 100.0)] {
			let circuit = build(w, h, &config, &mut rng);
			assert!(circuit.nodes().is_empty());
			assert!(circuit.edges().is_empty());
		}
	}

	#[test]
	fn fresh_edges_start_at_zero_with_speed_in_range() {
		let config = CircuitConfig::fluid();
		let mut rng = StdRng::seed_from_u64(11);
		let circuit = build(1920.0, 1080.0, &config, &mut rng);

		assert!(!circuit.edges().is_empty());
		for edge in circuit.edges() {
			assert_eq!(edge.progress, 0.0);
			assert!((0.3..1.0).contains(&edge.speed));
			assert_eq!(edge.kind, EdgeKind::Power);
		}
	}

	#[test]
	fn chance_saturates_bad_probabilities() {
		let mut rng = StdRng::seed_from_u64(5);
		assert!((0..100).all(|_| !chance(&mut rng, f64::NAN)));
		assert!((0..100).all(|_| !chance(&mut rng, -1.0)));
		assert!((0..100).all(|_| chance(&mut rng, 2.0)));
		assert_eq!(sample(&mut rng, 3.0, 1.0), 3.0);
	}
}
