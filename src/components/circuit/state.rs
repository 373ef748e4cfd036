use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::builder::{self, chance, sample};
use super::config::{CircuitConfig, MotionConfig};
use super::governor::FrameGovernor;
use super::render::{self, Surface, Trace};
use super::types::{Circuit, Edge};

/// What a call to [`CircuitState::tick`] ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
	/// Too soon after the previous admitted tick; nothing happened.
	Throttled,
	/// Admitted, but the canvas is off-screen; nothing was drawn or mutated.
	Hidden,
	/// The frame was drawn and the animation advanced.
	Drawn,
}

pub struct CircuitState {
	pub width: f64,
	pub height: f64,
	circuit: Circuit,
	config: CircuitConfig,
	governor: FrameGovernor,
	visible: bool,
	generation: u64,
	rng: StdRng,
}

impl CircuitState {
	pub fn new(width: f64, height: f64, config: CircuitConfig) -> Self {
		Self::with_rng(width, height, config, StdRng::from_entropy())
	}

	pub fn with_rng(width: f64, height: f64, config: CircuitConfig, mut rng: StdRng) -> Self {
		let circuit = builder::build(width, height, &config, &mut rng);
		debug!(
			"circuit background: {} nodes, {} edges at {width}x{height}",
			circuit.nodes().len(),
			circuit.edges().len()
		);
		Self {
			width,
			height,
			circuit,
			governor: FrameGovernor::new(config.frame_budget, config.motion.max_frame_delta_ms),
			config,
			visible: true,
			generation: 0,
			rng,
		}
	}

	pub fn circuit(&self) -> &Circuit {
		&self.circuit
	}

	/// Number of rebuilds since construction.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn set_visible(&mut self, visible: bool) {
		if self.visible != visible {
			debug!("circuit background: visible = {visible}");
		}
		self.visible = visible;
	}

	pub fn governor(&self) -> &FrameGovernor {
		&self.governor
	}

	/// Discards the current circuit and builds a new one for the given
	/// logical size. Nodes and edges are replaced together.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.circuit = builder::build(width, height, &self.config, &mut self.rng);
		self.generation += 1;
		debug!(
			"circuit background: generation {} with {} nodes, {} edges at {width}x{height}",
			self.generation,
			self.circuit.nodes().len(),
			self.circuit.edges().len()
		);
	}

	/// Runs one frame at `now` (ms, monotonic). Edges and their pulses are
	/// drawn first, then nodes.
	pub fn tick<S: Surface + ?Sized>(&mut self, now: f64, surface: &mut S) -> TickOutcome {
		let Some(delta_ms) = self.governor.admit(now) else {
			return TickOutcome::Throttled;
		};
		if !self.visible {
			return TickOutcome::Hidden;
		}

		render::draw_background(surface, self.width, self.height);

		let motion = self.config.motion;
		let Circuit { nodes, edges } = &mut self.circuit;
		for edge in edges.iter_mut() {
			let (Some(start), Some(end)) = (nodes.get(edge.start), nodes.get(edge.end)) else {
				continue;
			};
			let trace = Trace::between(start, end);
			render::draw_trace(surface, &trace, edge.kind, edge.active);

			advance_pulse(edge, now, delta_ms, &motion, &mut self.rng);
			if edge.pulse_in_flight() {
				render::draw_pulse(
					surface,
					trace.at(edge.progress),
					render::pulse_intensity(edge.progress),
					edge.kind,
				);
			}
		}

		for node in nodes.iter() {
			render::draw_node(surface, node, now);
		}

		self.stir();
		TickOutcome::Drawn
	}

	/// Occasionally toggles a node and sparks an idle edge so the board
	/// never settles.
	fn stir(&mut self) {
		let motion = &self.config.motion;
		let Circuit { nodes, edges } = &mut self.circuit;

		if chance(&mut self.rng, motion.node_flip_probability) && !nodes.is_empty() {
			let i = self.rng.gen_range(0..nodes.len());
			if let Some(node) = nodes.get_mut(i) {
				node.active = !node.active;
			}
		}

		if chance(&mut self.rng, motion.edge_spark_probability) && !edges.is_empty() {
			let i = self.rng.gen_range(0..edges.len());
			if let Some(edge) = edges.get_mut(i).filter(|e| !e.active) {
				edge.active = true;
				edge.progress = 0.0;
			}
		}
	}
}

fn advance_pulse(edge: &mut Edge, now: f64, delta_ms: f64, motion: &MotionConfig, rng: &mut StdRng) {
	if !edge.active || now - edge.last_update <= motion.min_pulse_interval_ms {
		return;
	}
	edge.progress += edge.speed * delta_ms * 0.001;
	edge.last_update = now;

	if edge.progress > motion.wrap_threshold {
		edge.progress = 0.0;
		edge.active = chance(rng, motion.reactivation_probability);
		edge.speed = sample(rng, motion.speed_min, motion.speed_max);
	}
}
